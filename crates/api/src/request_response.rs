// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use envdash_domain::{DEFAULT_YEAR, MonthlyTrend};
use serde::{Deserialize, Serialize};

/// API request to create an account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Checked against `password` when present.
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

/// Public view of an account, returned by signup and whoami.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub name: String,
    pub email: String,
    /// ISO 8601 expiry of the token.
    pub expires_at: String,
}

/// A plain status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// API response for a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    /// The ID of the removed record or document.
    pub id: i64,
}

/// Query for the trend series. Anything but a non-zero integer year
/// selects the default year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrendsQuery {
    #[serde(default)]
    pub year: Option<String>,
}

impl TrendsQuery {
    /// The requested year; missing, unparseable or zero means the default.
    #[must_use]
    pub fn year_or_default(&self) -> i32 {
        self.year
            .as_deref()
            .and_then(|year| year.trim().parse().ok())
            .filter(|year: &i32| *year != 0)
            .unwrap_or(DEFAULT_YEAR)
    }
}

/// Trend series for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsResponse {
    pub year: i32,
    pub monthly_trends: Vec<MonthlyTrend>,
}

/// Result of a CSV import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Number of documents stored.
    pub imported: usize,
    /// IDs of the stored documents, in row order.
    pub ids: Vec<i64>,
}
