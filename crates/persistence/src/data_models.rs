// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use envdash_domain::LegacyRecord;
use serde::{Deserialize, Serialize};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub account_id: i64,
    /// Always lower-case.
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub account_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    /// ISO 8601 timestamp.
    pub expires_at: String,
}

/// A legacy document as stored, with its ID.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub document_id: i64,
    pub document: LegacyRecord,
}
