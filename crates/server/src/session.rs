// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Every protected route takes a [`SessionAccount`] as its first extractor,
//! so an absent or invalid token is rejected with 401 before the body is
//! read or any record is touched.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use envdash_api::{AuthError, AuthenticatedAccount, AuthenticationService};
use tracing::{debug, error, warn};

use crate::{AppState, HttpError};

/// Extractor for the authenticated account.
///
/// Holds the account behind the bearer token and the token itself, which
/// logout needs.
///
/// # Errors
///
/// Rejects with HTTP 401 if:
/// - The Authorization header is missing
/// - The header is not `Bearer <token>`
/// - The token is unknown or expired
///
/// Rejects with HTTP 500 if the session store cannot be read.
pub struct SessionAccount(pub AuthenticatedAccount, pub String);

impl FromRequestParts<AppState> for SessionAccount {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header is not a bearer token");
                SessionError::InvalidAuthorizationHeader
            })?;

        let mut persistence = state.persistence.lock().await;
        let account: AuthenticatedAccount =
            AuthenticationService::validate_session(&mut persistence, token).map_err(|e| match e {
                AuthError::AuthenticationFailed { .. } => {
                    warn!(error = %e, "Session validation failed");
                    SessionError::InvalidSession(e.to_string())
                }
                AuthError::Internal { .. } => {
                    error!(error = %e, "Session lookup failed");
                    SessionError::Unavailable(e.to_string())
                }
            })?;
        drop(persistence);

        debug!(account_id = account.account_id, "Session validated");

        Ok(Self(account, token.to_string()))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
    /// The session could not be checked.
    Unavailable(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            Self::MissingAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Missing Authorization header"),
            ),
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Invalid Authorization header format. Expected: 'Bearer <token>'"),
            ),
            Self::InvalidSession(reason) => (
                StatusCode::UNAUTHORIZED,
                format!("Session validation failed: {reason}"),
            ),
            Self::Unavailable(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        HttpError { status, message }
        .into_response()
    }
}
