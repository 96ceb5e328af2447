// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-token authentication.
//!
//! A successful login creates a session row holding a random token and an
//! ISO 8601 expiry. Every authenticated request presents the token; the
//! session is looked up, checked for expiry and resolved to its account.

use envdash_persistence::{AccountData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// The account behind a validated session.
///
/// Handlers receive this explicitly; there is no ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: i64,
    pub email: String,
    pub display_name: String,
}

impl From<&AccountData> for AuthenticatedAccount {
    fn from(account: &AccountData) -> Self {
        Self {
            account_id: account.account_id,
            email: account.email.clone(),
            display_name: account.display_name.clone(),
        }
    }
}

/// A session created by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    /// ISO 8601 expiry.
    pub expires_at: String,
    pub account: AuthenticatedAccount,
}

/// Authentication service for login, session validation and logout.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticationService {
    session_ttl: Duration,
}

impl Default for AuthenticationService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SESSION_EXPIRATION)
    }
}

impl AuthenticationService {
    /// Default session lifetime: 30 days.
    pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    #[must_use]
    pub const fn new(session_ttl: Duration) -> Self {
        Self { session_ttl }
    }

    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Authenticates an account by email and password and opens a session.
    ///
    /// Expired sessions are purged as a side effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is unknown, the password is wrong, or
    /// the session cannot be stored. Unknown email and wrong password give
    /// the same reason.
    pub fn login(
        &self,
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<IssuedSession, AuthError> {
        let invalid_credentials = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        };

        let Some(account) = persistence
            .get_account_by_email(email)
            .map_err(Self::map_persistence_error)?
        else {
            warn!("Login attempt for unknown email");
            return Err(invalid_credentials());
        };

        let password_valid: bool = persistence
            .verify_password(password, &account.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_valid {
            warn!(account_id = account.account_id, "Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        persistence
            .delete_expired_sessions(&format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;

        let token: String = Self::generate_session_token();
        let expires_at: String = format_timestamp(now + self.session_ttl)?;

        persistence
            .create_session(&token, account.account_id, &expires_at)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(account.account_id)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to update last login: {e}"),
            })?;

        info!(account_id = account.account_id, %expires_at, "Account logged in");

        Ok(IssuedSession {
            token,
            expires_at,
            account: AuthenticatedAccount::from(&account),
        })
    }

    /// Resolves a session token to its account.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or expired, or its account
    /// no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedAccount, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            debug!(session_id = session.session_id, "Rejected expired session");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(session.account_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok(AuthenticatedAccount::from(&account))
    }

    /// Ends a session. Unknown tokens are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the session row cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        let removed: usize = persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to delete session: {e}"),
            })?;

        debug!(removed, "Session logged out");
        Ok(())
    }

    /// Generates a 256-bit session token, hex encoded.
    fn generate_session_token() -> String {
        format!(
            "{:016x}{:016x}{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::Internal {
            message: format!("Database error: {err}"),
        }
    }
}

fn format_timestamp(instant: OffsetDateTime) -> Result<String, AuthError> {
    instant
        .format(&Iso8601::DEFAULT)
        .map_err(|e| AuthError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
}
