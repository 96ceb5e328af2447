// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{accounts, sessions};
use crate::error::PersistenceError;
use crate::queries::accounts::{get_account_by_email, normalize_email};

/// Creates a new account.
///
/// The email is trimmed and lower-cased so that uniqueness is
/// case-insensitive. The password is hashed with bcrypt at `password_cost`.
///
/// # Errors
///
/// Returns an error if the email is already registered, the password cannot
/// be hashed, or the insert fails.
pub fn create_account(
    conn: &mut SqliteConnection,
    email: &str,
    display_name: &str,
    password: &str,
    password_cost: u32,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = normalize_email(email);

    if get_account_by_email(conn, &normalized_email)?.is_some() {
        return Err(PersistenceError::DuplicateEmail(normalized_email));
    }

    info!(email = %normalized_email, display_name, "Creating account");

    let password_hash: String = bcrypt::hash(password, password_cost)
        .map_err(|e| PersistenceError::PasswordHash(e.to_string()))?;

    diesel::insert_into(accounts::table)
        .values((
            accounts::email.eq(&normalized_email),
            accounts::display_name.eq(display_name),
            accounts::password_hash.eq(&password_hash),
        ))
        .execute(conn)?;

    let account_id: i64 = conn.get_last_insert_rowid()?;

    info!(account_id, "Account created");
    Ok(account_id)
}

/// Stamps an account's last login time with the database clock.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<(), PersistenceError> {
    debug!(account_id, "Updating last_login_at");

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Creates a new session for an account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `account_id` - The owning account
/// * `expires_at` - The expiration timestamp (ISO 8601 format)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    account_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::account_id.eq(account_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;

    debug!(session_id, account_id, expires_at, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token. Unknown tokens are ignored.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    debug!(rows_affected, "Deleted session by token");
    Ok(rows_affected)
}

/// Deletes every session whose expiry is before `now`.
///
/// `now` must use the same ISO 8601 format as stored expiries so that the
/// text comparison orders correctly.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    if rows_affected > 0 {
        info!(rows_affected, "Deleted expired sessions");
    }
    Ok(rows_affected)
}
