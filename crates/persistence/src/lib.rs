// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for envdash.
//!
//! An embedded `SQLite` store built on Diesel. It holds four tables:
//!
//! - `accounts` and `sessions` for bearer-token authentication
//! - `pollution_records` for canonical measurements
//! - `opengds_documents` for spreadsheet-import documents, stored as JSON
//!
//! Schema changes are embedded migrations applied when a [`Persistence`] is
//! constructed. Foreign key enforcement is verified at the same time.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives every caller its own shared-cache
//! in-memory database, so tests never observe each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use envdash_domain::{FilterSpec, LegacyRecord, Measurement, PollutionRecord, RecordId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{AccountData, SessionData, StoredDocument};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Counter giving every in-memory database a unique name.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    password_cost: u32,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:envdash_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            password_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            password_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Sets the bcrypt cost used when hashing new passwords.
    #[must_use]
    pub const fn with_password_cost(mut self, password_cost: u32) -> Self {
        self.password_cost = password_cost;
        self
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Canonical Records
    // ========================================================================

    /// Lists records matching `spec`, ordered by year, month, then ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_records(
        &mut self,
        spec: &FilterSpec,
    ) -> Result<Vec<PollutionRecord>, PersistenceError> {
        queries::records::list_records(&mut self.conn, spec)
    }

    /// Retrieves a record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_record(&mut self, id: RecordId) -> Result<Option<PollutionRecord>, PersistenceError> {
        queries::records::get_record(&mut self.conn, id)
    }

    /// Inserts a record and returns it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_record(
        &mut self,
        measurement: &Measurement,
    ) -> Result<PollutionRecord, PersistenceError> {
        let id: RecordId = mutations::records::insert_record(&mut self.conn, measurement)?;
        Ok(PollutionRecord::new(id, measurement.clone()))
    }

    /// Overwrites an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::RecordNotFound`] if the record is absent.
    pub fn update_record(
        &mut self,
        id: RecordId,
        measurement: &Measurement,
    ) -> Result<PollutionRecord, PersistenceError> {
        mutations::records::update_record(&mut self.conn, id, measurement)?;
        Ok(PollutionRecord::new(id, measurement.clone()))
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::RecordNotFound`] if the record is absent.
    pub fn delete_record(&mut self, id: RecordId) -> Result<(), PersistenceError> {
        mutations::records::delete_record(&mut self.conn, id)
    }

    // ========================================================================
    // Legacy Documents
    // ========================================================================

    /// Lists every legacy document in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored body is unreadable.
    pub fn list_documents(&mut self) -> Result<Vec<StoredDocument>, PersistenceError> {
        queries::legacy::list_documents(&mut self.conn)
    }

    /// Retrieves a legacy document by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored body is unreadable.
    pub fn get_document(
        &mut self,
        document_id: i64,
    ) -> Result<Option<StoredDocument>, PersistenceError> {
        queries::legacy::get_document(&mut self.conn, document_id)
    }

    /// Stores a legacy document as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_document(&mut self, document: &LegacyRecord) -> Result<i64, PersistenceError> {
        mutations::legacy::insert_document(&mut self.conn, document)
    }

    /// Stores several legacy documents atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is stored in that case.
    pub fn create_documents(
        &mut self,
        documents: &[LegacyRecord],
    ) -> Result<Vec<i64>, PersistenceError> {
        mutations::legacy::insert_documents(&mut self.conn, documents)
    }

    /// Replaces the body of a legacy document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DocumentNotFound`] if the document is absent.
    pub fn replace_document(
        &mut self,
        document_id: i64,
        document: &LegacyRecord,
    ) -> Result<(), PersistenceError> {
        mutations::legacy::replace_document(&mut self.conn, document_id, document)
    }

    /// Deletes a legacy document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DocumentNotFound`] if the document is absent.
    pub fn delete_document(&mut self, document_id: i64) -> Result<(), PersistenceError> {
        mutations::legacy::delete_document(&mut self.conn, document_id)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates an account, hashing the password.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicateEmail`] if the email is taken.
    pub fn create_account(
        &mut self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_account(
            &mut self.conn,
            email,
            display_name,
            password,
            self.password_cost,
        )
    }

    /// Retrieves an account by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_email(&mut self.conn, email)
    }

    /// Retrieves an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_id(
        &mut self,
        account_id: i64,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_id(&mut self.conn, account_id)
    }

    /// Updates the last login timestamp for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_last_login(&mut self, account_id: i64) -> Result<(), PersistenceError> {
        mutations::accounts::update_last_login(&mut self.conn, account_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::accounts::verify_password(password, password_hash)
    }

    // ========================================================================
    // Session Management
    // ========================================================================

    /// Creates a new session.
    ///
    /// # Arguments
    ///
    /// * `session_token` - The unique session token
    /// * `account_id` - The owning account
    /// * `expires_at` - The expiration timestamp (ISO 8601 format)
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        account_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_session(&mut self.conn, session_token, account_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::accounts::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::accounts::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token, returning how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<usize, PersistenceError> {
        mutations::accounts::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired before `now` (ISO 8601).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::accounts::delete_expired_sessions(&mut self.conn, now)
    }
}
