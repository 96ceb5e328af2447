// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for envdash.
//!
//! This crate sits between the HTTP server and the domain and persistence
//! crates. It owns request and response shapes, authentication, the
//! password policy and the translation of lower-level errors into
//! [`ApiError`]. Nothing here knows about HTTP.

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

mod auth;
mod csv_import;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

// ========================================================================
// Authentication
// ========================================================================

pub use auth::{AuthenticatedAccount, AuthenticationService, IssuedSession};

// ========================================================================
// Errors
// ========================================================================

pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};

// ========================================================================
// Handlers
// ========================================================================

pub use csv_import::parse_legacy_csv;
pub use handlers::{
    LEGACY_ID_KEY, create_legacy, create_record, delete_legacy, delete_record, get_legacy,
    get_record, health, import_legacy_csv, list_legacy, list_records, login, logout,
    record_summary, record_trends, signup, update_legacy, update_record, whoami,
};

// ========================================================================
// Request / Response Types
// ========================================================================

pub use request_response::{
    AccountInfo, DeleteResponse, ImportResponse, LoginRequest, LoginResponse, MessageResponse,
    SignupRequest, TrendsQuery, TrendsResponse,
};
