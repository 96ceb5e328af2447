// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use envdash_domain::DomainError;
use envdash_persistence::PersistenceError;

/// Failure to authenticate a login or a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller's credentials or token were refused.
    AuthenticationFailed { reason: String },
    /// The check itself could not run, for example because the store failed.
    Internal { message: String },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => write!(f, "Not authenticated: {reason}"),
            Self::Internal { message } => write!(f, "Authentication unavailable: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Errors surfaced to API callers.
///
/// The server maps each variant to exactly one HTTP status:
///
/// | Variant | Status |
/// |---|---|
/// | `AuthenticationFailed` | 401 |
/// | `InvalidInput`, `PasswordPolicyViolation` | 400 |
/// | `ResourceNotFound` | 404 |
/// | `DomainRuleViolation` | 422 |
/// | `Internal` | 500 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    AuthenticationFailed {
        reason: String,
    },
    /// A well-formed request that breaks a uniqueness or state rule.
    DomainRuleViolation {
        rule: String,
        message: String,
    },
    /// A malformed value. `field` names the offending request field or
    /// query parameter.
    InvalidInput {
        field: String,
        message: String,
    },
    ResourceNotFound {
        /// `Record` or `Document`.
        resource_type: String,
        message: String,
    },
    /// Store failure. The message is passed through uninterpreted.
    Internal {
        message: String,
    },
    PasswordPolicyViolation {
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => write!(f, "Not authenticated: {reason}"),
            Self::DomainRuleViolation { rule, message } => write!(f, "{message} [{rule}]"),
            Self::InvalidInput { field, message } => write!(f, "Invalid {field}: {message}"),
            Self::ResourceNotFound { message, .. } => write!(f, "{message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Internal { message } => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// Every domain error is a problem with caller input.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: String = match &err {
        DomainError::MissingField(field) => (*field).to_string(),
        DomainError::InvalidYear { .. } => String::from("year"),
        DomainError::InvalidMonth { .. } => String::from("month"),
        DomainError::InvalidLocation(_) => String::from("location"),
        DomainError::InvalidConcentration { pollutant, .. } => pollutant.label().to_lowercase(),
        DomainError::InvalidFilterParameter { parameter, .. } => (*parameter).to_string(),
        DomainError::AmbiguousFilter(_) => String::from("filter"),
    };

    ApiError::InvalidInput {
        field,
        message: err.to_string(),
    }
}

/// Translates a persistence error into an API error.
///
/// Missing rows become `ResourceNotFound`, a taken email becomes a rule
/// violation, and everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::RecordNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: format!("Record {id} does not exist"),
        },
        PersistenceError::DocumentNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Document"),
            message: format!("Document {id} does not exist"),
        },
        PersistenceError::DuplicateEmail(email) => ApiError::DomainRuleViolation {
            rule: String::from("unique_email"),
            message: format!("An account with email '{email}' already exists"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
