// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Signup password rules.

use thiserror::Error;

/// bcrypt ignores everything past this many bytes.
const BCRYPT_MAX_BYTES: usize = 72;

/// Why a password was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password and confirmation differ")]
    ConfirmationMismatch,

    #[error("Password needs at least {min_chars} characters")]
    TooShort { min_chars: usize },

    #[error("Password must fit in {max_bytes} bytes")]
    TooLong { max_bytes: usize },

    #[error(
        "Password mixes {found} character kinds; at least {required} of upper case, lower case, digits and symbols are needed"
    )]
    TooSimple { required: usize, found: usize },

    #[error("Password cannot be the account {field}")]
    SameAsAccountField { field: &'static str },
}

/// Rules applied to new account passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_chars: usize,
    /// How many of the four character kinds must appear.
    pub min_kinds: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_chars: 8,
            min_kinds: 2,
        }
    }
}

impl PasswordPolicy {
    /// Checks a signup password.
    ///
    /// The password may not equal the email, the part of the email before
    /// `@`, or the display name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        email: &str,
        display_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }
        if password.chars().count() < self.min_chars {
            return Err(PasswordPolicyError::TooShort {
                min_chars: self.min_chars,
            });
        }
        if password.len() > BCRYPT_MAX_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max_bytes: BCRYPT_MAX_BYTES,
            });
        }

        let found: usize = character_kinds(password);
        if found < self.min_kinds {
            return Err(PasswordPolicyError::TooSimple {
                required: self.min_kinds,
                found,
            });
        }

        let email: String = email.trim().to_lowercase();
        let mailbox: &str = email.split('@').next().unwrap_or_default();
        let name: String = display_name.trim().to_lowercase();
        let candidate: String = password.to_lowercase();

        let forbidden: [(&'static str, &str); 3] = [
            ("email", email.as_str()),
            ("email", mailbox),
            ("name", name.as_str()),
        ];
        if let Some((field, _)) = forbidden
            .into_iter()
            .find(|(_, value)| !value.is_empty() && candidate == *value)
        {
            return Err(PasswordPolicyError::SameAsAccountField { field });
        }

        Ok(())
    }
}

/// Counts which of upper case, lower case, digits and symbols occur.
fn character_kinds(password: &str) -> usize {
    let upper: bool = password.chars().any(char::is_uppercase);
    let lower: bool = password.chars().any(char::is_lowercase);
    let digit: bool = password.chars().any(|c| c.is_ascii_digit());
    let symbol: bool = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    [upper, lower, digit, symbol]
        .into_iter()
        .filter(|present| *present)
        .count()
}
