// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::Pollutant;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A required field was not supplied.
    MissingField(&'static str),
    /// Year is outside the accepted range.
    InvalidYear {
        /// The rejected year.
        year: i32,
    },
    /// Month is outside 1-12.
    InvalidMonth {
        /// The rejected month.
        month: i64,
    },
    /// Location is empty or invalid.
    InvalidLocation(String),
    /// A pollutant concentration is negative or not a finite number.
    InvalidConcentration {
        /// The pollutant the value was given for.
        pollutant: Pollutant,
        /// The rejected value.
        value: f64,
    },
    /// A filter parameter could not be parsed as a number.
    InvalidFilterParameter {
        /// The query parameter name.
        parameter: &'static str,
        /// The raw value supplied.
        value: String,
    },
    /// Filter parameters do not describe exactly one filter mode.
    AmbiguousFilter(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Missing required field '{field}'"),
            Self::InvalidYear { year } => {
                write!(f, "Invalid year: {year}. Must be between 1900 and 2200")
            }
            Self::InvalidMonth { month } => {
                write!(f, "Invalid month: {month}. Must be between 1 and 12")
            }
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidConcentration { pollutant, value } => {
                write!(
                    f,
                    "Invalid {} concentration: {value}. Must be a non-negative number",
                    pollutant.label()
                )
            }
            Self::InvalidFilterParameter { parameter, value } => {
                write!(f, "Filter parameter '{parameter}' must be an integer, got '{value}'")
            }
            Self::AmbiguousFilter(msg) => write!(f, "Invalid filter: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
