// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Measurement, Pollutant};

/// Validates a measurement submitted through the canonical API.
///
/// Legacy documents are never validated: they are decoded with fallbacks
/// instead.
///
/// # Arguments
///
/// * `measurement` - The measurement to validate
///
/// # Errors
///
/// Returns an error if:
/// - The year is outside 1900-2200
/// - The month is outside 1-12
/// - The location is blank
/// - Any concentration is negative, infinite or NaN
pub fn validate_measurement(measurement: &Measurement) -> Result<(), DomainError> {
    validate_year(measurement.year)?;

    // Rule: month must be a calendar month
    if !(1..=12).contains(&measurement.month) {
        return Err(DomainError::InvalidMonth {
            month: i64::from(measurement.month),
        });
    }

    // Rule: location must not be blank
    if measurement.location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location cannot be empty",
        )));
    }

    for pollutant in Pollutant::ALL {
        let value: f64 = measurement.concentration(pollutant);
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidConcentration { pollutant, value });
        }
    }

    Ok(())
}

/// Validates that a year is a plausible measurement year.
///
/// # Errors
///
/// Returns an error if the year is not between 1900 and 2200.
pub fn validate_year(year: i32) -> Result<(), DomainError> {
    if !(1900..=2200).contains(&year) {
        return Err(DomainError::InvalidYear { year });
    }
    Ok(())
}
