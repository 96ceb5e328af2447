// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod aggregate;
mod error;
mod filter;
mod month;
mod normalize;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use aggregate::{MonthlyTrend, PollutantSummary, monthly_trends, summarize};
pub use error::DomainError;
pub use filter::{FilterParams, FilterSpec, select, sort_chronologically};
pub use month::{abbreviation_for_month, month_from_abbreviation};
pub use normalize::{
    CITY_KEY, CITY_KEY_LOWERCASE, DecodeIssue, Decoded, LegacyRecord, MONTH_YEAR_KEY,
    decode_legacy, to_canonical, to_legacy,
};
pub use types::{
    DEFAULT_YEAR, Measurement, MeasurementPatch, Pollutant, PollutionRecord, RecordId,
};
pub use validation::{validate_measurement, validate_year};
