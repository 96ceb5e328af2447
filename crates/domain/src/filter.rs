// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::{DEFAULT_YEAR, PollutionRecord};

/// Selects records by year or by a range of years or months.
///
/// Exactly one mode is active. Inverted ranges are not swapped; they simply
/// match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FilterSpec {
    /// Records from one year.
    SingleYear { year: i32 },
    /// Records from `start_year` through `end_year`, inclusive.
    YearRange { start_year: i32, end_year: i32 },
    /// Records from one year whose month lies in `start_month..=end_month`.
    YearMonthRange {
        year: i32,
        start_month: u8,
        end_month: u8,
    },
}

impl Default for FilterSpec {
    /// Used when no filter is supplied at all.
    fn default() -> Self {
        Self::SingleYear { year: DEFAULT_YEAR }
    }
}

impl FilterSpec {
    /// Returns whether a record from `year`/`month` passes this filter.
    #[must_use]
    pub fn matches(&self, year: i32, month: u8) -> bool {
        match *self {
            Self::SingleYear { year: wanted } => year == wanted,
            Self::YearRange {
                start_year,
                end_year,
            } => (start_year..=end_year).contains(&year),
            Self::YearMonthRange {
                year: wanted,
                start_month,
                end_month,
            } => year == wanted && (start_month..=end_month).contains(&month),
        }
    }
}

/// Returns the records that pass `spec`, in their original relative order.
#[must_use]
pub fn select(records: &[PollutionRecord], spec: &FilterSpec) -> Vec<PollutionRecord> {
    records
        .iter()
        .filter(|record| spec.matches(record.year(), record.month()))
        .cloned()
        .collect()
}

/// Sorts records by `(year, month)` ascending.
///
/// The sort is stable, so records from the same month keep their order.
pub fn sort_chronologically(records: &mut [PollutionRecord]) {
    records.sort_by_key(|record| (record.year(), record.month()));
}

/// Raw filter query parameters as they arrive from a request.
///
/// Values are kept as text so that parse failures can be reported with the
/// parameter name. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Optional explicit mode: `singleYear`, `yearRange` or `yearMonthRange`.
    pub mode: Option<String>,
    pub year: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub start_month: Option<String>,
    pub end_month: Option<String>,
}

impl FilterParams {
    /// Returns true when no parameter carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.mode,
            &self.year,
            &self.start_year,
            &self.end_year,
            &self.start_month,
            &self.end_month,
        ]
        .iter()
        .all(|value| present(value).is_none())
    }

    /// Resolves the parameters into a single filter mode.
    ///
    /// With an explicit `mode`, only that mode's parameters are read. Without
    /// one, the mode is inferred from which parameters are present, and
    /// combinations that fit no single mode are rejected. No parameters at
    /// all yields [`FilterSpec::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if a value is not an integer, a required parameter
    /// is missing, the mode is unknown, or the parameters mix modes.
    pub fn resolve(&self) -> Result<FilterSpec, DomainError> {
        let year: Option<i32> = parse_param("year", &self.year)?;
        let start_year: Option<i32> = parse_param("startYear", &self.start_year)?;
        let end_year: Option<i32> = parse_param("endYear", &self.end_year)?;
        let start_month: Option<u8> = parse_param("startMonth", &self.start_month)?;
        let end_month: Option<u8> = parse_param("endMonth", &self.end_month)?;

        if let Some(mode) = present(&self.mode) {
            return match mode {
                "singleYear" => Ok(FilterSpec::SingleYear {
                    year: year.ok_or(DomainError::MissingField("year"))?,
                }),
                "yearRange" => Ok(FilterSpec::YearRange {
                    start_year: start_year.ok_or(DomainError::MissingField("startYear"))?,
                    end_year: end_year.ok_or(DomainError::MissingField("endYear"))?,
                }),
                "yearMonthRange" => Ok(FilterSpec::YearMonthRange {
                    year: year.ok_or(DomainError::MissingField("year"))?,
                    start_month: start_month.ok_or(DomainError::MissingField("startMonth"))?,
                    end_month: end_month.ok_or(DomainError::MissingField("endMonth"))?,
                }),
                other => Err(DomainError::AmbiguousFilter(format!(
                    "unknown mode '{other}'; expected singleYear, yearRange or yearMonthRange"
                ))),
            };
        }

        match (year, start_year, end_year, start_month, end_month) {
            (None, None, None, None, None) => Ok(FilterSpec::default()),
            (Some(year), None, None, None, None) => Ok(FilterSpec::SingleYear { year }),
            (None, Some(start_year), Some(end_year), None, None) => Ok(FilterSpec::YearRange {
                start_year,
                end_year,
            }),
            (Some(year), None, None, Some(start_month), Some(end_month)) => {
                Ok(FilterSpec::YearMonthRange {
                    year,
                    start_month,
                    end_month,
                })
            }
            (_, Some(_), None, _, _) | (_, None, Some(_), _, _) => Err(
                DomainError::AmbiguousFilter(String::from(
                    "startYear and endYear must be given together",
                )),
            ),
            (Some(_), Some(_), Some(_), _, _) => Err(DomainError::AmbiguousFilter(
                String::from("year cannot be combined with startYear/endYear"),
            )),
            (_, _, _, Some(_), None) | (_, _, _, None, Some(_)) => {
                Err(DomainError::AmbiguousFilter(String::from(
                    "startMonth and endMonth must be given together",
                )))
            }
            _ => Err(DomainError::AmbiguousFilter(String::from(
                "a month range requires a single year",
            ))),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty())
}

fn parse_param<T: std::str::FromStr>(
    parameter: &'static str,
    value: &Option<String>,
) -> Result<Option<T>, DomainError> {
    present(value)
        .map(|text| {
            text.parse::<T>()
                .map_err(|_| DomainError::InvalidFilterParameter {
                    parameter,
                    value: text.to_string(),
                })
        })
        .transpose()
}
