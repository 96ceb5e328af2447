// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Translation between canonical measurements and spreadsheet-import
//! ("opengds") documents.
//!
//! The import format is loosely typed: values may be numbers or strings and
//! keys may be missing entirely. Decoding never fails. Every field that cannot
//! be read falls back to a fixed default (January, [`DEFAULT_YEAR`], an empty
//! location, a zero concentration) and the fallback is reported as a
//! [`DecodeIssue`] so callers can log or surface it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::month::{abbreviation_for_month, month_from_abbreviation};
use crate::types::{DEFAULT_YEAR, Measurement, Pollutant};

/// Key holding the `"<MonAbbr>-<YY>"` period, e.g. `"Mar-21"`.
pub const MONTH_YEAR_KEY: &str = "Month - Year";
/// Key holding the city name.
pub const CITY_KEY: &str = "City";
/// Lower-case city key found in some imports.
pub const CITY_KEY_LOWERCASE: &str = "city";

/// A loosely-typed document from a spreadsheet import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacyRecord(Map<String, Value>);

impl LegacyRecord {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Overwrites this document's keys with every key present in `update`.
    ///
    /// Keys absent from `update` are kept.
    pub fn merge(&mut self, update: Self) {
        for (key, value) in update.0 {
            self.0.insert(key, value);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for LegacyRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A field that could not be decoded and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    /// No usable `"Month - Year"` value.
    MissingMonthYear,
    /// The month part is not a known abbreviation.
    UnknownMonth {
        /// The month text as found.
        raw: String,
    },
    /// The `"Month - Year"` value has no year part.
    MissingYear,
    /// The year part is not a number.
    UnparseableYear {
        /// The year text as found.
        raw: String,
    },
    /// Neither city key holds a usable value.
    MissingLocation,
    /// The pollutant key is absent or empty.
    MissingConcentration {
        /// The pollutant whose value is missing.
        pollutant: Pollutant,
    },
    /// The pollutant value is not a non-negative number.
    InvalidConcentration {
        /// The pollutant whose value is invalid.
        pollutant: Pollutant,
        /// The value as found.
        raw: String,
    },
}

impl std::fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMonthYear => {
                write!(f, "'{MONTH_YEAR_KEY}' missing, using Jan-{DEFAULT_YEAR}")
            }
            Self::UnknownMonth { raw } => write!(f, "unknown month '{raw}', using Jan"),
            Self::MissingYear => write!(f, "year missing, using {DEFAULT_YEAR}"),
            Self::UnparseableYear { raw } => {
                write!(f, "unparseable year '{raw}', using {DEFAULT_YEAR}")
            }
            Self::MissingLocation => write!(f, "'{CITY_KEY}' missing, using empty location"),
            Self::MissingConcentration { pollutant } => {
                write!(f, "'{}' missing, using 0", pollutant.legacy_key())
            }
            Self::InvalidConcentration { pollutant, raw } => {
                write!(f, "'{}' has invalid value {raw}, using 0", pollutant.legacy_key())
            }
        }
    }
}

/// The result of decoding a legacy document.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The best-effort measurement.
    pub measurement: Measurement,
    /// Every fallback that was applied, in field order.
    pub issues: Vec<DecodeIssue>,
}

/// Decodes a legacy document, reporting every fallback taken.
#[must_use]
pub fn decode_legacy(legacy: &LegacyRecord) -> Decoded {
    let mut issues: Vec<DecodeIssue> = Vec::new();

    let (month, year): (u8, i32) = decode_month_year(legacy.get(MONTH_YEAR_KEY), &mut issues);

    let location: String = [CITY_KEY, CITY_KEY_LOWERCASE]
        .iter()
        .find_map(|key| legacy.get(key).and_then(value_as_text))
        .unwrap_or_else(|| {
            issues.push(DecodeIssue::MissingLocation);
            String::new()
        });

    let mut concentrations: [f64; 3] = [0.0; 3];
    for (slot, pollutant) in concentrations.iter_mut().zip(Pollutant::ALL) {
        *slot = decode_concentration(legacy, pollutant, &mut issues);
    }
    let [benzene, toluene, no] = concentrations;

    Decoded {
        measurement: Measurement {
            year,
            month,
            location,
            benzene,
            toluene,
            no,
        },
        issues,
    }
}

/// Converts a legacy document into a canonical measurement.
///
/// Never fails; fallbacks are logged at warn level.
#[must_use]
pub fn to_canonical(legacy: &LegacyRecord) -> Measurement {
    let decoded: Decoded = decode_legacy(legacy);

    if !decoded.issues.is_empty() {
        let issues: Vec<String> = decoded.issues.iter().map(ToString::to_string).collect();
        warn!(
            issues = %issues.join("; "),
            location = %decoded.measurement.location,
            "Legacy record decoded with fallbacks"
        );
    }

    decoded.measurement
}

/// Converts a canonical measurement into a legacy document.
///
/// Months outside 1-12 are written as `"Jan"`. Years 2000-2099 are written
/// as two digits; any other year is written in full so it decodes back to
/// the same value.
#[must_use]
pub fn to_legacy(measurement: &Measurement) -> LegacyRecord {
    let mut legacy: LegacyRecord = LegacyRecord::new();

    legacy.insert(CITY_KEY, Value::String(measurement.location.clone()));
    legacy.insert(
        MONTH_YEAR_KEY,
        Value::String(format!(
            "{}-{}",
            abbreviation_for_month(measurement.month),
            year_suffix(measurement.year)
        )),
    );

    for pollutant in Pollutant::ALL {
        let value: f64 = sanitize_concentration(measurement.concentration(pollutant));
        let number: Value = Number::from_f64(value).map_or_else(|| Value::from(0), Value::Number);
        legacy.insert(pollutant.legacy_key(), number);
    }

    legacy
}

fn year_suffix(year: i32) -> String {
    if (2000..=2099).contains(&year) {
        format!("{:02}", year - 2000)
    } else {
        format!("{year:04}")
    }
}

fn decode_month_year(value: Option<&Value>, issues: &mut Vec<DecodeIssue>) -> (u8, i32) {
    let Some(raw) = value
        .and_then(value_as_text)
        .filter(|text| !text.trim().is_empty())
    else {
        issues.push(DecodeIssue::MissingMonthYear);
        return (1, DEFAULT_YEAR);
    };

    let mut parts = raw.split('-');
    let month_part: &str = parts.next().unwrap_or_default();
    let year_part: Option<&str> = parts.next().map(str::trim).filter(|part| !part.is_empty());

    let month: u8 = month_from_abbreviation(month_part).unwrap_or_else(|| {
        issues.push(DecodeIssue::UnknownMonth {
            raw: month_part.trim().to_string(),
        });
        1
    });

    let year: i32 = match year_part {
        None => {
            issues.push(DecodeIssue::MissingYear);
            DEFAULT_YEAR
        }
        Some(part) => parse_year(part).unwrap_or_else(|| {
            issues.push(DecodeIssue::UnparseableYear {
                raw: part.to_string(),
            });
            DEFAULT_YEAR
        }),
    };

    (month, year)
}

/// One or two digits are a year in the 2000s; three or more are a full year.
fn parse_year(part: &str) -> Option<i32> {
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i32 = part.parse().ok()?;
    if part.len() <= 2 {
        Some(2000 + value)
    } else {
        Some(value)
    }
}

fn decode_concentration(
    legacy: &LegacyRecord,
    pollutant: Pollutant,
    issues: &mut Vec<DecodeIssue>,
) -> f64 {
    let key: &str = pollutant.legacy_key();
    // Some spreadsheets spell the unit with the Greek mu instead of the micro sign.
    let alternate_key: String = key.replace('µ', "μ");
    let value: Option<&Value> = legacy.get(key).or_else(|| legacy.get(&alternate_key));

    let parsed: Option<f64> = match value {
        None | Some(Value::Null) => {
            issues.push(DecodeIssue::MissingConcentration { pollutant });
            return 0.0;
        }
        Some(Value::String(text)) if text.trim().is_empty() => {
            issues.push(DecodeIssue::MissingConcentration { pollutant });
            return 0.0;
        }
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        Some(Value::Array(_) | Value::Object(_)) => None,
    };

    match parsed {
        Some(number) if number.is_finite() && number >= 0.0 => number,
        _ => {
            issues.push(DecodeIssue::InvalidConcentration {
                pollutant,
                raw: value.map(ToString::to_string).unwrap_or_default(),
            });
            0.0
        }
    }
}

fn sanitize_concentration(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
