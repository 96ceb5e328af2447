// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// The year assumed whenever a year cannot be determined.
pub const DEFAULT_YEAR: i32 = 2021;

/// Identifier of a stored record.
///
/// Identifiers are assigned by the store, are stable across reads and are
/// never handed out again after the record is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a store-assigned identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The pollutants measured by the monitoring network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    Benzene,
    Toluene,
    NitricOxide,
}

impl Pollutant {
    /// All pollutants in reporting order.
    pub const ALL: [Self; 3] = [Self::Benzene, Self::Toluene, Self::NitricOxide];

    /// Short human-readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Benzene => "Benzene",
            Self::Toluene => "Toluene",
            Self::NitricOxide => "NO",
        }
    }

    /// The key this pollutant is stored under in spreadsheet imports.
    #[must_use]
    pub const fn legacy_key(&self) -> &'static str {
        match self {
            Self::Benzene => "Benzene (µg/m3)",
            Self::Toluene => "Toluene (µg/m3)",
            Self::NitricOxide => "NO (µg/m3)",
        }
    }
}

/// One monthly measurement at one location, without a store identifier.
///
/// Concentrations are in µg/m³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u8,
    pub location: String,
    #[serde(alias = "Benzene")]
    pub benzene: f64,
    #[serde(alias = "Toluene")]
    pub toluene: f64,
    #[serde(alias = "NO")]
    pub no: f64,
}

impl Measurement {
    /// Returns the concentration recorded for a pollutant.
    #[must_use]
    pub const fn concentration(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Benzene => self.benzene,
            Pollutant::Toluene => self.toluene,
            Pollutant::NitricOxide => self.no,
        }
    }

    /// Applies every field present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: &MeasurementPatch) {
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(month) = patch.month {
            self.month = month;
        }
        if let Some(location) = &patch.location {
            self.location.clone_from(location);
        }
        if let Some(benzene) = patch.benzene {
            self.benzene = benzene;
        }
        if let Some(toluene) = patch.toluene {
            self.toluene = toluene;
        }
        if let Some(no) = patch.no {
            self.no = no;
        }
    }
}

/// A stored canonical pollution record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub measurement: Measurement,
}

impl PollutionRecord {
    #[must_use]
    pub const fn new(id: RecordId, measurement: Measurement) -> Self {
        Self { id, measurement }
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.measurement.year
    }

    #[must_use]
    pub const fn month(&self) -> u8 {
        self.measurement.month
    }
}

/// A partial update to a measurement. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, alias = "Benzene", skip_serializing_if = "Option::is_none")]
    pub benzene: Option<f64>,
    #[serde(default, alias = "Toluene", skip_serializing_if = "Option::is_none")]
    pub toluene: Option<f64>,
    #[serde(default, alias = "NO", skip_serializing_if = "Option::is_none")]
    pub no: Option<f64>,
}

impl MeasurementPatch {
    /// Returns true when the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.location.is_none()
            && self.benzene.is_none()
            && self.toluene.is_none()
            && self.no.is_none()
    }

    /// Converts a complete patch into a measurement.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` naming the first absent field.
    pub fn into_measurement(self) -> Result<Measurement, crate::DomainError> {
        use crate::DomainError;

        Ok(Measurement {
            year: self.year.ok_or(DomainError::MissingField("year"))?,
            month: self.month.ok_or(DomainError::MissingField("month"))?,
            location: self.location.ok_or(DomainError::MissingField("location"))?,
            benzene: self.benzene.ok_or(DomainError::MissingField("benzene"))?,
            toluene: self.toluene.ok_or(DomainError::MissingField("toluene"))?,
            no: self.no.ok_or(DomainError::MissingField("no"))?,
        })
    }
}
