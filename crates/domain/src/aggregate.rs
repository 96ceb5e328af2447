// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trend series and averages over canonical records, used for charts and
//! dashboard summary figures.

use serde::{Deserialize, Serialize};

use crate::types::{Pollutant, PollutionRecord};

/// Concentrations of one record, keyed by its month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: u8,
    pub benzene: f64,
    pub toluene: f64,
    pub no: f64,
}

/// Record count and average concentrations over a set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantSummary {
    pub count: usize,
    pub avg_benzene: f64,
    pub avg_toluene: f64,
    pub avg_no: f64,
}

#[derive(Default)]
struct Accumulator {
    samples: f64,
    totals: [f64; 3],
}

impl Accumulator {
    fn add(&mut self, record: &PollutionRecord) {
        self.samples += 1.0;
        for (total, pollutant) in self.totals.iter_mut().zip(Pollutant::ALL) {
            *total += record.measurement.concentration(pollutant);
        }
    }

    /// Averages in `Pollutant::ALL` order; all zero when empty.
    fn averages(&self) -> [f64; 3] {
        if self.samples < 1.0 {
            return [0.0; 3];
        }
        self.totals.map(|total| total / self.samples)
    }
}

/// Builds the trend series for `year`: one entry per record, ordered by
/// month and then by record ID.
///
/// Records from other years are ignored. Several locations reporting the
/// same month each keep their own entry.
#[must_use]
pub fn monthly_trends(records: &[PollutionRecord], year: i32) -> Vec<MonthlyTrend> {
    let mut in_year: Vec<&PollutionRecord> = records
        .iter()
        .filter(|record| record.year() == year)
        .collect();
    in_year.sort_by_key(|record| (record.month(), record.id.value()));

    in_year
        .into_iter()
        .map(|record| MonthlyTrend {
            month: record.month(),
            benzene: record.measurement.benzene,
            toluene: record.measurement.toluene,
            no: record.measurement.no,
        })
        .collect()
}

/// Summarises a set of records. An empty set yields zero averages.
#[must_use]
pub fn summarize(records: &[PollutionRecord]) -> PollutantSummary {
    let mut accumulator: Accumulator = Accumulator::default();
    for record in records {
        accumulator.add(record);
    }
    let [avg_benzene, avg_toluene, avg_no] = accumulator.averages();

    PollutantSummary {
        count: records.len(),
        avg_benzene,
        avg_toluene,
        avg_no,
    }
}
