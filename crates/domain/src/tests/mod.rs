// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod aggregate;
mod filter;

use crate::{Measurement, PollutionRecord, RecordId};

pub fn create_test_measurement(year: i32, month: u8) -> Measurement {
    Measurement {
        year,
        month,
        location: String::from("Delhi"),
        benzene: 3.2,
        toluene: 1.1,
        no: 9.4,
    }
}

pub fn create_test_record(id: i64, year: i32, month: u8) -> PollutionRecord {
    PollutionRecord::new(RecordId::new(id), create_test_measurement(year, month))
}
