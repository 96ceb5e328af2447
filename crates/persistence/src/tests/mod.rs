// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod legacy_tests;

use envdash_domain::Measurement;

use crate::Persistence;

/// In-memory persistence with the cheapest bcrypt cost.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("in-memory database")
        .with_password_cost(4) // bcrypt minimum cost; bcrypt::MIN_COST is private
}

pub fn create_test_measurement(year: i32, month: u8, location: &str) -> Measurement {
    Measurement {
        year,
        month,
        location: String::from(location),
        benzene: 3.2,
        toluene: 1.1,
        no: 9.4,
    }
}
