// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use envdash_domain::{LegacyRecord, MeasurementPatch};
use envdash_persistence::Persistence;
use serde_json::json;

use crate::auth::AuthenticatedAccount;
use crate::request_response::SignupRequest;

pub const TEST_EMAIL: &str = "analyst@example.com";
pub const TEST_PASSWORD: &str = "Benzene-42";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .unwrap()
        .with_password_cost(4) // bcrypt minimum cost; bcrypt::MIN_COST is private
}

pub fn create_test_signup() -> SignupRequest {
    SignupRequest {
        name: String::from("Air Analyst"),
        email: String::from(TEST_EMAIL),
        password: String::from(TEST_PASSWORD),
        password_confirmation: None,
    }
}

/// Creates an account directly in the store and returns it as the caller.
pub fn create_test_account(persistence: &mut Persistence) -> AuthenticatedAccount {
    let account_id: i64 = persistence
        .create_account(TEST_EMAIL, "Air Analyst", TEST_PASSWORD)
        .unwrap();
    let account = persistence.get_account_by_id(account_id).unwrap().unwrap();
    AuthenticatedAccount::from(&account)
}

pub fn create_test_patch(year: i32, month: u8, location: &str) -> MeasurementPatch {
    MeasurementPatch {
        year: Some(year),
        month: Some(month),
        location: Some(String::from(location)),
        benzene: Some(3.2),
        toluene: Some(1.1),
        no: Some(9.4),
    }
}

pub fn create_test_document(location: &str, month_year: &str, benzene: f64) -> LegacyRecord {
    serde_json::from_value(json!({
        "City": location,
        "Month - Year": month_year,
        "Benzene (µg/m3)": benzene,
        "Toluene (µg/m3)": 1.1,
        "NO (µg/m3)": 9.4,
    }))
    .unwrap()
}
