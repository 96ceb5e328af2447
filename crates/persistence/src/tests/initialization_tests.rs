// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other test module opens an in-memory database, so connection setup
//! and migrations are exercised throughout; these tests pin down isolation
//! and start-up checks explicitly.

use envdash_domain::FilterSpec;

use crate::Persistence;
use crate::tests::{create_test_measurement, create_test_persistence};

#[test]
fn test_persistence_initialization() {
    assert!(Persistence::new_in_memory().is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    db1.create_record(&create_test_measurement(2021, 4, "Delhi"))
        .unwrap();

    let spec = FilterSpec::SingleYear { year: 2021 };
    assert_eq!(db1.list_records(&spec).unwrap().len(), 1);
    assert!(
        db2.list_records(&spec).unwrap().is_empty(),
        "db2 should not see rows written to db1"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence: Persistence = create_test_persistence();

    assert!(persistence.list_documents().unwrap().is_empty());
    assert!(persistence.get_account_by_id(1).unwrap().is_none());
}
