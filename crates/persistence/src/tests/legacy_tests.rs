// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Legacy document persistence tests.

use envdash_domain::LegacyRecord;
use serde_json::json;

use crate::tests::create_test_persistence;
use crate::{Persistence, PersistenceError, StoredDocument};

fn create_test_document(city: &str, period: &str) -> LegacyRecord {
    serde_json::from_value(json!({
        "City": city,
        "Month - Year": period,
        "Benzene (µg/m3)": "2.5",
        "Station": "ITO"
    }))
    .unwrap()
}

#[test]
fn test_documents_are_stored_verbatim() {
    let mut persistence: Persistence = create_test_persistence();
    let document: LegacyRecord = create_test_document("Delhi", "Mar-21");

    let id: i64 = persistence.create_document(&document).unwrap();
    let stored: StoredDocument = persistence.get_document(id).unwrap().unwrap();

    assert_eq!(stored.document_id, id);
    assert_eq!(stored.document, document);
}

#[test]
fn test_list_returns_documents_in_insertion_order() {
    let mut persistence: Persistence = create_test_persistence();
    let first: i64 = persistence
        .create_document(&create_test_document("Delhi", "Mar-21"))
        .unwrap();
    let second: i64 = persistence
        .create_document(&create_test_document("Agra", "Jan-20"))
        .unwrap();

    let ids: Vec<i64> = persistence
        .list_documents()
        .unwrap()
        .iter()
        .map(|stored| stored.document_id)
        .collect();

    assert_eq!(ids, vec![first, second]);
}

#[test]
fn test_create_documents_returns_every_id() {
    let mut persistence: Persistence = create_test_persistence();
    let documents: Vec<LegacyRecord> = vec![
        create_test_document("Delhi", "Mar-21"),
        create_test_document("Agra", "Apr-21"),
        LegacyRecord::new(),
    ];

    let ids: Vec<i64> = persistence.create_documents(&documents).unwrap();

    assert_eq!(ids.len(), 3);
    assert_eq!(persistence.list_documents().unwrap().len(), 3);
}

#[test]
fn test_replace_document_overwrites_body() {
    let mut persistence: Persistence = create_test_persistence();
    let id: i64 = persistence
        .create_document(&create_test_document("Delhi", "Mar-21"))
        .unwrap();
    let replacement: LegacyRecord = create_test_document("Pune", "Dec-19");

    persistence.replace_document(id, &replacement).unwrap();

    assert_eq!(
        persistence.get_document(id).unwrap().unwrap().document,
        replacement
    );
}

#[test]
fn test_missing_document_operations_fail() {
    let mut persistence: Persistence = create_test_persistence();

    assert!(persistence.get_document(9).unwrap().is_none());
    assert_eq!(
        persistence.replace_document(9, &LegacyRecord::new()),
        Err(PersistenceError::DocumentNotFound(9))
    );
    assert_eq!(
        persistence.delete_document(9),
        Err(PersistenceError::DocumentNotFound(9))
    );
}

#[test]
fn test_delete_document() {
    let mut persistence: Persistence = create_test_persistence();
    let id: i64 = persistence
        .create_document(&create_test_document("Delhi", "Mar-21"))
        .unwrap();

    persistence.delete_document(id).unwrap();

    assert!(persistence.get_document(id).unwrap().is_none());
}
