// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Legacy document mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use envdash_domain::LegacyRecord;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::opengds_documents;
use crate::error::PersistenceError;

/// Stores a document as given and returns its new ID.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized or inserted.
pub fn insert_document(
    conn: &mut SqliteConnection,
    document: &LegacyRecord,
) -> Result<i64, PersistenceError> {
    let document_json: String = serde_json::to_string(document)?;

    diesel::insert_into(opengds_documents::table)
        .values(opengds_documents::document_json.eq(&document_json))
        .execute(conn)?;

    let document_id: i64 = conn.get_last_insert_rowid()?;

    info!(document_id, keys = document.len(), "Legacy document stored");
    Ok(document_id)
}

/// Stores several documents in one transaction.
///
/// Either every document is stored or none is.
///
/// # Errors
///
/// Returns an error if any insert fails.
pub fn insert_documents(
    conn: &mut SqliteConnection,
    documents: &[LegacyRecord],
) -> Result<Vec<i64>, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        documents
            .iter()
            .map(|document| insert_document(conn, document))
            .collect()
    })
}

/// Replaces the stored body of an existing document.
///
/// # Errors
///
/// Returns [`PersistenceError::DocumentNotFound`] if no document has this
/// ID, or an error if the update fails.
pub fn replace_document(
    conn: &mut SqliteConnection,
    document_id: i64,
    document: &LegacyRecord,
) -> Result<(), PersistenceError> {
    let document_json: String = serde_json::to_string(document)?;

    let rows_affected: usize = diesel::update(opengds_documents::table)
        .filter(opengds_documents::document_id.eq(document_id))
        .set((
            opengds_documents::document_json.eq(&document_json),
            opengds_documents::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::DocumentNotFound(document_id));
    }

    info!(document_id, "Legacy document replaced");
    Ok(())
}

/// Deletes a document.
///
/// # Errors
///
/// Returns [`PersistenceError::DocumentNotFound`] if no document has this
/// ID, or an error if the delete fails.
pub fn delete_document(
    conn: &mut SqliteConnection,
    document_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(opengds_documents::table)
        .filter(opengds_documents::document_id.eq(document_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::DocumentNotFound(document_id));
    }

    info!(document_id, "Legacy document deleted");
    Ok(())
}
