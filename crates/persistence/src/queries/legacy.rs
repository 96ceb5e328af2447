// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Legacy document queries.
//!
//! Documents are stored as JSON text and returned exactly as written;
//! normalization happens above this layer.

use diesel::SqliteConnection;
use diesel::prelude::*;
use envdash_domain::LegacyRecord;
use tracing::debug;

use crate::data_models::StoredDocument;
use crate::diesel_schema::opengds_documents;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = opengds_documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct DocumentRow {
    document_id: i64,
    document_json: String,
}

impl DocumentRow {
    fn into_stored(self) -> Result<StoredDocument, PersistenceError> {
        let document: LegacyRecord = serde_json::from_str(&self.document_json)?;
        Ok(StoredDocument {
            document_id: self.document_id,
            document,
        })
    }
}

/// Lists every stored document in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a document is not a JSON object.
pub fn list_documents(conn: &mut SqliteConnection) -> Result<Vec<StoredDocument>, PersistenceError> {
    debug!("Listing legacy documents");

    let rows: Vec<DocumentRow> = opengds_documents::table
        .select(DocumentRow::as_select())
        .order_by(opengds_documents::document_id.asc())
        .load(conn)?;

    rows.into_iter().map(DocumentRow::into_stored).collect()
}

/// Retrieves a document by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the document is not a JSON object.
/// Returns `Ok(None)` if the document is not found.
pub fn get_document(
    conn: &mut SqliteConnection,
    document_id: i64,
) -> Result<Option<StoredDocument>, PersistenceError> {
    debug!(document_id, "Looking up legacy document");

    opengds_documents::table
        .filter(opengds_documents::document_id.eq(document_id))
        .select(DocumentRow::as_select())
        .first(conn)
        .optional()?
        .map(DocumentRow::into_stored)
        .transpose()
}
