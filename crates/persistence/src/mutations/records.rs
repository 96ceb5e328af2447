// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical pollution record mutations.
//!
//! Callers validate measurements before they reach this layer; the table's
//! CHECK constraints are a backstop only.

use diesel::SqliteConnection;
use diesel::prelude::*;
use envdash_domain::{Measurement, RecordId};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::pollution_records;
use crate::error::PersistenceError;

/// Inserts a record and returns its new ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_record(
    conn: &mut SqliteConnection,
    measurement: &Measurement,
) -> Result<RecordId, PersistenceError> {
    diesel::insert_into(pollution_records::table)
        .values((
            pollution_records::year.eq(measurement.year),
            pollution_records::month.eq(i32::from(measurement.month)),
            pollution_records::location.eq(&measurement.location),
            pollution_records::benzene.eq(measurement.benzene),
            pollution_records::toluene.eq(measurement.toluene),
            pollution_records::nitric_oxide.eq(measurement.no),
        ))
        .execute(conn)?;

    let record_id: i64 = conn.get_last_insert_rowid()?;

    info!(
        record_id,
        year = measurement.year,
        month = measurement.month,
        location = %measurement.location,
        "Pollution record created"
    );
    Ok(RecordId::new(record_id))
}

/// Overwrites every field of an existing record.
///
/// # Errors
///
/// Returns [`PersistenceError::RecordNotFound`] if no record has this ID, or
/// an error if the update fails.
pub fn update_record(
    conn: &mut SqliteConnection,
    id: RecordId,
    measurement: &Measurement,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(pollution_records::table)
        .filter(pollution_records::record_id.eq(id.value()))
        .set((
            pollution_records::year.eq(measurement.year),
            pollution_records::month.eq(i32::from(measurement.month)),
            pollution_records::location.eq(&measurement.location),
            pollution_records::benzene.eq(measurement.benzene),
            pollution_records::toluene.eq(measurement.toluene),
            pollution_records::nitric_oxide.eq(measurement.no),
            pollution_records::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::RecordNotFound(id.value()));
    }

    info!(record_id = id.value(), "Pollution record updated");
    Ok(())
}

/// Deletes a record.
///
/// # Errors
///
/// Returns [`PersistenceError::RecordNotFound`] if no record has this ID, or
/// an error if the delete fails.
pub fn delete_record(conn: &mut SqliteConnection, id: RecordId) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(pollution_records::table)
        .filter(pollution_records::record_id.eq(id.value()))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::RecordNotFound(id.value()));
    }

    info!(record_id = id.value(), "Pollution record deleted");
    Ok(())
}
