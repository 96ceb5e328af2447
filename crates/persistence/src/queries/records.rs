// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical pollution record queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use envdash_domain::{FilterSpec, Measurement, PollutionRecord, RecordId};
use tracing::debug;

use crate::diesel_schema::pollution_records;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = pollution_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct RecordRow {
    record_id: i64,
    year: i32,
    month: i32,
    location: String,
    benzene: f64,
    toluene: f64,
    nitric_oxide: f64,
}

impl RecordRow {
    fn into_record(self) -> Result<PollutionRecord, PersistenceError> {
        let month: u8 = u8::try_from(self.month).map_err(|_| {
            PersistenceError::CorruptRow(format!(
                "record {} has month {}",
                self.record_id, self.month
            ))
        })?;

        Ok(PollutionRecord::new(
            RecordId::new(self.record_id),
            Measurement {
                year: self.year,
                month,
                location: self.location,
                benzene: self.benzene,
                toluene: self.toluene,
                no: self.nitric_oxide,
            },
        ))
    }
}

/// Lists the records matching `spec`, ordered by year, month, then ID.
///
/// Inverted ranges match nothing.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_records(
    conn: &mut SqliteConnection,
    spec: &FilterSpec,
) -> Result<Vec<PollutionRecord>, PersistenceError> {
    debug!(?spec, "Listing pollution records");

    let mut query = pollution_records::table
        .select(RecordRow::as_select())
        .order_by((
            pollution_records::year.asc(),
            pollution_records::month.asc(),
            pollution_records::record_id.asc(),
        ))
        .into_boxed();

    query = match *spec {
        FilterSpec::SingleYear { year } => query.filter(pollution_records::year.eq(year)),
        FilterSpec::YearRange {
            start_year,
            end_year,
        } => query
            .filter(pollution_records::year.ge(start_year))
            .filter(pollution_records::year.le(end_year)),
        FilterSpec::YearMonthRange {
            year,
            start_month,
            end_month,
        } => query
            .filter(pollution_records::year.eq(year))
            .filter(pollution_records::month.ge(i32::from(start_month)))
            .filter(pollution_records::month.le(i32::from(end_month))),
    };

    let rows: Vec<RecordRow> = query.load(conn)?;
    rows.into_iter().map(RecordRow::into_record).collect()
}

/// Retrieves a record by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the record is not found.
pub fn get_record(
    conn: &mut SqliteConnection,
    id: RecordId,
) -> Result<Option<PollutionRecord>, PersistenceError> {
    debug!(record_id = id.value(), "Looking up pollution record");

    pollution_records::table
        .filter(pollution_records::record_id.eq(id.value()))
        .select(RecordRow::as_select())
        .first(conn)
        .optional()?
        .map(RecordRow::into_record)
        .transpose()
}
