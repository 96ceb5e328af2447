// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Spreadsheet CSV parsing for legacy imports.
//!
//! The first row names the columns. Each following row becomes one legacy
//! document whose values are the raw cell text, so `"Benzene (µg/m3)"`
//! arrives as a string and is coerced later by the normalizer.

use csv::StringRecord;
use envdash_domain::LegacyRecord;
use serde_json::Value;

use crate::error::ApiError;

fn invalid_csv(message: String) -> ApiError {
    ApiError::InvalidInput {
        field: String::from("csv"),
        message,
    }
}

/// Parses CSV text into legacy documents.
///
/// Header names and cells are trimmed. Empty cells are omitted from the
/// document, and rows with no non-empty cell are skipped.
///
/// # Errors
///
/// Returns an error if the header row is missing, a header is blank or
/// repeated, or any row fails to parse. No documents are returned in
/// that case.
pub fn parse_legacy_csv(csv_content: &str) -> Result<Vec<LegacyRecord>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| invalid_csv(format!("Failed to read CSV headers: {e}")))?
        .clone();

    if headers.iter().all(str::is_empty) {
        return Err(invalid_csv(String::from("CSV header row is missing")));
    }
    for (idx, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(invalid_csv(format!("Column {} has no header", idx + 1)));
        }
        if headers.iter().take(idx).any(|earlier| earlier == header) {
            return Err(invalid_csv(format!("Duplicate column header '{header}'")));
        }
    }

    let mut documents: Vec<LegacyRecord> = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1
        let line: usize = idx + 2;
        let row: StringRecord =
            result.map_err(|e| invalid_csv(format!("CSV parse error on line {line}: {e}")))?;

        let mut document: LegacyRecord = LegacyRecord::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if !cell.is_empty() {
                document.insert(header, Value::String(cell.to_string()));
            }
        }

        if !document.is_empty() {
            documents.push(document);
        }
    }

    Ok(documents)
}
