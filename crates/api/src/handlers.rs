// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Handlers take the persistence layer and, for protected operations, the
//! [`AuthenticatedAccount`] resolved from the bearer token. They never build
//! canonical or legacy shapes by hand: the normalizer is the only path
//! between the two.

use envdash_domain::{
    FilterParams, FilterSpec, LegacyRecord, Measurement, MeasurementPatch, MonthlyTrend,
    PollutantSummary, PollutionRecord, RecordId, monthly_trends, select, sort_chronologically,
    summarize, to_canonical, to_legacy, validate_measurement,
};
use envdash_persistence::{Persistence, StoredDocument};
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{AuthenticatedAccount, AuthenticationService, IssuedSession};
use crate::csv_import::parse_legacy_csv;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AccountInfo, DeleteResponse, ImportResponse, LoginRequest, LoginResponse, MessageResponse,
    SignupRequest, TrendsQuery, TrendsResponse,
};

/// Key carrying the document ID in legacy responses.
pub const LEGACY_ID_KEY: &str = "id";

/// Liveness message.
#[must_use]
pub fn health() -> MessageResponse {
    MessageResponse::new("API is running.")
}

// ========================================================================
// Accounts
// ========================================================================

/// Creates an account.
///
/// # Errors
///
/// Returns an error if:
/// - The name or email is blank
/// - The password violates the password policy
/// - The email is already registered
pub fn signup(
    persistence: &mut Persistence,
    request: &SignupRequest,
) -> Result<AccountInfo, ApiError> {
    let name: &str = request.name.trim();
    let email: &str = request.email.trim();

    if name.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Name cannot be empty"),
        });
    }
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("'{email}' is not a valid email address"),
        });
    }

    let confirmation: &str = request
        .password_confirmation
        .as_deref()
        .unwrap_or(&request.password);
    PasswordPolicy::default().validate(&request.password, confirmation, email, name)?;

    let account_id: i64 = persistence
        .create_account(email, name, &request.password)
        .map_err(translate_persistence_error)?;

    let account = persistence
        .get_account_by_id(account_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Account not found after creation"),
        })?;

    Ok(AccountInfo {
        id: account.account_id,
        name: account.display_name,
        email: account.email,
    })
}

/// Logs in and issues a bearer token.
///
/// # Errors
///
/// Returns an error if the credentials are wrong.
pub fn login(
    persistence: &mut Persistence,
    auth: &AuthenticationService,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let session: IssuedSession = auth.login(persistence, &request.email, &request.password)?;

    Ok(LoginResponse {
        token: session.token,
        name: session.account.display_name,
        email: session.account.email,
        expires_at: session.expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    session_token: &str,
) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    info!(account_id = account.account_id, "Account logged out");
    Ok(MessageResponse::new("Logged out"))
}

/// Returns the current account.
#[must_use]
pub fn whoami(account: &AuthenticatedAccount) -> AccountInfo {
    AccountInfo {
        id: account.account_id,
        name: account.display_name.clone(),
        email: account.email.clone(),
    }
}

// ========================================================================
// Canonical Records
// ========================================================================

/// Lists records matching the filter, in chronological order.
///
/// No filter parameters selects the default year.
///
/// # Errors
///
/// Returns an error if the filter is malformed or the query fails.
pub fn list_records(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    params: &FilterParams,
) -> Result<Vec<PollutionRecord>, ApiError> {
    let spec: FilterSpec = params.resolve().map_err(translate_domain_error)?;

    let records: Vec<PollutionRecord> = persistence
        .list_records(&spec)
        .map_err(translate_persistence_error)?;

    debug!(account_id = account.account_id, ?spec, count = records.len(), "Listed records");
    Ok(records)
}

/// Retrieves one record.
///
/// # Errors
///
/// Returns an error if the record does not exist.
pub fn get_record(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    id: i64,
) -> Result<PollutionRecord, ApiError> {
    debug!(account_id = account.account_id, record_id = id, "Fetching record");
    find_record(persistence, RecordId::new(id))
}

/// Creates a record from a complete set of fields.
///
/// # Errors
///
/// Returns an error if a field is missing or invalid, or the insert fails.
pub fn create_record(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    request: MeasurementPatch,
) -> Result<PollutionRecord, ApiError> {
    let measurement: Measurement = request.into_measurement().map_err(translate_domain_error)?;
    validate_measurement(&measurement).map_err(translate_domain_error)?;

    let record: PollutionRecord = persistence
        .create_record(&measurement)
        .map_err(translate_persistence_error)?;

    info!(
        account_id = account.account_id,
        record_id = record.id.value(),
        "Record created"
    );
    Ok(record)
}

/// Applies the supplied fields to an existing record.
///
/// # Errors
///
/// Returns an error if the record does not exist, no field is supplied, or
/// the updated record is invalid.
pub fn update_record(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    id: i64,
    patch: &MeasurementPatch,
) -> Result<PollutionRecord, ApiError> {
    let mut record: PollutionRecord = find_record(persistence, RecordId::new(id))?;

    if patch.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("body"),
            message: String::from("No fields to update"),
        });
    }

    record.measurement.apply(patch);
    validate_measurement(&record.measurement).map_err(translate_domain_error)?;

    let updated: PollutionRecord = persistence
        .update_record(record.id, &record.measurement)
        .map_err(translate_persistence_error)?;

    info!(account_id = account.account_id, record_id = id, "Record updated");
    Ok(updated)
}

/// Deletes a record.
///
/// # Errors
///
/// Returns an error if the record does not exist.
pub fn delete_record(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    id: i64,
) -> Result<DeleteResponse, ApiError> {
    persistence
        .delete_record(RecordId::new(id))
        .map_err(translate_persistence_error)?;

    info!(account_id = account.account_id, record_id = id, "Record deleted");
    Ok(DeleteResponse {
        message: String::from("Record deleted successfully"),
        id,
    })
}

/// Builds the monthly trend series for one year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn record_trends(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    query: &TrendsQuery,
) -> Result<TrendsResponse, ApiError> {
    let year: i32 = query.year_or_default();

    let records: Vec<PollutionRecord> = persistence
        .list_records(&FilterSpec::SingleYear { year })
        .map_err(translate_persistence_error)?;
    let trends: Vec<MonthlyTrend> = monthly_trends(&records, year);

    debug!(account_id = account.account_id, year, months = trends.len(), "Built trends");
    Ok(TrendsResponse {
        year,
        monthly_trends: trends,
    })
}

/// Summarizes the records matching the filter.
///
/// # Errors
///
/// Returns an error if the filter is malformed or the query fails.
pub fn record_summary(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    params: &FilterParams,
) -> Result<PollutantSummary, ApiError> {
    let records: Vec<PollutionRecord> = list_records(persistence, account, params)?;
    Ok(summarize(&records))
}

fn find_record(persistence: &mut Persistence, id: RecordId) -> Result<PollutionRecord, ApiError> {
    persistence
        .get_record(id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: format!("Record {id} does not exist"),
        })
}

// ========================================================================
// Legacy Documents
// ========================================================================

/// Lists legacy documents in normalized legacy shape.
///
/// Without filter parameters every document is listed; with any, the
/// resolved filter is applied. The result is in chronological order and
/// holds at most `page_limit` documents.
///
/// # Errors
///
/// Returns an error if the filter is malformed or the query fails.
pub fn list_legacy(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    params: &FilterParams,
    page_limit: usize,
) -> Result<Vec<LegacyRecord>, ApiError> {
    let spec: Option<FilterSpec> = if params.is_empty() {
        None
    } else {
        Some(params.resolve().map_err(translate_domain_error)?)
    };

    let documents: Vec<StoredDocument> = persistence
        .list_documents()
        .map_err(translate_persistence_error)?;

    let normalized: Vec<PollutionRecord> = documents
        .iter()
        .map(|stored| {
            PollutionRecord::new(
                RecordId::new(stored.document_id),
                to_canonical(&stored.document),
            )
        })
        .collect();

    let mut selected: Vec<PollutionRecord> = match spec {
        Some(spec) => select(&normalized, &spec),
        None => normalized,
    };
    sort_chronologically(&mut selected);
    selected.truncate(page_limit);

    debug!(
        account_id = account.account_id,
        count = selected.len(),
        "Listed legacy documents"
    );

    Ok(selected
        .iter()
        .map(|record| with_id(to_legacy(&record.measurement), record.id.value()))
        .collect())
}

/// Retrieves one legacy document in normalized legacy shape.
///
/// # Errors
///
/// Returns an error if the document does not exist.
pub fn get_legacy(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    id: i64,
) -> Result<LegacyRecord, ApiError> {
    debug!(account_id = account.account_id, document_id = id, "Fetching legacy document");
    let stored: StoredDocument = find_document(persistence, id)?;
    Ok(normalized(&stored.document, id))
}

/// Stores a legacy document as given and returns its normalized form.
///
/// Any client-supplied `id` key is dropped; the store assigns the ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_legacy(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    mut document: LegacyRecord,
) -> Result<LegacyRecord, ApiError> {
    document.remove(LEGACY_ID_KEY);

    let id: i64 = persistence
        .create_document(&document)
        .map_err(translate_persistence_error)?;

    info!(account_id = account.account_id, document_id = id, "Legacy document created");
    Ok(normalized(&document, id))
}

/// Merges the supplied top-level keys into a stored document and returns
/// the normalized result.
///
/// # Errors
///
/// Returns an error if the document does not exist or the update fails.
pub fn update_legacy(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    id: i64,
    mut update: LegacyRecord,
) -> Result<LegacyRecord, ApiError> {
    let mut stored: StoredDocument = find_document(persistence, id)?;

    update.remove(LEGACY_ID_KEY);
    stored.document.merge(update);

    persistence
        .replace_document(id, &stored.document)
        .map_err(translate_persistence_error)?;

    info!(account_id = account.account_id, document_id = id, "Legacy document updated");
    Ok(normalized(&stored.document, id))
}

/// Deletes a legacy document.
///
/// # Errors
///
/// Returns an error if the document does not exist.
pub fn delete_legacy(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    id: i64,
) -> Result<DeleteResponse, ApiError> {
    persistence
        .delete_document(id)
        .map_err(translate_persistence_error)?;

    info!(account_id = account.account_id, document_id = id, "Legacy document deleted");
    Ok(DeleteResponse {
        message: String::from("Document deleted successfully"),
        id,
    })
}

/// Imports every row of a CSV spreadsheet as a legacy document.
///
/// # Errors
///
/// Returns an error if the CSV is malformed or contains no rows, or the
/// insert fails. Nothing is stored on error.
pub fn import_legacy_csv(
    persistence: &mut Persistence,
    account: &AuthenticatedAccount,
    csv_content: &str,
) -> Result<ImportResponse, ApiError> {
    let documents: Vec<LegacyRecord> = parse_legacy_csv(csv_content)?;

    if documents.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("csv"),
            message: String::from("CSV contains no data rows"),
        });
    }

    let ids: Vec<i64> = persistence
        .create_documents(&documents)
        .map_err(translate_persistence_error)?;

    info!(
        account_id = account.account_id,
        imported = ids.len(),
        "Legacy CSV imported"
    );
    Ok(ImportResponse {
        imported: ids.len(),
        ids,
    })
}

fn find_document(persistence: &mut Persistence, id: i64) -> Result<StoredDocument, ApiError> {
    persistence
        .get_document(id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Document"),
            message: format!("Document {id} does not exist"),
        })
}

/// The response shape of a stored document: decoded, re-encoded and tagged.
fn normalized(document: &LegacyRecord, id: i64) -> LegacyRecord {
    with_id(to_legacy(&to_canonical(document)), id)
}

fn with_id(mut document: LegacyRecord, id: i64) -> LegacyRecord {
    document.insert(LEGACY_ID_KEY, Value::from(id));
    document
}
