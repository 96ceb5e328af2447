// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State as AxumState,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use envdash_api::{
    AccountInfo, ApiError, AuthenticationService, DeleteResponse, ImportResponse, LoginRequest,
    LoginResponse, MessageResponse, SignupRequest, TrendsQuery, TrendsResponse,
};
use envdash_domain::{
    FilterParams, LegacyRecord, MeasurementPatch, PollutantSummary, PollutionRecord,
};
use envdash_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use session::SessionAccount;

/// envdash server - HTTP API for environmental monitoring records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ENVDASH_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "ENVDASH_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "ENVDASH_PORT", default_value_t = 3000)]
    port: u16,

    /// Lifetime of a login session, in hours
    #[arg(long, env = "ENVDASH_SESSION_TTL_HOURS", default_value_t = 720)]
    session_ttl_hours: u32,

    /// bcrypt cost for new password hashes
    #[arg(long, env = "ENVDASH_BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    bcrypt_cost: u32,

    /// Maximum number of legacy documents returned by one listing
    #[arg(long, env = "ENVDASH_LEGACY_PAGE_LIMIT", default_value_t = 100)]
    legacy_page_limit: usize,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, serialized behind a mutex.
    persistence: Arc<Mutex<Persistence>>,
    /// Issues and validates session tokens.
    auth: AuthenticationService,
    /// Cap on legacy listings.
    legacy_page_limit: usize,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Unwraps a JSON body, turning any rejection into a 400.
fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    payload.map(|Json(value)| value).map_err(|rejection| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid request body: {}", rejection.body_text()),
    })
}

/// Unwraps a path ID, turning any rejection into a 400.
fn parse_path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, HttpError> {
    id.map(|Path(value)| value).map_err(|rejection| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid path: {}", rejection.body_text()),
    })
}

/// Unwraps query parameters, turning any rejection into a 400.
fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, HttpError> {
    query.map(|Query(value)| value).map_err(|rejection| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid query: {}", rejection.body_text()),
    })
}

// ========================================================================
// Health and Accounts
// ========================================================================

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<MessageResponse> {
    Json(envdash_api::health())
}

/// Handler for POST `/auth/signup` endpoint.
async fn handle_signup(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountInfo>), HttpError> {
    let req: SignupRequest = parse_json(payload)?;
    info!(email = %req.email, "Handling signup request");

    let mut persistence = app_state.persistence.lock().await;
    let account: AccountInfo = envdash_api::signup(&mut persistence, &req)?;
    drop(persistence);

    info!(account_id = account.id, "Account created");
    Ok((StatusCode::CREATED, Json(account)))
}

/// Handler for POST `/auth/login` endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, HttpError> {
    let req: LoginRequest = parse_json(payload)?;
    info!("Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = envdash_api::login(&mut persistence, &app_state.auth, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/logout` endpoint.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, token): SessionAccount,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = envdash_api::logout(&mut persistence, &account, &token)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/auth/whoami` endpoint.
async fn handle_whoami(SessionAccount(account, _): SessionAccount) -> Json<AccountInfo> {
    Json(envdash_api::whoami(&account))
}

// ========================================================================
// Canonical Records
// ========================================================================

/// Handler for GET `/records` endpoint.
async fn handle_list_records(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Vec<PollutionRecord>>, HttpError> {
    let params: FilterParams = parse_query(params)?;
    info!(account_id = account.account_id, "Handling list_records request");

    let mut persistence = app_state.persistence.lock().await;
    let records: Vec<PollutionRecord> =
        envdash_api::list_records(&mut persistence, &account, &params)?;
    drop(persistence);

    Ok(Json(records))
}

/// Handler for GET `/records/trends` endpoint.
async fn handle_record_trends(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    query: Result<Query<TrendsQuery>, QueryRejection>,
) -> Result<Json<TrendsResponse>, HttpError> {
    let query: TrendsQuery = parse_query(query)?;
    info!(account_id = account.account_id, "Handling record_trends request");

    let mut persistence = app_state.persistence.lock().await;
    let response: TrendsResponse = envdash_api::record_trends(&mut persistence, &account, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/records/summary` endpoint.
async fn handle_record_summary(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<PollutantSummary>, HttpError> {
    let params: FilterParams = parse_query(params)?;
    info!(account_id = account.account_id, "Handling record_summary request");

    let mut persistence = app_state.persistence.lock().await;
    let summary: PollutantSummary =
        envdash_api::record_summary(&mut persistence, &account, &params)?;
    drop(persistence);

    Ok(Json(summary))
}

/// Handler for GET `/records/{id}` endpoint.
async fn handle_get_record(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PollutionRecord>, HttpError> {
    let id: i64 = parse_path_id(id)?;
    let mut persistence = app_state.persistence.lock().await;
    let record: PollutionRecord = envdash_api::get_record(&mut persistence, &account, id)?;
    drop(persistence);

    Ok(Json(record))
}

/// Handler for POST `/records` endpoint.
async fn handle_create_record(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    payload: Result<Json<MeasurementPatch>, JsonRejection>,
) -> Result<(StatusCode, Json<PollutionRecord>), HttpError> {
    let req: MeasurementPatch = parse_json(payload)?;
    info!(account_id = account.account_id, "Handling create_record request");

    let mut persistence = app_state.persistence.lock().await;
    let record: PollutionRecord = envdash_api::create_record(&mut persistence, &account, req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for PUT `/records/{id}` endpoint.
async fn handle_update_record(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<MeasurementPatch>, JsonRejection>,
) -> Result<Json<PollutionRecord>, HttpError> {
    let id: i64 = parse_path_id(id)?;
    let patch: MeasurementPatch = parse_json(payload)?;
    info!(account_id = account.account_id, record_id = id, "Handling update_record request");

    let mut persistence = app_state.persistence.lock().await;
    let record: PollutionRecord =
        envdash_api::update_record(&mut persistence, &account, id, &patch)?;
    drop(persistence);

    Ok(Json(record))
}

/// Handler for DELETE `/records/{id}` endpoint.
async fn handle_delete_record(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let id: i64 = parse_path_id(id)?;
    info!(account_id = account.account_id, record_id = id, "Handling delete_record request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = envdash_api::delete_record(&mut persistence, &account, id)?;
    drop(persistence);

    Ok(Json(response))
}

// ========================================================================
// Legacy Documents
// ========================================================================

/// Handler for GET `/opengds` endpoint.
async fn handle_list_legacy(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Vec<LegacyRecord>>, HttpError> {
    let params: FilterParams = parse_query(params)?;
    info!(account_id = account.account_id, "Handling list_legacy request");

    let mut persistence = app_state.persistence.lock().await;
    let documents: Vec<LegacyRecord> = envdash_api::list_legacy(
        &mut persistence,
        &account,
        &params,
        app_state.legacy_page_limit,
    )?;
    drop(persistence);

    Ok(Json(documents))
}

/// Handler for GET `/opengds/{id}` endpoint.
async fn handle_get_legacy(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<LegacyRecord>, HttpError> {
    let id: i64 = parse_path_id(id)?;
    let mut persistence = app_state.persistence.lock().await;
    let document: LegacyRecord = envdash_api::get_legacy(&mut persistence, &account, id)?;
    drop(persistence);

    Ok(Json(document))
}

/// Handler for POST `/opengds` endpoint.
async fn handle_create_legacy(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    payload: Result<Json<LegacyRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<LegacyRecord>), HttpError> {
    let document: LegacyRecord = parse_json(payload)?;
    info!(account_id = account.account_id, "Handling create_legacy request");

    let mut persistence = app_state.persistence.lock().await;
    let created: LegacyRecord = envdash_api::create_legacy(&mut persistence, &account, document)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT `/opengds/{id}` endpoint.
async fn handle_update_legacy(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<LegacyRecord>, JsonRejection>,
) -> Result<Json<LegacyRecord>, HttpError> {
    let id: i64 = parse_path_id(id)?;
    let update: LegacyRecord = parse_json(payload)?;
    info!(account_id = account.account_id, document_id = id, "Handling update_legacy request");

    let mut persistence = app_state.persistence.lock().await;
    let updated: LegacyRecord =
        envdash_api::update_legacy(&mut persistence, &account, id, update)?;
    drop(persistence);

    Ok(Json(updated))
}

/// Handler for DELETE `/opengds/{id}` endpoint.
async fn handle_delete_legacy(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let id: i64 = parse_path_id(id)?;
    info!(account_id = account.account_id, document_id = id, "Handling delete_legacy request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = envdash_api::delete_legacy(&mut persistence, &account, id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/opengds/import` endpoint.
///
/// The body is raw CSV text.
async fn handle_import_legacy(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(account, _): SessionAccount,
    body: String,
) -> Result<(StatusCode, Json<ImportResponse>), HttpError> {
    info!(
        account_id = account.account_id,
        bytes = body.len(),
        "Handling import_legacy request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ImportResponse =
        envdash_api::import_legacy_csv(&mut persistence, &account, &body)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/signup", post(handle_signup))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/whoami", get(handle_whoami))
        .route(
            "/records",
            get(handle_list_records).post(handle_create_record),
        )
        .route("/records/trends", get(handle_record_trends))
        .route("/records/summary", get(handle_record_summary))
        .route(
            "/records/{id}",
            get(handle_get_record)
                .put(handle_update_record)
                .delete(handle_delete_record),
        )
        .route("/opengds", get(handle_list_legacy).post(handle_create_legacy))
        .route("/opengds/import", post(handle_import_legacy))
        .route(
            "/opengds/{id}",
            get(handle_get_legacy)
                .put(handle_update_legacy)
                .delete(handle_delete_legacy),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing envdash server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(
            persistence.with_password_cost(args.bcrypt_cost),
        )),
        auth: AuthenticationService::new(time::Duration::hours(i64::from(
            args.session_ttl_hours,
        ))),
        legacy_page_limit: args.legacy_page_limit,
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
