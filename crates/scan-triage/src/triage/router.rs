use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{ScanId, ScanStatus};
use super::repository::ScanRepository;
use super::service::{TriageError, TriageService};
use super::worklist::WorklistFilter;

/// Router builder exposing the worklist, scan detail, and status update endpoints.
pub fn triage_router<R>(service: Arc<TriageService<R>>) -> Router
where
    R: ScanRepository + 'static,
{
    Router::new()
        .route("/api/scans", get(list_handler::<R>))
        .route(
            "/api/scans/:scan_id",
            get(detail_handler::<R>).patch(update_status_handler::<R>),
        )
        .route("/api/worklist/summary", get(summary_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WorklistQuery {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusUpdateRequest {
    #[serde(default)]
    status: Option<String>,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<TriageService<R>>>,
    Query(query): Query<WorklistQuery>,
) -> Response
where
    R: ScanRepository + 'static,
{
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => match ScanStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Unsupported status filter '{raw}'"),
                )
            }
        },
    };

    let filter = WorklistFilter {
        status,
        search: query.search,
    };

    match service.worklist(&filter) {
        Ok(scans) => (StatusCode::OK, axum::Json(scans)).into_response(),
        Err(err) => triage_error_response(err),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<TriageService<R>>>,
    Path(scan_id): Path<String>,
) -> Response
where
    R: ScanRepository + 'static,
{
    match service.get(&ScanId(scan_id)) {
        Ok(scan) => (StatusCode::OK, axum::Json(scan)).into_response(),
        Err(err) => triage_error_response(err),
    }
}

pub(crate) async fn update_status_handler<R>(
    State(service): State<Arc<TriageService<R>>>,
    Path(scan_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: ScanRepository + 'static,
{
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        StatusUpdateRequest::default()
    } else {
        match serde_json::from_slice::<StatusUpdateRequest>(&body) {
            Ok(request) => request,
            Err(parse_err) => {
                // Unknown ids still win over a bad body.
                if let Err(err @ TriageError::NotFound(_)) = service.get(&ScanId(scan_id)) {
                    return triage_error_response(err);
                }
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid request body: {parse_err}"),
                );
            }
        }
    };

    match service.update_status(&ScanId(scan_id), request.status.as_deref()) {
        Ok(scan) => (StatusCode::OK, axum::Json(scan)).into_response(),
        Err(err) => triage_error_response(err),
    }
}

pub(crate) async fn summary_handler<R>(State(service): State<Arc<TriageService<R>>>) -> Response
where
    R: ScanRepository + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => triage_error_response(err),
    }
}

fn triage_error_response(err: TriageError) -> Response {
    match err {
        TriageError::NotFound(_) => error_response(StatusCode::NOT_FOUND, err.to_string()),
        TriageError::InvalidInput(message) => error_response(StatusCode::BAD_REQUEST, message),
        TriageError::Repository(source) => {
            error!(error = %source, "scan repository failure");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, source.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}
