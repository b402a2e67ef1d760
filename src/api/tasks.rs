//! Task API endpoints.
//!
//! Every endpoint acts on the caller's session:
//! - read or replace the pending input
//! - analyze the pending input
//! - clear the pending input
//! - list and export recorded tasks
//! - end the session

use axum::{
    body::Bytes,
    extract::{Extension, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use super::routes::AppState;
use super::session::{expired_session_cookie, CurrentSession};
use super::types::*;
use crate::session::{AnalyzeOutcome, EMPTY_INPUT_WARNING};
use crate::task::{CsvExport, TaskRecord};

/// Create the task API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/input", get(get_input).put(update_input))
        .route("/analyze", post(analyze))
        .route("/clear", post(clear))
        .route("/tasks", get(list_tasks))
        .route("/tasks/export", get(export_tasks))
        .route("/session", delete(end_session))
}

/// GET /api/input
async fn get_input(Extension(session): Extension<CurrentSession>) -> Json<InputResponse> {
    let controller = session.controller.lock().await;
    Json(InputResponse {
        input: controller.input().to_string(),
    })
}

/// PUT /api/input
async fn update_input(
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<UpdateInputRequest>,
) -> Json<InputResponse> {
    let mut controller = session.controller.lock().await;
    controller.set_input(req.text);
    Json(InputResponse {
        input: controller.input().to_string(),
    })
}

/// POST /api/analyze
///
/// An empty body analyzes the pending input. Any other body must be a valid
/// `AnalyzeRequest`; a rejected body leaves the session untouched.
async fn analyze(
    Extension(session): Extension<CurrentSession>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let req = parse_analyze_request(&headers, &body)?;

    let mut controller = session.controller.lock().await;

    if let Some(description) = req.description {
        controller.set_input(description);
    }

    match controller.analyze() {
        Ok(AnalyzeOutcome::Analyzed(record)) => Ok(Json(record.into())),
        Ok(AnalyzeOutcome::EmptyInput) => {
            Err((StatusCode::BAD_REQUEST, EMPTY_INPUT_WARNING.to_string()))
        }
        Err(e) => {
            tracing::error!(session = %session.id, "Task analysis failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// POST /api/clear
async fn clear(Extension(session): Extension<CurrentSession>) -> Json<InputResponse> {
    let mut controller = session.controller.lock().await;
    controller.clear();
    Json(InputResponse {
        input: String::new(),
    })
}

/// GET /api/tasks - records in insertion order.
async fn list_tasks(Extension(session): Extension<CurrentSession>) -> Json<Vec<TaskRecord>> {
    let controller = session.controller.lock().await;
    Json(controller.store().all().to_vec())
}

/// GET /api/tasks/export
pub(super) async fn export_tasks(
    Extension(session): Extension<CurrentSession>,
) -> Result<Response, (StatusCode, String)> {
    let controller = session.controller.lock().await;
    let export = controller
        .export_csv()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    csv_response(export)
}

/// DELETE /api/session
async fn end_session(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let ended = state.sessions.end(session.id).await;

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&expired_session_cookie()) {
        headers.insert(header::SET_COOKIE, value);
    }

    (headers, Json(EndSessionResponse { ended })).into_response()
}

fn parse_analyze_request(
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<AnalyzeRequest, (StatusCode, String)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AnalyzeRequest::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"));
    if !is_json {
        return Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    Json::<AnalyzeRequest>::from_bytes(body)
        .map(|Json(req)| req)
        .map_err(|rejection| (rejection.status(), rejection.body_text()))
}

fn csv_response(export: CsvExport) -> Result<Response, (StatusCode, String)> {
    let disposition = HeaderValue::from_str(&export.content_disposition())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(export.content_type),
    );

    Ok((headers, export.bytes).into_response())
}
