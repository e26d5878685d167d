//! Session endpoints: start/reset from the UI, status polling, asset download

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiResult;
use crate::session::StartOutcome;
use crate::AppState;

/// POST /session/start
///
/// Start a new session from the UI. Launches the enter-session helper and
/// moves the session to in_progress; 409 while a session is already running.
pub async fn start_session(State(state): State<AppState>) -> Response {
    match state.sessions.start() {
        StartOutcome::Started(snapshot) => {
            Json(json!({ "ok": true, "state": snapshot })).into_response()
        }
        StartOutcome::AlreadyRunning(snapshot) => (
            StatusCode::CONFLICT,
            Json(json!({
                "ok": false,
                "state": snapshot,
                "message": "Session already in progress",
            })),
        )
            .into_response(),
    }
}

/// POST /session/reset
///
/// Return the session to idle so the UI can start over (retake button).
pub async fn reset_session(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.sessions.reset();
    Json(json!({ "ok": true, "state": snapshot }))
}

/// GET /session/status
///
/// Polled by the display front-end to track progress.
pub async fn session_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.sessions.snapshot();
    Json(json!({ "ok": true, "state": snapshot }))
}

#[derive(Debug, Deserialize)]
pub struct AssetQuery {
    token: Option<String>,
}

/// GET /session/asset?token=...
///
/// Stream back the photo produced by the last completed session. The token
/// binds the request to that completion; any mismatch reads as 404.
pub async fn session_asset(
    State(state): State<AppState>,
    Query(query): Query<AssetQuery>,
) -> ApiResult<Response> {
    let path = state.sessions.asset_for_retrieval(query.token.as_deref())?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(boothwall_common::Error::Io)?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo.jpg".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
