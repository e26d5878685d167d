//! Slot endpoints: ring-buffer publish and per-slot polling

use axum::{
    extract::{Path, State},
    Json,
};
use boothwall_common::Error;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

use crate::error::ApiResult;
use crate::AppState;

/// GET /api/slot/:slot_id
///
/// Read-only snapshot of one display slot; the front-end polls the version
/// number to detect a new photo.
pub async fn slot_state(
    State(state): State<AppState>,
    Path(slot_id): Path<u8>,
) -> ApiResult<Json<serde_json::Value>> {
    let snapshot = state.slots.get(slot_id)?;
    Ok(Json(json!({ "ok": true, "state": snapshot })))
}

#[derive(Debug, Deserialize)]
pub struct NewPhotoPayload {
    #[serde(default, alias = "assetPath")]
    asset_path: Option<String>,
    #[serde(default)]
    slot: Option<u8>,
}

/// POST /api/photos/new
///
/// Publish a photo into the 3-slot ring buffer. Source priority:
/// - `asset_path` in the payload
/// - fallback to the current session asset (result of the last session)
pub async fn new_photo(
    State(state): State<AppState>,
    Json(payload): Json<NewPhotoPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    let candidate = payload
        .asset_path
        .or_else(|| state.sessions.snapshot().asset_path)
        .ok_or_else(|| {
            Error::InvalidInput("asset_path is required or no session asset found".to_string())
        })?;

    let slots = state.slots.clone();
    let source = PathBuf::from(candidate);
    let explicit_slot = payload.slot;

    // Publish copies file bytes under the ring lock; keep it off the async workers
    let snapshot = tokio::task::spawn_blocking(move || slots.publish(&source, explicit_slot))
        .await
        .map_err(|e| Error::Internal(format!("publish task failed: {}", e)))??;

    Ok(Json(json!({
        "ok": true,
        "assignedSlot": snapshot.slot,
        "photoUrl": snapshot.photo_url,
        "version": snapshot.version,
    })))
}
