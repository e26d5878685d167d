//! Webhook endpoint fed by the capture application

use axum::{
    extract::{Query, State},
    Json,
};
use boothwall_common::events::{HookEvent, HookHints};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::AppState;

/// GET /hook?event_type=...
///
/// Event callback from the capture application. Events outside the whitelist
/// are acknowledged without touching session state, which also keeps the log
/// quiet for the chatty ones the kiosk emits.
pub async fn hook(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let raw_event = params.get("event_type").map(String::as_str).unwrap_or("");
    let Some(event) = HookEvent::from_name(raw_event) else {
        return Json(json!({ "ok": true, "ignored": raw_event }));
    };

    info!("Webhook event: {}", event.name());
    let mut keys: Vec<_> = params.keys().collect();
    keys.sort();
    for key in keys {
        debug!("  {} = {}", key, params[key]);
    }

    let hints = HookHints::from_query(&params);
    state.sessions.handle_event(event, &hints);

    Json(json!({ "ok": true, "event_type": event.name() }))
}
