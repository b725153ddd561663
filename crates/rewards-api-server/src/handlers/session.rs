use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::session::{SessionCounters, SessionRegistry};
use crate::utils::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub tg_user_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingRequest {
    // Absent on the wire gets the same stable error code as unknown, so the
    // field cannot be required at the extractor level.
    pub session_id: Option<String>,
    /// Opaque audit hint ("proof_ok", "video_end", ...); accepted, unused.
    pub event: Option<String>,
    pub proofs_delta: Option<i64>,
    pub video_delta: Option<i64>,
}

#[derive(Serialize)]
pub struct PingResponse {
    pub ok: bool,
    pub session: SessionCounters,
}

/// POST /session/start — the body is optional; clients without a Telegram
/// user id send nothing at all.
pub async fn start_handler(
    State(registry): State<Arc<SessionRegistry>>,
    payload: Option<Json<StartRequest>>,
) -> Json<StartResponse> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let session_id = registry.start(request.tg_user_id);
    Json(StartResponse { session_id })
}

/// POST /session/ping — refresh the session and apply counter deltas.
pub async fn ping_handler(
    State(registry): State<Arc<SessionRegistry>>,
    Json(request): Json<PingRequest>,
) -> Result<Json<PingResponse>, ApiError> {
    let session_id = request
        .session_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::InvalidSession)?;

    let session = registry
        .ping(
            session_id,
            request.event.as_deref(),
            request.proofs_delta,
            request.video_delta,
        )
        .map_err(|_| ApiError::InvalidSession)?;

    Ok(Json(PingResponse { ok: true, session }))
}
