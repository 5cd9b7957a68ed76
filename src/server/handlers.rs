// src/server/handlers.rs

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use crate::errors::BridgeError;
use crate::protocol::response::ScheduleResponse;
use crate::protocol::validate::parse_request;

use super::error::ApiError;
use super::AppState;

pub const LIVENESS_STATUS: &str = "Scheduling bridge is running";

/// `GET /`
pub async fn liveness_handler() -> impl IntoResponse {
    Json(json!({ "status": LIVENESS_STATUS }))
}

/// `POST /v1/schedule`
///
/// If the client goes away, axum drops this future; the drop guard then
/// cancels the request token and the scheduler process is killed.
pub async fn schedule_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let span = tracing::info_span!("schedule", http_request = %Uuid::new_v4().simple());

    async move {
        let body = body.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                BridgeError::PayloadTooLarge {
                    limit: state.max_request_bytes,
                }
            } else {
                BridgeError::Validation(format!("unreadable request body: {}", rejection.body_text()))
            }
        })?;
        let request = parse_request(&body)?;

        let cancel = state.pipeline.request_token();
        let _guard = cancel.clone().drop_guard();

        let response = state.pipeline.schedule(&request, cancel).await?;
        Ok::<_, ApiError>(Json(response))
    }
    .instrument(span)
    .await
}
