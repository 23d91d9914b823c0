//! Producer endpoint for the message log.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::{error_response, ApiError, AppState};

/// Messages published over HTTP always land in partition 0.
const PUBLISH_PARTITION: i32 = 0;

/// Where a published message was appended.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    /// Topic the message was appended to.
    pub topic: String,
    /// Always 0 for HTTP publishes.
    pub partition: i32,
    /// Offset assigned by the log.
    pub offset: i64,
}

pub(crate) async fn publish_message(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<PublishResponse>), ApiError> {
    if topic.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Topic name cannot be empty", "INVALID_TOPIC"));
    }
    if body.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Message body cannot be empty", "INVALID_INPUT"));
    }

    match state.log.append(&topic, PUBLISH_PARTITION, &body).await {
        Ok(receipt) => {
            tracing::debug!(topic = %topic, partition = receipt.partition, offset = receipt.offset, "message published");
            Ok((
                StatusCode::ACCEPTED,
                Json(PublishResponse {
                    topic,
                    partition: receipt.partition,
                    offset: receipt.offset,
                }),
            ))
        }
        Err(e) => {
            tracing::error!(topic = %topic, error = %e, "failed to publish message");
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error publishing message", "QUEUE_ERROR"))
        }
    }
}
