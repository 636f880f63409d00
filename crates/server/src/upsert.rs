use std::sync::Arc;

use autoflow_agent::ReplyEngine;
use autoflow_core::errors::InterfaceError;
use autoflow_whatsapp::{dispatch_upsert, UpsertReply};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::simulate::ApiErrorResponse;

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct UpsertResponse {
    pub success: bool,
    pub replies: Vec<UpsertReply>,
}

/// Inbound half of the WhatsApp channel. The session gateway posts each
/// `messages.upsert` event here and delivers the returned replies.
pub async fn whatsapp_upsert(
    State(engine): State<Arc<ReplyEngine>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            let correlation_id = Uuid::new_v4().to_string();
            warn!(
                event_name = "api.whatsapp_upsert.rejected",
                correlation_id = %correlation_id,
                error = %rejection,
                "whatsapp upsert body rejected"
            );
            let error = InterfaceError::BadRequest {
                message: rejection.body_text(),
                correlation_id,
            };
            return (StatusCode::BAD_REQUEST, Json(ApiErrorResponse::from(error))).into_response();
        }
    };

    let replies = dispatch_upsert(&engine, &payload).await;
    info!(
        event_name = "api.whatsapp_upsert.completed",
        reply_count = replies.len(),
        "whatsapp upsert handled"
    );

    Json(UpsertResponse { success: true, replies }).into_response()
}
