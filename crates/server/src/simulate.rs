use std::sync::Arc;

use autoflow_agent::{CapturingSender, InboundBody, ReplyEngine};
use autoflow_core::errors::InterfaceError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

/// Sender id used for simulated conversations.
pub const SIMULATED_SENDER: &str = "TestUser";

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub message: Value,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SimulateResponse {
    pub success: bool,
    pub reply: String,
}

/// Body of every 4xx/5xx JSON answer under `/api`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
    pub correlation_id: String,
}

impl From<InterfaceError> for ApiErrorResponse {
    fn from(error: InterfaceError) -> Self {
        Self {
            success: false,
            error: error.user_message().to_owned(),
            correlation_id: error.correlation_id().to_owned(),
        }
    }
}

/// Runs one message through the engine and returns the captured reply.
pub async fn simulate_message(
    State(engine): State<Arc<ReplyEngine>>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(
                event_name = "api.simulate.rejected",
                correlation_id = %correlation_id,
                error = %rejection,
                "simulate request body rejected"
            );
            let error = InterfaceError::BadRequest {
                message: rejection.body_text(),
                correlation_id,
            };
            return (StatusCode::BAD_REQUEST, Json(ApiErrorResponse::from(error)))
                .into_response();
        }
    };

    let sender = CapturingSender::new();
    let intent = engine
        .handle_message(&sender, SIMULATED_SENDER, InboundBody::from(request.message))
        .await;
    let reply = sender.reply().await;
    info!(
        event_name = "api.simulate.completed",
        correlation_id = %correlation_id,
        intent = %intent.kind(),
        "simulated message handled"
    );

    Json(SimulateResponse { success: true, reply }).into_response()
}
