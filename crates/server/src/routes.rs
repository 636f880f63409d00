use std::sync::Arc;

use autoflow_agent::ReplyEngine;
use autoflow_sheets::SheetsInventoryGateway;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::{health, simulate, upsert};

pub const ROOT_BANNER: &str = "🤖 AutoFlow AI Backend is Running!";

pub async fn root() -> &'static str {
    ROOT_BANNER
}

/// Public HTTP surface. CORS is permissive because the workflow builder UI is
/// served from a different origin. The WhatsApp upsert route exists only when
/// the channel is enabled.
pub fn router(
    engine: Arc<ReplyEngine>,
    gateway: Arc<SheetsInventoryGateway>,
    whatsapp_enabled: bool,
) -> Router {
    let mut api = Router::new().route("/simulate-message", post(simulate::simulate_message));
    if whatsapp_enabled {
        api = api.route("/whatsapp/upsert", post(upsert::whatsapp_upsert));
    }
    let api = api.with_state(engine);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health))
        .with_state(gateway)
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}
