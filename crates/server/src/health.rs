use std::sync::Arc;

use autoflow_core::errors::InterfaceError;
use autoflow_sheets::{GatewayOutcome, SheetsInventoryGateway};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub inventory: HealthCheck,
    pub checked_at: String,
}

pub async fn health(
    State(gateway): State<Arc<SheetsInventoryGateway>>,
) -> (StatusCode, Json<HealthResponse>) {
    let inventory = inventory_check(&gateway).await;
    let ready = inventory.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "autoflow-server runtime initialized".to_string(),
        },
        inventory,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn inventory_check(gateway: &SheetsInventoryGateway) -> HealthCheck {
    match gateway.fetch_inventory_outcome().await {
        GatewayOutcome::Fresh(items) => HealthCheck {
            status: "ready",
            detail: format!("inventory source answered with {} products", items.len()),
        },
        GatewayOutcome::Degraded(error) => {
            let error = InterfaceError::ServiceUnavailable {
                message: error.to_string(),
                correlation_id: Uuid::new_v4().to_string(),
            };
            warn!(
                event_name = "system.health.inventory_degraded",
                correlation_id = %error.correlation_id(),
                error = %error,
                "health probe could not read inventory"
            );
            HealthCheck {
                status: "degraded",
                detail: format!("{} ({error})", error.user_message()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use autoflow_sheets::{GatewaySettings, InMemorySheetSource, SheetsInventoryGateway};
    use axum::{extract::State, http::StatusCode, Json};

    use crate::health::health;

    fn gateway(source: &InMemorySheetSource) -> Arc<SheetsInventoryGateway> {
        Arc::new(SheetsInventoryGateway::new(Arc::new(source.clone()), GatewaySettings::default()))
    }

    #[tokio::test]
    async fn health_returns_ready_when_inventory_is_readable() {
        let source = InMemorySheetSource::demo();

        let (status, Json(payload)) = health(State(gateway(&source))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.inventory.status, "ready");
        assert!(payload.inventory.detail.contains("4 products"));
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_inventory_is_unreachable() {
        let source = InMemorySheetSource::demo();
        source.set_offline(true);

        let (status, Json(payload)) = health(State(gateway(&source))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.inventory.status, "degraded");
        assert!(payload.inventory.detail.starts_with("The service is temporarily unavailable"));
        assert_eq!(payload.service.status, "ready");
    }
}
