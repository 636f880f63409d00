use std::sync::Arc;

use autoflow_agent::{CapturingSender, InboundBody, IntentKind, ReplyEngine};
use autoflow_core::config::{AppConfig, LoadOptions};
use autoflow_sheets::gateway_from_config;
use serde::Serialize;

use super::{runtime, CommandResult};

const COMMAND: &str = "simulate";
const SIMULATED_SENDER: &str = "TestUser";

#[derive(Debug, Serialize)]
pub struct SimulationOutput {
    pub success: bool,
    pub intent: IntentKind,
    pub reply: String,
}

pub fn run(message: &str) -> CommandResult {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => run_with_config(&config, message),
        Err(error) => CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2),
    }
}

pub fn run_with_config(config: &AppConfig, message: &str) -> CommandResult {
    let gateway = match gateway_from_config(config) {
        Ok(gateway) => Arc::new(gateway),
        Err(error) => return CommandResult::failure(COMMAND, "sheets_setup", error.to_string(), 3),
    };
    let engine = ReplyEngine::new(gateway, &config.engine);

    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure(COMMAND, "runtime", message, 1),
    };

    let output = runtime.block_on(async {
        let sender = CapturingSender::new();
        let intent = engine
            .handle_message(&sender, SIMULATED_SENDER, InboundBody::from(message))
            .await;
        SimulationOutput { success: true, intent: intent.kind(), reply: sender.reply().await }
    });

    CommandResult::json(0, &output)
}

#[cfg(test)]
mod tests {
    use autoflow_core::config::AppConfig;
    use serde_json::Value;

    use super::run_with_config;

    fn simulate(message: &str) -> Value {
        let result = run_with_config(&AppConfig::default(), message);
        assert_eq!(result.exit_code, 0);
        serde_json::from_str(&result.output).expect("json output")
    }

    #[test]
    fn price_inquiry_reports_intent_and_reply() {
        let payload = simulate("price of red lipstick");

        assert_eq!(payload["success"], true);
        assert_eq!(payload["intent"], "product_inquiry");
        assert!(payload["reply"].as_str().unwrap_or_default().contains("Red Lipstick"));
    }

    #[test]
    fn order_reply_is_captured_from_the_demo_sheet() {
        let payload = simulate("I want to buy");

        assert_eq!(payload["intent"], "place_order");
        assert!(payload["reply"].as_str().unwrap_or_default().contains("ORD-"));
    }

    #[test]
    fn google_backend_without_a_usable_url_is_a_setup_failure() {
        let mut config = AppConfig::default();
        config.sheets.backend = autoflow_core::config::SheetsBackend::Google;
        config.sheets.spreadsheet_id = "sheet-id".to_string();
        config.sheets.base_url = "not a url".to_string();

        let result = run_with_config(&config, "hi");
        let payload: Value = serde_json::from_str(&result.output).expect("json output");

        assert_eq!(result.exit_code, 3);
        assert_eq!(payload["error_class"], "sheets_setup");
    }
}
