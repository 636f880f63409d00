use std::env;
use std::sync::{Mutex, OnceLock};

use autoflow_cli::commands::{config, doctor, simulate};
use serde_json::Value;

#[test]
fn doctor_passes_against_the_demo_sheet() {
    with_env(&[("AUTOFLOW_SHEETS_BACKEND", "memory")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected all readiness checks to pass");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        assert_eq!(payload["checks"].as_array().map(Vec::len), Some(3));
    });
}

#[test]
fn doctor_reports_config_failure_for_google_without_sheet_id() {
    with_env(
        &[("AUTOFLOW_SHEETS_BACKEND", "google"), ("AUTOFLOW_SHEETS_ACCESS_TOKEN", "ya29.token")],
        || {
            let result = doctor::run(true);
            assert_eq!(result.exit_code, 1, "expected readiness failure exit code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["overall_status"], "fail");
            assert_eq!(payload["checks"][0]["name"], "config_validation");
            assert_eq!(payload["checks"][0]["status"], "fail");
            assert_eq!(payload["checks"][1]["status"], "skipped");
        },
    );
}

#[test]
fn doctor_human_output_lists_each_check() {
    with_env(&[], || {
        let output = doctor::run(false).output;

        assert!(output.starts_with("doctor: all readiness checks passed"));
        assert!(output.contains("- [ok] inventory_header:"));
        assert!(output.contains("- [ok] orders_tab:"));
    });
}

#[test]
fn config_attributes_env_values_and_redacts_tokens() {
    with_env(
        &[
            ("AUTOFLOW_SHEETS_BACKEND", "google"),
            ("GOOGLE_SHEET_ID", "1AbCdEf"),
            ("AUTOFLOW_SHEETS_ACCESS_TOKEN", "ya29.very-secret"),
        ],
        || {
            let output = config::run();

            let backend = "- sheets.backend = google (source: env (AUTOFLOW_SHEETS_BACKEND))";
            let sheet_id = "- sheets.spreadsheet_id = 1AbCdEf (source: env (GOOGLE_SHEET_ID))";
            assert!(output.contains(backend));
            assert!(output.contains(sheet_id));
            assert!(output.contains("- sheets.access_token = ya29.***"));
            assert!(!output.contains("very-secret"));
            assert!(output.contains("- server.port = 3000 (source: default)"));
        },
    );
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("AUTOFLOW_SERVER_PORT", "not-a-port")], || {
        let output = config::run();
        assert!(output.starts_with("config validation failed:"));
    });
}

#[test]
fn simulate_prints_intent_and_reply() {
    with_env(&[("AUTOFLOW_ENGINE_CURRENCY_SYMBOL", "$")], || {
        let result = simulate::run("list products");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["success"], true);
        assert_eq!(payload["intent"], "list_products");
        assert!(payload["reply"].as_str().unwrap_or_default().contains("- Red Lipstick ($299)"));
    });
}

#[test]
fn simulate_returns_config_failure_payload() {
    with_env(&[("AUTOFLOW_SHEETS_BACKEND", "spreadsheet")], || {
        let result = simulate::run("hi");
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "simulate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    let _guard = env_lock().lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "AUTOFLOW_SHEETS_BACKEND",
        "AUTOFLOW_SHEETS_SPREADSHEET_ID",
        "GOOGLE_SHEET_ID",
        "AUTOFLOW_SHEETS_ACCESS_TOKEN",
        "AUTOFLOW_SHEETS_API_KEY",
        "AUTOFLOW_SHEETS_BASE_URL",
        "AUTOFLOW_SHEETS_INVENTORY_RANGE",
        "AUTOFLOW_SHEETS_ORDERS_RANGE",
        "AUTOFLOW_SHEETS_TIMEOUT_SECS",
        "AUTOFLOW_ENGINE_BRAND_NAME",
        "AUTOFLOW_ENGINE_CURRENCY_SYMBOL",
        "AUTOFLOW_WHATSAPP_ENABLED",
        "AUTOFLOW_SERVER_BIND_ADDRESS",
        "AUTOFLOW_SERVER_PORT",
        "AUTOFLOW_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "AUTOFLOW_LOGGING_LEVEL",
        "AUTOFLOW_LOGGING_FORMAT",
        "AUTOFLOW_LOG_LEVEL",
        "AUTOFLOW_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
