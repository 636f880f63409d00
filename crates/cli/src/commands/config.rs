use std::env;
use std::fs;
use std::path::Path;

use autoflow_core::config::{resolve_config_path, AppConfig, LoadOptions};
use secrecy::{ExposeSecret, SecretString};
use toml::Value;

/// One rendered config line: dotted key, display value and the env variables
/// that can set it, in lookup order.
struct Field {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> String {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            let path = resolve_config_path(None);
            let doc = load_config_file_doc(path.as_deref());
            render(&config, doc.as_ref(), path.as_deref())
        }
        Err(error) => format!("config validation failed: {error}"),
    }
}

pub fn render(config: &AppConfig, file_doc: Option<&Value>, file_path: Option<&Path>) -> String {
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    for field in fields(config) {
        let source = field_source(field.key, field.env_keys, file_doc, file_path);
        lines.push(format!("- {} = {} (source: {source})", field.key, field.value));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let sheets = &config.sheets;
    vec![
        Field {
            key: "sheets.backend",
            value: format!("{:?}", sheets.backend).to_lowercase(),
            env_keys: &["AUTOFLOW_SHEETS_BACKEND"],
        },
        Field {
            key: "sheets.spreadsheet_id",
            value: or_unset(&sheets.spreadsheet_id),
            env_keys: &["AUTOFLOW_SHEETS_SPREADSHEET_ID", "GOOGLE_SHEET_ID"],
        },
        Field {
            key: "sheets.access_token",
            value: redact_secret(sheets.access_token.as_ref()),
            env_keys: &["AUTOFLOW_SHEETS_ACCESS_TOKEN"],
        },
        Field {
            key: "sheets.api_key",
            value: redact_secret(sheets.api_key.as_ref()),
            env_keys: &["AUTOFLOW_SHEETS_API_KEY"],
        },
        Field {
            key: "sheets.base_url",
            value: sheets.base_url.clone(),
            env_keys: &["AUTOFLOW_SHEETS_BASE_URL"],
        },
        Field {
            key: "sheets.inventory_range",
            value: sheets.inventory_range.clone(),
            env_keys: &["AUTOFLOW_SHEETS_INVENTORY_RANGE"],
        },
        Field {
            key: "sheets.orders_range",
            value: sheets.orders_range.clone(),
            env_keys: &["AUTOFLOW_SHEETS_ORDERS_RANGE"],
        },
        Field {
            key: "sheets.timeout_secs",
            value: sheets.timeout_secs.to_string(),
            env_keys: &["AUTOFLOW_SHEETS_TIMEOUT_SECS"],
        },
        Field {
            key: "engine.brand_name",
            value: config.engine.brand_name.clone(),
            env_keys: &["AUTOFLOW_ENGINE_BRAND_NAME"],
        },
        Field {
            key: "engine.currency_symbol",
            value: config.engine.currency_symbol.clone(),
            env_keys: &["AUTOFLOW_ENGINE_CURRENCY_SYMBOL"],
        },
        Field {
            key: "whatsapp.enabled",
            value: config.whatsapp.enabled.to_string(),
            env_keys: &["AUTOFLOW_WHATSAPP_ENABLED"],
        },
        Field {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["AUTOFLOW_SERVER_BIND_ADDRESS"],
        },
        Field {
            key: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["AUTOFLOW_SERVER_PORT"],
        },
        Field {
            key: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["AUTOFLOW_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        Field {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["AUTOFLOW_LOGGING_LEVEL", "AUTOFLOW_LOG_LEVEL"],
        },
        Field {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            env_keys: &["AUTOFLOW_LOGGING_FORMAT", "AUTOFLOW_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(**key).is_some()) {
        return format!("env ({env_key})");
    }

    if file_doc.is_some_and(|doc| contains_path(doc, key_path)) {
        let file_path = file_path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config file".to_string());
        return format!("file ({file_path})");
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn or_unset(value: &str) -> String {
    if value.trim().is_empty() {
        "<unset>".to_string()
    } else {
        value.to_string()
    }
}

/// Keeps a short recognisable prefix (`ya29.`, `AIza`) and hides the rest.
fn redact_secret(secret: Option<&SecretString>) -> String {
    let Some(secret) = secret else {
        return "<unset>".to_string();
    };
    let exposed = secret.expose_secret().trim();
    if exposed.is_empty() {
        return "<empty>".to_string();
    }
    if let Some((prefix, _)) = exposed.split_once('.') {
        return format!("{prefix}.***");
    }
    if exposed.starts_with("AIza") {
        return "AIza***".to_string();
    }
    "<redacted>".to_string()
}
