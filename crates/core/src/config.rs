use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub sheets: SheetsConfig,
    pub engine: EngineConfig,
    pub whatsapp: WhatsAppConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SheetsConfig {
    pub backend: SheetsBackend,
    pub spreadsheet_id: String,
    pub access_token: Option<SecretString>,
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub inventory_range: String,
    pub orders_range: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub brand_name: String,
    pub currency_symbol: String,
}

#[derive(Clone, Debug)]
pub struct WhatsAppConfig {
    pub enabled: bool,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetsBackend {
    Google,
    Memory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub sheets_backend: Option<SheetsBackend>,
    pub spreadsheet_id: Option<String>,
    pub sheets_access_token: Option<String>,
    pub sheets_base_url: Option<String>,
    pub log_level: Option<String>,
    pub server_port: Option<u16>,
    pub whatsapp_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheets: SheetsConfig {
                backend: SheetsBackend::Memory,
                spreadsheet_id: String::new(),
                access_token: None,
                api_key: None,
                base_url: "https://sheets.googleapis.com/v4".to_string(),
                inventory_range: "Inventory!A2:D".to_string(),
                orders_range: "Orders!A:F".to_string(),
                timeout_secs: 10,
            },
            engine: EngineConfig {
                brand_name: "AutoFlow AI".to_string(),
                currency_symbol: "₹".to_string(),
            },
            whatsapp: WhatsAppConfig { enabled: false },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 3000,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for SheetsBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Validation(format!(
                "unsupported sheets backend `{other}` (expected google|memory)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());
        let mut backend_chosen = options.overrides.sheets_backend.is_some()
            || read_env("AUTOFLOW_SHEETS_BACKEND").is_some();

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            backend_chosen |= patch.sheets.as_ref().is_some_and(|sheets| sheets.backend.is_some());
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("autoflow.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        if !backend_chosen {
            config.infer_backend();
        }
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(sheets) = patch.sheets {
            if let Some(backend) = sheets.backend {
                self.sheets.backend = backend;
            }
            if let Some(spreadsheet_id) = sheets.spreadsheet_id {
                self.sheets.spreadsheet_id = spreadsheet_id;
            }
            if let Some(access_token) = sheets.access_token {
                self.sheets.access_token = Some(secret_value(access_token));
            }
            if let Some(api_key) = sheets.api_key {
                self.sheets.api_key = Some(secret_value(api_key));
            }
            if let Some(base_url) = sheets.base_url {
                self.sheets.base_url = base_url;
            }
            if let Some(inventory_range) = sheets.inventory_range {
                self.sheets.inventory_range = inventory_range;
            }
            if let Some(orders_range) = sheets.orders_range {
                self.sheets.orders_range = orders_range;
            }
            if let Some(timeout_secs) = sheets.timeout_secs {
                self.sheets.timeout_secs = timeout_secs;
            }
        }

        if let Some(engine) = patch.engine {
            if let Some(brand_name) = engine.brand_name {
                self.engine.brand_name = brand_name;
            }
            if let Some(currency_symbol) = engine.currency_symbol {
                self.engine.currency_symbol = currency_symbol;
            }
        }

        if let Some(whatsapp) = patch.whatsapp {
            if let Some(enabled) = whatsapp.enabled {
                self.whatsapp.enabled = enabled;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("AUTOFLOW_SHEETS_BACKEND") {
            self.sheets.backend = value.parse()?;
        }
        // GOOGLE_SHEET_ID is the variable name existing deployments already export.
        let spreadsheet_id =
            read_env("AUTOFLOW_SHEETS_SPREADSHEET_ID").or_else(|| read_env("GOOGLE_SHEET_ID"));
        if let Some(value) = spreadsheet_id {
            self.sheets.spreadsheet_id = value;
        }
        if let Some(value) = read_env("AUTOFLOW_SHEETS_ACCESS_TOKEN") {
            self.sheets.access_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("AUTOFLOW_SHEETS_API_KEY") {
            self.sheets.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("AUTOFLOW_SHEETS_BASE_URL") {
            self.sheets.base_url = value;
        }
        if let Some(value) = read_env("AUTOFLOW_SHEETS_INVENTORY_RANGE") {
            self.sheets.inventory_range = value;
        }
        if let Some(value) = read_env("AUTOFLOW_SHEETS_ORDERS_RANGE") {
            self.sheets.orders_range = value;
        }
        if let Some(value) = read_env("AUTOFLOW_SHEETS_TIMEOUT_SECS") {
            self.sheets.timeout_secs = parse_u64("AUTOFLOW_SHEETS_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("AUTOFLOW_ENGINE_BRAND_NAME") {
            self.engine.brand_name = value;
        }
        if let Some(value) = read_env("AUTOFLOW_ENGINE_CURRENCY_SYMBOL") {
            self.engine.currency_symbol = value;
        }

        if let Some(value) = read_env("AUTOFLOW_WHATSAPP_ENABLED") {
            self.whatsapp.enabled = parse_bool("AUTOFLOW_WHATSAPP_ENABLED", &value)?;
        }

        if let Some(value) = read_env("AUTOFLOW_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("AUTOFLOW_SERVER_PORT") {
            self.server.port = parse_u16("AUTOFLOW_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("AUTOFLOW_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("AUTOFLOW_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("AUTOFLOW_LOGGING_LEVEL").or_else(|| read_env("AUTOFLOW_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("AUTOFLOW_LOGGING_FORMAT").or_else(|| read_env("AUTOFLOW_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.sheets_backend {
            self.sheets.backend = backend;
        }
        if let Some(spreadsheet_id) = overrides.spreadsheet_id {
            self.sheets.spreadsheet_id = spreadsheet_id;
        }
        if let Some(access_token) = overrides.sheets_access_token {
            self.sheets.access_token = Some(secret_value(access_token));
        }
        if let Some(base_url) = overrides.sheets_base_url {
            self.sheets.base_url = base_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(enabled) = overrides.whatsapp_enabled {
            self.whatsapp.enabled = enabled;
        }
    }

    /// A configured spreadsheet id without an explicit backend means the live
    /// sheet. Serving the demo catalog there would confirm orders nobody logs.
    fn infer_backend(&mut self) {
        if !self.sheets.spreadsheet_id.trim().is_empty() {
            self.sheets.backend = SheetsBackend::Google;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sheets(&self.sheets)?;
        validate_engine(&self.engine)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Config file that `AppConfig::load` reads: the explicit path when it exists,
/// otherwise the first of `autoflow.toml` and `config/autoflow.toml` present.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("autoflow.toml"), PathBuf::from("config/autoflow.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_sheets(sheets: &SheetsConfig) -> Result<(), ConfigError> {
    if sheets.timeout_secs == 0 || sheets.timeout_secs > 120 {
        return Err(ConfigError::Validation(
            "sheets.timeout_secs must be in range 1..=120".to_string(),
        ));
    }

    let ranges = [
        ("sheets.inventory_range", &sheets.inventory_range),
        ("sheets.orders_range", &sheets.orders_range),
    ];
    for (key, range) in ranges {
        if !range.contains('!') {
            return Err(ConfigError::Validation(format!(
                "{key} must use A1 notation with a tab name (e.g. `Inventory!A2:D`), got `{range}`"
            )));
        }
    }

    if sheets.backend == SheetsBackend::Memory {
        return Ok(());
    }

    let spreadsheet_id = sheets.spreadsheet_id.trim();
    if spreadsheet_id.is_empty() || spreadsheet_id.contains("YOUR_SHEET_ID") {
        return Err(ConfigError::Validation(
            "sheets.spreadsheet_id is required for the google backend. Copy it from the sheet URL: https://docs.google.com/spreadsheets/d/<id>/edit".to_string(),
        ));
    }

    if !sheets.base_url.starts_with("http://") && !sheets.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "sheets.base_url must start with http:// or https://".to_string(),
        ));
    }

    let has_credential = [&sheets.access_token, &sheets.api_key]
        .into_iter()
        .flatten()
        .any(|secret| !secret.expose_secret().trim().is_empty());
    if !has_credential {
        return Err(ConfigError::Validation(
            "sheets.access_token or sheets.api_key is required for the google backend (appending orders needs an OAuth access token)".to_string(),
        ));
    }

    Ok(())
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
    if engine.brand_name.trim().is_empty() {
        return Err(ConfigError::Validation("engine.brand_name must not be empty".to_string()));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    sheets: Option<SheetsPatch>,
    engine: Option<EnginePatch>,
    whatsapp: Option<WhatsAppPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SheetsPatch {
    backend: Option<SheetsBackend>,
    spreadsheet_id: Option<String>,
    access_token: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    inventory_range: Option<String>,
    orders_range: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct EnginePatch {
    brand_name: Option<String>,
    currency_symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WhatsAppPatch {
    enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
