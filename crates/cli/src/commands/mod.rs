pub mod config;
pub mod doctor;
pub mod simulate;

use serde::Serialize;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn json(exit_code: u8, payload: &impl Serialize) -> Self {
        let output = serde_json::to_string(payload).unwrap_or_else(|error| {
            serialization_failure("unknown", &error.to_string())
        });
        Self { exit_code, output }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        let output = serde_json::to_string(&payload)
            .unwrap_or_else(|error| serialization_failure(command, &error.to_string()));
        Self { exit_code, output }
    }
}

/// Commands are synchronous entry points; sheet I/O runs on a throwaway
/// current-thread runtime.
pub(crate) fn runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| format!("failed to initialize async runtime: {error}"))
}

fn serialization_failure(command: &str, error: &str) -> String {
    format!(
        "{{\"command\":\"{}\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
        escape_json(command),
        escape_json(error)
    )
}

pub(crate) fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
