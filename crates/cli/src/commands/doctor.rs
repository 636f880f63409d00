use autoflow_core::config::{AppConfig, ConfigError, LoadOptions};
use autoflow_sheets::source::{a1_range, parse_a1};
use autoflow_sheets::{source_from_config, SheetSource};
use serde::Serialize;

use super::{escape_json, runtime, CommandResult};

const CONFIG_CHECK: &str = "config_validation";
const HEADER_CHECK: &str = "inventory_header";
const ORDERS_CHECK: &str = "orders_tab";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct DoctorCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub details: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub overall_status: CheckStatus,
    pub summary: String,
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    fn from_checks(checks: Vec<DoctorCheck>) -> Self {
        let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
        let (overall_status, summary) = if all_pass {
            (CheckStatus::Pass, "doctor: all readiness checks passed")
        } else {
            (CheckStatus::Fail, "doctor: one or more readiness checks failed")
        };
        Self { overall_status, summary: summary.to_string(), checks }
    }
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report(AppConfig::load(LoadOptions::default()));
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

pub fn build_report(loaded: Result<AppConfig, ConfigError>) -> DoctorReport {
    let config = match loaded {
        Ok(config) => config,
        Err(error) => {
            return DoctorReport::from_checks(vec![
                DoctorCheck {
                    name: CONFIG_CHECK,
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
                skipped(HEADER_CHECK),
                skipped(ORDERS_CHECK),
            ]);
        }
    };

    let mut checks = vec![DoctorCheck {
        name: CONFIG_CHECK,
        status: CheckStatus::Pass,
        details: format!("configuration loaded ({:?} sheets backend)", config.sheets.backend)
            .to_lowercase(),
    }];

    let source = match source_from_config(&config.sheets) {
        Ok(source) => source,
        Err(error) => {
            let details = format!("sheet source setup failed: {error}");
            checks.push(DoctorCheck { name: HEADER_CHECK, status: CheckStatus::Fail, details });
            checks.push(skipped(ORDERS_CHECK));
            return DoctorReport::from_checks(checks);
        }
    };

    match runtime() {
        Ok(runtime) => runtime.block_on(async {
            checks.push(check_inventory_header(source.as_ref(), &config).await);
            checks.push(check_orders_tab(source.as_ref(), &config).await);
        }),
        Err(details) => {
            checks.push(DoctorCheck { name: HEADER_CHECK, status: CheckStatus::Fail, details });
            checks.push(skipped(ORDERS_CHECK));
        }
    }

    DoctorReport::from_checks(checks)
}

async fn check_inventory_header(source: &dyn SheetSource, config: &AppConfig) -> DoctorCheck {
    let header_range = header_range(&config.sheets.inventory_range);

    match source.read_range(&header_range).await {
        Ok(rows) => match rows.first().filter(|row| !row.is_empty()) {
            Some(header) => DoctorCheck {
                name: HEADER_CHECK,
                status: CheckStatus::Pass,
                details: format!("read {} header cells from `{header_range}`", header.len()),
            },
            None => DoctorCheck {
                name: HEADER_CHECK,
                status: CheckStatus::Fail,
                details: format!("`{header_range}` is empty"),
            },
        },
        Err(error) => DoctorCheck {
            name: HEADER_CHECK,
            status: CheckStatus::Fail,
            details: format!("failed to read `{header_range}`: {error}"),
        },
    }
}

async fn check_orders_tab(source: &dyn SheetSource, config: &AppConfig) -> DoctorCheck {
    let tab = parse_a1(&config.sheets.orders_range).tab;

    match source.sheet_titles().await {
        Ok(titles) if titles.iter().any(|title| title == tab) => DoctorCheck {
            name: ORDERS_CHECK,
            status: CheckStatus::Pass,
            details: format!("orders tab `{tab}` found"),
        },
        Ok(titles) => DoctorCheck {
            name: ORDERS_CHECK,
            status: CheckStatus::Fail,
            details: format!("orders tab `{tab}` missing (tabs: {})", titles.join(", ")),
        },
        Err(error) => DoctorCheck {
            name: ORDERS_CHECK,
            status: CheckStatus::Fail,
            details: format!("failed to list spreadsheet tabs: {error}"),
        },
    }
}

/// First row of the inventory tab, where the column headers live.
fn header_range(inventory_range: &str) -> String {
    a1_range(parse_a1(inventory_range).tab, "A1:D1")
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: "skipped because an earlier check failed".to_string(),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
