use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub type SheetRow = Vec<Value>;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheets request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sheets api returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid sheets url: {0}")]
    InvalidUrl(String),
    #[error("could not decode sheets response: {0}")]
    Decode(String),
    #[error("sheet source unavailable: {0}")]
    Unavailable(String),
}

/// Cell-level access to a spreadsheet addressed with A1 ranges.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn read_range(&self, range: &str) -> Result<Vec<SheetRow>, SheetError>;

    async fn append_row(&self, range: &str, row: SheetRow) -> Result<(), SheetError>;

    async fn sheet_titles(&self) -> Result<Vec<String>, SheetError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct A1Range<'a> {
    pub tab: &'a str,
    /// 1-based row the range starts at; `Orders!A:F` starts at row 1.
    pub start_row: usize,
}

pub fn parse_a1(range: &str) -> A1Range<'_> {
    let (tab, cells) = match range.rsplit_once('!') {
        Some((tab, cells)) => (tab, cells),
        None => (range, ""),
    };
    let tab = tab.trim().trim_matches('\'');

    let first_cell = cells.split(':').next().unwrap_or_default();
    let start_row = first_cell
        .trim_start_matches(|ch: char| ch.is_ascii_alphabetic())
        .parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .unwrap_or(1);

    A1Range { tab, start_row }
}

/// Joins a tab title and a cell range. Titles other than plain
/// `[A-Za-z0-9_]` runs are quoted, with embedded quotes doubled.
pub fn a1_range(tab: &str, cells: &str) -> String {
    let plain = !tab.is_empty() && tab.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if plain {
        format!("{tab}!{cells}")
    } else {
        format!("'{}'!{cells}", tab.replace('\'', "''"))
    }
}
