use std::time::Duration;

use async_trait::async_trait;
use autoflow_core::config::SheetsConfig;
use reqwest::{Client, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::source::{SheetError, SheetRow, SheetSource};

/// Google Sheets REST v4 client.
///
/// Authenticates with a bearer access token, an API key, or both. Minting the
/// token from service-account credentials is left to the deployment.
#[derive(Clone)]
pub struct GoogleSheetsClient {
    http: Client,
    base_url: Url,
    spreadsheet_id: String,
    access_token: Option<SecretString>,
    api_key: Option<SecretString>,
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<SheetRow>,
}

#[derive(Debug, Default, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

impl GoogleSheetsClient {
    pub fn from_config(config: &SheetsConfig) -> Result<Self, SheetError> {
        Self::new(
            &config.base_url,
            config.spreadsheet_id.clone(),
            config.access_token.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn new(
        base_url: &str,
        spreadsheet_id: impl Into<String>,
        access_token: Option<SecretString>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, SheetError> {
        let base_url =
            Url::parse(base_url).map_err(|error| SheetError::InvalidUrl(error.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SheetError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url, spreadsheet_id: spreadsheet_id.into(), access_token, api_key })
    }

    fn endpoint(&self, tail: &[&str]) -> Result<Url, SheetError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .extend(tail);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };
        match &self.api_key {
            Some(key) => request.query(&[("key", key.expose_secret())]),
            None => request,
        }
    }

    async fn send_json<T>(&self, request: RequestBuilder) -> Result<T, SheetError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|error| SheetError::Decode(error.to_string()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SheetError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Status { status: status.as_u16(), body });
        }
        Ok(response)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn read_range(&self, range: &str) -> Result<Vec<SheetRow>, SheetError> {
        let url = self.endpoint(&["values", range])?;
        let request = self.http.get(url).query(&[("valueRenderOption", "UNFORMATTED_VALUE")]);
        let body: ValueRange = self.send_json(request).await?;
        Ok(body.values)
    }

    async fn append_row(&self, range: &str, row: SheetRow) -> Result<(), SheetError> {
        let url = self.endpoint(&["values", &format!("{range}:append")])?;
        let request = self
            .http
            .post(url)
            .query(&[("valueInputOption", "USER_ENTERED"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [row] }));
        self.send(request).await?;
        Ok(())
    }

    async fn sheet_titles(&self) -> Result<Vec<String>, SheetError> {
        let url = self.endpoint(&[])?;
        let request = self.http.get(url).query(&[("fields", "sheets.properties.title")]);
        let body: SpreadsheetMetadata = self.send_json(request).await?;
        Ok(body.sheets.into_iter().map(|sheet| sheet.properties.title).collect())
    }
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("base_url", &self.base_url.as_str())
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "[redacted]"))
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
