//! HTTP client for the Google Sheets v4 values API.
//!
//! Reads a whole worksheet and writes it back in one `PUT`. The order log is
//! appended by read-concat-overwrite; [`SheetsClient::append_order`] holds an
//! in-process lock across the read and the write so submissions from this
//! server never interleave.

use std::collections::HashSet;
use std::time::Duration;

use orderdesk_core::{AppConfig, SheetsCredentialSource};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::auth::SheetsAuth;
use crate::error::SheetsError;
use crate::table::SheetTable;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

/// Client for one spreadsheet.
///
/// Use [`SheetsClient::new`] for production or
/// [`SheetsClient::with_base_url`] to point at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    auth: SheetsAuth,
    base_url: Url,
    spreadsheet_id: String,
    append_lock: Mutex<()>,
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("base_url", &self.base_url.as_str())
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl SheetsClient {
    /// Creates a client pointed at the production Sheets API.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(spreadsheet_id: &str, auth: SheetsAuth) -> Result<Self, SheetsError> {
        Self::with_base_url(DEFAULT_BASE_URL, spreadsheet_id, auth)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        spreadsheet_id: &str,
        auth: SheetsAuth,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("orderdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| SheetsError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(SheetsError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "expected an absolute http(s) URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            auth,
            base_url: parsed,
            spreadsheet_id: spreadsheet_id.to_owned(),
            append_lock: Mutex::new(()),
        })
    }

    /// Builds a client from the application config, loading the
    /// service-account key if one is configured.
    ///
    /// # Errors
    ///
    /// Propagates key loading and client construction errors.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SheetsError> {
        let auth = match &config.sheets_credentials {
            SheetsCredentialSource::AccessToken(token) => SheetsAuth::static_token(token.clone()),
            SheetsCredentialSource::ServiceAccountKey(path) => {
                SheetsAuth::service_account_file(path)?
            }
        };
        Self::with_base_url(&config.sheets_api_base, &config.sheets_spreadsheet_id, auth)
    }

    /// `{base}/v4/spreadsheets/{id}/values/{worksheet}` with each segment
    /// percent-encoded.
    fn values_url(&self, worksheet: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                worksheet,
            ]);
        }
        url
    }

    /// Reads the whole worksheet.
    ///
    /// An empty worksheet reads as a table with the standard header.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SheetsError::Http`] on network failure.
    /// - [`SheetsError::Deserialize`] if the body is not a value range.
    /// - [`SheetsError::Auth`] if no bearer token could be obtained.
    pub async fn read_table(&self, worksheet: &str) -> Result<SheetTable, SheetsError> {
        let url = self.values_url(worksheet);
        let token = self.auth.bearer_token(&self.client).await?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await?;
        let body = Self::success_body(response, &url).await?;

        let range: ValueRange =
            serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
                context: format!("values of worksheet {worksheet}"),
                source: e,
            })?;

        let values = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        let table = SheetTable::from_values(values);
        tracing::debug!(worksheet, rows = table.len(), "read worksheet");
        Ok(table)
    }

    /// Replaces the worksheet's cells with `table`, header included.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_table`].
    pub async fn overwrite(&self, worksheet: &str, table: &SheetTable) -> Result<(), SheetsError> {
        let mut url = self.values_url(worksheet);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let token = self.auth.bearer_token(&self.client).await?;
        let response = self
            .client
            .put(url.clone())
            .bearer_auth(token)
            .json(&ValueRangeBody {
                range: worksheet,
                major_dimension: "ROWS",
                values: table.to_values(),
            })
            .send()
            .await?;
        Self::success_body(response, &url).await?;
        tracing::debug!(worksheet, rows = table.len(), "overwrote worksheet");
        Ok(())
    }

    /// Appends rows to the worksheet by read-concat-overwrite.
    ///
    /// `build` receives the order numbers already present in the fresh read
    /// and returns a value for the caller plus the rows to append, laid out
    /// as `columns`. Cells are matched to the live header by name. The read
    /// and the write happen under one lock; writers in other processes can
    /// still race with this one.
    ///
    /// The written grid keeps every row read at its position, so it always
    /// covers the cells it replaces.
    ///
    /// # Errors
    ///
    /// Propagates read and write errors, and [`SheetsError::MissingColumn`]
    /// if the worksheet lacks the order number column or a required column
    /// named in `columns`. Nothing is written on error.
    pub async fn append_order<T, F, S>(
        &self,
        worksheet: &str,
        columns: &[S],
        build: F,
    ) -> Result<T, SheetsError>
    where
        F: FnOnce(&HashSet<String>) -> (T, Vec<Vec<String>>),
        S: AsRef<str>,
    {
        let _guard = self.append_lock.lock().await;

        let mut table = self.read_table(worksheet).await?;
        let existing = table.order_numbers()?;
        let (value, rows) = build(&existing);
        if rows.is_empty() {
            return Ok(value);
        }

        let appended = rows.len();
        table.append_rows(columns, rows)?;
        self.overwrite(worksheet, &table).await?;
        tracing::info!(
            worksheet,
            appended,
            total_rows = table.len(),
            "appended order rows"
        );
        Ok(value)
    }

    async fn success_body(response: reqwest::Response, url: &Url) -> Result<String, SheetsError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(body)
    }
}

/// Display text of one cell. Formatted reads return strings; other JSON
/// scalars are rendered as text.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
