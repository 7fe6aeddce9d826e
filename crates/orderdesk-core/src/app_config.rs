use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the Google Sheets client gets its bearer token from.
#[derive(Clone, PartialEq, Eq)]
pub enum SheetsCredentialSource {
    /// A pre-issued OAuth access token, used verbatim.
    AccessToken(String),
    /// Path to a service-account JSON key; tokens are minted on demand.
    ServiceAccountKey(PathBuf),
}

impl std::fmt::Debug for SheetsCredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsCredentialSource::AccessToken(_) => f.write_str("AccessToken([redacted])"),
            SheetsCredentialSource::ServiceAccountKey(path) => {
                f.debug_tuple("ServiceAccountKey").field(path).finish()
            }
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub credentials_path: PathBuf,
    pub shopify_store_url: String,
    pub shopify_access_token: String,
    pub shopify_api_version: String,
    pub shopify_page_limit: u32,
    pub shopify_request_timeout_secs: u64,
    pub shopify_user_agent: String,
    pub shopify_call_limit_margin: u32,
    pub shopify_throttle_secs: u64,
    pub restricted_tag: String,
    pub sheets_spreadsheet_id: String,
    pub sheets_worksheet: String,
    pub sheets_api_base: String,
    pub sheets_credentials: SheetsCredentialSource,
    pub origin_facility: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("credentials_path", &self.credentials_path)
            .field("shopify_store_url", &self.shopify_store_url)
            .field("shopify_access_token", &"[redacted]")
            .field("shopify_api_version", &self.shopify_api_version)
            .field("shopify_page_limit", &self.shopify_page_limit)
            .field(
                "shopify_request_timeout_secs",
                &self.shopify_request_timeout_secs,
            )
            .field("shopify_user_agent", &self.shopify_user_agent)
            .field("shopify_call_limit_margin", &self.shopify_call_limit_margin)
            .field("shopify_throttle_secs", &self.shopify_throttle_secs)
            .field("restricted_tag", &self.restricted_tag)
            .field("sheets_spreadsheet_id", &self.sheets_spreadsheet_id)
            .field("sheets_worksheet", &self.sheets_worksheet)
            .field("sheets_api_base", &self.sheets_api_base)
            .field("sheets_credentials", &self.sheets_credentials)
            .field("origin_facility", &self.origin_facility)
            .finish()
    }
}
