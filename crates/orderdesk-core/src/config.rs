use crate::app_config::{AppConfig, Environment, SheetsCredentialSource};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("ORDERDESK_ENV", "development"))?;

    let bind_addr = parse("ORDERDESK_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("ORDERDESK_LOG_LEVEL", "info");
    let credentials_path = PathBuf::from(or_default(
        "ORDERDESK_CREDENTIALS_PATH",
        "./config/credentials.yaml",
    ));

    let shopify_store_url = require("SHOPIFY_STORE_URL")?;
    let shopify_access_token = require("SHOPIFY_ACCESS_TOKEN")?;
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-01");
    let shopify_page_limit = parse_u32("SHOPIFY_PAGE_LIMIT", "250")?;
    if !(1..=250).contains(&shopify_page_limit) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPIFY_PAGE_LIMIT".to_string(),
            reason: format!("{shopify_page_limit} is outside 1..=250"),
        });
    }
    let shopify_request_timeout_secs = parse_u64("SHOPIFY_REQUEST_TIMEOUT_SECS", "30")?;
    let shopify_user_agent = or_default("SHOPIFY_USER_AGENT", "orderdesk/0.1 (order-intake)");
    let shopify_call_limit_margin = parse_u32("SHOPIFY_CALL_LIMIT_MARGIN", "2")?;
    let shopify_throttle_secs = parse_u64("SHOPIFY_THROTTLE_SECS", "5")?;

    let restricted_tag = or_default("ORDERDESK_RESTRICTED_TAG", "Marketing");

    let sheets_spreadsheet_id = require("SHEETS_SPREADSHEET_ID")?;
    let sheets_worksheet = or_default("SHEETS_WORKSHEET", "Sheet1");
    let sheets_api_base = or_default("SHEETS_API_BASE", "https://sheets.googleapis.com");
    let sheets_credentials = match (
        optional("SHEETS_ACCESS_TOKEN"),
        optional("SHEETS_SERVICE_ACCOUNT_PATH"),
    ) {
        (Some(token), None) => SheetsCredentialSource::AccessToken(token),
        (None, Some(path)) => SheetsCredentialSource::ServiceAccountKey(PathBuf::from(path)),
        (None, None) => {
            return Err(ConfigError::MissingEnvVar(
                "SHEETS_ACCESS_TOKEN or SHEETS_SERVICE_ACCOUNT_PATH".to_string(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(ConfigError::InvalidEnvVar {
                var: "SHEETS_ACCESS_TOKEN".to_string(),
                reason: "set either SHEETS_ACCESS_TOKEN or SHEETS_SERVICE_ACCOUNT_PATH, not both"
                    .to_string(),
            })
        }
    };

    let origin_facility = or_default("ORDERDESK_ORIGIN_FACILITY", "BDLs001");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        credentials_path,
        shopify_store_url,
        shopify_access_token,
        shopify_api_version,
        shopify_page_limit,
        shopify_request_timeout_secs,
        shopify_user_agent,
        shopify_call_limit_margin,
        shopify_throttle_secs,
        restricted_tag,
        sheets_spreadsheet_id,
        sheets_worksheet,
        sheets_api_base,
        sheets_credentials,
        origin_facility,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ORDERDESK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
