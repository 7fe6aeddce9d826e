use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("SHOPIFY_STORE_URL", "https://example-shop.myshopify.com");
    m.insert("SHOPIFY_ACCESS_TOKEN", "shpat_test");
    m.insert("SHEETS_SPREADSHEET_ID", "sheet-123");
    m.insert("SHEETS_ACCESS_TOKEN", "ya29.test");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ORDERDESK_ENV"));
}

#[test]
fn build_app_config_fails_without_store_url() {
    let mut map = full_env();
    map.remove("SHOPIFY_STORE_URL");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPIFY_STORE_URL"),
        "expected MissingEnvVar(SHOPIFY_STORE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_token_as_missing() {
    let mut map = full_env();
    map.insert("SHOPIFY_ACCESS_TOKEN", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPIFY_ACCESS_TOKEN"),
        "expected MissingEnvVar(SHOPIFY_ACCESS_TOKEN), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("ORDERDESK_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORDERDESK_BIND_ADDR"),
        "expected InvalidEnvVar(ORDERDESK_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.credentials_path,
        PathBuf::from("./config/credentials.yaml")
    );
    assert_eq!(cfg.shopify_api_version, "2024-01");
    assert_eq!(cfg.shopify_page_limit, 250);
    assert_eq!(cfg.shopify_request_timeout_secs, 30);
    assert_eq!(cfg.shopify_user_agent, "orderdesk/0.1 (order-intake)");
    assert_eq!(cfg.shopify_call_limit_margin, 2);
    assert_eq!(cfg.shopify_throttle_secs, 5);
    assert_eq!(cfg.restricted_tag, "Marketing");
    assert_eq!(cfg.sheets_worksheet, "Sheet1");
    assert_eq!(cfg.sheets_api_base, "https://sheets.googleapis.com");
    assert_eq!(
        cfg.sheets_credentials,
        SheetsCredentialSource::AccessToken("ya29.test".to_string())
    );
    assert_eq!(cfg.origin_facility, "BDLs001");
}

#[test]
fn shopify_page_limit_override() {
    let mut map = full_env();
    map.insert("SHOPIFY_PAGE_LIMIT", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.shopify_page_limit, 50);
}

#[test]
fn shopify_page_limit_out_of_range() {
    let mut map = full_env();
    map.insert("SHOPIFY_PAGE_LIMIT", "500");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPIFY_PAGE_LIMIT"),
        "expected InvalidEnvVar(SHOPIFY_PAGE_LIMIT), got: {result:?}"
    );
}

#[test]
fn shopify_throttle_secs_invalid() {
    let mut map = full_env();
    map.insert("SHOPIFY_THROTTLE_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPIFY_THROTTLE_SECS"),
        "expected InvalidEnvVar(SHOPIFY_THROTTLE_SECS), got: {result:?}"
    );
}

#[test]
fn shopify_call_limit_margin_override() {
    let mut map = full_env();
    map.insert("SHOPIFY_CALL_LIMIT_MARGIN", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.shopify_call_limit_margin, 5);
}

#[test]
fn service_account_path_selects_service_account_source() {
    let mut map = full_env();
    map.remove("SHEETS_ACCESS_TOKEN");
    map.insert("SHEETS_SERVICE_ACCOUNT_PATH", "/secrets/sa.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.sheets_credentials,
        SheetsCredentialSource::ServiceAccountKey(PathBuf::from("/secrets/sa.json"))
    );
}

#[test]
fn missing_sheets_credentials_fails() {
    let mut map = full_env();
    map.remove("SHEETS_ACCESS_TOKEN");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(_))),
        "expected MissingEnvVar, got: {result:?}"
    );
}

#[test]
fn both_sheets_credentials_fails() {
    let mut map = full_env();
    map.insert("SHEETS_SERVICE_ACCOUNT_PATH", "/secrets/sa.json");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { .. })),
        "expected InvalidEnvVar, got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("shpat_test"));
    assert!(!rendered.contains("ya29.test"));
    assert!(rendered.contains("[redacted]"));
}
