use super::*;

fn test_client(base_url: &str) -> SheetsClient {
    SheetsClient::with_base_url(base_url, "sheet-id", SheetsAuth::static_token("token"))
        .expect("client construction should not fail")
}

#[test]
fn values_url_includes_spreadsheet_and_worksheet() {
    let client = test_client("https://sheets.googleapis.com");
    assert_eq!(
        client.values_url("Sheet1").as_str(),
        "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/Sheet1"
    );
}

#[test]
fn values_url_strips_trailing_slash_and_keeps_prefix() {
    let client = test_client("http://127.0.0.1:9000/proxy/");
    assert_eq!(
        client.values_url("Sheet1").as_str(),
        "http://127.0.0.1:9000/proxy/v4/spreadsheets/sheet-id/values/Sheet1"
    );
}

#[test]
fn values_url_encodes_worksheet_names() {
    let client = test_client("https://sheets.googleapis.com");
    let url = client.values_url("Orders 2024/Q1");
    assert!(
        url.as_str().ends_with("/values/Orders%202024%2FQ1"),
        "worksheet should be one encoded segment: {url}"
    );
}

#[test]
fn rejects_relative_base_url() {
    let err = SheetsClient::with_base_url("sheets", "id", SheetsAuth::static_token("t"))
        .unwrap_err();
    assert!(matches!(err, SheetsError::InvalidBaseUrl { .. }));
}

#[test]
fn cell_text_renders_scalars() {
    assert_eq!(cell_text(serde_json::json!("MKT0101241")), "MKT0101241");
    assert_eq!(cell_text(serde_json::json!(12)), "12");
    assert_eq!(cell_text(serde_json::json!(true)), "true");
    assert_eq!(cell_text(serde_json::Value::Null), "");
}
