use std::path::Path;

use super::*;

fn yaml_with(password_hash: &str) -> String {
    format!(
        r#"
credentials:
  usernames:
    jdoe:
      email: jdoe@example.com
      name: Jane Doe
      password: "{password_hash}"
cookie:
  name: orderdesk_session
  key: "0123456789abcdef0123"
  expiry_days: 30
preauthorized:
  emails:
    - Intern@Example.com
"#
    )
}

#[test]
fn parses_valid_file_and_verifies_password() {
    let hash = hash_password("correct horse").unwrap();
    let file = CredentialsFile::from_yaml(&yaml_with(&hash)).unwrap();

    assert_eq!(file.user_count(), 1);
    assert_eq!(file.cookie.name, "orderdesk_session");
    assert_eq!(file.cookie.expiry_days, 30);

    let (username, user) = file.verify("jdoe", "correct horse").expect("should verify");
    assert_eq!(username, "jdoe");
    assert_eq!(user.name, "Jane Doe");
}

#[test]
fn verify_matches_username_case_insensitively() {
    let hash = hash_password("pw").unwrap();
    let file = CredentialsFile::from_yaml(&yaml_with(&hash)).unwrap();
    assert!(file.verify("  JDoe ", "pw").is_some());
}

#[test]
fn verify_rejects_wrong_password_and_unknown_user() {
    let hash = hash_password("pw").unwrap();
    let file = CredentialsFile::from_yaml(&yaml_with(&hash)).unwrap();
    assert!(file.verify("jdoe", "nope").is_none());
    assert!(file.verify("someone", "pw").is_none());
}

#[test]
fn preauthorized_lookup_ignores_case() {
    let hash = hash_password("pw").unwrap();
    let file = CredentialsFile::from_yaml(&yaml_with(&hash)).unwrap();
    assert!(file.is_preauthorized("intern@example.com"));
    assert!(!file.is_preauthorized("jdoe@example.com"));
}

#[test]
fn rejects_plaintext_password() {
    let result = CredentialsFile::from_yaml(&yaml_with("hunter2"));
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("PHC")),
        "expected Validation error, got: {result:?}"
    );
}

#[test]
fn rejects_short_cookie_key() {
    let hash = hash_password("pw").unwrap();
    let yaml = yaml_with(&hash).replace("0123456789abcdef0123", "short");
    let result = CredentialsFile::from_yaml(&yaml);
    assert!(matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("cookie key")));
}

#[test]
fn rejects_zero_expiry() {
    let hash = hash_password("pw").unwrap();
    let yaml = yaml_with(&hash).replace("expiry_days: 30", "expiry_days: 0");
    let result = CredentialsFile::from_yaml(&yaml);
    assert!(matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("expiry_days")));
}

#[test]
fn rejects_case_insensitive_duplicate_usernames() {
    let hash = hash_password("pw").unwrap();
    let yaml = format!(
        r#"
credentials:
  usernames:
    jdoe:
      email: a@example.com
      name: A
      password: "{hash}"
    JDOE:
      email: b@example.com
      name: B
      password: "{hash}"
cookie:
  name: c
  key: "0123456789abcdef0123"
  expiry_days: 1
"#
    );
    let result = CredentialsFile::from_yaml(&yaml);
    assert!(matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("duplicate")));
}

#[test]
fn rejects_empty_user_table() {
    let yaml = r#"
credentials:
  usernames: {}
cookie:
  name: c
  key: "0123456789abcdef0123"
  expiry_days: 1
"#;
    let result = CredentialsFile::from_yaml(yaml);
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn rejects_malformed_yaml() {
    let result = CredentialsFile::from_yaml("credentials: [unclosed");
    assert!(matches!(result, Err(ConfigError::CredentialsFileParse(_))));
}

#[test]
fn missing_file_is_io_error() {
    let result = load_credentials(Path::new("/definitely/not/here/credentials.yaml"));
    assert!(matches!(result, Err(ConfigError::CredentialsFileIo { .. })));
}

#[test]
fn cookie_debug_redacts_key() {
    let hash = hash_password("pw").unwrap();
    let file = CredentialsFile::from_yaml(&yaml_with(&hash)).unwrap();
    let rendered = format!("{:?}", file.cookie);
    assert!(!rendered.contains("0123456789abcdef0123"));
}
