//! Login credentials file: authorized users, session-cookie parameters and the
//! pre-authorization list.
//!
//! The file is read once at startup and never written back. Passwords are
//! stored as argon2 PHC strings, produced by `orderdesk-cli hash-password`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Minimum length of the cookie signing key, in bytes.
pub const MIN_COOKIE_KEY_LEN: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    pub email: String,
    pub name: String,
    /// Argon2 PHC hash, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`.
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserTable {
    #[serde(default)]
    pub usernames: BTreeMap<String, UserCredentials>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CookieSettings {
    pub name: String,
    pub key: String,
    pub expiry_days: u32,
}

impl std::fmt::Debug for CookieSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieSettings")
            .field("name", &self.name)
            .field("key", &"[redacted]")
            .field("expiry_days", &self.expiry_days)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preauthorized {
    #[serde(default)]
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsFile {
    pub credentials: UserTable,
    pub cookie: CookieSettings,
    #[serde(default)]
    pub preauthorized: Preauthorized,
}

impl CredentialsFile {
    /// Parses and validates credentials from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CredentialsFileParse`] for malformed YAML and
    /// [`ConfigError::Validation`] when the content fails validation.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let file: CredentialsFile =
            serde_yaml::from_str(content).map_err(ConfigError::CredentialsFileParse)?;
        validate_credentials(&file)?;
        Ok(file)
    }

    /// Checks a username/password pair and returns the matching user.
    ///
    /// Usernames match case-insensitively. An unknown user and a wrong
    /// password both yield `None`.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> Option<(&str, &UserCredentials)> {
        let wanted = username.trim().to_lowercase();
        let (name, user) = self
            .credentials
            .usernames
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)?;

        let parsed = PasswordHash::new(&user.password).ok()?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .ok()
            .map(|()| (name.as_str(), user))
    }

    /// Returns `true` if `email` is on the pre-authorization list.
    #[must_use]
    pub fn is_preauthorized(&self, email: &str) -> bool {
        let email = email.trim();
        self.preauthorized
            .emails
            .iter()
            .any(|e| e.eq_ignore_ascii_case(email))
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.credentials.usernames.len()
    }
}

/// Load and validate the credentials file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_credentials(path: &Path) -> Result<CredentialsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CredentialsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file = CredentialsFile::from_yaml(&content)?;
    tracing::info!(
        path = %path.display(),
        users = file.user_count(),
        preauthorized = file.preauthorized.emails.len(),
        "loaded credentials file"
    );
    Ok(file)
}

/// Hashes a password into an argon2 PHC string suitable for the credentials file.
///
/// # Errors
///
/// Returns the underlying `password_hash` error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn validate_credentials(file: &CredentialsFile) -> Result<(), ConfigError> {
    if file.credentials.usernames.is_empty() {
        return Err(ConfigError::Validation(
            "at least one user must be configured".to_string(),
        ));
    }

    let mut seen_usernames = HashSet::new();
    for (username, user) in &file.credentials.usernames {
        if username.trim().is_empty() {
            return Err(ConfigError::Validation(
                "username must be non-empty".to_string(),
            ));
        }

        if !seen_usernames.insert(username.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate username: '{username}'"
            )));
        }

        if user.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "user '{username}' has an empty display name"
            )));
        }

        if !user.email.contains('@') {
            return Err(ConfigError::Validation(format!(
                "user '{username}' has an invalid email '{}'",
                user.email
            )));
        }

        if PasswordHash::new(&user.password).is_err() {
            return Err(ConfigError::Validation(format!(
                "user '{username}' password is not a PHC hash string; generate one with `orderdesk-cli hash-password`"
            )));
        }
    }

    if file.cookie.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "cookie name must be non-empty".to_string(),
        ));
    }

    if file.cookie.key.len() < MIN_COOKIE_KEY_LEN {
        return Err(ConfigError::Validation(format!(
            "cookie key must be at least {MIN_COOKIE_KEY_LEN} bytes"
        )));
    }

    if file.cookie.expiry_days == 0 {
        return Err(ConfigError::Validation(
            "cookie expiry_days must be at least 1".to_string(),
        ));
    }

    if let Some(bad) = file
        .preauthorized
        .emails
        .iter()
        .find(|email| !email.contains('@'))
    {
        return Err(ConfigError::Validation(format!(
            "invalid pre-authorized email '{bad}'"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
