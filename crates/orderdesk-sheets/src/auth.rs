//! Bearer tokens for the Sheets API.
//!
//! A [`SheetsAuth::Static`] token is sent verbatim. A
//! [`SheetsAuth::ServiceAccount`] signs an RS256 assertion with the key's
//! private key, exchanges it at the key's `token_uri` (OAuth 2.0 JWT bearer
//! grant) and caches the access token until shortly before it expires.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::SheetsError;

const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before their stated expiry.
const EXPIRY_SKEW_SECS: i64 = 60;

/// The fields of a Google service-account JSON key that token minting needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[redacted]")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Reads and parses a key file downloaded from the Google Cloud console.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::ServiceAccountKey`] if the file cannot be read
    /// or is not a service-account key.
    pub fn from_file(path: &Path) -> Result<Self, SheetsError> {
        let key_error = |reason: String| SheetsError::ServiceAccountKey {
            path: path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| key_error(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| key_error(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_after: DateTime<Utc>,
}

/// Service-account token source with an in-memory cache.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountAuth {
    /// # Errors
    ///
    /// Returns [`SheetsError::Auth`] if the private key is not an RSA PEM.
    pub fn new(key: ServiceAccountKey) -> Result<Self, SheetsError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SheetsError::Auth(format!("invalid service account private key: {e}")))?;
        Ok(Self {
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    /// Signs the assertion exchanged for an access token.
    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, SheetsError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key.private_key_id);
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| SheetsError::Auth(format!("failed to sign assertion: {e}")))
    }

    async fn token(&self, http: &reqwest::Client) -> Result<String, SheetsError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| now < t.refresh_after) {
            return Ok(token.access_token.clone());
        }

        let assertion = self.sign_assertion(now)?;
        let response = http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SheetsError::Auth(format!(
                "token exchange at {} returned HTTP {}: {body}",
                self.key.token_uri,
                status.as_u16()
            )));
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
                context: "service account token response".to_string(),
                source: e,
            })?;

        let refresh_after = now + Duration::seconds(parsed.expires_in - EXPIRY_SKEW_SECS);
        tracing::debug!(
            client_email = %self.key.client_email,
            expires_in = parsed.expires_in,
            "minted sheets access token"
        );
        *cached = Some(CachedToken {
            access_token: parsed.access_token.clone(),
            refresh_after,
        });
        Ok(parsed.access_token)
    }
}

/// Where [`crate::SheetsClient`] gets its bearer token.
#[derive(Debug)]
pub enum SheetsAuth {
    Static(StaticToken),
    ServiceAccount(ServiceAccountAuth),
}

/// A pre-issued access token.
pub struct StaticToken(String);

impl StaticToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken([redacted])")
    }
}

impl SheetsAuth {
    #[must_use]
    pub fn static_token(token: impl Into<String>) -> Self {
        SheetsAuth::Static(StaticToken::new(token))
    }

    /// Loads a service-account key file.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::ServiceAccountKey`] or [`SheetsError::Auth`] if
    /// the key cannot be read or its private key is unusable.
    pub fn service_account_file(path: &Path) -> Result<Self, SheetsError> {
        let key = ServiceAccountKey::from_file(path)?;
        Ok(SheetsAuth::ServiceAccount(ServiceAccountAuth::new(key)?))
    }

    /// Current bearer token, minting a new one when the cache is stale.
    ///
    /// # Errors
    ///
    /// Propagates token exchange failures for service accounts.
    pub async fn bearer_token(&self, http: &reqwest::Client) -> Result<String, SheetsError> {
        match self {
            SheetsAuth::Static(StaticToken(token)) => Ok(token.clone()),
            SheetsAuth::ServiceAccount(sa) => sa.token(http).await,
        }
    }
}
