//! Per-browser session state: the logged-in user, the pending order draft
//! and a one-shot notice shown on the next form render.
//!
//! Sessions live in an in-memory store behind a signed cookie whose name,
//! signing key and lifetime come from the credentials file.

use orderdesk_core::{CookieSettings, OrderDraft};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use tower_sessions::cookie::{time::Duration, Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

const USER_KEY: &str = "user";
const DRAFT_KEY: &str = "draft";
const NOTICE_KEY: &str = "notice";

/// The authenticated user of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub name: String,
}

impl SessionUser {
    /// Full name, or the username when no name is on file.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

/// Expands the configured cookie key to the 64 bytes cookie signing needs.
fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Session layer configured from the credentials file's cookie settings.
pub fn layer(
    cookie: &CookieSettings,
    secure: bool,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(cookie.name.clone())
        .with_expiry(Expiry::OnInactivity(Duration::days(i64::from(
            cookie.expiry_days,
        ))))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(&cookie.key))
}

pub async fn current_user(
    session: &Session,
) -> Result<Option<SessionUser>, tower_sessions::session::Error> {
    session.get::<SessionUser>(USER_KEY).await
}

/// Starts an authenticated session under a fresh id.
pub async fn log_in(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(USER_KEY, user).await
}

/// Drops the user, the draft and any notice.
pub async fn log_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

pub async fn load_draft(session: &Session) -> Result<OrderDraft, tower_sessions::session::Error> {
    Ok(session.get::<OrderDraft>(DRAFT_KEY).await?.unwrap_or_default())
}

pub async fn save_draft(
    session: &Session,
    draft: &OrderDraft,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(DRAFT_KEY, draft).await
}

pub async fn set_notice(
    session: &Session,
    notice: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(NOTICE_KEY, notice.into()).await
}

/// Returns and clears the pending notice.
pub async fn take_notice(session: &Session) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(NOTICE_KEY).await
}
