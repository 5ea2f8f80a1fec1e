//! Session middleware configuration and flash messages.
//!
//! Sessions live in process memory; a restart signs everyone out.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::SiteConfig;
use crate::models::session_keys;
use crate::services::notify::Toast;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "da_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &SiteConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Queue toasts for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push_flash(
    session: &Session,
    toasts: Vec<Toast>,
) -> Result<(), tower_sessions::session::Error> {
    if toasts.is_empty() {
        return Ok(());
    }
    let mut pending: Vec<Toast> = session
        .get(session_keys::FLASH)
        .await?
        .unwrap_or_default();
    pending.extend(toasts);
    session.insert(session_keys::FLASH, pending).await
}

/// Take and clear queued toasts.
///
/// Sessions without pending toasts are left untouched so anonymous page
/// views do not create a session. A broken session yields no toasts rather
/// than failing the page.
pub async fn take_flash(session: &Session) -> Vec<Toast> {
    let pending = match session.get::<Vec<Toast>>(session_keys::FLASH).await {
        Ok(Some(toasts)) => toasts,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages");
            return Vec::new();
        }
    };

    if let Err(e) = session.remove::<Vec<Toast>>(session_keys::FLASH).await {
        tracing::warn!(error = %e, "Failed to clear flash messages");
    }
    pending
}
