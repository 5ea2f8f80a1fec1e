//! Data every full page needs from the base template.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::middleware::{OptionalAuth, take_flash};
use crate::models::CurrentUser;
use crate::services::notify::Toast;

/// Signed-in user for the nav bar and toasts flashed by the previous request.
///
/// Extracting a `Layout` consumes pending flash messages, so only extract it
/// in handlers that render a page.
#[derive(Debug, Default)]
pub struct Layout {
    pub user: Option<CurrentUser>,
    pub toasts: Vec<Toast>,
}

impl Layout {
    /// Layout for a page rendered in the same request that produced `toasts`.
    #[must_use]
    pub fn with_toasts(mut self, toasts: Vec<Toast>) -> Self {
        self.toasts.extend(toasts);
        self
    }
}

impl<S> FromRequestParts<S> for Layout
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(OptionalAuth(user)) = OptionalAuth::from_request_parts(parts, state).await;
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self {
                user,
                toasts: Vec::new(),
            });
        };
        let toasts = take_flash(session).await;

        Ok(Self { user, toasts })
    }
}
