//! Authentication error types.

use std::time::Duration;

use thiserror::Error;

/// Shown when the login service rejects without saying why.
pub const GENERIC_REJECTION: &str = "Invalid email or password";

/// Shown when the login service cannot be reached in time.
pub const UNAVAILABLE_MESSAGE: &str =
    "The sign-in service is not responding. Please try again in a moment.";

/// Errors returned by the login and registration collaborators.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The service refused the credentials or registration.
    #[error("authentication rejected: {}", .message.as_deref().unwrap_or("no reason given"))]
    Rejected {
        /// Human-readable reason supplied by the service, if any.
        message: Option<String>,
    },

    /// The service did not answer within the configured bound.
    #[error("login service timed out after {0:?}")]
    Timeout(Duration),

    /// The service could not be reached or answered with garbage.
    #[error("login service unavailable: {0}")]
    Unavailable(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// A rejection carrying the service's own message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: Some(message.into()),
        }
    }

    /// Text for the banner under the form.
    ///
    /// Rejections show the service's message, falling back to a generic
    /// invalid-credentials line. Everything else is reported as an outage
    /// without internal detail.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(GENERIC_REJECTION)
                .to_string(),
            Self::Timeout(_) | Self::Unavailable(_) | Self::PasswordHash => {
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }
}
