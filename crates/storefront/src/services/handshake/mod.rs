//! Form handshakes.
//!
//! A handshake drives one form through
//! `Idle -> Validating -> Submitting -> {Success, Failed}`: validate locally,
//! call the collaborator only if validation passed, then report the outcome
//! through the banner, inline errors and a [`Notifier`](super::notify::Notifier).
//!
//! Each handshake owns its form exclusively and allows one outstanding
//! collaborator call at a time.

mod login;
mod register;

pub use login::{LoginHandshake, LoginOutcome};
pub use register::{RegisterHandshake, RegisterOutcome};

use std::fmt;

/// Where a successful login lands when no destination was captured.
pub const DEFAULT_REDIRECT: &str = "/dashboard";

/// Position of a handshake in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandshakeState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Failed => "failed",
        })
    }
}

/// Resolve a captured destination into a safe local path.
///
/// Only same-site relative paths are honoured. Protocol-relative URLs,
/// absolute URLs and the auth pages themselves fall back to
/// [`DEFAULT_REDIRECT`].
#[must_use]
pub fn redirect_target(requested: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|path| is_local_path(path))
        .map_or_else(|| DEFAULT_REDIRECT.to_string(), str::to_string)
}

fn is_local_path(path: &str) -> bool {
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        return false;
    }
    let route = path.split(['?', '#']).next().unwrap_or(path);
    !matches!(route, "/login" | "/register" | "/logout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_target_defaults() {
        assert_eq!(redirect_target(None), "/dashboard");
        assert_eq!(redirect_target(Some("")), "/dashboard");
    }

    #[test]
    fn test_redirect_target_keeps_local_paths() {
        assert_eq!(redirect_target(Some("/pricing")), "/pricing");
        assert_eq!(
            redirect_target(Some("/dashboard?tab=orders")),
            "/dashboard?tab=orders"
        );
    }

    #[test]
    fn test_redirect_target_rejects_offsite() {
        assert_eq!(redirect_target(Some("https://evil.example")), "/dashboard");
        assert_eq!(redirect_target(Some("//evil.example")), "/dashboard");
        assert_eq!(redirect_target(Some("/\\evil.example")), "/dashboard");
        assert_eq!(redirect_target(Some("dashboard")), "/dashboard");
    }

    #[test]
    fn test_redirect_target_skips_auth_pages() {
        assert_eq!(redirect_target(Some("/login")), "/dashboard");
        assert_eq!(redirect_target(Some("/register?x=1")), "/dashboard");
    }
}
