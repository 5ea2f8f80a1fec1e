//! Session-related types.

use serde::{Deserialize, Serialize};

use diamond_assess_core::{Email, UserId, UserRole};

use crate::services::auth::AuthenticatedUser;

/// Session-stored user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub display_name: String,
}

impl CurrentUser {
    /// Role label for the dashboard, e.g. `Assessment Staff`.
    #[must_use]
    pub const fn role_label(&self) -> &'static str {
        self.role.label()
    }
}

impl From<AuthenticatedUser> for CurrentUser {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            display_name: user.display_name,
        }
    }
}

/// Session keys.
pub mod keys {
    /// The signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Toasts waiting for the next rendered page.
    pub const FLASH: &str = "flash";
}
