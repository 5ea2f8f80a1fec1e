//! Login collaborator.
//!
//! Route handlers and the login handshake talk to an [`AuthService`] trait
//! object held in application state. Two implementations exist:
//!
//! - [`DemoAuthService`] - in-memory accounts built from the demo personas,
//!   with Argon2id password hashes. Only wired up in demo mode.
//! - [`RemoteAuthService`] - JSON login service reached over HTTP.

mod demo;
mod error;
mod remote;

pub use demo::DemoAuthService;
pub use error::{AuthError, GENERIC_REJECTION, UNAVAILABLE_MESSAGE};
pub use remote::RemoteAuthService;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use diamond_assess_core::{Email, UserId, UserRole};

/// Who the login service says just signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub display_name: String,
}

/// Establishes a session for an email/password pair.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] for bad credentials and
    /// [`AuthError::Unavailable`] when the service cannot answer.
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthenticatedUser, AuthError>;
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::Rejected { message: None })
}
