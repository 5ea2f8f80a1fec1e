//! In-memory login service for demo deployments.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use diamond_assess_core::Email;
use diamond_assess_core::UserId;
use diamond_assess_core::personas::DemoPersona;

use super::{AuthError, AuthService, AuthenticatedUser, hash_password, verify_password};

struct DemoAccount {
    user: AuthenticatedUser,
    password_hash: String,
}

/// Accepts exactly the demo persona credentials.
///
/// Passwords are hashed once at construction; plaintext is not retained.
pub struct DemoAuthService {
    accounts: Vec<DemoAccount>,
}

impl DemoAuthService {
    /// Build accounts for the given personas. IDs are assigned in order from 1.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PasswordHash`] if hashing fails, or
    /// [`AuthError::Unavailable`] if a fixture email does not parse.
    pub fn from_personas(personas: &[DemoPersona]) -> Result<Self, AuthError> {
        let mut accounts = Vec::with_capacity(personas.len());

        for (id, persona) in (1..).zip(personas) {
            let email = Email::parse(persona.email)
                .map_err(|e| AuthError::Unavailable(format!("bad demo email: {e}")))?;
            accounts.push(DemoAccount {
                user: AuthenticatedUser {
                    id: UserId::new(id),
                    email,
                    role: persona.role,
                    display_name: persona.display_name.to_string(),
                },
                password_hash: hash_password(persona.password)?,
            });
        }

        tracing::info!(accounts = accounts.len(), "Demo login accounts ready");
        Ok(Self { accounts })
    }
}

#[async_trait]
impl AuthService for DemoAuthService {
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthenticatedUser, AuthError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.user.email.matches(email))
            .ok_or(AuthError::Rejected { message: None })?;

        verify_password(password.expose_secret(), &account.password_hash)?;

        Ok(account.user.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use diamond_assess_core::UserRole;
    use diamond_assess_core::personas::DEMO_PERSONAS;

    use super::*;

    #[tokio::test]
    async fn test_persona_credentials_accepted() {
        let service = DemoAuthService::from_personas(&DEMO_PERSONAS[..2]).unwrap();
        let user = service
            .login("admin@diamond.com", &SecretString::from("password123"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.display_name, "Admin");
        assert_eq!(user.id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected_without_message() {
        let service = DemoAuthService::from_personas(&DEMO_PERSONAS[..1]).unwrap();
        let err = service
            .login("admin@diamond.com", &SecretString::from("password124"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected { message: None }));
    }

    #[tokio::test]
    async fn test_unknown_email_rejected() {
        let service = DemoAuthService::from_personas(&DEMO_PERSONAS[..1]).unwrap();
        let err = service
            .login("ghost@diamond.com", &SecretString::from("password123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_no_personas_rejects_everything() {
        let service = DemoAuthService::from_personas(&[]).unwrap();
        assert!(
            service
                .login("admin@diamond.com", &SecretString::from("password123"))
                .await
                .is_err()
        );
    }
}
