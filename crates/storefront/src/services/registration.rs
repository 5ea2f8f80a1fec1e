//! Registration collaborator.
//!
//! Account creation is not wired to a back office yet. [`SimulatedRegistration`]
//! waits for a fixed delay and then accepts, so the register page behaves
//! like the real thing without persisting anything.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;

use diamond_assess_core::validation::RegisterForm;
use diamond_assess_core::{Email, EmailError};

use super::auth::AuthError;

/// A validated registration, ready to hand to the collaborator.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub password: SecretString,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl Registration {
    /// Build from a form that already passed validation.
    ///
    /// Text fields are trimmed the same way the validator trims them. An
    /// unparseable date of birth is dropped since the field is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the email does not parse.
    pub fn from_form(form: &RegisterForm) -> Result<Self, EmailError> {
        let email = Email::parse(form.email.trim())?;
        let date_of_birth = NaiveDate::parse_from_str(form.date_of_birth.trim(), "%Y-%m-%d").ok();
        let address = Some(form.address.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        Ok(Self {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email,
            phone: form.phone.trim().to_string(),
            password: SecretString::from(form.password.clone()),
            date_of_birth,
            address,
        })
    }
}

/// Creates customer accounts.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Submit a registration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] if the service refuses the
    /// registration, or [`AuthError::Unavailable`] on outage.
    async fn register(&self, registration: Registration) -> Result<(), AuthError>;
}

/// Accepts every registration after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedRegistration {
    delay: Duration,
}

impl SimulatedRegistration {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RegistrationService for SimulatedRegistration {
    async fn register(&self, registration: Registration) -> Result<(), AuthError> {
        tokio::time::sleep(self.delay).await;
        tracing::info!(
            email = %registration.email,
            has_address = registration.address.is_some(),
            "Simulated registration accepted"
        );
        Ok(())
    }
}
