//! Registration handshake.

use diamond_assess_core::Email;
use diamond_assess_core::form::{FieldChange, FormState};
use diamond_assess_core::validation::{FieldError, RegisterField, RegisterForm};

use super::HandshakeState;
use crate::services::auth::AuthError;
use crate::services::notify::{Notifier, Toast};
use crate::services::registration::{Registration, RegistrationService};

/// Acknowledgement shown once the account request is accepted.
pub const REGISTERED_MESSAGE: &str =
    "Registration successful! Please check your email to verify your account.";

/// Result of one [`RegisterHandshake::submit`].
#[derive(Debug)]
pub enum RegisterOutcome {
    /// Validation failed; every error is shown under its field.
    Invalid,
    /// The account request was accepted.
    Registered { email: Email },
    /// The registration service refused or failed.
    Failed(AuthError),
    /// A previous submission is still outstanding.
    Busy,
}

/// Drives the registration form for one visitor.
///
/// Unlike login, every failing field is reported at once.
pub struct RegisterHandshake<'a> {
    registrar: &'a dyn RegistrationService,
    notifier: &'a dyn Notifier,
    form: FormState<RegisterForm>,
    state: HandshakeState,
    busy: bool,
    banner: Option<String>,
    history: Vec<HandshakeState>,
}

impl<'a> RegisterHandshake<'a> {
    pub fn new(registrar: &'a dyn RegistrationService, notifier: &'a dyn Notifier) -> Self {
        Self {
            registrar,
            notifier,
            form: FormState::default(),
            state: HandshakeState::Idle,
            busy: false,
            banner: None,
            history: vec![HandshakeState::Idle],
        }
    }

    #[must_use]
    pub fn with_form(mut self, form: RegisterForm) -> Self {
        self.form = FormState::new(form);
        self
    }

    #[must_use]
    pub const fn state(&self) -> HandshakeState {
        self.state
    }

    #[must_use]
    pub fn history(&self) -> &[HandshakeState] {
        &self.history
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Collaborator failure text; validation errors are inline only.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    #[must_use]
    pub const fn form(&self) -> &FormState<RegisterForm> {
        &self.form
    }

    pub fn change(&mut self, change: FieldChange<RegisterField>) {
        self.form.apply(change);
    }

    /// Validate every field and, if clean, hand the registration over.
    pub async fn submit(&mut self) -> RegisterOutcome {
        if self.busy {
            tracing::warn!("Registration submitted while a previous attempt is outstanding");
            return RegisterOutcome::Busy;
        }

        self.enter(HandshakeState::Validating);
        if !self.form.validate() {
            tracing::debug!(errors = self.form.errors().len(), "Registration form invalid");
            self.enter(HandshakeState::Idle);
            return RegisterOutcome::Invalid;
        }
        let registration = match Registration::from_form(self.form.values()) {
            Ok(registration) => registration,
            Err(err) => {
                tracing::warn!(error = %err, "Validated registration has an unusable email");
                self.form.reject(RegisterField::Email, FieldError::InvalidFormat);
                self.enter(HandshakeState::Idle);
                return RegisterOutcome::Invalid;
            }
        };

        self.banner = None;
        self.busy = true;
        self.enter(HandshakeState::Submitting);

        let email = registration.email.clone();
        let result = self.registrar.register(registration).await;
        self.busy = false;

        match result {
            Ok(()) => {
                self.enter(HandshakeState::Success);
                self.notifier.notify(Toast::success(REGISTERED_MESSAGE));
                RegisterOutcome::Registered { email }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Registration failed");
                self.enter(HandshakeState::Failed);
                let message = err.user_message();
                self.notifier.notify(Toast::error(message.clone()));
                self.banner = Some(message);
                self.enter(HandshakeState::Idle);
                RegisterOutcome::Failed(err)
            }
        }
    }

    fn enter(&mut self, state: HandshakeState) {
        tracing::debug!(from = %self.state, to = %state, "Registration handshake");
        self.state = state;
        self.history.push(state);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::services::notify::{ToastLevel, ToastQueue};

    /// Records every registration it receives.
    #[derive(Default)]
    struct RecordingRegistrar {
        received: Mutex<Vec<String>>,
        refuse: bool,
    }

    #[async_trait]
    impl RegistrationService for RecordingRegistrar {
        async fn register(&self, registration: Registration) -> Result<(), AuthError> {
            self.received
                .lock()
                .unwrap()
                .push(registration.email.into_inner());
            if self.refuse {
                return Err(AuthError::rejected("Email already registered"));
            }
            Ok(())
        }
    }

    impl RecordingRegistrar {
        fn count(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    fn valid_form() -> RegisterForm {
        RegisterForm {
            first_name: "Minh".to_string(),
            last_name: "Nguyen".to_string(),
            email: "minh@example.com".to_string(),
            phone: "0912345678".to_string(),
            password: "abcdefgh".to_string(),
            confirm_password: "abcdefgh".to_string(),
            date_of_birth: String::new(),
            address: String::new(),
        }
    }

    #[tokio::test]
    async fn test_mismatch_only_error_blocks_submission() {
        let registrar = RecordingRegistrar::default();
        let toasts = ToastQueue::new();
        let mut form = valid_form();
        form.confirm_password = "abcdefg".to_string();
        let mut handshake = RegisterHandshake::new(&registrar, &toasts).with_form(form);

        let outcome = handshake.submit().await;

        assert!(matches!(outcome, RegisterOutcome::Invalid));
        let errors: Vec<_> = handshake.form().errors().iter().collect();
        assert_eq!(
            errors,
            vec![(RegisterField::ConfirmPassword, FieldError::Mismatch)]
        );
        assert!(handshake.banner().is_none());
        assert_eq!(registrar.count(), 0);
    }

    #[tokio::test]
    async fn test_empty_form_shows_every_error() {
        let registrar = RecordingRegistrar::default();
        let toasts = ToastQueue::new();
        let mut handshake = RegisterHandshake::new(&registrar, &toasts);

        handshake.submit().await;

        let errors = handshake.form().errors();
        for field in [
            RegisterField::FirstName,
            RegisterField::LastName,
            RegisterField::Email,
            RegisterField::Phone,
            RegisterField::Password,
        ] {
            assert_eq!(errors.get(field), Some(FieldError::Required), "{field:?}");
        }
        assert!(errors.get(RegisterField::DateOfBirth).is_none());
        assert!(errors.get(RegisterField::Address).is_none());
        assert!(!handshake.history().contains(&HandshakeState::Submitting));
    }

    #[tokio::test]
    async fn test_valid_form_registers() {
        let registrar = RecordingRegistrar::default();
        let toasts = ToastQueue::new();
        let mut handshake = RegisterHandshake::new(&registrar, &toasts).with_form(valid_form());

        let outcome = handshake.submit().await;

        let RegisterOutcome::Registered { email } = outcome else {
            panic!("expected registration");
        };
        assert_eq!(email.as_str(), "minh@example.com");
        assert_eq!(handshake.state(), HandshakeState::Success);
        assert_eq!(registrar.count(), 1);

        let toasts = toasts.drain();
        assert_eq!(toasts[0].level, ToastLevel::Success);
        assert_eq!(toasts[0].message, REGISTERED_MESSAGE);
    }

    #[tokio::test]
    async fn test_padded_email_registers_trimmed() {
        let registrar = RecordingRegistrar::default();
        let toasts = ToastQueue::new();
        let mut form = valid_form();
        form.email = " minh@example.com  ".to_string();
        let mut handshake = RegisterHandshake::new(&registrar, &toasts).with_form(form);

        let outcome = handshake.submit().await;

        let RegisterOutcome::Registered { email } = outcome else {
            panic!("expected registration, got {outcome:?}");
        };
        assert_eq!(email.as_str(), "minh@example.com");
        assert_eq!(
            registrar.received.lock().unwrap().as_slice(),
            ["minh@example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_refusal_sets_banner() {
        let registrar = RecordingRegistrar {
            refuse: true,
            ..RecordingRegistrar::default()
        };
        let toasts = ToastQueue::new();
        let mut handshake = RegisterHandshake::new(&registrar, &toasts).with_form(valid_form());

        let outcome = handshake.submit().await;

        assert!(matches!(outcome, RegisterOutcome::Failed(_)));
        assert_eq!(handshake.banner(), Some("Email already registered"));
        assert_eq!(handshake.state(), HandshakeState::Idle);
        assert!(!handshake.is_busy());
    }

    #[tokio::test]
    async fn test_editing_clears_only_that_field() {
        let registrar = RecordingRegistrar::default();
        let toasts = ToastQueue::new();
        let mut handshake = RegisterHandshake::new(&registrar, &toasts);

        handshake.submit().await;
        handshake.change(FieldChange::new(RegisterField::Phone, "0900000000"));

        let errors = handshake.form().errors();
        assert!(errors.get(RegisterField::Phone).is_none());
        assert!(errors.get(RegisterField::FirstName).is_some());
    }
}
