//! Login handshake.

use std::time::Duration;

use secrecy::SecretString;

use diamond_assess_core::UserRole;
use diamond_assess_core::form::{FieldChange, FormState};
use diamond_assess_core::personas::{self, DemoPersona};
use diamond_assess_core::validation::{FormField, LoginField, LoginForm};

use super::{DEFAULT_REDIRECT, HandshakeState};
use crate::services::auth::{AuthError, AuthService, AuthenticatedUser};
use crate::services::notify::{Notifier, Toast};

/// Default bound on the login call.
pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of one [`LoginHandshake::submit`].
#[derive(Debug)]
pub enum LoginOutcome {
    /// Validation failed; the banner holds the first error.
    Invalid,
    /// The service accepted the credentials.
    Authenticated {
        user: AuthenticatedUser,
        redirect_to: String,
    },
    /// The service refused, timed out or was unreachable.
    Rejected(AuthError),
    /// A previous submission is still outstanding.
    Busy,
}

/// Drives the login form for one visitor.
///
/// Validation failures surface as a single banner message, the first error
/// in field order. Persona selection only fills the form; it never submits.
pub struct LoginHandshake<'a> {
    auth: &'a dyn AuthService,
    notifier: &'a dyn Notifier,
    personas: &'a [DemoPersona],
    timeout: Duration,
    form: FormState<LoginForm>,
    state: HandshakeState,
    busy: bool,
    banner: Option<String>,
    selected_persona: Option<UserRole>,
    redirect_to: String,
    history: Vec<HandshakeState>,
}

impl<'a> LoginHandshake<'a> {
    pub fn new(auth: &'a dyn AuthService, notifier: &'a dyn Notifier) -> Self {
        Self {
            auth,
            notifier,
            personas: &[],
            timeout: DEFAULT_LOGIN_TIMEOUT,
            form: FormState::default(),
            state: HandshakeState::Idle,
            busy: false,
            banner: None,
            selected_persona: None,
            redirect_to: DEFAULT_REDIRECT.to_string(),
            history: vec![HandshakeState::Idle],
        }
    }

    /// Personas offered for selection and used to greet known accounts.
    #[must_use]
    pub fn with_personas(mut self, personas: &'a [DemoPersona]) -> Self {
        self.personas = personas;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Destination captured before login began.
    #[must_use]
    pub fn with_redirect(mut self, redirect_to: impl Into<String>) -> Self {
        self.redirect_to = redirect_to.into();
        self
    }

    /// Start from submitted values.
    #[must_use]
    pub fn with_form(mut self, form: LoginForm) -> Self {
        self.form = FormState::new(form);
        self
    }

    #[must_use]
    pub const fn state(&self) -> HandshakeState {
        self.state
    }

    /// Every state entered so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HandshakeState] {
        &self.history
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    #[must_use]
    pub const fn form(&self) -> &FormState<LoginForm> {
        &self.form
    }

    #[must_use]
    pub const fn selected_persona(&self) -> Option<UserRole> {
        self.selected_persona
    }

    #[must_use]
    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    /// Apply a field edit.
    pub fn change(&mut self, change: FieldChange<LoginField>) {
        self.form.apply(change);
    }

    /// Copy a persona's credentials into the form.
    ///
    /// Returns `false` if no persona has that role.
    pub fn select_persona(&mut self, role: UserRole) -> bool {
        let Some(persona) = personas::by_role(self.personas, role) else {
            return false;
        };
        self.form
            .apply(FieldChange::new(LoginField::Email, persona.email));
        self.form
            .apply(FieldChange::new(LoginField::Password, persona.password));
        self.selected_persona = Some(role);
        true
    }

    /// Validate and, if the form is clean, call the login service.
    pub async fn submit(&mut self) -> LoginOutcome {
        if self.busy {
            tracing::warn!("Login submitted while a previous attempt is outstanding");
            return LoginOutcome::Busy;
        }

        self.enter(HandshakeState::Validating);
        if !self.form.validate() {
            self.banner = self
                .form
                .errors()
                .first()
                .map(|(field, error)| field.message(error));
            self.enter(HandshakeState::Idle);
            return LoginOutcome::Invalid;
        }

        self.banner = None;
        self.busy = true;
        self.enter(HandshakeState::Submitting);

        let email = self.form.values().email.trim().to_string();
        let password = SecretString::from(self.form.values().password.clone());
        let result = tokio::time::timeout(self.timeout, self.auth.login(&email, &password))
            .await
            .unwrap_or(Err(AuthError::Timeout(self.timeout)));
        self.busy = false;

        match result {
            Ok(user) => {
                self.enter(HandshakeState::Success);
                let message = personas::by_email(self.personas, &email).map_or_else(
                    || "Login successful".to_string(),
                    |persona| format!("Welcome back, {}!", persona.display_name),
                );
                self.notifier.notify(Toast::success(message));
                tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");

                LoginOutcome::Authenticated {
                    user,
                    redirect_to: self.redirect_to.clone(),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Login failed");
                self.enter(HandshakeState::Failed);
                let message = err.user_message();
                self.notifier.notify(Toast::error(message.clone()));
                self.banner = Some(message);
                self.enter(HandshakeState::Idle);
                LoginOutcome::Rejected(err)
            }
        }
    }

    fn enter(&mut self, state: HandshakeState) {
        tracing::debug!(from = %self.state, to = %state, "Login handshake");
        self.state = state;
        self.history.push(state);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use secrecy::ExposeSecret;

    use diamond_assess_core::personas::DEMO_PERSONAS;
    use diamond_assess_core::{Email, UserId};

    use super::*;
    use crate::services::auth::GENERIC_REJECTION;
    use crate::services::notify::{ToastLevel, ToastQueue};

    /// Accepts `password123` for any address and counts calls.
    #[derive(Default)]
    struct StubAuth {
        calls: AtomicUsize,
        delay: Option<Duration>,
        reject_with: Option<&'static str>,
    }

    #[async_trait]
    impl AuthService for StubAuth {
        async fn login(
            &self,
            email: &str,
            password: &SecretString,
        ) -> Result<AuthenticatedUser, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = self.reject_with {
                return Err(AuthError::rejected(message));
            }
            if password.expose_secret() != "password123" {
                return Err(AuthError::Rejected { message: None });
            }
            Ok(AuthenticatedUser {
                id: UserId::new(1),
                email: Email::parse(email).unwrap(),
                role: UserRole::Admin,
                display_name: "Admin".to_string(),
            })
        }
    }

    impl StubAuth {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_empty_form_never_submits() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts);

        let outcome = handshake.submit().await;

        assert!(matches!(outcome, LoginOutcome::Invalid));
        assert_eq!(handshake.banner(), Some("Email is required"));
        assert_eq!(handshake.form().errors().len(), 2);
        assert!(!handshake.history().contains(&HandshakeState::Submitting));
        assert_eq!(handshake.state(), HandshakeState::Idle);
        assert_eq!(auth.calls(), 0);
        assert!(toasts.drain().is_empty());
    }

    #[tokio::test]
    async fn test_bad_email_banner() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts).with_form(LoginForm {
            email: "not-an-email".to_string(),
            password: String::new(),
        });

        handshake.submit().await;

        assert_eq!(handshake.banner(), Some("Please enter a valid email"));
        assert_eq!(auth.calls(), 0);
    }

    #[tokio::test]
    async fn test_admin_persona_login() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts).with_personas(&DEMO_PERSONAS);

        assert!(handshake.select_persona(UserRole::Admin));
        let outcome = handshake.submit().await;

        let LoginOutcome::Authenticated { user, redirect_to } = outcome else {
            panic!("expected authenticated outcome");
        };
        assert_eq!(user.email.as_str(), "admin@diamond.com");
        assert_eq!(redirect_to, "/dashboard");
        assert_eq!(
            handshake.history(),
            [
                HandshakeState::Idle,
                HandshakeState::Validating,
                HandshakeState::Submitting,
                HandshakeState::Success,
            ]
        );
        assert!(!handshake.is_busy());

        let toasts = toasts.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Success);
        assert!(toasts[0].message.contains("Admin"));
    }

    #[tokio::test]
    async fn test_captured_redirect_is_used() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts)
            .with_redirect("/pricing")
            .with_form(LoginForm {
                email: "someone@example.com".to_string(),
                password: "password123".to_string(),
            });

        let LoginOutcome::Authenticated { redirect_to, .. } = handshake.submit().await else {
            panic!("expected authenticated outcome");
        };
        assert_eq!(redirect_to, "/pricing");
        assert_eq!(toasts.drain()[0].message, "Login successful");
    }

    #[test]
    fn test_select_persona_only_touches_credentials() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts)
            .with_personas(&DEMO_PERSONAS)
            .with_redirect("/services");

        assert!(handshake.select_persona(UserRole::Consultant));

        let values = handshake.form().values();
        assert_eq!(values.email, "consultant@diamond.com");
        assert_eq!(values.password, "password123");
        assert_eq!(handshake.selected_persona(), Some(UserRole::Consultant));
        assert_eq!(handshake.state(), HandshakeState::Idle);
        assert_eq!(handshake.redirect_to(), "/services");
        assert!(handshake.banner().is_none());
        assert_eq!(auth.calls(), 0);
    }

    #[test]
    fn test_select_unknown_persona() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts);

        assert!(!handshake.select_persona(UserRole::Admin));
        assert!(handshake.form().values().email.is_empty());
        assert!(handshake.selected_persona().is_none());
    }

    #[tokio::test]
    async fn test_editing_clears_field_error() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts);

        handshake.submit().await;
        handshake.change(FieldChange::new(LoginField::Email, "a"));

        assert!(handshake.form().errors().get(LoginField::Email).is_none());
        assert!(handshake.form().errors().get(LoginField::Password).is_some());
    }

    #[tokio::test]
    async fn test_rejection_uses_service_message() {
        let auth = StubAuth {
            reject_with: Some("Account locked"),
            ..StubAuth::default()
        };
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts).with_form(LoginForm {
            email: "admin@diamond.com".to_string(),
            password: "password123".to_string(),
        });

        let outcome = handshake.submit().await;

        assert!(matches!(outcome, LoginOutcome::Rejected(_)));
        assert_eq!(handshake.banner(), Some("Account locked"));
        assert_eq!(handshake.state(), HandshakeState::Idle);
        assert!(handshake.history().contains(&HandshakeState::Failed));
        assert!(!handshake.is_busy());
        assert_eq!(toasts.drain()[0].level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn test_rejection_without_message_is_generic() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts).with_form(LoginForm {
            email: "admin@diamond.com".to_string(),
            password: "wrong-password".to_string(),
        });

        handshake.submit().await;

        assert_eq!(handshake.banner(), Some(GENERIC_REJECTION));
    }

    #[tokio::test]
    async fn test_new_submit_clears_old_banner() {
        let auth = StubAuth::default();
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts);

        handshake.submit().await;
        assert!(handshake.banner().is_some());

        handshake.change(FieldChange::new(LoginField::Email, "admin@diamond.com"));
        handshake.change(FieldChange::new(LoginField::Password, "password123"));
        handshake.submit().await;

        assert!(handshake.banner().is_none());
        assert_eq!(handshake.state(), HandshakeState::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_service_times_out() {
        let auth = StubAuth {
            delay: Some(Duration::from_secs(60)),
            ..StubAuth::default()
        };
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts)
            .with_timeout(Duration::from_secs(5))
            .with_form(LoginForm {
                email: "admin@diamond.com".to_string(),
                password: "password123".to_string(),
            });

        let outcome = handshake.submit().await;

        assert!(matches!(
            outcome,
            LoginOutcome::Rejected(AuthError::Timeout(_))
        ));
        assert_eq!(
            handshake.banner(),
            Some(crate::services::auth::UNAVAILABLE_MESSAGE)
        );
        assert!(!handshake.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_submission_keeps_busy() {
        let auth = StubAuth {
            delay: Some(Duration::from_secs(3)),
            ..StubAuth::default()
        };
        let toasts = ToastQueue::new();
        let mut handshake = LoginHandshake::new(&auth, &toasts).with_form(LoginForm {
            email: "admin@diamond.com".to_string(),
            password: "password123".to_string(),
        });

        let abandoned = tokio::time::timeout(Duration::from_secs(1), handshake.submit()).await;
        assert!(abandoned.is_err());
        assert!(handshake.is_busy());

        let outcome = handshake.submit().await;
        assert!(matches!(outcome, LoginOutcome::Busy));
        assert_eq!(auth.calls(), 1);
    }
}
