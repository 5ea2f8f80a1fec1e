//! Authentication route handlers.
//!
//! Login and registration each run one handshake per request. Validation and
//! collaborator failures re-render the form; success on login stores the
//! user in the session and redirects, success on registration renders an
//! acknowledgement page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use diamond_assess_core::UserRole;
use diamond_assess_core::personas::DemoPersona;
use diamond_assess_core::validation::{
    FormField, LoginField, LoginForm, RegisterField, RegisterForm,
};

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, push_flash, set_current_user};
use crate::models::CurrentUser;
use crate::routes::layout::Layout;
use crate::services::auth::AuthError;
use crate::services::handshake::{
    LoginHandshake, LoginOutcome, RegisterHandshake, RegisterOutcome, redirect_target,
};
use crate::services::notify::{Toast, ToastQueue};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Query parameters accepted by the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Where to go after signing in.
    pub redirect: Option<String>,
    /// Role of a demo persona to pre-fill, e.g. `assessment_staff`.
    pub persona: Option<String>,
}

/// Login form submission.
#[derive(Deserialize)]
pub struct LoginSubmission {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
}

impl std::fmt::Debug for LoginSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginSubmission")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("redirect", &self.redirect)
            .field("persona", &self.persona)
            .finish()
    }
}

// =============================================================================
// Templates
// =============================================================================

/// A persona card on the login page.
#[derive(Clone)]
pub struct PersonaCard {
    pub role: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub email: &'static str,
    pub href: String,
    pub selected: bool,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    /// Only echoed back when a demo persona filled it.
    pub password: String,
    pub banner: Option<String>,
    pub email_invalid: bool,
    pub password_invalid: bool,
    pub redirect: String,
    pub persona: Option<String>,
    pub personas: Vec<PersonaCard>,
    /// A sign-in is in flight; the submit button renders disabled.
    pub busy: bool,
}

/// One input on the registration form.
#[derive(Clone)]
pub struct RegisterFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub autocomplete: &'static str,
    pub value: String,
    pub required: bool,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub fields: Vec<RegisterFieldView>,
    pub banner: Option<String>,
    pub busy: bool,
}

/// Registration acknowledgement template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register_success.html")]
pub struct RegisterSuccessTemplate {
    pub layout: Layout,
    pub email: String,
    pub message: String,
}

// =============================================================================
// View Helpers
// =============================================================================

fn persona_cards(
    personas: &[DemoPersona],
    selected: Option<UserRole>,
    redirect: &str,
) -> Vec<PersonaCard> {
    personas
        .iter()
        .map(|p| PersonaCard {
            role: p.role.as_str(),
            display_name: p.display_name,
            description: p.description,
            email: p.email,
            href: format!(
                "/login?persona={}&redirect={}",
                p.role.as_str(),
                urlencoding::encode(redirect)
            ),
            selected: selected == Some(p.role),
        })
        .collect()
}

fn login_page_from(
    layout: Layout,
    handshake: &LoginHandshake<'_>,
    personas: &[DemoPersona],
) -> LoginTemplate {
    let values = handshake.form().values();
    let errors = handshake.form().errors();
    let selected = handshake.selected_persona();

    LoginTemplate {
        layout,
        email: values.email.clone(),
        password: if selected.is_some() {
            values.password.clone()
        } else {
            String::new()
        },
        banner: handshake.banner().map(str::to_string),
        email_invalid: errors.get(LoginField::Email).is_some(),
        password_invalid: errors.get(LoginField::Password).is_some(),
        redirect: handshake.redirect_to().to_string(),
        persona: selected.map(|role| role.as_str().to_string()),
        personas: persona_cards(personas, selected, handshake.redirect_to()),
        busy: handshake.is_busy(),
    }
}

const fn register_input(field: RegisterField) -> (&'static str, &'static str, bool) {
    match field {
        RegisterField::FirstName => ("text", "given-name", true),
        RegisterField::LastName => ("text", "family-name", true),
        RegisterField::Email => ("email", "email", true),
        RegisterField::Phone => ("tel", "tel", true),
        RegisterField::Password | RegisterField::ConfirmPassword => {
            ("password", "new-password", true)
        }
        RegisterField::DateOfBirth => ("date", "bday", false),
        RegisterField::Address => ("text", "street-address", false),
    }
}

fn register_page_from(layout: Layout, handshake: &RegisterHandshake<'_>) -> RegisterTemplate {
    use diamond_assess_core::form::Form as _;

    let values = handshake.form().values();
    let errors = handshake.form().errors();

    let fields = RegisterField::ALL
        .into_iter()
        .map(|field| {
            let (input_type, autocomplete, required) = register_input(field);
            let value = if input_type == "password" {
                String::new()
            } else {
                values.value(field).to_string()
            };
            RegisterFieldView {
                name: field.name(),
                label: field.label(),
                input_type,
                autocomplete,
                value,
                required,
                error: errors.message(field),
            }
        })
        .collect();

    RegisterTemplate {
        layout,
        fields,
        banner: handshake.banner().map(str::to_string),
        busy: handshake.is_busy(),
    }
}

const fn failure_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Rejected { .. } => StatusCode::UNAUTHORIZED,
        AuthError::Timeout(_) | AuthError::Unavailable(_) | AuthError::PasswordHash => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// `?persona=<role>` pre-fills that demo persona's credentials; it never
/// signs in by itself.
#[instrument(skip(state, layout))]
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    layout: Layout,
) -> Response {
    let redirect_to = redirect_target(query.redirect.as_deref());
    if layout.user.is_some() {
        return Redirect::to(&redirect_to).into_response();
    }

    let toasts = ToastQueue::new();
    let mut handshake = LoginHandshake::new(state.auth(), &toasts)
        .with_personas(state.personas())
        .with_redirect(redirect_to);

    if let Some(role) = query.persona.as_deref().and_then(|r| r.parse::<UserRole>().ok())
        && handshake.select_persona(role)
    {
        add_breadcrumb("auth", "Demo persona selected", Some(&[("role", role.as_str())]));
    }

    login_page_from(layout, &handshake, state.personas()).into_response()
}

/// Run the login handshake.
///
/// # Errors
///
/// Returns an error if the session cannot be updated after a successful login.
#[instrument(skip(state, session, layout, submission), fields(email = %submission.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(submission): Form<LoginSubmission>,
) -> Result<Response> {
    let toasts = ToastQueue::new();
    let mut handshake = LoginHandshake::new(state.auth(), &toasts)
        .with_personas(state.personas())
        .with_timeout(state.config().login_timeout)
        .with_redirect(redirect_target(submission.redirect.as_deref()))
        .with_form(LoginForm {
            email: submission.email,
            password: submission.password,
        });

    let status = match handshake.submit().await {
        LoginOutcome::Authenticated { user, redirect_to } => {
            let current = CurrentUser::from(user);
            set_current_user(&session, &current).await?;
            set_sentry_user(&current.id, Some(current.email.as_str()));
            push_flash(&session, toasts.drain()).await?;
            return Ok(Redirect::to(&redirect_to).into_response());
        }
        LoginOutcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        LoginOutcome::Rejected(err) => failure_status(&err),
        LoginOutcome::Busy => StatusCode::CONFLICT,
    };

    let layout = layout.with_toasts(toasts.drain());
    let mut page = login_page_from(layout, &handshake, state.personas());
    page.persona = submission
        .persona
        .filter(|p| p.parse::<UserRole>().is_ok());
    Ok((status, page).into_response())
}

/// Sign out and return to the home page.
///
/// # Errors
///
/// Returns an error if the session cannot be updated.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    push_flash(&session, vec![Toast::info("You have been signed out")]).await?;
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip(state, layout))]
pub async fn register_page(State(state): State<AppState>, layout: Layout) -> impl IntoResponse {
    let toasts = ToastQueue::new();
    let handshake = RegisterHandshake::new(state.registrar(), &toasts);
    register_page_from(layout, &handshake)
}

/// Run the registration handshake.
#[instrument(skip(state, layout, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    layout: Layout,
    Form(form): Form<RegisterForm>,
) -> Response {
    let toasts = ToastQueue::new();
    let mut handshake = RegisterHandshake::new(state.registrar(), &toasts).with_form(form);

    let status = match handshake.submit().await {
        RegisterOutcome::Registered { email } => {
            let message = toasts
                .drain()
                .into_iter()
                .next()
                .map(|toast| toast.message)
                .unwrap_or_default();
            return RegisterSuccessTemplate {
                layout,
                email: email.into_inner(),
                message,
            }
            .into_response();
        }
        RegisterOutcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        RegisterOutcome::Failed(err) => failure_status(&err),
        RegisterOutcome::Busy => StatusCode::CONFLICT,
    };

    (
        status,
        register_page_from(layout.with_toasts(toasts.drain()), &handshake),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use diamond_assess_core::personas::DEMO_PERSONAS;

    use super::*;
    use crate::services::auth::DemoAuthService;
    use crate::services::registration::SimulatedRegistration;

    fn login_page(busy: bool) -> String {
        let auth = DemoAuthService::from_personas(&[]).unwrap();
        let toasts = ToastQueue::new();
        let handshake = LoginHandshake::new(&auth, &toasts);
        let mut page = login_page_from(Layout::default(), &handshake, &[]);
        assert!(!page.busy);
        page.busy = busy;
        page.render().unwrap()
    }

    fn register_page(busy: bool) -> String {
        let registrar = SimulatedRegistration::new(Duration::ZERO);
        let toasts = ToastQueue::new();
        let handshake = RegisterHandshake::new(&registrar, &toasts);
        let mut page = register_page_from(Layout::default(), &handshake);
        assert!(!page.busy);
        page.busy = busy;
        page.render().unwrap()
    }

    #[test]
    fn test_login_button_idle() {
        let html = login_page(false);
        assert!(html.contains("data-busy-form"));
        assert!(html.contains(r#"data-busy-label="Signing in...">Sign in</button>"#));
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn test_login_button_busy() {
        let html = login_page(true);
        assert!(html.contains(
            r#"data-busy-label="Signing in..." disabled aria-busy="true">Signing in...</button>"#
        ));
    }

    #[test]
    fn test_register_button_busy_state() {
        let idle = register_page(false);
        assert!(idle.contains(r#"data-busy-label="Creating account...">Create account</button>"#));
        assert!(!idle.contains("aria-busy"));

        let busy = register_page(true);
        assert!(busy.contains(r#"disabled aria-busy="true">Creating account...</button>"#));
    }

    #[test]
    fn test_pages_load_form_script() {
        assert!(login_page(false).contains(r#"<script src="/static/js/forms.js" defer></script>"#));
    }

    #[test]
    fn test_persona_cards_link_back_with_redirect() {
        let cards = persona_cards(&DEMO_PERSONAS, Some(UserRole::Manager), "/pricing");
        assert_eq!(cards.len(), 5);
        assert_eq!(
            cards[1].href,
            "/login?persona=manager&redirect=%2Fpricing"
        );
        assert!(cards[1].selected);
        assert!(!cards[0].selected);
    }

    #[test]
    fn test_register_inputs() {
        assert_eq!(register_input(RegisterField::Password).0, "password");
        assert!(!register_input(RegisterField::Address).2);
        assert!(register_input(RegisterField::Phone).2);
    }
}
