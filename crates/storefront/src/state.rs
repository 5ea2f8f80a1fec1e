//! Application state shared across handlers.

use std::sync::Arc;

use diamond_assess_core::personas::{DEMO_PERSONAS, DemoPersona};

use crate::config::{AuthBackend, SiteConfig};
use crate::content::{ContentError, ContentStore};
use crate::services::auth::{AuthError, AuthService, DemoAuthService, RemoteAuthService};
use crate::services::registration::{RegistrationService, SimulatedRegistration};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("login service setup failed: {0}")]
    Auth(#[from] AuthError),
    #[error("content loading failed: {0}")]
    Content(#[from] ContentError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Collaborators are held as trait objects so
/// handlers and tests never depend on a concrete backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    auth: Arc<dyn AuthService>,
    registrar: Arc<dyn RegistrationService>,
    content: ContentStore,
    personas: &'static [DemoPersona],
}

impl AppState {
    /// Build state from configuration, wiring the configured backends.
    ///
    /// Demo personas are only exposed when demo mode is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the login backend cannot be created or the content
    /// directory cannot be read.
    pub fn new(config: SiteConfig) -> Result<Self, StateError> {
        let auth: Arc<dyn AuthService> = match &config.auth {
            AuthBackend::Demo => Arc::new(DemoAuthService::from_personas(&DEMO_PERSONAS)?),
            AuthBackend::Remote { api_url, api_token } => {
                Arc::new(RemoteAuthService::new(api_url, api_token.clone())?)
            }
        };
        let registrar = Arc::new(SimulatedRegistration::new(config.registration_delay));
        let content = ContentStore::load(&config.content_dir)?;

        Ok(Self::with_services(config, auth, registrar, content))
    }

    /// Build state around explicit collaborators.
    #[must_use]
    pub fn with_services(
        config: SiteConfig,
        auth: Arc<dyn AuthService>,
        registrar: Arc<dyn RegistrationService>,
        content: ContentStore,
    ) -> Self {
        let personas: &'static [DemoPersona] = if config.demo_mode {
            &DEMO_PERSONAS
        } else {
            &[]
        };

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                registrar,
                content,
                personas,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// The login collaborator.
    #[must_use]
    pub fn auth(&self) -> &dyn AuthService {
        self.inner.auth.as_ref()
    }

    /// The registration collaborator.
    #[must_use]
    pub fn registrar(&self) -> &dyn RegistrationService {
        self.inner.registrar.as_ref()
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Personas offered on the login page; empty outside demo mode.
    #[must_use]
    pub fn personas(&self) -> &'static [DemoPersona] {
        self.inner.personas
    }
}
