//! End-to-end tests for the Diamond Assess web site.
//!
//! Each test spawns the full router in demo mode on an ephemeral port and
//! drives it with a cookie-keeping `reqwest` client that does not follow
//! redirects, so tests can assert on `Location` headers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p diamond-assess-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::time::Duration;

use diamond_assess_web::{AppState, SiteConfig, app};
use reqwest::{Client, Response, redirect};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running instance of the site.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    server: JoinHandle<()>,
}

impl TestApp {
    /// Spawn with the default demo configuration.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn after adjusting the demo configuration.
    pub async fn spawn_with(customize: impl FnOnce(&mut SiteConfig)) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        let base_url = format!("http://{addr}");

        let storefront = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");
        let mut config = SiteConfig::demo(base_url.clone());
        config.port = addr.port();
        config.content_dir = storefront.join("content");
        config.static_dir = storefront.join("static");
        config.registration_delay = Duration::from_millis(10);
        config.login_timeout = Duration::from_secs(30);
        customize(&mut config);

        let state = AppState::new(config).expect("failed to build app state");
        let router = app(state);
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("test server failed");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("failed to build client");

        Self {
            base_url,
            client,
            server,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Sign in as a demo persona and return the redirect target.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post_form("/login", &[("email", email), ("password", password)])
            .await;
        assert!(
            response.status().is_redirection(),
            "login did not redirect: {}",
            response.status()
        );
        location(&response)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
