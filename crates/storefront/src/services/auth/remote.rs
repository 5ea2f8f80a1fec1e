//! HTTP login service client.
//!
//! `POST {api_url}/auth/login` with `{"email", "password"}`. A 2xx answer
//! carries the [`AuthenticatedUser`] as JSON; a 4xx answer may carry
//! `{"message": "..."}` explaining the rejection. Anything else is an outage.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{AuthError, AuthService, AuthenticatedUser};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Login collaborator backed by the back-office API.
pub struct RemoteAuthService {
    client: reqwest::Client,
    login_url: Url,
    api_token: Option<SecretString>,
}

impl RemoteAuthService {
    /// Create a client for the service rooted at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unavailable`] if the login URL cannot be built.
    pub fn new(api_url: &Url, api_token: Option<SecretString>) -> Result<Self, AuthError> {
        let login_url = api_url
            .join("auth/login")
            .map_err(|e| AuthError::Unavailable(format!("invalid AUTH_API_URL: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            login_url,
            api_token,
        })
    }

    /// Endpoint the client posts to.
    #[must_use]
    pub const fn login_url(&self) -> &Url {
        &self.login_url
    }
}

#[async_trait]
impl AuthService for RemoteAuthService {
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthenticatedUser, AuthError> {
        let mut request = self.client.post(self.login_url.clone()).json(&LoginRequest {
            email,
            password: password.expose_secret(),
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<AuthenticatedUser>()
                .await
                .map_err(|e| AuthError::Unavailable(format!("malformed login response: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &body))
    }
}

/// Map a non-2xx answer to an [`AuthError`].
fn error_from_response(status: StatusCode, body: &str) -> AuthError {
    if status.is_client_error() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message);
        AuthError::Rejected { message }
    } else {
        tracing::warn!(%status, "Login service returned an unexpected status");
        AuthError::Unavailable(format!("login service answered {status}"))
    }
}
