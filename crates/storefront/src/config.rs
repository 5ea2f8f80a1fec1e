//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DIAMOND_BASE_URL` - Public URL for the site (`https://` enables secure cookies)
//! - `AUTH_API_URL` - Login service base URL (required unless `DEMO_MODE` is on)
//!
//! ## Optional
//! - `DIAMOND_HOST` - Bind address (default: 127.0.0.1)
//! - `DIAMOND_PORT` - Listen port (default: 3000)
//! - `DEMO_MODE` - Enable demo personas and the in-memory login service (default: false)
//! - `AUTH_API_TOKEN` - Bearer token sent to the login service
//! - `LOGIN_TIMEOUT_SECS` - Upper bound on a login call (default: 10)
//! - `REGISTRATION_DELAY_MS` - Simulated registration latency (default: 1000)
//! - `CONTENT_DIR` - Markdown content directory (default: crates/storefront/content)
//! - `STATIC_DIR` - Stylesheets and scripts served under `/static`
//!   (default: crates/storefront/static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which login collaborator the site talks to.
#[derive(Clone)]
pub enum AuthBackend {
    /// In-memory demo accounts built from the persona fixtures.
    Demo,
    /// JSON login service reached over HTTP.
    Remote {
        api_url: Url,
        api_token: Option<SecretString>,
    },
}

impl std::fmt::Debug for AuthBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demo => f.write_str("Demo"),
            Self::Remote { api_url, api_token } => f
                .debug_struct("Remote")
                .field("api_url", &api_url.as_str())
                .field("api_token", &api_token.as_ref().map(|_| "[REDACTED]"))
                .finish(),
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Whether demo personas are offered on the login page
    pub demo_mode: bool,
    /// Login collaborator
    pub auth: AuthBackend,
    /// Upper bound on one login call
    pub login_timeout: Duration,
    /// Simulated registration latency
    pub registration_delay: Duration,
    /// Root of the markdown content tree
    pub content_dir: PathBuf,
    /// Files served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the auth token fails the placeholder/entropy check.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_env(env, "DIAMOND_HOST", "127.0.0.1")?;
        let port = parse_env(env, "DIAMOND_PORT", "3000")?;
        let base_url = get_required_env(env, "DIAMOND_BASE_URL")?;
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("DIAMOND_BASE_URL".to_string(), e.to_string())
        })?;

        let demo_mode = parse_bool(env, "DEMO_MODE")?;
        let auth = match env("AUTH_API_URL") {
            Some(raw) => {
                let api_url = Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("AUTH_API_URL".to_string(), e.to_string())
                })?;
                let api_token = env("AUTH_API_TOKEN")
                    .map(|token| {
                        validate_secret_strength(&token, "AUTH_API_TOKEN")?;
                        Ok::<_, ConfigError>(SecretString::from(token))
                    })
                    .transpose()?;
                AuthBackend::Remote { api_url, api_token }
            }
            None if demo_mode => AuthBackend::Demo,
            None => return Err(ConfigError::MissingEnvVar("AUTH_API_URL".to_string())),
        };

        let login_timeout = Duration::from_secs(parse_env(env, "LOGIN_TIMEOUT_SECS", "10")?);
        let registration_delay =
            Duration::from_millis(parse_env(env, "REGISTRATION_DELAY_MS", "1000")?);
        let content_dir = PathBuf::from(get_env_or_default(
            env,
            "CONTENT_DIR",
            "crates/storefront/content",
        ));
        let static_dir = PathBuf::from(get_env_or_default(
            env,
            "STATIC_DIR",
            "crates/storefront/static",
        ));

        Ok(Self {
            host,
            port,
            base_url,
            demo_mode,
            auth,
            login_timeout,
            registration_delay,
            content_dir,
            static_dir,
            sentry_dsn: env("SENTRY_DSN"),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env(env, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env(env, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Demo-mode configuration with defaults, for local runs and tests.
    #[must_use]
    pub fn demo(base_url: impl Into<String>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: base_url.into(),
            demo_mode: true,
            auth: AuthBackend::Demo,
            login_timeout: Duration::from_secs(10),
            registration_delay: Duration::from_millis(1000),
            content_dir: PathBuf::from("crates/storefront/content"),
            static_dir: PathBuf::from("crates/storefront/static"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(env, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag (`1/0`, `true/false`, `yes/no`); unset means false.
fn parse_bool(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<bool, ConfigError> {
    match env(key).as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("" | "0" | "false" | "no") => Ok(false),
        Some("1" | "true" | "yes") => Ok(true),
        Some(other) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= \
                 {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SiteConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SiteConfig::from_source(&|key| map.get(key).cloned())
    }

    #[test]
    fn test_demo_mode_defaults() {
        let config = load(&[
            ("DIAMOND_BASE_URL", "http://localhost:3000"),
            ("DEMO_MODE", "true"),
        ])
        .unwrap();
        assert!(config.demo_mode);
        assert!(matches!(config.auth, AuthBackend::Demo));
        assert_eq!(config.port, 3000);
        assert_eq!(config.login_timeout, Duration::from_secs(10));
        assert_eq!(config.registration_delay, Duration::from_millis(1000));
        assert!(!config.is_secure());
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[("DEMO_MODE", "1")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "DIAMOND_BASE_URL"));
    }

    #[test]
    fn test_auth_url_required_outside_demo_mode() {
        let err = load(&[("DIAMOND_BASE_URL", "https://diamond.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "AUTH_API_URL"));
    }

    #[test]
    fn test_remote_backend() {
        let config = load(&[
            ("DIAMOND_BASE_URL", "https://diamond.com"),
            ("AUTH_API_URL", "https://api.diamond.com"),
            ("AUTH_API_TOKEN", "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
        ])
        .unwrap();
        assert!(config.is_secure());
        match config.auth {
            AuthBackend::Remote { api_url, api_token } => {
                assert_eq!(api_url.host_str(), Some("api.diamond.com"));
                assert!(api_token.is_some());
            }
            AuthBackend::Demo => panic!("expected remote backend"),
        }
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = load(&[
            ("DIAMOND_BASE_URL", "https://diamond.com"),
            ("AUTH_API_URL", "https://api.diamond.com"),
            ("AUTH_API_TOKEN", "your-token-here"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[
            ("DIAMOND_BASE_URL", "http://localhost"),
            ("DEMO_MODE", "maybe"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "DEMO_MODE"));

        let err = load(&[
            ("DIAMOND_BASE_URL", "http://localhost"),
            ("DEMO_MODE", "1"),
            ("DIAMOND_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "DIAMOND_PORT"));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_socket_addr() {
        let mut config = SiteConfig::demo("http://localhost:3000");
        config.port = 8080;
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }
}
