//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_BASE_URL` - Public URL for the site
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `BACKEND_BASE_URL` - Content and payment backend (default: production backend)
//! - `BLOG_CACHE_TTL_SECS` - Blog list cache lifetime, `0` disables (default: 60)
//! - `FORMS_ENDPOINT` - Intake questionnaire submission endpoint (default: Formspree form)
//! - `PAYMENT_SDK_URL` - Payment widget script (default: Razorpay Checkout)
//! - `PAYMENT_BRAND_NAME` - Merchant name shown in the widget (default: Prana Wellness)
//! - `PAYMENT_THEME_COLOR` - Widget accent colour (default: #1976d2)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BACKEND_BASE_URL: &str = "https://karuna-kodwani-backend.vercel.app";
const DEFAULT_FORMS_ENDPOINT: &str = "https://formspree.io/f/mwpwayqd";
const DEFAULT_PAYMENT_SDK_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Content and payment backend
    pub backend: BackendConfig,
    /// Intake form submission endpoint
    pub forms: FormsConfig,
    /// Payment widget settings
    pub payment: PaymentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Remote backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL without a trailing slash; API paths are appended to it.
    pub base_url: String,
    /// How long blog list responses are cached. Zero disables caching.
    pub blog_cache_ttl: Duration,
}

/// Third-party forms endpoint configuration.
#[derive(Debug, Clone)]
pub struct FormsConfig {
    /// URL the intake record is POSTed to.
    pub endpoint: String,
}

/// Payment widget configuration.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// URL of the widget script.
    pub sdk_url: String,
    /// Merchant name shown in the widget header.
    pub brand_name: String,
    /// Accent colour of the widget.
    pub theme_color: String,
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_or_default::<IpAddr>("SITE_HOST", "127.0.0.1")?;
        let port = get_parsed_or_default::<u16>("SITE_PORT", "3000")?;
        let base_url = normalize_url("SITE_BASE_URL", &get_required_env("SITE_BASE_URL")?)?;

        let backend = BackendConfig::from_env()?;
        let forms = FormsConfig::from_env()?;
        let payment = PaymentConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            forms,
            payment,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: get_parsed_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_url(
            "BACKEND_BASE_URL",
            &get_env_or_default("BACKEND_BASE_URL", DEFAULT_BACKEND_BASE_URL),
        )?;
        let ttl_secs = get_parsed_or_default::<u64>("BLOG_CACHE_TTL_SECS", "60")?;

        Ok(Self {
            base_url,
            blog_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl FormsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: normalize_url(
                "FORMS_ENDPOINT",
                &get_env_or_default("FORMS_ENDPOINT", DEFAULT_FORMS_ENDPOINT),
            )?,
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            sdk_url: normalize_url(
                "PAYMENT_SDK_URL",
                &get_env_or_default("PAYMENT_SDK_URL", DEFAULT_PAYMENT_SDK_URL),
            )?,
            brand_name: get_env_or_default("PAYMENT_BRAND_NAME", "Prana Wellness"),
            theme_color: get_env_or_default("PAYMENT_THEME_COLOR", "#1976d2"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed into `T`, falling back to `default`.
fn get_parsed_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate an absolute http(s) URL and strip any trailing slash.
fn normalize_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let parsed =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    Ok(value.trim_end_matches('/').to_string())
}

/// Configuration pointing every remote at an unroutable local port.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_config() -> SiteConfig {
    SiteConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        backend: BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            blog_cache_ttl: Duration::ZERO,
        },
        forms: FormsConfig {
            endpoint: "http://127.0.0.1:9/f/test".to_string(),
        },
        payment: PaymentConfig {
            sdk_url: "http://127.0.0.1:9/checkout.js".to_string(),
            brand_name: "Prana Wellness".to_string(),
            theme_color: "#1976d2".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
