//! Client for the content and payment backend.
//!
//! The backend exposes a small JSON API under `/api/v1`:
//!
//! - `GET  /get-blogs?category=<lowercase>` and `GET /get-blog/{id}` for content
//! - `POST /create-order`, `GET /get-key` and `POST /verify-payment` for checkout
//!
//! Blog list responses are cached in memory (see [`BackendClient::fetch_blogs`]).
//! Nothing else is cached and nothing is retried.

mod blogs;
mod payments;

use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use prana_core::{BlogPost, CategoryFilter};

use crate::config::BackendConfig;

pub use payments::{CreatedOrder, PaymentConfirmation};

/// Path prefix of every backend endpoint.
const API_PREFIX: &str = "/api/v1";

/// Upper bound on cached blog lists (one per category choice).
const BLOG_CACHE_CAPACITY: u64 = 16;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status code.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Backend answered `success: false`.
    #[error("Rejected by backend: {0}")]
    Rejected(String),

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Backend API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the blog cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    blog_cache: Option<Cache<CategoryFilter, Arc<Vec<BlogPost>>>>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// A zero `blog_cache_ttl` disables the blog list cache.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client that shares an existing HTTP connection pool.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &BackendConfig) -> Self {
        let blog_cache = (!config.blog_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(BLOG_CACHE_CAPACITY)
                .time_to_live(config.blog_cache_ttl)
                .build()
        });

        Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
                blog_cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.inner.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.inner.client.get(&url).send().await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self.inner.client.post(&url).json(body).send().await?;
        decode(response).await
    }
}

/// Turn a response into `T`, mapping non-2xx statuses to [`BackendError::Api`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: message.chars().take(200).collect(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| BackendError::Parse(e.to_string()))
}
