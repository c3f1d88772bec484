//! Blog list and detail endpoints.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use prana_core::{BlogPost, CategoryFilter};

use super::{BackendClient, BackendError};

/// Envelope the backend wraps content responses in.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, BackendError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(BackendError::Parse("success without data".to_string())),
            (false, _) => Err(BackendError::Rejected(
                self.message.unwrap_or_else(|| "no message".to_string()),
            )),
        }
    }
}

/// Decode each post on its own so one malformed entry does not hide the rest.
fn decode_posts(values: Vec<serde_json::Value>) -> Vec<BlogPost> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!(error = %e, index, "Skipping undecodable blog post");
                None
            }
        })
        .collect()
}

impl BackendClient {
    /// Fetch the blog list for a category.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status,
    /// `success: false`, or an undecodable body. Individual posts that fail
    /// to decode are skipped with a warning.
    #[instrument(skip(self), fields(category = %filter.label()))]
    pub async fn get_blogs(&self, filter: CategoryFilter) -> Result<Vec<BlogPost>, BackendError> {
        let path = match filter.query_value() {
            Some(category) => format!("/get-blogs?category={}", urlencoding::encode(&category)),
            None => "/get-blogs".to_string(),
        };

        let envelope: Envelope<Vec<serde_json::Value>> = self.get_json(&path).await?;
        envelope.into_data().map(decode_posts)
    }

    /// Fetch a single blog post.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status,
    /// `success: false`, or an undecodable body.
    #[instrument(skip(self))]
    pub async fn get_blog(&self, id: &str) -> Result<BlogPost, BackendError> {
        let path = format!("/get-blog/{}", urlencoding::encode(id));
        let envelope: Envelope<BlogPost> = self.get_json(&path).await?;
        envelope.into_data()
    }

    /// Blog list for a category, in backend order.
    ///
    /// Never fails: any error is logged and yields an empty list. Successful
    /// responses are cached per category when caching is enabled.
    pub async fn fetch_blogs(&self, filter: CategoryFilter) -> Arc<Vec<BlogPost>> {
        if let Some(cache) = &self.inner.blog_cache
            && let Some(posts) = cache.get(&filter).await
        {
            debug!(category = %filter.label(), "Cache hit for blog list");
            return posts;
        }

        match self.get_blogs(filter).await {
            Ok(posts) => {
                let posts = Arc::new(posts);
                if let Some(cache) = &self.inner.blog_cache {
                    cache.insert(filter, Arc::clone(&posts)).await;
                }
                posts
            }
            Err(e) => {
                warn!(error = %e, category = %filter.label(), "Failed to fetch blog list");
                Arc::new(Vec::new())
            }
        }
    }

    /// A single blog post, or `None` when it cannot be fetched.
    ///
    /// Never fails: errors are logged.
    pub async fn fetch_blog_by_id(&self, id: &str) -> Option<BlogPost> {
        match self.get_blog(id).await {
            Ok(post) => Some(post),
            Err(e) => {
                warn!(error = %e, blog_id = %id, "Failed to fetch blog post");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_with_data() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2]}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_envelope_rejected_keeps_message() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":false,"message":"no blogs"}"#).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, BackendError::Rejected(m) if m == "no blogs"));
    }

    #[test]
    fn test_envelope_missing_success_is_rejection() {
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(matches!(
            envelope.into_data(),
            Err(BackendError::Rejected(_))
        ));
    }

    #[test]
    fn test_decode_posts_skips_malformed_entries() {
        let values = vec![
            serde_json::json!({"id": 1, "title": "Sun Salutation", "createdAt": null}),
            serde_json::json!({"id": 2, "createdAt": "2025-03-14T06:30:00.000Z"}),
            serde_json::json!({"id": 3, "title": "Ojas", "createdAt": "last tuesday"}),
            serde_json::json!({"id": 4, "title": "Sleep", "createdAt": "2025-03-14T06:30:00.000Z"}),
        ];

        let posts = decode_posts(values);

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(posts[0].created_at, None);
        assert!(posts[1].created_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_blogs_unreachable_backend_is_empty() {
        let client = BackendClient::new(&crate::config::test_config().backend);
        assert!(client.fetch_blogs(CategoryFilter::All).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_blog_by_id_unreachable_backend_is_none() {
        let client = BackendClient::new(&crate::config::test_config().backend);
        assert!(client.fetch_blog_by_id("42").await.is_none());
    }
}
