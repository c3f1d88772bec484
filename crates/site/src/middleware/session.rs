//! Session middleware configuration.
//!
//! Sessions hold the cart and the open checkout attempt, both of which are
//! fine to lose on restart, so they live in a bounded in-process moka cache.
//! Each record is evicted once its expiry date passes, and the least recently
//! used records go first when the cache is full.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry as CacheExpiry, future::Cache};
use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store,
};

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "prana_session";

/// Session expiry time in seconds (2 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 2 * 24 * 60 * 60;

/// Upper bound on live sessions held in memory.
const SESSION_CAPACITY: u64 = 100_000;

/// Session store backed by a moka cache with per-record time-to-live.
#[derive(Clone, Debug)]
pub struct SessionCache {
    records: Cache<Id, Record>,
}

impl SessionCache {
    /// Create a store holding at most `capacity` sessions.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        let records = Cache::builder()
            .max_capacity(capacity)
            .expire_after(RecordExpiry)
            .build();
        Self { records }
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(SESSION_CAPACITY)
    }
}

#[async_trait]
impl SessionStore for SessionCache {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.save(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        if is_active(record) {
            self.records.insert(record.id, record.clone()).await;
        } else {
            self.records.invalidate(&record.id).await;
        }
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self.records.get(session_id).await.filter(is_active))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

fn is_active(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

/// Expires each cached record at its own `expiry_date`.
struct RecordExpiry;

impl RecordExpiry {
    fn remaining(record: &Record) -> Duration {
        Duration::try_from(record.expiry_date - OffsetDateTime::now_utc()).unwrap_or_default()
    }
}

impl CacheExpiry<Id, Record> for RecordExpiry {
    fn expire_after_create(
        &self,
        _id: &Id,
        record: &Record,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Self::remaining(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::remaining(record))
    }
}

/// Create the session layer over a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &SiteConfig) -> SessionManagerLayer<SessionCache> {
    SessionManagerLayer::new(SessionCache::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
