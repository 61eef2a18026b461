/// Feed caching layer
///
/// Best-effort Redis cache for trending pages, the one feed mode that is
/// identical for every caller. Reads and writes never fail a request: a
/// cache error is logged, counted, and treated as a miss. The service runs
/// with the cache disabled when Redis is unreachable at startup.
use anyhow::{Context, Result};
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use tracing::debug;

use crate::metrics::TRENDING_CACHE_EVENTS;
use crate::pagination::{FeedPage, PageWindow};

#[derive(Clone)]
pub struct FeedCache {
    redis: Option<ConnectionManager>,
    default_ttl: Duration,
}

impl FeedCache {
    pub fn new(redis: ConnectionManager, default_ttl_secs: u64) -> Self {
        Self {
            redis: Some(redis),
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }

    /// No-op cache used when Redis is not configured or unreachable.
    pub fn disabled() -> Self {
        Self {
            redis: None,
            default_ttl: Duration::ZERO,
        }
    }

    fn trending_key(window: &PageWindow) -> String {
        format!("feed:trending:v1:{}:{}", window.page, window.limit)
    }

    pub async fn read_trending(&self, window: &PageWindow) -> Result<Option<FeedPage>> {
        let Some(redis) = &self.redis else {
            return Ok(None);
        };

        let key = Self::trending_key(window);
        let mut conn = redis.clone();

        let data: Option<String> = conn
            .get(&key)
            .await
            .context("trending cache read failed")?;

        match data {
            Some(data) => {
                debug!(page = window.page, limit = window.limit, "trending cache HIT");
                TRENDING_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                let page = serde_json::from_str::<FeedPage>(&data)
                    .context("trending cache entry failed to deserialize")?;
                Ok(Some(page))
            }
            None => {
                debug!(page = window.page, limit = window.limit, "trending cache MISS");
                TRENDING_CACHE_EVENTS.with_label_values(&["miss"]).inc();
                Ok(None)
            }
        }
    }

    pub async fn write_trending(&self, window: &PageWindow, page: &FeedPage) -> Result<()> {
        let Some(redis) = &self.redis else {
            return Ok(());
        };

        let key = Self::trending_key(window);
        let data = serde_json::to_string(page).context("trending page failed to serialize")?;

        // Jitter the TTL so cached pages do not all expire at once.
        let jitter = (rand::random::<u32>() % 10) as f64 / 100.0;
        let jitter_secs = (self.default_ttl.as_secs_f64() * jitter).round() as u64;
        let ttl = self.default_ttl + Duration::from_secs(jitter_secs);

        let mut conn = redis.clone();
        conn.set_ex::<_, _, ()>(&key, data, ttl.as_secs())
            .await
            .context("trending cache write failed")?;

        debug!(
            page = window.page,
            limit = window.limit,
            ttl_secs = ttl.as_secs(),
            "trending cache WRITE"
        );

        Ok(())
    }
}
