/// Feed query engine - the five read modes over the video collection
///
/// All modes are read-only and only ever surface public videos. Validation
/// failures (empty tag set, blank search query) abort before any store
/// access. Every result set passes through the creator enrichment join.
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::FeedCache;
use crate::db::{subscription_repo, video_repo};
use crate::error::{AppError, Result};
use crate::metrics::TRENDING_CACHE_EVENTS;
use crate::models::VideoWithCreator;
use crate::pagination::{FeedPage, PageInfo, PageWindow};
use crate::services::creators::{self, PgCreatorLookup};

/// Default page size for trending and tag queries.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;
/// Default sample size for random discovery and search.
pub const DEFAULT_DISCOVERY_LIMIT: i64 = 40;

pub struct FeedService {
    pool: PgPool,
    lookup: PgCreatorLookup,
    cache: Option<FeedCache>,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            lookup: PgCreatorLookup::new(pool.clone()),
            pool,
            cache: None,
        }
    }

    pub fn with_cache(pool: PgPool, cache: FeedCache) -> Self {
        Self {
            lookup: PgCreatorLookup::new(pool.clone()),
            pool,
            cache: Some(cache),
        }
    }

    async fn enrich(&self, videos: Vec<crate::models::Video>) -> Vec<VideoWithCreator> {
        creators::enrich_videos(&self.lookup, videos).await
    }

    /// Uniform random sample of public videos. Repeated calls shuffle both
    /// membership and ordering; an empty corpus yields an empty page.
    pub async fn random(&self, limit: i64) -> Result<FeedPage> {
        let videos = video_repo::random_videos(&self.pool, limit).await?;
        Ok(FeedPage::bare(self.enrich(videos).await))
    }

    /// Public videos by views descending, ties broken by recency.
    pub async fn trending(&self, window: PageWindow) -> Result<FeedPage> {
        if let Some(cache) = &self.cache {
            match cache.read_trending(&window).await {
                Ok(Some(page)) => return Ok(page),
                Ok(None) => {}
                Err(err) => {
                    TRENDING_CACHE_EVENTS.with_label_values(&["error"]).inc();
                    tracing::warn!("trending cache read failed: {:#}", err);
                }
            }
        }

        let videos =
            video_repo::trending_videos(&self.pool, window.limit, window.offset()).await?;
        let total = video_repo::count_public_videos(&self.pool).await?;
        let page = FeedPage::counted(self.enrich(videos).await, PageInfo::new(total, &window));

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.write_trending(&window, &page).await {
                TRENDING_CACHE_EVENTS.with_label_values(&["error"]).inc();
                tracing::debug!("trending cache write failed: {:#}", err);
            }
        }

        Ok(page)
    }

    /// Videos whose tag set intersects the supplied set, most viewed first.
    pub async fn by_tags(&self, tags: &[String], window: PageWindow) -> Result<FeedPage> {
        if tags.is_empty() {
            return Err(AppError::Validation("no tags provided".to_string()));
        }

        let videos =
            video_repo::videos_by_tags(&self.pool, tags, window.limit, window.offset()).await?;
        let total = video_repo::count_videos_by_tags(&self.pool, tags).await?;

        Ok(FeedPage::counted(
            self.enrich(videos).await,
            PageInfo::new(total, &window),
        ))
    }

    /// Case-insensitive substring search across title, description and tags.
    pub async fn search(&self, query: &str, window: PageWindow) -> Result<FeedPage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("search query is required".to_string()));
        }

        let videos =
            video_repo::search_videos(&self.pool, query, window.limit, window.offset()).await?;
        let total = video_repo::count_search_videos(&self.pool, query).await?;

        Ok(FeedPage::counted(
            self.enrich(videos).await,
            PageInfo::new(total, &window),
        ))
    }

    /// Latest uploads from the caller's subscribed channels. A caller with
    /// no subscriptions gets an empty page without a video-store query.
    /// Page N covers the first N*limit rows (cumulative, not disjoint); the
    /// original product behavior, kept until product says otherwise.
    pub async fn subscription_feed(&self, user_id: Uuid, window: PageWindow) -> Result<FeedPage> {
        let channel_ids = subscription_repo::subscribed_channel_ids(&self.pool, user_id).await?;
        if channel_ids.is_empty() {
            return Ok(FeedPage::bare(vec![]));
        }

        let videos =
            video_repo::videos_by_owners(&self.pool, &channel_ids, window.cumulative_limit())
                .await?;

        Ok(FeedPage::bare(self.enrich(videos).await))
    }

    /// Single-video fetch with creator enrichment.
    pub async fn video(&self, video_id: Uuid) -> Result<VideoWithCreator> {
        let video = video_repo::fetch_video(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

        let mut enriched = self.enrich(vec![video]).await;
        Ok(enriched.remove(0))
    }
}
