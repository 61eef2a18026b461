/// Creator enrichment join
///
/// Attaches a denormalized creator summary to each video in a result set.
/// Lookups fan out concurrently over the *distinct* owner ids with a fixed
/// concurrency cap, so a 100-item page of videos from a handful of channels
/// costs a handful of lookups, not 100. Output order always matches input
/// order, and a missing or failed lookup degrades to a placeholder rather
/// than failing the batch.
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tracing::warn;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::Result;
use crate::models::{CreatorSummary, Video, VideoWithCreator};

/// Upper bound on concurrent creator lookups per request.
pub const MAX_CONCURRENT_LOOKUPS: usize = 16;

/// Seam for resolving a channel id to its summary; the production impl reads
/// PostgreSQL, tests stub it.
#[async_trait]
pub trait CreatorLookup: Send + Sync {
    async fn creator_summary(&self, user_id: Uuid) -> Result<Option<CreatorSummary>>;
}

pub struct PgCreatorLookup {
    pool: PgPool,
}

impl PgCreatorLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreatorLookup for PgCreatorLookup {
    async fn creator_summary(&self, user_id: Uuid) -> Result<Option<CreatorSummary>> {
        Ok(user_repo::creator_summary(&self.pool, user_id).await?)
    }
}

/// Join each video with its creator summary, preserving input order.
pub async fn enrich_videos(
    lookup: &dyn CreatorLookup,
    videos: Vec<Video>,
) -> Vec<VideoWithCreator> {
    let mut seen = HashSet::new();
    let distinct_owners: Vec<Uuid> = videos
        .iter()
        .map(|v| v.owner_id)
        .filter(|id| seen.insert(*id))
        .collect();

    let resolved: Vec<(Uuid, Option<CreatorSummary>)> = stream::iter(distinct_owners)
        .map(|owner_id| async move {
            match lookup.creator_summary(owner_id).await {
                Ok(summary) => (owner_id, summary),
                Err(err) => {
                    warn!(%owner_id, "creator lookup failed, substituting placeholder: {}", err);
                    (owner_id, None)
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
        .collect()
        .await;

    let creators: HashMap<Uuid, CreatorSummary> = resolved
        .into_iter()
        .filter_map(|(id, summary)| summary.map(|s| (id, s)))
        .collect();

    videos
        .into_iter()
        .map(|video| {
            let creator = creators
                .get(&video.owner_id)
                .cloned()
                .unwrap_or_else(CreatorSummary::unknown);
            VideoWithCreator { video, creator }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::VideoStatus;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubLookup {
        known: HashMap<Uuid, CreatorSummary>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubLookup {
        fn with_creators(known: HashMap<Uuid, CreatorSummary>) -> Self {
            Self {
                known,
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                known: HashMap::new(),
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl CreatorLookup for StubLookup {
        async fn creator_summary(&self, user_id: Uuid) -> Result<Option<CreatorSummary>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Database("connection reset".into()));
            }
            Ok(self.known.get(&user_id).cloned())
        }
    }

    fn video(owner_id: Uuid, title: &str) -> Video {
        Video {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_string(),
            description: String::new(),
            thumbnail_url: "https://cdn.example/thumb.jpg".into(),
            video_url: "https://cdn.example/clip.mp4".into(),
            views: 0,
            tags: vec![],
            status: VideoStatus::Public,
            like_count: 0,
            dislike_count: 0,
            created_at: Utc::now(),
        }
    }

    fn summary(id: Uuid, name: &str) -> CreatorSummary {
        CreatorSummary {
            id: Some(id),
            name: name.to_string(),
            avatar_url: None,
            subscribers: 42,
        }
    }

    #[tokio::test]
    async fn preserves_input_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let known = HashMap::from([(a, summary(a, "alpha")), (b, summary(b, "beta"))]);
        let lookup = StubLookup::with_creators(known);

        let videos = vec![video(b, "first"), video(a, "second"), video(b, "third")];
        let enriched = enrich_videos(&lookup, videos).await;

        let titles: Vec<&str> = enriched.iter().map(|e| e.video.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert_eq!(enriched[0].creator.name, "beta");
        assert_eq!(enriched[1].creator.name, "alpha");
        assert_eq!(enriched[2].creator.name, "beta");
    }

    #[tokio::test]
    async fn deduplicates_owner_lookups() {
        let a = Uuid::new_v4();
        let known = HashMap::from([(a, summary(a, "alpha"))]);
        let lookup = StubLookup::with_creators(known);

        let videos = vec![video(a, "v1"), video(a, "v2"), video(a, "v3")];
        let enriched = enrich_videos(&lookup, videos).await;

        assert_eq!(enriched.len(), 3);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_owner_degrades_to_placeholder() {
        let lookup = StubLookup::with_creators(HashMap::new());

        let enriched = enrich_videos(&lookup, vec![video(Uuid::new_v4(), "orphan")]).await;

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].creator.name, "Unknown Creator");
        assert_eq!(enriched[0].creator.id, None);
    }

    #[tokio::test]
    async fn lookup_errors_never_fail_the_batch() {
        let lookup = StubLookup::failing();

        let enriched = enrich_videos(&lookup, vec![video(Uuid::new_v4(), "v")]).await;

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].creator.name, "Unknown Creator");
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let lookup = StubLookup::with_creators(HashMap::new());
        let enriched = enrich_videos(&lookup, vec![]).await;
        assert!(enriched.is_empty());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }
}
