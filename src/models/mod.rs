/// Data models for feed-service
///
/// This module defines structures for:
/// - Video: uploaded videos with engagement counters and tags
/// - CreatorSummary: denormalized channel info attached to feed results
/// - VideoWithCreator: a video joined with its creator summary
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visibility of a video. Only public videos appear in feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "video_status", rename_all = "lowercase")]
pub enum VideoStatus {
    Public,
    Private,
    Unlisted,
}

/// A user's reaction to a video. One row per (video, user) pair, so the
/// like and dislike sets are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "reaction_kind", rename_all = "lowercase")]
pub enum Reaction {
    Liked,
    Disliked,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub views: i64,
    pub tags: Vec<String>,
    pub status: VideoStatus,
    pub like_count: i64,
    pub dislike_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Denormalized creator info attached to each video in a feed response.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CreatorSummary {
    pub id: Option<Uuid>,
    pub name: String,
    pub avatar_url: Option<String>,
    pub subscribers: i64,
}

impl CreatorSummary {
    /// Placeholder used when the owning account no longer exists.
    pub fn unknown() -> Self {
        Self {
            id: None,
            name: "Unknown Creator".to_string(),
            avatar_url: None,
            subscribers: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoWithCreator {
    #[serde(flatten)]
    pub video: Video,
    pub creator: CreatorSummary,
}
