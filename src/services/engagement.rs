/// Engagement mutator - view counting, reactions, subscriptions
///
/// Every operation is a single statement or one short transaction; there is
/// no retry policy, errors propagate straight to the caller. Reactions are a
/// tri-state upsert, so like/dislike mutual exclusion needs no two-step
/// dance, and the subscriber counter only moves together with a real
/// membership change.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{reaction_repo, subscription_repo, user_repo, video_repo};
use crate::error::{fk_violation_as_not_found, AppError, Result};
use crate::models::Reaction;

pub struct EngagementService {
    pool: PgPool,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a like or dislike. Idempotent; switching reaction moves the
    /// user between the two sets atomically.
    pub async fn react(&self, video_id: Uuid, user_id: Uuid, reaction: Reaction) -> Result<()> {
        reaction_repo::set_reaction(&self.pool, video_id, user_id, reaction)
            .await
            .map_err(|err| fk_violation_as_not_found(err, "video"))
    }

    /// Unconditional +1 on the view counter; repeat views all count and no
    /// identity is required. Returns the new total.
    pub async fn increment_view(&self, video_id: Uuid) -> Result<i64> {
        video_repo::increment_views(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("video not found".to_string()))
    }

    /// Subscribe the caller to a channel. Re-subscribing while already
    /// subscribed is a complete no-op, counter included. Returns true when
    /// the subscription is new.
    pub async fn subscribe(&self, follower_id: Uuid, channel_id: Uuid) -> Result<bool> {
        subscription_repo::subscribe(&self.pool, follower_id, channel_id)
            .await
            .map_err(|err| fk_violation_as_not_found(err, "channel"))
    }

    /// Remove a subscription. Returns true when one existed. A channel that
    /// does not exist is a 404, same as `subscribe`; an existing channel the
    /// caller never followed is just `false`.
    pub async fn unsubscribe(&self, follower_id: Uuid, channel_id: Uuid) -> Result<bool> {
        let removed = subscription_repo::unsubscribe(&self.pool, follower_id, channel_id).await?;
        if !removed && !user_repo::channel_exists(&self.pool, channel_id).await? {
            return Err(AppError::NotFound("channel does not exist".to_string()));
        }
        Ok(removed)
    }
}
