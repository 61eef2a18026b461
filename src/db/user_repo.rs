use crate::models::CreatorSummary;
use sqlx::PgPool;
use uuid::Uuid;

/// Whether a channel row exists at all, distinct from "no subscription".
pub async fn channel_exists(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Resolve one channel to the denormalized summary attached to feed results.
pub async fn creator_summary(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<CreatorSummary>, sqlx::Error> {
    sqlx::query_as::<_, CreatorSummary>(
        r#"
        SELECT id, name, avatar_url, subscribers
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
