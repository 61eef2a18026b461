use sqlx::PgPool;
use uuid::Uuid;

/// Channels the given user follows, used to scope the subscription feed.
pub async fn subscribed_channel_ids(
    pool: &PgPool,
    follower_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT channel_id FROM subscriptions WHERE follower_id = $1")
        .bind(follower_id)
        .fetch_all(pool)
        .await
}

/// Subscribe `follower_id` to `channel_id`. Membership insert and counter
/// increment run in one transaction, and the counter only moves when a row
/// was actually inserted, so a duplicate subscribe is a full no-op.
/// Returns true when the subscription is new.
pub async fn subscribe(
    pool: &PgPool,
    follower_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO subscriptions (follower_id, channel_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, channel_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(channel_id)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        > 0;

    if inserted {
        sqlx::query("UPDATE users SET subscribers = subscribers + 1 WHERE id = $1")
            .bind(channel_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(inserted)
}

/// Mirror of `subscribe`: guarded decrement in the same transaction as the
/// membership delete. Returns true when a subscription was removed.
pub async fn unsubscribe(
    pool: &PgPool,
    follower_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        r#"
        DELETE FROM subscriptions
        WHERE follower_id = $1 AND channel_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(channel_id)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        > 0;

    if removed {
        sqlx::query("UPDATE users SET subscribers = GREATEST(subscribers - 1, 0) WHERE id = $1")
            .bind(channel_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(removed)
}
