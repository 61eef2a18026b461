use crate::models::Reaction;
use sqlx::PgPool;
use uuid::Uuid;

/// Set a user's reaction on a video as a single atomic upsert. Liking moves
/// the user out of the dislike set (and vice versa) in the same statement,
/// and repeating the call is a no-op.
pub async fn set_reaction(
    pool: &PgPool,
    video_id: Uuid,
    user_id: Uuid,
    reaction: Reaction,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO video_reactions (video_id, user_id, reaction)
        VALUES ($1, $2, $3)
        ON CONFLICT (video_id, user_id) DO UPDATE SET reaction = EXCLUDED.reaction
        "#,
    )
    .bind(video_id)
    .bind(user_id)
    .bind(reaction)
    .execute(pool)
    .await?;

    Ok(())
}
