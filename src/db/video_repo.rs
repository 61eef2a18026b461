use crate::models::{Video, VideoStatus};
use sqlx::PgPool;
use uuid::Uuid;

/// Columns selected for every video read. Reaction counts are derived from
/// the tri-state reactions table instead of stored counters, so they can
/// never drift from membership.
const VIDEO_COLUMNS: &str = r#"
    v.id, v.owner_id, v.title, v.description, v.thumbnail_url, v.video_url,
    v.views, v.tags, v.status, v.created_at,
    (SELECT COUNT(*) FROM video_reactions r
        WHERE r.video_id = v.id AND r.reaction = 'liked') AS like_count,
    (SELECT COUNT(*) FROM video_reactions r
        WHERE r.video_id = v.id AND r.reaction = 'disliked') AS dislike_count
"#;

fn select_videos(tail: &str) -> String {
    format!("SELECT {} FROM videos v {}", VIDEO_COLUMNS, tail)
}

/// Fetch a single video by id, regardless of status.
pub async fn fetch_video(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&select_videos("WHERE v.id = $1"))
        .bind(video_id)
        .fetch_optional(pool)
        .await
}

/// Uniform random sample of public videos. `ORDER BY random()` shuffles both
/// membership and ordering on every call.
pub async fn random_videos(pool: &PgPool, limit: i64) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&select_videos(
        "WHERE v.status = 'public' ORDER BY random() LIMIT $1",
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// One page of public videos by views descending, ties broken by recency.
pub async fn trending_videos(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&select_videos(
        "WHERE v.status = 'public'
         ORDER BY v.views DESC, v.created_at DESC
         LIMIT $1 OFFSET $2",
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_public_videos(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE status = 'public'")
        .fetch_one(pool)
        .await
}

/// Public videos whose tag set intersects the supplied set, most viewed first.
pub async fn videos_by_tags(
    pool: &PgPool,
    tags: &[String],
    limit: i64,
    offset: i64,
) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&select_videos(
        "WHERE v.status = 'public' AND v.tags && $1
         ORDER BY v.views DESC
         LIMIT $2 OFFSET $3",
    ))
    .bind(tags)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_videos_by_tags(pool: &PgPool, tags: &[String]) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE status = 'public' AND tags && $1")
        .bind(tags)
        .fetch_one(pool)
        .await
}

const SEARCH_FILTER: &str = "v.status = 'public' AND (
        v.title ILIKE $1
        OR v.description ILIKE $1
        OR EXISTS (SELECT 1 FROM unnest(v.tags) AS t WHERE t ILIKE $1)
    )";

/// Case-insensitive substring match against title, description, or any tag.
pub async fn search_videos(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Video>, sqlx::Error> {
    let tail = format!(
        "WHERE {} ORDER BY v.views DESC LIMIT $2 OFFSET $3",
        SEARCH_FILTER
    );
    sqlx::query_as::<_, Video>(&select_videos(&tail))
        .bind(like_pattern(query))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_search_videos(pool: &PgPool, query: &str) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM videos v WHERE {}", SEARCH_FILTER);
    sqlx::query_scalar(&sql)
        .bind(like_pattern(query))
        .fetch_one(pool)
        .await
}

/// Public videos owned by any of the given channels, newest first. The
/// cumulative `limit` (page * limit) is intentional: the subscription feed
/// returns everything up to the current page, not a disjoint page.
pub async fn videos_by_owners(
    pool: &PgPool,
    owner_ids: &[Uuid],
    cumulative_limit: i64,
) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&select_videos(
        "WHERE v.status = 'public' AND v.owner_id = ANY($1)
         ORDER BY v.created_at DESC
         LIMIT $2",
    ))
    .bind(owner_ids)
    .bind(cumulative_limit)
    .fetch_all(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_video(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: &str,
    thumbnail_url: &str,
    video_url: &str,
    tags: &[String],
    status: VideoStatus,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO videos (owner_id, title, description, thumbnail_url, video_url, tags, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(thumbnail_url)
    .bind(video_url)
    .bind(tags)
    .bind(status)
    .fetch_one(pool)
    .await
}

/// Partial update; absent fields keep their current value. Owner, views and
/// reactions are not updatable through this path.
#[allow(clippy::too_many_arguments)]
pub async fn update_video(
    pool: &PgPool,
    video_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    thumbnail_url: Option<&str>,
    video_url: Option<&str>,
    tags: Option<&[String]>,
    status: Option<VideoStatus>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE videos
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            thumbnail_url = COALESCE($4, thumbnail_url),
            video_url = COALESCE($5, video_url),
            tags = COALESCE($6, tags),
            status = COALESCE($7, status)
        WHERE id = $1
        "#,
    )
    .bind(video_id)
    .bind(title)
    .bind(description)
    .bind(thumbnail_url)
    .bind(video_url)
    .bind(tags)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Hard delete; reactions cascade at the schema level.
pub async fn delete_video(pool: &PgPool, video_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Unconditional +1; every repeat view counts. Returns the new total, or
/// None when the video does not exist.
pub async fn increment_views(pool: &PgPool, video_id: Uuid) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING views")
        .bind(video_id)
        .fetch_optional(pool)
        .await
}

/// Wraps user input in `%...%` with LIKE metacharacters escaped, so a query
/// like `50%_off` matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
