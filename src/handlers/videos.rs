/// Video handlers - single fetch, owner CRUD and view tracking
///
/// Upload correctness is the storage collaborator's problem; this service
/// only checks locator well-formedness at creation time.
use actix_web::{web, HttpResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::video_repo;
use crate::error::{AppError, Result};
use crate::metrics::ENGAGEMENT_WRITE_TOTAL;
use crate::middleware::UserId;
use crate::models::VideoStatus;
use crate::services::{EngagementService, FeedService};

/// Accepted media/thumbnail locator shapes.
static LOCATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?|s3)://\S+").expect("locator regex"));

/// Upper bound on tags per video; extras are dropped silently.
const MAX_TAGS: usize = 20;

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub tags: Option<Vec<String>>,
    pub status: Option<VideoStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<VideoStatus>,
}

fn validate_locator(value: &str, field: &str) -> Result<()> {
    if LOCATOR_RE.is_match(value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "invalid {} format, expected http(s):// or s3://",
            field
        )))
    }
}

fn capped_tags(tags: Option<&Vec<String>>) -> Option<Vec<String>> {
    tags.map(|tags| {
        let mut tags = tags.clone();
        tags.truncate(MAX_TAGS);
        tags
    })
}

/// GET /api/v1/videos/{video_id}
pub async fn get_video(pool: web::Data<PgPool>, video_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let video = service.video(*video_id).await?;

    Ok(HttpResponse::Ok().json(video))
}

/// POST /api/v1/videos
pub async fn create_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreateVideoRequest>,
) -> Result<HttpResponse> {
    let title = req.title.trim();
    let description = req.description.trim();

    if title.is_empty() || description.is_empty() {
        return Err(AppError::Validation(
            "missing required video information".to_string(),
        ));
    }
    validate_locator(&req.thumbnail_url, "thumbnail locator")?;
    validate_locator(&req.video_url, "video locator")?;

    let tags = capped_tags(req.tags.as_ref()).unwrap_or_default();
    let status = req.status.unwrap_or(VideoStatus::Public);

    let video_id = video_repo::insert_video(
        &pool,
        user_id.0,
        title,
        description,
        &req.thumbnail_url,
        &req.video_url,
        &tags,
        status,
    )
    .await?;

    let service = FeedService::new((**pool).clone());
    let video = service.video(video_id).await?;

    Ok(HttpResponse::Created().json(video))
}

/// PUT /api/v1/videos/{video_id}
pub async fn update_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    video_id: web::Path<Uuid>,
    req: web::Json<UpdateVideoRequest>,
) -> Result<HttpResponse> {
    let existing = video_repo::fetch_video(&pool, *video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

    if existing.owner_id != user_id.0 {
        return Err(AppError::Forbidden(
            "you can only update your own videos".to_string(),
        ));
    }

    if let Some(thumbnail_url) = &req.thumbnail_url {
        validate_locator(thumbnail_url, "thumbnail locator")?;
    }
    if let Some(video_url) = &req.video_url {
        validate_locator(video_url, "video locator")?;
    }

    let tags = capped_tags(req.tags.as_ref());

    video_repo::update_video(
        &pool,
        *video_id,
        req.title.as_deref().map(str::trim),
        req.description.as_deref().map(str::trim),
        req.thumbnail_url.as_deref(),
        req.video_url.as_deref(),
        tags.as_deref(),
        req.status,
    )
    .await?;

    let service = FeedService::new((**pool).clone());
    let video = service.video(*video_id).await?;

    Ok(HttpResponse::Ok().json(video))
}

/// DELETE /api/v1/videos/{video_id}
pub async fn delete_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let existing = video_repo::fetch_video(&pool, *video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

    if existing.owner_id != user_id.0 {
        return Err(AppError::Forbidden(
            "you can only delete your own videos".to_string(),
        ));
    }

    video_repo::delete_video(&pool, *video_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "video has been deleted"
    })))
}

/// POST /api/v1/videos/{video_id}/view
///
/// Callable without identity; repeat views by the same viewer all count.
pub async fn track_view(pool: web::Data<PgPool>, video_id: web::Path<Uuid>) -> Result<HttpResponse> {
    ENGAGEMENT_WRITE_TOTAL.with_label_values(&["view"]).inc();

    let service = EngagementService::new((**pool).clone());
    let views = service.increment_view(*video_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "view recorded",
        "views": views,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_https_and_s3_locators() {
        assert!(validate_locator("http://cdn.example/a.jpg", "x").is_ok());
        assert!(validate_locator("https://cdn.example/a.jpg", "x").is_ok());
        assert!(validate_locator("s3://bucket/key.mp4", "x").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(validate_locator("ftp://cdn.example/a.jpg", "x").is_err());
        assert!(validate_locator("not-a-locator", "x").is_err());
        assert!(validate_locator("https:// spaced", "x").is_err());
    }

    #[test]
    fn tags_are_capped_at_twenty() {
        let tags: Vec<String> = (0..30).map(|i| format!("tag{}", i)).collect();
        let capped = capped_tags(Some(&tags)).unwrap();
        assert_eq!(capped.len(), MAX_TAGS);
        assert_eq!(capped[0], "tag0");
    }
}
