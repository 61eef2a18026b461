/// Engagement handlers - reactions and subscriptions
///
/// All routes here are identity-scoped; a missing or invalid Bearer token
/// fails with 401 before any store access.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::metrics::ENGAGEMENT_WRITE_TOTAL;
use crate::middleware::UserId;
use crate::models::Reaction;
use crate::services::EngagementService;

/// POST /api/v1/videos/{video_id}/like
pub async fn like_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ENGAGEMENT_WRITE_TOTAL.with_label_values(&["like"]).inc();

    let service = EngagementService::new((**pool).clone());
    service.react(*video_id, user_id.0, Reaction::Liked).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "liked" })))
}

/// POST /api/v1/videos/{video_id}/dislike
pub async fn dislike_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ENGAGEMENT_WRITE_TOTAL.with_label_values(&["dislike"]).inc();

    let service = EngagementService::new((**pool).clone());
    service
        .react(*video_id, user_id.0, Reaction::Disliked)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "disliked" })))
}

/// POST /api/v1/channels/{channel_id}/subscribe
pub async fn subscribe_channel(
    pool: web::Data<PgPool>,
    user_id: UserId,
    channel_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ENGAGEMENT_WRITE_TOTAL
        .with_label_values(&["subscribe"])
        .inc();

    let service = EngagementService::new((**pool).clone());
    service.subscribe(user_id.0, *channel_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "subscribed": true })))
}

/// DELETE /api/v1/channels/{channel_id}/subscribe
pub async fn unsubscribe_channel(
    pool: web::Data<PgPool>,
    user_id: UserId,
    channel_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ENGAGEMENT_WRITE_TOTAL
        .with_label_values(&["unsubscribe"])
        .inc();

    let service = EngagementService::new((**pool).clone());
    service.unsubscribe(user_id.0, *channel_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "subscribed": false })))
}
