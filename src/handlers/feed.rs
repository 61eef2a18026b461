/// Feed handlers - HTTP endpoints for the five retrieval modes
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::cache::FeedCache;
use crate::error::Result;
use crate::metrics::FEED_REQUEST_TOTAL;
use crate::middleware::UserId;
use crate::pagination::PageWindow;
use crate::services::feed::{FeedService, DEFAULT_DISCOVERY_LIMIT, DEFAULT_PAGE_LIMIT};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    /// Comma-separated tag list, e.g. `?tags=music,sports`
    pub tags: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/v1/videos/random
pub async fn random_videos(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    FEED_REQUEST_TOTAL.with_label_values(&["random"]).inc();

    let window = PageWindow::new(None, query.limit, DEFAULT_DISCOVERY_LIMIT);
    let service = FeedService::new((**pool).clone());
    let page = service.random(window.limit).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/v1/videos/trending
pub async fn trending_videos(
    pool: web::Data<PgPool>,
    cache: web::Data<FeedCache>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    FEED_REQUEST_TOTAL.with_label_values(&["trending"]).inc();

    let window = PageWindow::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
    let service = FeedService::with_cache((**pool).clone(), cache.get_ref().clone());
    let page = service.trending(window).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/v1/videos/tags
pub async fn videos_by_tag(
    pool: web::Data<PgPool>,
    query: web::Query<TagQuery>,
) -> Result<HttpResponse> {
    FEED_REQUEST_TOTAL.with_label_values(&["tags"]).inc();

    let tags: Vec<String> = query
        .tags
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();

    let window = PageWindow::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
    let service = FeedService::new((**pool).clone());
    let page = service.by_tags(&tags, window).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/v1/videos/search
pub async fn search_videos(
    pool: web::Data<PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    FEED_REQUEST_TOTAL.with_label_values(&["search"]).inc();

    let window = PageWindow::new(query.page, query.limit, DEFAULT_DISCOVERY_LIMIT);
    let service = FeedService::new((**pool).clone());
    let page = service
        .search(query.q.as_deref().unwrap_or(""), window)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/v1/videos/subscriptions
pub async fn subscription_feed(
    pool: web::Data<PgPool>,
    user_id: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    FEED_REQUEST_TOTAL
        .with_label_values(&["subscriptions"])
        .inc();

    let window = PageWindow::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
    let service = FeedService::new((**pool).clone());
    let page = service.subscription_feed(user_id.0, window).await?;

    Ok(HttpResponse::Ok().json(page))
}
