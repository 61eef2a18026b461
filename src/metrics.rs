//! Prometheus metrics for feed-service.
//!
//! Exposes feed and engagement collectors and an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Total feed reads segmented by retrieval mode.
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Feed read requests segmented by retrieval mode",
        &["mode"]
    )
    .expect("failed to register feed_request_total");

    /// Total engagement writes segmented by operation.
    pub static ref ENGAGEMENT_WRITE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "engagement_write_total",
        "Engagement mutations segmented by operation",
        &["op"]
    )
    .expect("failed to register engagement_write_total");

    /// Trending cache events (hit/miss/error).
    pub static ref TRENDING_CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "trending_cache_events_total",
        "Trending cache events segmented by outcome",
        &["event"]
    )
    .expect("failed to register trending_cache_events_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
