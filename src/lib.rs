/// Feed Service Library
///
/// Content feed and engagement backend for a video-sharing platform: the
/// five video retrieval modes (random, trending, tags, search, subscription
/// feed), creator enrichment, and engagement mutations (views, reactions,
/// subscriptions).
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for videos, creators and reactions
/// - `services`: Business logic layer
/// - `db`: Database access layer and repositories
/// - `cache`: Trending feed caching
/// - `middleware`: Bearer token verification and caller identity
/// - `pagination`: Page/limit normalization and the response envelope
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
