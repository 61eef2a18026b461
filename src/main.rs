use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use feed_service::cache::FeedCache;
use feed_service::handlers;
use feed_service::metrics;
use feed_service::middleware::AuthKeys;
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "feed-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "feed-service"
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Feed Service
///
/// Read side: random discovery, trending, tag filter, full-text search and
/// the subscription feed, each enriched with a creator summary. Write side:
/// view counting, like/dislike reactions, subscribe/unsubscribe.
///
/// Runs on port 8085 by default (configurable via FEED_SERVICE_PORT).
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match feed_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting feed-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool and apply migrations
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!().run(&db_pool).await {
        tracing::error!("Database migration failed: {}", e);
        return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
    }

    tracing::info!("Connected to database, schema up to date");

    // Trending cache is best-effort: run without it when Redis is down
    let feed_cache = match redis::Client::open(config.cache.url.as_str()) {
        Ok(client) => match ConnectionManager::new(client).await {
            Ok(manager) => {
                tracing::info!("Connected to Redis trending cache");
                FeedCache::new(manager, config.cache.trending_ttl_secs)
            }
            Err(e) => {
                tracing::warn!("Redis unavailable, trending cache disabled: {}", e);
                FeedCache::disabled()
            }
        },
        Err(e) => {
            tracing::warn!("Invalid Redis URL, trending cache disabled: {}", e);
            FeedCache::disabled()
        }
    };

    let auth_keys = AuthKeys::from_secret(&config.auth.jwt_secret);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let db_pool_http = db_pool.clone();
    let server = HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(db_pool_http.clone()))
            .app_data(web::Data::new(feed_cache.clone()))
            .app_data(web::Data::new(auth_keys.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/videos")
                            // Fixed segments must register before /{video_id}
                            .route("/random", web::get().to(handlers::random_videos))
                            .route("/trending", web::get().to(handlers::trending_videos))
                            .route("/tags", web::get().to(handlers::videos_by_tag))
                            .route("/search", web::get().to(handlers::search_videos))
                            .route("/subscriptions", web::get().to(handlers::subscription_feed))
                            .route("", web::post().to(handlers::create_video))
                            .route("/{video_id}", web::get().to(handlers::get_video))
                            .route("/{video_id}", web::put().to(handlers::update_video))
                            .route("/{video_id}", web::delete().to(handlers::delete_video))
                            .route("/{video_id}/view", web::post().to(handlers::track_view))
                            .route("/{video_id}/like", web::post().to(handlers::like_video))
                            .route("/{video_id}/dislike", web::post().to(handlers::dislike_video)),
                    )
                    .service(
                        web::scope("/channels")
                            .route(
                                "/{channel_id}/subscribe",
                                web::post().to(handlers::subscribe_channel),
                            )
                            .route(
                                "/{channel_id}/subscribe",
                                web::delete().to(handlers::unsubscribe_channel),
                            ),
                    ),
            )
    })
    .bind(&bind_address)?
    .run();

    server.await?;

    tracing::info!("feed-service shutting down");

    Ok(())
}
