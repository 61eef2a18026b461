/// Database access layer
///
/// Repositories are free async functions over a `PgPool`, one module per
/// entity. The schema lives in `migrations/` and is applied at startup.
pub mod reaction_repo;
pub mod subscription_repo;
pub mod user_repo;
pub mod video_repo;
