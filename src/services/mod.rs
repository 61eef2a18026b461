/// Business logic layer
///
/// - `feed`: the five video retrieval modes
/// - `creators`: creator enrichment fan-out join
/// - `engagement`: views, reactions, subscriptions
pub mod creators;
pub mod engagement;
pub mod feed;

pub use engagement::EngagementService;
pub use feed::FeedService;
