/// HTTP handlers for feed-service endpoints
///
/// - Feed: the five retrieval modes over public videos
/// - Videos: single fetch, owner CRUD, view tracking
/// - Engagement: reactions and subscriptions
pub mod engagement;
pub mod feed;
pub mod videos;

// Re-export handler functions at module level
pub use engagement::{dislike_video, like_video, subscribe_channel, unsubscribe_channel};
pub use feed::{random_videos, search_videos, subscription_feed, trending_videos, videos_by_tag};
pub use videos::{create_video, delete_video, get_video, track_view, update_video};
