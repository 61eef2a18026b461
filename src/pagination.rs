/// Pagination coordinator
///
/// Normalizes raw `page`/`limit` query parameters into the window each feed
/// mode needs: skip/limit for trending, tag and search queries, a cumulative
/// bound for the subscription feed, and a pure cap for random discovery.
use serde::{Deserialize, Serialize};

use crate::models::VideoWithCreator;

/// Hard cap on page size across all modes.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

impl PageWindow {
    /// Clamp `page` to >= 1 (default 1) and `limit` to [1, 100].
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_LIMIT);
        Self { page, limit }
    }

    /// Row offset for skip/limit modes. Saturates: `page` has no upper
    /// bound, and an absurd caller-supplied page must land past the end of
    /// the data, not overflow.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Cumulative bound used by the subscription feed: page N covers the
    /// first N*limit rows rather than a disjoint page. Saturates like
    /// `offset`.
    pub fn cumulative_limit(&self) -> i64 {
        self.page.saturating_mul(self.limit)
    }
}

/// Pagination metadata returned alongside counted list modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl PageInfo {
    pub fn new(total: i64, window: &PageWindow) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + window.limit - 1) / window.limit
        };
        Self {
            total,
            page: window.page,
            pages,
        }
    }
}

/// Unified response envelope for every list mode. `pagination` is present
/// for counted modes (trending, tags, search) and null for random discovery
/// and the subscription feed, where no total is computed.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<VideoWithCreator>,
    pub pagination: Option<PageInfo>,
}

impl FeedPage {
    pub fn bare(items: Vec<VideoWithCreator>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }

    pub fn counted(items: Vec<VideoWithCreator>, info: PageInfo) -> Self {
        Self {
            items,
            pagination: Some(info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_missing() {
        let window = PageWindow::new(None, None, 20);
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, 20);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn limit_is_clamped_to_hard_cap() {
        let window = PageWindow::new(Some(1), Some(500), 40);
        assert_eq!(window.limit, MAX_PAGE_LIMIT);

        let window = PageWindow::new(Some(1), Some(0), 40);
        assert_eq!(window.limit, 1);

        let window = PageWindow::new(Some(1), Some(-5), 40);
        assert_eq!(window.limit, 1);
    }

    #[test]
    fn page_floor_is_one() {
        let window = PageWindow::new(Some(0), Some(10), 20);
        assert_eq!(window.page, 1);

        let window = PageWindow::new(Some(-3), Some(10), 20);
        assert_eq!(window.page, 1);
    }

    #[test]
    fn offset_skips_prior_pages() {
        let window = PageWindow::new(Some(3), Some(25), 20);
        assert_eq!(window.offset(), 50);
    }

    #[test]
    fn cumulative_limit_covers_all_pages_so_far() {
        let window = PageWindow::new(Some(3), Some(20), 20);
        assert_eq!(window.cumulative_limit(), 60);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let window = PageWindow::new(Some(i64::MAX), Some(100), 20);
        assert_eq!(window.offset(), i64::MAX);
        assert_eq!(window.cumulative_limit(), i64::MAX);

        let window = PageWindow::new(Some(i64::MAX / 2), Some(100), 20);
        assert!(window.offset() > 0);
        assert!(window.cumulative_limit() > 0);
    }

    #[test]
    fn page_count_rounds_up() {
        let window = PageWindow::new(Some(1), Some(20), 20);
        assert_eq!(PageInfo::new(0, &window).pages, 0);
        assert_eq!(PageInfo::new(1, &window).pages, 1);
        assert_eq!(PageInfo::new(20, &window).pages, 1);
        assert_eq!(PageInfo::new(21, &window).pages, 2);
        assert_eq!(PageInfo::new(41, &window).pages, 3);
    }
}
