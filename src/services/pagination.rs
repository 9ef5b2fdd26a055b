//! Paged listing: the date-range precondition and sibling-page links.

use jiff::civil::Date;

use crate::error::{AppError, AppResult};
use crate::models::{Page, UserFilter};

pub const RANGE_ORDER_MESSAGE: &str = "The 'to' value must be after the 'from' value";

/// A list request after boundary parsing.
///
/// `page` is zero-based and `size` is at least one; both are checked by the
/// HTTP layer before reaching the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListUsersQuery {
    pub page: i64,
    pub size: i64,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl ListUsersQuery {
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page,
            size,
            from: None,
            to: None,
        }
    }

    pub fn with_range(mut self, from: Option<Date>, to: Option<Date>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Builds the storage filter.
    ///
    /// Only a complete range filters; a lone bound is ignored. A reversed
    /// range is rejected before any query runs.
    pub fn filter(&self) -> AppResult<UserFilter> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if to < from => {
                Err(AppError::invalid_argument(RANGE_ORDER_MESSAGE))
            }
            (Some(from), Some(to)) => Ok(UserFilter::DateRange { from, to }),
            _ => Ok(UserFilter::NoFilter),
        }
    }
}

/// Absolute links to the neighbouring pages of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Builds absolute `/users` URLs from the configured base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/users/{id}`
    pub fn record(&self, id: i64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    /// `{base}/users?page=..&size=..` plus `from`/`to` when filtered.
    pub fn listing(&self, page: i64, size: i64, filter: &UserFilter) -> String {
        let mut link = format!("{}/users?page={}&size={}", self.base_url, page, size);
        if let UserFilter::DateRange { from, to } = filter {
            link.push_str(&format!("&from={}&to={}", from, to));
        }
        link
    }

    /// Links for the pages around `page`. A link is present only when the
    /// page reports a neighbour in that direction.
    pub fn siblings<T>(&self, page: &Page<T>, filter: &UserFilter) -> PageLinks {
        let next = page.has_next().then(|| {
            let target = page.page.saturating_add(1).min(page.total_pages());
            self.listing(target, page.size, filter)
        });
        let prev = page.has_prev().then(|| {
            let target = page.page.saturating_sub(1).max(0);
            self.listing(target, page.size, filter)
        });

        PageLinks { next, prev }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn links() -> LinkBuilder {
        LinkBuilder::new("http://localhost:8080/")
    }

    fn march() -> UserFilter {
        UserFilter::DateRange {
            from: date(2024, 3, 1),
            to: date(2024, 4, 1),
        }
    }

    #[test]
    fn test_filter_requires_both_bounds() {
        let query = ListUsersQuery::new(0, 20).with_range(Some(date(2024, 3, 1)), None);
        assert_eq!(query.filter().unwrap(), UserFilter::NoFilter);

        let query = ListUsersQuery::new(0, 20).with_range(None, Some(date(2024, 3, 1)));
        assert_eq!(query.filter().unwrap(), UserFilter::NoFilter);

        let query =
            ListUsersQuery::new(0, 20).with_range(Some(date(2024, 3, 1)), Some(date(2024, 4, 1)));
        assert_eq!(query.filter().unwrap(), march());
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let query =
            ListUsersQuery::new(0, 20).with_range(Some(date(2024, 4, 1)), Some(date(2024, 3, 1)));
        match query.filter().unwrap_err() {
            AppError::InvalidArgument { messages } => {
                assert_eq!(messages, vec![RANGE_ORDER_MESSAGE])
            }
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_bounds_are_accepted() {
        let day = Some(date(2024, 3, 1));
        let query = ListUsersQuery::new(0, 20).with_range(day, day);
        assert!(query.filter().is_ok());
    }

    #[test]
    fn test_record_link() {
        assert_eq!(links().record(42), "http://localhost:8080/users/42");
    }

    #[test]
    fn test_listing_link_carries_range() {
        assert_eq!(
            links().listing(1, 10, &UserFilter::NoFilter),
            "http://localhost:8080/users?page=1&size=10"
        );
        assert_eq!(
            links().listing(0, 5, &march()),
            "http://localhost:8080/users?page=0&size=5&from=2024-03-01&to=2024-04-01"
        );
    }

    #[test]
    fn test_first_page_has_no_prev() {
        let page = Page::<()>::new(vec![], 45, 0, 20);
        let result = links().siblings(&page, &UserFilter::NoFilter);
        assert_eq!(
            result.next.as_deref(),
            Some("http://localhost:8080/users?page=1&size=20")
        );
        assert_eq!(result.prev, None);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page = Page::<()>::new(vec![], 45, 2, 20);
        let result = links().siblings(&page, &march());
        assert_eq!(result.next, None);
        assert_eq!(
            result.prev.as_deref(),
            Some("http://localhost:8080/users?page=1&size=20&from=2024-03-01&to=2024-04-01")
        );
    }

    #[test]
    fn test_single_page_has_no_links() {
        let page = Page::<()>::new(vec![], 3, 0, 20);
        assert_eq!(links().siblings(&page, &UserFilter::NoFilter), PageLinks::default());
    }
}
