//! Pagination primitives shared by list endpoints.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_PER_PAGE: i64 = 100;

    /// Default items per page.
    const DEFAULT_PER_PAGE: i64 = 10;

    pub fn limit(&self) -> i64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        let page = self.page.unwrap_or(1).max(1);
        (page - 1) * self.limit()
    }

    pub fn current_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Builder for page URLs that carry the active filter parameters.
///
/// Navigating pages must keep the same result scope, so every generated
/// link re-encodes the filters it was constructed with.
#[derive(Debug, Clone)]
pub struct PageUrl {
    path: String,
    params: Vec<(String, String)>,
}

impl PageUrl {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Add a query parameter echoed into every generated link.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// URL for the given page number.
    pub fn page(&self, page: i64) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            query.append_pair(key, value);
        }
        query.append_pair("page", &page.to_string());
        format!("{}?{}", self.path, query.finish())
    }
}

/// Navigational link to one numbered page.
#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub page: i64,
    pub url: String,
    pub active: bool,
}

/// Paged result envelope returned by list endpoints.
#[derive(Debug, Serialize)]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    /// 1-based index of the first item on this page; null when the page is empty.
    pub from: Option<i64>,
    /// 1-based index of the last item on this page; null when the page is empty.
    pub to: Option<i64>,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub links: Vec<PageLink>,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: &Pagination, url: &PageUrl) -> Self {
        let per_page = pagination.limit();
        let total_pages = (total + per_page - 1) / per_page;
        let page = pagination.current_page();
        let offset = pagination.offset();

        let (from, to) = if items.is_empty() {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + items.len() as i64))
        };

        let prev_url = (page > 1).then(|| url.page(page - 1));
        let next_url = (page < total_pages).then(|| url.page(page + 1));
        let links = (1..=total_pages)
            .map(|n| PageLink {
                page: n,
                url: url.page(n),
                active: n == page,
            })
            .collect();

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
            from,
            to,
            prev_url,
            next_url,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_url() -> PageUrl {
        PageUrl::new("/api/v1/todos")
    }

    #[test]
    fn pagination_defaults() {
        let p = Pagination {
            page: None,
            per_page: None,
        };
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn pagination_clamps_per_page() {
        let p = Pagination {
            page: Some(1),
            per_page: Some(500),
        };
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn pagination_offset_calculation() {
        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn paged_result_metadata() {
        let p = Pagination {
            page: Some(2),
            per_page: Some(10),
        };
        let result = PagedResult::new(vec![1; 10], 25, &p, &bare_url());
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total, 25);
        assert_eq!(result.page, 2);
        assert_eq!(result.from, Some(11));
        assert_eq!(result.to, Some(20));
    }

    #[test]
    fn empty_page_has_null_range() {
        let p = Pagination {
            page: Some(9),
            per_page: Some(10),
        };
        let result = PagedResult::<i32>::new(vec![], 25, &p, &bare_url());
        assert_eq!(result.from, None);
        assert_eq!(result.to, None);
        // Past the last page there is no next link.
        assert!(result.next_url.is_none());
        assert!(result.prev_url.is_some());
    }

    #[test]
    fn first_page_has_no_prev_last_page_has_no_next() {
        let p = Pagination {
            page: Some(1),
            per_page: Some(10),
        };
        let result = PagedResult::new(vec![1; 10], 30, &p, &bare_url());
        assert!(result.prev_url.is_none());
        assert_eq!(result.next_url.as_deref(), Some("/api/v1/todos?page=2"));

        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        let result = PagedResult::new(vec![1; 10], 30, &p, &bare_url());
        assert_eq!(result.prev_url.as_deref(), Some("/api/v1/todos?page=2"));
        assert!(result.next_url.is_none());
    }

    #[test]
    fn numbered_links_mark_active_page() {
        let p = Pagination {
            page: Some(2),
            per_page: Some(10),
        };
        let result = PagedResult::new(vec![1; 10], 30, &p, &bare_url());
        assert_eq!(result.links.len(), 3);
        assert!(!result.links[0].active);
        assert!(result.links[1].active);
        assert_eq!(result.links[2].url, "/api/v1/todos?page=3");
    }

    #[test]
    fn links_preserve_filter_params() {
        let url = PageUrl::new("/api/v1/todos")
            .with_param("search", "weekly report")
            .with_param("status", "active");
        assert_eq!(
            url.page(2),
            "/api/v1/todos?search=weekly+report&status=active&page=2"
        );
    }

    #[test]
    fn empty_collection_yields_no_links() {
        let p = Pagination {
            page: None,
            per_page: None,
        };
        let result = PagedResult::<i32>::new(vec![], 0, &p, &bare_url());
        assert_eq!(result.total_pages, 0);
        assert!(result.links.is_empty());
        assert!(result.prev_url.is_none());
        assert!(result.next_url.is_none());
    }
}
