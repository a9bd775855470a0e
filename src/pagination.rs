use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Caller-supplied pagination query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Bounds the parameters: page >= 1, 1 <= page_size <= MAX_PAGE_SIZE.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    // saturates instead of overflowing on absurd page numbers; a huge
    // OFFSET just yields an empty page
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Pagination metadata returned with every listing.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub pages: i64,
    pub page: i64,
}

impl PageMeta {
    pub fn new(total: i64, params: &PageParams) -> Self {
        // ceiling division; params are already clamped so page_size >= 1
        let pages = (total + params.page_size - 1) / params.page_size;
        Self {
            total,
            pages,
            page: params.page,
        }
    }
}

/// Listing envelope: `{"status": true, "content": {"meta": ..., "data": [...]}}`.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub status: bool,
    pub content: PageContent<T>,
}

#[derive(Debug, Serialize)]
pub struct PageContent<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

impl<T: Serialize> PageResponse<T> {
    pub fn new(meta: PageMeta, data: Vec<T>) -> Self {
        Self {
            status: true,
            content: PageContent { meta, data },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: i64, page_size: i64) -> PageParams {
        PageParams { page, page_size }.clamped()
    }

    #[test]
    fn pages_is_ceiling_of_total_over_size() {
        let meta = PageMeta::new(25, &params(1, 10));
        assert_eq!(meta.pages, 3);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.page, 1);

        let meta = PageMeta::new(30, &params(2, 10));
        assert_eq!(meta.pages, 3);
        assert_eq!(meta.page, 2);
    }

    #[test]
    fn empty_collection_yields_zero_pages() {
        let meta = PageMeta::new(0, &params(1, 10));
        assert_eq!(meta, PageMeta { total: 0, pages: 0, page: 1 });
    }

    #[test]
    fn params_are_bounded() {
        let p = params(0, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 1);

        let p = params(-3, 10_000);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_follows_page() {
        let p = params(3, 10);
        assert_eq!(p.offset(), 20);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn huge_page_number_does_not_overflow_offset() {
        let p = params(i64::MAX, 10);
        assert_eq!(p.offset(), i64::MAX);

        let p = params(i64::MAX, MAX_PAGE_SIZE);
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn defaults_match_contract() {
        let p = PageParams::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 10);
    }
}
