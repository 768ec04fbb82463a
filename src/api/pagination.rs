/// A skip/limit window computed from a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: i64,
}

/// Compute the window for `page` with a fixed page size.
///
/// Pages are 1-based; anything below 1 is treated as page 1.
pub fn page_window(page: u32, per_page: u32) -> PageWindow {
    let page = page.max(1) as u64;
    PageWindow {
        skip: (page - 1) * u64::from(per_page),
        limit: i64::from(per_page),
    }
}

/// Whether more records exist past the given window.
pub fn has_more(total: u64, window: PageWindow) -> bool {
    total > window.skip + window.limit as u64
}
