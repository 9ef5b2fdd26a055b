/// One page of a larger result set, as reported by a storage backend.
///
/// `page` is zero-based. Paging flags follow the usual slice semantics:
/// a previous page exists for any page after the first, a next page exists
/// while `page + 1` is below the total page count. `page` may be any
/// non-negative `i64`, so the successor saturates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, size: i64) -> Self {
        Self {
            items,
            total,
            page,
            size,
        }
    }

    /// Number of pages needed to hold `total` items; at least one.
    pub fn total_pages(&self) -> i64 {
        if self.size <= 0 {
            return 1;
        }
        let full = self.total / self.size;
        let partial = i64::from(self.total % self.size != 0);
        (full + partial).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }
}
