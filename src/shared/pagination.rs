/// One page of a larger, already-filtered list
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// Slice `all` into the requested page. Out-of-range pages clamp to the last one.
    pub fn paginate(all: &[T], page: u32, limit: u32) -> Self
    where
        T: Clone,
    {
        let (page, limit) = validate_pagination(Some(page), Some(limit));
        let total = all.len() as u64;
        let last_page = (((total as f64) / (limit as f64)).ceil() as u32).max(1);
        let page = page.min(last_page);

        let start = ((page - 1) * limit) as usize;
        let items = all
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        Self::new(items, total, page, limit)
    }

    /// "Mostrando 26-50 de 73 usuarios"
    pub fn range_label(&self, noun: &str) -> String {
        if self.items.is_empty() {
            return format!("Mostrando 0 de {} {}", self.total, noun);
        }
        let first = (self.page - 1) as u64 * self.limit as u64 + 1;
        let last = first + self.items.len() as u64 - 1;
        format!("Mostrando {}-{} de {} {}", first, last, self.total, noun)
    }
}

pub fn validate_pagination(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(25).clamp(1, 100);
    (page, limit)
}
