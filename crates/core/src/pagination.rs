use std::num::NonZeroUsize;
use std::ops::Range;

/// Number of pages for `total` questions; never less than one.
#[must_use]
pub fn total_pages(total: usize, page_size: NonZeroUsize) -> NonZeroUsize {
    NonZeroUsize::new(total.div_ceil(page_size.get())).unwrap_or(NonZeroUsize::MIN)
}

/// Page cursor over a list of `total` questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total: usize,
    page: NonZeroUsize,
    page_size: NonZeroUsize,
}

impl Pagination {
    /// Build a cursor, clamping `page` into range.
    #[must_use]
    pub fn new(total: usize, page: NonZeroUsize, page_size: NonZeroUsize) -> Self {
        let mut pagination = Self {
            total,
            page: NonZeroUsize::MIN,
            page_size,
        };
        pagination.page = pagination.clamp(page.get());
        pagination
    }

    #[must_use]
    pub fn page(&self) -> NonZeroUsize {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn total_pages(&self) -> NonZeroUsize {
        total_pages(self.total, self.page_size)
    }

    fn clamp(&self, page: usize) -> NonZeroUsize {
        let last = self.total_pages();
        NonZeroUsize::new(page.min(last.get())).unwrap_or(NonZeroUsize::MIN)
    }

    #[must_use]
    pub fn can_prev(&self) -> bool {
        self.page.get() > 1
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Submitting is only offered from the last page.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.page == self.total_pages()
    }

    /// Move to `page`, clamped. Returns true when the page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        let target = self.clamp(page);
        let changed = target != self.page;
        self.page = target;
        changed
    }

    pub fn prev(&mut self) -> bool {
        self.can_prev() && self.go_to(self.page.get() - 1)
    }

    pub fn next(&mut self) -> bool {
        self.can_next() && self.go_to(self.page.get() + 1)
    }

    /// Change the page size; the page always goes back to 1.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
        self.page = NonZeroUsize::MIN;
    }

    /// Positions shown on the current page.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        let start = (self.page.get() - 1)
            .saturating_mul(self.page_size.get())
            .min(self.total);
        let end = start.saturating_add(self.page_size.get()).min(self.total);
        start..end
    }

    /// Share of pages reached, rounded to a whole percent.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let page = self.page.get() as f64;
        let pages = self.total_pages().get() as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (page / pages * 100.0).round().clamp(0.0, 100.0) as u8;
        percent
    }

    #[must_use]
    pub fn indicator(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages())
    }
}
