use crate::query::InputState;

/// Navigation bounds for the current page. An unknown (or zero) total
/// allows moving forward without limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    page: u32,
    total_pages: Option<u32>,
}

impl PageBounds {
    pub fn new(page: u32, total_pages: Option<u32>) -> Self {
        Self {
            page: page.max(1),
            total_pages: total_pages.filter(|total| *total > 0),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn can_go_previous(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        match self.total_pages {
            Some(total) => self.page < total,
            None => true,
        }
    }

    /// `"3"` or `"3 / 9"`.
    pub fn label(&self) -> String {
        match self.total_pages {
            Some(total) => format!("{} / {total}", self.page),
            None => self.page.to_string(),
        }
    }
}

/// Moves `input` one page back. Returns whether the page changed.
pub fn go_previous(input: &mut InputState, total_pages: Option<u32>) -> bool {
    if !PageBounds::new(input.page, total_pages).can_go_previous() {
        return false;
    }
    input.page = input.page.saturating_sub(1).max(1);
    true
}

/// Moves `input` one page forward. Returns whether the page changed.
pub fn go_next(input: &mut InputState, total_pages: Option<u32>) -> bool {
    if !PageBounds::new(input.page, total_pages).can_go_next() {
        return false;
    }
    input.page = input.page.saturating_add(1);
    true
}
