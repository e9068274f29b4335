//! Render-ready snapshot of a search session.

use shared::protocol::{Article, SearchResponse};

use crate::{controller::RequestState, error::ErrorCategory, pagination::PageBounds, query::InputState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub category: ErrorCategory,
}

impl Failure {
    pub fn requires_reauth(&self) -> bool {
        self.category == ErrorCategory::Auth
    }
}

/// What the renderer draws. Results survive `Loading` and `Failed`; only a
/// newer success replaces them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchView {
    pub input: InputState,
    /// The keyword box differs from the last settled keyword.
    pub typing: bool,
    pub loading: bool,
    pub error: Option<Failure>,
    pub response: Option<SearchResponse>,
}

impl SearchView {
    pub fn apply(&mut self, state: &RequestState) {
        match state {
            RequestState::Idle => {
                self.loading = false;
            }
            RequestState::Loading => {
                self.loading = true;
                self.error = None;
            }
            RequestState::Succeeded(response) => {
                self.loading = false;
                self.response = Some(response.clone());
            }
            RequestState::Failed { message, category } => {
                self.loading = false;
                self.error = Some(Failure {
                    message: message.clone(),
                    category: *category,
                });
            }
        }
    }

    pub fn items(&self) -> &[Article] {
        self.response
            .as_ref()
            .map(|response| response.items.as_slice())
            .unwrap_or_default()
    }

    /// Nothing to show and nothing on the way.
    pub fn is_empty_result(&self) -> bool {
        self.items().is_empty() && !self.loading
    }

    pub fn showing_label(&self) -> String {
        format!("Showing {} item(s)", self.items().len())
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.response
            .as_ref()
            .and_then(SearchResponse::known_total_pages)
    }

    pub fn page_bounds(&self) -> PageBounds {
        PageBounds::new(self.input.page, self.total_pages())
    }

    /// Page of the results on screen, with the total when known.
    pub fn page_label(&self) -> String {
        let shown = self.response.as_ref().map_or(1, |response| response.page);
        PageBounds::new(shown, self.total_pages()).label()
    }

    pub fn time_taken_ms(&self) -> Option<u64> {
        self.response.as_ref().and_then(|response| response.time_taken_ms)
    }

    pub fn prev_enabled(&self) -> bool {
        self.page_bounds().can_go_previous() && !self.loading
    }

    pub fn next_enabled(&self) -> bool {
        self.page_bounds().can_go_next() && !self.loading
    }

    pub fn submit_enabled(&self) -> bool {
        !self.input.query.trim().is_empty() && !self.loading
    }

    pub fn error_category(&self) -> Option<ErrorCategory> {
        self.error.as_ref().map(|failure| failure.category)
    }

    pub fn requires_reauth(&self) -> bool {
        self.error.as_ref().is_some_and(Failure::requires_reauth)
    }
}
