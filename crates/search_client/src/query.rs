use shared::domain::PageSize;

/// Everything the user can edit in the search form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub query: String,
    pub city: String,
    pub page: u32,
    pub page_size: PageSize,
    pub offline: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            query: String::new(),
            city: String::new(),
            page: 1,
            page_size: PageSize::default(),
            offline: false,
        }
    }
}

impl InputState {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Parameters of one `/search` call. Built fresh for every dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    query: String,
    page: u32,
    page_size: PageSize,
    city: String,
    offline: bool,
}

impl SearchParams {
    /// `None` when the trimmed keyword is empty: such input is never sent.
    /// `reset_page` starts a new search at page 1 whatever the stored page.
    pub fn build(input: &InputState, reset_page: bool) -> Option<Self> {
        let query = input.query.trim();
        if query.is_empty() {
            return None;
        }

        Some(Self {
            query: query.to_string(),
            page: if reset_page { 1 } else { input.page.max(1) },
            page_size: input.page_size,
            city: input.city.trim().to_string(),
            offline: input.offline,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn offline(&self) -> bool {
        self.offline
    }

    /// Query-string pairs in wire order; empty values are left out.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let pairs = [
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("city", self.city.clone()),
            ("offline", if self.offline { "1" } else { "0" }.to_string()),
        ];
        pairs
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
