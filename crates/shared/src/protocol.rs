use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

fn first_page() -> u32 {
    1
}

/// A missing, null or zero page means the first one.
fn page_or_first<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?
        .filter(|page| *page > 0)
        .unwrap_or(1))
}

/// Servers report latency as any JSON number; fractions are rounded.
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(|ms| ms.max(0.0).round() as u64))
}

/// One article in a search result page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireArticle")]
pub struct Article {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

/// Providers label the origin either `source` or `website`.
#[derive(Deserialize)]
struct WireArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        Self {
            title: non_empty(wire.title),
            description: non_empty(wire.description),
            url: non_empty(wire.url),
            source: non_empty(wire.website).or_else(|| non_empty(wire.source)),
            published_at: non_empty(wire.published_at),
        }
    }
}

impl Article {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    pub fn display_source(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }

    /// Accepts RFC 3339 and the `+0000` offset form some providers send.
    pub fn published_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLinks {
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Payload of `GET /search`. Replaced wholesale on every successful request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<Article>,
    #[serde(default = "first_page", deserialize_with = "page_or_first")]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_estimated_pages: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_taken_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ResponseLinks>,
}

impl SearchResponse {
    pub fn empty(page: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            page_size: None,
            total_estimated_pages: None,
            time_taken_ms: None,
            keyword: None,
            city: None,
            offline: None,
            links: None,
        }
    }

    /// Total page count, treating a reported zero as unknown.
    pub fn known_total_pages(&self) -> Option<u32> {
        self.total_estimated_pages.filter(|total| *total > 0)
    }
}
