use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use tracing::warn;
use url::Url;

pub const CONFIG_FILE_NAME: &str = "search_client.toml";

/// Endpoint and behaviour settings, injected into the client at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base of the search API. Empty means "same origin as the host UI".
    pub api_base: String,
    /// Origin relative bases are resolved against.
    pub origin: String,
    pub api_secret_key: String,
    /// `None` leaves requests to the transport's own defaults.
    pub request_timeout: Option<Duration>,
    pub debounce: Duration,
    pub initial_query: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            origin: "http://localhost:8080".into(),
            api_secret_key: "changeme".into(),
            request_timeout: Some(Duration::from_secs(30)),
            debounce: Duration::from_millis(500),
            initial_query: "apple".into(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_secret(mut self, api_secret_key: impl Into<String>) -> Self {
        self.api_secret_key = api_secret_key.into();
        self
    }

    /// Absolute URL of the `/search` endpoint.
    pub fn search_endpoint(&self) -> anyhow::Result<Url> {
        let origin = Url::parse(self.origin.trim())
            .with_context(|| format!("invalid origin '{}'", self.origin))?;
        let base = self.api_base.trim().trim_end_matches('/');
        origin
            .join(&format!("{base}/search"))
            .with_context(|| format!("invalid api base '{}'", self.api_base))
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.api_secret_key == ClientConfig::default().api_secret_key
    }
}

/// Defaults, then `search_client.toml` in the working directory, then the
/// process environment.
pub fn load_config() -> ClientConfig {
    load_config_from(Path::new(CONFIG_FILE_NAME), |key| std::env::var(key).ok())
}

pub fn load_config_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientConfig {
    let mut config = ClientConfig::default();

    if let Ok(raw) = fs::read_to_string(file) {
        if let Err(err) = apply_file_overrides(&mut config, &raw) {
            warn!(path = %file.display(), error = %err, "ignoring unreadable client config file");
        }
    }

    apply_env_overrides(&mut config, env);

    if config.uses_placeholder_secret() {
        warn!("search api secret is the placeholder value; set SEARCH_API_SECRET_KEY");
    }

    config
}

fn apply_file_overrides(config: &mut ClientConfig, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)
        .context("client config must be a flat table of strings")?;

    if let Some(v) = file_cfg.get("api_base") {
        config.api_base = v.clone();
    }
    if let Some(v) = file_cfg.get("origin") {
        config.origin = v.clone();
    }
    if let Some(v) = file_cfg.get("api_secret_key") {
        config.api_secret_key = v.clone();
    }
    if let Some(v) = file_cfg.get("request_timeout_ms") {
        config.request_timeout = parse_timeout(v)?;
    }
    if let Some(v) = file_cfg.get("debounce_ms") {
        config.debounce = parse_millis(v)?;
    }
    if let Some(v) = file_cfg.get("initial_query") {
        config.initial_query = v.clone();
    }

    Ok(())
}

fn apply_env_overrides(config: &mut ClientConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("SEARCH_API_BASE") {
        config.api_base = v;
    }
    if let Some(v) = env("APP__API_BASE") {
        config.api_base = v;
    }

    if let Some(v) = env("SEARCH_ORIGIN") {
        config.origin = v;
    }

    if let Some(v) = env("SEARCH_API_SECRET_KEY") {
        config.api_secret_key = v;
    }
    if let Some(v) = env("APP__API_SECRET_KEY") {
        config.api_secret_key = v;
    }

    if let Some(v) = env("SEARCH_REQUEST_TIMEOUT_MS") {
        match parse_timeout(&v) {
            Ok(timeout) => config.request_timeout = timeout,
            Err(err) => warn!(value = %v, error = %err, "ignoring SEARCH_REQUEST_TIMEOUT_MS"),
        }
    }

    if let Some(v) = env("SEARCH_DEBOUNCE_MS") {
        match parse_millis(&v) {
            Ok(delay) => config.debounce = delay,
            Err(err) => warn!(value = %v, error = %err, "ignoring SEARCH_DEBOUNCE_MS"),
        }
    }

    if let Some(v) = env("SEARCH_INITIAL_QUERY") {
        config.initial_query = v;
    }
}

fn parse_millis(raw: &str) -> anyhow::Result<Duration> {
    let millis = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("expected milliseconds, got '{raw}'"))?;
    Ok(Duration::from_millis(millis))
}

/// `0` disables the client-side timeout.
fn parse_timeout(raw: &str) -> anyhow::Result<Option<Duration>> {
    let timeout = parse_millis(raw)?;
    Ok((!timeout.is_zero()).then_some(timeout))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
