use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber for host applications. `RUST_LOG` wins over
/// `LOG_LEVEL`; the default level is `info`. Returns `false` when a global
/// subscriber was already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter_from(
            std::env::var("RUST_LOG").ok(),
            std::env::var("LOG_LEVEL").ok(),
        ))
        .with_target(true)
        .try_init()
        .is_ok()
}

fn filter_from(rust_log: Option<String>, log_level: Option<String>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| log_level.and_then(|level| EnvFilter::try_new(level.to_ascii_lowercase()).ok()))
        .unwrap_or_else(|| EnvFilter::new("info"))
}
