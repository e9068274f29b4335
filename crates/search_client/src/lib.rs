//! Request-lifecycle controller for the news search client.
//!
//! Raw input flows through a [`Debouncer`], the [`SearchSession`] decides when
//! the observed input changed, [`SearchParams`] are built from a snapshot and
//! the [`RequestController`] runs exactly one request at a time, cancelling
//! whatever it supersedes. Results come back as a [`SearchView`].

use std::sync::Arc;

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod query;
pub mod sync;
pub mod timing;
pub mod transport;
pub mod view;

pub use config::{load_config, ClientConfig};
pub use controller::{DispatchOutcome, RequestController, RequestState};
pub use debounce::Debouncer;
pub use error::{ErrorCategory, SearchError};
pub use pagination::PageBounds;
pub use query::{InputState, SearchParams};
pub use sync::{SearchSession, SessionCommand, SessionHandle};
pub use timing::Timed;
pub use transport::{HttpSearchTransport, SearchTransport};
pub use view::{Failure, SearchView};

/// Builds a session talking HTTP to the configured endpoint, with latency
/// measurement around every call. The caller drives it with
/// [`SearchSession::run`].
pub fn connect(config: &ClientConfig) -> anyhow::Result<(SearchSession, SessionHandle)> {
    let transport = Timed::new(HttpSearchTransport::new(config)?);
    Ok(SearchSession::new(config, Arc::new(transport)))
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
