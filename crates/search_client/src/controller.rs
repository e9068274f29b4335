//! Single-flight request lifecycle: every dispatch supersedes and cancels the
//! one before it, and only the newest dispatch may move [`RequestState`].

use std::sync::Arc;

use parking_lot::Mutex;
use shared::protocol::SearchResponse;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    error::{ErrorCategory, SearchError},
    query::SearchParams,
    transport::SearchTransport,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(SearchResponse),
    Failed {
        message: String,
        category: ErrorCategory,
    },
}

impl RequestState {
    fn failed(err: &SearchError) -> Self {
        RequestState::Failed {
            message: err.to_string(),
            category: err.category(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The request resolved while still current and moved the state.
    Applied(RequestState),
    /// A newer dispatch (or teardown) cancelled this one; nothing changed.
    Superseded,
}

/// A started request. Produced by [`RequestController::begin`], consumed by
/// [`RequestController::run`].
#[derive(Debug)]
pub struct Ticket {
    generation: u64,
    params: SearchParams,
    cancel: CancellationToken,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }
}

struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Default)]
struct ControllerInner {
    generation: u64,
    in_flight: Option<InFlight>,
}

pub struct RequestController {
    transport: Arc<dyn SearchTransport>,
    inner: Mutex<ControllerInner>,
    state: watch::Sender<RequestState>,
}

impl RequestController {
    pub fn new(transport: Arc<dyn SearchTransport>) -> Arc<Self> {
        let (state, _) = watch::channel(RequestState::Idle);
        Arc::new(Self {
            transport,
            inner: Mutex::new(ControllerInner::default()),
            state,
        })
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    pub fn has_in_flight(&self) -> bool {
        self.inner.lock().in_flight.is_some()
    }

    /// Starts a request and runs it to completion.
    pub async fn dispatch(&self, params: SearchParams) -> DispatchOutcome {
        let ticket = self.begin(params);
        self.run(ticket).await
    }

    /// Cancels the outstanding request, if any, then moves to `Loading`.
    /// Runs without suspending, so the predecessor's token is always
    /// cancelled before the new call can begin.
    pub fn begin(&self, params: SearchParams) -> Ticket {
        let mut inner = self.inner.lock();
        if let Some(previous) = inner.in_flight.take() {
            debug!(generation = previous.generation, "cancelling superseded search request");
            previous.cancel.cancel();
        }

        inner.generation += 1;
        let generation = inner.generation;
        let cancel = CancellationToken::new();
        inner.in_flight = Some(InFlight {
            generation,
            cancel: cancel.clone(),
        });
        self.state.send_replace(RequestState::Loading);

        info!(
            generation,
            query = params.query(),
            page = params.page(),
            page_size = params.page_size().get(),
            offline = params.offline(),
            "dispatching search request"
        );

        Ticket {
            generation,
            params,
            cancel,
        }
    }

    /// Performs the network call for `ticket` and applies its result if the
    /// ticket is still the newest one.
    pub async fn run(&self, ticket: Ticket) -> DispatchOutcome {
        if ticket.cancel.is_cancelled() {
            debug!(generation = ticket.generation, "search request superseded before it started");
            return DispatchOutcome::Superseded;
        }

        let result = self
            .transport
            .search(&ticket.params, ticket.cancel.clone())
            .await;

        let next = match result {
            Err(SearchError::Cancelled) => {
                debug!(generation = ticket.generation, "search request cancelled");
                return DispatchOutcome::Superseded;
            }
            Ok(response) => RequestState::Succeeded(response),
            Err(err) => RequestState::failed(&err),
        };

        let mut inner = self.inner.lock();
        // The transport may finish before it notices cancellation.
        if ticket.cancel.is_cancelled() || inner.generation != ticket.generation {
            debug!(
                generation = ticket.generation,
                current = inner.generation,
                "discarding late search response"
            );
            return DispatchOutcome::Superseded;
        }
        inner.in_flight = None;

        match &next {
            RequestState::Succeeded(response) => info!(
                generation = ticket.generation,
                items = response.items.len(),
                total_pages = ?response.total_estimated_pages,
                time_taken_ms = ?response.time_taken_ms,
                "search request succeeded"
            ),
            RequestState::Failed { message, category } => warn!(
                generation = ticket.generation,
                ?category,
                error = %message,
                "search request failed"
            ),
            RequestState::Idle | RequestState::Loading => {}
        }

        self.state.send_replace(next.clone());
        DispatchOutcome::Applied(next)
    }

    /// Teardown: cancels the outstanding request without a state transition.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        if let Some(previous) = inner.in_flight.take() {
            debug!(generation = previous.generation, "cancelling search request on teardown");
            previous.cancel.cancel();
        }
        inner.generation += 1;
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
