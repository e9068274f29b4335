//! The control loop tying input, debouncing and the request controller
//! together.

use std::sync::Arc;

use shared::domain::PageSize;
use tokio::{
    sync::{mpsc, watch},
    task::{JoinError, JoinSet},
};
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    controller::{DispatchOutcome, RequestController},
    debounce::Debouncer,
    pagination,
    query::{InputState, SearchParams},
    transport::SearchTransport,
    view::SearchView,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetQuery(String),
    SetCity(String),
    SetPageSize(PageSize),
    SetOffline(bool),
    Submit,
    NextPage,
    PreviousPage,
    Shutdown,
}

/// Values whose change re-runs the search. City is not among them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SyncKey {
    settled_query: String,
    page: u32,
    page_size: PageSize,
    offline: bool,
}

/// UI side of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    view: watch::Receiver<SearchView>,
}

impl SessionHandle {
    /// Returns `false` once the session has stopped.
    pub fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn set_query(&self, query: impl Into<String>) -> bool {
        self.send(SessionCommand::SetQuery(query.into()))
    }

    pub fn set_city(&self, city: impl Into<String>) -> bool {
        self.send(SessionCommand::SetCity(city.into()))
    }

    pub fn submit(&self) -> bool {
        self.send(SessionCommand::Submit)
    }

    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    pub fn watch_view(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }
}

pub struct SearchSession {
    input: InputState,
    settled_query: String,
    debouncer: Debouncer<String>,
    controller: Arc<RequestController>,
    last_key: Option<SyncKey>,
    view: SearchView,
    view_tx: watch::Sender<SearchView>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    in_flight: JoinSet<DispatchOutcome>,
}

impl SearchSession {
    pub fn new(config: &ClientConfig, transport: Arc<dyn SearchTransport>) -> (Self, SessionHandle) {
        let input = InputState::with_query(config.initial_query.clone());
        let view = SearchView {
            input: input.clone(),
            ..SearchView::default()
        };
        let (view_tx, view_rx) = watch::channel(view.clone());
        let (commands_tx, commands) = mpsc::unbounded_channel();

        let session = Self {
            settled_query: input.query.clone(),
            input,
            debouncer: Debouncer::new(config.debounce),
            controller: RequestController::new(transport),
            last_key: None,
            view,
            view_tx,
            commands,
            in_flight: JoinSet::new(),
        };
        let handle = SessionHandle {
            commands: commands_tx,
            view: view_rx,
        };
        (session, handle)
    }

    pub fn controller(&self) -> &Arc<RequestController> {
        &self.controller
    }

    pub fn view(&self) -> &SearchView {
        &self.view
    }

    /// Runs until `Shutdown` or until every handle is dropped. The initial
    /// input is searched straight away.
    pub async fn run(mut self) {
        self.sync();
        self.publish();

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(SessionCommand::Shutdown) => break,
                    Some(command) => self.handle(command),
                },
                settled = self.debouncer.settled() => self.on_settled(settled),
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.on_completed(joined);
                }
            }
            self.publish();
        }

        self.teardown();
    }

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetQuery(query) => {
                self.input.query = query.clone();
                self.debouncer.push(query);
            }
            SessionCommand::SetCity(city) => {
                self.input.city = city;
            }
            SessionCommand::SetPageSize(page_size) => {
                self.input.page_size = page_size;
                self.sync();
            }
            SessionCommand::SetOffline(offline) => {
                self.input.offline = offline;
                self.sync();
            }
            SessionCommand::NextPage => {
                if pagination::go_next(&mut self.input, self.view.total_pages()) {
                    self.sync();
                }
            }
            SessionCommand::PreviousPage => {
                if pagination::go_previous(&mut self.input, self.view.total_pages()) {
                    self.sync();
                }
            }
            SessionCommand::Submit => self.submit(),
            // `run` stops the loop and tears down.
            SessionCommand::Shutdown => {}
        }
    }

    fn on_settled(&mut self, query: String) {
        self.settled_query = query;
        self.sync();
    }

    /// Explicit new search: searches the keyword as typed, from page 1. The
    /// page reset is recorded as observed so it does not dispatch again.
    fn submit(&mut self) {
        self.debouncer.flush();
        self.settled_query = self.input.query.clone();
        self.input.page = 1;
        self.last_key = Some(self.key());
        self.dispatch(true);
    }

    /// Dispatches when the observed tuple differs from the last one seen.
    fn sync(&mut self) {
        let key = self.key();
        if self.last_key.as_ref() == Some(&key) {
            return;
        }
        self.last_key = Some(key);
        self.dispatch(false);
    }

    fn key(&self) -> SyncKey {
        SyncKey {
            settled_query: self.settled_query.clone(),
            page: self.input.page,
            page_size: self.input.page_size,
            offline: self.input.offline,
        }
    }

    fn dispatch(&mut self, reset_page: bool) {
        let snapshot = InputState {
            query: self.settled_query.clone(),
            ..self.input.clone()
        };
        let Some(params) = SearchParams::build(&snapshot, reset_page) else {
            debug!("keyword is empty; skipping search");
            return;
        };

        let ticket = self.controller.begin(params);
        self.view.apply(&self.controller.state());

        let controller = Arc::clone(&self.controller);
        self.in_flight
            .spawn(async move { controller.run(ticket).await });
    }

    /// A task can finish inside the controller and be joined only after a
    /// newer request began, so the view follows the controller's current
    /// state rather than the state the task carried.
    fn on_completed(&mut self, joined: Result<DispatchOutcome, JoinError>) {
        match joined {
            Ok(DispatchOutcome::Applied(_)) => self.view.apply(&self.controller.state()),
            Ok(DispatchOutcome::Superseded) => {}
            Err(err) if err.is_cancelled() => {}
            Err(err) => warn!(error = %err, "search task failed"),
        }
    }

    fn publish(&mut self) {
        self.view.input = self.input.clone();
        self.view.typing = self.debouncer.is_pending();
        self.view_tx.send_replace(self.view.clone());
    }

    fn teardown(&mut self) {
        info!("search session shutting down");
        self.debouncer.cancel();
        self.controller.cancel();
        self.in_flight.abort_all();
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
