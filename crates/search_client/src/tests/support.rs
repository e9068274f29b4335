//! Scripted transport shared by the controller and session tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::protocol::{Article, SearchResponse};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::{error::SearchError, query::SearchParams, transport::SearchTransport};

pub(crate) struct ScriptedCall {
    pub params: SearchParams,
    pub cancel: CancellationToken,
    reply: oneshot::Sender<Result<SearchResponse, SearchError>>,
}

impl ScriptedCall {
    pub fn respond(self, result: Result<SearchResponse, SearchError>) {
        let _ = self.reply.send(result);
    }

    pub fn succeed(self, response: SearchResponse) {
        self.respond(Ok(response));
    }
}

/// Parks every call until the test answers it. With `honour_cancel` off the
/// transport behaves like one that cannot be stopped and resolves whatever
/// the test sends, even after cancellation.
pub(crate) struct ScriptedTransport {
    calls: mpsc::UnboundedSender<ScriptedCall>,
    honour_cancel: bool,
    started: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ScriptedCall>) {
        Self::build(true)
    }

    pub fn ignoring_cancel() -> (Arc<Self>, mpsc::UnboundedReceiver<ScriptedCall>) {
        Self::build(false)
    }

    fn build(honour_cancel: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<ScriptedCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            calls,
            honour_cancel,
            started: AtomicUsize::new(0),
        });
        (transport, rx)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchTransport for ScriptedTransport {
    async fn search(
        &self,
        params: &SearchParams,
        cancel: CancellationToken,
    ) -> Result<SearchResponse, SearchError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let (reply, answer) = oneshot::channel();
        let _ = self.calls.send(ScriptedCall {
            params: params.clone(),
            cancel: cancel.clone(),
            reply,
        });

        let answer = async {
            answer
                .await
                .unwrap_or_else(|_| Err(SearchError::Transport("script dropped call".into())))
        };

        if self.honour_cancel {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(SearchError::Cancelled),
                result = answer => result,
            }
        } else {
            answer.await
        }
    }
}

pub(crate) fn response_with(page: u32, titles: &[&str], total_pages: Option<u32>) -> SearchResponse {
    let mut response = SearchResponse::empty(page);
    response.items = titles
        .iter()
        .map(|title| Article {
            title: Some(title.to_string()),
            ..Article::default()
        })
        .collect();
    response.total_estimated_pages = total_pages;
    response
}
