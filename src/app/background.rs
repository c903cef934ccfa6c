//! Background task handling for fix-review
//!
//! Every endpoint request runs as its own tokio task and reports back over a
//! std channel that the UI thread drains once per tick.
//!
//! # Error Handling Patterns
//!
//! Channel sends use `let _ =`. If the receiver is gone the app is shutting
//! down and nobody is waiting for the result.

use crate::app::messages::BackgroundMessage;
use crate::endpoint::{Dispatcher, EndpointClient, Request};
use crate::session::{SessionController, SessionEvent};
use crate::viewer::CodeViewer;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use tracing::{debug, error};

/// Feed every pending completion to the session, collecting what changed
pub fn drain_messages<D: Dispatcher, V: CodeViewer>(
    session: &mut SessionController<D, V>,
    rx: &mpsc::Receiver<BackgroundMessage>,
) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        if let Some(event) = session.handle(msg) {
            events.push(event);
        }
    }
    events
}

/// Dispatcher that runs requests against the HTTP endpoint
pub struct HttpDispatcher {
    client: EndpointClient,
    tx: mpsc::Sender<BackgroundMessage>,
}

impl HttpDispatcher {
    pub fn new(client: EndpointClient, tx: mpsc::Sender<BackgroundMessage>) -> Self {
        Self { client, tx }
    }
}

impl Dispatcher for HttpDispatcher {
    fn dispatch(&self, request: Request) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let name = request.name();
        debug!(request = name, "dispatching");
        spawn_background(self.tx.clone(), name, async move {
            let message = execute(&client, request).await;
            let _ = tx.send(message);
        });
    }
}

/// Run one request and wrap its outcome for the UI thread
pub async fn execute(client: &EndpointClient, request: Request) -> BackgroundMessage {
    match request {
        Request::FileTree => BackgroundMessage::FileTreeLoaded(client.file_tree().await),
        Request::Source { file, ticket } => {
            let result = client.source(&file).await;
            BackgroundMessage::SourceLoaded {
                file,
                ticket,
                result,
            }
        }
        Request::FixList {
            ref file, ticket, ..
        } => BackgroundMessage::FixListLoaded {
            file: file.clone(),
            ticket,
            result: client.fix_list(&request).await,
        },
        Request::FixDraw { ref id, ticket } => BackgroundMessage::FixDrawLoaded {
            id: id.clone(),
            ticket,
            result: client.fix_draw(&request).await,
        },
        Request::Close { .. } => BackgroundMessage::Closed(client.send(&request).await),
        Request::Cache { .. } | Request::Clear => BackgroundMessage::Acknowledged {
            request: request.name(),
            result: client.send(&request).await,
        },
    }
}

pub fn spawn_background<F>(tx: mpsc::Sender<BackgroundMessage>, task_name: &'static str, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            error!(task = task_name, %detail, "background task panicked");
            let _ = tx.send(BackgroundMessage::Error(format!(
                "Background task '{}' crashed unexpectedly: {}",
                task_name, detail
            )));
        }
    });
}
