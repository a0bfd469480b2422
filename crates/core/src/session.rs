//! Single-worker conversation session
//!
//! One tokio task owns the [`ConversationState`]. Utterances queue on an mpsc
//! channel and are handled strictly in arrival order; each turn runs on the
//! blocking pool so the surface never waits on text processing. The surface
//! receives [`SurfaceEvent`]s on its own channel.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::router::DialogueRouter;
use crate::types::{ConversationState, Response, Role, Status};

const INBOX_CAPACITY: usize = 32;

/// What the conversation surface is asked to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceEvent {
    Display {
        role: Role,
        message: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        results: Vec<String>,
    },
    Status {
        text: String,
    },
    Terminate,
}

impl SurfaceEvent {
    fn assistant(message: impl Into<String>, results: Vec<String>) -> Self {
        SurfaceEvent::Display {
            role: Role::Assistant,
            message: message.into(),
            results,
        }
    }
}

/// Submission side of a running session
pub struct SessionHandle {
    inbox: mpsc::Sender<String>,
    worker: JoinHandle<ConversationState>,
}

impl SessionHandle {
    /// Queue an utterance; fails once the session has terminated
    pub async fn submit(&self, utterance: impl Into<String>) -> Result<()> {
        self.inbox
            .send(utterance.into())
            .await
            .map_err(|_| anyhow!("Session is closed"))
    }

    /// Stop accepting input, let queued turns finish, return the final state
    pub async fn close(self) -> Result<ConversationState> {
        drop(self.inbox);
        self.worker.await.context("Session worker failed")
    }
}

/// Start the worker; it greets the surface right away
pub fn spawn(router: Arc<DialogueRouter>, events: mpsc::Sender<SurfaceEvent>) -> SessionHandle {
    let (inbox, rx) = mpsc::channel(INBOX_CAPACITY);
    let worker = tokio::spawn(run(router, rx, events));
    SessionHandle { inbox, worker }
}

async fn run(
    router: Arc<DialogueRouter>,
    mut inbox: mpsc::Receiver<String>,
    events: mpsc::Sender<SurfaceEvent>,
) -> ConversationState {
    let name = router.assistant_name().to_string();
    let mut state = ConversationState::new();

    let opening = [
        SurfaceEvent::assistant(router.welcome(), Vec::new()),
        status(Status::Ready, &name),
    ];
    for event in opening {
        if !emit(&events, event).await {
            return state;
        }
    }

    while let Some(utterance) = inbox.recv().await {
        let utterance = utterance.trim().to_string();
        if utterance.is_empty() {
            continue;
        }

        let echo = SurfaceEvent::Display {
            role: Role::User,
            message: utterance.clone(),
            results: Vec::new(),
        };
        if !emit(&events, echo).await || !emit(&events, status(Status::Processing, &name)).await {
            break;
        }

        let current = state.clone();
        let turn_router = Arc::clone(&router);
        let outcome =
            tokio::task::spawn_blocking(move || turn_router.handle(&current, &utterance)).await;

        let turn = match outcome {
            Ok(turn) => turn,
            Err(e) => {
                error!("Turn failed: {}", e);
                state.pending_command = None;
                let apology = SurfaceEvent::assistant(DialogueRouter::apology(), Vec::new());
                if !emit(&events, apology).await || !emit(&events, status(Status::Ready, &name)).await {
                    break;
                }
                continue;
            }
        };
        state = turn.state;

        match turn.response {
            Response::Message(reply) => {
                let shown = SurfaceEvent::assistant(reply.text, reply.results);
                if !emit(&events, shown).await || !emit(&events, status(Status::Ready, &name)).await {
                    break;
                }
            }
            Response::Terminate { farewell, delay } => {
                info!(?delay, "Session closing");
                if emit(&events, SurfaceEvent::assistant(farewell, Vec::new())).await
                    && emit(&events, status(Status::Closing, &name)).await
                {
                    tokio::time::sleep(delay).await;
                    emit(&events, SurfaceEvent::Terminate).await;
                }
                break;
            }
        }
    }

    debug!(?state, "Session worker stopped");
    state
}

fn status(status: Status, name: &str) -> SurfaceEvent {
    SurfaceEvent::Status {
        text: status.label(name),
    }
}

/// False once the surface has gone away
async fn emit(events: &mpsc::Sender<SurfaceEvent>, event: SurfaceEvent) -> bool {
    if events.send(event).await.is_err() {
        debug!("Surface dropped its event receiver");
        return false;
    }
    true
}
