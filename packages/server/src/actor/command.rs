//! Messages accepted by the server actor.

use tokio::sync::oneshot;

use crate::{
    domain::RegistrySnapshot,
    protocol::{CommandKind, Request},
    session::Client,
};

/// One parsed client request, consumed exactly once by the actor.
#[derive(Clone)]
pub struct Command {
    /// Originating client; responses are written back through it
    pub origin: Client,
    pub request: Request,
}

impl Command {
    pub fn new(origin: Client, request: Request) -> Self {
        Self { origin, request }
    }

    pub fn kind(&self) -> CommandKind {
        self.request.kind()
    }
}

/// Online / offline announcement. `ack` fires once the actor has applied it.
pub(super) struct Announcement {
    pub client: Client,
    pub ack: oneshot::Sender<bool>,
}

/// Items of the command queue
pub(super) enum ActorMessage {
    /// `done` fires after the command is applied and its reply written
    Command {
        command: Command,
        done: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<RegistrySnapshot>,
    },
}
