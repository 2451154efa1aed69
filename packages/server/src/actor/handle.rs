//! Cloneable handle to a running server actor.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::{domain::RegistrySnapshot, session::Client};

use super::command::{ActorMessage, Announcement, Command};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    /// The actor's queues are closed
    #[error("server actor stopped")]
    ActorStopped,
}

/// Sending side of the actor's three queues.
///
/// Every call waits until the actor has finished with the event, so events
/// issued in sequence by one caller are applied, and answered, in that order.
#[derive(Clone, Debug)]
pub struct ServerHandle {
    online_tx: mpsc::Sender<Announcement>,
    offline_tx: mpsc::Sender<Announcement>,
    command_tx: mpsc::Sender<ActorMessage>,
}

impl ServerHandle {
    pub(super) fn new(
        online_tx: mpsc::Sender<Announcement>,
        offline_tx: mpsc::Sender<Announcement>,
        command_tx: mpsc::Sender<ActorMessage>,
    ) -> Self {
        Self {
            online_tx,
            offline_tx,
            command_tx,
        }
    }

    /// Announce a newly accepted connection.
    ///
    /// Returns `false` if another session already holds the client's address.
    pub async fn online(&self, client: &Client) -> Result<bool, HandleError> {
        announce(&self.online_tx, client).await
    }

    /// Announce a closed connection. Returns `false` if nothing was removed.
    pub async fn offline(&self, client: &Client) -> Result<bool, HandleError> {
        announce(&self.offline_tx, client).await
    }

    /// Hand a command to the actor and wait until it has been executed and
    /// its reply, if any, written to the originating client.
    pub async fn submit(&self, command: Command) -> Result<(), HandleError> {
        let (done, executed) = oneshot::channel();
        self.command_tx
            .send(ActorMessage::Command { command, done })
            .await
            .map_err(|_| HandleError::ActorStopped)?;
        executed.await.map_err(|_| HandleError::ActorStopped)
    }

    /// Copy of the registry, serialized with every other event.
    pub async fn snapshot(&self) -> Result<RegistrySnapshot, HandleError> {
        let (reply, snapshot) = oneshot::channel();
        self.command_tx
            .send(ActorMessage::Snapshot { reply })
            .await
            .map_err(|_| HandleError::ActorStopped)?;
        snapshot.await.map_err(|_| HandleError::ActorStopped)
    }
}

async fn announce(
    queue: &mpsc::Sender<Announcement>,
    client: &Client,
) -> Result<bool, HandleError> {
    let (ack, applied) = oneshot::channel();
    queue
        .send(Announcement {
            client: client.clone(),
            ack,
        })
        .await
        .map_err(|_| HandleError::ActorStopped)?;
    applied.await.map_err(|_| HandleError::ActorStopped)
}
