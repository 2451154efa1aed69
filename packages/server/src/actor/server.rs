//! Event loop of the server actor.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use dengon_shared::time::Clock;

use crate::{
    domain::{ClientAddr, Registry, RegistryError, Timestamp},
    protocol::{FALSE_RESPONSE, Request, format_listing},
};

use super::{
    command::{ActorMessage, Announcement, Command},
    handle::ServerHandle,
};

/// Queue depth of each queue; senders also wait for the actor's acknowledgement.
const QUEUE_CAPACITY: usize = 1;

/// The single owner of the registry.
pub struct ServerActor {
    registry: Registry,
    clock: Arc<dyn Clock>,
    online_rx: mpsc::Receiver<Announcement>,
    offline_rx: mpsc::Receiver<Announcement>,
    command_rx: mpsc::Receiver<ActorMessage>,
}

impl ServerActor {
    /// Create an actor with an empty registry and the handle that feeds it.
    pub fn new(clock: Arc<dyn Clock>) -> (Self, ServerHandle) {
        let (online_tx, online_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (offline_tx, offline_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (command_tx, command_rx) = mpsc::channel(QUEUE_CAPACITY);

        let actor = Self {
            registry: Registry::new(),
            clock,
            online_rx,
            offline_rx,
            command_rx,
        };
        (actor, ServerHandle::new(online_tx, offline_tx, command_tx))
    }

    /// Create an actor and run it on the tokio runtime.
    pub fn spawn(clock: Arc<dyn Clock>) -> (ServerHandle, JoinHandle<()>) {
        let (actor, handle) = Self::new(clock);
        (handle, tokio::spawn(actor.run()))
    }

    /// Process events until every [`ServerHandle`] has been dropped.
    pub async fn run(mut self) {
        tracing::info!("Server actor started");
        loop {
            tokio::select! {
                Some(announcement) = self.online_rx.recv() => self.on_online(announcement),
                Some(announcement) = self.offline_rx.recv() => self.on_offline(announcement),
                Some(message) = self.command_rx.recv() => self.on_message(message).await,
                else => break,
            }
        }
        tracing::info!("Server actor stopped");
    }

    fn on_online(&mut self, Announcement { client, ack }: Announcement) {
        let registered = self
            .registry
            .register(client.addr().clone(), client.session_id());
        if registered {
            tracing::info!(
                "Client '{}' online (session {})",
                client.addr(),
                client.session_id()
            );
        } else {
            tracing::warn!(
                "Client '{}' is already online; session {} is not registered",
                client.addr(),
                client.session_id()
            );
        }
        let _ = ack.send(registered);
    }

    fn on_offline(&mut self, Announcement { client, ack }: Announcement) {
        let removed = self
            .registry
            .unregister(client.addr(), client.session_id());
        if removed {
            tracing::info!("Client '{}' offline", client.addr());
        } else {
            tracing::debug!(
                "Offline for '{}' (session {}) ignored",
                client.addr(),
                client.session_id()
            );
        }
        let _ = ack.send(removed);
    }

    async fn on_message(&mut self, message: ActorMessage) {
        match message {
            ActorMessage::Command { command, done } => {
                self.execute(command).await;
                let _ = done.send(());
            }
            ActorMessage::Snapshot { reply } => {
                let _ = reply.send(self.registry.snapshot());
            }
        }
    }

    /// Apply one command and write its outcome back to the originating client.
    async fn execute(&mut self, command: Command) {
        let Command { origin, request } = command;
        let kind = request.kind();
        match request.channel() {
            Some(channel) => {
                tracing::debug!("{} {} from '{}'", kind.as_str(), channel, origin.addr())
            }
            None => tracing::debug!("{} from '{}'", kind.as_str(), origin.addr()),
        }

        match self.apply(origin.addr(), request) {
            Ok(Some(response)) => origin.write_response(&response).await,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    "{} from '{}' rejected: {}",
                    kind.as_str(),
                    origin.addr(),
                    e
                );
                origin.write_error(&e).await;
            }
        }
    }

    /// Mutate the registry. `Ok(None)` means the command is answered with silence.
    fn apply(
        &mut self,
        sender: &ClientAddr,
        request: Request,
    ) -> Result<Option<String>, RegistryError> {
        match request {
            Request::Join { channel } => {
                self.registry.join(sender, &channel)?;
                Ok(None)
            }
            Request::Leave { channel } => {
                self.registry.leave(sender, &channel)?;
                Ok(None)
            }
            Request::Create { channel } => {
                let at = self.now();
                match self.registry.create_channel(sender, channel, at) {
                    Ok(()) => Ok(format_listing(self.registry.channel_listing(sender)?)),
                    Err(RegistryError::ChannelExists(_)) => Ok(Some(FALSE_RESPONSE.to_string())),
                    Err(e) => Err(e),
                }
            }
            Request::Send {
                channel,
                content,
                file,
            } => {
                let at = self.now();
                self.registry
                    .post_message(sender, &channel, content, file, at)?;
                Ok(None)
            }
            Request::ListChannels => Ok(format_listing(self.registry.channel_listing(sender)?)),
            Request::ListMessages { channel } => Ok(format_listing(
                self.registry.message_listing(sender, &channel)?,
            )),
            Request::ListUsers { channel } => Ok(format_listing(
                self.registry.member_listing(sender, &channel)?,
            )),
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}
