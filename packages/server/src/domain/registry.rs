//! Registry: オンラインのクライアントとチャンネルの集合
//!
//! サーバーアクターだけが所有・更新します。ロックは持たず、
//! 直列化はアクターのイベントループが保証します。

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use dengon_shared::time::timestamp_to_rfc3339;

use super::{
    entity::{Channel, Message},
    error::RegistryError,
    value_object::{ChannelName, ClientAddr, FilePayload, MessageContent, SessionId, Timestamp},
};

/// The authoritative set of online clients and channels.
#[derive(Debug, Default)]
pub struct Registry {
    /// Online clients, keyed by address. The session id records which
    /// connection owns the address.
    clients: HashMap<ClientAddr, SessionId>,
    channels: BTreeMap<ChannelName, Channel>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an online client. First writer wins: returns `false` and
    /// changes nothing if the address is already online.
    pub fn register(&mut self, addr: ClientAddr, session_id: SessionId) -> bool {
        if self.clients.contains_key(&addr) {
            return false;
        }
        self.clients.insert(addr, session_id);
        true
    }

    /// Remove an online client and drop it from every channel's members.
    ///
    /// Only the session that owns the address can unregister it. Returns
    /// `false` if nothing was removed.
    pub fn unregister(&mut self, addr: &ClientAddr, session_id: SessionId) -> bool {
        match self.clients.get(addr) {
            Some(owner) if *owner == session_id => {}
            _ => return false,
        }
        self.clients.remove(addr);
        for channel in self.channels.values_mut() {
            channel.remove_member(addr);
        }
        true
    }

    pub fn is_registered(&self, addr: &ClientAddr) -> bool {
        self.clients.contains_key(addr)
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn channel(&self, name: &ChannelName) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub fn join(&mut self, sender: &ClientAddr, name: &ChannelName) -> Result<bool, RegistryError> {
        self.ensure_registered(sender)?;
        Ok(self.channel_mut(name)?.add_member(sender.clone()))
    }

    pub fn leave(&mut self, sender: &ClientAddr, name: &ChannelName) -> Result<bool, RegistryError> {
        self.ensure_registered(sender)?;
        Ok(self.channel_mut(name)?.remove_member(sender))
    }

    /// Create a channel. An existing channel is never overwritten.
    pub fn create_channel(
        &mut self,
        sender: &ClientAddr,
        name: ChannelName,
        created_at: Timestamp,
    ) -> Result<(), RegistryError> {
        self.ensure_registered(sender)?;
        if self.channels.contains_key(&name) {
            return Err(RegistryError::ChannelExists(name.into_string()));
        }
        self.channels
            .insert(name.clone(), Channel::new(name, created_at));
        Ok(())
    }

    /// Store a message and return its per-channel sequence number.
    pub fn post_message(
        &mut self,
        sender: &ClientAddr,
        name: &ChannelName,
        content: MessageContent,
        file: FilePayload,
        created_at: Timestamp,
    ) -> Result<u64, RegistryError> {
        self.ensure_registered(sender)?;
        let channel = self.channel_mut(name)?;
        Ok(channel.post(sender.clone(), content, file, created_at))
    }

    /// Channel entries sorted lexicographically. Empty when there are no channels.
    pub fn channel_listing(&self, sender: &ClientAddr) -> Result<Vec<String>, RegistryError> {
        self.ensure_registered(sender)?;
        Ok(sorted(self.channels.values().map(Channel::to_entry)))
    }

    /// Message entries of one channel sorted lexicographically.
    pub fn message_listing(
        &self,
        sender: &ClientAddr,
        name: &ChannelName,
    ) -> Result<Vec<String>, RegistryError> {
        self.ensure_registered(sender)?;
        let channel = self.channel_ref(name)?;
        Ok(sorted(channel.messages().map(Message::to_entry)))
    }

    /// Member addresses of one channel sorted lexicographically.
    pub fn member_listing(
        &self,
        sender: &ClientAddr,
        name: &ChannelName,
    ) -> Result<Vec<String>, RegistryError> {
        self.ensure_registered(sender)?;
        let channel = self.channel_ref(name)?;
        Ok(sorted(channel.members().map(ClientAddr::to_string)))
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut clients: Vec<String> = self.clients.keys().map(ClientAddr::to_string).collect();
        clients.sort();

        let channels = self
            .channels
            .values()
            .map(|channel| ChannelSnapshot {
                name: channel.name.to_string(),
                created_at: timestamp_to_rfc3339(channel.created_at.value()),
                members: channel.members().map(ClientAddr::to_string).collect(),
                messages: channel
                    .messages()
                    .map(|message| MessageSnapshot {
                        seq: message.seq,
                        created_at: timestamp_to_rfc3339(message.created_at.value()),
                        sender: message.sender.to_string(),
                        content: message.content.to_string(),
                        file: message.file.to_string(),
                    })
                    .collect(),
            })
            .collect();

        RegistrySnapshot { clients, channels }
    }

    fn ensure_registered(&self, addr: &ClientAddr) -> Result<(), RegistryError> {
        if self.is_registered(addr) {
            Ok(())
        } else {
            Err(RegistryError::UnknownClient(addr.to_string()))
        }
    }

    fn channel_ref(&self, name: &ChannelName) -> Result<&Channel, RegistryError> {
        self.channels
            .get(name)
            .ok_or_else(|| RegistryError::UnknownChannel(name.to_string()))
    }

    fn channel_mut(&mut self, name: &ChannelName) -> Result<&mut Channel, RegistryError> {
        self.channels
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownChannel(name.to_string()))
    }
}

fn sorted(entries: impl Iterator<Item = String>) -> Vec<String> {
    let mut entries: Vec<String> = entries.collect();
    entries.sort();
    entries
}

/// Point-in-time copy of the registry, for debugging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Online client addresses, sorted
    pub clients: Vec<String>,
    /// Channels sorted by name
    pub channels: Vec<ChannelSnapshot>,
}

impl RegistrySnapshot {
    pub fn channel(&self, name: &str) -> Option<&ChannelSnapshot> {
        self.channels.iter().find(|channel| channel.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub name: String,
    pub created_at: String,
    pub members: Vec<String>,
    pub messages: Vec<MessageSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    pub seq: u64,
    pub created_at: String,
    pub sender: String,
    pub content: String,
    pub file: String,
}
