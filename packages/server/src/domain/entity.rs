//! Entities: channels and their messages.

use std::collections::{BTreeMap, BTreeSet};

use super::value_object::{ChannelName, ClientAddr, FilePayload, MessageContent, Timestamp};

/// A message accepted into a channel. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Per-channel sequence number, assigned in arrival order
    pub seq: u64,
    pub created_at: Timestamp,
    pub sender: ClientAddr,
    pub content: MessageContent,
    pub file: FilePayload,
}

impl Message {
    /// Listing entry: `timestamp,sender,content,file`
    pub fn to_entry(&self) -> String {
        format!(
            "{},{},{},{}",
            self.created_at.to_wire(),
            self.sender,
            self.content,
            self.file
        )
    }
}

/// A named channel with its members and message history.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: ChannelName,
    pub created_at: Timestamp,
    members: BTreeSet<ClientAddr>,
    messages: BTreeMap<u64, Message>,
    next_seq: u64,
}

impl Channel {
    pub fn new(name: ChannelName, created_at: Timestamp) -> Self {
        Self {
            name,
            created_at,
            members: BTreeSet::new(),
            messages: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Listing entry: `timestamp,name,null`
    pub fn to_entry(&self) -> String {
        format!("{},{},null", self.created_at.to_wire(), self.name)
    }

    /// Returns `false` if the client was already a member.
    pub fn add_member(&mut self, addr: ClientAddr) -> bool {
        self.members.insert(addr)
    }

    /// Returns `false` if the client was not a member.
    pub fn remove_member(&mut self, addr: &ClientAddr) -> bool {
        self.members.remove(addr)
    }

    pub fn has_member(&self, addr: &ClientAddr) -> bool {
        self.members.contains(addr)
    }

    pub fn members(&self) -> impl Iterator<Item = &ClientAddr> {
        self.members.iter()
    }

    /// Store a new message under the next sequence number and return that number.
    ///
    /// Identical contents never collide: each post gets its own key.
    pub fn post(
        &mut self,
        sender: ClientAddr,
        content: MessageContent,
        file: FilePayload,
        created_at: Timestamp,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.messages.insert(
            seq,
            Message {
                seq,
                created_at,
                sender,
                content,
                file,
            },
        );
        seq
    }

    /// Messages in sequence order
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
