//! Normalized message model.
//!
//! Transports decode wire events into [`Message`] values before anything
//! else sees them; filters, flows, and command handlers never touch raw
//! wire payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a user on the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The mention syntax for this user, as it appears in message text.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity of a conversation channel.
///
/// Direct (one-to-one) conversations use designators starting with `D`,
/// following the wire convention of the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this designator denotes a direct (one-to-one) conversation.
    pub fn is_direct(&self) -> bool {
        self.0.starts_with('D')
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of an inbound message, normalized from the wire type/subtype pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A plain user message.
    Standard,
    /// A deletion notice for an earlier message.
    Deleted,
    /// A message authored by a bot integration.
    Bot,
    /// Any other wire type or subtype, carried through unmodified.
    Other(String),
}

impl MessageKind {
    /// Map a wire `type`/`subtype` pair onto a kind.
    pub fn from_wire(ty: &str, subtype: Option<&str>) -> Self {
        if ty != "message" {
            return Self::Other(ty.to_string());
        }
        match subtype {
            None | Some("") => Self::Standard,
            Some("message_deleted") => Self::Deleted,
            Some("bot_message") => Self::Bot,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

/// A normalized inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub channel: ChannelId,
    pub author: UserId,
    pub text: String,
}

impl Message {
    /// A plain user message, the common case in tests and transports.
    pub fn standard(
        channel: impl Into<ChannelId>,
        author: impl Into<UserId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Standard,
            channel: channel.into(),
            author: author.into(),
            text: text.into(),
        }
    }

    pub fn is_standard(&self) -> bool {
        self.kind == MessageKind::Standard
    }

    /// Whether the text begins with an explicit mention of `user`.
    pub fn mentions(&self, user: &UserId) -> bool {
        self.text.starts_with(&user.mention())
    }

    /// The text with surrounding whitespace and one leading mention of
    /// `user` removed. Used before command matching so patterns see the
    /// command itself, not the addressing.
    pub fn strip_mention(&self, user: &UserId) -> &str {
        let text = self.text.trim();
        match text.strip_prefix(&user.mention()) {
            Some(rest) => rest.trim_start(),
            None => text,
        }
    }
}

/// The bot's own identity, announced once by the transport before any
/// message events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub user_id: UserId,
    pub name: String,
}
