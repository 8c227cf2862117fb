//! Transport seam: where wire events become normalized [`Event`]s.
//!
//! A transport connects to the chat service, announces the bot's own
//! identity, then yields inbound messages one at a time. The dispatcher
//! consumes the stream sequentially; transports own all wire decoding
//! and connectivity concerns.

mod repl;

pub use repl::ReplTransport;

pub use crate::error::TransportError;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::message::{BotIdentity, Message};

/// A normalized transport event.
#[derive(Debug)]
pub enum Event {
    /// One-time announcement of the bot's own identity, delivered
    /// before any message events.
    Connected(BotIdentity),
    /// An inbound message.
    Message(Message),
    /// The connection dropped; the transport may recover on its own.
    Disconnected { reason: String },
    /// A transport failure. Fatal errors end the run loop; transient
    /// ones are logged and skipped.
    Error(TransportError),
}

/// Sequential stream of transport events.
pub type EventStream = Pin<Box<dyn Stream<Item = Event> + Send>>;

/// Connects to a chat service and produces the event stream the
/// dispatcher runs on.
#[async_trait]
pub trait Transport: Send {
    /// Establish the connection and return the event stream.
    async fn connect(&mut self) -> Result<EventStream, TransportError>;
}
