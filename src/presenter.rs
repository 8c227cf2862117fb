//! Outbound reply seam.
//!
//! The engine never talks to the chat service directly; state actions
//! and command handlers emit replies through a [`Presenter`]. Rendering
//! beyond plain text (buttons, menus, attachments) belongs to the
//! embedding program's presenter implementation.

use tokio::sync::mpsc;

use crate::message::ChannelId;

/// Sink for outbound replies.
pub trait Presenter: Send + Sync {
    /// Send a plain text message to a channel.
    fn send_message(&self, channel: &ChannelId, text: &str);
}

/// Prints replies to stdout as `< text`, the counterpart of the REPL
/// transport's `> ` prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn send_message(&self, _channel: &ChannelId, text: &str) {
        println!("< {text}");
    }
}

/// An outbound reply queued for delivery by a transport task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub channel: ChannelId,
    pub text: String,
}

/// Forwards replies into an unbounded channel so a transport task can
/// deliver them over the wire without blocking the dispatch loop.
pub struct ChannelPresenter {
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ChannelPresenter {
    /// Create a presenter together with the receiving end a transport
    /// task drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Presenter for ChannelPresenter {
    fn send_message(&self, channel: &ChannelId, text: &str) {
        let outbound = Outbound {
            channel: channel.clone(),
            text: text.to_string(),
        };
        if self.sender.send(outbound).is_err() {
            tracing::warn!(channel = %channel, "Dropping reply: outbound receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_presenter_queues_replies_in_order() {
        let (presenter, mut outbound) = ChannelPresenter::new();
        let channel = ChannelId::new("D1");
        presenter.send_message(&channel, "first");
        presenter.send_message(&channel, "second");

        assert_eq!(outbound.try_recv().unwrap().text, "first");
        assert_eq!(outbound.try_recv().unwrap().text, "second");
        assert!(outbound.try_recv().is_err());
    }

    #[test]
    fn test_channel_presenter_survives_closed_receiver() {
        let (presenter, outbound) = ChannelPresenter::new();
        drop(outbound);
        // Must not panic.
        presenter.send_message(&ChannelId::new("D1"), "late");
    }
}
