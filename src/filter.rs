//! Message filters.
//!
//! Filters are pure predicates over inbound messages. They gate both
//! top-level intake (only messages meant for the bot are processed at
//! all) and the activation of individual flows.

use crate::message::{Message, MessageKind, UserId};

/// A pure predicate over an inbound message.
///
/// Implemented for any `Fn(&Message) -> bool`, so ad-hoc filters are
/// just closures; [`and`](Filter::and) and [`or`](Filter::or) compose
/// them.
pub trait Filter: Send + Sync {
    /// Whether the filter lets `msg` through.
    fn accepts(&self, msg: &Message) -> bool;

    /// Compose with another filter; the result accepts iff both accept.
    fn and<F>(self, other: F) -> And<Self, F>
    where
        Self: Sized,
        F: Filter,
    {
        And(self, other)
    }

    /// Compose with another filter; the result accepts iff either accepts.
    fn or<F>(self, other: F) -> Or<Self, F>
    where
        Self: Sized,
        F: Filter,
    {
        Or(self, other)
    }
}

/// Boxed filter, for storage in type-erased containers.
pub type BoxedFilter = Box<dyn Filter>;

impl<F> Filter for F
where
    F: Fn(&Message) -> bool + Send + Sync,
{
    fn accepts(&self, msg: &Message) -> bool {
        self(msg)
    }
}

impl Filter for Box<dyn Filter> {
    fn accepts(&self, msg: &Message) -> bool {
        (**self).accepts(msg)
    }
}

/// Conjunction of two filters.
pub struct And<A, B>(A, B);

impl<A: Filter, B: Filter> Filter for And<A, B> {
    fn accepts(&self, msg: &Message) -> bool {
        self.0.accepts(msg) && self.1.accepts(msg)
    }
}

/// Disjunction of two filters.
pub struct Or<A, B>(A, B);

impl<A: Filter, B: Filter> Filter for Or<A, B> {
    fn accepts(&self, msg: &Message) -> bool {
        self.0.accepts(msg) || self.1.accepts(msg)
    }
}

/// Accepts every message. The default for flows that set no filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Filter for AcceptAll {
    fn accepts(&self, _msg: &Message) -> bool {
        true
    }
}

/// Accepts plain user messages in direct (one-to-one) conversations.
///
/// Deletion notices and messages from bot integrations are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectMessage;

impl Filter for DirectMessage {
    fn accepts(&self, msg: &Message) -> bool {
        msg.kind == MessageKind::Standard && msg.channel.is_direct()
    }
}

/// Accepts messages addressed to one specific user: sent by someone
/// else, and either opening with a mention of that user or arriving in
/// a direct conversation.
///
/// Built from the announced identity, this is the dispatcher's default
/// intake gate.
#[derive(Debug, Clone)]
pub struct SingleUser {
    id: UserId,
}

impl SingleUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self { id: id.into() }
    }
}

impl Filter for SingleUser {
    fn accepts(&self, msg: &Message) -> bool {
        msg.author != self.id && (msg.mentions(&self.id) || msg.channel.is_direct())
    }
}
