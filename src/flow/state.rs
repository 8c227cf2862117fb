//! Single steps of a flow.

use std::fmt;

use crate::dispatch::Bot;
use crate::message::Message;

/// Callback invoked when a message reaches a state.
///
/// Receives the bot handle, the message, and the instance's private
/// context. Return `Ok(true)` to advance to the state's destination,
/// `Ok(false)` to stay put and wait for the next message. An `Err`
/// finishes the instance; see the dispatcher's failure containment.
pub type StateAction<C> =
    Box<dyn Fn(&Bot, &Message, &mut C) -> anyhow::Result<bool> + Send + Sync>;

/// One step of a flow: an action plus an optional named successor.
pub struct State<C> {
    name: String,
    action: StateAction<C>,
    destination: Option<String>,
}

impl<C> State<C> {
    /// Create a state with no destination: advancing out of it finishes
    /// the flow.
    pub fn new(
        name: impl Into<String>,
        action: impl Fn(&Bot, &Message, &mut C) -> anyhow::Result<bool> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            action: Box::new(action),
            destination: None,
        }
    }

    /// Name the state to transition to when the action advances. A name
    /// that resolves to no state in the owning definition also finishes
    /// the flow.
    pub fn to(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub(crate) fn run(&self, bot: &Bot, msg: &Message, ctx: &mut C) -> anyhow::Result<bool> {
        (self.action)(bot, msg, ctx)
    }
}

impl<C> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}
