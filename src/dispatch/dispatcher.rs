//! The per-message control loop.

use std::sync::Arc;

use futures::StreamExt;

use crate::config::BotConfig;
use crate::error::{Error, PatternError, RegistryError, Result};
use crate::filter::{BoxedFilter, Filter, SingleUser};
use crate::flow::{FlowDefinition, FlowInstance, FlowRegistry, StepOutcome};
use crate::message::{BotIdentity, Message, UserId};
use crate::presenter::Presenter;
use crate::transport::{Event, EventStream, Transport};

use super::actions::ActionTable;
use super::bot::Bot;

/// The control loop: for every inbound message, decides whether it
/// continues an active conversation, starts a new one, or falls through
/// to pattern-based command matching.
///
/// One dispatcher per running bot; construct several for independent
/// bots. All mutable state lives on the dispatcher itself, not in any
/// process-wide registry. The dispatcher is the sole reader and
/// writer of the active-instance map, so the sequential run loop needs
/// no internal locking.
pub struct Dispatcher {
    bot: Bot,
    config: BotConfig,
    registry: FlowRegistry,
    actions: ActionTable,
    intake: Option<BoxedFilter>,
}

impl Dispatcher {
    /// Create a dispatcher that emits replies through `presenter`.
    pub fn new(config: BotConfig, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            bot: Bot::new(presenter),
            config,
            registry: FlowRegistry::new(),
            actions: ActionTable::new(),
            intake: None,
        }
    }

    /// The handle passed to actions and handlers.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Register a flow definition. Fails if a flow with the same name
    /// already exists; the existing registration is left unchanged.
    pub fn register_flow<C: Send + 'static>(
        &mut self,
        definition: FlowDefinition<C>,
    ) -> std::result::Result<(), RegistryError> {
        self.registry.register(definition)
    }

    /// Append a pattern→handler pair to the fallback table.
    pub fn respond_to(
        &mut self,
        pattern: &str,
        handler: impl Fn(&Bot, &Message, &[String]) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> std::result::Result<(), PatternError> {
        self.actions.respond_to(pattern, handler)
    }

    /// Install the fallback handler for messages no pattern matches.
    pub fn set_default_handler(
        &mut self,
        handler: impl Fn(&Bot, &Message) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.actions.set_default(handler);
    }

    /// Replace the intake filter that would otherwise be built from the
    /// announced identity.
    pub fn set_intake_filter(&mut self, filter: impl Filter + 'static) {
        self.intake = Some(Box::new(filter));
    }

    /// The flow instance currently active for `user`, if any.
    pub fn active_flow(&self, user: &UserId) -> Option<&FlowInstance> {
        self.registry.active(user)
    }

    /// Administrative hook: drop `user`'s active flow, if any, and
    /// report whether one existed.
    ///
    /// The engine never expires instances on its own; an abandoned
    /// dialogue stays active until its own actions finish it or a
    /// caller clears it here.
    pub fn clear_flow(&mut self, user: &UserId) -> bool {
        self.registry.remove_active(user).is_some()
    }

    /// Record the transport's identity announcement. Builds the default
    /// intake gate from the identity unless one was set explicitly or
    /// gating is disabled in the configuration.
    pub fn set_identity(&mut self, mut identity: BotIdentity) {
        if let Some(name) = &self.config.name {
            identity.name = name.clone();
        }
        if self.config.intake_gating && self.intake.is_none() {
            self.intake = Some(Box::new(SingleUser::new(identity.user_id.clone())));
        }
        self.bot.set_identity(identity);
    }

    /// Dispatch one inbound message.
    pub fn handle_message(&mut self, msg: &Message) {
        if let Some(intake) = &self.intake {
            if !intake.accepts(msg) {
                tracing::trace!(user = %msg.author, "Message rejected by intake filter");
                return;
            }
        }

        // An active flow consumes the message outright, even when the
        // step finishes it.
        if self.step_active(msg) {
            return;
        }

        // First registered definition whose filter and trigger accept
        // the message starts a fresh instance for this user.
        if let Some(instance) = self.registry.activate(&self.bot, msg) {
            tracing::debug!(
                user = %msg.author,
                flow = instance.flow_name(),
                "Flow activated"
            );
            self.registry.insert_active(msg.author.clone(), instance);
            self.step_active(msg);
            return;
        }

        self.handle_command(msg);
    }

    /// Step the author's active instance, if one exists. Returns whether
    /// the message was consumed by a flow.
    fn step_active(&mut self, msg: &Message) -> bool {
        let Some(instance) = self.registry.active_mut(&msg.author) else {
            return false;
        };
        let outcome = instance.step(&self.bot, msg);
        match outcome {
            StepOutcome::Continue => {}
            StepOutcome::Finished => {
                if let Some(finished) = self.registry.remove_active(&msg.author) {
                    tracing::debug!(
                        user = %msg.author,
                        flow = finished.flow_name(),
                        "Flow finished"
                    );
                }
            }
            StepOutcome::Failed(err) => {
                if let Some(failed) = self.registry.remove_active(&msg.author) {
                    tracing::warn!(
                        user = %msg.author,
                        flow = failed.flow_name(),
                        error = %err,
                        "State action failed; flow removed"
                    );
                }
            }
        }
        true
    }

    /// Fall through to the pattern table: strip the bot's own mention
    /// and surrounding whitespace, then let the first matching pattern
    /// handle the text.
    fn handle_command(&self, msg: &Message) {
        let text = match self.bot.user_id() {
            Some(id) => msg.strip_mention(id),
            None => msg.text.trim(),
        };
        if let Err(err) = self.actions.dispatch(&self.bot, msg, text) {
            tracing::warn!(user = %msg.author, error = %err, "Command handler failed");
        }
    }

    /// Drive the dispatcher from a transport event stream until the
    /// stream ends or a fatal transport error occurs. Transient
    /// transport errors are logged and skipped.
    pub async fn run(&mut self, mut events: EventStream) -> Result<()> {
        while let Some(event) = events.next().await {
            match event {
                Event::Connected(identity) => {
                    tracing::info!(
                        user_id = %identity.user_id,
                        name = %identity.name,
                        "Bot is online"
                    );
                    self.set_identity(identity);
                }
                Event::Message(msg) => {
                    tracing::trace!(
                        user = %msg.author,
                        channel = %msg.channel,
                        "Inbound message"
                    );
                    self.handle_message(&msg);
                }
                Event::Disconnected { reason } => {
                    tracing::warn!(reason = %reason, "Transport disconnected");
                }
                Event::Error(err) if err.is_fatal() => {
                    tracing::error!(error = %err, "Fatal transport error; ending run loop");
                    return Err(Error::Transport(err));
                }
                Event::Error(err) => {
                    tracing::warn!(error = %err, "Transient transport error");
                }
            }
        }
        Ok(())
    }

    /// Connect `transport` and run until its event stream ends.
    pub async fn run_transport<T: Transport>(&mut self, transport: &mut T) -> Result<()> {
        let events = transport.connect().await.map_err(Error::Transport)?;
        self.run(events).await
    }
}
