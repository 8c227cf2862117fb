//! Live per-user flow instances.
//!
//! An instance owns exactly two things: a cursor into its definition's
//! state set and the private context the definition's factory produced
//! for it. The definition itself is shared read-only behind an `Arc`
//! and is never copied per user.

use std::sync::Arc;

use crate::dispatch::Bot;
use crate::message::Message;

use super::definition::FlowDefinition;

/// Result of stepping an instance with one message.
#[derive(Debug)]
pub(crate) enum StepOutcome {
    /// The instance stays active; the cursor may or may not have moved.
    Continue,
    /// The instance advanced toward an unresolvable destination; it is
    /// done and must be removed from the active set.
    Finished,
    /// The state action failed; the instance must not be stepped again.
    Failed(anyhow::Error),
}

/// One user's live run of a flow: a shared read-only reference to the
/// definition plus an exclusively-owned cursor and context.
///
/// Erased over the definition's context type so the registry can hold
/// instances of differently-typed flows in one map.
pub struct FlowInstance {
    inner: Box<dyn ErasedInstance>,
}

impl FlowInstance {
    /// Name of the definition this instance runs.
    pub fn flow_name(&self) -> &str {
        self.inner.flow_name()
    }

    /// Name of the state the cursor currently points at.
    pub fn state_name(&self) -> &str {
        self.inner.state_name()
    }

    pub(crate) fn step(&mut self, bot: &Bot, msg: &Message) -> StepOutcome {
        self.inner.step(bot, msg)
    }
}

/// Activate `definition`: cursor at the initial state, context fresh
/// from the factory.
pub(crate) fn instantiate<C: Send + 'static>(definition: Arc<FlowDefinition<C>>) -> FlowInstance {
    let cursor = definition.initial();
    let context = definition.fresh_context();
    FlowInstance {
        inner: Box::new(Typed {
            definition,
            cursor,
            context,
        }),
    }
}

trait ErasedInstance: Send {
    fn flow_name(&self) -> &str;
    fn state_name(&self) -> &str;
    fn step(&mut self, bot: &Bot, msg: &Message) -> StepOutcome;
}

struct Typed<C> {
    definition: Arc<FlowDefinition<C>>,
    cursor: usize,
    context: C,
}

impl<C: Send + 'static> ErasedInstance for Typed<C> {
    fn flow_name(&self) -> &str {
        self.definition.name()
    }

    fn state_name(&self) -> &str {
        self.definition.state(self.cursor).name()
    }

    fn step(&mut self, bot: &Bot, msg: &Message) -> StepOutcome {
        let state = self.definition.state(self.cursor);
        match state.run(bot, msg, &mut self.context) {
            Ok(false) => StepOutcome::Continue,
            Ok(true) => match state.destination().and_then(|d| self.definition.state_index(d)) {
                Some(next) => {
                    self.cursor = next;
                    StepOutcome::Continue
                }
                None => StepOutcome::Finished,
            },
            Err(err) => StepOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Bot;
    use crate::flow::{FlowBuilder, State};
    use crate::message::Message;
    use crate::presenter::ConsolePresenter;

    fn bot() -> Bot {
        Bot::new(Arc::new(ConsolePresenter))
    }

    fn msg(text: &str) -> Message {
        Message::standard("D1", "U9", text)
    }

    fn two_state_instance() -> FlowInstance {
        let def = FlowBuilder::new("pair")
            .add_states([
                State::new("a", |_, m: &Message, _| Ok(m.text == "go")).to("b"),
                State::new("b", |_, _, _| Ok(true)).to("nowhere"),
            ])
            .build("a")
            .unwrap();
        instantiate(Arc::new(def))
    }

    #[test]
    fn test_step_stays_when_action_declines() {
        let mut instance = two_state_instance();
        assert!(matches!(
            instance.step(&bot(), &msg("wait")),
            StepOutcome::Continue
        ));
        assert_eq!(instance.state_name(), "a");
    }

    #[test]
    fn test_step_advances_to_named_destination() {
        let mut instance = two_state_instance();
        assert!(matches!(
            instance.step(&bot(), &msg("go")),
            StepOutcome::Continue
        ));
        assert_eq!(instance.state_name(), "b");
    }

    #[test]
    fn test_step_finishes_on_unresolvable_destination() {
        let mut instance = two_state_instance();
        instance.step(&bot(), &msg("go"));
        assert!(matches!(
            instance.step(&bot(), &msg("anything")),
            StepOutcome::Finished
        ));
    }

    #[test]
    fn test_step_finishes_on_terminal_state() {
        let def = FlowBuilder::new("oneshot")
            .add_state(State::new("only", |_, _, _| Ok(true)))
            .build("only")
            .unwrap();
        let mut instance = instantiate(Arc::new(def));
        assert!(matches!(
            instance.step(&bot(), &msg("x")),
            StepOutcome::Finished
        ));
    }

    #[test]
    fn test_step_reports_action_failure() {
        let def = FlowBuilder::new("broken")
            .add_state(State::new("boom", |_, _, _| {
                Err(anyhow::anyhow!("backend unavailable"))
            }))
            .build("boom")
            .unwrap();
        let mut instance = instantiate(Arc::new(def));
        match instance.step(&bot(), &msg("x")) {
            StepOutcome::Failed(err) => {
                assert!(err.to_string().contains("backend unavailable"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_context_accumulates_across_steps() {
        let def = FlowBuilder::with_context("collect", Vec::<String>::new)
            .add_state(
                State::new("gather", |_, m: &Message, ctx: &mut Vec<String>| {
                    ctx.push(m.text.clone());
                    Ok(ctx.len() >= 2)
                })
                .to("gather"),
            )
            .build("gather")
            .unwrap();
        let mut instance = instantiate(Arc::new(def));
        instance.step(&bot(), &msg("one"));
        instance.step(&bot(), &msg("two"));
        assert_eq!(instance.state_name(), "gather");
    }
}
