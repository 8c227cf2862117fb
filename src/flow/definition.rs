//! Immutable flow definitions and their builder.

use crate::dispatch::Bot;
use crate::error::BuildError;
use crate::filter::{AcceptAll, BoxedFilter, Filter};
use crate::message::Message;

use super::state::State;

/// Predicate deciding whether a flow may begin for a given message.
/// Evaluated only after the flow's filter has accepted the message.
pub type Trigger = Box<dyn Fn(&Bot, &Message) -> bool + Send + Sync>;

/// An immutable description of a multi-turn dialogue: named states, an
/// initial state, an activation filter and trigger, and a factory
/// producing each instance's private context.
///
/// Built once at startup via [`FlowBuilder`] and never mutated
/// afterwards, so it is safe to share read-only across any number of
/// live instances.
pub struct FlowDefinition<C> {
    name: String,
    states: Vec<State<C>>,
    initial: usize,
    trigger: Trigger,
    filter: BoxedFilter,
    factory: Box<dyn Fn() -> C + Send + Sync>,
}

impl<C> std::fmt::Debug for FlowDefinition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowDefinition")
            .field("name", &self.name)
            .field("states", &self.states.len())
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

impl<C> FlowDefinition<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn initial(&self) -> usize {
        self.initial
    }

    pub(crate) fn state(&self, index: usize) -> &State<C> {
        &self.states[index]
    }

    pub(crate) fn state_index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name() == name)
    }

    /// Whether both the filter and the trigger accept `msg`.
    pub(crate) fn accepts(&self, bot: &Bot, msg: &Message) -> bool {
        self.filter.accepts(msg) && (self.trigger)(bot, msg)
    }

    /// A freshly owned context for a new instance.
    pub(crate) fn fresh_context(&self) -> C {
        (self.factory)()
    }
}

/// Builder for [`FlowDefinition`].
///
/// Fluent until [`build`](FlowBuilder::build) finalizes the definition
/// against its initial-state name.
pub struct FlowBuilder<C> {
    name: String,
    states: Vec<State<C>>,
    trigger: Option<Trigger>,
    filter: Option<BoxedFilter>,
    factory: Box<dyn Fn() -> C + Send + Sync>,
}

impl FlowBuilder<()> {
    /// Start a flow whose instances carry no context.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_context(name, || ())
    }
}

impl<C> FlowBuilder<C> {
    /// Start a flow whose instances each own a context produced by
    /// `factory` at activation time. The factory and every state action
    /// agree on the context type by construction.
    pub fn with_context(
        name: impl Into<String>,
        factory: impl Fn() -> C + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            trigger: None,
            filter: None,
            factory: Box::new(factory),
        }
    }

    /// Add a state. Re-adding an already-used name is a no-op: the
    /// first registration wins.
    pub fn add_state(mut self, state: State<C>) -> Self {
        if !self.states.iter().any(|s| s.name() == state.name()) {
            self.states.push(state);
        }
        self
    }

    /// Add several states at once.
    pub fn add_states(mut self, states: impl IntoIterator<Item = State<C>>) -> Self {
        for state in states {
            self = self.add_state(state);
        }
        self
    }

    /// Set the activation trigger. Unset means the flow activates on
    /// any message its filter accepts.
    pub fn triggered_by(
        mut self,
        trigger: impl Fn(&Bot, &Message) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.trigger = Some(Box::new(trigger));
        self
    }

    /// Set the activation filter. Unset means every message is
    /// considered.
    pub fn filtered_by(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Finalize the definition. Fails iff `initial` names no added
    /// state.
    pub fn build(self, initial: &str) -> Result<FlowDefinition<C>, BuildError> {
        let Some(index) = self.states.iter().position(|s| s.name() == initial) else {
            return Err(BuildError::UnknownInitialState {
                flow: self.name,
                state: initial.to_string(),
            });
        };
        Ok(FlowDefinition {
            name: self.name,
            states: self.states,
            initial: index,
            trigger: self.trigger.unwrap_or_else(|| Box::new(|_, _| true)),
            filter: self.filter.unwrap_or_else(|| Box::new(AcceptAll)),
            factory: self.factory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> State<()> {
        State::new("start", |_, _, _| Ok(false))
    }

    #[test]
    fn test_build_fails_on_unknown_initial_state() {
        let err = FlowBuilder::new("signup")
            .add_state(noop())
            .build("missing")
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::UnknownInitialState { flow, state }
                if flow == "signup" && state == "missing"
        ));
    }

    #[test]
    fn test_build_fails_on_empty_definition() {
        assert!(FlowBuilder::new("empty").build("start").is_err());
    }

    #[test]
    fn test_build_succeeds_when_initial_exists() {
        let def = FlowBuilder::new("signup").add_state(noop()).build("start");
        assert_eq!(def.unwrap().name(), "signup");
    }

    #[test]
    fn test_duplicate_state_name_is_noop_first_wins() {
        let def = FlowBuilder::new("dup")
            .add_state(State::new("a", |_, _, _| Ok(false)).to("first"))
            .add_state(State::new("a", |_, _, _| Ok(false)).to("second"))
            .build("a")
            .unwrap();
        assert_eq!(def.state(0).destination(), Some("first"));
        assert_eq!(def.states.len(), 1);
    }

    #[test]
    fn test_state_lookup_by_name() {
        let def = FlowBuilder::new("lookup")
            .add_states([
                State::new("a", |_, _, _| Ok(true)).to("b"),
                State::new("b", |_, _, _| Ok(false)),
            ])
            .build("a")
            .unwrap();
        assert_eq!(def.state_index("a"), Some(0));
        assert_eq!(def.state_index("b"), Some(1));
        assert_eq!(def.state_index("c"), None);
        assert_eq!(def.initial(), 0);
    }

    #[test]
    fn test_context_factory_produces_fresh_values() {
        let def = FlowBuilder::with_context("counted", Vec::<String>::new)
            .add_state(State::new("start", |_, _, _| Ok(false)))
            .build("start")
            .unwrap();
        let mut first = def.fresh_context();
        first.push("mutated".to_string());
        let second = def.fresh_context();
        assert!(second.is_empty());
    }
}
