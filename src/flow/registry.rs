//! Registered definitions and active per-user instances.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dispatch::Bot;
use crate::error::RegistryError;
use crate::message::{Message, UserId};

use super::definition::FlowDefinition;
use super::instance::{self, FlowInstance};

/// A registered, type-erased flow definition.
trait ErasedDefinition: Send + Sync {
    fn name(&self) -> &str;
    fn accepts(&self, bot: &Bot, msg: &Message) -> bool;
    fn instantiate(&self) -> FlowInstance;
}

impl<C: Send + 'static> ErasedDefinition for Arc<FlowDefinition<C>> {
    fn name(&self) -> &str {
        FlowDefinition::name(self)
    }

    fn accepts(&self, bot: &Bot, msg: &Message) -> bool {
        FlowDefinition::accepts(self, bot, msg)
    }

    fn instantiate(&self) -> FlowInstance {
        instance::instantiate(Arc::clone(self))
    }
}

/// Holds every registered flow definition, in registration order, and
/// the mapping from user identity to their single active instance.
///
/// Registration order doubles as trigger-evaluation precedence, so
/// which flow wins when several would accept the same message is
/// deterministic and testable.
pub struct FlowRegistry {
    definitions: Vec<Box<dyn ErasedDefinition>>,
    active: HashMap<UserId, FlowInstance>,
}

impl FlowRegistry {
    pub(crate) fn new() -> Self {
        Self {
            definitions: Vec::new(),
            active: HashMap::new(),
        }
    }

    /// Register a definition. Fails if the name is already taken; the
    /// original registration is left unchanged.
    pub(crate) fn register<C: Send + 'static>(
        &mut self,
        definition: FlowDefinition<C>,
    ) -> Result<(), RegistryError> {
        if self.definitions.iter().any(|d| d.name() == definition.name()) {
            return Err(RegistryError::DuplicateFlow {
                name: definition.name().to_string(),
            });
        }
        self.definitions.push(Box::new(Arc::new(definition)));
        Ok(())
    }

    /// Instantiate the first registered definition whose filter and
    /// trigger both accept `msg`, if any.
    pub(crate) fn activate(&self, bot: &Bot, msg: &Message) -> Option<FlowInstance> {
        self.definitions
            .iter()
            .find(|d| d.accepts(bot, msg))
            .map(|d| d.instantiate())
    }

    pub(crate) fn active_mut(&mut self, user: &UserId) -> Option<&mut FlowInstance> {
        self.active.get_mut(user)
    }

    pub(crate) fn insert_active(&mut self, user: UserId, instance: FlowInstance) {
        self.active.insert(user, instance);
    }

    pub(crate) fn remove_active(&mut self, user: &UserId) -> Option<FlowInstance> {
        self.active.remove(user)
    }

    /// The instance currently active for `user`, if any.
    pub(crate) fn active(&self, user: &UserId) -> Option<&FlowInstance> {
        self.active.get(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FlowBuilder, State};
    use crate::presenter::ConsolePresenter;

    fn bot() -> Bot {
        Bot::new(Arc::new(ConsolePresenter))
    }

    fn trigger_on(word: &'static str) -> FlowDefinition<()> {
        FlowBuilder::new(word)
            .add_state(State::new("start", |_, _, _| Ok(false)))
            .triggered_by(move |_, msg| msg.text == word)
            .build("start")
            .unwrap()
    }

    #[test]
    fn test_duplicate_registration_fails_and_keeps_original() {
        let mut registry = FlowRegistry::new();
        registry.register(trigger_on("start")).unwrap();

        let err = registry.register(trigger_on("start")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateFlow { name } if name == "start"));
        assert_eq!(registry.definitions.len(), 1);
    }

    #[test]
    fn test_activation_respects_registration_order() {
        let mut registry = FlowRegistry::new();
        let first = FlowBuilder::new("first")
            .add_state(State::new("start", |_, _, _| Ok(false)))
            .build("start")
            .unwrap();
        let second = FlowBuilder::new("second")
            .add_state(State::new("start", |_, _, _| Ok(false)))
            .build("start")
            .unwrap();
        registry.register(first).unwrap();
        registry.register(second).unwrap();

        // Both accept everything; the first registered wins.
        let msg = Message::standard("D1", "U9", "hi");
        let instance = registry.activate(&bot(), &msg).unwrap();
        assert_eq!(instance.flow_name(), "first");
    }

    #[test]
    fn test_activation_skips_non_accepting_definitions() {
        let mut registry = FlowRegistry::new();
        registry.register(trigger_on("alpha")).unwrap();
        registry.register(trigger_on("beta")).unwrap();

        let msg = Message::standard("D1", "U9", "beta");
        let instance = registry.activate(&bot(), &msg).unwrap();
        assert_eq!(instance.flow_name(), "beta");

        let msg = Message::standard("D1", "U9", "gamma");
        assert!(registry.activate(&bot(), &msg).is_none());
    }

    #[test]
    fn test_active_instance_bookkeeping() {
        let mut registry = FlowRegistry::new();
        registry.register(trigger_on("start")).unwrap();

        let user = UserId::new("U9");
        let msg = Message::standard("D1", "U9", "start");
        let instance = registry.activate(&bot(), &msg).unwrap();
        registry.insert_active(user.clone(), instance);

        assert_eq!(registry.active(&user).map(FlowInstance::flow_name), Some("start"));
        assert!(registry.active_mut(&user).is_some());
        assert!(registry.remove_active(&user).is_some());
        assert!(registry.active(&user).is_none());
        assert!(registry.remove_active(&user).is_none());
    }
}
