//! The flow engine: multi-turn, per-user dialogue state machines.
//!
//! A [`FlowDefinition`] is an immutable graph of named [`State`]s built
//! once at startup. Each user gets their own [`FlowInstance`] (a cursor
//! plus a private context), created lazily when a message satisfies the
//! definition's filter and trigger.
//!
//! ```text
//! FlowBuilder::new("signup")         FlowDefinition (immutable, Arc-shared)
//!     .add_state(..)        ──►      ┌────────────────────────────────┐
//!     .triggered_by(..)              │ states · trigger · filter ·    │
//!     .build("ask-name")             │ context factory                │
//!                                    └───────────────┬────────────────┘
//!                                                    │ instantiate (per user)
//!                                    ┌───────────────▼────────────────┐
//!                                    │ FlowInstance: cursor + context │
//!                                    └────────────────────────────────┘
//! ```
//!
//! Definitions are generic over their context type; the dispatcher's
//! registry holds them erased, so dialogues with different context types
//! live side by side. The erasure happens only after the builder has
//! tied the context factory and every state action to the same type, so
//! no runtime downcasting exists anywhere.

mod definition;
mod instance;
mod registry;
mod state;

pub use definition::{FlowBuilder, FlowDefinition, Trigger};
pub use instance::FlowInstance;
pub use state::{State, StateAction};

pub(crate) use instance::StepOutcome;
pub(crate) use registry::FlowRegistry;
