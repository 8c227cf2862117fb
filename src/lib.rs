//! Flow-based conversational bot engine.
//!
//! `flowbot` lets a program carry on stateful, multi-turn conversations
//! with individual users of a chat service while also handling one-shot
//! pattern-matched commands.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Dispatcher                             │
//! │                                                                  │
//! │  Transport ──► intake filter ──► active FlowInstance? ──► step   │
//! │   events                │                                        │
//! │                         ├──► FlowDefinition triggers ──► start   │
//! │                         │                                        │
//! │                         └──► ActionTable patterns ──► handler    │
//! │                                                                  │
//! │  replies flow back out through the Presenter                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`FlowDefinition`] describes a dialogue as named states, each with
//! an action and a named successor. Definitions are built once and
//! shared; each user gets a private [`flow::FlowInstance`] with its own
//! cursor and context. Messages nobody's flow claims fall through to an
//! ordered pattern table.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use flowbot::{BotConfig, ConsolePresenter, Dispatcher, FlowBuilder, ReplTransport, State};
//!
//! #[tokio::main]
//! async fn main() -> flowbot::Result<()> {
//!     let mut dispatcher = Dispatcher::new(BotConfig::default(), Arc::new(ConsolePresenter));
//!
//!     let greet = FlowBuilder::new("greet")
//!         .add_state(State::new("hello", |bot, msg, _ctx: &mut ()| {
//!             bot.say(&msg.channel, "hi there");
//!             Ok(true)
//!         }))
//!         .triggered_by(|_, msg| msg.text == "hello")
//!         .build("hello")?;
//!     dispatcher.register_flow(greet)?;
//!
//!     dispatcher.respond_to(r"^ping$", |bot, msg, _captures| {
//!         bot.say(&msg.channel, "pong");
//!         Ok(())
//!     })?;
//!     dispatcher.set_default_handler(|bot, msg| {
//!         bot.say(&msg.channel, "say \"hello\" or \"ping\"");
//!         Ok(())
//!     });
//!
//!     let mut transport = ReplTransport::stdin();
//!     dispatcher.run_transport(&mut transport).await
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod flow;
pub mod message;
pub mod presenter;
pub mod transport;

pub use config::BotConfig;
pub use dispatch::{ActionTable, Bot, Dispatcher};
pub use error::{BuildError, ConfigError, Error, PatternError, RegistryError, Result};
pub use filter::{DirectMessage, Filter, SingleUser};
pub use flow::{FlowBuilder, FlowDefinition, FlowInstance, State};
pub use message::{BotIdentity, ChannelId, Message, MessageKind, UserId};
pub use presenter::{ChannelPresenter, ConsolePresenter, Outbound, Presenter};
pub use transport::{Event, EventStream, ReplTransport, Transport, TransportError};
