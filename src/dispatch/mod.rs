//! Message dispatch: the control loop, the handle user callbacks see,
//! and the pattern-matched fallback table.
//!
//! ```text
//! Transport events ──► Dispatcher::run
//!                          │ intake filter
//!                          ▼
//!                  active flow for author? ──yes──► step instance
//!                          │ no
//!                          ▼
//!                  definition accepts?     ──yes──► activate + step
//!                          │ no
//!                          ▼
//!                  ActionTable (first pattern wins, else default)
//! ```

mod actions;
mod bot;
mod dispatcher;

pub use actions::{ActionTable, DefaultHandler, Handler};
pub use bot::Bot;
pub use dispatcher::Dispatcher;
