//! Hosting for duelbot.
//!
//! ## Runtime
//!
//! - [`Settings`] — Configuration read once from the environment
//! - [`Store`] — Postgres or in-memory storage behind one type
//! - [`Desk`] — Serializes commands per channel and delivers their output
//! - [`Outbox`] — Buffers outgoing chat messages until they are collected
//! - [`sweep()`] — Spawns the task that advances matches whose time has come
//!
//! ## HTTP
//!
//! - [`run()`] — Serves the chat bridge on `BIND_ADDR`
//! - [`routes()`] — Route table, shared with tests
//! - [`handlers`] — Route handlers
mod desk;
mod outbox;
mod server;
mod settings;
mod store;
mod sweeper;

pub mod handlers;

pub use desk::*;
pub use outbox::*;
pub use server::*;
pub use settings::*;
pub use store::*;
pub use sweeper::*;
