//! Match state machine for duelbot.
//!
//! Every chat command runs through [`Machine::run`]:
//!
//! 1. Load the [`Match`](duel_records::Match) for the channel (never cached)
//! 2. Resolve the acting seat from the [`Actor`]
//! 3. Apply one [`Action`] through the draft engine or a negotiation protocol
//! 4. Commit the whole record against the revision it was loaded at
//! 5. Return the [`Event`]s to render
//!
//! A commit that loses a race is retried from step 1, so two
//! conflicting commands can never both pass their preconditions.
//!
//! ## Collaborators
//!
//! - [`MatchRepository`] — storage, with a Postgres and an in-memory impl
//! - [`Transport`] — fire-and-forget chat delivery
//!
//! ## Command Surface
//!
//! - [`Command`] — the static registry of chat commands and their aliases
mod action;
mod command;
mod error;
mod event;
mod machine;
mod memory;
mod repository;
mod transport;

pub use action::*;
pub use command::*;
pub use error::*;
pub use event::*;
pub use machine::*;
pub use memory::*;
pub use repository::*;
pub use transport::*;
