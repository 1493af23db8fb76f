//! Tournament match coordinator for head-to-head chat-hosted matches.
//!
//! This facade crate re-exports all public duelbot crates for convenient access.
//!
//! ## Crate Organization
//!
//! ### Core Types
//! - [`core`] — Type aliases, constants, and identity types
//! - [`pg`] — PostgreSQL connectivity and schema metadata
//! - [`records`] — The match record and its value types
//!
//! ### Domain Logic
//! - [`draft`] — Ban, pick and veto rounds over item pools
//! - [`negotiation`] — Schedule agreement and caster approval
//! - [`bracket`] — Participant names from the bracket provider
//!
//! ### Application
//! - [`matchroom`] — Match state machine, commands and storage
//! - [`hosting`] — Per-channel desk, sweeper and HTTP surface

pub use duel_bracket     as bracket;
pub use duel_core        as core;
pub use duel_draft       as draft;
pub use duel_hosting     as hosting;
pub use duel_matchroom   as matchroom;
pub use duel_negotiation as negotiation;
pub use duel_pg          as pg;
pub use duel_records     as records;
