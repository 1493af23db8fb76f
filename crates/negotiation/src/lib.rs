//! Negotiation sub-protocols that run before the draft.
//!
//! - [`Schedule`] — one racer proposes a time, the other confirms it
//! - [`Casters`] — a volunteer asks to cast, both racers approve
//! - [`parse_time()`] — reads a time typed into chat, in the writer's time zone
//! - [`parse_zone()`] — reads an IANA time zone name
mod casters;
mod error;
mod schedule;
mod time;

pub use casters::*;
pub use error::*;
pub use schedule::*;
pub use time::*;
