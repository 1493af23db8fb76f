//! Match record aggregate.
//!
//! One [`Match`] exists per match channel. It is the single persisted
//! source of truth for a head-to-head match: who is playing, which phase
//! the match is in, whose turn it is, and what has been drafted so far.
//! The crate holds data and invariants only; transitions live in
//! `duel-draft`, `duel-negotiation`, and `duel-matchroom`.
//!
//! ## Core Types
//!
//! - [`Match`] — The aggregate root, keyed by channel
//! - [`Phase`] — Position in the match state machine
//! - [`Seat`] — Participant slot (1 or 2)
//! - [`Kind`] — Draftable pool (characters, builds)
//! - [`Pool`] — Remaining / chosen / discarded items of one kind
//! - [`Racer`] — A participant as seen by the match
//! - [`Rules`] — Tournament configuration a match is opened with
//! - [`Proposal`] — Pending or confirmed schedule
//! - [`Casting`] — Volunteered caster and approvals
//! - [`Preference`] — Standing caster approval preference of a user
mod casting;
mod kind;
mod phase;
mod pool;
mod proposal;
mod racer;
mod record;
mod rules;
mod seat;

pub use casting::*;
pub use kind::*;
pub use phase::*;
pub use pool::*;
pub use proposal::*;
pub use racer::*;
pub use record::*;
pub use rules::*;
pub use seat::*;
