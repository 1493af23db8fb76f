//! Draft engine.
//!
//! Both item kinds are drafted by the same algorithm, one after the other:
//!
//! 1. **Bans** — seats alternate, each discarding as many items as the
//!    tournament allows.
//! 2. **Picks** — seats alternate strictly, one item at a time, until
//!    `best_of` items are chosen.
//! 3. **Veto window** — the seat that did not make the last pick speaks
//!    first. A veto discards the last pick and hands the re-pick to the
//!    vetoer, after which the window opens again. Two declines accept.
//!
//! Characters open with seat 1, builds with seat 2.
mod draft;
mod error;

pub use draft::*;
pub use error::*;
