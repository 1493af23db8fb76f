use super::Seat;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

/// A match time and the seat that put it forward.
///
/// While the match is `Initial` this is a pending offer awaiting the
/// counterpart; from `Scheduled` on it is the agreed start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub time: DateTime<Utc>,
    pub proposer: Seat,
}

impl Proposal {
    pub fn new(time: DateTime<Utc>, proposer: Seat) -> Self {
        Self { time, proposer }
    }
    /// The seat whose agreement is still needed.
    pub fn counterpart(&self) -> Seat {
        self.proposer.other()
    }
}
