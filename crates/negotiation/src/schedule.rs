use super::NegotiationError;
use chrono::DateTime;
use chrono::Utc;
use duel_records::*;

/// Wraps a match record with schedule negotiation.
#[derive(Debug)]
pub struct Schedule<'m> {
    record: &'m mut Match,
}

impl<'m> Schedule<'m> {
    pub fn new(record: &'m mut Match) -> Self {
        Self { record }
    }

    /// Offers a time. A newer offer replaces the pending one.
    pub fn propose(&mut self, seat: Seat, time: DateTime<Utc>) -> Result<(), NegotiationError> {
        if self.record.phase() != Phase::Initial {
            return Err(NegotiationError::WrongPhase(
                "a time is already agreed, delete it first",
            ));
        }
        log::debug!("[schedule {}] seat {} proposes {}", self.record.channel(), seat, time);
        self.record.set_schedule(Some(Proposal::new(time, seat)));
        Ok(())
    }

    /// Agrees to the pending offer. Only the counterpart of the proposer
    /// may agree unless an admin forces it.
    pub fn confirm(&mut self, seat: Seat, forced: bool) -> Result<DateTime<Utc>, NegotiationError> {
        if self.record.phase() != Phase::Initial {
            return Err(NegotiationError::WrongPhase("a time is already agreed"));
        }
        let proposal = *self
            .record
            .schedule()
            .ok_or(NegotiationError::WrongPhase("nobody has proposed a time yet"))?;
        if !forced && proposal.counterpart() != seat {
            return Err(NegotiationError::NotYourTurn);
        }
        self.record.set_phase(Phase::Scheduled);
        Ok(proposal.time)
    }

    /// Drops an agreed time and reopens negotiation.
    pub fn delete(&mut self, seat: Seat) -> Result<(), NegotiationError> {
        match self.record.phase() {
            Phase::Initial => Err(NegotiationError::WrongPhase("no time has been agreed yet")),
            Phase::Scheduled | Phase::CastAssignmentOpen => {
                log::debug!("[schedule {}] seat {} deletes the time", self.record.channel(), seat);
                self.record.set_schedule(None);
                self.record.set_phase(Phase::Initial);
                Ok(())
            }
            _ => Err(NegotiationError::WrongPhase("the draft has already started")),
        }
    }
}
