use super::DraftError;
use duel_core::Count;
use duel_records::*;

/// Outcome of a successful pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picked {
    pub item: String,
    /// Picks still needed for this kind.
    pub remaining: Count,
}

/// Outcome of a successful decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declined {
    /// The other seat still has to answer.
    Waiting,
    /// Both seats declined and this kind is final.
    Accepted(Kind),
}

/// Wraps a match record with the draft operations.
/// Every operation validates fully before it mutates anything.
#[derive(Debug)]
pub struct Draft<'m> {
    record: &'m mut Match,
}

impl<'m> Draft<'m> {
    pub fn new(record: &'m mut Match) -> Self {
        Self { record }
    }

    /// Picks still needed for a kind.
    pub fn picks_remaining(&self, kind: Kind) -> Count {
        let chosen = self.record.pool(kind).chosen().len();
        (self.record.best_of() as usize).saturating_sub(chosen) as Count
    }

    /// Opens the draft of a kind with its ban stage.
    pub fn begin(&mut self, kind: Kind, first: Seat) {
        log::debug!("[draft {}] begin {} with seat {}", self.record.channel(), kind.plural(), first);
        let allowance = self.record.allowance();
        self.record.set_phase(Phase::drafting_of(kind));
        self.record.set_turn(first);
        self.record.set_bans([allowance; 2]);
        self.record.set_votes(0);
    }

    /// Discards `remaining[index]` of the kind being drafted.
    pub fn ban(&mut self, seat: Seat, index: usize) -> Result<String, DraftError> {
        let kind = self.drafting()?;
        if !self.record.banning() {
            return Err(DraftError::WrongPhase("banning is over, pick instead"));
        }
        self.check_turn(seat)?;
        self.check_index(kind, index)?;
        if !self.record.spend_ban(seat) {
            return Err(DraftError::NotYourTurn);
        }
        let item = self
            .record
            .pool_mut(kind)
            .ban(index)
            .ok_or(DraftError::InvalidIndex(index))?;
        self.record.flip();
        Ok(item)
    }

    /// Moves `remaining[index]` of the kind being drafted into its chosen list.
    /// The last pick of a kind opens its veto window.
    pub fn pick(&mut self, seat: Seat, index: usize) -> Result<Picked, DraftError> {
        let kind = self.drafting()?;
        if self.record.banning() {
            return Err(DraftError::WrongPhase("bans are not finished yet"));
        }
        self.check_turn(seat)?;
        self.check_index(kind, index)?;
        let item = self
            .record
            .pool_mut(kind)
            .pick(index)
            .ok_or(DraftError::InvalidIndex(index))?;
        self.record.flip();
        let remaining = self.picks_remaining(kind);
        if remaining == 0 {
            self.record.set_phase(Phase::veto_of(kind));
            self.record.set_votes(0);
        }
        Ok(Picked { item, remaining })
    }

    /// Discards the last pick of the kind in its veto window and
    /// hands the re-pick to the vetoer.
    pub fn veto(&mut self, seat: Seat) -> Result<String, DraftError> {
        let kind = self.vetoing()?;
        self.check_turn(seat)?;
        if self.record.vetos(seat) == 0 {
            return Err(DraftError::NoVetosRemaining);
        }
        if self.record.pool(kind).chosen().is_empty() {
            return Err(DraftError::WrongPhase("there is nothing to veto"));
        }
        self.record.spend_veto(seat);
        let item = self
            .record
            .pool_mut(kind)
            .unpick()
            .ok_or(DraftError::WrongPhase("there is nothing to veto"))?;
        // The other seat gets no say once a veto lands.
        self.record.set_votes(2);
        self.record.set_turn(seat);
        self.record.set_phase(Phase::drafting_of(kind));
        Ok(item)
    }

    /// Passes on the veto. The second decline accepts the kind.
    pub fn decline(&mut self, seat: Seat) -> Result<Declined, DraftError> {
        self.vetoing()?;
        self.check_turn(seat)?;
        let votes = self.record.votes() + 1;
        if votes >= 2 {
            self.accept().map(Declined::Accepted)
        } else {
            self.record.set_votes(votes);
            self.record.flip();
            Ok(Declined::Waiting)
        }
    }

    /// Closes the veto window unconditionally and moves on to the next
    /// kind, or to score reporting after the last one.
    pub fn accept(&mut self) -> Result<Kind, DraftError> {
        let kind = self.vetoing()?;
        match kind.next() {
            Some(next) => self.begin(next, Seat::Two),
            None => {
                self.record.set_phase(Phase::ReportingScore);
                self.record.set_votes(0);
            }
        }
        Ok(kind)
    }

    fn drafting(&self) -> Result<Kind, DraftError> {
        self.record
            .phase()
            .drafting()
            .ok_or(DraftError::WrongPhase("nothing is being drafted right now"))
    }
    fn vetoing(&self) -> Result<Kind, DraftError> {
        self.record
            .phase()
            .vetoing()
            .ok_or(DraftError::WrongPhase("there is no pick to veto right now"))
    }
    fn check_turn(&self, seat: Seat) -> Result<(), DraftError> {
        (self.record.turn() == seat)
            .then_some(())
            .ok_or(DraftError::NotYourTurn)
    }
    fn check_index(&self, kind: Kind, index: usize) -> Result<(), DraftError> {
        (index < self.record.pool(kind).remaining().len())
            .then_some(())
            .ok_or(DraftError::InvalidIndex(index))
    }
}
