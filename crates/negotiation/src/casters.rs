use super::NegotiationError;
use duel_core::Handle;
use duel_records::*;

/// What a caster negotiation step led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    /// A volunteer is waiting for approvals.
    Volunteered,
    /// One more approval was recorded.
    Approved,
    /// Both racers approved; the caster is bound to the match.
    Bound,
    /// A racer turned the volunteer down, by hand or by standing preference.
    Rejected,
    /// The volunteer stepped back.
    Withdrawn,
}

/// Wraps a match record with caster approval.
#[derive(Debug)]
pub struct Casters<'m> {
    record: &'m mut Match,
}

impl<'m> Casters<'m> {
    pub fn new(record: &'m mut Match) -> Self {
        Self { record }
    }

    /// Registers a volunteer and applies both racers' standing preferences.
    pub fn volunteer(
        &mut self,
        user: Handle<Member>,
        prefs: [Preference; 2],
    ) -> Result<Cast, NegotiationError> {
        self.negotiating()?;
        if self.record.casting().is_some() {
            return Err(NegotiationError::WrongPhase("this match already has a caster"));
        }
        if self.record.seat_of(&user).is_some() {
            return Err(NegotiationError::InvalidArgument(
                "racers cannot cast their own match".into(),
            ));
        }
        if prefs.contains(&Preference::AlwaysReject) {
            log::debug!("[casting {}] {} rejected by preference", self.record.channel(), user);
            return Ok(Cast::Rejected);
        }
        let mut casting = duel_records::Casting::new(user);
        for seat in Seat::ALL {
            if prefs[seat.index()] == Preference::AlwaysApprove {
                casting.approve(seat);
            }
        }
        let bound = casting.is_bound();
        self.record.set_casting(Some(casting));
        Ok(if bound { Cast::Bound } else { Cast::Volunteered })
    }

    /// Removes the volunteer at their own request or an admin's.
    pub fn withdraw(&mut self, user: &Handle<Member>, forced: bool) -> Result<Cast, NegotiationError> {
        self.negotiating()?;
        let casting = self.pending_or_bound()?;
        if !forced && &casting.caster != user {
            return Err(NegotiationError::NotTheCaster);
        }
        self.record.set_casting(None);
        Ok(Cast::Withdrawn)
    }

    pub fn approve(&mut self, seat: Seat) -> Result<Cast, NegotiationError> {
        self.negotiating()?;
        if self.pending_or_bound()?.is_bound() {
            return Err(NegotiationError::WrongPhase("the caster is already confirmed"));
        }
        let casting = self
            .record
            .casting_mut()
            .ok_or(NegotiationError::WrongPhase("nobody has volunteered to cast"))?;
        casting.approve(seat);
        Ok(if casting.is_bound() { Cast::Bound } else { Cast::Approved })
    }

    /// Turns the volunteer down. Only possible before both approvals.
    pub fn reject(&mut self, seat: Seat) -> Result<Cast, NegotiationError> {
        self.negotiating()?;
        if self.pending_or_bound()?.is_bound() {
            return Err(NegotiationError::WrongPhase("the caster is already confirmed"));
        }
        log::debug!("[casting {}] seat {} rejects the caster", self.record.channel(), seat);
        self.record.set_casting(None);
        Ok(Cast::Rejected)
    }

    fn negotiating(&self) -> Result<(), NegotiationError> {
        self.record
            .phase()
            .is_negotiating()
            .then_some(())
            .ok_or(NegotiationError::WrongPhase("casters can only be arranged before the draft"))
    }
    fn pending_or_bound(&self) -> Result<&Casting, NegotiationError> {
        self.record
            .casting()
            .ok_or(NegotiationError::WrongPhase("nobody has volunteered to cast"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Match {
        let racers = [Racer::new("u1", "one", 1), Racer::new("u2", "two", 2)];
        Match::open(Handle::from("chan"), racers, &Rules::default()).unwrap()
    }
    const ASK: [Preference; 2] = [Preference::Ask; 2];

    #[test]
    fn both_approvals_bind() {
        let mut record = record();
        let mut casters = Casters::new(&mut record);
        assert_eq!(casters.volunteer(Handle::from("c"), ASK), Ok(Cast::Volunteered));
        assert_eq!(casters.approve(Seat::One), Ok(Cast::Approved));
        assert_eq!(casters.approve(Seat::Two), Ok(Cast::Bound));
        assert!(casters.reject(Seat::One).is_err());
        assert!(record.casting().is_some_and(Casting::is_bound));
    }
    #[test]
    fn standing_preferences_apply_on_volunteer() {
        let mut record = record();
        let prefs = [Preference::AlwaysApprove, Preference::AlwaysReject];
        let cast = Casters::new(&mut record).volunteer(Handle::from("c"), prefs);
        assert_eq!(cast, Ok(Cast::Rejected));
        assert!(record.casting().is_none());
        let prefs = [Preference::AlwaysApprove, Preference::Ask];
        let cast = Casters::new(&mut record).volunteer(Handle::from("c"), prefs);
        assert_eq!(cast, Ok(Cast::Volunteered));
        assert!(record.casting().is_some_and(|c| c.approved_by(Seat::One)));
        assert_eq!(Casters::new(&mut record).approve(Seat::Two), Ok(Cast::Bound));
    }
    #[test]
    fn reject_clears_volunteer() {
        let mut record = record();
        let mut casters = Casters::new(&mut record);
        casters.volunteer(Handle::from("c"), ASK).unwrap();
        casters.approve(Seat::One).unwrap();
        assert_eq!(casters.reject(Seat::Two), Ok(Cast::Rejected));
        assert!(record.casting().is_none());
    }
    #[test]
    fn only_volunteer_withdraws() {
        let mut record = record();
        let mut casters = Casters::new(&mut record);
        casters.volunteer(Handle::from("c"), ASK).unwrap();
        assert!(casters.volunteer(Handle::from("d"), ASK).is_err());
        assert_eq!(
            casters.withdraw(&Handle::from("d"), false),
            Err(NegotiationError::NotTheCaster)
        );
        assert_eq!(casters.withdraw(&Handle::from("d"), true), Ok(Cast::Withdrawn));
    }
    #[test]
    fn racers_cannot_volunteer() {
        let mut record = record();
        assert!(matches!(
            Casters::new(&mut record).volunteer(Handle::from("u1"), ASK),
            Err(NegotiationError::InvalidArgument(_))
        ));
    }
    #[test]
    fn closed_once_drafting() {
        let mut record = record();
        record.set_phase(Phase::DraftingBuilds);
        assert!(matches!(
            Casters::new(&mut record).volunteer(Handle::from("c"), ASK),
            Err(NegotiationError::WrongPhase(_))
        ));
    }
}
