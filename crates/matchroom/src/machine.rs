use super::*;
use chrono::DateTime;
use chrono::Utc;
use chrono_tz::Tz;
use duel_core::Count;
use duel_core::Handle;
use duel_draft::Declined;
use duel_draft::Draft;
use duel_negotiation::Cast;
use duel_negotiation::Casters;
use duel_negotiation::Schedule;
use duel_records::*;
use std::time::Duration;

/// Validates, applies and persists every command for every match.
///
/// Holds no per-match state: each command reloads its record and
/// commits it back against the revision it was loaded at.
#[derive(Debug)]
pub struct Machine<R> {
    repo: R,
    rules: Rules,
}

impl<R> Machine<R>
where
    R: MatchRepository,
{
    pub fn new(repo: R, rules: Rules) -> Self {
        Self { repo, rules }
    }
    pub fn repo(&self) -> &R {
        &self.repo
    }
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Round start: binds a fresh record to the channel.
    pub async fn open(&self, channel: Handle<Channel>, racers: [Racer; 2]) -> Result<Vec<Event>, MatchError> {
        let record = Match::open(channel, racers, &self.rules)?;
        match self.repo.create(&record).await {
            Err(StoreError::Conflict) => Err(MatchError::InvalidArgument(format!(
                "channel {} already hosts a match",
                record.channel()
            ))),
            Err(e) => Err(e.into()),
            Ok(()) => {
                log::info!(
                    "[machine {}] opened {} vs {}",
                    record.channel(),
                    record.racer(Seat::One).username,
                    record.racer(Seat::Two).username
                );
                Ok(vec![Event::Opened {
                    racers: names(&record),
                    best_of: record.best_of(),
                }])
            }
        }
    }

    /// Round end: drops the channel's record.
    pub async fn close(&self, channel: &Handle<Channel>) -> Result<Vec<Event>, MatchError> {
        match self.repo.delete(channel).await? {
            true => {
                log::info!("[machine {}] closed", channel);
                Ok(vec![Event::Closed])
            }
            false => Err(MatchError::NotAMatchChannel),
        }
    }

    /// Runs one action against the channel's match.
    ///
    /// Nothing is persisted unless every precondition holds. A commit
    /// that loses a race reloads and re-validates, so a stale duplicate
    /// fails its own precondition instead of applying twice.
    pub async fn run(
        &self,
        channel: &Handle<Channel>,
        actor: &Actor,
        action: &Action,
    ) -> Result<Vec<Event>, MatchError> {
        for attempt in 1..=duel_core::COMMIT_RETRIES {
            let mut record = self
                .repo
                .load(channel)
                .await?
                .ok_or(MatchError::NotAMatchChannel)?;
            let events = self
                .apply(&mut record, actor, action)
                .await
                .inspect_err(|e| log::debug!("[machine {}] {:?} refused: {}", channel, action, e))?;
            if action.is_query() {
                return Ok(events);
            }
            match self.repo.commit(&record).await {
                Ok(revision) => {
                    log::info!(
                        "[machine {}] {:?} by {} -> {} (r{})",
                        channel,
                        action,
                        actor.user,
                        record.phase(),
                        revision
                    );
                    if let Action::Prefer(preference) = action {
                        let (user, _) = preferrer(&record, actor)?;
                        self.repo.set_preference(&user, *preference).await?;
                    }
                    return Ok(events);
                }
                Err(StoreError::Conflict) => {
                    log::warn!("[machine {}] commit race lost (attempt {})", channel, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(MatchError::Conflict)
    }

    /// Scheduled-task path: moves a match past a timed boundary.
    pub async fn advance(&self, channel: &Handle<Channel>) -> Result<Vec<Event>, MatchError> {
        self.run(channel, &Actor::system(), &Action::Advance).await
    }

    /// Reports the final score, the reporter's wins first.
    pub async fn report(
        &self,
        channel: &Handle<Channel>,
        actor: &Actor,
        mine: Count,
        theirs: Count,
    ) -> Result<Vec<Event>, MatchError> {
        self.run(channel, actor, &Action::Score(mine, theirs)).await
    }

    pub async fn status(&self, channel: &Handle<Channel>) -> Result<Summary, MatchError> {
        self.repo
            .load(channel)
            .await?
            .map(|record| Summary::of(&record))
            .ok_or(MatchError::NotAMatchChannel)
    }

    /// Matches with an agreed time that have not started drafting, soonest first.
    pub async fn upcoming(&self) -> Result<Vec<Summary>, MatchError> {
        Ok(self
            .repo
            .upcoming()
            .await?
            .iter()
            .map(Summary::of)
            .collect())
    }

    /// The zone a member's times are read in. UTC until they set one.
    pub async fn zone(&self, user: &Handle<Member>) -> Result<Tz, MatchError> {
        Ok(self.repo.timezone(user).await?.unwrap_or(Tz::UTC))
    }

    pub async fn timezone(&self, user: &Handle<Member>) -> Result<Vec<Event>, MatchError> {
        Ok(vec![Event::Timezone {
            user: user.to_string(),
            zone: self.repo.timezone(user).await?.map(|z| z.name().to_string()),
        }])
    }

    pub async fn set_timezone(&self, user: &Handle<Member>, zone: Tz) -> Result<Vec<Event>, MatchError> {
        self.repo.set_timezone(user, zone).await?;
        log::info!("[machine] {} now reads times in {}", user, zone.name());
        Ok(vec![Event::TimezoneSet {
            user: user.to_string(),
            zone: zone.name().to_string(),
        }])
    }

    pub async fn due(&self, now: DateTime<Utc>, window: Duration) -> Result<Vec<Handle<Channel>>, MatchError> {
        Ok(self.repo.due(now, window).await?)
    }

    async fn apply(&self, record: &mut Match, actor: &Actor, action: &Action) -> Result<Vec<Event>, MatchError> {
        let seat = match action.needs_seat() {
            true => Some(seat(record, actor)?),
            false => None,
        };
        let me = || seat.ok_or(MatchError::NotAParticipant);
        match action {
            Action::Propose(time) => {
                let seat = me()?;
                Schedule::new(record).propose(seat, *time)?;
                Ok(vec![Event::Proposed {
                    racer: name(record, seat),
                    opponent: name(record, seat.other()),
                    time: *time,
                }])
            }
            Action::Confirm => {
                let time = Schedule::new(record).confirm(me()?, actor.is_forced())?;
                Ok(vec![Event::Scheduled { time }])
            }
            Action::Unschedule => {
                let seat = me()?;
                Schedule::new(record).delete(seat)?;
                Ok(vec![Event::Unscheduled {
                    racer: name(record, seat),
                }])
            }
            Action::Volunteer => {
                let prefs = [
                    self.repo.preference(&record.racer(Seat::One).user).await?,
                    self.repo.preference(&record.racer(Seat::Two).user).await?,
                ];
                let caster = actor.user.to_string();
                let cast = Casters::new(record).volunteer(actor.user.clone(), prefs)?;
                match cast {
                    Cast::Rejected => Ok(vec![Event::Rejected { caster }]),
                    Cast::Bound => Ok(vec![Event::Bound { caster }]),
                    _ => Ok(vec![Event::Volunteered {
                        caster,
                        racers: names(record),
                    }]),
                }
            }
            Action::Withdraw => {
                let caster = caster(record);
                Casters::new(record).withdraw(&actor.user, actor.is_forced())?;
                Ok(vec![Event::Withdrawn { caster }])
            }
            Action::Approve => {
                let seat = me()?;
                let cast = Casters::new(record).approve(seat)?;
                Ok(approved(record, seat, cast))
            }
            Action::Reject => {
                let caster = caster(record);
                Casters::new(record).reject(me()?)?;
                Ok(vec![Event::Rejected { caster }])
            }
            Action::Prefer(preference) => self.prefer(record, actor, *preference).await,
            Action::Ban(index) => {
                let seat = me()?;
                let item = Draft::new(record).ban(seat, *index)?;
                let banned = Event::Banned {
                    racer: name(record, seat),
                    item,
                };
                Ok(std::iter::once(banned).chain(prompt(record)).collect())
            }
            Action::Pick(index) => {
                let seat = me()?;
                let picked = Draft::new(record).pick(seat, *index)?;
                let picked = Event::Picked {
                    racer: name(record, seat),
                    item: picked.item,
                    remaining: picked.remaining,
                };
                Ok(std::iter::once(picked).chain(prompt(record)).collect())
            }
            Action::Veto => {
                let seat = me()?;
                let item = Draft::new(record).veto(seat)?;
                let vetoed = Event::Vetoed {
                    racer: name(record, seat),
                    item,
                    vetos: record.vetos(seat),
                };
                Ok(std::iter::once(vetoed).chain(prompt(record)).collect())
            }
            Action::Decline => {
                let seat = me()?;
                let declined = Event::Declined {
                    racer: name(record, seat),
                };
                let outcome = Draft::new(record).decline(seat)?;
                match outcome {
                    Declined::Waiting => Ok(std::iter::once(declined).chain(prompt(record)).collect()),
                    Declined::Accepted(kind) => Ok(std::iter::once(declined)
                        .chain(accepted(record, kind))
                        .collect()),
                }
            }
            Action::Score(mine, theirs) => score(record, me()?, *mine, *theirs),
            Action::Advance => {
                forced(actor)?;
                advance(record)
            }
            Action::Time => Ok(vec![Event::Time {
                time: record.schedule().map(|p| p.time),
                agreed: record.phase() != Phase::Initial,
            }]),
            Action::Caster => Ok(vec![Event::Caster {
                caster: record.casting().map(|c| c.caster.to_string()),
                bound: record.casting().is_some_and(Casting::is_bound),
            }]),
            Action::Remaining => prompt(record)
                .map(|e| vec![e])
                .ok_or_else(|| MatchError::WrongPhase("nothing is being drafted right now".into())),
            Action::Status => Ok(vec![Event::Status(Summary::of(record))]),
            Action::State => {
                forced(actor)?;
                serde_json::to_string_pretty(record)
                    .map(|json| vec![Event::State { json }])
                    .map_err(|e| MatchError::InvalidArgument(e.to_string()))
            }
        }
    }

    /// Applies a standing caster preference to a pending volunteer.
    /// The preference itself is stored by [`Machine::run`] once the
    /// record has committed.
    async fn prefer(
        &self,
        record: &mut Match,
        actor: &Actor,
        preference: Preference,
    ) -> Result<Vec<Event>, MatchError> {
        let (user, seat) = preferrer(record, actor)?;
        let mut events = vec![Event::Preferred {
            user: seat.map(|s| name(record, s)).unwrap_or_else(|| user.to_string()),
            preference,
        }];
        let pending = record.phase().is_negotiating() && record.casting().is_some_and(|c| !c.is_bound());
        match (seat, preference) {
            (Some(seat), Preference::AlwaysApprove) if pending => {
                if !record.casting().is_some_and(|c| c.approved_by(seat)) {
                    let cast = Casters::new(record).approve(seat)?;
                    events.extend(approved(record, seat, cast));
                }
            }
            (Some(seat), Preference::AlwaysReject) if pending => {
                let caster = caster(record);
                Casters::new(record).reject(seat)?;
                events.push(Event::Rejected { caster });
            }
            _ => {}
        }
        Ok(events)
    }
}

/// The seat an actor speaks for.
fn seat(record: &Match, actor: &Actor) -> Result<Seat, MatchError> {
    match &actor.forced {
        None => record.seat_of(&actor.user).ok_or(MatchError::NotAParticipant),
        Some(Stand::Active) => Ok(record.turn()),
        Some(Stand::Named(name)) => named(record, name),
    }
}

fn named(record: &Match, name: &str) -> Result<Seat, MatchError> {
    record
        .seat_named(name)
        .ok_or_else(|| MatchError::InvalidArgument(format!("{} is not racing in this match", name)))
}

/// Whose preference an actor sets, and their seat if they race here.
fn preferrer(record: &Match, actor: &Actor) -> Result<(Handle<Member>, Option<Seat>), MatchError> {
    match &actor.forced {
        Some(Stand::Named(name)) => {
            let seat = named(record, name)?;
            Ok((record.racer(seat).user.clone(), Some(seat)))
        }
        _ => Ok((actor.user.clone(), record.seat_of(&actor.user))),
    }
}

fn forced(actor: &Actor) -> Result<(), MatchError> {
    actor.is_forced().then_some(()).ok_or(MatchError::NotAdmin)
}

fn name(record: &Match, seat: Seat) -> String {
    record.racer(seat).username.clone()
}

fn names(record: &Match) -> [String; 2] {
    Seat::ALL.map(|seat| name(record, seat))
}

fn caster(record: &Match) -> String {
    record
        .casting()
        .map(|c| c.caster.to_string())
        .unwrap_or_default()
}

fn approved(record: &Match, seat: Seat, cast: Cast) -> Vec<Event> {
    let caster = caster(record);
    let approval = Event::Approved {
        racer: name(record, seat),
        caster: caster.clone(),
    };
    match cast {
        Cast::Bound => vec![approval, Event::Bound { caster }],
        _ => vec![approval],
    }
}

/// What the active racer is asked next, if anything.
fn prompt(record: &Match) -> Option<Event> {
    let racer = name(record, record.turn());
    let phase = record.phase();
    if let Some(kind) = phase.drafting() {
        let verb = match record.banning() {
            true => Verb::Ban,
            false => Verb::Pick,
        };
        return Some(Event::Prompt {
            racer,
            verb,
            kind,
            items: record.pool(kind).remaining().to_vec(),
        });
    }
    if let Some(kind) = phase.vetoing() {
        return Some(Event::Offer {
            racer,
            item: record.pool(kind).chosen().last().cloned().unwrap_or_default(),
            vetos: record.vetos(record.turn()),
        });
    }
    match phase {
        Phase::ReportingScore => Some(Event::Report {
            racers: names(record),
        }),
        _ => None,
    }
}

/// Events following the acceptance of a kind.
fn accepted(record: &Match, kind: Kind) -> Vec<Event> {
    let mut events = vec![Event::Accepted {
        kind,
        chosen: record.pool(kind).chosen().to_vec(),
    }];
    if let Some(next) = kind.next() {
        events.push(Event::Begun {
            kind: next,
            first: name(record, record.turn()),
        });
    }
    events.extend(prompt(record));
    events
}

fn advance(record: &mut Match) -> Result<Vec<Event>, MatchError> {
    match record.phase() {
        Phase::Scheduled => {
            record.set_phase(Phase::CastAssignmentOpen);
            Ok(vec![Event::WindowOpen {
                time: record.schedule().map(|p| p.time),
            }])
        }
        Phase::CastAssignmentOpen => {
            if record.casting().is_some_and(|c| !c.is_bound()) {
                return Err(MatchError::WrongPhase(
                    "a caster is still waiting for approval".into(),
                ));
            }
            Draft::new(record).begin(Kind::Character, Seat::One);
            let begun = Event::Begun {
                kind: Kind::Character,
                first: name(record, Seat::One),
            };
            Ok(std::iter::once(begun).chain(prompt(record)).collect())
        }
        phase if phase.vetoing().is_some() => {
            let kind = Draft::new(record).accept()?;
            Ok(accepted(record, kind))
        }
        _ => Err(MatchError::WrongPhase(
            "there is nothing to advance right now".into(),
        )),
    }
}

/// Records the final score. `mine` belongs to `seat`.
fn score(record: &mut Match, seat: Seat, mine: Count, theirs: Count) -> Result<Vec<Event>, MatchError> {
    if record.phase() != Phase::ReportingScore {
        return Err(MatchError::WrongPhase(
            "scores can only be reported once the draft is over".into(),
        ));
    }
    let (winner, wins, losses) = match mine > theirs {
        true => (seat, mine, theirs),
        false => (seat.other(), theirs, mine),
    };
    if wins != record.majority() || losses >= wins {
        return Err(MatchError::InvalidArgument(format!(
            "in a best of {} the winner has exactly {} wins",
            record.best_of(),
            record.majority()
        )));
    }
    let mut score = [0; 2];
    score[seat.index()] = mine;
    score[seat.other().index()] = theirs;
    record.set_score(Some(score));
    record.set_phase(Phase::Completed);
    Ok(vec![Event::Completed {
        winner: name(record, winner),
        loser: name(record, winner.other()),
        wins,
        losses,
    }])
}
