use super::*;
use duel_core::Count;
use duel_core::Handle;
use duel_core::ID;
use duel_core::Revision;
use duel_core::Unique;
use serde::Serialize;

/// Persistent aggregate for one match, keyed by its channel.
///
/// Every field is read through accessors; the draft engine, the
/// negotiation sub-protocols and the state machine mutate it through the
/// narrow setters below and the whole record is then committed at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub(crate) id: ID<Match>,
    pub(crate) revision: Revision,
    pub(crate) channel: Handle<Channel>,
    pub(crate) racers: [Racer; 2],
    pub(crate) phase: Phase,
    pub(crate) turn: Seat,
    pub(crate) pools: [Pool; 2],
    pub(crate) allowance: Count,
    pub(crate) bans: [Count; 2],
    pub(crate) vetos: [Count; 2],
    pub(crate) votes: Count,
    pub(crate) best_of: Count,
    pub(crate) schedule: Option<Proposal>,
    pub(crate) casting: Option<Casting>,
    pub(crate) score: Option<[Count; 2]>,
}

impl Match {
    /// Fresh record in `Initial` for a round that has just paired two racers.
    pub fn open(channel: Handle<Channel>, racers: [Racer; 2], rules: &Rules) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self {
            id: ID::default(),
            revision: 0,
            channel,
            racers,
            phase: Phase::Initial,
            turn: Seat::One,
            pools: [
                Pool::new(rules.characters.clone()),
                Pool::new(rules.builds.clone()),
            ],
            allowance: rules.bans,
            bans: [rules.bans; 2],
            vetos: [rules.vetos; 2],
            votes: 0,
            best_of: rules.best_of,
            schedule: None,
            casting: None,
            score: None,
        })
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }
    pub fn channel(&self) -> &Handle<Channel> {
        &self.channel
    }
    pub fn racers(&self) -> &[Racer; 2] {
        &self.racers
    }
    pub fn racer(&self, seat: Seat) -> &Racer {
        &self.racers[seat.index()]
    }
    /// Seat occupied by a chat user, if they are playing this match.
    pub fn seat_of(&self, user: &Handle<Member>) -> Option<Seat> {
        Seat::ALL
            .into_iter()
            .find(|seat| &self.racer(*seat).user == user)
    }
    /// Seat of the racer with the given display name, case-insensitively.
    pub fn seat_named(&self, name: &str) -> Option<Seat> {
        Seat::ALL.into_iter().find(|seat| {
            let racer = self.racer(*seat);
            racer.username.eq_ignore_ascii_case(name) || racer.user.as_str() == name
        })
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn turn(&self) -> Seat {
        self.turn
    }
    pub fn pool(&self, kind: Kind) -> &Pool {
        &self.pools[kind.index()]
    }
    /// Bans each seat makes at the start of every kind.
    pub fn allowance(&self) -> Count {
        self.allowance
    }
    /// Bans a seat still owes for the kind being drafted.
    pub fn bans(&self, seat: Seat) -> Count {
        self.bans[seat.index()]
    }
    pub fn vetos(&self, seat: Seat) -> Count {
        self.vetos[seat.index()]
    }
    pub fn votes(&self) -> Count {
        self.votes
    }
    pub fn best_of(&self) -> Count {
        self.best_of
    }
    /// Wins needed to take the match.
    pub fn majority(&self) -> Count {
        self.best_of / 2 + 1
    }
    pub fn schedule(&self) -> Option<&Proposal> {
        self.schedule.as_ref()
    }
    pub fn casting(&self) -> Option<&Casting> {
        self.casting.as_ref()
    }
    pub fn score(&self) -> Option<[Count; 2]> {
        self.score
    }
    /// True while either seat still owes a ban for the current kind.
    pub fn banning(&self) -> bool {
        self.bans.iter().any(|b| *b > 0)
    }

    pub fn set_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
    pub fn set_turn(&mut self, seat: Seat) {
        self.turn = seat;
    }
    pub fn flip(&mut self) {
        self.turn = self.turn.other();
    }
    pub fn pool_mut(&mut self, kind: Kind) -> &mut Pool {
        &mut self.pools[kind.index()]
    }
    pub fn set_bans(&mut self, bans: [Count; 2]) {
        self.bans = bans;
    }
    /// Consumes one owed ban. False if the seat owed none.
    pub fn spend_ban(&mut self, seat: Seat) -> bool {
        let owed = &mut self.bans[seat.index()];
        owed.checked_sub(1).map(|n| *owed = n).is_some()
    }
    /// Consumes one veto. False if the seat had none left.
    pub fn spend_veto(&mut self, seat: Seat) -> bool {
        let left = &mut self.vetos[seat.index()];
        left.checked_sub(1).map(|n| *left = n).is_some()
    }
    pub fn set_votes(&mut self, votes: Count) {
        self.votes = votes;
    }
    pub fn set_schedule(&mut self, schedule: Option<Proposal>) {
        self.schedule = schedule;
    }
    pub fn set_casting(&mut self, casting: Option<Casting>) {
        self.casting = casting;
    }
    pub fn casting_mut(&mut self) -> Option<&mut Casting> {
        self.casting.as_mut()
    }
    pub fn set_score(&mut self, score: Option<[Count; 2]>) {
        self.score = score;
    }
}

impl Unique for Match {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use duel_pg::*;
    use tokio_postgres::Row;

    impl Schema for Match {
        fn name() -> &'static str {
            MATCHES
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                MATCHES,
                " (
                    id              UUID PRIMARY KEY,
                    revision        BIGINT NOT NULL,
                    channel         TEXT NOT NULL UNIQUE,
                    user_one        TEXT NOT NULL,
                    name_one        TEXT NOT NULL,
                    entrant_one     BIGINT NOT NULL,
                    user_two        TEXT NOT NULL,
                    name_two        TEXT NOT NULL,
                    entrant_two     BIGINT NOT NULL,
                    phase           TEXT NOT NULL,
                    turn            SMALLINT NOT NULL,
                    char_remaining  TEXT[] NOT NULL,
                    char_chosen     TEXT[] NOT NULL,
                    char_discarded  TEXT[] NOT NULL,
                    build_remaining TEXT[] NOT NULL,
                    build_chosen    TEXT[] NOT NULL,
                    build_discarded TEXT[] NOT NULL,
                    allowance       SMALLINT NOT NULL,
                    bans            SMALLINT[] NOT NULL,
                    vetos           SMALLINT[] NOT NULL,
                    votes           SMALLINT NOT NULL,
                    best_of         SMALLINT NOT NULL,
                    scheduled       TIMESTAMPTZ,
                    proposer        SMALLINT,
                    caster          TEXT,
                    approvals       BOOLEAN[],
                    score           SMALLINT[]
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_matches_due ON ",
                MATCHES,
                " (phase, scheduled);"
            )
        }
    }

    fn pair<T: Copy>(v: Vec<T>, column: &str) -> Result<[T; 2], String> {
        <[T; 2]>::try_from(v).map_err(|v| format!("{} holds {} values", column, v.len()))
    }
    fn count(n: i16, column: &str) -> Result<Count, String> {
        Count::try_from(n).map_err(|_| format!("{} out of range: {}", column, n))
    }
    fn counts(v: Vec<i16>, column: &str) -> Result<[Count; 2], String> {
        let [a, b] = pair(v, column)?;
        Ok([count(a, column)?, count(b, column)?])
    }

    /// Hydrates a record from a row selected with every column of the table.
    impl TryFrom<&Row> for Match {
        type Error = String;
        fn try_from(row: &Row) -> Result<Self, Self::Error> {
            let text = |c: &str| row.try_get::<_, String>(c).map_err(|e| e.to_string());
            let list = |c: &str| row.try_get::<_, Vec<String>>(c).map_err(|e| e.to_string());
            let small = |c: &str| row.try_get::<_, i16>(c).map_err(|e| e.to_string());
            let smalls = |c: &str| row.try_get::<_, Vec<i16>>(c).map_err(|e| e.to_string());
            let big = |c: &str| row.try_get::<_, i64>(c).map_err(|e| e.to_string());
            let seat = |n: i16| Seat::try_from(n).map_err(|n| format!("no seat {}", n));
            let schedule = match (
                row.try_get::<_, Option<chrono::DateTime<chrono::Utc>>>("scheduled")
                    .map_err(|e| e.to_string())?,
                row.try_get::<_, Option<i16>>("proposer")
                    .map_err(|e| e.to_string())?,
            ) {
                (Some(time), Some(proposer)) => Some(Proposal::new(time, seat(proposer)?)),
                (None, None) => None,
                _ => return Err("schedule without proposer".into()),
            };
            let casting = match (
                row.try_get::<_, Option<String>>("caster")
                    .map_err(|e| e.to_string())?,
                row.try_get::<_, Option<Vec<bool>>>("approvals")
                    .map_err(|e| e.to_string())?,
            ) {
                (Some(caster), Some(approvals)) => Some(Casting {
                    caster: Handle::from(caster),
                    approvals: pair(approvals, "approvals")?,
                }),
                (None, _) => None,
                _ => return Err("approvals without caster".into()),
            };
            let score = row
                .try_get::<_, Option<Vec<i16>>>("score")
                .map_err(|e| e.to_string())?
                .map(|v| counts(v, "score"))
                .transpose()?;
            Ok(Self {
                id: ID::from(row.try_get::<_, uuid::Uuid>("id").map_err(|e| e.to_string())?),
                revision: big("revision")?,
                channel: Handle::from(text("channel")?),
                racers: [
                    Racer::new(text("user_one")?, text("name_one")?, big("entrant_one")?),
                    Racer::new(text("user_two")?, text("name_two")?, big("entrant_two")?),
                ],
                phase: Phase::try_from(text("phase")?.as_str())?,
                turn: seat(small("turn")?)?,
                pools: [
                    Pool::restore(
                        list("char_remaining")?,
                        list("char_chosen")?,
                        list("char_discarded")?,
                    ),
                    Pool::restore(
                        list("build_remaining")?,
                        list("build_chosen")?,
                        list("build_discarded")?,
                    ),
                ],
                allowance: count(small("allowance")?, "allowance")?,
                bans: counts(smalls("bans")?, "bans")?,
                vetos: counts(smalls("vetos")?, "vetos")?,
                votes: count(small("votes")?, "votes")?,
                best_of: count(small("best_of")?, "best_of")?,
                schedule,
                casting,
                score,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn racers() -> [Racer; 2] {
        [Racer::new("u1", "alice", 11), Racer::new("u2", "bob", 22)]
    }

    #[test]
    fn opens_in_initial() {
        let record = Match::open(Handle::from("c"), racers(), &Rules::default()).unwrap();
        assert_eq!(record.phase(), Phase::Initial);
        assert_eq!(record.turn(), Seat::One);
        assert_eq!(record.revision(), 0);
        assert_eq!(record.vetos(Seat::Two), duel_core::VETOS);
        assert_eq!(record.pool(Kind::Build).remaining().len(), duel_core::BUILDS.len());
        assert!(record.pool(Kind::Character).chosen().is_empty());
        assert_eq!(record.majority(), 2);
    }
    #[test]
    fn open_refuses_bad_rules() {
        let rules = Rules {
            best_of: 2,
            ..Rules::default()
        };
        assert!(Match::open(Handle::from("c"), racers(), &rules).is_err());
    }
    #[test]
    fn seats_resolve_by_handle_and_name() {
        let record = Match::open(Handle::from("c"), racers(), &Rules::default()).unwrap();
        assert_eq!(record.seat_of(&Handle::from("u2")), Some(Seat::Two));
        assert_eq!(record.seat_of(&Handle::from("u3")), None);
        assert_eq!(record.seat_named("ALICE"), Some(Seat::One));
        assert_eq!(record.seat_named("u2"), Some(Seat::Two));
    }
    #[test]
    fn counters_never_underflow() {
        let rules = Rules {
            vetos: 1,
            bans: 0,
            ..Rules::default()
        };
        let mut record = Match::open(Handle::from("c"), racers(), &rules).unwrap();
        assert!(!record.banning());
        assert!(!record.spend_ban(Seat::One));
        assert!(record.spend_veto(Seat::One));
        assert!(!record.spend_veto(Seat::One));
        assert_eq!(record.vetos(Seat::One), 0);
    }
}
