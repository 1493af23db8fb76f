use super::StoreError;
use chrono::DateTime;
use chrono::Utc;
use chrono_tz::Tz;
use duel_core::Handle;
use duel_core::Revision;
use duel_core::Unique;
use duel_pg::*;
use duel_records::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_postgres::Client;
use tokio_postgres::types::ToSql;

/// Storage collaborator for match records and caster preferences.
///
/// Records are keyed by channel. [`commit`](Self::commit) is a
/// compare-and-swap on the record's revision: it succeeds only if the
/// stored revision still equals the one the record was loaded at, and
/// returns the new revision.
#[allow(async_fn_in_trait)]
pub trait MatchRepository {
    async fn load(&self, channel: &Handle<Channel>) -> Result<Option<Match>, StoreError>;
    async fn create(&self, record: &Match) -> Result<(), StoreError>;
    async fn delete(&self, channel: &Handle<Channel>) -> Result<bool, StoreError>;
    async fn commit(&self, record: &Match) -> Result<Revision, StoreError>;
    /// Channels the scheduled-task collaborator should advance: scheduled
    /// matches whose time has come, and open caster windows older than `window`.
    async fn due(&self, now: DateTime<Utc>, window: Duration) -> Result<Vec<Handle<Channel>>, StoreError>;
    /// Matches with an agreed time whose draft has not started, soonest first.
    async fn upcoming(&self) -> Result<Vec<Match>, StoreError>;
    async fn preference(&self, user: &Handle<Member>) -> Result<Preference, StoreError>;
    async fn set_preference(&self, user: &Handle<Member>, preference: Preference) -> Result<(), StoreError>;
    async fn timezone(&self, user: &Handle<Member>) -> Result<Option<Tz>, StoreError>;
    async fn set_timezone(&self, user: &Handle<Member>, zone: Tz) -> Result<(), StoreError>;
}

/// Creates every table the repository reads and writes.
pub async fn migrate(client: &Client) -> Result<(), StoreError> {
    duel_pg::migrate::<Match>(client).await?;
    duel_pg::migrate::<Preference>(client).await?;
    Ok(())
}

/// Start of the caster window that has fully elapsed at `now`.
pub fn window_start(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now - chrono::TimeDelta::from_std(window).unwrap_or(chrono::TimeDelta::zero())
}

#[rustfmt::skip]
const RECORD: &str = const_format::concatcp!(
    "SELECT id, revision, channel, ",
    "user_one, name_one, entrant_one, user_two, name_two, entrant_two, ",
    "phase, turn, ",
    "char_remaining, char_chosen, char_discarded, ",
    "build_remaining, build_chosen, build_discarded, ",
    "allowance, bans, vetos, votes, best_of, ",
    "scheduled, proposer, caster, approvals, score ",
    "FROM ", MATCHES
);

#[rustfmt::skip]
const SELECT: &str = const_format::concatcp!(
    RECORD, " WHERE channel = $1"
);

#[rustfmt::skip]
const UPCOMING: &str = const_format::concatcp!(
    RECORD, " WHERE phase IN ('scheduled', 'cast_assignment_open') ",
    "ORDER BY scheduled"
);

#[rustfmt::skip]
const INSERT: &str = const_format::concatcp!(
    "INSERT INTO ", MATCHES, " (",
    "id, revision, channel, ",
    "user_one, name_one, entrant_one, user_two, name_two, entrant_two, ",
    "phase, turn, ",
    "char_remaining, char_chosen, char_discarded, ",
    "build_remaining, build_chosen, build_discarded, ",
    "allowance, bans, vetos, votes, best_of, ",
    "scheduled, proposer, caster, approvals, score",
    ") VALUES (",
    "$1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, ",
    "$15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27",
    ") ON CONFLICT (channel) DO NOTHING"
);

#[rustfmt::skip]
const UPDATE: &str = const_format::concatcp!(
    "UPDATE ", MATCHES, " SET ",
    "revision = revision + 1, ",
    "phase = $3, turn = $4, ",
    "char_remaining = $5, char_chosen = $6, char_discarded = $7, ",
    "build_remaining = $8, build_chosen = $9, build_discarded = $10, ",
    "bans = $11, vetos = $12, votes = $13, ",
    "scheduled = $14, proposer = $15, caster = $16, approvals = $17, score = $18 ",
    "WHERE id = $1 AND revision = $2 ",
    "RETURNING revision"
);

#[rustfmt::skip]
const DELETE: &str = const_format::concatcp!(
    "DELETE FROM ", MATCHES, " WHERE channel = $1"
);

#[rustfmt::skip]
const DUE: &str = const_format::concatcp!(
    "SELECT channel FROM ", MATCHES, " WHERE ",
    "(phase = 'scheduled' AND scheduled <= $1) OR ",
    "(phase = 'cast_assignment_open' AND scheduled <= $2) ",
    "ORDER BY scheduled"
);

#[rustfmt::skip]
const PREFERENCE: &str = const_format::concatcp!(
    "SELECT preference FROM ", PREFERENCES, " WHERE member = $1"
);

#[rustfmt::skip]
const UPSERT_PREFERENCE: &str = const_format::concatcp!(
    "INSERT INTO ", PREFERENCES, " (member, preference) VALUES ($1, $2) ",
    "ON CONFLICT (member) DO UPDATE SET preference = EXCLUDED.preference"
);

#[rustfmt::skip]
const TIMEZONE: &str = const_format::concatcp!(
    "SELECT timezone FROM ", PREFERENCES, " WHERE member = $1"
);

#[rustfmt::skip]
const UPSERT_TIMEZONE: &str = const_format::concatcp!(
    "INSERT INTO ", PREFERENCES, " (member, timezone) VALUES ($1, $2) ",
    "ON CONFLICT (member) DO UPDATE SET timezone = EXCLUDED.timezone"
);

/// Column values of one record, owned so they can be borrowed as params.
struct Columns {
    id: uuid::Uuid,
    revision: i64,
    channel: String,
    users: [String; 2],
    names: [String; 2],
    entrants: [i64; 2],
    phase: &'static str,
    turn: i16,
    pools: [[Vec<String>; 3]; 2],
    allowance: i16,
    bans: Vec<i16>,
    vetos: Vec<i16>,
    votes: i16,
    best_of: i16,
    scheduled: Option<DateTime<Utc>>,
    proposer: Option<i16>,
    caster: Option<String>,
    approvals: Option<Vec<bool>>,
    score: Option<Vec<i16>>,
}

impl From<&Match> for Columns {
    fn from(record: &Match) -> Self {
        let pool = |kind: Kind| {
            let pool = record.pool(kind);
            [
                pool.remaining().to_vec(),
                pool.chosen().to_vec(),
                pool.discarded().to_vec(),
            ]
        };
        Self {
            id: record.id().inner(),
            revision: record.revision(),
            channel: record.channel().to_string(),
            users: Seat::ALL.map(|s| record.racer(s).user.to_string()),
            names: Seat::ALL.map(|s| record.racer(s).username.clone()),
            entrants: Seat::ALL.map(|s| record.racer(s).participant),
            phase: record.phase().as_str(),
            turn: record.turn().number(),
            pools: Kind::ALL.map(pool),
            allowance: record.allowance() as i16,
            bans: Seat::ALL.map(|s| record.bans(s) as i16).to_vec(),
            vetos: Seat::ALL.map(|s| record.vetos(s) as i16).to_vec(),
            votes: record.votes() as i16,
            best_of: record.best_of() as i16,
            scheduled: record.schedule().map(|p| p.time),
            proposer: record.schedule().map(|p| p.proposer.number()),
            caster: record.casting().map(|c| c.caster.to_string()),
            approvals: record.casting().map(|c| c.approvals.to_vec()),
            score: record.score().map(|s| s.map(|n| n as i16).to_vec()),
        }
    }
}

impl Columns {
    fn inserts(&self) -> [&(dyn ToSql + Sync); 27] {
        [
            &self.id,
            &self.revision,
            &self.channel,
            &self.users[0],
            &self.names[0],
            &self.entrants[0],
            &self.users[1],
            &self.names[1],
            &self.entrants[1],
            &self.phase,
            &self.turn,
            &self.pools[0][0],
            &self.pools[0][1],
            &self.pools[0][2],
            &self.pools[1][0],
            &self.pools[1][1],
            &self.pools[1][2],
            &self.allowance,
            &self.bans,
            &self.vetos,
            &self.votes,
            &self.best_of,
            &self.scheduled,
            &self.proposer,
            &self.caster,
            &self.approvals,
            &self.score,
        ]
    }
    fn updates(&self) -> [&(dyn ToSql + Sync); 18] {
        [
            &self.id,
            &self.revision,
            &self.phase,
            &self.turn,
            &self.pools[0][0],
            &self.pools[0][1],
            &self.pools[0][2],
            &self.pools[1][0],
            &self.pools[1][1],
            &self.pools[1][2],
            &self.bans,
            &self.vetos,
            &self.votes,
            &self.scheduled,
            &self.proposer,
            &self.caster,
            &self.approvals,
            &self.score,
        ]
    }
}

impl MatchRepository for Arc<Client> {
    async fn load(&self, channel: &Handle<Channel>) -> Result<Option<Match>, StoreError> {
        self.query_opt(SELECT, &[&channel.as_str()])
            .await?
            .map(|row| Match::try_from(&row).map_err(StoreError::Corrupt))
            .transpose()
    }
    async fn create(&self, record: &Match) -> Result<(), StoreError> {
        let columns = Columns::from(record);
        match self.execute(INSERT, &columns.inserts()).await? {
            0 => Err(StoreError::Conflict),
            _ => Ok(()),
        }
    }
    async fn delete(&self, channel: &Handle<Channel>) -> Result<bool, StoreError> {
        Ok(self.execute(DELETE, &[&channel.as_str()]).await? > 0)
    }
    async fn commit(&self, record: &Match) -> Result<Revision, StoreError> {
        let columns = Columns::from(record);
        self.query_opt(UPDATE, &columns.updates())
            .await?
            .map(|row| row.try_get::<_, i64>(0))
            .transpose()?
            .ok_or(StoreError::Conflict)
    }
    async fn due(&self, now: DateTime<Utc>, window: Duration) -> Result<Vec<Handle<Channel>>, StoreError> {
        let opened = window_start(now, window);
        Ok(self
            .query(DUE, &[&now, &opened])
            .await?
            .iter()
            .map(|row| row.try_get::<_, String>(0).map(Handle::from))
            .collect::<Result<Vec<_>, _>>()?)
    }
    async fn upcoming(&self) -> Result<Vec<Match>, StoreError> {
        self.query(UPCOMING, &[])
            .await?
            .iter()
            .map(|row| Match::try_from(row).map_err(StoreError::Corrupt))
            .collect()
    }
    async fn preference(&self, user: &Handle<Member>) -> Result<Preference, StoreError> {
        match self.query_opt(PREFERENCE, &[&user.as_str()]).await? {
            None => Ok(Preference::default()),
            Some(row) => Preference::try_from(row.try_get::<_, &str>(0)?).map_err(StoreError::Corrupt),
        }
    }
    async fn set_preference(&self, user: &Handle<Member>, preference: Preference) -> Result<(), StoreError> {
        self.execute(UPSERT_PREFERENCE, &[&user.as_str(), &preference.as_str()])
            .await
            .map(|_| ())
            .map_err(StoreError::from)
    }
    async fn timezone(&self, user: &Handle<Member>) -> Result<Option<Tz>, StoreError> {
        match self.query_opt(TIMEZONE, &[&user.as_str()]).await? {
            None => Ok(None),
            Some(row) => row
                .try_get::<_, Option<String>>(0)?
                .map(|name| {
                    name.parse::<Tz>()
                        .map_err(|_| StoreError::Corrupt(format!("unknown time zone {}", name)))
                })
                .transpose(),
        }
    }
    async fn set_timezone(&self, user: &Handle<Member>, zone: Tz) -> Result<(), StoreError> {
        self.execute(UPSERT_TIMEZONE, &[&user.as_str(), &zone.name()])
            .await
            .map(|_| ())
            .map_err(StoreError::from)
    }
}
