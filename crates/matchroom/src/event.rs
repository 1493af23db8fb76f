use chrono::DateTime;
use chrono::Utc;
use duel_core::Count;
use duel_records::*;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// What a committed transition (or a query) has to say to the channel.
/// Each event renders to one chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Opened {
        racers: [String; 2],
        best_of: Count,
    },
    Closed,
    Proposed {
        racer: String,
        opponent: String,
        time: DateTime<Utc>,
    },
    Scheduled {
        time: DateTime<Utc>,
    },
    Unscheduled {
        racer: String,
    },
    Time {
        time: Option<DateTime<Utc>>,
        agreed: bool,
    },
    Volunteered {
        caster: String,
        racers: [String; 2],
    },
    Approved {
        racer: String,
        caster: String,
    },
    Bound {
        caster: String,
    },
    Rejected {
        caster: String,
    },
    Withdrawn {
        caster: String,
    },
    Caster {
        caster: Option<String>,
        bound: bool,
    },
    Preferred {
        user: String,
        preference: Preference,
    },
    WindowOpen {
        time: Option<DateTime<Utc>>,
    },
    Begun {
        kind: Kind,
        first: String,
    },
    Banned {
        racer: String,
        item: String,
    },
    Picked {
        racer: String,
        item: String,
        remaining: Count,
    },
    Vetoed {
        racer: String,
        item: String,
        vetos: Count,
    },
    Declined {
        racer: String,
    },
    Accepted {
        kind: Kind,
        chosen: Vec<String>,
    },
    /// Asks the active racer to ban or pick from what is left.
    Prompt {
        racer: String,
        verb: Verb,
        kind: Kind,
        items: Vec<String>,
    },
    /// Asks the active racer whether to veto the last pick.
    Offer {
        racer: String,
        item: String,
        vetos: Count,
    },
    Report {
        racers: [String; 2],
    },
    Completed {
        winner: String,
        loser: String,
        wins: Count,
        losses: Count,
    },
    Status(Summary),
    Timezone {
        user: String,
        zone: Option<String>,
    },
    TimezoneSet {
        user: String,
        zone: String,
    },
    /// Scheduled matches, soonest first.
    Upcoming {
        tournament: String,
        matches: Vec<Summary>,
    },
    State {
        json: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Ban,
    Pick,
}

/// Read-only overview of a match, rendered by the `status` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub racers: [String; 2],
    pub phase: Phase,
    pub turn: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub caster: Option<String>,
    pub characters: Vec<String>,
    pub builds: Vec<String>,
    pub vetos: [Count; 2],
    pub score: Option<[Count; 2]>,
}

impl Summary {
    pub fn of(record: &Match) -> Self {
        Self {
            racers: Seat::ALL.map(|s| record.racer(s).username.clone()),
            phase: record.phase(),
            turn: record
                .phase()
                .is_turn_based()
                .then(|| record.racer(record.turn()).username.clone()),
            time: record.schedule().map(|p| p.time),
            caster: record
                .casting()
                .filter(|c| c.is_bound())
                .map(|c| c.caster.to_string()),
            characters: record.pool(Kind::Character).chosen().to_vec(),
            builds: record.pool(Kind::Build).chosen().to_vec(),
            vetos: Seat::ALL.map(|s| record.vetos(s)),
            score: record.score(),
        }
    }
}

fn when(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn listing(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn joined(items: &[String]) -> String {
    match items.is_empty() {
        true => String::from("none"),
        false => items.join(", "),
    }
}

impl Display for Verb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ban => write!(f, "ban"),
            Self::Pick => write!(f, "pick"),
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} vs. {}", self.racers[0], self.racers[1])?;
        writeln!(f, "phase: {}", self.phase)?;
        if let Some(turn) = &self.turn {
            writeln!(f, "turn: {}", turn)?;
        }
        match &self.time {
            Some(time) => writeln!(f, "time: {}", when(time))?,
            None => writeln!(f, "time: not scheduled")?,
        }
        writeln!(f, "caster: {}", self.caster.as_deref().unwrap_or("none"))?;
        writeln!(f, "characters: {}", joined(&self.characters))?;
        writeln!(f, "builds: {}", joined(&self.builds))?;
        write!(f, "vetos: {} / {}", self.vetos[0], self.vetos[1])?;
        if let Some([a, b]) = self.score {
            write!(f, "\nscore: {}-{}", a, b)?;
        }
        Ok(())
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opened { racers, best_of } => write!(
                f,
                "Match: {} vs. {} (best of {}). Suggest a time with `!time YYYY-MM-DD HH:MM` in your `!timezone` (UTC if unset).",
                racers[0], racers[1], best_of
            ),
            Self::Closed => write!(f, "This match has been closed."),
            Self::Proposed {
                racer,
                opponent,
                time,
            } => write!(
                f,
                "{} suggested {}. {}, type `!timeok` to agree.",
                racer,
                when(time),
                opponent
            ),
            Self::Scheduled { time } => write!(f, "The match is scheduled for {}.", when(time)),
            Self::Unscheduled { racer } => {
                write!(f, "{} deleted the scheduled time. Suggest a new one with `!time`.", racer)
            }
            Self::Time { time: None, .. } => write!(f, "No time has been suggested yet."),
            Self::Time {
                time: Some(time),
                agreed: true,
            } => write!(f, "The match is scheduled for {}.", when(time)),
            Self::Time {
                time: Some(time),
                agreed: false,
            } => write!(f, "{} has been suggested but not agreed yet.", when(time)),
            Self::Volunteered { caster, racers } => write!(
                f,
                "{} wants to cast this match. {} and {}, type `!casterok` or `!casternotok`.",
                caster, racers[0], racers[1]
            ),
            Self::Approved { racer, caster } => write!(f, "{} is okay with {} casting.", racer, caster),
            Self::Bound { caster } => write!(f, "{} will cast this match.", caster),
            Self::Rejected { caster } => write!(f, "{} will not cast this match.", caster),
            Self::Withdrawn { caster } => write!(f, "{} no longer wants to cast this match.", caster),
            Self::Caster { caster: None, .. } => write!(f, "Nobody has volunteered to cast yet."),
            Self::Caster {
                caster: Some(caster),
                bound: true,
            } => write!(f, "{} is casting this match.", caster),
            Self::Caster {
                caster: Some(caster),
                bound: false,
            } => write!(f, "{} volunteered to cast and is waiting for approval.", caster),
            Self::Preferred { user, preference } => match preference {
                Preference::AlwaysApprove => write!(f, "{} now approves every caster.", user),
                Preference::AlwaysReject => write!(f, "{} now rejects every caster.", user),
                Preference::Ask => write!(f, "{} will be asked about every caster.", user),
            },
            Self::WindowOpen { time } => match time {
                Some(time) => write!(
                    f,
                    "It is {}. Casters can still volunteer with `!cast` before the draft begins.",
                    when(time)
                ),
                None => write!(f, "Casters can volunteer with `!cast` before the draft begins."),
            },
            Self::Begun { kind, first } => {
                write!(f, "The {} draft begins. {} goes first.", kind, first)
            }
            Self::Banned { racer, item } => write!(f, "{} banned *{}*.", racer, item),
            Self::Picked {
                racer,
                item,
                remaining,
            } => write!(f, "{} picked *{}*. {} left to pick.", racer, item, remaining),
            Self::Vetoed { racer, item, vetos } => write!(
                f,
                "{} vetoed *{}* and has {} veto{} left.",
                racer,
                item,
                vetos,
                if *vetos == 1 { "" } else { "s" }
            ),
            Self::Declined { racer } => write!(f, "{} does not veto.", racer),
            Self::Accepted { kind, chosen } => {
                write!(f, "The {} are locked in: {}.", kind.plural(), joined(chosen))
            }
            Self::Prompt {
                racer,
                verb,
                kind,
                items,
            } => write!(
                f,
                "{}, {} a {} with `!{} [number]`:\n{}",
                racer,
                verb,
                kind,
                verb,
                listing(items)
            ),
            Self::Offer { racer, item, vetos } => write!(
                f,
                "{}, do you want to veto *{}*? You have {} left. Type `!yes` or `!no`.",
                racer, item, vetos
            ),
            Self::Report { racers } => write!(
                f,
                "Good luck, {} and {}! When you are done, report with `!score [your wins] [their wins]`.",
                racers[0], racers[1]
            ),
            Self::Completed {
                winner,
                loser,
                wins,
                losses,
            } => write!(f, "{} defeated {} {}-{}. GG!", winner, loser, wins, losses),
            Self::Status(summary) => write!(f, "{}", summary),
            Self::Timezone { user, zone: None } => {
                write!(f, "{} has no time zone set, so times are read as UTC.", user)
            }
            Self::Timezone {
                user,
                zone: Some(zone),
            } => write!(f, "{} reads times in {}.", user, zone),
            Self::TimezoneSet { user, zone } => write!(f, "{} now reads times in {}.", user, zone),
            Self::Upcoming { matches, .. } if matches.is_empty() => {
                write!(f, "No matches are scheduled.")
            }
            Self::Upcoming {
                tournament,
                matches,
            } => {
                write!(f, "Upcoming in {}:", tournament)?;
                for summary in matches {
                    write!(f, "\n- {} vs. {}", summary.racers[0], summary.racers[1])?;
                    if let Some(time) = &summary.time {
                        write!(f, ", {}", when(time))?;
                    }
                    if let Some(caster) = &summary.caster {
                        write!(f, " (cast by {})", caster)?;
                    }
                }
                Ok(())
            }
            Self::State { json } => write!(f, "```json\n{}\n```", json),
        }
    }
}
