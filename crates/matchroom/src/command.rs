use super::*;
use chrono::DateTime;
use chrono::Utc;
use duel_core::Count;
use chrono_tz::Tz;
use duel_core::Handle;
use duel_negotiation::parse_time;
use duel_negotiation::parse_zone;
use duel_records::Member;
use duel_records::Preference;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Every chat command the bot answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Status,
    Timezone,
    GetTimezone,
    GetNext,
    Schedule,
    Time,
    TimeOk,
    TimeDelete,
    Cast,
    CastCancel,
    Caster,
    CasterOk,
    CasterNotOk,
    CasterAlwaysOk,
    CasterAlwaysNotOk,
    Ban,
    Pick,
    Yes,
    No,
    Score,
    ForceTime,
    ForceTimeOk,
    ForceTimeDelete,
    ForceCastCancel,
    SetCasterOk,
    SetCasterNotOk,
    SetCasterAlwaysOk,
    SetCasterAlwaysNotOk,
    ForceBan,
    ForcePick,
    ForceYes,
    ForceNo,
    ForceScore,
    ForceAdvance,
    GetState,
    SetTimezone,
}

/// Command names and aliases, built once.
#[rustfmt::skip]
static REGISTRY: LazyLock<HashMap<&'static str, Command>> = LazyLock::new(|| {
    HashMap::from([
        ("help",                 Command::Help),
        ("commands",             Command::Help),
        ("status",               Command::Status),
        ("timezone",             Command::Timezone),
        ("gettimezone",          Command::GetTimezone),
        ("getnext",              Command::GetNext),
        ("schedule",             Command::Schedule),
        ("time",                 Command::Time),
        ("timeok",               Command::TimeOk),
        ("timedelete",           Command::TimeDelete),
        ("cast",                 Command::Cast),
        ("castcancel",           Command::CastCancel),
        ("cancelcast",           Command::CastCancel),
        ("castdelete",           Command::CastCancel),
        ("deletecast",           Command::CastCancel),
        ("caster",               Command::Caster),
        ("casterok",             Command::CasterOk),
        ("casternotok",          Command::CasterNotOk),
        ("casteralwaysok",       Command::CasterAlwaysOk),
        ("casteralwaysnotok",    Command::CasterAlwaysNotOk),
        ("ban",                  Command::Ban),
        ("pick",                 Command::Pick),
        ("yes",                  Command::Yes),
        ("no",                   Command::No),
        ("score",                Command::Score),
        ("forcetime",            Command::ForceTime),
        ("timeforce",            Command::ForceTime),
        ("forcetimeok",          Command::ForceTimeOk),
        ("timeokforce",          Command::ForceTimeOk),
        ("forcetimedelete",      Command::ForceTimeDelete),
        ("timedeleteforce",      Command::ForceTimeDelete),
        ("forcecastcancel",      Command::ForceCastCancel),
        ("castcancelforce",      Command::ForceCastCancel),
        ("setcasterok",          Command::SetCasterOk),
        ("casterokset",          Command::SetCasterOk),
        ("setcasternotok",       Command::SetCasterNotOk),
        ("casternotokset",       Command::SetCasterNotOk),
        ("setcasteralwaysok",    Command::SetCasterAlwaysOk),
        ("casteralwaysokset",    Command::SetCasterAlwaysOk),
        ("setcasteralwaysnotok", Command::SetCasterAlwaysNotOk),
        ("casteralwaysnotokset", Command::SetCasterAlwaysNotOk),
        ("forceban",             Command::ForceBan),
        ("banforce",             Command::ForceBan),
        ("forcepick",            Command::ForcePick),
        ("pickforce",            Command::ForcePick),
        ("forceyes",             Command::ForceYes),
        ("yesforce",             Command::ForceYes),
        ("forceno",              Command::ForceNo),
        ("noforce",              Command::ForceNo),
        ("forcescore",           Command::ForceScore),
        ("scoreforce",           Command::ForceScore),
        ("forceadvance",         Command::ForceAdvance),
        ("advanceforce",         Command::ForceAdvance),
        ("getstate",             Command::GetState),
        ("settimezone",          Command::SetTimezone),
        ("timezoneset",          Command::SetTimezone),
    ])
});

/// What a parsed command asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Help,
    /// Shows a member's time zone, or sets it when `zone` is given.
    /// `user` is the author when absent.
    Timezone {
        user: Option<Handle<Member>>,
        zone: Option<Tz>,
    },
    /// Lists scheduled matches; only the soonest unless `all`.
    Upcoming {
        all: bool,
    },
    Act {
        action: Action,
        stand: Option<Stand>,
    },
}

impl Request {
    fn act(action: Action) -> Self {
        Self::Act {
            action,
            stand: None,
        }
    }
    fn force(action: Action, stand: Stand) -> Self {
        Self::Act {
            action,
            stand: Some(stand),
        }
    }
}

impl Command {
    /// Splits a chat message into a known command and its arguments.
    /// Messages without the prefix, or naming no known command, yield `None`.
    pub fn parse(text: &str) -> Option<(Self, Vec<&str>)> {
        let mut words = text.trim().strip_prefix(duel_core::PREFIX)?.split_whitespace();
        let name = words.next()?.to_lowercase();
        REGISTRY.get(name.as_str()).map(|c| (*c, words.collect()))
    }

    /// Whether the arguments hold a time read in the author's time zone.
    pub fn reads_time(&self) -> bool {
        matches!(self, Self::Time | Self::ForceTime)
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::SetTimezone
                | Self::ForceTime
                | Self::ForceTimeOk
                | Self::ForceTimeDelete
                | Self::ForceCastCancel
                | Self::SetCasterOk
                | Self::SetCasterNotOk
                | Self::SetCasterAlwaysOk
                | Self::SetCasterAlwaysNotOk
                | Self::ForceBan
                | Self::ForcePick
                | Self::ForceYes
                | Self::ForceNo
                | Self::ForceScore
                | Self::ForceAdvance
                | Self::GetState
        )
    }

    /// Reads the arguments into a typed request. Times are read in `zone`.
    pub fn request(&self, args: &[&str], now: DateTime<Utc>, zone: Tz) -> Result<Request, MatchError> {
        let named = || {
            args.first()
                .map(|name| Stand::Named(name.to_string()))
                .ok_or_else(|| MatchError::InvalidArgument("name the racer to act for".into()))
        };
        let optional = || {
            args.first()
                .map(|name| Stand::Named(name.to_string()))
                .unwrap_or(Stand::Active)
        };
        Ok(match self {
            Self::Help => Request::Help,
            Self::Timezone => Request::Timezone {
                user: None,
                zone: args.first().map(|z| parse_zone(z)).transpose()?,
            },
            Self::GetTimezone => Request::Timezone {
                user: args.first().map(|u| Handle::from(*u)),
                zone: None,
            },
            Self::SetTimezone => match args {
                [user, zone] => Request::Timezone {
                    user: Some(Handle::from(*user)),
                    zone: Some(parse_zone(zone)?),
                },
                _ => {
                    return Err(MatchError::InvalidArgument(
                        "use `!settimezone [user] [zone]`".into(),
                    ));
                }
            },
            Self::GetNext => Request::Upcoming { all: false },
            Self::Schedule => Request::Upcoming { all: true },
            Self::Status => Request::act(Action::Status),
            Self::GetState => Request::force(Action::State, Stand::Active),
            Self::Time if args.is_empty() => Request::act(Action::Time),
            Self::Time => Request::act(Action::Propose(parse_time(&args.join(" "), now, zone)?)),
            Self::TimeOk => Request::act(Action::Confirm),
            Self::TimeDelete => Request::act(Action::Unschedule),
            Self::Cast => Request::act(Action::Volunteer),
            Self::CastCancel => Request::act(Action::Withdraw),
            Self::Caster => Request::act(Action::Caster),
            Self::CasterOk => Request::act(Action::Approve),
            Self::CasterNotOk => Request::act(Action::Reject),
            Self::CasterAlwaysOk => Request::act(Action::Prefer(Preference::AlwaysApprove)),
            Self::CasterAlwaysNotOk => Request::act(Action::Prefer(Preference::AlwaysReject)),
            Self::Ban | Self::Pick if args.is_empty() => Request::act(Action::Remaining),
            Self::Ban => Request::act(Action::Ban(index(args[0])?)),
            Self::Pick => Request::act(Action::Pick(index(args[0])?)),
            Self::Yes => Request::act(Action::Veto),
            Self::No => Request::act(Action::Decline),
            Self::Score => {
                let (a, b) = score(args)?;
                Request::act(Action::Score(a, b))
            }
            Self::ForceTime => {
                let stand = named()?;
                let when = args[1..].join(" ");
                Request::force(Action::Propose(parse_time(&when, now, zone)?), stand)
            }
            Self::ForceTimeOk => Request::force(Action::Confirm, optional()),
            Self::ForceTimeDelete => Request::force(Action::Unschedule, optional()),
            Self::ForceCastCancel => Request::force(Action::Withdraw, Stand::Active),
            Self::SetCasterOk => Request::force(Action::Approve, named()?),
            Self::SetCasterNotOk => Request::force(Action::Reject, named()?),
            Self::SetCasterAlwaysOk => {
                Request::force(Action::Prefer(Preference::AlwaysApprove), named()?)
            }
            Self::SetCasterAlwaysNotOk => {
                Request::force(Action::Prefer(Preference::AlwaysReject), named()?)
            }
            Self::ForceBan => Request::force(Action::Ban(index(first(args)?)?), Stand::Active),
            Self::ForcePick => Request::force(Action::Pick(index(first(args)?)?), Stand::Active),
            Self::ForceYes => Request::force(Action::Veto, Stand::Active),
            Self::ForceNo => Request::force(Action::Decline, Stand::Active),
            Self::ForceScore => {
                let stand = named()?;
                let (a, b) = score(&args[1..])?;
                Request::force(Action::Score(a, b), stand)
            }
            Self::ForceAdvance => Request::force(Action::Advance, Stand::Active),
        })
    }
}

fn first<'a>(args: &[&'a str]) -> Result<&'a str, MatchError> {
    args.first()
        .copied()
        .ok_or_else(|| MatchError::InvalidArgument("give the number of the item".into()))
}

/// Reads a 1-based item number into a 0-based index.
fn index(arg: &str) -> Result<usize, MatchError> {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| MatchError::InvalidArgument(format!("\"{}\" is not an item number", arg)))
}

/// Reads `a b` or `a-b`.
fn score(args: &[&str]) -> Result<(Count, Count), MatchError> {
    let usage = || MatchError::InvalidArgument("report with `!score [your wins] [their wins]`".into());
    let parts: Vec<&str> = match args {
        [one] => one.split('-').collect(),
        [a, b] => vec![*a, *b],
        _ => return Err(usage()),
    };
    match parts.as_slice() {
        [a, b] => Ok((
            a.trim().parse().map_err(|_| usage())?,
            b.trim().parse().map_err(|_| usage())?,
        )),
        _ => Err(usage()),
    }
}

/// Text of the `help` command.
pub const HELP: &str = "\
Match commands:
```
!status                  Show the state of this match
!timezone [zone]         Show or set your time zone (e.g. Europe/Berlin)
!gettimezone [user]      Show someone's time zone
!getnext                 Show the next scheduled match
!schedule                Show every scheduled match
!time                    Show the suggested or scheduled time
!time [date & time]      Suggest a time (YYYY-MM-DD HH:MM, your time zone)
!timeok                  Agree to the suggested time
!timedelete              Delete the scheduled time
!cast                    Volunteer to cast this match
!castcancel              Withdraw as caster
!caster                  Show who volunteered to cast
!casterok                Approve the caster
!casternotok             Reject the caster
!casteralwaysok          Approve every caster from now on
!casteralwaysnotok       Reject every caster from now on
!ban [number]            Ban an item
!pick [number]           Pick an item
!yes                     Veto the last pick
!no                      Keep the last pick
!score [you] [them]      Report the final score, your wins first
```";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }
    fn request(text: &str) -> Result<Request, MatchError> {
        let (command, args) = Command::parse(text).unwrap();
        command.request(&args, now(), Tz::UTC)
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(Command::parse("!cancelcast").map(|c| c.0), Some(Command::CastCancel));
        assert_eq!(Command::parse("!BanForce 2").map(|c| c.0), Some(Command::ForceBan));
        assert_eq!(Command::parse("!nonsense"), None);
        assert_eq!(Command::parse("pick 1"), None);
    }
    #[test]
    fn indices_are_one_based() {
        assert_eq!(request("!pick 1").unwrap(), Request::act(Action::Pick(0)));
        assert!(matches!(request("!pick 0"), Err(MatchError::InvalidArgument(_))));
        assert!(matches!(request("!ban x"), Err(MatchError::InvalidArgument(_))));
        assert_eq!(request("!ban").unwrap(), Request::act(Action::Remaining));
    }
    #[test]
    fn scores_read_both_forms() {
        assert_eq!(request("!score 2 1").unwrap(), Request::act(Action::Score(2, 1)));
        assert_eq!(request("!score 1-2").unwrap(), Request::act(Action::Score(1, 2)));
        assert!(request("!score 2").is_err());
    }
    #[test]
    fn times_parse_with_spaces() {
        let time = Utc.with_ymd_and_hms(2030, 1, 2, 18, 0, 0).unwrap();
        assert_eq!(
            request("!time 2030-01-02 18:00").unwrap(),
            Request::act(Action::Propose(time))
        );
        assert_eq!(
            request("!forcetime bob 2030-01-02 18:00").unwrap(),
            Request::force(Action::Propose(time), Stand::Named("bob".into()))
        );
    }
    #[test]
    fn admin_commands_are_marked() {
        for command in REGISTRY.values() {
            let forced = command
                .request(&["alice", "2", "1"], now(), Tz::UTC)
                .map(|r| {
                    matches!(
                        r,
                        Request::Act { stand: Some(_), .. }
                            | Request::Timezone { user: Some(_), zone: Some(_) }
                    )
                })
                .unwrap_or(command.is_admin());
            assert_eq!(forced, command.is_admin(), "{:?}", command);
        }
    }
    #[test]
    fn force_turn_commands_act_for_active_seat() {
        assert_eq!(
            request("!forcepick 3").unwrap(),
            Request::force(Action::Pick(2), Stand::Active)
        );
        assert_eq!(
            request("!setcasterok alice").unwrap(),
            Request::force(Action::Approve, Stand::Named("alice".into()))
        );
        assert!(request("!setcasterok").is_err());
    }
    #[test]
    fn times_are_read_in_the_given_zone() {
        let (command, args) = Command::parse("!time 2030-01-02 18:00").unwrap();
        assert!(command.reads_time());
        let time = Utc.with_ymd_and_hms(2030, 1, 2, 17, 0, 0).unwrap();
        assert_eq!(
            command.request(&args, now(), Tz::Europe__Paris).unwrap(),
            Request::act(Action::Propose(time))
        );
    }
    #[test]
    fn timezone_commands_read_their_arguments() {
        assert_eq!(
            request("!timezone America/Chicago").unwrap(),
            Request::Timezone {
                user: None,
                zone: Some(Tz::America__Chicago)
            }
        );
        assert_eq!(
            request("!gettimezone bob").unwrap(),
            Request::Timezone {
                user: Some(Handle::from("bob")),
                zone: None
            }
        );
        assert_eq!(
            request("!timezoneset bob Asia/Seoul").unwrap(),
            Request::Timezone {
                user: Some(Handle::from("bob")),
                zone: Some(Tz::Asia__Seoul)
            }
        );
        assert!(request("!timezone Nowhere/Special").is_err());
        assert!(request("!settimezone bob").is_err());
        assert!(Command::SetTimezone.is_admin());
        assert_eq!(request("!getnext").unwrap(), Request::Upcoming { all: false });
        assert_eq!(request("!schedule").unwrap(), Request::Upcoming { all: true });
    }
}
