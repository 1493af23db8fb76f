use super::Member;
use super::Seat;
use duel_core::Handle;
use serde::Serialize;

/// A volunteered caster and which seats have approved them.
/// The caster is bound once both approvals hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Casting {
    pub caster: Handle<Member>,
    pub approvals: [bool; 2],
}

impl Casting {
    pub fn new(caster: Handle<Member>) -> Self {
        Self {
            caster,
            approvals: [false; 2],
        }
    }
    pub fn approve(&mut self, seat: Seat) {
        self.approvals[seat.index()] = true;
    }
    pub fn approved_by(&self, seat: Seat) -> bool {
        self.approvals[seat.index()]
    }
    pub fn is_bound(&self) -> bool {
        self.approvals.iter().all(|a| *a)
    }
}

/// Standing answer a participant gives to every caster volunteer.
/// Stored per member next to their time zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Preference {
    #[default]
    Ask,
    AlwaysApprove,
    AlwaysReject,
}

impl Preference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::AlwaysApprove => "always_approve",
            Self::AlwaysReject => "always_reject",
        }
    }
}

impl TryFrom<&str> for Preference {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "ask" => Ok(Self::Ask),
            "always_approve" => Ok(Self::AlwaysApprove),
            "always_reject" => Ok(Self::AlwaysReject),
            other => Err(format!("unknown preference {}", other)),
        }
    }
}

impl std::fmt::Display for Preference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use duel_pg::*;

    impl Schema for Preference {
        fn name() -> &'static str {
            PREFERENCES
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                PREFERENCES,
                " (
                    member      TEXT PRIMARY KEY,
                    preference  TEXT NOT NULL DEFAULT 'ask',
                    timezone    TEXT
                );"
            )
        }
        fn indices() -> &'static str {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn bound_after_both_approve() {
        let mut casting = Casting::new(Handle::from("caster"));
        assert!(!casting.is_bound());
        casting.approve(Seat::Two);
        assert!(casting.approved_by(Seat::Two));
        assert!(!casting.is_bound());
        casting.approve(Seat::One);
        assert!(casting.is_bound());
    }
    #[test]
    fn preferences_roundtrip() {
        for pref in [
            Preference::Ask,
            Preference::AlwaysApprove,
            Preference::AlwaysReject,
        ] {
            assert_eq!(Preference::try_from(pref.as_str()), Ok(pref));
        }
        assert_eq!(Preference::default(), Preference::Ask);
    }
    #[cfg(feature = "database")]
    #[test]
    fn preferences_table_keeps_the_zone() {
        use duel_pg::Schema;
        assert_eq!(Preference::name(), duel_pg::PREFERENCES);
        assert!(Preference::creates().contains("timezone    TEXT"));
        assert!(Preference::indices().is_empty());
    }
}
