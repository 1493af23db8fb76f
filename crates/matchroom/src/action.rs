use chrono::DateTime;
use chrono::Utc;
use duel_core::Count;
use duel_core::Handle;
use duel_records::Member;
use duel_records::Preference;

/// One typed operation on a match.
///
/// Indices are 0-based here; the command layer converts from the
/// 1-based numbers racers type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Propose(DateTime<Utc>),
    Confirm,
    Unschedule,
    Volunteer,
    Withdraw,
    Approve,
    Reject,
    Prefer(Preference),
    Ban(usize),
    Pick(usize),
    Veto,
    Decline,
    /// Reporter's wins first.
    Score(Count, Count),
    Advance,
    Time,
    Caster,
    Remaining,
    Status,
    State,
}

impl Action {
    /// Queries read the record and never commit.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::Time | Self::Caster | Self::Remaining | Self::Status | Self::State
        )
    }
    /// Actions only a racer of the match may take.
    pub fn needs_seat(&self) -> bool {
        matches!(
            self,
            Self::Propose(_)
                | Self::Confirm
                | Self::Unschedule
                | Self::Approve
                | Self::Reject
                | Self::Ban(_)
                | Self::Pick(_)
                | Self::Veto
                | Self::Decline
                | Self::Score(_, _)
        )
    }
}

/// Whose behalf an admin acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stand {
    /// Whichever seat holds the turn.
    Active,
    /// The racer with this name or handle.
    Named(String),
}

/// Who issued an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user: Handle<Member>,
    /// Set for admin overrides, which skip the turn and identity checks.
    pub forced: Option<Stand>,
}

impl Actor {
    pub fn racer(user: impl Into<Handle<Member>>) -> Self {
        Self {
            user: user.into(),
            forced: None,
        }
    }
    pub fn admin(user: impl Into<Handle<Member>>, stand: Stand) -> Self {
        Self {
            user: user.into(),
            forced: Some(stand),
        }
    }
    /// The scheduled-task collaborator.
    pub fn system() -> Self {
        Self::admin("system", Stand::Active)
    }
    pub fn is_forced(&self) -> bool {
        self.forced.is_some()
    }
}
