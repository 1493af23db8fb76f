use duel_core::Entrant;
use duel_core::Handle;
use serde::Deserialize;
use serde::Serialize;

/// Marker for chat channel handles.
#[derive(Debug)]
pub struct Channel;
/// Marker for chat user handles.
#[derive(Debug)]
pub struct Member;

/// A participant as the match sees them.
/// Fixed when the round opens the match and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Racer {
    pub user: Handle<Member>,
    pub username: String,
    /// Participant id in the bracket provider.
    pub participant: Entrant,
}

impl Racer {
    pub fn new(user: impl Into<Handle<Member>>, username: impl Into<String>, participant: Entrant) -> Self {
        Self {
            user: user.into(),
            username: username.into(),
            participant,
        }
    }
}
