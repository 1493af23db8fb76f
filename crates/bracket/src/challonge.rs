use duel_core::Entrant;
use serde::Deserialize;

/// Top-level shape of a Challonge tournament export
/// (`tournaments/<url>.json?include_participants=1`).
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub tournament: Tournament,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tournament {
    pub id: Entrant,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub participants: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub participant: Participant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    pub id: Entrant,
    pub name: String,
    /// Ids the same participant carries inside group stages.
    #[serde(default)]
    pub group_player_ids: Vec<Entrant>,
}

impl Participant {
    pub fn answers_to(&self, id: Entrant) -> bool {
        self.id == id || self.group_player_ids.contains(&id)
    }
}
