use super::*;
use std::path::Path;

/// Participant names decoded once from a Challonge tournament export.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    title: String,
    participants: Vec<Participant>,
}

impl Roster {
    pub fn decode(json: &str) -> Result<Self, BracketError> {
        let Envelope { tournament } = serde_json::from_str(json)?;
        log::info!(
            "[bracket] loaded {} ({} participants)",
            tournament.name,
            tournament.participants.len()
        );
        Ok(Self {
            title: tournament.name,
            participants: tournament
                .participants
                .into_iter()
                .map(|e| e.participant)
                .collect(),
        })
    }
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BracketError> {
        Self::decode(&std::fs::read_to_string(path)?)
    }
    pub fn lookup(&self, participant: Entrant) -> String {
        self.participants
            .iter()
            .find(|p| p.answers_to(participant))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| unknown(participant))
    }
}

#[async_trait::async_trait]
impl Bracket for Roster {
    async fn name(&self, participant: Entrant) -> String {
        self.lookup(participant)
    }
    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "tournament": {
            "id": 4242,
            "name": "Season 3",
            "url": "season3",
            "state": "underway",
            "participants": [
                {"participant": {"id": 10, "name": "alice", "group_player_ids": [501]}},
                {"participant": {"id": 11, "name": "bob", "group_player_ids": []}},
                {"participant": {"id": 12, "name": "carol"}}
            ]
        }
    }"#;

    #[test]
    fn resolves_main_and_group_ids() {
        let roster = Roster::decode(EXPORT).unwrap();
        assert_eq!(roster.title(), "Season 3");
        assert_eq!(roster.lookup(11), "bob");
        assert_eq!(roster.lookup(501), "alice");
        assert_eq!(roster.lookup(12), "carol");
    }
    #[test]
    fn unknown_ids_fall_back() {
        let roster = Roster::decode(EXPORT).unwrap();
        assert_eq!(roster.lookup(9), "Unknown-9");
        assert_eq!(Roster::default().lookup(10), "Unknown-10");
    }
    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(Roster::decode("{\"tournament\": 3}"), Err(BracketError::Json(_))));
    }
    #[tokio::test]
    async fn trait_lookup_matches_roster() {
        let roster = Roster::decode(EXPORT).unwrap();
        let bracket: &dyn Bracket = &roster;
        assert_eq!(bracket.name(10).await, "alice");
    }
}
