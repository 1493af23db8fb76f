//! Bracket provider.
//!
//! Matches only know the bracket's participant ids. Display names are
//! resolved through a [`Bracket`] when a match is rendered.
mod challonge;
mod roster;

pub use challonge::*;
pub use roster::*;

use duel_core::Entrant;

/// Resolves participant ids to the names the bracket shows.
#[async_trait::async_trait]
pub trait Bracket: Send + Sync {
    /// Display name of a participant. Never fails: unknown ids render
    /// as `Unknown-<id>`.
    async fn name(&self, participant: Entrant) -> String;
    /// Tournament title, for headers.
    fn title(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum BracketError {
    #[error("read bracket file: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode bracket json: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn unknown(participant: Entrant) -> String {
    format!("Unknown-{}", participant)
}
