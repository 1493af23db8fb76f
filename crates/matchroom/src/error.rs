use duel_draft::DraftError;
use duel_negotiation::NegotiationError;
use duel_pg::PgErr;
use duel_records::RulesError;

/// Why a command produced no transition.
/// Rendered back to the channel the command came from.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("you can only use that command in a match channel")]
    NotAMatchChannel,
    #[error("only the two racers can do that")]
    NotAParticipant,
    #[error("{0}")]
    WrongPhase(String),
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("{0}")]
    InvalidArgument(String),
    #[error("you have already used all of your vetos for the match")]
    NoVetosRemaining,
    #[error("only tournament staff can do that")]
    NotAdmin,
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StoreError),
    #[error("could not deliver message: {0}")]
    TransportFailure(#[from] TransportError),
    #[error("the match kept changing underneath this command, try again")]
    Conflict,
}

impl From<DraftError> for MatchError {
    fn from(e: DraftError) -> Self {
        match e {
            DraftError::WrongPhase(reason) => Self::WrongPhase(reason.to_string()),
            DraftError::NotYourTurn => Self::NotYourTurn,
            DraftError::InvalidIndex(_) => Self::InvalidArgument(e.to_string()),
            DraftError::NoVetosRemaining => Self::NoVetosRemaining,
        }
    }
}

impl From<NegotiationError> for MatchError {
    fn from(e: NegotiationError) -> Self {
        match e {
            NegotiationError::WrongPhase(reason) => Self::WrongPhase(reason.to_string()),
            NegotiationError::NotYourTurn => Self::NotYourTurn,
            NegotiationError::NotTheCaster => Self::InvalidArgument(e.to_string()),
            NegotiationError::InvalidArgument(reason) => Self::InvalidArgument(reason),
        }
    }
}

impl From<RulesError> for MatchError {
    fn from(e: RulesError) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

/// Storage collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Postgres(#[from] PgErr),
    /// The stored revision moved since the record was loaded,
    /// or the key was already taken on create.
    #[error("revision conflict")]
    Conflict,
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Chat transport failures. Never fatal; the transition already committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
    #[error("{0}")]
    Failed(String),
}
