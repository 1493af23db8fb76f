/// Reasons a negotiation step is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    #[error("{0}")]
    WrongPhase(&'static str),
    #[error("it is up to your opponent to answer")]
    NotYourTurn,
    #[error("only the volunteer can withdraw")]
    NotTheCaster,
    #[error("{0}")]
    InvalidArgument(String),
}
