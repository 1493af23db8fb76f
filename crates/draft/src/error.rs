/// Reasons the draft engine refuses an action.
/// A refused action never touches the record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{0}")]
    WrongPhase(&'static str),
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("there is no item number {}", .0 + 1)]
    InvalidIndex(usize),
    #[error("you have no vetos remaining")]
    NoVetosRemaining,
}
