use super::Kind;
use serde::Serialize;

/// Position of a match in its state machine.
///
/// ```text
/// Initial → Scheduled → CastAssignmentOpen → DraftingCharacters ⇄ VetoCharacters
///         → DraftingBuilds ⇄ VetoBuilds → ReportingScore → Completed
/// ```
///
/// Veto phases loop back to their drafting phase when a veto is spent
/// and move forward once both participants decline.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum Phase {
    Initial,
    Scheduled,
    CastAssignmentOpen,
    DraftingCharacters,
    VetoCharacters,
    DraftingBuilds,
    VetoBuilds,
    ReportingScore,
    Completed,
}

impl Phase {
    /// Drafting phase for a kind.
    pub fn drafting_of(kind: Kind) -> Self {
        match kind {
            Kind::Character => Self::DraftingCharacters,
            Kind::Build => Self::DraftingBuilds,
        }
    }
    /// Veto phase for a kind.
    pub fn veto_of(kind: Kind) -> Self {
        match kind {
            Kind::Character => Self::VetoCharacters,
            Kind::Build => Self::VetoBuilds,
        }
    }
    /// The kind being drafted, if this is a drafting phase.
    pub fn drafting(&self) -> Option<Kind> {
        match self {
            Self::DraftingCharacters => Some(Kind::Character),
            Self::DraftingBuilds => Some(Kind::Build),
            _ => None,
        }
    }
    /// The kind whose last pick is open to veto, if this is a veto phase.
    pub fn vetoing(&self) -> Option<Kind> {
        match self {
            Self::VetoCharacters => Some(Kind::Character),
            Self::VetoBuilds => Some(Kind::Build),
            _ => None,
        }
    }
    /// True if an active turn is meaningful in this phase.
    pub fn is_turn_based(&self) -> bool {
        self.drafting().is_some() || self.vetoing().is_some()
    }
    /// True while time and caster can still be negotiated.
    pub fn is_negotiating(&self) -> bool {
        matches!(
            self,
            Self::Initial | Self::Scheduled | Self::CastAssignmentOpen
        )
    }
    /// Storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Scheduled => "scheduled",
            Self::CastAssignmentOpen => "cast_assignment_open",
            Self::DraftingCharacters => "drafting_characters",
            Self::VetoCharacters => "veto_characters",
            Self::DraftingBuilds => "drafting_builds",
            Self::VetoBuilds => "veto_builds",
            Self::ReportingScore => "reporting_score",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for Phase {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "initial" => Ok(Self::Initial),
            "scheduled" => Ok(Self::Scheduled),
            "cast_assignment_open" => Ok(Self::CastAssignmentOpen),
            "drafting_characters" => Ok(Self::DraftingCharacters),
            "veto_characters" => Ok(Self::VetoCharacters),
            "drafting_builds" => Ok(Self::DraftingBuilds),
            "veto_builds" => Ok(Self::VetoBuilds),
            "reporting_score" => Ok(Self::ReportingScore),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown phase {}", other)),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
