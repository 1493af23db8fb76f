use serde::Serialize;

/// One of the two successive draftable pools.
/// Both are drafted by the identical ban/pick/veto algorithm.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum Kind {
    Character,
    Build,
}

impl Kind {
    /// Both kinds in draft order.
    pub const ALL: [Kind; 2] = [Kind::Character, Kind::Build];
    pub fn index(&self) -> usize {
        match self {
            Self::Character => 0,
            Self::Build => 1,
        }
    }
    /// The kind drafted after this one, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Character => Some(Self::Build),
            Self::Build => None,
        }
    }
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Character => "characters",
            Self::Build => "builds",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::Build => write!(f, "build"),
        }
    }
}
