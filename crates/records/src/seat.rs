use serde::Serialize;

/// One of the two participant slots of a match.
///
/// Order is fixed when the match is opened and reads as "1" / "2"
/// everywhere a participant has to be named.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    /// Both seats in order.
    pub const ALL: [Seat; 2] = [Seat::One, Seat::Two];
    /// The opposing seat.
    pub fn other(&self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
    /// 0-indexed slot for array access.
    pub fn index(&self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
    /// 1-indexed number for display and storage.
    pub fn number(&self) -> i16 {
        self.index() as i16 + 1
    }
}

impl TryFrom<i16> for Seat {
    type Error = i16;
    fn try_from(n: i16) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            n => Err(n),
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn other_flips() {
        assert_eq!(Seat::One.other(), Seat::Two);
        assert_eq!(Seat::Two.other(), Seat::One);
        assert_eq!(Seat::One.other().other(), Seat::One);
    }
    #[test]
    fn numbers_roundtrip() {
        for seat in Seat::ALL {
            assert_eq!(Seat::try_from(seat.number()), Ok(seat));
        }
        assert_eq!(Seat::try_from(0), Err(0));
        assert_eq!(Seat::try_from(3), Err(3));
    }
}
