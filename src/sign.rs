#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// The value a variable must take for a literal of this sign to hold
    #[inline]
    pub fn value(self) -> bool {
        matches!(self, Sign::Positive)
    }
}

impl From<bool> for Sign {
    #[inline]
    fn from(x: bool) -> Self {
        if x {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

impl std::ops::Not for Sign {
    type Output = Sign;

    #[inline]
    fn not(self) -> Self::Output {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", if self == &Sign::Negative { "¬" } else { "" },)
    }
}

impl std::fmt::Debug for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", if self == &Sign::Positive { "+" } else { "-" },)
    }
}

#[test]
fn sign_round_trips_through_bool() {
    assert_eq!(Sign::from(true), Sign::Positive);
    assert_eq!(Sign::from(false), Sign::Negative);
    assert!(Sign::Positive.value());
    assert!(!Sign::Negative.value());
    assert_eq!(!Sign::Positive, Sign::Negative);
}
