use crate::{sign::Sign, Evaluate, Valuation, Variable};

/// A variable together with the polarity under which it holds
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Literal {
    code: Variable,
}

impl Literal {
    /// The largest variable a literal can hold
    pub const MAX_VAR: Variable = (Variable::MAX >> 1) - 1;

    #[inline]
    pub fn new(var: Variable, sign: impl Into<Sign>) -> Self {
        assert!(var <= Self::MAX_VAR, "x{} is out of range", var);
        let sign = sign.into();
        Literal {
            code: (var << 1) | matches!(sign, Sign::Positive) as Variable,
        }
    }

    #[inline]
    pub fn positive(var: Variable) -> Self {
        Self::new(var, Sign::Positive)
    }

    #[inline]
    pub fn negative(var: Variable) -> Self {
        Self::new(var, Sign::Negative)
    }

    #[inline]
    pub(crate) fn code(self) -> Variable {
        self.code
    }

    #[inline]
    pub fn var(self) -> Variable {
        self.code >> 1
    }

    #[inline]
    pub fn sign(self) -> Sign {
        ((self.code & 1) == 1).into()
    }

    /// Whether the literal holds when its variable is bound to `true`
    #[inline]
    pub fn is_positive(self) -> bool {
        self.sign().value()
    }

    /// Signed DIMACS form: `k` or `-k` for variable `k`
    pub fn to_dimacs(self) -> isize {
        let var = self.var() as isize;
        if self.is_positive() {
            var
        } else {
            -var
        }
    }
}

impl Evaluate for Literal {
    fn evaluate<V: Valuation + ?Sized>(&self, valuation: &V) -> Option<bool> {
        valuation
            .value(self.var())
            .map(|value| value == self.is_positive())
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    #[inline]
    fn not(self) -> Self::Output {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl From<isize> for Literal {
    fn from(x: isize) -> Self {
        assert_ne!(x, 0, "literals can only be parsed from non-zero inputs");
        Self::new(x.unsigned_abs(), x > 0)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.sign(), self.var())
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}{}", self.sign(), self.var())
    }
}

#[test]
fn literal_packing() {
    let lit = Literal::new(7, false);
    assert_eq!(lit.var(), 7);
    assert_eq!(lit.sign(), Sign::Negative);
    assert_eq!(!lit, Literal::positive(7));
    assert_eq!((!lit).var(), 7);
    assert_eq!(Literal::from(-7), lit);
    assert_eq!(Literal::from(3).to_dimacs(), 3);
    assert_eq!(lit.to_dimacs(), -7);
    assert_eq!(format!("{}", lit), "¬x7");
}

#[test]
fn literal_evaluation() {
    use crate::Assignment;

    let v0 = Literal::positive(0);
    assert_eq!(v0.evaluate(&Assignment::new()), None);
    assert_eq!(v0.evaluate(&Assignment::from_iter([(0, true)])), Some(true));
    assert_eq!(v0.evaluate(&Assignment::from_iter([(0, false)])), Some(false));
    assert_eq!((!v0).evaluate(&Assignment::from_iter([(0, false)])), Some(true));
}
