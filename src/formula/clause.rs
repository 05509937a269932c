use crate::{formula::Literal, Evaluate, Valuation, Variable};

/// A disjunction of literals, no two of which share a variable
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

/// What a clause says about the remaining variables under a partial valuation
#[must_use]
#[derive(Debug, PartialEq)]
pub enum Status {
    /// Some literal is true
    Satisfied,
    /// Every literal is false
    Conflict,
    /// Every literal but this one is false, so it must be true
    Implied(Literal),
    /// At least two literals are still unassigned
    Open,
}

impl Clause {
    /// Creates a clause from its literals, in order.
    ///
    /// Panics if a variable appears more than once.
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        let literals = literals.into_iter().collect::<Vec<_>>();
        for (i, literal) in literals.iter().enumerate() {
            assert!(
                !mentions(&literals[..i], literal.var()),
                "variable x{} appears more than once in a clause",
                literal.var()
            );
        }
        Self { literals }
    }

    /// The empty clause, which no assignment satisfies
    pub fn empty() -> Self {
        Self {
            literals: Vec::new(),
        }
    }

    /// Builds a clause from literals that may repeat: duplicates are merged and
    /// `None` is returned when a variable occurs with both polarities.
    pub fn normalized(literals: impl IntoIterator<Item = Literal>) -> Option<Self> {
        let mut kept = Vec::new();
        for literal in literals {
            if !push_unique(&mut kept, literal) {
                return None;
            }
        }
        Some(Self { literals: kept })
    }

    #[inline]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn variables<'a>(&'a self) -> impl Iterator<Item = Variable> + 'a {
        self.literals.iter().map(|literal| literal.var())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// The single literal of a unit clause
    pub fn unit(&self) -> Option<Literal> {
        match self.literals.as_slice() {
            [literal] => Some(*literal),
            _ => None,
        }
    }

    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    /// The literal over `var`, if the clause mentions it
    pub fn literal_of(&self, var: Variable) -> Option<Literal> {
        self.literals.iter().copied().find(|literal| literal.var() == var)
    }

    pub fn max_variable(&self) -> Option<Variable> {
        max_var(&self.literals)
    }

    /// Resolves this clause with `other` on `var`.
    ///
    /// `var` must occur in both clauses with opposite polarities. The resolvent holds
    /// every other literal of both clauses, first-occurrence order, without repeats.
    /// Returns `None` when the resolvent is a tautology.
    pub fn resolution(&self, other: &Clause, var: Variable) -> Option<Clause> {
        match (self.literal_of(var), other.literal_of(var)) {
            (Some(a), Some(b)) if a == !b => (),
            _ => panic!(
                "cannot resolve {} with {} on x{}: it must occur with opposite polarities",
                self, other, var
            ),
        }

        let mut literals = Vec::with_capacity(self.len() + other.len() - 2);
        for literal in self
            .literals
            .iter()
            .chain(other.literals.iter())
            .filter(|literal| literal.var() != var)
        {
            if !push_unique(&mut literals, *literal) {
                return None;
            }
        }
        Some(Clause { literals })
    }

    /// Substitutes the bound variables: `None` if the clause became true, otherwise
    /// the clause without its false literals.
    pub fn propagating<V: Valuation + ?Sized>(&self, valuation: &V) -> Option<Clause> {
        let mut literals = Vec::with_capacity(self.len());
        for literal in &self.literals {
            match literal.evaluate(valuation) {
                Some(true) => return None,
                Some(false) => (),
                None => literals.push(*literal),
            }
        }
        Some(Clause { literals })
    }

    /// Classifies the clause under a partial valuation
    pub fn status<V: Valuation + ?Sized>(&self, valuation: &V) -> Status {
        let mut open = self
            .literals
            .iter()
            .copied()
            .filter(|literal| literal.evaluate(valuation).is_none());
        if self
            .literals
            .iter()
            .any(|literal| literal.evaluate(valuation) == Some(true))
        {
            return Status::Satisfied;
        }
        match (open.next(), open.next()) {
            (None, _) => Status::Conflict,
            (Some(literal), None) => Status::Implied(literal),
            (Some(_), Some(_)) => Status::Open,
        }
    }
}

fn mentions(literals: &[Literal], var: Variable) -> bool {
    literals.iter().any(|literal| literal.var() == var)
}

/// Appends `literal` unless already present. Returns `false` if its negation is.
fn push_unique(literals: &mut Vec<Literal>, literal: Literal) -> bool {
    if literals.contains(&!literal) {
        return false;
    }
    if !literals.contains(&literal) {
        literals.push(literal);
    }
    true
}

fn max_var(literals: &[Literal]) -> Option<Variable> {
    literals.iter().map(|literal| literal.var()).max()
}

impl Evaluate for Clause {
    fn evaluate<V: Valuation + ?Sized>(&self, valuation: &V) -> Option<bool> {
        let mut indeterminate = false;
        for literal in &self.literals {
            match literal.evaluate(valuation) {
                Some(true) => return Some(true),
                Some(false) => (),
                None => indeterminate = true,
            }
        }
        if indeterminate {
            None
        } else {
            Some(false)
        }
    }
}

impl From<Literal> for Clause {
    fn from(literal: Literal) -> Self {
        Self {
            literals: vec![literal],
        }
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        Self::new(literals)
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "F");
        }
        write!(f, "(")?;
        for (i, literal) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", literal)?;
        }
        write!(f, ")")
    }
}

impl std::fmt::Debug for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
use crate::Assignment;

#[test]
fn clause_evaluation() {
    let (v0, v1) = (Literal::positive(0), Literal::positive(1));
    let unit = Clause::from(v0);
    assert_eq!(unit.evaluate(&Assignment::new()), None);
    assert_eq!(unit.evaluate(&Assignment::from_iter([(0, true)])), Some(true));
    assert_eq!(unit.evaluate(&Assignment::from_iter([(0, false)])), Some(false));

    let binary = Clause::new(vec![v0, !v1]);
    assert_eq!(binary.evaluate(&Assignment::new()), None);
    assert_eq!(binary.evaluate(&Assignment::from_iter([(0, true)])), Some(true));
    assert_eq!(binary.evaluate(&Assignment::from_iter([(0, false)])), None);
    assert_eq!(binary.evaluate(&Assignment::from_iter([(1, true)])), None);
    assert_eq!(binary.evaluate(&Assignment::from_iter([(1, false)])), Some(true));
    for a in [false, true] {
        for b in [false, true] {
            assert_eq!(
                binary.evaluate(&Assignment::from_iter([(0, a), (1, b)])),
                Some(a || !b)
            );
        }
    }

    assert_eq!(Clause::empty().evaluate(&Assignment::new()), Some(false));
}

#[test]
#[should_panic(expected = "appears more than once")]
fn repeated_variable_is_rejected() {
    let _ = Clause::new(vec![Literal::positive(2), Literal::negative(2)]);
}

#[test]
fn normalizing_merges_repeats_and_drops_tautologies() {
    let (v0, v1) = (Literal::positive(0), Literal::positive(1));
    assert_eq!(
        Clause::normalized(vec![v1, v0, v1]),
        Some(Clause::new(vec![v1, v0]))
    );
    assert_eq!(Clause::normalized(vec![v0, v1, !v0]), None);
    assert_eq!(Clause::normalized(vec![]), Some(Clause::empty()));
}

#[test]
fn resolution() {
    let (v0, v1, v2, v3) = (
        Literal::positive(0),
        Literal::positive(1),
        Literal::positive(2),
        Literal::positive(3),
    );

    let left = Clause::new(vec![v0, v1, !v2]);
    let right = Clause::new(vec![!v0, !v2, v3]);
    assert_eq!(
        left.resolution(&right, 0),
        Some(Clause::new(vec![v1, !v2, v3]))
    );
    // Polarity may be either way round
    assert_eq!(
        right.resolution(&left, 0),
        Some(Clause::new(vec![!v2, v3, v1]))
    );

    // Resolving two units yields the empty clause
    assert_eq!(
        Clause::from(v1).resolution(&Clause::from(!v1), 1),
        Some(Clause::empty())
    );

    // A second clashing variable makes the resolvent tautological
    let clash = Clause::new(vec![!v0, !v1]);
    assert_eq!(left.resolution(&clash, 0), None);
}

#[test]
#[should_panic(expected = "opposite polarities")]
fn resolution_requires_a_clashing_pivot() {
    let (v0, v1) = (Literal::positive(0), Literal::positive(1));
    let _ = Clause::new(vec![v0, v1]).resolution(&Clause::new(vec![v0]), 0);
}

#[test]
fn clauses_over_large_variables() {
    let (low, high) = (Literal::positive(0), Literal::positive(Literal::MAX_VAR));
    let clause = Clause::new(vec![high, !low]);
    assert_eq!(clause.max_variable(), Some(Literal::MAX_VAR));
    assert_eq!(Clause::normalized(vec![high, !low, high]), Some(clause.clone()));
    assert_eq!(Clause::normalized(vec![high, !high]), None);
    assert_eq!(
        clause.resolution(&Clause::new(vec![!high, low]), Literal::MAX_VAR),
        None
    );
    assert_eq!(
        clause.resolution(&Clause::from(!high), Literal::MAX_VAR),
        Some(Clause::from(!low))
    );
}

#[test]
fn propagating_assignment() {
    let (v0, v1, v2) = (
        Literal::positive(0),
        Literal::positive(1),
        Literal::positive(2),
    );
    let clause = Clause::new(vec![v0, !v1, v2]);
    assert_eq!(
        clause.propagating(&Assignment::from_iter([(1, true)])),
        Some(Clause::new(vec![v0, v2]))
    );
    assert_eq!(clause.propagating(&Assignment::from_iter([(2, true)])), None);
    assert_eq!(
        clause.propagating(&Assignment::from_iter([(0, false), (1, true), (2, false)])),
        Some(Clause::empty())
    );
}

#[test]
fn status_under_partial_valuation() {
    let (v0, v1, v2) = (
        Literal::positive(0),
        Literal::positive(1),
        Literal::positive(2),
    );
    let clause = Clause::new(vec![v0, !v1, v2]);
    assert_eq!(clause.status(&Assignment::new()), Status::Open);
    assert_eq!(
        clause.status(&Assignment::from_iter([(0, false)])),
        Status::Open
    );
    assert_eq!(
        clause.status(&Assignment::from_iter([(0, false), (1, true)])),
        Status::Implied(v2)
    );
    assert_eq!(
        clause.status(&Assignment::from_iter([(0, false), (1, true), (2, false)])),
        Status::Conflict
    );
    assert_eq!(
        clause.status(&Assignment::from_iter([(1, false)])),
        Status::Satisfied
    );
}

#[test]
fn clause_display() {
    let clause = Clause::new(vec![Literal::positive(0), Literal::negative(1)]);
    assert_eq!(format!("{}", clause), "(x0 ∨ ¬x1)");
    assert_eq!(format!("{}", Clause::empty()), "F");
}
