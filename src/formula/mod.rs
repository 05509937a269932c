pub mod clause;
pub mod literal;

pub use clause::Clause;
pub use literal::Literal;

use fixedbitset::FixedBitSet;

use crate::{counters::Counters, Assignment, Evaluate, Valuation, Variable};

/// A conjunction of clauses. The empty formula is trivially true.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Formula {
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new(clauses: impl IntoIterator<Item = Clause>) -> Self {
        Self {
            clauses: clauses.into_iter().collect(),
        }
    }

    /// The canonical unsatisfiable formula: a single empty clause
    pub fn unsatisfiable() -> Self {
        Self {
            clauses: vec![Clause::empty()],
        }
    }

    #[inline]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether the formula contains the empty clause
    pub fn is_trivially_unsatisfiable(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    pub fn all_literals<'a>(&'a self) -> impl Iterator<Item = Literal> + 'a {
        self.clauses
            .iter()
            .flat_map(|clause| clause.literals().iter().copied())
    }

    pub fn all_variables<'a>(&'a self) -> impl Iterator<Item = Variable> + 'a {
        self.all_literals().map(|literal| literal.var())
    }

    pub fn max_variable(&self) -> Option<Variable> {
        self.all_variables().max()
    }

    pub fn num_variables(&self) -> Variable {
        self.max_variable().map(|x| x + 1).unwrap_or(0)
    }

    /// The distinct variables of the formula, ascending
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = FixedBitSet::with_capacity(self.num_variables());
        seen.extend(self.all_variables());
        seen.ones().collect()
    }

    /// The literals of all unit clauses, in clause order
    pub fn unit_literals<'a>(&'a self) -> impl Iterator<Item = Literal> + 'a {
        self.clauses.iter().filter_map(Clause::unit)
    }

    /// Substitutes a partial valuation: satisfied clauses are dropped and false
    /// literals are removed from the rest.
    pub fn assigning<V: Valuation + ?Sized>(&self, valuation: &V) -> Formula {
        Formula {
            clauses: self
                .clauses
                .iter()
                .filter_map(|clause| clause.propagating(valuation))
                .collect(),
        }
    }

    /// Performs one round of unit propagation.
    ///
    /// Unit clauses are kept so the required values stay implied; every other clause
    /// has the unit values substituted. Contradictory units, or a clause emptied by
    /// substitution, yield [`Formula::unsatisfiable`].
    pub fn propagating_units(&self) -> Formula {
        let mut units = Assignment::new();
        for literal in self.unit_literals() {
            if let Some(prior) = units.satisfy(literal) {
                if prior != literal.is_positive() {
                    return Formula::unsatisfiable();
                }
            }
        }

        let mut clauses = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            if clause.unit().is_some() {
                clauses.push(clause.clone());
                continue;
            }
            match clause.propagating(&units) {
                None => (),
                Some(replacement) if replacement.is_empty() => return Formula::unsatisfiable(),
                Some(replacement) => clauses.push(replacement),
            }
        }
        Formula { clauses }
    }

    /// Eliminates pure literals.
    ///
    /// Each pure variable is replaced by a unit clause carrying its polarity (ordered by
    /// variable), followed by the clauses which mention no pure variable.
    pub fn eliminating_pure_literals(&self) -> Formula {
        let pure = Counters::new(self).pure_literals().collect::<Assignment>();

        let units = pure.literals().map(Clause::from);
        let rest = self
            .clauses
            .iter()
            .filter(|clause| !clause.variables().any(|var| pure.contains(var)))
            .cloned();
        Formula {
            clauses: units.chain(rest).collect(),
        }
    }
}

impl Evaluate for Formula {
    fn evaluate<V: Valuation + ?Sized>(&self, valuation: &V) -> Option<bool> {
        let mut all_true = true;
        for clause in &self.clauses {
            match clause.evaluate(valuation) {
                Some(true) => (),
                Some(false) => return Some(false),
                None => all_true = false,
            }
        }
        if all_true {
            Some(true)
        } else {
            None
        }
    }
}

impl From<Vec<Clause>> for Formula {
    fn from(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }
}

impl From<Vec<Vec<Literal>>> for Formula {
    fn from(clauses: Vec<Vec<Literal>>) -> Self {
        Self {
            clauses: clauses.into_iter().map(Clause::new).collect(),
        }
    }
}

impl From<Vec<Vec<isize>>> for Formula {
    fn from(clauses: Vec<Vec<isize>>) -> Self {
        clauses
            .into_iter()
            .map(|clause| clause.into_iter().map(Literal::from).collect::<Vec<_>>())
            .collect::<Vec<_>>()
            .into()
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "T");
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[test]
fn formula_evaluation() {
    let formula = Formula::new(vec![
        Clause::from(Literal::positive(0)),
        Clause::from(Literal::negative(1)),
    ]);

    assert_eq!(formula.evaluate(&Assignment::new()), None);
    assert_eq!(formula.evaluate(&Assignment::from_iter([(0, true)])), None);
    assert_eq!(
        formula.evaluate(&Assignment::from_iter([(0, false)])),
        Some(false)
    );
    assert_eq!(
        formula.evaluate(&Assignment::from_iter([(1, true)])),
        Some(false)
    );
    assert_eq!(formula.evaluate(&Assignment::from_iter([(1, false)])), None);
    for a in [false, true] {
        for b in [false, true] {
            assert_eq!(
                formula.evaluate(&Assignment::from_iter([(0, a), (1, b)])),
                Some(a && !b)
            );
        }
    }

    assert_eq!(Formula::default().evaluate(&Assignment::new()), Some(true));
    assert_eq!(Formula::unsatisfiable().evaluate(&Assignment::new()), Some(false));
}

#[test]
fn formula_display() {
    assert_eq!(format!("{}", Formula::default()), "T");
    assert_eq!(
        format!("{}", Formula::from(vec![vec![1isize], vec![-2, 3]])),
        "(x1) ∧ (¬x2 ∨ x3)"
    );
}

#[test]
fn distinct_variables_are_sorted() {
    let formula = Formula::from(vec![vec![5isize, -2], vec![2, 9, -1]]);
    assert_eq!(formula.variables(), vec![1, 2, 5, 9]);
    assert_eq!(formula.num_variables(), 10);
}

#[test]
fn unit_propagation_substitutes_units() {
    let formula = Formula::from(vec![vec![1isize], vec![-1, 2, 3], vec![1, 4], vec![-2]]);
    assert_eq!(
        formula.propagating_units(),
        Formula::from(vec![vec![1isize], vec![3], vec![-2]])
    );

    let contradictory = Formula::from(vec![vec![1isize], vec![-1]]);
    assert_eq!(contradictory.propagating_units(), Formula::unsatisfiable());

    let emptied = Formula::from(vec![vec![1isize], vec![2], vec![-1, -2]]);
    assert_eq!(emptied.propagating_units(), Formula::unsatisfiable());
}

#[test]
fn pure_literal_elimination() {
    // x0 and x2 only occur positively, x1 occurs both ways
    let formula = Formula::new(vec![
        Clause::new(vec![
            Literal::positive(0),
            Literal::positive(1),
            Literal::positive(2),
        ]),
        Clause::new(vec![Literal::positive(0), Literal::negative(1)]),
    ]);
    assert_eq!(
        formula.eliminating_pure_literals(),
        Formula::new(vec![
            Clause::from(Literal::positive(0)),
            Clause::from(Literal::positive(2)),
        ])
    );

    let mixed = Formula::from(vec![vec![1isize, 2], vec![-1, -3], vec![3, -2], vec![-4, 1]]);
    assert_eq!(
        mixed.eliminating_pure_literals(),
        Formula::from(vec![vec![-4isize], vec![1, 2], vec![-1, -3], vec![3, -2]])
    );
}
