use crate::{Formula, Literal, Variable};
use std::ops::Index;

pub type Count = usize;

/// Occurrence counts of every literal of a formula
pub struct Counters {
    /// Count of each literal (where each literal's code corresponds to its index)
    counts: Vec<Count>,
}

impl Counters {
    pub fn new(formula: &Formula) -> Self {
        // Two counters for each variable (one for each polarity)
        let mut counters = Self {
            counts: vec![0; formula.num_variables() * 2],
        };
        for literal in formula.all_literals() {
            counters.increment(literal);
        }
        counters
    }

    pub fn increment(&mut self, literal: Literal) {
        let idx = literal.code();
        if idx >= self.counts.len() {
            self.counts.resize(idx + 1, 0);
        }
        self.counts[idx] += 1;
    }

    pub fn num_variables(&self) -> Variable {
        (self.counts.len() + 1) / 2
    }

    /// Whether `literal` occurs while its negation never does
    pub fn is_pure(&self, literal: Literal) -> bool {
        self[literal] > 0 && self[!literal] == 0
    }

    /// Every pure literal, ordered by variable
    pub fn pure_literals<'a>(&'a self) -> impl Iterator<Item = Literal> + 'a {
        (0..self.num_variables())
            .flat_map(|var| [Literal::positive(var), Literal::negative(var)])
            .filter(move |literal| self.is_pure(*literal))
    }
}

impl Index<Literal> for Counters {
    type Output = Count;

    #[inline]
    fn index(&self, literal: Literal) -> &Self::Output {
        self.counts.get(literal.code()).unwrap_or(&0)
    }
}

#[test]
fn counting_literals() {
    let formula = Formula::from(vec![vec![1isize, -2], vec![1, 2, 3], vec![-3, 1]]);
    let counters = Counters::new(&formula);

    assert_eq!(counters[Literal::positive(1)], 3);
    assert_eq!(counters[Literal::negative(1)], 0);
    assert_eq!(counters[Literal::positive(2)], 1);
    assert_eq!(counters[Literal::negative(2)], 1);
    assert_eq!(counters[Literal::positive(7)], 0);

    assert!(counters.is_pure(Literal::positive(1)));
    assert!(!counters.is_pure(Literal::negative(1)));
    assert!(!counters.is_pure(Literal::positive(3)));
    assert_eq!(
        counters.pure_literals().collect::<Vec<_>>(),
        vec![Literal::positive(1)]
    );
}
