use crate::{Clause, ClauseIdx, Variable};
use std::ops::Index;

/// For every variable, the clauses which mention it
#[derive(Clone, Debug, Default)]
pub struct Occurrences {
    occurrences: Vec<Vec<ClauseIdx>>,
}

impl Occurrences {
    pub fn new(num_vars: Variable) -> Self {
        Self {
            occurrences: vec![Vec::new(); num_vars],
        }
    }

    pub fn add(&mut self, clause: &Clause, idx: ClauseIdx) {
        for var in clause.variables() {
            if var >= self.occurrences.len() {
                self.occurrences.resize(var + 1, Vec::new());
            }
            self.occurrences[var].push(idx);
        }
    }
}

impl Index<Variable> for Occurrences {
    type Output = [ClauseIdx];

    #[inline]
    fn index(&self, var: Variable) -> &Self::Output {
        match self.occurrences.get(var) {
            Some(clauses) => clauses,
            None => &[],
        }
    }
}

#[test]
fn indexing_clauses_by_variable() {
    use crate::Literal;

    let mut occurrences = Occurrences::new(2);
    occurrences.add(&Clause::new(vec![Literal::positive(0), Literal::negative(1)]), 0);
    occurrences.add(&Clause::new(vec![Literal::negative(0), Literal::positive(4)]), 1);

    assert_eq!(&occurrences[0], &[0, 1]);
    assert_eq!(&occurrences[1], &[0]);
    assert_eq!(&occurrences[4], &[1]);
    assert!(occurrences[3].is_empty());
    assert!(occurrences[99].is_empty());
}
