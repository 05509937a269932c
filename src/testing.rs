use crate::{Clause, Formula, Literal};
use quickcheck::{Arbitrary, Gen};
use rand::{seq::index::sample, Rng};

const MAX_VARIABLES: usize = 6;
const MAX_CLAUSES: usize = 10;
const MAX_CLAUSE_LEN: usize = 3;

/// A formula small enough to check against brute force
#[derive(Clone, Debug)]
pub struct SmallFormula(pub Formula);

impl Arbitrary for SmallFormula {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let num_vars = g.gen_range(1, MAX_VARIABLES + 1);
        let num_clauses = g.gen_range(0, MAX_CLAUSES + 1);

        let mut clauses = Vec::with_capacity(num_clauses);
        for _ in 0..num_clauses {
            let len = g.gen_range(0, MAX_CLAUSE_LEN.min(num_vars) + 1);
            let mut literals = Vec::with_capacity(len);
            for var in sample(g, num_vars, len).into_iter() {
                literals.push(Literal::new(var, g.gen::<bool>()));
            }
            clauses.push(Clause::new(literals));
        }
        SmallFormula(Formula::new(clauses))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let clauses = self.0.clauses().to_vec();
        Box::new((0..clauses.len()).map(move |skip| {
            SmallFormula(Formula::new(
                clauses
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, clause)| clause.clone()),
            ))
        }))
    }
}
