use crate::{Assignment, Evaluate, Formula, Solve};

/// Tries every total assignment of the formula's variables
#[derive(Clone, Debug, Default)]
pub struct BruteForceSolver {
    iterations: usize,
}

impl BruteForceSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Solve for BruteForceSolver {
    /// Panics on formulas with more than 63 variables
    fn solve(&mut self, formula: &Formula) -> Option<Assignment> {
        let variables = formula.variables();
        assert!(
            variables.len() < 64,
            "too many variables to enumerate: {}",
            variables.len()
        );

        self.iterations = 0;
        for bits in 0..(1u64 << variables.len()) {
            self.iterations += 1;
            let assignment = variables
                .iter()
                .enumerate()
                .map(|(i, var)| (*var, (bits >> i) & 1 == 1))
                .collect::<Assignment>();
            if formula.evaluate(&assignment) == Some(true) {
                return Some(assignment);
            }
        }
        None
    }

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn name(&self) -> &'static str {
        "brute-force"
    }
}

#[test]
fn enumerating_assignments() {
    let mut solver = BruteForceSolver::new();

    // Only x1=T, x2=T satisfies it, which is the last candidate
    let formula = Formula::from(vec![vec![1isize, 2], vec![-1, 2], vec![1, -2]]);
    assert_eq!(
        solver.solve(&formula),
        Some(Assignment::from_iter([(1, true), (2, true)]))
    );
    assert_eq!(solver.iterations(), 4);

    let formula = Formula::from(vec![vec![1isize, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);
    assert_eq!(solver.solve(&formula), None);
    assert_eq!(solver.iterations(), 4);

    assert_eq!(solver.solve(&Formula::default()), Some(Assignment::new()));
    assert_eq!(solver.iterations(), 1);
    assert_eq!(solver.solve(&Formula::unsatisfiable()), None);
}
