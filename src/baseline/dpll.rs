use crate::{Assignment, Formula, Solve, Variable};

/// Davis-Putnam-Logemann-Loveland: unit propagation and pure literal elimination
/// between chronological branches
#[derive(Clone, Debug, Default)]
pub struct DpllSolver {
    iterations: usize,
}

impl DpllSolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn search(&mut self, mut formula: Formula, mut assignment: Assignment) -> Option<Assignment> {
        self.iterations += 1;

        loop {
            if formula.is_trivially_unsatisfiable() {
                return None;
            }

            let mut units = Assignment::new();
            for literal in formula.unit_literals() {
                if units.satisfy(literal) == Some(!literal.is_positive()) {
                    return None;
                }
            }
            if !units.is_empty() {
                assignment.extend(units.iter());
                formula = formula.assigning(&units);
                continue;
            }

            // Pure literals come back as unit clauses for the next round
            let eliminated = formula.eliminating_pure_literals();
            if eliminated == formula {
                break;
            }
            formula = eliminated;
        }

        let var = match formula.clauses().first() {
            Some(clause) => clause.literals()[0].var(),
            None => return Some(assignment),
        };
        for value in [true, false] {
            if let Some(solution) = self.branch(&formula, &assignment, var, value) {
                return Some(solution);
            }
        }
        None
    }

    fn branch(
        &mut self,
        formula: &Formula,
        assignment: &Assignment,
        var: Variable,
        value: bool,
    ) -> Option<Assignment> {
        let choice = Assignment::from_iter([(var, value)]);
        let mut assignment = assignment.clone();
        assignment.set(var, value);
        self.search(formula.assigning(&choice), assignment)
    }
}

impl Solve for DpllSolver {
    fn solve(&mut self, formula: &Formula) -> Option<Assignment> {
        self.iterations = 0;
        self.search(formula.clone(), Assignment::new())
    }

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn name(&self) -> &'static str {
        "dpll"
    }
}

#[cfg(test)]
use crate::Evaluate;

#[test]
fn propagating_units_before_branching() {
    let mut solver = DpllSolver::new();
    let formula = Formula::from(vec![vec![1isize], vec![-1, 2], vec![-2, 3, 4], vec![-3, -4]]);
    let solution = solver.solve(&formula).expect("formula is satisfiable");
    assert_eq!(formula.evaluate(&solution), Some(true));
    assert_eq!(solution.get(1), Some(true));
    assert_eq!(solution.get(2), Some(true));
}

#[test]
fn refuting_contradictions() {
    let mut solver = DpllSolver::new();
    let formula = Formula::from(vec![vec![1isize], vec![-1, 2], vec![-1, -2]]);
    assert_eq!(solver.solve(&formula), None);
    assert_eq!(solver.iterations(), 1);

    assert_eq!(solver.solve(&Formula::unsatisfiable()), None);
}

#[test]
fn branching_tries_true_first() {
    let mut solver = DpllSolver::new();
    // No units and no pure literals: branch on x1
    let formula = Formula::from(vec![
        vec![1isize, 2],
        vec![-1, -2],
        vec![1, -2],
        vec![-1, 2, 3],
        vec![-3, 1],
    ]);
    let solution = solver.solve(&formula).expect("formula is satisfiable");
    assert_eq!(formula.evaluate(&solution), Some(true));
    assert_eq!(solution.get(1), Some(true));
    assert_eq!(solver.iterations(), 2);
}
