//! Reference solvers, simple enough to trust and slow enough to only be used on small
//! formulas.

mod brute_force;
mod dpll;

pub use brute_force::BruteForceSolver;
pub use dpll::DpllSolver;

#[cfg(test)]
use crate::{solve, testing::SmallFormula, Evaluate, Solve};
#[cfg(test)]
use quickcheck_macros::quickcheck;

#[cfg(test)]
#[quickcheck]
fn all_solvers_agree(formula: SmallFormula) -> bool {
    let formula = formula.0;
    let cdcl = solve(&formula);
    let dpll = DpllSolver::new().solve(&formula);
    let brute_force = BruteForceSolver::new().solve(&formula);

    let verdicts = [cdcl.is_some(), dpll.is_some(), brute_force.is_some()];
    verdicts.iter().all(|verdict| *verdict == verdicts[0])
        && [cdcl, dpll, brute_force]
            .iter()
            .flatten()
            .all(|assignment| formula.evaluate(assignment) == Some(true))
}
