mod assignment;
pub mod baseline;
pub mod conflict;
mod counters;
pub mod dimacs;
mod error;
pub mod formula;
pub mod graph;
mod history;
mod occurrences;
pub mod propagate;
mod sign;
pub mod solver;
#[cfg(test)]
mod testing;

pub use assignment::Assignment;
pub use baseline::{BruteForceSolver, DpllSolver};
pub use conflict::{ClauseDerivation, ResolutionStep};
pub use counters::Counters;
pub use error::ParseError;
pub use formula::{Clause, Formula, Literal};
pub use graph::ImplicationGraph;
pub use history::{Decision, History};
pub use sign::Sign;
pub use solver::{solve, CdclSolver, IntermediateState, Step, Steps};

pub type Variable = usize;
pub type ClauseIdx = usize;
pub type DecisionLevel = usize;

/// Something that may (or may not yet) bind variables to values
pub trait Valuation {
    fn value(&self, var: Variable) -> Option<bool>;
}

/// Three-valued satisfaction: `None` when too few variables are bound to decide
pub trait Evaluate {
    fn evaluate<V: Valuation + ?Sized>(&self, valuation: &V) -> Option<bool>;
}

/// A procedure deciding the satisfiability of a single formula
pub trait Solve {
    /// Returns a satisfying assignment, or `None` if the formula is unsatisfiable
    fn solve(&mut self, formula: &Formula) -> Option<Assignment>;

    /// Search effort spent by the most recent call to `solve`
    fn iterations(&self) -> usize;

    fn name(&self) -> &'static str;
}
