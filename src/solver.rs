use crate::{
    conflict::backjump_level, propagate::ClauseSet, Assignment, Clause, ClauseDerivation,
    Decision, DecisionLevel, Evaluate, Formula, History, ImplicationGraph, Solve, Valuation,
    Variable,
};
use log::{debug, info};
use std::{iter::FusedIterator, rc::Rc};

/// Something the search did in one step
#[derive(Clone, Debug)]
pub enum IntermediateState {
    /// The unit clauses, and what they force, were bound at level 0
    TrivialUnits(Assignment),
    Decision(Decision),
    /// A conflict was analyzed into `clause`, and the search jumped back to `backjump`.
    /// `implications` is the graph in which the conflict arose.
    Learned {
        clause: Clause,
        backjump: DecisionLevel,
        implications: Rc<ImplicationGraph>,
    },
}

#[derive(Clone, Debug)]
pub enum Step {
    Intermediate(IntermediateState),
    /// A satisfying assignment, or `None` if the formula is unsatisfiable
    Result(Option<Assignment>),
}

/// State of a single search
struct Context<'a> {
    formula: &'a Formula,
    clauses: ClauseSet,
    derivations: Vec<ClauseDerivation>,
    history: History,
    /// Candidates for branching, ascending
    variables: Vec<Variable>,
    iterations: usize,
}

impl<'a> Context<'a> {
    fn new(formula: &'a Formula) -> Self {
        Self {
            formula,
            clauses: ClauseSet::new(formula),
            derivations: Vec::new(),
            history: History::new(),
            variables: formula.variables(),
            iterations: 0,
        }
    }

    /// Takes one step of the search, or returns `None` if no progress is possible
    fn step(&mut self) -> Option<IntermediateState> {
        self.iterations += 1;

        if self.history.root().is_none() {
            let root = self.sweep_units()?;
            let assignment = root.current_assignment().unwrap_or_default();
            self.history.set_root(root);
            if !assignment.is_empty() {
                debug!("trivial units {}", assignment);
                return Some(IntermediateState::TrivialUnits(assignment));
            }
        }

        let implications = self.history.implications();
        let variable = match self.next_variable(&implications) {
            Some(variable) => variable,
            None => {
                debug!("no variable left to decide");
                return None;
            }
        };
        let level = self.history.next_level();
        debug!("deciding x{}@{}", variable, level);

        let implications = self
            .clauses
            .propagate_units(&implications, variable, true, level, None);

        if implications.is_in_conflict() {
            let (clause, derivation) = implications.analyze_conflict();
            let backjump = backjump_level(&clause, &implications, level);
            debug!(
                "learned {} at level {}, backjumping to {}",
                clause, level, backjump
            );

            self.history.revert_to(backjump);
            self.clauses.learn(clause.clone());
            self.derivations.push(derivation);
            return Some(IntermediateState::Learned {
                clause,
                backjump,
                implications: Rc::new(implications),
            });
        }

        let decision = Decision {
            level,
            variable,
            value: true,
            implications: Rc::new(implications),
        };
        self.history.push(decision.clone());
        Some(IntermediateState::Decision(decision))
    }

    /// Binds every unit clause, original or learned, at level 0. Returns `None` if
    /// they contradict each other.
    fn sweep_units(&self) -> Option<ImplicationGraph> {
        let mut implications = ImplicationGraph::new();
        for clause in self.clauses.iter().filter(|clause| clause.len() == 1) {
            let literal = clause.literals()[0];
            implications = self.clauses.propagate_units(
                &implications,
                literal.var(),
                literal.is_positive(),
                0,
                Some(clause.clone()),
            );
            if implications.is_in_conflict() {
                debug!("unit clauses conflict at {}", implications.conflicts()[0]);
                return None;
            }
        }
        Some(implications)
    }

    /// The lowest unbound variable
    fn next_variable(&self, implications: &ImplicationGraph) -> Option<Variable> {
        self.variables
            .iter()
            .copied()
            .find(|var| implications.value(*var).is_none())
    }
}

/// The steps of a CDCL search, computed as they are pulled.
///
/// The last item is always a [`Step::Result`].
pub struct Steps<'a> {
    context: Context<'a>,
    done: bool,
}

impl<'a> Steps<'a> {
    pub fn new(formula: &'a Formula) -> Self {
        Self {
            context: Context::new(formula),
            done: false,
        }
    }

    /// Steps taken so far
    pub fn iterations(&self) -> usize {
        self.context.iterations
    }

    pub fn learned_clauses(&self) -> &[Rc<Clause>] {
        self.context.clauses.learned()
    }

    /// How each learned clause was derived, in the order they were learned
    pub fn derivations(&self) -> &[ClauseDerivation] {
        &self.context.derivations
    }

    fn finish(&mut self, result: Option<Assignment>) -> Step {
        self.done = true;
        match &result {
            Some(assignment) => info!(
                "satisfied by {} after {} iterations",
                assignment, self.context.iterations
            ),
            None => info!(
                "unsatisfiable after {} iterations",
                self.context.iterations
            ),
        }
        Step::Result(result)
    }
}

impl<'a> Iterator for Steps<'a> {
    type Item = Step;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let context = &self.context;
        if context.formula.is_trivially_unsatisfiable() {
            return Some(self.finish(None));
        }

        let implications = context.history.implications();
        match context.formula.evaluate(&*implications) {
            Some(true) => return Some(self.finish(implications.current_assignment())),
            Some(false) => panic!(
                "{} is false on the search path without a conflict:\n{}",
                context.formula, implications
            ),
            None => (),
        }

        Some(match self.context.step() {
            Some(state) => Step::Intermediate(state),
            None => self.finish(None),
        })
    }
}

impl FusedIterator for Steps<'_> {}

/// Conflict-driven clause learning
#[derive(Clone, Debug, Default)]
pub struct CdclSolver {
    iterations: usize,
}

impl CdclSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every step of a search over `formula`. The counter of this solver is not
    /// touched; ask the returned [`Steps`] instead.
    pub fn steps<'a>(&self, formula: &'a Formula) -> Steps<'a> {
        Steps::new(formula)
    }
}

impl Solve for CdclSolver {
    fn solve(&mut self, formula: &Formula) -> Option<Assignment> {
        let mut steps = Steps::new(formula);
        let result = steps
            .by_ref()
            .find_map(|step| match step {
                Step::Result(result) => Some(result),
                Step::Intermediate(_) => None,
            })
            .flatten();
        self.iterations = steps.iterations();
        result
    }

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn name(&self) -> &'static str {
        "cdcl"
    }
}

/// Returns an assignment satisfying `formula`, or `None` if there is none
pub fn solve(formula: &Formula) -> Option<Assignment> {
    CdclSolver::new().solve(formula)
}

#[cfg(test)]
use crate::{testing::SmallFormula, BruteForceSolver, Literal};
#[cfg(test)]
use quickcheck_macros::quickcheck;

#[cfg(test)]
fn steps_of(formula: &Formula) -> Vec<Step> {
    Steps::new(formula).collect()
}

#[test]
fn solving_the_demo_formula() {
    let x = Literal::positive;
    let formula = Formula::new(vec![
        Clause::new(vec![!x(0), !x(1), !x(2)]),
        Clause::new(vec![x(0), x(1), x(2)]),
    ]);

    let assignment = solve(&formula).expect("formula is satisfiable");
    assert_eq!(formula.evaluate(&assignment), Some(true));
    assert_eq!(
        assignment,
        Assignment::from_iter([(0, true), (1, true), (2, false)])
    );
}

#[test]
fn solving_unit_formulas() {
    let positive = Formula::new(vec![Clause::from(Literal::positive(0))]);
    assert_eq!(solve(&positive), Some(Assignment::from_iter([(0, true)])));

    let negative = Formula::new(vec![Clause::from(Literal::negative(0))]);
    assert_eq!(solve(&negative), Some(Assignment::from_iter([(0, false)])));
}

#[test]
fn solving_contradictory_units() {
    let formula = Formula::new(vec![
        Clause::from(Literal::positive(0)),
        Clause::from(Literal::negative(0)),
    ]);
    assert_eq!(solve(&formula), None);
}

#[test]
fn solving_contradictory_implications() {
    let (x0, x1) = (Literal::positive(0), Literal::positive(1));
    let formula = Formula::new(vec![
        Clause::from(x0),
        Clause::new(vec![!x0, x1]),
        Clause::new(vec![!x0, !x1]),
    ]);

    let mut solver = CdclSolver::new();
    assert_eq!(solver.solve(&formula), None);
    assert_eq!(solver.iterations(), 1);
}

#[test]
fn first_branch_is_taken_when_it_succeeds() {
    let formula = Formula::new(vec![Clause::new(vec![
        Literal::positive(0),
        Literal::positive(1),
    ])]);
    let mut solver = CdclSolver::new();
    assert_eq!(solver.solve(&formula), Some(Assignment::from_iter([(0, true)])));
    assert_eq!(solver.iterations(), 1);
}

#[test]
fn empty_formulas_are_satisfied_without_search() {
    let mut solver = CdclSolver::new();
    assert_eq!(solver.solve(&Formula::default()), Some(Assignment::new()));
    assert_eq!(solver.iterations(), 0);
}

#[test]
fn empty_clauses_are_unsatisfiable_without_search() {
    let formula = Formula::new(vec![Clause::from(Literal::positive(3)), Clause::empty()]);
    let mut solver = CdclSolver::new();
    assert_eq!(solver.solve(&formula), None);
    assert_eq!(solver.iterations(), 0);
}

#[test]
fn learning_a_unit_restarts_at_level_0() {
    // Deciding x0 forces both x1 and ¬x1
    let x = Literal::positive;
    let formula = Formula::new(vec![
        Clause::new(vec![!x(0), x(1)]),
        Clause::new(vec![!x(0), !x(1)]),
        Clause::new(vec![x(0), x(2)]),
    ]);

    let mut steps = Steps::new(&formula);
    match steps.next() {
        Some(Step::Intermediate(IntermediateState::Learned {
            clause, backjump, ..
        })) => {
            assert_eq!(clause, Clause::from(Literal::negative(0)));
            assert_eq!(backjump, 0);
        }
        other => panic!("expected a learned clause, got {:?}", other),
    }
    match steps.next() {
        Some(Step::Intermediate(IntermediateState::TrivialUnits(units))) => {
            assert_eq!(units, Assignment::from_iter([(0, false), (2, true)]));
        }
        other => panic!("expected trivial units, got {:?}", other),
    }
    match steps.next() {
        Some(Step::Result(Some(assignment))) => {
            assert_eq!(assignment, Assignment::from_iter([(0, false), (2, true)]));
        }
        other => panic!("expected a result, got {:?}", other),
    }
    assert!(steps.next().is_none());
    assert_eq!(steps.iterations(), 2);
    assert_eq!(steps.learned_clauses().len(), 1);
    assert_eq!(steps.derivations().len(), 1);
    assert_eq!(steps.derivations()[0][0].pivot, 1);
}

#[test]
fn backjumping_redecides_the_jumped_to_level() {
    // x0@1, x1@2, then x2@3 forces x3 and ¬x3; the learned (¬x0 ∨ ¬x2) only
    // involves level 1, which is redone with x2 forced false
    let lit = Literal::positive;
    let formula = Formula::new(vec![
        Clause::new(vec![!lit(0), !lit(2), lit(3)]),
        Clause::new(vec![!lit(0), !lit(2), !lit(3)]),
        Clause::new(vec![lit(1), lit(4)]),
    ]);

    let steps = steps_of(&formula);
    let decisions = steps
        .iter()
        .filter_map(|step| match step {
            Step::Intermediate(IntermediateState::Decision(decision)) => {
                Some((decision.variable, decision.level))
            }
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(decisions, vec![(0, 1), (1, 2), (0, 1), (1, 2)]);

    let learned = steps
        .iter()
        .filter_map(|step| match step {
            Step::Intermediate(IntermediateState::Learned {
                clause, backjump, ..
            }) => Some((clause.clone(), *backjump)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(learned, vec![(Clause::new(vec![!lit(0), !lit(2)]), 1)]);

    match steps.last() {
        Some(Step::Result(Some(assignment))) => {
            assert_eq!(
                *assignment,
                Assignment::from_iter([(0, true), (1, true), (2, false)])
            );
        }
        other => panic!("expected a result, got {:?}", other),
    }
}

#[test]
fn results_are_always_last() {
    let formula = Formula::from(vec![vec![1isize, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);
    let steps = steps_of(&formula);
    assert!(matches!(steps.last(), Some(Step::Result(None))));
    assert_eq!(
        steps
            .iter()
            .filter(|step| matches!(step, Step::Result(_)))
            .count(),
        1
    );
}

#[cfg(test)]
fn pigeonhole(holes: usize) -> Formula {
    let var = |pigeon: usize, hole: usize| pigeon * holes + hole;
    let mut clauses = Vec::new();
    for pigeon in 0..=holes {
        clauses.push(Clause::new((0..holes).map(|hole| Literal::positive(var(pigeon, hole)))));
    }
    for hole in 0..holes {
        for first in 0..=holes {
            for second in first + 1..=holes {
                clauses.push(Clause::new(vec![
                    Literal::negative(var(first, hole)),
                    Literal::negative(var(second, hole)),
                ]));
            }
        }
    }
    Formula::new(clauses)
}

#[test]
fn callers_can_cap_the_search() {
    const MAX_ITERATIONS: usize = 3;
    let formula = pigeonhole(3);

    let mut steps = CdclSolver::new().steps(&formula);
    let mut result = None;
    while let Some(step) = steps.next() {
        if let Step::Result(assignment) = step {
            result = Some(assignment);
            break;
        }
        if steps.iterations() >= MAX_ITERATIONS {
            break;
        }
    }
    assert_eq!(result, None);
    assert_eq!(steps.iterations(), MAX_ITERATIONS);

    let mut solver = CdclSolver::new();
    assert_eq!(solver.solve(&formula), None);
    assert!(solver.iterations() > MAX_ITERATIONS);
}

#[cfg(test)]
#[quickcheck]
fn solutions_satisfy_the_formula(formula: SmallFormula) -> bool {
    match solve(&formula.0) {
        Some(assignment) => formula.0.evaluate(&assignment) == Some(true),
        None => true,
    }
}

#[cfg(test)]
#[quickcheck]
fn unsatisfiable_verdicts_are_confirmed_by_brute_force(formula: SmallFormula) -> bool {
    solve(&formula.0).is_some() == BruteForceSolver::new().solve(&formula.0).is_some()
}

#[cfg(test)]
#[quickcheck]
fn stepping_agrees_with_solving(formula: SmallFormula) -> bool {
    let mut solver = CdclSolver::new();
    let solved = solver.solve(&formula.0);

    let mut steps = solver.steps(&formula.0);
    let stepped = steps.by_ref().last();
    matches!(stepped, Some(Step::Result(result)) if result == solved)
        && steps.iterations() == solver.iterations()
}
