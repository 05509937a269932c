use crate::{
    formula::clause::Status, occurrences::Occurrences, Clause, ClauseIdx, DecisionLevel,
    Formula, ImplicationGraph, Variable,
};
use log::trace;
use std::{collections::VecDeque, ops::Index, rc::Rc};

/// The clauses consulted by propagation: the original formula followed by every
/// learned clause, indexed by the variables they mention.
#[derive(Clone, Debug)]
pub struct ClauseSet {
    clauses: Vec<Rc<Clause>>,
    num_original: usize,
    occurrences: Occurrences,
}

impl ClauseSet {
    pub fn new(formula: &Formula) -> Self {
        let mut set = Self {
            clauses: Vec::with_capacity(formula.clauses().len()),
            num_original: formula.clauses().len(),
            occurrences: Occurrences::new(formula.num_variables()),
        };
        for clause in formula.clauses() {
            set.push(clause.clone());
        }
        set
    }

    fn push(&mut self, clause: Clause) -> ClauseIdx {
        let idx = self.clauses.len();
        self.occurrences.add(&clause, idx);
        self.clauses.push(Rc::new(clause));
        idx
    }

    /// Adds a learned clause, consulted by every later propagation
    pub fn learn(&mut self, clause: Clause) -> ClauseIdx {
        self.push(clause)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Clause>> {
        self.clauses.iter()
    }

    pub fn learned(&self) -> &[Rc<Clause>] {
        &self.clauses[self.num_original..]
    }

    /// Indices of the clauses mentioning `var`
    pub fn containing(&self, var: Variable) -> &[ClauseIdx] {
        &self.occurrences[var]
    }

    /// Binds `var` and closes over every binding it forces.
    ///
    /// A decision is bound with no cause. Each clause mentioning a newly bound variable
    /// is re-examined: once all but one of its literals are false, the last one is
    /// bound with the clause as its cause; once all are false, the conflict is recorded.
    /// Propagation stops at the first conflict, leaving exactly one recorded.
    pub fn propagate_units(
        &self,
        graph: &ImplicationGraph,
        var: Variable,
        value: bool,
        level: DecisionLevel,
        cause: Option<Rc<Clause>>,
    ) -> ImplicationGraph {
        let mut graph = graph.clone();
        if graph.is_in_conflict() {
            return graph;
        }

        let mut pending = VecDeque::new();
        pending.push_back((var, value, cause));

        while let Some((var, value, cause)) = pending.pop_front() {
            if !graph.bind(var, value, level, cause) {
                if graph.is_in_conflict() {
                    break;
                }
                continue;
            }

            for idx in self.containing(var) {
                let clause = &self.clauses[*idx];
                match clause.status(&graph) {
                    Status::Satisfied | Status::Open => (),
                    Status::Conflict => {
                        graph.record_conflict(var, level, clause.clone());
                        return graph;
                    }
                    Status::Implied(literal) => {
                        trace!("{} forces {}@{}", clause, literal, level);
                        pending.push_back((
                            literal.var(),
                            literal.is_positive(),
                            Some(clause.clone()),
                        ));
                    }
                }
            }
        }

        graph
    }
}

impl Index<ClauseIdx> for ClauseSet {
    type Output = Clause;

    fn index(&self, idx: ClauseIdx) -> &Self::Output {
        &self.clauses[idx]
    }
}

#[cfg(test)]
use crate::{Assignment, Literal, Valuation};

#[test]
fn propagation_closes_over_implications() {
    // x1 → x2 → x3, and x1 ∧ x3 → x4
    let clauses = ClauseSet::new(&Formula::from(vec![
        vec![-1isize, 2],
        vec![-2, 3],
        vec![-1, -3, 4],
        vec![5, 6],
    ]));

    let graph = clauses.propagate_units(&ImplicationGraph::new(), 1, true, 1, None);
    assert!(!graph.is_in_conflict());
    assert_eq!(
        graph.current_assignment(),
        Some(Assignment::from_iter([(1, true), (2, true), (3, true), (4, true)]))
    );
    assert!(graph.nodes().iter().all(|node| node.decision_level() == 1));
    assert!(graph.reason(1).is_none());
    assert_eq!(graph.reason(4).map(|edge| edge.cause().clone()), Some(clauses[2].clone()));
}

#[test]
fn propagation_leaves_the_input_graph_untouched() {
    let clauses = ClauseSet::new(&Formula::from(vec![vec![-1isize, 2]]));
    let before = ImplicationGraph::new();
    let after = clauses.propagate_units(&before, 1, true, 1, None);
    assert!(before.is_empty());
    assert_eq!(after.len(), 2);
}

#[test]
fn propagation_stops_at_the_first_conflict() {
    // x1 forces both x2 and ¬x2
    let clauses = ClauseSet::new(&Formula::from(vec![
        vec![-1isize, 2],
        vec![-1, -2],
        vec![-2, 3],
    ]));
    let graph = clauses.propagate_units(&ImplicationGraph::new(), 1, true, 1, None);
    assert!(graph.is_in_conflict());
    assert_eq!(graph.conflicts().len(), 1);
    assert_eq!(graph.value(3), None);

    // Nothing propagates from a conflicted graph
    let again = clauses.propagate_units(&graph, 4, true, 2, None);
    assert_eq!(again.len(), graph.len());
}

#[test]
fn propagation_detects_falsified_clauses() {
    // ¬x1 is already bound when x2 makes (x1 ∨ ¬x2) false
    let clauses = ClauseSet::new(&Formula::from(vec![vec![1isize, -2]]));
    let mut graph = ImplicationGraph::new();
    graph.bind(1, false, 1, None);
    let graph = clauses.propagate_units(&graph, 2, true, 2, None);
    assert!(graph.is_in_conflict());
    let conflict = &graph.conflicts()[0];
    assert_eq!(conflict.variable, 2);
    assert_eq!(conflict.decision_level, 2);
    assert_eq!(*conflict.cause, clauses[0]);
}

#[test]
fn learned_clauses_take_part_in_propagation() {
    let mut clauses = ClauseSet::new(&Formula::from(vec![vec![1isize, 2, 3]]));
    let idx = clauses.learn(Clause::new(vec![Literal::negative(1), Literal::negative(7)]));
    assert_eq!(clauses.learned().len(), 1);
    assert_eq!(clauses.containing(7), &[idx]);

    let graph = clauses.propagate_units(&ImplicationGraph::new(), 1, true, 1, None);
    assert_eq!(graph.value(7), Some(false));
}

#[test]
fn unit_causes_bind_at_their_level() {
    let unit = Rc::new(Clause::from(Literal::negative(3)));
    let clauses = ClauseSet::new(&Formula::from(vec![vec![-3isize], vec![3, 4]]));
    let graph = clauses.propagate_units(&ImplicationGraph::new(), 3, false, 0, Some(unit));
    assert_eq!(graph.value(4), Some(true));
    assert!(graph.reason(3).and_then(|edge| graph.source(edge)).is_none());
}
