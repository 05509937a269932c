use crate::{Clause, DecisionLevel, ImplicationGraph, Variable};
use std::rc::Rc;

/// One resolution step: `left` resolved with `right` on `pivot`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionStep {
    pub left: Clause,
    pub right: Clause,
    pub pivot: Variable,
}

/// The resolution steps which produced a learned clause, in order
pub type ClauseDerivation = Vec<ResolutionStep>;

impl ImplicationGraph {
    /// Derives a clause to learn from a conflicted graph.
    ///
    /// Starting from the clause that caused the conflict, every literal forced at the
    /// conflict level is resolved away against the clause that forced it. The result is
    /// implied by the clauses used and is false under the current bindings.
    ///
    /// Panics unless the graph holds exactly one conflict.
    pub fn analyze_conflict(&self) -> (Clause, ClauseDerivation) {
        assert!(self.is_in_conflict(), "no conflict to analyze");
        // Analysis of a single conflict is only sound for that conflict
        assert_eq!(
            self.conflicts().len(),
            1,
            "unexpected multiple conflicts, not supported"
        );

        let conflict = &self.conflicts()[0];
        let level = conflict.decision_level;
        let mut clause = (*conflict.cause).clone();
        let mut derivation = ClauseDerivation::new();

        while let Some((pivot, cause)) = self.implied_at_level(&clause, level) {
            let resolvent = clause
                .resolution(&cause, pivot)
                .unwrap_or_else(|| panic!("resolving {} with {} is tautological", clause, cause));
            derivation.push(ResolutionStep {
                left: clause,
                right: (*cause).clone(),
                pivot,
            });
            clause = resolvent;
        }

        (clause, derivation)
    }

    /// The first variable of `clause` forced (not decided) at `level`, with its cause
    fn implied_at_level(
        &self,
        clause: &Clause,
        level: DecisionLevel,
    ) -> Option<(Variable, Rc<Clause>)> {
        clause.variables().find_map(|var| {
            let node = self
                .node(var)
                .unwrap_or_else(|| panic!("x{} of {} is unbound", var, clause));
            if node.decision_level() != level {
                return None;
            }
            self.reason(var).map(|edge| (var, edge.cause.clone()))
        })
    }
}

/// The level to return to after learning `clause` from a conflict at `conflict_level`:
/// the highest level of the clause's other variables, or 0 if there are none.
pub fn backjump_level(
    clause: &Clause,
    graph: &ImplicationGraph,
    conflict_level: DecisionLevel,
) -> DecisionLevel {
    clause
        .variables()
        .filter_map(|var| graph.node(var).map(|node| node.decision_level()))
        .filter(|level| *level != conflict_level)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
use crate::Literal;

#[cfg(test)]
fn clause(literals: &[Literal]) -> Rc<Clause> {
    Rc::new(Clause::new(literals.iter().copied()))
}

#[test]
fn learning_from_a_binary_conflict() {
    let (v1, v2) = (Literal::positive(1), Literal::positive(2));

    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(0, true, 0, None));
    assert!(graph.bind(1, true, 1, None));
    assert!(graph.bind(2, true, 1, Some(clause(&[!v1, v2]))));
    assert!(!graph.bind(2, false, 1, Some(clause(&[!v1, !v2]))));

    let (learned, derivation) = graph.analyze_conflict();
    assert_eq!(learned, Clause::from(!v1));
    assert_eq!(
        derivation,
        vec![ResolutionStep {
            left: Clause::new(vec![!v1, !v2]),
            right: Clause::new(vec![!v1, v2]),
            pivot: 2,
        }]
    );
    assert_eq!(backjump_level(&learned, &graph, 1), 0);
}

#[test]
fn learning_keeps_lower_level_literals() {
    let (v0, v1, v2) = (
        Literal::positive(0),
        Literal::positive(1),
        Literal::positive(2),
    );

    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(0, true, 0, None));
    assert!(graph.bind(1, true, 1, None));
    assert!(graph.bind(2, true, 1, Some(clause(&[!v0, !v1, v2]))));
    assert!(!graph.bind(2, false, 1, Some(clause(&[!v0, !v1, !v2]))));

    let (learned, derivation) = graph.analyze_conflict();
    assert_eq!(learned, Clause::new(vec![!v0, !v1]));
    assert_eq!(derivation.len(), 1);
    assert_eq!(backjump_level(&learned, &graph, 1), 0);
}

#[test]
fn learning_through_an_implication_chain() {
    let lit = Literal::positive;

    // Decisions x1@1, x2@2, x3@3; x3 forces x4, x4 and x1 force x5, x5 and x2 clash
    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(1, true, 1, None));
    assert!(graph.bind(2, true, 2, None));
    assert!(graph.bind(3, true, 3, None));
    assert!(graph.bind(4, true, 3, Some(clause(&[!lit(3), lit(4)]))));
    assert!(graph.bind(5, true, 3, Some(clause(&[!lit(1), !lit(4), lit(5)]))));
    assert!(!graph.bind(5, false, 3, Some(clause(&[!lit(2), !lit(5)]))));

    let (learned, derivation) = graph.analyze_conflict();
    assert_eq!(learned, Clause::new(vec![!lit(2), !lit(1), !lit(3)]));
    assert_eq!(
        derivation.iter().map(|step| step.pivot).collect::<Vec<_>>(),
        vec![5, 4]
    );
    // Every step resolves the previous resolvent
    for pair in derivation.windows(2) {
        assert_eq!(
            pair[0].left.resolution(&pair[0].right, pair[0].pivot).as_ref(),
            Some(&pair[1].left)
        );
    }
    assert_eq!(backjump_level(&learned, &graph, 3), 2);
}

#[test]
fn learning_stops_at_unit_forced_lower_levels() {
    let lit = Literal::positive;

    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(0, false, 0, Some(clause(&[!lit(0)]))));
    assert!(graph.bind(1, true, 1, None));
    assert!(graph.bind(2, true, 1, Some(clause(&[lit(0), !lit(1), lit(2)]))));
    assert!(!graph.bind(2, false, 1, Some(clause(&[!lit(1), !lit(2)]))));

    let (learned, _) = graph.analyze_conflict();
    assert_eq!(learned, Clause::new(vec![!lit(1), lit(0)]));
    assert_eq!(backjump_level(&learned, &graph, 1), 0);
}

#[test]
#[should_panic(expected = "no conflict")]
fn analyzing_without_a_conflict_panics() {
    let mut graph = ImplicationGraph::new();
    graph.bind(0, true, 0, None);
    let _ = graph.analyze_conflict();
}

#[test]
#[should_panic(expected = "multiple conflicts")]
fn analyzing_multiple_conflicts_panics() {
    let v0 = Literal::positive(0);
    let mut graph = ImplicationGraph::new();
    graph.bind(0, true, 0, None);
    graph.bind(0, false, 0, Some(clause(&[!v0])));
    graph.bind(0, false, 0, Some(clause(&[!v0])));
    let _ = graph.analyze_conflict();
}
