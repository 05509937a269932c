pub mod node;

pub use node::{Conflict, Edge, EdgeIdx, Node, NodeIdx};

use crate::{Assignment, Clause, DecisionLevel, Literal, Valuation, Variable};
use log::trace;
use std::rc::Rc;

/// Every binding made on the current search path, and what forced it.
///
/// Nodes live in an arena and are found through a per-variable index; edges refer to
/// nodes by position. A variable is bound at most once.
#[derive(Clone, Debug, Default)]
pub struct ImplicationGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Node of each bound variable
    index: Vec<Option<NodeIdx>>,
    /// First incoming edge of each node, parallel to `nodes`
    reasons: Vec<Option<EdgeIdx>>,
    conflicts: Vec<Conflict>,
}

impl ImplicationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn is_in_conflict(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node binding `var`, if any
    pub fn node(&self, var: Variable) -> Option<&Node> {
        self.node_idx(var).map(|idx| &self.nodes[idx])
    }

    fn node_idx(&self, var: Variable) -> Option<NodeIdx> {
        self.index.get(var).copied().flatten()
    }

    /// The edge through which `var` was forced; `None` for decisions and unbound variables
    pub fn reason(&self, var: Variable) -> Option<&Edge> {
        self.node_idx(var)
            .and_then(|idx| self.reasons[idx])
            .map(|edge| &self.edges[edge])
    }

    /// Every edge into the node binding `var`
    pub fn incoming<'a>(&'a self, var: Variable) -> impl Iterator<Item = &'a Edge> + 'a {
        let idx = self.node_idx(var);
        self.edges
            .iter()
            .filter(move |edge| Some(edge.destination) == idx)
    }

    pub fn source(&self, edge: &Edge) -> Option<&Node> {
        edge.source.map(|idx| &self.nodes[idx])
    }

    pub fn destination(&self, edge: &Edge) -> &Node {
        &self.nodes[edge.destination]
    }

    /// The assignment induced by the bindings, unless the graph is in conflict
    pub fn current_assignment(&self) -> Option<Assignment> {
        if self.is_in_conflict() {
            return None;
        }
        Some(
            self.nodes
                .iter()
                .map(|node| (node.variable(), node.value()))
                .collect(),
        )
    }

    /// Binds `var` to `value` at `level`.
    ///
    /// Returns `true` if a node was added. Binding an already bound variable adds
    /// nothing: if the value disagrees, a conflict blamed on `cause` is recorded.
    ///
    /// Panics on a disagreeing binding without a cause, or on a cause which does not
    /// force this binding from already bound variables.
    pub fn bind(
        &mut self,
        var: Variable,
        value: bool,
        level: DecisionLevel,
        cause: Option<Rc<Clause>>,
    ) -> bool {
        if let Some(prior) = self.value(var) {
            if prior != value {
                let cause = cause.unwrap_or_else(|| {
                    panic!("unexpected conflicting binding of x{} without a cause", var)
                });
                self.record_conflict(var, level, cause);
            }
            return false;
        }

        let idx = self.nodes.len();
        self.nodes.push(Node::new(var, value, level));
        self.reasons.push(None);
        if var >= self.index.len() {
            self.index.resize(var + 1, None);
        }
        self.index[var] = Some(idx);

        if let Some(cause) = cause {
            assert_eq!(
                cause.literal_of(var),
                Some(Literal::new(var, value)),
                "{} does not force x{}",
                cause,
                var
            );
            self.reasons[idx] = Some(self.edges.len());
            if cause.len() == 1 {
                self.edges.push(Edge {
                    source: None,
                    destination: idx,
                    cause,
                });
            } else {
                for other in cause.variables().filter(|other| *other != var) {
                    let source = self.node_idx(other).unwrap_or_else(|| {
                        panic!("x{} in the cause of x{} is unbound", other, var)
                    });
                    self.edges.push(Edge {
                        source: Some(source),
                        destination: idx,
                        cause: cause.clone(),
                    });
                }
            }
        }

        true
    }

    /// Records that `cause` cannot be satisfied once `var` is bound at `level`
    pub(crate) fn record_conflict(
        &mut self,
        var: Variable,
        level: DecisionLevel,
        cause: Rc<Clause>,
    ) {
        trace!("conflict on x{}@{} from {}", var, level, cause);
        self.conflicts.push(Conflict {
            variable: var,
            decision_level: level,
            cause,
        });
    }
}

impl Valuation for ImplicationGraph {
    #[inline]
    fn value(&self, var: Variable) -> Option<bool> {
        self.node(var).map(Node::value)
    }
}

impl std::fmt::Display for ImplicationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "ImplicationGraph {{")?;
        write!(f, "    nodes: [")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", node)?;
        }
        writeln!(f, "],")?;
        writeln!(f, "    edges: [")?;
        for edge in &self.edges {
            match self.source(edge) {
                Some(source) => write!(f, "        {} -> ", source)?,
                None => write!(f, "        * -> ")?,
            }
            writeln!(f, "{} by {},", self.destination(edge), edge.cause)?;
        }
        writeln!(f, "    ],")?;
        write!(f, "    conflicts: [")?;
        for (i, conflict) in self.conflicts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", conflict)?;
        }
        writeln!(f, "]")?;
        write!(f, "}}")
    }
}

#[cfg(test)]
fn clause(literals: &[isize]) -> Rc<Clause> {
    Rc::new(Clause::new(literals.iter().copied().map(Literal::from)))
}

#[test]
fn binding_unbound_variables() {
    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(1, true, 0, None));
    assert_eq!(graph.len(), 1);
    assert!(graph.reason(1).is_none());

    assert!(graph.bind(2, false, 1, Some(clause(&[-1, -2]))));
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.node(2), Some(&Node::new(2, false, 1)));
    assert_eq!(graph.value(2), Some(false));
    assert_eq!(graph.value(3), None);

    let reason = graph.reason(2).expect("forced binding has a reason");
    assert_eq!(graph.source(reason), Some(&Node::new(1, true, 0)));
    assert_eq!(graph.destination(reason), &Node::new(2, false, 1));
    assert_eq!(graph.incoming(2).count(), 1);
    assert_eq!(
        graph.current_assignment(),
        Some(Assignment::from_iter([(1, true), (2, false)]))
    );
}

#[test]
fn unit_causes_have_no_source() {
    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(4, false, 0, Some(clause(&[-4]))));
    let reason = graph.reason(4).expect("unit binding has a reason");
    assert!(graph.source(reason).is_none());
    assert_eq!(graph.edges().len(), 1);
}

#[test]
fn edges_fan_in_from_every_other_literal() {
    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(1, true, 1, None));
    assert!(graph.bind(2, true, 2, None));
    assert!(graph.bind(3, true, 2, Some(clause(&[-1, -2, 3]))));
    let sources = graph
        .incoming(3)
        .filter_map(|edge| graph.source(edge))
        .map(Node::variable)
        .collect::<Vec<_>>();
    assert_eq!(sources, vec![1, 2]);
}

#[test]
fn rebinding_consistently_is_a_no_op() {
    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(1, true, 0, None));
    assert!(!graph.bind(1, true, 3, None));
    assert!(!graph.bind(1, true, 3, Some(clause(&[1]))));
    assert_eq!(graph.len(), 1);
    assert!(!graph.is_in_conflict());
}

#[test]
fn rebinding_inconsistently_records_a_conflict() {
    let mut graph = ImplicationGraph::new();
    assert!(graph.bind(1, true, 0, None));
    assert!(!graph.bind(1, false, 0, Some(clause(&[-1]))));
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.conflicts().len(), 1);
    assert!(graph.is_in_conflict());
    assert_eq!(graph.conflicts()[0].variable, 1);
    assert!(graph.current_assignment().is_none());
}

#[test]
#[should_panic(expected = "without a cause")]
fn rebinding_inconsistently_without_a_cause_panics() {
    let mut graph = ImplicationGraph::new();
    graph.bind(1, true, 0, None);
    graph.bind(1, false, 0, None);
}
