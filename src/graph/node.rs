use crate::{Clause, DecisionLevel, Literal, Variable};
use std::rc::Rc;

pub type NodeIdx = usize;
pub type EdgeIdx = usize;

/// A single binding made on the current search path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    variable: Variable,
    value: bool,
    decision_level: DecisionLevel,
}

impl Node {
    pub fn new(variable: Variable, value: bool, decision_level: DecisionLevel) -> Self {
        Self {
            variable,
            value,
            decision_level,
        }
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn decision_level(&self) -> DecisionLevel {
        self.decision_level
    }

    /// The literal made true by this binding
    pub fn literal(&self) -> Literal {
        Literal::new(self.variable, self.value)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}@{}", self.literal(), self.decision_level)
    }
}

/// The reason a binding was forced.
///
/// A missing source marks a binding forced by a unit clause.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) source: Option<NodeIdx>,
    pub(crate) destination: NodeIdx,
    pub(crate) cause: Rc<Clause>,
}

impl Edge {
    pub fn cause(&self) -> &Clause {
        &self.cause
    }
}

/// An attempted binding which contradicted an existing one
#[derive(Clone, Debug)]
pub struct Conflict {
    pub variable: Variable,
    pub decision_level: DecisionLevel,
    pub cause: Rc<Clause>,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "x{}@{} by {}",
            self.variable, self.decision_level, self.cause
        )
    }
}
