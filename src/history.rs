use crate::{DecisionLevel, ImplicationGraph, Variable};
use std::rc::Rc;

/// One branching choice, with everything known once it was propagated
#[derive(Clone, Debug)]
pub struct Decision {
    pub level: DecisionLevel,
    pub variable: Variable,
    pub value: bool,
    pub implications: Rc<ImplicationGraph>,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "x{}={}@{}",
            self.variable,
            if self.value { 'T' } else { 'F' },
            self.level
        )
    }
}

/// The current search path.
///
/// Level 0 holds the closure of the unit clauses; decision `i` of the stack was made
/// at level `i + 1`. Every entry keeps a full snapshot of the implication graph, so
/// reverting is a truncation.
#[derive(Clone, Debug, Default)]
pub struct History {
    root: Option<Rc<ImplicationGraph>>,
    decisions: Vec<Decision>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// The level 0 bindings, once the unit clauses have been swept
    pub fn root(&self) -> Option<&ImplicationGraph> {
        self.root.as_deref()
    }

    pub fn set_root(&mut self, implications: ImplicationGraph) {
        assert!(
            self.decisions.is_empty(),
            "replacing level 0 beneath {} decisions",
            self.decisions.len()
        );
        self.root = Some(Rc::new(implications));
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.decisions.is_empty()
    }

    /// The level the next decision is made at
    pub fn next_level(&self) -> DecisionLevel {
        self.decisions.len() + 1
    }

    pub fn push(&mut self, decision: Decision) {
        assert_eq!(
            decision.level,
            self.next_level(),
            "decision {} made out of order",
            decision
        );
        self.decisions.push(decision);
    }

    /// The implication graph at the end of the path
    pub fn implications(&self) -> Rc<ImplicationGraph> {
        match (self.decisions.last(), &self.root) {
            (Some(decision), _) => decision.implications.clone(),
            (None, Some(root)) => root.clone(),
            (None, None) => Rc::new(ImplicationGraph::new()),
        }
    }

    /// Forgets `level` and every level above it. Reverting to level 0 forgets the
    /// unit sweep too, so it is redone with whatever has been learned since.
    pub fn revert_to(&mut self, level: DecisionLevel) {
        if level == 0 {
            self.root = None;
            self.decisions.clear();
        } else {
            self.decisions.truncate(level - 1);
        }
    }
}

#[test]
fn rewriting_history() {
    use crate::Valuation;

    let decide = |history: &History, var| {
        let mut implications = (*history.implications()).clone();
        let level = history.next_level();
        implications.bind(var, true, level, None);
        Decision {
            level,
            variable: var,
            value: true,
            implications: Rc::new(implications),
        }
    };

    let mut history = History::new();
    assert!(history.is_empty());
    assert!(history.implications().is_empty());

    // Decision level 0
    let mut root = ImplicationGraph::new();
    root.bind(0, true, 0, None);
    history.set_root(root);
    assert_eq!(history.next_level(), 1);

    // Decision levels 1 through 3
    for var in 1..=3 {
        let decision = decide(&history, var);
        history.push(decision);
    }
    assert_eq!(history.decisions().len(), 3);
    assert_eq!(history.implications().len(), 4);
    assert_eq!(history.implications().node(3).map(|node| node.decision_level()), Some(3));

    {
        let mut history = history.clone();
        history.revert_to(2);
        assert_eq!(history.decisions().len(), 1);
        assert_eq!(history.next_level(), 2);
        assert_eq!(history.implications().value(1), Some(true));
        assert_eq!(history.implications().value(2), None);
    }

    {
        let mut history = history.clone();
        history.revert_to(1);
        assert!(history.decisions().is_empty());
        assert_eq!(history.implications().len(), 1);
        assert!(history.root().is_some());
    }

    history.revert_to(0);
    assert!(history.is_empty());
    assert!(history.root().is_none());
    assert_eq!(history.implications().value(0), None);
}

#[test]
#[should_panic(expected = "out of order")]
fn decisions_are_made_in_level_order() {
    let mut history = History::new();
    history.push(Decision {
        level: 2,
        variable: 0,
        value: true,
        implications: Rc::new(ImplicationGraph::new()),
    });
}
