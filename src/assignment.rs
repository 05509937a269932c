use crate::{Literal, Valuation, Variable};
use std::collections::{btree_map, BTreeMap};

/// A (possibly partial) binding of variables to values.
///
/// Two assignments are equal when they bind the same variables to the same values.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Assignment {
    bindings: BTreeMap<Variable, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: Variable) -> Option<bool> {
        self.bindings.get(&var).copied()
    }

    /// Binds `var`, returning its previous value if it was already bound
    pub fn set(&mut self, var: Variable, value: bool) -> Option<bool> {
        self.bindings.insert(var, value)
    }

    /// Binds the literal's variable so that the literal holds
    pub fn satisfy(&mut self, literal: Literal) -> Option<bool> {
        self.set(literal.var(), literal.is_positive())
    }

    pub fn contains(&self, var: Variable) -> bool {
        self.bindings.contains_key(&var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.bindings.iter().map(|(var, value)| (*var, *value))
    }

    /// The bound variables, ascending
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.bindings.keys().copied()
    }

    /// The literals made true by this assignment, ordered by variable
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.iter().map(|(var, value)| Literal::new(var, value))
    }
}

impl Valuation for Assignment {
    #[inline]
    fn value(&self, var: Variable) -> Option<bool> {
        self.get(var)
    }
}

impl FromIterator<(Variable, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Variable, bool)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Literal> for Assignment {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        iter.into_iter()
            .map(|literal| (literal.var(), literal.is_positive()))
            .collect()
    }
}

impl Extend<(Variable, bool)> for Assignment {
    fn extend<I: IntoIterator<Item = (Variable, bool)>>(&mut self, iter: I) {
        self.bindings.extend(iter);
    }
}

impl IntoIterator for Assignment {
    type Item = (Variable, bool);
    type IntoIter = btree_map::IntoIter<Variable, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.into_iter()
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "x{}={}", var, if value { "T" } else { "F" })?;
        }
        write!(f, "}}")
    }
}

impl std::fmt::Debug for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[test]
fn assignment_display() {
    let a = Assignment::from_iter([(1, false), (0, true)]);
    assert_eq!(format!("{}", a), "{x0=T,x1=F}");
    assert_eq!(format!("{}", Assignment::new()), "{}");
}

#[test]
fn assignment_equality_is_on_bindings() {
    let a = Assignment::from_iter([(0, true), (1, false)]);
    let b = Assignment::from_iter([Literal::negative(1), Literal::positive(0)]);
    assert_eq!(a, b);

    let mut c = b.clone();
    assert_eq!(c.set(2, true), None);
    assert_ne!(a, c);
    assert_eq!(c.set(2, false), Some(true));
    assert_eq!(c.get(2), Some(false));
}
