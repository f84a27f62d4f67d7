//! Flat per-function scope tracking
//!
//! Decides whether an assignment introduces a binding (`define`) or mutates
//! one (`store`). Scoping is purely lexical and flat: a name bound anywhere in
//! the function stays bound for every later statement, nested blocks included.

use crate::emit::{DEFINE, STORE};
use rustc_hash::FxHashSet;

/// What an assignment to a bare name does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// First assignment: introduce the name
    Define,
    /// Later assignment: mutate the existing binding
    Store,
}

impl Binding {
    /// Primitive the engine uses for this binding
    pub fn primitive(self) -> &'static str {
        match self {
            Self::Define => DEFINE,
            Self::Store => STORE,
        }
    }
}

/// Identifiers bound so far in the function being compiled
///
/// One tracker per compiled function; entries are only ever added.
#[derive(Debug, Default, Clone)]
pub struct ScopeTracker {
    bound: FxHashSet<String>,
}

impl ScopeTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with the formal parameters pre-bound
    pub fn with_params<'name>(params: impl IntoIterator<Item = &'name str>) -> Self {
        let mut tracker = Self::new();
        for param in params {
            tracker.bind(param);
        }
        tracker
    }

    /// Whether `name` has been bound
    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.contains(name)
    }

    /// Mark `name` bound for the rest of the compilation
    pub fn bind(&mut self, name: &str) {
        self.bound.insert(name.to_string());
    }

    /// Record an assignment to `name`, binding it if it was unbound
    pub fn assign(&mut self, name: &str) -> Binding {
        if self.bound.insert(name.to_string()) {
            Binding::Define
        } else {
            Binding::Store
        }
    }

    /// Number of bound names
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_assignment_defines() {
        let mut scope = ScopeTracker::new();
        assert_eq!(scope.assign("x"), Binding::Define);
        assert_eq!(scope.assign("x"), Binding::Store);
        assert_eq!(scope.assign("x"), Binding::Store);
        assert_eq!(scope.assign("y"), Binding::Define);
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn test_params_are_prebound() {
        let mut scope = ScopeTracker::with_params(["a", "b"]);
        assert!(scope.is_bound("a"));
        assert!(!scope.is_bound("c"));
        assert_eq!(scope.assign("b"), Binding::Store);
    }

    #[test]
    fn test_binding_primitives() {
        assert_eq!(Binding::Define.primitive(), "define");
        assert_eq!(Binding::Store.primitive(), "store");
        assert!(ScopeTracker::new().is_empty());
    }
}
