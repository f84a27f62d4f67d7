//! Engine-side compiler state

use indexmap::IndexMap;
use std::sync::{Arc, LazyLock, Mutex};

static SHARED: LazyLock<Arc<Mutex<CompilerState>>> = LazyLock::new(Arc::default);

/// IR of every function handed to the engine, keyed by function name
///
/// Recompiling a function replaces its IR but keeps its original slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerState {
    functions: IndexMap<String, String>,
}

impl CompilerState {
    /// Empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default state
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::clone(&SHARED)
    }

    /// Record `ir` for `name`, returning the IR it replaces
    pub fn insert(&mut self, name: impl Into<String>, ir: impl Into<String>) -> Option<String> {
        self.functions.insert(name.into(), ir.into())
    }

    /// IR recorded for `name`
    pub fn ir(&self, name: &str) -> Option<&str> {
        self.functions.get(name).map(String::as_str)
    }

    /// Recorded functions in the order they were first compiled
    pub fn functions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.functions
            .iter()
            .map(|(name, ir)| (name.as_str(), ir.as_str()))
    }

    /// Number of recorded functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recompile_keeps_slot() {
        let mut state = CompilerState::new();
        assert_eq!(state.insert("f", "a"), None);
        state.insert("g", "b");
        assert_eq!(state.insert("f", "c"), Some("a".to_string()));

        let listed: Vec<_> = state.functions().collect();
        assert_eq!(listed, vec![("f", "c"), ("g", "b")]);
        assert_eq!(state.ir("g"), Some("b"));
        assert_eq!(state.ir("h"), None);
    }

    #[test]
    fn test_shared_is_one_instance() {
        assert!(Arc::ptr_eq(&CompilerState::shared(), &CompilerState::shared()));
    }
}
