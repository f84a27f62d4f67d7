//! Read-only inputs shared by every function compiled in one session

use crate::reference::{ModuleBindings, ReferenceTable};
use std::sync::Arc;

/// Knobs that change the shape of the emitted text but never its meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerOptions {
    /// Fully parenthesize every compound expression
    ///
    /// When off, grouping is derived from operator priority and
    /// associativity instead.
    pub group_aggressively: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            group_aggressively: true,
        }
    }
}

/// Everything a compilation reads but never mutates
#[derive(Debug, Clone)]
pub struct Environment {
    /// Member -> primitive mapping for qualified calls
    pub references: Arc<ReferenceTable>,
    /// Module-like names visible to the compiled function
    pub modules: ModuleBindings,
    /// Output shape options
    pub options: LowerOptions,
}

impl Environment {
    /// Built-in references, no modules, default options
    pub fn new() -> Self {
        Self {
            references: ReferenceTable::builtin(),
            modules: ModuleBindings::new(),
            options: LowerOptions::default(),
        }
    }

    /// Replace the module bindings
    #[must_use]
    pub fn with_modules(mut self, modules: ModuleBindings) -> Self {
        self.modules = modules;
        self
    }

    /// Replace the reference table
    #[must_use]
    pub fn with_references(mut self, references: Arc<ReferenceTable>) -> Self {
        self.references = references;
        self
    }

    /// Replace the options
    #[must_use]
    pub fn with_options(mut self, options: LowerOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
