//! External reference resolution tables
//!
//! [`ReferenceTable`] maps numeric-library member names to engine primitives.
//! [`ModuleBindings`] records which names in the enclosing environment are
//! module-like bindings and which members they really expose.

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, LazyLock};

/// Member name -> primitive name pairs known to every compilation
const BUILTIN_REFERENCES: &[(&str, &str)] = &[
    ("argmax", "argmax"),
    ("argmin", "argmin"),
    ("cross", "cross"),
    ("det", "determinant"),
    ("diagonal", "diag"),
    ("dot", "dot"),
    ("exp", "exp"),
    ("hstack", "hstack"),
    ("identity", "identity"),
    ("inverse", "inverse"),
    ("linspace", "linspace"),
    ("power", "power"),
    ("random", "random"),
    ("shape", "shape"),
    ("sqrt", "square_root"),
    ("transpose", "transpose"),
    ("vstack", "vstack"),
];

static BUILTIN: LazyLock<Arc<ReferenceTable>> = LazyLock::new(|| {
    Arc::new(ReferenceTable {
        entries: BUILTIN_REFERENCES
            .iter()
            .map(|(member, primitive)| ((*member).to_string(), (*primitive).to_string()))
            .collect(),
    })
});

/// Immutable member -> primitive mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTable {
    entries: FxHashMap<String, String>,
}

impl ReferenceTable {
    /// The process-wide built-in table
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Built-in table plus `extra` mappings (which win on conflict)
    pub fn extended<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = BUILTIN.entries.clone();
        entries.extend(
            extra
                .into_iter()
                .map(|(member, primitive)| (member.into(), primitive.into())),
        );
        Self { entries }
    }

    /// Primitive name for `member`
    pub fn resolve(&self, member: &str) -> Option<&str> {
        self.entries.get(member).map(String::as_str)
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Module-like bindings of the environment a function is compiled in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleBindings {
    modules: FxHashMap<String, FxHashSet<String>>,
}

impl ModuleBindings {
    /// No module bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `binding` to a module exposing `members` (merged if already bound)
    pub fn bind<I, S>(&mut self, binding: &str, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules
            .entry(binding.to_string())
            .or_default()
            .extend(members.into_iter().map(Into::into));
    }

    /// Whether module `binding` genuinely exposes `member`
    pub fn exposes(&self, binding: &str, member: &str) -> bool {
        self.modules
            .get(binding)
            .is_some_and(|members| members.contains(member))
    }
}
