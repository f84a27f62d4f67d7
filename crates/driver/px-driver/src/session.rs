//! Compilation sessions

use crate::{
    catalogue,
    config::Config,
    engine::ExecutionEngine,
    error::{DriverError, DriverResult},
    state::CompilerState,
};
use lang_python::PythonLanguage;
use px_lower::{Environment, LowerOptions, ModuleBindings, ReferenceTable};
use px_syntax::{FunctionDef, Language as _, Module};
use std::sync::Arc;

/// IR produced for one top-level function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    /// Function name as written in the source
    pub name: String,
    /// Position-tagged IR source
    pub ir: String,
}

/// A compilation session over one configuration
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    references: Arc<ReferenceTable>,
    language: PythonLanguage,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    /// Create a session; extra reference mappings are merged once here
    pub fn new(config: Config) -> Self {
        let references = if config.references.is_empty() {
            ReferenceTable::builtin()
        } else {
            Arc::new(ReferenceTable::extended(
                config
                    .references
                    .iter()
                    .map(|(member, primitive)| (member.as_str(), primitive.as_str())),
            ))
        };
        Self {
            config,
            references,
            language: PythonLanguage::new(),
        }
    }

    /// Parse `source` and compile its top-level functions
    ///
    /// With `only`, just the named function is compiled.
    ///
    /// # Errors
    ///
    /// Returns the first parse, lowering or engine error
    pub fn compile_source(
        &self,
        source: &str,
        only: Option<&str>,
        engine: &dyn ExecutionEngine,
        state: &mut CompilerState,
    ) -> DriverResult<Vec<CompiledFunction>> {
        let _span = tracing::info_span!("compile_source", language = self.language.name()).entered();
        let module = self.language.lower_module(source)?;
        self.compile_module(&module, only, engine, state)
    }

    /// Compile the top-level functions of an already-built tree
    ///
    /// # Errors
    ///
    /// Returns the first lowering or engine error, or
    /// [`DriverError::FunctionNotFound`] if `only` names no function
    pub fn compile_module(
        &self,
        module: &Module,
        only: Option<&str>,
        engine: &dyn ExecutionEngine,
        state: &mut CompilerState,
    ) -> DriverResult<Vec<CompiledFunction>> {
        let functions: Vec<&FunctionDef> = match only {
            Some(name) => vec![module.function(name).ok_or_else(|| {
                DriverError::FunctionNotFound {
                    name: name.to_string(),
                }
            })?],
            None => module.functions().collect(),
        };
        if functions.is_empty() {
            tracing::warn!("module defines no top-level functions");
        }

        let env = self.environment(module);
        functions
            .into_iter()
            .map(|function| {
                let _span = tracing::info_span!("function", name = %function.name).entered();
                let ir = px_lower::lower_function(function, &env).map_err(|source| {
                    DriverError::Lower {
                        function: function.name.clone(),
                        source,
                    }
                })?;
                let compiled = CompiledFunction {
                    name: function.name.clone(),
                    ir,
                };
                engine.compile(&compiled, state)?;
                tracing::info!(bytes = compiled.ir.len(), "compiled");
                Ok(compiled)
            })
            .collect()
    }

    /// Environment a function of `module` is compiled in
    pub fn environment(&self, module: &Module) -> Environment {
        let mut modules = ModuleBindings::new();
        for (binding, members) in &self.config.modules {
            modules.bind(binding, members.iter().map(String::as_str));
        }
        for import in &module.imports {
            let catalogue_name = self.config.catalogue_for(&import.module);
            match catalogue::members(catalogue_name) {
                Some(members) => modules.bind(&import.binding, members.iter().copied()),
                None => tracing::debug!(
                    module = %import.module,
                    binding = %import.binding,
                    "no catalogue for import"
                ),
            }
        }

        Environment::new()
            .with_references(Arc::clone(&self.references))
            .with_modules(modules)
            .with_options(LowerOptions {
                group_aggressively: self.config.lowering.group_aggressively,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::IrListing;
    use px_lower::LowerError;

    fn compile(session: &Session, source: &str) -> DriverResult<Vec<CompiledFunction>> {
        session.compile_source(source, None, &IrListing, &mut CompilerState::new())
    }

    #[test]
    fn test_compiles_every_function_in_order() {
        let mut state = CompilerState::new();
        let compiled = Session::default()
            .compile_source(
                "def f(a):\n    return a\n\ndef g(b):\n    return b\n",
                None,
                &IrListing,
                &mut state,
            )
            .unwrap();
        let names: Vec<_> = compiled.iter().map(|function| function.name.as_str()).collect();
        assert_eq!(names, vec!["f", "g"]);
        assert_eq!(compiled[0].ir, "define$1$0(f$1$0, a$1$6, a$2$11)");
        assert_eq!(state.ir("g"), Some("define$4$0(g$4$0, b$4$6, b$5$11)"));
    }

    #[test]
    fn test_function_filter() {
        let mut state = CompilerState::new();
        let session = Session::default();
        let source = "def f(a):\n    return a\n\ndef g(b):\n    return b\n";
        let compiled = session
            .compile_source(source, Some("g"), &IrListing, &mut state)
            .unwrap();
        assert_eq!(compiled.len(), 1);
        assert_eq!(state.len(), 1);

        let missing = session.compile_source(source, Some("h"), &IrListing, &mut state);
        assert!(matches!(missing, Err(DriverError::FunctionNotFound { name }) if name == "h"));
    }

    #[test]
    fn test_lowering_error_names_function() {
        let result = compile(&Session::default(), "def f(a):\n    a -= 1\n    return a\n");
        assert!(matches!(
            result,
            Err(DriverError::Lower {
                ref function,
                source: LowerError::UnsupportedOperator { .. },
            }) if function == "f"
        ));
    }

    #[test]
    fn test_import_binds_catalogue() {
        let source = "import numpy as np\n\ndef f(a):\n    return np.dot(a, a)\n";
        let compiled = compile(&Session::default(), source).unwrap();
        assert_eq!(compiled[0].ir, "define$3$0(f$3$0, a$3$6, dot$4$11(a$4$18, a$4$21))");

        let unbound = compile(&Session::default(), "def f(a):\n    return np.dot(a, a)\n");
        assert!(matches!(
            unbound,
            Err(DriverError::Lower {
                source: LowerError::UnresolvableReference { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_configured_references_and_modules() {
        let config = Config::from_toml(
            "[references]\nnorm = \"vector_norm\"\n\n[modules]\nla = [\"norm\"]\n",
        )
        .unwrap();
        let compiled = compile(&Session::new(config), "def f(v):\n    return la.norm(v)\n").unwrap();
        assert_eq!(compiled[0].ir, "define$1$0(f$1$0, v$1$6, vector_norm$2$11(v$2$19))");
    }

    #[test]
    fn test_relaxed_grouping_from_config() {
        let config = Config::from_toml("[lowering]\ngroup_aggressively = false\n").unwrap();
        let compiled = compile(&Session::new(config), "def f(a, b):\n    return a + b * 2\n").unwrap();
        assert_eq!(compiled[0].ir, "define$1$0(f$1$0, a$1$6, b$1$9, a$2$11 + b$2$15 * 2)");
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(matches!(
            compile(&Session::default(), "def f(:\n"),
            Err(DriverError::Parse(_))
        ));
    }
}
