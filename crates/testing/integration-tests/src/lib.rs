//! Integration test utilities for the PhySL compiler

pub mod arith;

use anyhow::{Context as _, Result};
use px_driver::{CompiledFunction, CompilerState, Config, DriverResult, IrListing, Session};
use std::fs;
use std::path::{Path, PathBuf};

/// A source file paired with the IR listing it must compile to
#[derive(Debug, Clone)]
pub struct Fixture {
    /// File stem
    pub name: String,
    /// Host-language source
    pub source: String,
    /// Expected `name: ir` listing
    pub expected: String,
}

impl Fixture {
    /// Loads every `<name>.py` that has a sibling `<name>.ir`, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a fixture file cannot be read
    pub fn load_all(dir: impl AsRef<Path>) -> Result<Vec<Self>> {
        let dir = dir.as_ref();
        let mut fixtures = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "py") {
                continue;
            }
            let expected_path = path.with_extension("ir");
            if !expected_path.exists() {
                continue;
            }
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            fixtures.push(Self {
                name,
                source: fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                expected: fs::read_to_string(&expected_path)
                    .with_context(|| format!("failed to read {}", expected_path.display()))?,
            });
        }
        fixtures.sort_by(|first, second| first.name.cmp(&second.name));
        Ok(fixtures)
    }

    /// Compile the fixture and render its listing
    ///
    /// # Errors
    ///
    /// Returns the compilation error, if any
    pub fn compile(&self, config: Config) -> Result<String> {
        let compiled = compile_source(config, &self.source)
            .with_context(|| format!("fixture {} failed to compile", self.name))?;
        Ok(listing(&compiled))
    }
}

/// The checked-in fixture directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Compile every function of `source` into a fresh state
///
/// # Errors
///
/// Returns the first parse, lowering or engine error
pub fn compile_source(config: Config, source: &str) -> DriverResult<Vec<CompiledFunction>> {
    let mut state = CompilerState::new();
    Session::new(config).compile_source(source, None, &IrListing, &mut state)
}

/// `name: ir` lines, one per function
pub fn listing(compiled: &[CompiledFunction]) -> String {
    let mut out = String::new();
    for function in compiled {
        out.push_str(&function.name);
        out.push_str(": ");
        out.push_str(&function.ir);
        out.push('\n');
    }
    out
}
