//! Compile and lower commands

use anyhow::{Context as _, Result};
use colored::Colorize as _;
use lang_python::PythonLanguage;
use px_driver::{CompiledFunction, CompilerState, Config, IrListing, Session};
use px_syntax::{Language as _, Module};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::PoisonError;

/// How compiled IR is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// Position-tagged IR, one line per function
    Tagged,
    /// Tags removed
    Stripped,
    /// Tags removed, one argument per line
    Pretty,
}

impl Render {
    pub fn from_flags(pretty: bool, strip_tags: bool) -> Self {
        if pretty {
            Self::Pretty
        } else if strip_tags {
            Self::Stripped
        } else {
            Self::Tagged
        }
    }
}

pub struct CompileOptions {
    pub function: Option<String>,
    pub config: Option<PathBuf>,
    pub render: Render,
    pub output: Option<PathBuf>,
}

pub fn compile(path: &Path, options: &CompileOptions) -> Result<()> {
    if !PythonLanguage::new().handles(path) {
        tracing::warn!(path = %path.display(), "not a python source file");
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let session = load_session(options.config.as_deref())?;

    let compiled = with_shared_state(|state| {
        session.compile_source(&source, options.function.as_deref(), &IrListing, state)
    })
    .with_context(|| format!("failed to compile {}", path.display()))?;

    let listing = render(&compiled, options.render);
    match &options.output {
        Some(output) => {
            fs::write(output, listing)
                .with_context(|| format!("failed to write {}", output.display()))?;
            eprintln!(
                "{} {} functions to {}",
                "Wrote".green().bold(),
                compiled.len(),
                output.display()
            );
        }
        None => print!("{listing}"),
    }
    Ok(())
}

pub fn lower(path: &Path, config: Option<&Path>) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let module: Module = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a serialized syntax tree", path.display()))?;
    let session = load_session(config)?;

    let compiled = with_shared_state(|state| session.compile_module(&module, None, &IrListing, state))
        .with_context(|| format!("failed to compile {}", path.display()))?;
    print!("{}", render(&compiled, Render::Tagged));
    Ok(())
}

/// Run `compile` against the process-wide compiler state
fn with_shared_state<T>(compile: impl FnOnce(&mut CompilerState) -> T) -> T {
    let shared = CompilerState::shared();
    let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
    compile(&mut state)
}

fn load_session(config: Option<&Path>) -> Result<Session> {
    let config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(Session::new(config))
}

/// `name: ir` blocks, one per function
fn render(compiled: &[CompiledFunction], mode: Render) -> String {
    let mut listing = String::new();
    for function in compiled {
        let block = match mode {
            Render::Tagged => format!("{}: {}\n", function.name, function.ir),
            Render::Stripped => {
                format!("{}: {}\n", function.name, px_format::strip_tags(&function.ir))
            }
            Render::Pretty => format!("{}:\n{}", function.name, px_format::format_ir(&function.ir)),
        };
        listing.push_str(&block);
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn sample() -> Vec<CompiledFunction> {
        vec![CompiledFunction {
            name: "f".to_string(),
            ir: "define$1$0(f$1$0, a$1$6, a$2$11)".to_string(),
        }]
    }

    #[test]
    fn test_render_modes() {
        assert_eq!(render(&sample(), Render::Tagged), "f: define$1$0(f$1$0, a$1$6, a$2$11)\n");
        assert_eq!(render(&sample(), Render::Stripped), "f: define(f, a, a)\n");
        assert_eq!(render(&sample(), Render::Pretty), "f:\ndefine(f, a, a)\n");
    }

    #[test]
    fn test_render_flags() {
        assert_eq!(Render::from_flags(false, false), Render::Tagged);
        assert_eq!(Render::from_flags(false, true), Render::Stripped);
        assert_eq!(Render::from_flags(true, false), Render::Pretty);
    }

    #[test]
    fn test_compile_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("f.py");
        let output = dir.path().join("f.ir");
        fs::File::create(&source)
            .unwrap()
            .write_all(b"def f(a):\n    return a\n")
            .unwrap();

        compile(
            &source,
            &CompileOptions {
                function: None,
                config: None,
                render: Render::Tagged,
                output: Some(output.clone()),
            },
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "f: define$1$0(f$1$0, a$1$6, a$2$11)\n"
        );
    }

    #[test]
    fn test_missing_source_is_reported() {
        let options = CompileOptions {
            function: None,
            config: None,
            render: Render::Tagged,
            output: None,
        };
        let error = compile(Path::new("/nonexistent/f.py"), &options).unwrap_err();
        assert!(error.to_string().contains("failed to read"));
    }
}
