//! Syntax tree dump command

use anyhow::{Context as _, Result};
use lang_python::PythonLanguage;
use px_driver::DriverError;
use px_syntax::Language as _;
use std::fs;
use std::path::Path;

pub fn dump(path: &Path, function: Option<&str>) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let module = PythonLanguage::new()
        .lower_module(&source)
        .map_err(DriverError::from)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let json = match function {
        Some(name) => {
            let selected = module.function(name).ok_or_else(|| DriverError::FunctionNotFound {
                name: name.to_string(),
            })?;
            serde_json::to_string_pretty(selected)?
        }
        None => serde_json::to_string_pretty(&module)?,
    };
    println!("{json}");
    Ok(())
}
