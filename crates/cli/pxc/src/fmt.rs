//! IR pretty-print command

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

pub fn format_file(path: &Path) -> Result<()> {
    let ir = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    print!("{}", px_format::format_ir(&ir));
    Ok(())
}
