//! Session configuration
//!
//! ```toml
//! [lowering]
//! group_aggressively = true
//!
//! [references]        # extra member -> primitive mappings
//! norm = "norm"
//!
//! [modules]           # binding -> exposed members
//! np = ["shape", "dot"]
//!
//! [imports]           # imported module -> member catalogue
//! numpy = "numpy"
//! ```
//!
//! Every section is optional.

use crate::error::{DriverError, DriverResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use toml::de::Error as TomlError;

/// Session configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output shape options
    pub lowering: LoweringConfig,

    /// Member -> primitive mappings added to the built-in table
    pub references: IndexMap<String, String>,

    /// Module-like bindings and the members they expose
    pub modules: IndexMap<String, Vec<String>>,

    /// Imported module name -> catalogue name
    ///
    /// Modules without an entry use the catalogue of the same name.
    pub imports: IndexMap<String, String>,
}

/// `[lowering]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoweringConfig {
    /// Fully parenthesize every compound expression
    pub group_aggressively: bool,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            group_aggressively: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration
    pub fn load(path: &Path) -> DriverResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| DriverError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| DriverError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed text or unknown keys
    pub fn from_toml(text: &str) -> Result<Self, TomlError> {
        toml::from_str(text)
    }

    /// Catalogue used for an `import` of `module`
    pub fn catalogue_for<'name>(&'name self, module: &'name str) -> &'name str {
        self.imports.get(module).map_or(module, String::as_str)
    }
}
