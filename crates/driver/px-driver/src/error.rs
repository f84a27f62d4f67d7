//! Driver errors

use lang_python::ParseError;
use miette::Diagnostic;
use px_lower::LowerError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Errors surfaced by a compilation session
#[derive(Error, Debug, Diagnostic)]
pub enum DriverError {
    /// Source text did not parse
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// A function failed to lower; its partial output is discarded
    #[error("failed to lower function `{function}`")]
    #[diagnostic(forward(source))]
    Lower {
        /// Function being compiled
        function: String,
        /// Underlying lowering error
        source: LowerError,
    },

    /// A configuration file could not be read
    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(driver::config_read))]
    ConfigRead {
        /// Config path
        path: PathBuf,
        /// I/O error
        source: io::Error,
    },

    /// A configuration file is not valid
    #[error("failed to parse config file {}", path.display())]
    #[diagnostic(code(driver::config_parse))]
    ConfigParse {
        /// Config path
        path: PathBuf,
        /// TOML error
        source: TomlError,
    },

    /// A requested function is not defined at top level
    #[error("no top-level function named `{name}`")]
    #[diagnostic(code(driver::function_not_found))]
    FunctionNotFound {
        /// Requested name
        name: String,
    },
}

/// Result alias for the driver
pub type DriverResult<T> = Result<T, DriverError>;
