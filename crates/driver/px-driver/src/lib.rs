//! Compilation driver
//!
//! Ties the front end, the lowering core and an [`ExecutionEngine`] together.
//! A [`Session`] holds the configured environment; every function it compiles
//! gets a fresh scope and is handed to the engine along with an explicit
//! [`CompilerState`].

pub mod catalogue;
pub mod config;
pub mod engine;
pub mod error;
pub mod session;
pub mod state;

pub use config::{Config, LoweringConfig};
pub use engine::{ExecutionEngine, IrListing};
pub use error::{DriverError, DriverResult};
pub use session::{CompiledFunction, Session};
pub use state::CompilerState;
