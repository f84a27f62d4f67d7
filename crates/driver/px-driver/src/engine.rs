//! Execution engine boundary

use crate::{error::DriverResult, session::CompiledFunction, state::CompilerState};

/// Consumer of compiled IR
///
/// The evaluator itself lives outside this workspace; implementations hand
/// the IR over and record whatever they need in `state`.
pub trait ExecutionEngine {
    /// Accept the IR of one function
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the IR
    fn compile(&self, function: &CompiledFunction, state: &mut CompilerState) -> DriverResult<()>;
}

/// Engine that only records IR in the compiler state
#[derive(Debug, Clone, Copy, Default)]
pub struct IrListing;

impl ExecutionEngine for IrListing {
    fn compile(&self, function: &CompiledFunction, state: &mut CompilerState) -> DriverResult<()> {
        if state.insert(&function.name, &function.ir).is_some() {
            tracing::debug!(function = %function.name, "replaced previously compiled IR");
        }
        Ok(())
    }
}
