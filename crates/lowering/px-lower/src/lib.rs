//! Lowering of host-language syntax trees to IR source
//!
//! The entry points are [`lower_function`] and [`lower_module`]. Each call
//! owns a fresh [`LoweringContext`] (and so a fresh scope tracker); only the
//! [`Environment`] is shared between calls.
//!
//! ```
//! use px_lower::{Environment, lower_function};
//! use px_syntax::builder::*;
//!
//! let function = function_def("one", vec![], vec![ret(Some(int(1, 2, 11)), 2, 4)], 1, 0);
//! let ir = lower_function(&function, &Environment::new());
//! assert_eq!(ir.ok().as_deref(), Some("define$1$0(one$1$0, 1)"));
//! ```

pub mod attribute;
pub mod dispatch;
pub mod emit;
pub mod env;
pub mod error;
pub mod expr;
pub mod reference;
pub mod scope;
pub mod stmt;
pub mod subscript;

pub use dispatch::{LoweringContext, Node, recompile};
pub use env::{Environment, LowerOptions};
pub use error::{LowerError, LowerResult, OperatorClass};
pub use reference::{ModuleBindings, ReferenceTable};
pub use scope::{Binding, ScopeTracker};

use px_syntax::{FunctionDef, Module};

/// Compile one function definition to IR source
pub fn lower_function(function: &FunctionDef, env: &Environment) -> LowerResult<String> {
    let _span = tracing::debug_span!("lower_function", name = %function.name).entered();
    let mut ctx = LoweringContext::new(env);
    let ir = recompile(&mut ctx, Node::FunctionDef(function), false)?;
    tracing::debug!(bound = ctx.scope().len(), bytes = ir.len(), "lowered");
    Ok(ir)
}

/// Compile the first statement of a module
pub fn lower_module(module: &Module, env: &Environment) -> LowerResult<String> {
    let mut ctx = LoweringContext::new(env);
    recompile(&mut ctx, Node::Module(module), false)
}
