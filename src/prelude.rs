//! One-line import for compiling workflows.
//!
//! Brings in the input model, the compiler with its id allocators, the document
//! types and every error enum.
//!
//! # Example
//!
//! ```rust,no_run
//! use workflo_gen::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let table = std::fs::File::open("path/to/steps.csv")?;
//! let workflow = TabularWorkflow::from_reader(table, Some("Site survey"), None)?.into_workflow()?;
//!
//! let document = Compiler::builder(workflow).build().compile()?;
//! std::fs::write("workflow.xml", document.to_xml()?)?;
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{
    CompiledStep, Compiler, CompilerBuilder, Connection, IdAllocator, IdScope, SequentialIds,
    StepBody, UuidIds,
};

// Input model
pub use crate::import::{
    DecisionPath, END_STEP_INDEX, FlatStep, ImportStep, ImportWorkflow, IntoWorkflow,
    START_STEP_INDEX, StepConfig, StepKind, TabularWorkflow,
};

// Document
pub use crate::document::{Element, ProcedureDocument};

// Errors
pub use crate::error::{CompileError, DocumentError, GeneratorError, InputError};

/// Catch-all result for scripts and examples that mix I/O and generator errors.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
