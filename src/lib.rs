//! # workflo-gen - Workflow Step-Graph Compiler
//!
//! **workflo-gen** turns a declarative list of field-workflow steps into the hierarchical
//! procedure definition document consumed by a mobile workflow engine. Steps can be
//! authored as a flat table whose rows point at their parent group, or as already
//! nested structured input.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Steps**: Read a table with [`import::TabularWorkflow`], parse JSON with
//!     [`import::structured`], or implement [`import::IntoWorkflow`] for your own format.
//! 2.  **Rebuild the Hierarchy**: Tabular rows are nested under their parent groups by
//!     [`hierarchy::build_forest`]; this happens as part of the tabular conversion.
//! 3.  **Compile**: [`Compiler::builder`] validates the tree, frames every level with
//!     start and end steps, fills in default sequential connections, and compiles each
//!     step according to its kind.
//! 4.  **Write**: The resulting [`document::ProcedureDocument`] renders to XML (or JSON
//!     for inspection).
//!
//! ## Quick Start
//!
//! ```rust
//! use workflo_gen::prelude::*;
//!
//! fn main() -> std::result::Result<(), GeneratorError> {
//!     let workflow = ImportWorkflow::new(
//!         "Pump inspection",
//!         vec![
//!             ImportStep::new(1, StepKind::Instruction, "Isolate the pump"),
//!             ImportStep::new(2, StepKind::Decision, "Seal intact?")
//!                 .with_path(3, "No")
//!                 .with_path(END_STEP_INDEX, "Yes"),
//!             ImportStep::new(3, StepKind::Photo, "Photograph the leak"),
//!         ],
//!     );
//!
//!     let document = Compiler::builder(workflow)
//!         .with_id_allocator(Box::new(SequentialIds::default()))
//!         .build()
//!         .compile()?;
//!
//!     // Start, three authored steps, End.
//!     assert_eq!(document.steps.len(), 5);
//!
//!     let xml = document.to_xml()?;
//!     assert!(xml.starts_with("<Procedure IsReport=\"false\">"));
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod document;
pub mod error;
pub mod hierarchy;
pub mod import;
pub mod prelude;

pub use compiler::{Compiler, CompilerBuilder};
pub use document::ProcedureDocument;
pub use error::{CompileError, DocumentError, GeneratorError, InputError};

use crate::import::{IntoWorkflow, TabularWorkflow};
use std::io;

/// Compiles any workflow source with default settings.
pub fn generate<S: IntoWorkflow>(source: S) -> Result<ProcedureDocument, GeneratorError> {
    let workflow = source.into_workflow()?;
    Ok(Compiler::builder(workflow).build().compile()?)
}

/// Reads a step table and compiles it.
pub fn generate_from_csv<R: io::Read>(
    reader: R,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<ProcedureDocument, GeneratorError> {
    generate(TabularWorkflow::from_reader(reader, title, description)?)
}

/// Parses a structured workflow definition and compiles it.
pub fn generate_from_json(json: &str) -> Result<ProcedureDocument, GeneratorError> {
    generate(import::structured::from_json(json)?)
}
