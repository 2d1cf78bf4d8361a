use super::definition::ImportWorkflow;
use crate::error::GeneratorError;

/// A trait for input formats that can be turned into an [`ImportWorkflow`].
///
/// This is the extension point for feeding the compiler from formats other than the
/// built-in tabular and structured readers. Implementations only translate; index
/// uniqueness and edge targets are checked later by the compiler.
///
/// # Example
///
/// ```rust
/// use workflo_gen::prelude::{GeneratorError, ImportStep, ImportWorkflow, IntoWorkflow, StepKind};
///
/// struct Checklist {
///     name: String,
///     items: Vec<String>,
/// }
///
/// impl IntoWorkflow for Checklist {
///     fn into_workflow(self) -> Result<ImportWorkflow, GeneratorError> {
///         let steps = self
///             .items
///             .into_iter()
///             .zip(1..)
///             .map(|(title, index)| ImportStep::new(index, StepKind::Instruction, title))
///             .collect();
///         Ok(ImportWorkflow::new(self.name, steps))
///     }
/// }
///
/// let checklist = Checklist {
///     name: "Pump inspection".to_string(),
///     items: vec!["Isolate pump".to_string(), "Check seals".to_string()],
/// };
/// let workflow = checklist.into_workflow().unwrap();
/// assert_eq!(workflow.steps.len(), 2);
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a workflow ready for compilation.
    fn into_workflow(self) -> Result<ImportWorkflow, GeneratorError>;
}

impl IntoWorkflow for ImportWorkflow {
    fn into_workflow(self) -> Result<ImportWorkflow, GeneratorError> {
        Ok(self)
    }
}
