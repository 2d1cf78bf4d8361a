use crate::document::ProcedureDocument;
use crate::error::CompileError;
use crate::import::ImportWorkflow;
use chrono::{Local, NaiveDateTime};

mod graph;
mod ids;
mod steps;
mod validate;

pub use graph::{Connection, GraphAssembler, WiredStep};
pub use ids::{IdAllocator, IdScope, SequentialIds, UuidIds};
pub use steps::{
    CompiledStep, Constraint, InputStep, InputType, StepBase, StepBody, StepCompiler,
};

pub const DEFAULT_TITLE: &str = "My Workflow";
pub const DEFAULT_DESCRIPTION: &str = "Generated workflow";

/// Compiles an [`ImportWorkflow`] into a [`ProcedureDocument`].
///
/// A compiler is single-use: [`Compiler::compile`] consumes it, together with its
/// identifier allocator, so no state survives between two compilations.
pub struct Compiler {
    workflow: ImportWorkflow,
    ids: Box<dyn IdAllocator>,
    timestamp: Option<NaiveDateTime>,
    default_title: String,
    default_description: String,
}

/// Collects compilation options. Obtained from [`Compiler::builder`].
pub struct CompilerBuilder {
    workflow: ImportWorkflow,
    ids: Box<dyn IdAllocator>,
    timestamp: Option<NaiveDateTime>,
    default_title: String,
    default_description: String,
}

impl CompilerBuilder {
    /// Starts from random UUIDs, the current time and the stock title/description.
    pub fn new(workflow: ImportWorkflow) -> Self {
        Self {
            workflow,
            ids: Box::new(UuidIds),
            timestamp: None,
            default_title: DEFAULT_TITLE.to_string(),
            default_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
    /// Replaces the identifier source, e.g. with [`SequentialIds`] for reproducible output.
    pub fn with_id_allocator(mut self, ids: Box<dyn IdAllocator>) -> Self {
        self.ids = ids;
        self
    }
    /// Pins the modification timestamp instead of using the current local time.
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
    /// Title used when the workflow's own title is blank.
    pub fn with_default_title(mut self, title: &str) -> Self {
        self.default_title = title.to_string();
        self
    }
    /// Description used when the workflow has none, or only whitespace.
    pub fn with_default_description(mut self, description: &str) -> Self {
        self.default_description = description.to_string();
        self
    }
    /// Finalizes the options into a single-use [`Compiler`].
    pub fn build(self) -> Compiler {
        Compiler {
            workflow: self.workflow,
            ids: self.ids,
            timestamp: self.timestamp,
            default_title: self.default_title,
            default_description: self.default_description,
        }
    }
}

impl Compiler {
    /// Starts configuring a compilation of `workflow`.
    pub fn builder(workflow: ImportWorkflow) -> CompilerBuilder {
        CompilerBuilder::new(workflow)
    }

    /// Validates the whole tree, then compiles it level by level into a document.
    pub fn compile(self) -> Result<ProcedureDocument, CompileError> {
        let Compiler {
            mut workflow,
            ids,
            timestamp,
            default_title,
            default_description,
        } = self;

        let supplied = validate::validate_steps(&workflow.steps)?;
        let mut ids = IdScope::new(ids).with_reserved(supplied);

        let step_count: usize = workflow.steps.iter().map(|s| s.subtree_len()).sum();
        let top_level = std::mem::take(&mut workflow.steps);
        let steps = StepCompiler::new(&mut ids).compile_level(top_level)?;

        let title = non_blank(&workflow.title).unwrap_or(default_title);
        let description = workflow
            .description
            .as_deref()
            .and_then(non_blank)
            .unwrap_or(default_description);
        let timestamp = timestamp.unwrap_or_else(|| Local::now().naive_local());

        let document =
            ProcedureDocument::assemble(ids.fresh()?, title, description, timestamp, steps);

        tracing::info!(
            workflow_id = %document.id,
            title = %document.title,
            steps = step_count,
            "compiled workflow"
        );
        Ok(document)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
