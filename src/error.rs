use thiserror::Error;

/// Errors raised while reading raw tabular or structured input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Failed to read tabular input at record {record}: {message}")]
    Csv { record: u64, message: String },

    #[error("Invalid value '{value}' in column '{column}' of record {record}: {reason}")]
    InvalidCell {
        record: u64,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to parse workflow JSON: {0}")]
    Json(String),

    #[error("Could not read '{path}': {message}")]
    Io { path: String, message: String },
}

/// Errors that can occur while reconstructing the step tree or compiling it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Step index {index} appears more than once within the same group")]
    DuplicateStepIndex { index: i64 },

    #[error("Step index {index} is reserved for the implicit start/end steps")]
    ReservedStepIndex { index: i64 },

    #[error("Step id '{id}' is used by more than one step")]
    DuplicateStepId { id: String },

    #[error("Step {index} references parent {parent}, which does not exist")]
    UnresolvedParent { index: i64, parent: i64 },

    #[error("Step {index} references parent {parent}, which never reaches a top-level step")]
    ParentCycle { index: i64, parent: i64 },

    #[error("Step {index} has a decision path to {target}, which is not a step in the same group")]
    UnresolvedDecisionTarget { index: i64, target: i64 },

    #[error("Selection step {index} is dynamic but has no source URL in its options")]
    MissingDynamicSource { index: i64 },

    #[error("Identifier allocator keeps returning ids already in use (last: '{id}')")]
    IdentifierExhausted { id: String },
}

/// Errors that can occur while serializing the compiled document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Failed to write document: {0}")]
    Write(String),
}

/// Any failure of the end-to-end generation pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl GeneratorError {
    /// Whether the failure was caused by the caller's input rather than the generator.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GeneratorError::Input(_) | GeneratorError::Compile(_))
    }
}
