//! Common test utilities for building workflows and compiling them deterministically.
use chrono::{NaiveDate, NaiveDateTime};
use workflo_gen::prelude::*;

/// The timestamp every test document is pinned to.
#[allow(dead_code)]
pub fn fixed_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_micro_opt(9, 30, 15, 123_456))
        .expect("valid test timestamp")
}

/// Compiles `workflow` with sequential identifiers and a pinned timestamp.
#[allow(dead_code)]
pub fn compile(workflow: ImportWorkflow) -> std::result::Result<ProcedureDocument, CompileError> {
    Compiler::builder(workflow)
        .with_id_allocator(Box::new(SequentialIds::default()))
        .with_timestamp(fixed_timestamp())
        .build()
        .compile()
}

/// An id scope backed by `SequentialIds`, for driving single levels directly.
#[allow(dead_code)]
pub fn sequential_scope() -> IdScope {
    IdScope::new(Box::new(SequentialIds::default()))
}

/// Three sequential steps: an instruction, a decision and a photo.
///
/// The decision jumps to the photo on "No" and finishes on "Yes".
#[allow(dead_code)]
pub fn create_linear_workflow() -> ImportWorkflow {
    ImportWorkflow::new(
        "Pump inspection",
        vec![
            ImportStep::new(1, StepKind::Instruction, "Isolate the pump")
                .with_description("Close both valves"),
            ImportStep::new(2, StepKind::Decision, "Seal intact?")
                .with_path(3, "No")
                .with_path(END_STEP_INDEX, "Yes"),
            ImportStep::new(3, StepKind::Photo, "Photograph the leak").with_tag("evidence"),
        ],
    )
    .with_description("Monthly pump check")
}

/// A top-level group holding three steps, followed by a signature.
#[allow(dead_code)]
pub fn create_grouped_workflow() -> ImportWorkflow {
    ImportWorkflow::new(
        "Site survey",
        vec![
            ImportStep::new(1, StepKind::Group, "Perimeter")
                .with_config("form", "yes")
                .with_children(vec![
                    ImportStep::new(1, StepKind::Text, "Gate number"),
                    ImportStep::new(2, StepKind::Numeric, "Fence height"),
                    ImportStep::new(3, StepKind::Photo, "Gate photo"),
                ]),
            ImportStep::new(2, StepKind::Signature, "Surveyor signature"),
        ],
    )
}

/// The flat form of a group with two children plus a trailing top-level step.
#[allow(dead_code)]
pub fn create_flat_steps() -> Vec<FlatStep> {
    vec![
        FlatStep::top_level(ImportStep::new(10, StepKind::Group, "Checks")),
        FlatStep::child_of(ImportStep::new(11, StepKind::Instruction, "First"), 10),
        FlatStep::child_of(ImportStep::new(12, StepKind::Instruction, "Second"), 10),
        FlatStep::top_level(ImportStep::new(20, StepKind::Signature, "Sign off")),
    ]
}

/// A small step table with a header row.
#[allow(dead_code)]
pub const SAMPLE_CSV: &str = "\
StepId,StepIndex,StepTitle,StepDescription,StepTag,StepType,DecisionPaths,SelectionOptions,Config,Parent
,1,Walk the site,Check access routes,,instruction,,,,
,2,Hazards found?,,safety,decision,Yes:3;No:-2,,,
,3,Hazard details,,,group,,,Form:yes,
,31,Describe hazard,,,text,,,,3
,32,Severity,,,selection,,Low;Medium;High,,3.0
";

/// Collects the `<Step>` children of a `<Steps>` element.
#[allow(dead_code)]
pub fn step_elements(steps: &Element) -> Vec<&Element> {
    steps.children_named("Step").collect()
}

/// The text of a step's `<Base><Title>`.
#[allow(dead_code)]
pub fn step_title(step: &Element) -> &str {
    step.find(&["Base", "Title"]).map(Element::text).unwrap_or("")
}
