use super::graph::{Connection, GraphAssembler, WiredStep};
use super::ids::IdScope;
use crate::error::CompileError;
use crate::import::{ImportStep, StepConfig, StepKind};

/// The per-step fields every compiled step carries.
#[derive(Debug, Clone, PartialEq)]
pub struct StepBase {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tag: Option<String>,
    pub connections: Vec<Connection>,
    /// Position within the enclosing level, counting the start step as 0.
    pub position: usize,
}

/// A compiled step: the shared base block plus the kind-specific body.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStep {
    pub base: StepBase,
    pub body: StepBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepBody {
    /// Plain instruction the operator confirms.
    Confirm,
    Start,
    Terminate,
    /// Branching step; its meaning lies entirely in its labelled connections.
    Decision,
    Input(InputStep),
    Group {
        is_form: bool,
        steps: Vec<CompiledStep>,
    },
}

impl StepBody {
    /// The step type name used in the document.
    pub fn type_name(&self) -> &'static str {
        match self {
            StepBody::Confirm => "ConfirmStep",
            StepBody::Start => "StartStep",
            StepBody::Terminate => "TerminateGroupStep",
            StepBody::Decision => "DecisionStep",
            StepBody::Input(_) => "InputStep",
            StepBody::Group { .. } => "GroupStep",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputStep {
    pub input_type: InputType,
    pub optional: bool,
    pub dynamic_url: Option<String>,
    pub constraint: Constraint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Numeric,
    Photo,
    Video,
    Signature,
    Barcode,
    DateTime,
    Selection,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "Text",
            InputType::Numeric => "Numeric",
            InputType::Photo => "Photo",
            InputType::Video => "Video",
            InputType::Signature => "Signature",
            InputType::Barcode => "Barcode",
            InputType::DateTime => "DateTime",
            InputType::Selection => "Selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Unconstrained,
    DateTime,
    Selection {
        choices: Vec<String>,
        fixed_mode: bool,
        min_selection: usize,
        max_selection: usize,
    },
}

/// Compiles steps level by level, recursing into groups.
pub struct StepCompiler<'a> {
    ids: &'a mut IdScope,
}

impl<'a> StepCompiler<'a> {
    pub fn new(ids: &'a mut IdScope) -> Self {
        Self { ids }
    }

    /// Wires and compiles one level. The result always starts with the start step
    /// and ends with the end step.
    pub fn compile_level(
        &mut self,
        steps: Vec<ImportStep>,
    ) -> Result<Vec<CompiledStep>, CompileError> {
        let wired = GraphAssembler::new(&mut *self.ids).assemble(steps)?;
        wired
            .into_iter()
            .map(|step| self.compile_step(step))
            .collect()
    }

    fn compile_step(&mut self, wired: WiredStep) -> Result<CompiledStep, CompileError> {
        let WiredStep {
            step,
            id,
            position,
            connections,
        } = wired;
        let ImportStep {
            index,
            title,
            description,
            tag,
            kind,
            selection_options,
            children,
            config,
            ..
        } = step;

        if kind != StepKind::Group && !children.is_empty() {
            tracing::warn!(
                index,
                kind = %kind,
                dropped = children.len(),
                "only group steps can hold children; ignoring nested steps"
            );
        }

        let mut base = StepBase {
            id,
            title,
            description,
            tag: Some(tag).filter(|t| !t.trim().is_empty()),
            connections,
            position,
        };

        let input = |input_type| {
            StepBody::Input(InputStep {
                input_type,
                optional: config.flag("optional", false),
                dynamic_url: None,
                constraint: Constraint::Unconstrained,
            })
        };

        let body = match kind {
            StepKind::Instruction => StepBody::Confirm,
            StepKind::Text => input(InputType::Text),
            StepKind::Numeric => input(InputType::Numeric),
            StepKind::Photo => input(InputType::Photo),
            StepKind::Video => input(InputType::Video),
            StepKind::Signature => input(InputType::Signature),
            StepKind::Barcode => input(InputType::Barcode),
            StepKind::DateTime => StepBody::Input(InputStep {
                input_type: InputType::DateTime,
                optional: config.flag("optional", false),
                dynamic_url: None,
                constraint: Constraint::DateTime,
            }),
            StepKind::Selection => selection(index, &selection_options, &config)?,
            StepKind::Decision => StepBody::Decision,
            StepKind::Group => StepBody::Group {
                is_form: config.flag("form", false),
                steps: self.compile_level(children)?,
            },
            StepKind::Start => {
                base.description.clear();
                base.tag = None;
                StepBody::Start
            }
            StepKind::End => {
                base.connections.clear();
                StepBody::Terminate
            }
        };

        Ok(CompiledStep { base, body })
    }
}

fn selection(
    index: i64,
    options: &[String],
    config: &StepConfig,
) -> Result<StepBody, CompileError> {
    let options: Vec<String> = options
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    let multi = config.flag("multi", false);
    let max_selection = if multi { options.len().max(1) } else { 1 };

    let (dynamic_url, choices) = if config.flag("dynamic", false) {
        let url = options
            .first()
            .cloned()
            .ok_or(CompileError::MissingDynamicSource { index })?;
        (Some(url), Vec::new())
    } else {
        (None, options)
    };

    Ok(StepBody::Input(InputStep {
        input_type: InputType::Selection,
        optional: config.flag("optional", false),
        dynamic_url,
        constraint: Constraint::Selection {
            choices,
            fixed_mode: config.flag("fixed", true),
            min_selection: 1,
            max_selection,
        },
    }))
}
