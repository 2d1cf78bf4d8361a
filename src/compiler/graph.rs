use super::ids::IdScope;
use super::validate::supplied_id;
use crate::error::CompileError;
use crate::import::{DecisionPath, END_STEP_INDEX, ImportStep, START_STEP_INDEX, StepKind};
use ahash::AHashMap;
use itertools::Itertools;

/// A directed edge between two steps of the same level, resolved to identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: String,
    pub source: String,
    pub sink: String,
    pub label: String,
}

/// A step of one level together with its resolved identity and outgoing edges.
#[derive(Debug, Clone, PartialEq)]
pub struct WiredStep {
    pub step: ImportStep,
    pub id: String,
    /// Position within the level, counting the start step as 0.
    pub position: usize,
    pub connections: Vec<Connection>,
}

/// Wires up the steps of a single nesting level.
///
/// The level is framed by a synthetic start and end step. Every step that declares
/// no decision paths (other than end steps) gets one unlabelled path to the step that
/// follows it, so declaration order decides the default flow.
pub struct GraphAssembler<'a> {
    ids: &'a mut IdScope,
}

impl<'a> GraphAssembler<'a> {
    pub fn new(ids: &'a mut IdScope) -> Self {
        Self { ids }
    }

    pub fn assemble(&mut self, steps: Vec<ImportStep>) -> Result<Vec<WiredStep>, CompileError> {
        let mut order = Vec::with_capacity(steps.len() + 2);
        order.push(ImportStep::new(START_STEP_INDEX, StepKind::Start, "Start"));
        order.extend(steps);
        order.push(ImportStep::new(END_STEP_INDEX, StepKind::End, "End"));

        if let Some(index) = order.iter().map(|s| s.index).duplicates().next() {
            return Err(CompileError::DuplicateStepIndex { index });
        }

        let step_ids: Vec<String> = order
            .iter()
            .map(|step| match supplied_id(step) {
                Some(id) => Ok(id.to_string()),
                None => self.ids.fresh(),
            })
            .collect::<Result<_, _>>()?;
        let id_by_index: AHashMap<i64, &str> = order
            .iter()
            .zip(&step_ids)
            .map(|(step, id)| (step.index, id.as_str()))
            .collect();

        let indexes: Vec<i64> = order.iter().map(|s| s.index).collect();
        for (position, step) in order.iter_mut().enumerate() {
            if step.decision_paths.is_empty() && step.kind != StepKind::End {
                if let Some(&next) = indexes.get(position + 1) {
                    step.decision_paths.push(DecisionPath::new(next, ""));
                }
            }
        }

        let mut wired = Vec::with_capacity(order.len());
        for (position, step) in order.into_iter().enumerate() {
            let source = &step_ids[position];
            let mut connections = Vec::with_capacity(step.decision_paths.len());
            for path in &step.decision_paths {
                let sink = id_by_index.get(&path.target).ok_or(
                    CompileError::UnresolvedDecisionTarget {
                        index: step.index,
                        target: path.target,
                    },
                )?;
                connections.push(Connection {
                    id: self.ids.fresh()?,
                    source: source.clone(),
                    sink: sink.to_string(),
                    label: path.label.clone(),
                });
            }
            wired.push(WiredStep {
                id: source.clone(),
                position,
                connections,
                step,
            });
        }

        tracing::debug!(steps = wired.len(), "assembled step level");
        Ok(wired)
    }
}
