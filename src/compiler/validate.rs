use crate::error::CompileError;
use crate::import::{END_STEP_INDEX, ImportStep, START_STEP_INDEX, StepKind};
use ahash::AHashSet;
use itertools::Itertools;

/// Checks the whole step tree before anything is compiled, so that invalid input is
/// rejected without producing partial output.
///
/// Returns every caller-supplied step id, for reservation against the allocator.
pub(super) fn validate_steps(steps: &[ImportStep]) -> Result<AHashSet<String>, CompileError> {
    let mut seen_ids = AHashSet::new();
    validate_level(steps, &mut seen_ids)?;
    Ok(seen_ids.into_iter().map(str::to_string).collect())
}

fn validate_level<'a>(
    steps: &'a [ImportStep],
    seen_ids: &mut AHashSet<&'a str>,
) -> Result<(), CompileError> {
    if let Some(step) = steps
        .iter()
        .find(|s| s.index == START_STEP_INDEX || s.index == END_STEP_INDEX)
    {
        return Err(CompileError::ReservedStepIndex { index: step.index });
    }
    if let Some(index) = steps.iter().map(|s| s.index).duplicates().next() {
        return Err(CompileError::DuplicateStepIndex { index });
    }

    let scope: AHashSet<i64> = steps
        .iter()
        .map(|s| s.index)
        .chain([START_STEP_INDEX, END_STEP_INDEX])
        .collect();

    for step in steps {
        if let Some(id) = supplied_id(step) {
            if !seen_ids.insert(id) {
                return Err(CompileError::DuplicateStepId { id: id.to_string() });
            }
        }

        if let Some(path) = step
            .decision_paths
            .iter()
            .find(|path| !scope.contains(&path.target))
        {
            return Err(CompileError::UnresolvedDecisionTarget {
                index: step.index,
                target: path.target,
            });
        }

        if step.kind == StepKind::Selection
            && step.config.flag("dynamic", false)
            && step.selection_options.iter().all(|o| o.trim().is_empty())
        {
            return Err(CompileError::MissingDynamicSource { index: step.index });
        }

        if step.kind == StepKind::Group {
            validate_level(&step.children, seen_ids)?;
        }
    }

    Ok(())
}

/// The caller-supplied identifier, ignoring blank values.
pub(super) fn supplied_id(step: &ImportStep) -> Option<&str> {
    step.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}
