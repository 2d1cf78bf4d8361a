//! Reconstruction of the step tree from flat, parent-annotated input.
//!
//! Tabular input describes nesting by letting each row name the index of its
//! parent. [`build_forest`] turns such a list back into owned trees:
//!
//! 1. Depths are assigned by level expansion. Rows without a parent sit at depth 0,
//!    rows whose parent was assigned depth `d` in the previous round get `d + 1`,
//!    and expansion stops once a round assigns nothing new.
//! 2. Steps are then moved into their parents from the deepest level upwards, so
//!    every step already owns its complete subtree when it is moved itself.
//!
//! Children keep their relative input order.

use crate::error::CompileError;
use crate::import::{FlatStep, ImportStep};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// Builds the forest of top-level steps described by `flat`.
pub fn build_forest(flat: Vec<FlatStep>) -> Result<Vec<ImportStep>, CompileError> {
    if let Some(index) = flat.iter().map(|f| f.step.index).duplicates().next() {
        return Err(CompileError::DuplicateStepIndex { index });
    }

    let depths = assign_depths(&flat)?;
    let max_depth = depths.iter().copied().max().unwrap_or(0);

    // levels[d - 1] holds the (parent, step) pairs sitting at depth d.
    let mut roots = Vec::new();
    let mut levels: Vec<Vec<(i64, ImportStep)>> = (0..max_depth).map(|_| Vec::new()).collect();
    for (FlatStep { step, parent }, depth) in flat.into_iter().zip(depths) {
        match parent {
            Some(parent) if depth > 0 => levels[depth - 1].push((parent, step)),
            _ => roots.push(step),
        }
    }

    let mut adopted: AHashMap<i64, Vec<ImportStep>> = AHashMap::new();
    for level in levels.into_iter().rev() {
        for (parent, mut step) in level {
            take_children(&mut step, &mut adopted);
            adopted.entry(parent).or_default().push(step);
        }
    }
    for step in &mut roots {
        take_children(step, &mut adopted);
    }

    tracing::debug!(
        roots = roots.len(),
        depth = max_depth,
        "reconstructed step hierarchy"
    );
    Ok(roots)
}

/// Computes the nesting depth of every entry in `flat`, in input order.
///
/// Fails if a parent reference names an index that does not exist, or if a chain
/// of parent references never reaches a top-level step.
pub fn assign_depths(flat: &[FlatStep]) -> Result<Vec<usize>, CompileError> {
    let mut depths: Vec<Option<usize>> = flat
        .iter()
        .map(|f| f.parent.is_none().then_some(0))
        .collect();

    let mut frontier: AHashSet<i64> = flat
        .iter()
        .filter(|f| f.parent.is_none())
        .map(|f| f.step.index)
        .collect();
    let mut depth = 0;

    while !frontier.is_empty() {
        depth += 1;
        let mut next = AHashSet::new();
        for (entry, slot) in flat.iter().zip(depths.iter_mut()) {
            if slot.is_none() && entry.parent.is_some_and(|p| frontier.contains(&p)) {
                *slot = Some(depth);
                next.insert(entry.step.index);
            }
        }
        frontier = next;
    }

    let known: AHashSet<i64> = flat.iter().map(|f| f.step.index).collect();
    let stranded: Vec<(i64, i64)> = flat
        .iter()
        .zip(&depths)
        .filter(|(_, depth)| depth.is_none())
        .filter_map(|(entry, _)| entry.parent.map(|parent| (entry.step.index, parent)))
        .collect();

    if let Some(&(index, parent)) = stranded.iter().find(|(_, p)| !known.contains(p)) {
        return Err(CompileError::UnresolvedParent { index, parent });
    }
    if let Some(&(index, parent)) = stranded.first() {
        return Err(CompileError::ParentCycle { index, parent });
    }

    Ok(depths.into_iter().map(|d| d.unwrap_or(0)).collect())
}

fn take_children(step: &mut ImportStep, adopted: &mut AHashMap<i64, Vec<ImportStep>>) {
    if let Some(children) = adopted.remove(&step.index) {
        step.children.extend(children);
    }
}
