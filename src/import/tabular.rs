//! Tabular (CSV) step input.
//!
//! Each record describes one step. Nesting is expressed through the `Parent`
//! column, which holds the `StepIndex` of the enclosing group; the hierarchy is
//! rebuilt when the table is converted into a workflow.

use super::conversion::IntoWorkflow;
use super::definition::{DecisionPath, FlatStep, ImportStep, ImportWorkflow, StepConfig, StepKind};
use crate::error::{GeneratorError, InputError};
use crate::hierarchy;
use serde::Deserialize;
use std::io;

/// One raw record, exactly as it appears in the table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepRow {
    #[serde(rename = "StepId", default)]
    pub id: Option<String>,
    #[serde(rename = "StepIndex")]
    pub index: String,
    #[serde(rename = "StepTitle", default)]
    pub title: Option<String>,
    #[serde(rename = "StepDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "StepTag", default)]
    pub tag: Option<String>,
    #[serde(rename = "StepType", default)]
    pub kind: Option<String>,
    #[serde(rename = "DecisionPaths", default)]
    pub decision_paths: Option<String>,
    #[serde(rename = "SelectionOptions", default)]
    pub selection_options: Option<String>,
    #[serde(rename = "Config", default)]
    pub config: Option<String>,
    #[serde(rename = "Parent", default)]
    pub parent: Option<String>,
}

impl StepRow {
    /// Converts the raw cells into a typed step. `record` is the 1-based record
    /// number used in error messages.
    pub fn into_flat_step(self, record: u64) -> Result<FlatStep, InputError> {
        let index = parse_integer(record, "StepIndex", &self.index)?;
        let parent = match non_empty(self.parent) {
            Some(cell) => Some(parse_integer(record, "Parent", &cell)?),
            None => None,
        };

        let step = ImportStep {
            id: non_empty(self.id),
            index,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            tag: self.tag.unwrap_or_default(),
            kind: self
                .kind
                .as_deref()
                .map(StepKind::from_name)
                .unwrap_or_default(),
            decision_paths: match non_empty(self.decision_paths) {
                Some(cell) => parse_decision_paths(record, &cell)?,
                None => Vec::new(),
            },
            selection_options: self
                .selection_options
                .as_deref()
                .map(parse_options)
                .unwrap_or_default(),
            children: Vec::new(),
            config: match non_empty(self.config) {
                Some(cell) => parse_config(record, &cell)?,
                None => StepConfig::new(),
            },
        };

        Ok(FlatStep { step, parent })
    }
}

/// A workflow read from a table, together with the workflow-level fields that
/// travel alongside it.
#[derive(Debug, Clone, Default)]
pub struct TabularWorkflow {
    pub title: String,
    pub description: Option<String>,
    pub rows: Vec<StepRow>,
}

impl TabularWorkflow {
    /// Reads all records from `reader`. The first line must be a header row.
    pub fn from_reader<R: io::Read>(
        reader: R,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, InputError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let rows = csv_reader
            .deserialize::<StepRow>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| InputError::Csv {
                record: e.position().map(|p| p.record()).unwrap_or(0),
                message: e.to_string(),
            })?;

        tracing::debug!(rows = rows.len(), "read tabular step input");
        Ok(Self {
            title: title.unwrap_or_default().to_string(),
            description: description.map(str::to_string),
            rows,
        })
    }

    /// Converts every record into a flat step, keeping parent references.
    pub fn flat_steps(self) -> Result<Vec<FlatStep>, InputError> {
        self.rows
            .into_iter()
            .zip(1..)
            .map(|(row, record)| row.into_flat_step(record))
            .collect()
    }
}

impl IntoWorkflow for TabularWorkflow {
    fn into_workflow(self) -> Result<ImportWorkflow, GeneratorError> {
        let title = self.title.clone();
        let description = self.description.clone();
        let steps = hierarchy::build_forest(self.flat_steps()?)?;
        Ok(ImportWorkflow {
            title,
            description,
            steps,
        })
    }
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|value| !value.trim().is_empty())
}

/// Accepts plain integers as well as integral decimals such as `3.0`, which
/// spreadsheet exports commonly produce for numeric columns.
fn parse_integer(record: u64, column: &'static str, cell: &str) -> Result<i64, InputError> {
    let value = cell.trim();
    if let Ok(parsed) = value.parse::<i64>() {
        return Ok(parsed);
    }
    let invalid = |reason: &str| InputError::InvalidCell {
        record,
        column,
        value: cell.to_string(),
        reason: reason.to_string(),
    };
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed.fract() == 0.0 => {
            // `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
            if parsed >= i64::MIN as f64 && parsed < i64::MAX as f64 {
                Ok(parsed as i64)
            } else {
                Err(invalid("out of range"))
            }
        }
        _ => Err(invalid("expected an integer")),
    }
}

/// Parses `label:targetIndex;label:targetIndex`. A bare `targetIndex` is an unlabelled path.
fn parse_decision_paths(record: u64, cell: &str) -> Result<Vec<DecisionPath>, InputError> {
    cell.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (label, target) = item.rsplit_once(':').unwrap_or(("", item));
            let target = parse_integer(record, "DecisionPaths", target)?;
            Ok(DecisionPath::new(target, label.trim()))
        })
        .collect()
}

fn parse_options(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `key:value;key:value`. Keys are lower-cased.
fn parse_config(record: u64, cell: &str) -> Result<StepConfig, InputError> {
    let mut config = StepConfig::new();
    for item in cell.split(';').map(str::trim).filter(|item| !item.is_empty()) {
        let (key, value) = item.split_once(':').ok_or_else(|| InputError::InvalidCell {
            record,
            column: "Config",
            value: item.to_string(),
            reason: "expected 'key:value'".to_string(),
        })?;
        config.insert(key, value.trim());
    }
    Ok(config)
}
