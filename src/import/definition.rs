use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// Index of the implicit start step injected at the head of every level.
pub const START_STEP_INDEX: i64 = -1;
/// Index of the implicit end step injected at the tail of every level.
pub const END_STEP_INDEX: i64 = -2;

/// The kind of a step, which decides how it is compiled.
///
/// Parsing is lenient: names are matched case-insensitively and anything
/// unrecognised becomes [`StepKind::Instruction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum StepKind {
    #[default]
    Instruction,
    Text,
    Numeric,
    Photo,
    Video,
    Signature,
    Barcode,
    Selection,
    Decision,
    Group,
    DateTime,
    Start,
    End,
}

impl StepKind {
    pub const ALL: [StepKind; 13] = [
        StepKind::Instruction,
        StepKind::Text,
        StepKind::Numeric,
        StepKind::Photo,
        StepKind::Video,
        StepKind::Signature,
        StepKind::Barcode,
        StepKind::Selection,
        StepKind::Decision,
        StepKind::Group,
        StepKind::DateTime,
        StepKind::Start,
        StepKind::End,
    ];

    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .unwrap_or_else(|| {
                if !normalized.is_empty() {
                    tracing::debug!(kind = %name, "unknown step kind, treating as instruction");
                }
                StepKind::Instruction
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Instruction => "instruction",
            StepKind::Text => "text",
            StepKind::Numeric => "numeric",
            StepKind::Photo => "photo",
            StepKind::Video => "video",
            StepKind::Signature => "signature",
            StepKind::Barcode => "barcode",
            StepKind::Selection => "selection",
            StepKind::Decision => "decision",
            StepKind::Group => "group",
            StepKind::DateTime => "datetime",
            StepKind::Start => "start",
            StepKind::End => "end",
        }
    }
}

impl From<&str> for StepKind {
    fn from(name: &str) -> Self {
        StepKind::from_name(name)
    }
}

impl From<String> for StepKind {
    fn from(name: String) -> Self {
        StepKind::from_name(&name)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared, optionally labelled edge to a sibling step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecisionPath {
    #[serde(rename = "stepIndex")]
    pub target: i64,
    #[serde(rename = "decisionName", default, deserialize_with = "null_as_default")]
    pub label: String,
}

impl DecisionPath {
    pub fn new(target: i64, label: impl Into<String>) -> Self {
        Self {
            target,
            label: label.into(),
        }
    }
}

/// Free-form per-step flags. Keys are always stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepConfig(BTreeMap<String, String>);

impl StepConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.trim().to_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Reads `key` as a boolean flag, falling back to `default` when it is absent.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).map(is_truthy).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for StepConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = StepConfig::new();
        for (key, value) in iter {
            config.insert(key.as_ref(), value);
        }
        config
    }
}

impl<'de> Deserialize<'de> for StepConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect())
    }
}

/// `true`, `yes`, `y` and `1` (any case, surrounding whitespace ignored) are true.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// One authored step of a workflow.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ImportStep {
    #[serde(rename = "stepId", default)]
    pub id: Option<String>,
    #[serde(rename = "stepIndex")]
    pub index: i64,
    #[serde(rename = "stepTitle", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "stepDescription", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "stepTag", default, deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(rename = "stepType", default, deserialize_with = "null_as_default")]
    pub kind: StepKind,
    /// Outgoing edges. Empty means "continue with the next sibling".
    #[serde(rename = "decisionPaths", default, deserialize_with = "null_as_default")]
    pub decision_paths: Vec<DecisionPath>,
    #[serde(rename = "selectionOptions", default, deserialize_with = "null_as_default")]
    pub selection_options: Vec<String>,
    #[serde(rename = "steps", alias = "children", default, deserialize_with = "null_as_default")]
    pub children: Vec<ImportStep>,
    #[serde(default)]
    pub config: StepConfig,
}

impl ImportStep {
    pub fn new(index: i64, kind: StepKind, title: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_path(mut self, target: i64, label: impl Into<String>) -> Self {
        self.decision_paths.push(DecisionPath::new(target, label));
        self
    }

    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.selection_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_config(mut self, key: &str, value: impl Into<String>) -> Self {
        self.config.insert(key, value);
        self
    }

    pub fn with_children(mut self, children: Vec<ImportStep>) -> Self {
        self.children = children;
        self
    }

    /// Total number of steps in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ImportStep::subtree_len).sum::<usize>()
    }
}

/// A flat step as read from tabular input, before its parent reference is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatStep {
    pub step: ImportStep,
    pub parent: Option<i64>,
}

impl FlatStep {
    pub fn top_level(step: ImportStep) -> Self {
        Self { step, parent: None }
    }

    pub fn child_of(step: ImportStep, parent: i64) -> Self {
        Self {
            step,
            parent: Some(parent),
        }
    }
}

/// A complete workflow description, ready for compilation.
///
/// In structured input both `workflowTitle` and `workflowSteps` must be present.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ImportWorkflow {
    #[serde(rename = "workflowTitle")]
    pub title: String,
    #[serde(rename = "workflowDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "workflowSteps")]
    pub steps: Vec<ImportStep>,
}

impl ImportWorkflow {
    pub fn new(title: impl Into<String>, steps: Vec<ImportStep>) -> Self {
        Self {
            title: title.into(),
            description: None,
            steps,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
