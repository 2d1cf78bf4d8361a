use super::element::Element;
use super::fragment::steps_element;
use super::writer;
use crate::compiler::{CompiledStep, StepBody};
use crate::error::DocumentError;
use chrono::NaiveDateTime;
use std::io;

/// Capabilities advertised by every generated procedure, in document order.
pub const CAPABILITIES: [&str; 5] = ["Default", "Freeform", "Form", "FileInput", "PDFAsset"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// The compiled workflow together with its envelope fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDocument {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date_modified: NaiveDateTime,
    /// Top-level steps, framed by the start and end steps.
    pub steps: Vec<CompiledStep>,
}

impl ProcedureDocument {
    pub fn assemble(
        id: String,
        title: String,
        description: String,
        date_modified: NaiveDateTime,
        steps: Vec<CompiledStep>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            date_modified,
            steps,
        }
    }

    /// Builds the `<Procedure>` element tree.
    pub fn to_element(&self) -> Element {
        let mut root = Element::new("Procedure").with_attr("IsReport", "false");
        root.push_text("ID", self.id.as_str());
        root.push_text("Title", self.title.as_str());
        root.push_text("Description", self.description.as_str());
        for placeholder in ["DocVersion", "Version", "Author", "Metadata"] {
            root.push_text(placeholder, "");
        }
        root.push_text("Interlocked", "false");
        root.push(Element::new("Report").with_attr("Export", "false"));
        root.push_text(
            "DateModified",
            self.date_modified.format(TIMESTAMP_FORMAT).to_string(),
        );

        let mut capabilities = Element::new("Capabilities");
        for capability in CAPABILITIES {
            capabilities.push_text("Capability", capability);
        }
        root.push(capabilities);
        root.push(steps_element(&self.steps));
        root
    }

    pub fn to_xml(&self) -> Result<String, DocumentError> {
        writer::to_xml_string(&self.to_element())
    }

    pub fn write_xml<W: io::Write>(&self, out: W) -> Result<(), DocumentError> {
        writer::write_xml(&self.to_element(), out)
    }

    /// The element tree as pretty-printed JSON, mostly useful for inspection.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&self.to_element())
            .map_err(|e| DocumentError::Write(e.to_string()))
    }

    /// Identifiers of every step in the document, depth first.
    pub fn step_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        collect_ids(&self.steps, &mut ids);
        ids
    }
}

fn collect_ids<'a>(steps: &'a [CompiledStep], ids: &mut Vec<&'a str>) {
    for step in steps {
        ids.push(step.base.id.as_str());
        if let StepBody::Group { steps, .. } = &step.body {
            collect_ids(steps, ids);
        }
    }
}
