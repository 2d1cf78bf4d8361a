use super::definition::ImportWorkflow;
use crate::error::InputError;
use std::io;

/// Parses a structured workflow definition whose steps are already nested.
pub fn from_json(json: &str) -> Result<ImportWorkflow, InputError> {
    serde_json::from_str(json).map_err(|e| InputError::Json(e.to_string()))
}

/// Like [`from_json`], reading from any byte source.
pub fn from_reader<R: io::Read>(reader: R) -> Result<ImportWorkflow, InputError> {
    serde_json::from_reader(reader).map_err(|e| InputError::Json(e.to_string()))
}
