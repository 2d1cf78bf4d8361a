use super::element::Element;
use crate::error::DocumentError;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io;

const INDENT_WIDTH: usize = 2;

/// Serializes `root` as indented XML into `out`.
pub fn write_xml<W: io::Write>(root: &Element, out: W) -> Result<(), DocumentError> {
    let mut writer = Writer::new_with_indent(out, b' ', INDENT_WIDTH);
    write_element(&mut writer, root)
}

/// Serializes `root` as an indented XML string.
pub fn to_xml_string(root: &Element) -> Result<String, DocumentError> {
    let mut buffer = Vec::new();
    write_xml(root, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| DocumentError::Write(e.to_string()))
}

fn write_element<W: io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
) -> Result<(), DocumentError> {
    let start = BytesStart::new(element.name.as_str()).with_attributes(
        element
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );

    if element.text.is_none() && element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    // Text is written even when empty so the closing tag stays on the same line.
    if let Some(text) = element.text.as_deref() {
        emit(writer, Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn emit<W: io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), DocumentError> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Write(e.to_string()))
}
