use super::element::Element;
use crate::compiler::{CompiledStep, Connection, Constraint, InputStep, StepBase, StepBody};

const DESIGNER_X: usize = 50;
const DESIGNER_ROW_HEIGHT: usize = 100;
const ANCHOR: &str = "Bottom|Top";

/// Renders a compiled step as a `<Step>` element.
pub fn step_element(step: &CompiledStep) -> Element {
    let mut element = Element::new("Step").with_attr("Type", step.body.type_name());
    element.push(base_element(&step.base));

    match &step.body {
        StepBody::Confirm | StepBody::Start | StepBody::Terminate | StepBody::Decision => {}
        StepBody::Input(input) => push_input(&mut element, input),
        StepBody::Group { is_form, steps } => {
            element.push(steps_element(steps));
            element.set_attr("IsReport", bool_text(*is_form));
        }
    }
    element
}

/// Renders one level as a `<Steps>` element.
pub fn steps_element(steps: &[CompiledStep]) -> Element {
    let mut element = Element::new("Steps");
    for step in steps {
        element.push(step_element(step));
    }
    element
}

fn base_element(base: &StepBase) -> Element {
    let mut element = Element::new("Base").with_attr("ID", base.id.as_str());
    element.push_text("Title", base.title.as_str());
    element.push_text("Description", base.description.as_str());
    if let Some(tag) = &base.tag {
        element.push_text("Tag", tag.as_str());
    }
    if !base.connections.is_empty() {
        let mut connections = Element::new("Connections");
        for connection in &base.connections {
            connections.push(connection_element(connection));
        }
        element.push(connections);
    }

    let mut designer = Element::new("DesignerData");
    designer.push_text(
        "Position",
        format!(
            "{},{}",
            DESIGNER_X,
            DESIGNER_ROW_HEIGHT * (1 + base.position)
        ),
    );
    designer.push_text("Size", "0,0");
    if !base.connections.is_empty() {
        let mut anchors = Element::new("ConnectionAnchors");
        for connection in &base.connections {
            anchors.push(
                Element::new("Connection")
                    .with_attr("ID", connection.id.as_str())
                    .with_attr("Anchor", ANCHOR),
            );
        }
        designer.push(anchors);
    }
    element.push(designer);
    element
}

fn connection_element(connection: &Connection) -> Element {
    Element::new("Connection")
        .with_attr("Type", connection.label.as_str())
        .with_attr("ID", connection.id.as_str())
        .with_attr("Source", connection.source.as_str())
        .with_attr("Sink", connection.sink.as_str())
}

fn push_input(element: &mut Element, input: &InputStep) {
    element.push_text("InputType", input.input_type.as_str());
    element.push_text("IsOptional", bool_text(input.optional));
    if let Some(url) = &input.dynamic_url {
        element.push_text("DynamicUrl", url.as_str());
    }

    let mut constraint = Element::new("Constraint");
    match &input.constraint {
        Constraint::Unconstrained => constraint.push_text("ConstraintType", "None"),
        Constraint::DateTime => {
            constraint.push_text("DisplayDate", "true");
            constraint.push_text("DisplayTime", "true");
        }
        Constraint::Selection {
            choices,
            fixed_mode,
            min_selection,
            max_selection,
        } => {
            let mut choices_element = Element::new("Choices");
            for choice in choices {
                choices_element.push_text("Choice", choice.as_str());
            }
            constraint.push(choices_element);
            constraint.push_text("FixedMode", bool_text(*fixed_mode));
            constraint.push_text("MinSelection", min_selection.to_string());
            constraint.push_text("MaxSelection", max_selection.to_string());
        }
    }
    element.push(Element::new("InputParameter").with_child(constraint));
}

fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
