//! Tests for the procedure document: envelope, step elements and XML output.
mod common;
use common::*;
use workflo_gen::document::CAPABILITIES;
use workflo_gen::prelude::*;

fn linear_document() -> ProcedureDocument {
    compile(create_linear_workflow()).expect("Failed to compile")
}

#[test]
fn test_envelope_fields_in_order() {
    let root = linear_document().to_element();

    assert_eq!(root.name, "Procedure");
    assert_eq!(root.attr("IsReport"), Some("false"));

    let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "ID",
            "Title",
            "Description",
            "DocVersion",
            "Version",
            "Author",
            "Metadata",
            "Interlocked",
            "Report",
            "DateModified",
            "Capabilities",
            "Steps"
        ]
    );

    assert_eq!(root.child("ID").map(Element::text), Some("id-0011"));
    assert_eq!(root.child("Title").map(Element::text), Some("Pump inspection"));
    assert_eq!(root.child("Interlocked").map(Element::text), Some("false"));
    assert_eq!(
        root.child("Report").and_then(|r| r.attr("Export")),
        Some("false")
    );
    assert_eq!(
        root.child("DateModified").map(Element::text),
        Some("2024-03-01T09:30:15.123456")
    );
}

#[test]
fn test_capabilities_are_listed_in_order() {
    let root = linear_document().to_element();
    let capabilities: Vec<&str> = root
        .child("Capabilities")
        .map(|c| c.children_named("Capability").map(Element::text).collect())
        .unwrap_or_default();

    assert_eq!(capabilities, CAPABILITIES.to_vec());
}

#[test]
fn test_step_elements_follow_compiled_order() {
    let root = linear_document().to_element();
    let steps = root.child("Steps").expect("Missing Steps element");
    let steps = step_elements(steps);

    let types: Vec<&str> = steps.iter().filter_map(|s| s.attr("Type")).collect();
    assert_eq!(
        types,
        vec![
            "StartStep",
            "ConfirmStep",
            "DecisionStep",
            "InputStep",
            "TerminateGroupStep"
        ]
    );

    let titles: Vec<&str> = steps.iter().map(|s| step_title(s)).collect();
    assert_eq!(
        titles,
        vec![
            "Start",
            "Isolate the pump",
            "Seal intact?",
            "Photograph the leak",
            "End"
        ]
    );
}

#[test]
fn test_designer_positions() {
    let root = linear_document().to_element();
    let steps = step_elements(root.child("Steps").expect("Missing Steps element"));

    let positions: Vec<&str> = steps
        .iter()
        .filter_map(|s| s.find(&["Base", "DesignerData", "Position"]))
        .map(Element::text)
        .collect();
    assert_eq!(
        positions,
        vec!["50,100", "50,200", "50,300", "50,400", "50,500"]
    );

    let size = steps[0].find(&["Base", "DesignerData", "Size"]);
    assert_eq!(size.map(Element::text), Some("0,0"));
}

#[test]
fn test_connections_and_anchors() {
    let root = linear_document().to_element();
    let steps = step_elements(root.child("Steps").expect("Missing Steps element"));
    let decision = steps[2];

    let connections: Vec<&Element> = decision
        .find(&["Base", "Connections"])
        .map(|c| c.children_named("Connection").collect())
        .unwrap_or_default();
    assert_eq!(connections.len(), 2);
    assert_eq!(connections[0].attr("Type"), Some("No"));
    assert_eq!(connections[0].attr("ID"), Some("id-0008"));
    assert_eq!(connections[0].attr("Source"), Some("id-0003"));
    assert_eq!(connections[0].attr("Sink"), Some("id-0004"));
    assert_eq!(connections[1].attr("Type"), Some("Yes"));
    assert_eq!(connections[1].attr("Sink"), Some("id-0005"));

    let anchors: Vec<(Option<&str>, Option<&str>)> = decision
        .find(&["Base", "DesignerData", "ConnectionAnchors"])
        .map(|a| {
            a.children_named("Connection")
                .map(|c| (c.attr("ID"), c.attr("Anchor")))
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(
        anchors,
        vec![
            (Some("id-0008"), Some("Bottom|Top")),
            (Some("id-0009"), Some("Bottom|Top"))
        ]
    );

    // The end step has no outgoing edges, so neither block is written.
    let end = steps[4];
    assert!(end.find(&["Base", "Connections"]).is_none());
    assert!(end.find(&["Base", "DesignerData", "ConnectionAnchors"]).is_none());
}

#[test]
fn test_tag_is_written_only_when_present() {
    let root = linear_document().to_element();
    let steps = step_elements(root.child("Steps").expect("Missing Steps element"));

    assert!(steps[0].find(&["Base", "Tag"]).is_none());
    assert!(steps[1].find(&["Base", "Tag"]).is_none());
    assert_eq!(
        steps[3].find(&["Base", "Tag"]).map(Element::text),
        Some("evidence")
    );
}

#[test]
fn test_input_step_fields() {
    let root = linear_document().to_element();
    let steps = step_elements(root.child("Steps").expect("Missing Steps element"));
    let photo = steps[3];

    assert_eq!(photo.child("InputType").map(Element::text), Some("Photo"));
    assert_eq!(photo.child("IsOptional").map(Element::text), Some("false"));
    assert!(photo.child("DynamicUrl").is_none());
    assert_eq!(
        photo
            .find(&["InputParameter", "Constraint", "ConstraintType"])
            .map(Element::text),
        Some("None")
    );
}

#[test]
fn test_selection_constraint_fields() {
    let workflow = ImportWorkflow::new(
        "Selection",
        vec![
            ImportStep::new(1, StepKind::Selection, "Colour")
                .with_options(["Red", "Green"])
                .with_config("multi", "yes"),
        ],
    );
    let root = compile(workflow).expect("Failed to compile").to_element();
    let steps = step_elements(root.child("Steps").expect("Missing Steps element"));
    let constraint = steps[1]
        .find(&["InputParameter", "Constraint"])
        .expect("Missing Constraint element");

    let choices: Vec<&str> = constraint
        .child("Choices")
        .map(|c| c.children_named("Choice").map(Element::text).collect())
        .unwrap_or_default();
    assert_eq!(choices, vec!["Red", "Green"]);
    assert_eq!(constraint.child("FixedMode").map(Element::text), Some("true"));
    assert_eq!(constraint.child("MinSelection").map(Element::text), Some("1"));
    assert_eq!(constraint.child("MaxSelection").map(Element::text), Some("2"));
}

#[test]
fn test_datetime_constraint_fields() {
    let workflow = ImportWorkflow::new(
        "When",
        vec![ImportStep::new(1, StepKind::DateTime, "Arrival")],
    );
    let root = compile(workflow).expect("Failed to compile").to_element();
    let steps = step_elements(root.child("Steps").expect("Missing Steps element"));
    let constraint = steps[1]
        .find(&["InputParameter", "Constraint"])
        .expect("Missing Constraint element");

    assert_eq!(constraint.child("DisplayDate").map(Element::text), Some("true"));
    assert_eq!(constraint.child("DisplayTime").map(Element::text), Some("true"));
}

#[test]
fn test_group_step_nests_its_level() {
    let root = compile(create_grouped_workflow())
        .expect("Failed to compile")
        .to_element();
    let steps = step_elements(root.child("Steps").expect("Missing Steps element"));
    let group = steps[1];

    assert_eq!(group.attr("Type"), Some("GroupStep"));
    assert_eq!(group.attr("IsReport"), Some("true"));

    let inner = step_elements(group.child("Steps").expect("Missing nested Steps"));
    let titles: Vec<&str> = inner.iter().map(|s| step_title(s)).collect();
    assert_eq!(
        titles,
        vec!["Start", "Gate number", "Fence height", "Gate photo", "End"]
    );

    // Positions restart inside the group.
    assert_eq!(
        inner[1]
            .find(&["Base", "DesignerData", "Position"])
            .map(Element::text),
        Some("50,200")
    );
}

#[test]
fn test_xml_output() {
    let xml = linear_document().to_xml().expect("Failed to write XML");

    assert!(xml.starts_with("<Procedure IsReport=\"false\">"));
    assert!(xml.trim_end().ends_with("</Procedure>"));
    assert!(xml.contains("<Report Export=\"false\"/>"));
    assert!(xml.contains("<Description></Description>"));
    assert!(xml.contains("<DateModified>2024-03-01T09:30:15.123456</DateModified>"));
    assert!(xml.contains("<Step Type=\"DecisionStep\">"));
    assert!(xml.contains(
        "<Connection Type=\"No\" ID=\"id-0008\" Source=\"id-0003\" Sink=\"id-0004\"/>"
    ));
    assert!(xml.contains("<Connection ID=\"id-0008\" Anchor=\"Bottom|Top\"/>"));
    assert!(xml.contains("\n  <Title>Pump inspection</Title>"));
}

#[test]
fn test_xml_text_is_escaped() {
    let workflow = ImportWorkflow::new(
        "Nuts & bolts",
        vec![ImportStep::new(1, StepKind::Instruction, "Torque <50 Nm")],
    );
    let xml = compile(workflow)
        .expect("Failed to compile")
        .to_xml()
        .expect("Failed to write XML");

    assert!(xml.contains("<Title>Nuts &amp; bolts</Title>"));
    assert!(xml.contains("<Title>Torque &lt;50 Nm</Title>"));
}

#[test]
fn test_write_xml_matches_string_output() {
    let document = linear_document();
    let mut buffer = Vec::new();
    document.write_xml(&mut buffer).expect("Failed to write XML");

    let written = String::from_utf8(buffer).expect("Output should be UTF-8");
    assert_eq!(written, document.to_xml().expect("Failed to write XML"));
}

#[test]
fn test_json_output_mirrors_the_element_tree() {
    let json = linear_document().to_json().expect("Failed to write JSON");
    let value: serde_json::Value = serde_json::from_str(&json).expect("Output should be JSON");

    assert_eq!(value["name"], "Procedure");
    assert_eq!(value["attributes"][0][0], "IsReport");
    assert_eq!(value["children"][1]["text"], "Pump inspection");
}

#[test]
fn test_generate_from_csv_end_to_end() {
    let document = workflo_gen::generate_from_csv(
        SAMPLE_CSV.as_bytes(),
        Some("Site walk"),
        Some("Quarterly walk-through"),
    )
    .expect("Failed to generate");

    assert_eq!(document.title, "Site walk");
    assert_eq!(document.description, "Quarterly walk-through");
    assert_eq!(document.steps.len(), 5);

    let decision = &document.steps[2];
    let group = &document.steps[3];
    assert_eq!(decision.base.tag.as_deref(), Some("safety"));
    assert_eq!(decision.base.connections[0].sink, group.base.id);
    assert_eq!(decision.base.connections[1].sink, document.steps[4].base.id);

    match &group.body {
        StepBody::Group { is_form, steps } => {
            assert!(is_form);
            assert_eq!(steps.len(), 4);
        }
        other => panic!("Expected a group, got {:?}", other),
    }
}

#[test]
fn test_generate_from_json_end_to_end() {
    let json = r#"{
        "workflowTitle": "",
        "workflowSteps": [
            { "stepIndex": 1, "stepTitle": "Only step", "stepType": "barcode" }
        ]
    }"#;

    let document = workflo_gen::generate_from_json(json).expect("Failed to generate");
    assert_eq!(document.title, "My Workflow");
    assert_eq!(document.description, "Generated workflow");
    assert_eq!(document.steps.len(), 3);
}

#[test]
fn test_generation_errors_are_reported() {
    let csv = "StepIndex,StepTitle\n3,A\n3,B\n";
    let error = workflo_gen::generate_from_csv(csv.as_bytes(), None, None)
        .expect_err("Duplicate indexes should be rejected");

    assert_eq!(
        error,
        GeneratorError::Compile(CompileError::DuplicateStepIndex { index: 3 })
    );
    assert!(error.is_client_error());
    assert_eq!(
        error.to_string(),
        "Step index 3 appears more than once within the same group"
    );
}
