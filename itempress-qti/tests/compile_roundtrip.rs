//! Round-trip tests: compile a document, parse it back with a standard
//! XML parser, and check the structural invariants the compiler promises.

use itempress_core::{AssessmentItemInput, AssessmentTestInput, DocumentKind, StimulusInput};
use itempress_qti::{compile_item, compile_stimulus, compile_test, CompileError, CompiledDocument};
use quick_xml::events::Event;
use quick_xml::Reader;

fn item() -> AssessmentItemInput {
    AssessmentItemInput::from_json(
        r#"{
            "identifier": "item-rt-01",
            "title": "Points on a plane",
            "body": "<p>Plot the points.</p>{{widget:plane}}{{interaction:RESPONSE}}",
            "widgets": {
                "plane": {
                    "type": "coordinatePlane",
                    "xAxis": {"min": -10, "max": 10, "tickInterval": 2},
                    "yAxis": {"min": -10, "max": 10, "tickInterval": 2},
                    "points": [
                        {"id": "a", "x": -4, "y": 3},
                        {"id": "b", "x": 2, "y": -1},
                        {"id": "c", "x": 6, "y": 6}
                    ]
                }
            },
            "interactions": [{
                "type": "textEntry",
                "responseIdentifier": "RESPONSE",
                "expectedLength": 4
            }],
            "responseDeclarations": [{
                "identifier": "RESPONSE",
                "baseType": "string",
                "correct": ["(2,-1)"]
            }],
            "outcomeDeclarations": [{"identifier": "SCORE"}]
        }"#,
    )
    .expect("valid item")
}

/// Parse a compiled document and return `(root_tag, identifier, title)`.
///
/// Panics if the document is not well formed or has more than one root.
fn parse_root(document: &CompiledDocument) -> (String, String, String) {
    let mut reader = Reader::from_str(document.xml());
    let mut roots = 0usize;
    let mut depth = 0usize;
    let mut root = (String::new(), String::new(), String::new());

    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Eof => break,
            Event::Start(e) => {
                if depth == 0 {
                    roots += 1;
                    root.0 = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    for attr in e.attributes() {
                        let attr = attr.expect("attribute");
                        let value = String::from_utf8_lossy(&attr.value).into_owned();
                        match attr.key.as_ref() {
                            b"identifier" => root.1 = value,
                            b"title" => root.2 = value,
                            _ => {}
                        }
                    }
                }
                depth += 1;
            }
            Event::End(_) => depth -= 1,
            _ => {}
        }
    }
    assert_eq!(roots, 1, "expected exactly one root element");
    root
}

// ==========================================================================
// Structural invariants
// ==========================================================================

#[test]
fn test_item_round_trip_single_matching_root() {
    let document = compile_item(&item()).expect("compile");
    let (tag, identifier, title) = parse_root(&document);
    assert_eq!(tag, DocumentKind::Item.root_tag());
    assert_eq!(identifier, "item-rt-01");
    assert_eq!(title, "Points on a plane");
}

#[test]
fn test_test_round_trip_single_matching_root() {
    let test: AssessmentTestInput = serde_json::from_str(
        r#"{
            "identifier": "test-rt-01",
            "title": "Quiz",
            "sections": [{
                "identifier": "s1",
                "title": "Part one",
                "itemRefs": [
                    {"identifier": "i1", "href": "items/i1.xml"},
                    {"identifier": "i2", "href": "items/i2.xml"}
                ]
            }]
        }"#,
    )
    .expect("parse");
    let document = compile_test(&test).expect("compile");
    let (tag, identifier, _) = parse_root(&document);
    assert_eq!(tag, DocumentKind::Test.root_tag());
    assert_eq!(identifier, "test-rt-01");
}

#[test]
fn test_stimulus_round_trip_single_matching_root() {
    let stimulus = StimulusInput {
        identifier: "stim-rt-01".to_string(),
        title: "The water cycle".to_string(),
        body: "<p>Water evaporates.</p>".to_string(),
    };
    let document = compile_stimulus(&stimulus).expect("compile");
    let (tag, identifier, title) = parse_root(&document);
    assert_eq!(tag, DocumentKind::Stimulus.root_tag());
    assert_eq!(identifier, "stim-rt-01");
    assert_eq!(title, "The water cycle");
}

#[test]
fn test_widget_svg_survives_xml_parsing() {
    let document = compile_item(&item()).expect("compile");
    // The embedded fragment keeps its own namespace and all three markers.
    assert!(document.xml().contains("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert_eq!(document.xml().matches("<circle").count(), 3);
    // And the whole document still parses as one XML tree.
    parse_root(&document);
}

// ==========================================================================
// Local rejection happens before anything else
// ==========================================================================

#[test]
fn test_missing_title_rejected_before_compilation() {
    let mut bad = item();
    bad.title = String::new();
    let err = compile_item(&bad).expect_err("must fail");
    assert!(matches!(err, CompileError::Schema(_)), "{err}");
}

#[test]
fn test_unsafe_body_rejected_before_compilation() {
    let mut bad = item();
    bad.body = format!("<iframe src=\"https://evil.example\"></iframe>{}", bad.body);
    let err = compile_item(&bad).expect_err("must fail");
    assert!(matches!(err, CompileError::Sanitize(_)), "{err}");
}

#[test]
fn test_multi_entry_string_mapping_permitted_but_detectable() {
    let mut smelly = item();
    smelly.response_declarations[0].mapping = Some(itempress_core::ResponseMapping {
        default_value: 0.0,
        entries: vec![
            itempress_core::MappingEntry { map_key: "(2,-1)".to_string(), mapped_value: 1.0 },
            itempress_core::MappingEntry { map_key: "( 2, -1 )".to_string(), mapped_value: 1.0 },
        ],
    });

    // The compiler permits the document...
    let document = compile_item(&smelly).expect("compile");
    assert_eq!(document.xml().matches("qti-map-entry").count(), 2);

    // ...while the audit flags it for downstream handling.
    let findings = itempress_qti::multi_entry_string_mappings(&smelly);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].entry_count, 2);
}
