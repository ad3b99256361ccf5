//! Contract-stability tests.
//!
//! The serialized property names of the input model are a published
//! compatibility surface: the same shapes constrain third-party
//! structured-output generation. These tests pin the names so a refactor
//! cannot drift them silently.

use itempress_core::{AssessmentItemInput, WidgetKind, WidgetSpec};

#[test]
fn test_item_contract_property_names() {
    let item = AssessmentItemInput::from_json(
        r#"{
            "identifier": "item-contract",
            "title": "Contract",
            "body": "<p>b</p>{{interaction:RESPONSE}}",
            "interactions": [{
                "type": "choice",
                "responseIdentifier": "RESPONSE",
                "choices": [{"identifier": "A", "content": "x"}],
                "maxChoices": 1
            }],
            "responseDeclarations": [{
                "identifier": "RESPONSE",
                "baseType": "identifier",
                "correct": ["A"],
                "mapping": {"defaultValue": 0, "entries": [{"mapKey": "A", "mappedValue": 1}]}
            }],
            "outcomeDeclarations": [{"identifier": "SCORE", "normalMaximum": 1}]
        }"#,
    )
    .expect("contract parses");

    let value = serde_json::to_value(&item).expect("serialize");
    let declaration = &value["responseDeclarations"][0];
    assert_eq!(declaration["baseType"], "identifier");
    assert_eq!(declaration["mapping"]["defaultValue"], 0.0);
    assert_eq!(declaration["mapping"]["entries"][0]["mapKey"], "A");
    assert_eq!(value["interactions"][0]["responseIdentifier"], "RESPONSE");
    assert_eq!(value["outcomeDeclarations"][0]["normalMaximum"], 1.0);
}

#[test]
fn test_widget_contract_property_names() {
    let spec: WidgetSpec = serde_json::from_str(
        r#"{
            "type": "coordinatePlane",
            "xAxis": {"min": -5, "max": 5, "tickInterval": 1, "showGridLines": true},
            "yAxis": {"min": -5, "max": 5, "tickInterval": 1},
            "showQuadrantLabels": true,
            "points": [{"id": "a", "x": 1, "y": 2}],
            "lines": [{"id": "l", "equation": {"form": "slopeIntercept", "slope": 1, "yIntercept": 0}}],
            "distances": [{"pointId1": "a", "pointId2": "a", "showLegLabels": true, "hypotenuseLabel": "d"}]
        }"#,
    )
    .expect("contract parses");
    assert_eq!(spec.kind(), WidgetKind::CoordinatePlane);

    let value = serde_json::to_value(&spec).expect("serialize");
    assert_eq!(value["type"], "coordinatePlane");
    assert_eq!(value["xAxis"]["tickInterval"], 1.0);
    assert_eq!(value["xAxis"]["showGridLines"], true);
    assert_eq!(value["lines"][0]["equation"]["yIntercept"], 0.0);
    assert_eq!(value["distances"][0]["pointId1"], "a");
    assert_eq!(value["distances"][0]["hypotenuseLabel"], "d");
}

#[test]
fn test_every_registered_tag_is_camel_case() {
    for kind in WidgetKind::ALL {
        let tag = kind.tag();
        assert!(
            tag.chars().next().is_some_and(char::is_lowercase),
            "{tag} must be camelCase"
        );
        assert!(!tag.contains(['_', '-', ' ']), "{tag} must be camelCase");
    }
}
