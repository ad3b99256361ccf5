//! Integration tests for the remote round-trip protocol, driven against a
//! wiremock stand-in for the authoritative validator.

use std::time::Duration;

use itempress_core::StimulusInput;
use itempress_qti::{compile_stimulus, CompiledDocument};
use itempress_validator::{RoundTripValidator, ValidatorConfig, ValidatorError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stimulus_document(identifier: &str) -> CompiledDocument {
    compile_stimulus(&StimulusInput {
        identifier: identifier.to_string(),
        title: "Passage".to_string(),
        body: "<p>Water evaporates.</p>".to_string(),
    })
    .expect("compile")
}

async fn validator(server: &MockServer) -> RoundTripValidator {
    let config = ValidatorConfig::new(&server.uri())
        .expect("config")
        .with_batch_size(2)
        .with_batch_delay(Duration::from_millis(0));
    RoundTripValidator::new(reqwest::Client::new(), config)
}

// ==========================================================================
// Protocol steps
// ==========================================================================

#[tokio::test]
async fn test_accepts_document_and_always_deletes_temp() {
    let server = MockServer::start().await;
    let temp_path = "/api/documents/zz-itempress-check-stim-1";

    Mock::given(method("PUT"))
        .and(path(temp_path))
        .and(body_partial_json(serde_json::json!({"schema": "stimulus"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(temp_path))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let report = validator(&server)
        .await
        .validate_one(&stimulus_document("stim-1"))
        .await;

    assert_eq!(report.identifier, "stim-1");
    assert_eq!(report.temp_identifier, "zz-itempress-check-stim-1");
    assert!(report.accepted());
}

#[tokio::test]
async fn test_creates_when_update_reports_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/documents/zz-itempress-check-stim-2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/documents"))
        .and(body_partial_json(
            serde_json::json!({"identifier": "zz-itempress-check-stim-2"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/zz-itempress-check-stim-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let report = validator(&server)
        .await
        .validate_one(&stimulus_document("stim-2"))
        .await;
    assert!(report.accepted());
}

#[tokio::test]
async fn test_schema_rejection_is_an_answer_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": false})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let report = validator(&server)
        .await
        .validate_one(&stimulus_document("stim-3"))
        .await;
    assert!(matches!(report.outcome, Ok(false)));
    assert!(!report.accepted());
}

#[tokio::test]
async fn test_cleanup_failure_does_not_fail_the_check() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let report = validator(&server)
        .await
        .validate_one(&stimulus_document("stim-4"))
        .await;
    assert!(report.accepted());
}

// ==========================================================================
// Batching
// ==========================================================================

#[tokio::test]
async fn test_batch_preserves_order_and_isolates_failures() {
    let server = MockServer::start().await;

    // stim-a validates, stim-b hits a server error, stim-c validates.
    for (id, template) in [
        ("a", ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true}))),
        ("b", ResponseTemplate::new(500).set_body_string("boom")),
        ("c", ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true}))),
    ] {
        Mock::given(method("PUT"))
            .and(path(format!("/api/documents/zz-itempress-check-stim-{id}")))
            .respond_with(template)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let documents = [
        stimulus_document("stim-a"),
        stimulus_document("stim-b"),
        stimulus_document("stim-c"),
    ];
    let reports = validator(&server).await.validate_batch(&documents).await;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].identifier, "stim-a");
    assert_eq!(reports[1].identifier, "stim-b");
    assert_eq!(reports[2].identifier, "stim-c");

    assert!(reports[0].accepted());
    assert!(matches!(
        reports[1].outcome,
        Err(ValidatorError::Api { status: 500, .. })
    ));
    assert!(reports[2].accepted(), "failure must not cascade to siblings");
}

#[tokio::test]
async fn test_temp_identifier_never_equals_production_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let document = stimulus_document("stim-5");
    let report = validator(&server).await.validate_one(&document).await;
    assert_ne!(report.temp_identifier, report.identifier);
    assert!(report.temp_identifier.ends_with(&report.identifier));
}
