// crates/provenance-formats/src/slsa_v1/tests.rs
// ============================================================================
// Module: SLSA v1.0 Unit Tests
// Description: Unit coverage for the shared v1.0 builder and its flavors.
// Purpose: Pin parsing and validation edge cases close to the code.
// Dependencies: provenance-formats, provenance-core, serde_json
// ============================================================================

//! ## Overview
//! Unit tests for the parent module's private and public helpers.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers for clarity."
)]

// ============================================================================
// SECTION: Tests
// ============================================================================

use super::*;
use provenance_core::StepRun;
use serde_json::json;

use crate::statement::Predicate;
use crate::statement::STATEMENT_V01;
use crate::statement::STATEMENT_V1;

fn hex(ch: char, len: usize) -> String {
    std::iter::repeat_n(ch, len).collect()
}

fn step_run() -> RunRecord {
    let run: StepRun = serde_json::from_value(json!({
        "metadata": {"name": "build-1", "uid": "uid-1"},
        "status": {
            "startTime": "2026-03-01T10:00:00Z",
            "completionTime": "2026-03-01T10:02:00Z",
            "results": [
                {"name": "IMAGE_URL", "value": "gcr.io/org/web"},
                {"name": "IMAGE_DIGEST", "value": format!("sha256:{}", hex('d', 64))},
                {"name": "REPORT", "value": {
                    "uri": "gs://bucket/report.json",
                    "digest": format!("sha256:{}", hex('e', 64)),
                    "isBuildArtifact": "false"
                }},
                {"name": "SUMMARY", "value": "ok"}
            ]
        }
    }))
    .expect("step-run fixture");
    RunRecord::from(run)
}

#[test]
fn versioned_flavor_suffixes_resource_type() {
    let statement = v2alpha2::build_statement(&step_run(), None).expect("statement");
    let Predicate::SlsaV1(provenance) = &statement.predicate else {
        panic!("expected a v1 predicate");
    };
    assert_eq!(
        provenance.build_definition.build_type,
        "https://chains.tekton.dev/format/slsa/v2alpha2/type/tekton.dev/v1beta1/TaskRun"
    );
    assert_eq!(statement.statement_type, STATEMENT_V01);
    assert!(provenance.run_details.byproducts.is_empty());
}

#[test]
fn configured_flavor_rejects_unknown_build_type() {
    let config = SlsaConfig {
        build_type: "https://example.com/unknown".to_string(),
        ..SlsaConfig::default()
    };
    let err = v2alpha3::build_statement(&step_run(), Some(&config)).unwrap_err();
    assert!(matches!(err, FormatError::UnsupportedBuildType(_)));
    assert!(err.to_string().contains("unsupported buildType"));
}

#[test]
fn metadata_carries_uid_and_timing() {
    let statement = v2alpha3::build_statement(&step_run(), None).expect("statement");
    let value = serde_json::to_value(&statement).expect("json");
    assert_eq!(
        value["predicate"]["runDetails"]["metadata"],
        json!({
            "invocationId": "uid-1",
            "startedOn": "2026-03-01T10:00:00Z",
            "finishedOn": "2026-03-01T10:02:00Z"
        })
    );
}

#[test]
fn older_flavors_take_every_output_as_subject() {
    let statement = v2alpha3::build_statement(&step_run(), None).expect("statement");
    let names: Vec<&str> = statement.subject.iter().map(|subject| subject.name.as_str()).collect();
    assert_eq!(names, vec!["gcr.io/org/web", "gs://bucket/report.json"]);
}

#[test]
fn newest_flavor_restricts_subjects_and_emits_byproducts() {
    let statement = v2alpha4::build_statement(&step_run(), None).expect("statement");
    assert_eq!(statement.statement_type, STATEMENT_V1);
    let names: Vec<&str> = statement.subject.iter().map(|subject| subject.name.as_str()).collect();
    assert_eq!(names, vec!["gcr.io/org/web"]);

    let Predicate::SlsaV1(provenance) = &statement.predicate else {
        panic!("expected a v1 predicate");
    };
    let byproducts: Vec<&str> =
        provenance.run_details.byproducts.iter().filter_map(|entry| entry.name.as_deref()).collect();
    assert_eq!(byproducts, vec!["taskRunResults/REPORT", "taskRunResults/SUMMARY"]);
    let summary = &provenance.run_details.byproducts[1];
    assert_eq!(summary.content.as_deref(), Some(&b"\"ok\""[..]));
    assert_eq!(summary.media_type.as_deref(), Some("application/json"));
}

#[test]
fn blank_builder_id_falls_back_to_default() {
    let config = SlsaConfig {
        builder_id: "  ".to_string(),
        ..SlsaConfig::default()
    };
    let statement = v2alpha4::build_statement(&step_run(), Some(&config)).expect("statement");
    let Predicate::SlsaV1(provenance) = &statement.predicate else {
        panic!("expected a v1 predicate");
    };
    assert_eq!(provenance.run_details.builder.id, provenance_core::DEFAULT_BUILDER_ID);
}
