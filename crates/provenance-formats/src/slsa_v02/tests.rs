// crates/provenance-formats/src/slsa_v02/tests.rs
// ============================================================================
// Module: SLSA v0.2 Unit Tests
// Description: Unit coverage for the legacy predicate builder.
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
use provenance_core::DEFAULT_BUILDER_ID;
use provenance_core::StepRun;
use serde_json::json;

fn hex(ch: char, len: usize) -> String {
    std::iter::repeat_n(ch, len).collect()
}

fn step_run() -> RunRecord {
    let run: StepRun = serde_json::from_value(json!({
        "metadata": {
            "name": "build-1",
            "uid": "0b5c",
            "labels": {"app": "web", "chains.tekton.dev/signed": "true"},
            "annotations": {"kubectl.kubernetes.io/last-applied-configuration": "{}"}
        },
        "spec": {"params": [{"name": "revision", "value": "main"}]},
        "status": {
            "startTime": "2026-03-01T10:00:00Z",
            "completionTime": "2026-03-01T10:02:00Z",
            "steps": [{"name": "build", "imageID": format!("docker-pullable://gcr.io/builder@sha256:{}", hex('b', 64))}],
            "results": [
                {"name": "IMAGE_URL", "value": "gcr.io/org/web:v1"},
                {"name": "IMAGE_DIGEST", "value": format!("sha256:{}", hex('d', 64))}
            ],
            "taskSpec": {
                "params": [{"name": "revision"}, {"name": "flags", "default": "-v"}],
                "steps": [{"name": "build", "image": "gcr.io/builder", "script": "make image"}]
            }
        }
    }))
    .expect("step-run fixture");
    RunRecord::from(run)
}

#[test]
fn legacy_build_type_follows_run_kind() {
    assert_eq!(legacy_build_type(RunKind::StepRun), TASK_RUN_BUILD_TYPE);
    assert_eq!(legacy_build_type(RunKind::WorkflowRun), PIPELINE_RUN_BUILD_TYPE);
}

#[test]
fn statement_uses_legacy_types_and_default_builder() {
    let statement = build_statement(&step_run(), None).expect("statement");
    let value = serde_json::to_value(&statement).expect("json");
    assert_eq!(value["_type"], "https://in-toto.io/Statement/v0.1");
    assert_eq!(value["predicateType"], "https://slsa.dev/provenance/v0.2");
    assert_eq!(value["predicate"]["builder"]["id"], DEFAULT_BUILDER_ID);
    assert_eq!(value["predicate"]["buildType"], TASK_RUN_BUILD_TYPE);
    assert_eq!(value["subject"][0]["name"], "gcr.io/org/web");
}

#[test]
fn invocation_applies_defaults_and_filters_environment() {
    let statement = build_statement(&step_run(), None).expect("statement");
    let value = serde_json::to_value(&statement).expect("json");
    let invocation = &value["predicate"]["invocation"];
    assert_eq!(invocation["parameters"], json!({"flags": "-v", "revision": "main"}));
    assert_eq!(invocation["environment"], json!({"labels": {"app": "web"}}));
    assert!(invocation.get("configSource").is_none());
}

#[test]
fn metadata_claims_nothing() {
    let statement = build_statement(&step_run(), None).expect("statement");
    let value = serde_json::to_value(&statement).expect("json");
    let metadata = &value["predicate"]["metadata"];
    assert_eq!(metadata["buildStartedOn"], "2026-03-01T10:00:00Z");
    assert_eq!(metadata["buildFinishedOn"], "2026-03-01T10:02:00Z");
    assert_eq!(metadata["completeness"], json!({"parameters": false, "environment": false, "materials": false}));
    assert_eq!(metadata["reproducible"], false);
}

#[test]
fn step_build_config_and_materials_are_recorded() {
    let statement = build_statement(&step_run(), None).expect("statement");
    let value = serde_json::to_value(&statement).expect("json");
    let step = &value["predicate"]["buildConfig"]["steps"][0];
    assert_eq!(step["entryPoint"], "make image");
    assert_eq!(step["environment"]["container"], "build");
    assert_eq!(step["environment"]["image"], format!("oci://gcr.io/builder@sha256:{}", hex('b', 64)));
    assert!(step["annotations"].is_null());
    assert_eq!(
        value["predicate"]["materials"],
        json!([{"uri": "oci://gcr.io/builder", "digest": {"sha256": hex('b', 64)}}])
    );
}
