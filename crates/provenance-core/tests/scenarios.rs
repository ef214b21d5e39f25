// crates/provenance-core/tests/scenarios.rs
// ============================================================================
// Module: Extraction Scenario Tests
// Description: End-to-end subject and material extraction from run records.
// Purpose: Cover the canonical extraction scenarios and idempotence.
// ============================================================================

//! ## Overview
//! Run records are built from cluster-shaped JSON and pushed through subject
//! and material extraction exactly as statement builders do.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use provenance_core::MaterialError;
use provenance_core::RunRecord;
use provenance_core::StepRun;
use provenance_core::SubjectPolicy;
use provenance_core::WorkflowRun;
use provenance_core::extract::materials::run_materials;
use provenance_core::extract::subjects::artifact_uris;
use provenance_core::extract::subjects::run_subjects;
use serde_json::Value;
use serde_json::json;

fn hex(ch: char, len: usize) -> String {
    std::iter::repeat_n(ch, len).collect()
}

fn step_run(value: Value) -> StepRun {
    serde_json::from_value(value).expect("step-run fixture")
}

fn child_with_inputs(name: &str, task: &str) -> StepRun {
    step_run(json!({
        "metadata": {"name": name, "labels": {"tekton.dev/pipelineTask": task}},
        "status": {
            "completionTime": "2026-03-01T10:00:00Z",
            "steps": [{"name": "fetch", "imageID": format!("gcr.io/git-init@sha256:{}", hex('1', 64))}],
            "results": [
                {"name": "CHAINS-GIT_URL", "value": "https://github.com/org/app"},
                {"name": "CHAINS-GIT_COMMIT", "value": hex('2', 40)},
                {"name": "VENDOR_ARTIFACT_INPUTS", "value": {
                    "uri": "https://proxy.golang.org/mod.zip",
                    "digest": format!("sha256:{}", hex('3', 64))
                }},
                {"name": "IMAGE_URL", "value": "gcr.io/org/app:v1"},
                {"name": "IMAGE_DIGEST", "value": format!("sha256:{}", hex('4', 64))}
            ]
        }
    }))
}

fn workflow_with_child() -> RunRecord {
    let workflow: WorkflowRun = serde_json::from_value(json!({
        "metadata": {"name": "release"},
        "status": {
            "completionTime": "2026-03-01T10:05:00Z",
            "pipelineSpec": {"tasks": [{"name": "fetch"}, {"name": "never-ran"}]}
        }
    }))
    .expect("workflow fixture");
    RunRecord::from(workflow.with_children([child_with_inputs("release-fetch", "fetch")]))
}

#[test]
fn positional_image_pair_yields_one_subject() {
    let digest = hex('a', 64);
    let run = RunRecord::from(step_run(json!({
        "metadata": {"name": "build"},
        "status": {"results": [
            {"name": "result1_IMAGE_URL", "value": "gcr.io/x"},
            {"name": "result1_IMAGE_DIGEST", "value": format!("sha256:{digest}")}
        ]}
    })));
    for policy in [SubjectPolicy::BuildArtifactsOnly, SubjectPolicy::AllOutputs] {
        let subjects = run_subjects(&run, policy, false).expect("subjects");
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name, "gcr.io/x");
        assert_eq!(subjects[0].digest.get("sha256"), Some(digest.as_str()));
        assert_eq!(subjects[0].digest.len(), 1);
    }
}

#[test]
fn unsplittable_image_id_fails_material_extraction() {
    let run = RunRecord::from(step_run(json!({
        "metadata": {"name": "build"},
        "status": {"steps": [
            {"name": "good", "imageID": format!("gcr.io/good@sha256:{}", hex('a', 64))},
            {"name": "bad", "imageID": "gcr.io/a/b-sha256:deadbeef"}
        ]}
    })));
    let err = run_materials(&run, false).unwrap_err();
    assert!(matches!(err, MaterialError::ImageId { .. }));
}

#[test]
fn empty_image_id_fails_material_extraction() {
    for image_id in ["", "   "] {
        let run = RunRecord::from(step_run(json!({
            "metadata": {"name": "build"},
            "status": {"steps": [
                {"name": "good", "imageID": format!("gcr.io/good@sha256:{}", hex('a', 64))},
                {"name": "blank", "imageID": image_id}
            ]}
        })));
        let err = run_materials(&run, false).unwrap_err();
        assert!(matches!(err, MaterialError::ImageId { ref container, .. } if container == "blank"));
    }
}

#[test]
fn boolean_build_artifact_flag_survives_run_deserialization() {
    let run = RunRecord::from(step_run(json!({
        "metadata": {"name": "build"},
        "status": {"results": [
            {"name": "BIN_ARTIFACT_OUTPUTS", "value": {
                "uri": "gs://bucket/bin", "digest": format!("sha256:{}", hex('a', 64)), "isBuildArtifact": true
            }},
            {"name": "LOG_ARTIFACT_OUTPUTS", "value": {
                "uri": "gs://bucket/log", "digest": format!("sha256:{}", hex('b', 64)), "isBuildArtifact": false
            }}
        ]}
    })));
    let strict = run_subjects(&run, SubjectPolicy::BuildArtifactsOnly, false).expect("strict");
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].name, "gs://bucket/bin");
    assert_eq!(run_subjects(&run, SubjectPolicy::AllOutputs, false).expect("all").len(), 2);
}

#[test]
fn deep_inspection_surfaces_child_inputs() {
    let run = workflow_with_child();
    let shallow = run_materials(&run, false).expect("shallow");
    let shallow_uris: Vec<&str> = shallow.iter().map(|material| material.uri.as_str()).collect();
    assert_eq!(shallow_uris, vec!["oci://gcr.io/git-init"]);

    let deep = run_materials(&run, true).expect("deep");
    let deep_uris: Vec<&str> = deep.iter().map(|material| material.uri.as_str()).collect();
    assert_eq!(
        deep_uris,
        vec!["oci://gcr.io/git-init", "git+https://github.com/org/app.git", "https://proxy.golang.org/mod.zip"]
    );
}

#[test]
fn deep_inspection_surfaces_child_subjects() {
    let run = workflow_with_child();
    assert!(run_subjects(&run, SubjectPolicy::BuildArtifactsOnly, false).expect("shallow").is_empty());
    let deep = run_subjects(&run, SubjectPolicy::BuildArtifactsOnly, true).expect("deep");
    assert_eq!(deep.len(), 1);
    assert_eq!(deep[0].name, "gcr.io/org/app");
}

#[test]
fn image_list_yields_independent_subjects() {
    let (first, second) = (hex('a', 64), hex('b', 64));
    let run = RunRecord::from(step_run(json!({
        "metadata": {"name": "build"},
        "status": {"results": [{
            "name": "IMAGES",
            "value": format!("a@sha256:{first}, b@sha256:{second}, c@sha256:nothex")
        }]}
    })));
    let subjects = run_subjects(&run, SubjectPolicy::BuildArtifactsOnly, false).expect("subjects");
    let names: Vec<&str> = subjects.iter().map(|subject| subject.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(subjects[1].digest.get("sha256"), Some(second.as_str()));
}

#[test]
fn structured_outputs_respect_subject_policy() {
    let run = RunRecord::from(step_run(json!({
        "metadata": {"name": "build"},
        "status": {"results": [
            {"name": "BIN_ARTIFACT_OUTPUTS", "value": {
                "uri": "gs://bucket/bin", "digest": format!("sha256:{}", hex('a', 64)), "isBuildArtifact": "true"
            }},
            {"name": "LOG_ARTIFACT_OUTPUTS", "value": {
                "uri": "gs://bucket/log", "digest": format!("sha256:{}", hex('b', 64))
            }}
        ]}
    })));
    assert_eq!(run_subjects(&run, SubjectPolicy::BuildArtifactsOnly, false).expect("strict").len(), 1);
    assert_eq!(run_subjects(&run, SubjectPolicy::AllOutputs, false).expect("all").len(), 2);
}

#[test]
fn artifact_uris_render_name_and_digest() {
    let digest = hex('a', 64);
    let run = RunRecord::from(step_run(json!({
        "metadata": {"name": "build"},
        "status": {"results": [{"name": "IMAGES", "value": format!("gcr.io/app:v2@sha256:{digest}")}]}
    })));
    let uris = artifact_uris(&run, SubjectPolicy::AllOutputs, false).expect("uris");
    assert_eq!(uris, vec![format!("gcr.io/app@sha256:{digest}")]);
}

#[test]
fn extraction_is_idempotent() {
    let run = workflow_with_child();
    assert_eq!(run_materials(&run, true).expect("first"), run_materials(&run, true).expect("second"));
    assert_eq!(
        run_subjects(&run, SubjectPolicy::AllOutputs, true).expect("first"),
        run_subjects(&run, SubjectPolicy::AllOutputs, true).expect("second")
    );
}

#[test]
fn empty_runs_are_valid() {
    let run = RunRecord::from(StepRun::default());
    assert!(run_materials(&run, true).expect("materials").is_empty());
    assert!(run_subjects(&run, SubjectPolicy::AllOutputs, true).expect("subjects").is_empty());
}
