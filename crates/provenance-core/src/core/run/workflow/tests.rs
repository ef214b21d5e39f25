// crates/provenance-core/src/core/run/workflow/tests.rs
// ============================================================================
// Module: Workflow-Run Unit Tests
// Description: Unit coverage for workflow-run helpers.
// Purpose: Pin parsing and validation edge cases close to the code.
// Dependencies: provenance-core
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

#[test]
fn task_result_refs_finds_every_reference() {
    let refs = task_result_refs("$(tasks.build.results.IMAGE) and $(tasks.scan.results.ok[*])");
    assert_eq!(refs, vec!["build", "scan"]);
}

#[test]
fn task_result_refs_ignores_params_references() {
    assert!(task_result_refs("$(params.revision)").is_empty());
    assert!(task_result_refs("$(tasks.status)").is_empty());
}

#[test]
fn is_finally_task_checks_only_the_finally_block() {
    let run = WorkflowRun {
        status: WorkflowRunStatus {
            pipeline_spec: Some(PipelineSpec {
                tasks: vec![PipelineTask { name: "build".to_string(), ..PipelineTask::default() }],
                finally: vec![PipelineTask { name: "notify".to_string(), ..PipelineTask::default() }],
                ..PipelineSpec::default()
            }),
            ..WorkflowRunStatus::default()
        },
        ..WorkflowRun::default()
    };
    assert!(run.is_finally_task("notify"));
    assert!(!run.is_finally_task("build"));
    assert!(!WorkflowRun::default().is_finally_task("notify"));
}

#[test]
fn children_attach_incrementally_as_they_complete() {
    let child = |name: &str, task: &str| -> StepRun {
        serde_json::from_value(serde_json::json!({
            "metadata": {"name": name, "labels": {"tekton.dev/pipelineTask": task}},
            "status": {"completionTime": "2026-03-01T10:00:00Z"}
        }))
        .unwrap()
    };
    let mut run = WorkflowRun {
        status: WorkflowRunStatus {
            pipeline_spec: Some(PipelineSpec {
                tasks: vec![
                    PipelineTask { name: "build".to_string(), ..PipelineTask::default() },
                    PipelineTask { name: "test".to_string(), ..PipelineTask::default() },
                ],
                ..PipelineSpec::default()
            }),
            ..WorkflowRunStatus::default()
        },
        ..WorkflowRun::default()
    };
    assert!(run.completed_children().is_empty());
    run.attach_child(child("release-test", "test"));
    assert_eq!(run.completed_children().len(), 1);
    run.attach_child(child("release-build", "build"));
    let order: Vec<&str> = run.completed_children().iter().map(|(task, _)| task.name.as_str()).collect();
    assert_eq!(order, vec!["build", "test"]);
    assert_eq!(run.children().len(), 2);
    assert_eq!(run.child_for_task("build").map(|child| child.metadata.name.as_str()), Some("release-build"));
}
