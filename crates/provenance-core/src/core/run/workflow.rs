// crates/provenance-core/src/core/run/workflow.rs
// ============================================================================
// Module: Workflow-Run Records
// Description: Multi-task runs with dependency edges and attached children.
// Purpose: Model workflow-runs and link them to their child step-runs.
// Dependencies: crate::core::run::{common, step}, serde, time
// ============================================================================

//! ## Overview
//! A workflow-run executes a resolved pipeline definition made of tasks and
//! finally tasks. Child step-runs are fetched by the host controller and
//! attached before extraction; each child is linked to its pipeline task
//! through the pipeline-task label.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::core::run::common::Condition;
use crate::core::run::common::DefinitionRef;
use crate::core::run::common::ObjectMeta;
use crate::core::run::common::Param;
use crate::core::run::common::ParamSpec;
use crate::core::run::common::RunProvenance;
use crate::core::run::common::RunResult;
use crate::core::run::step::StepRun;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Opening marker of a task result reference.
const TASK_RESULT_REF_PREFIX: &str = "$(tasks.";
/// Separator between the task name and result name in a reference.
const TASK_RESULT_REF_RESULTS: &str = ".results.";

// ============================================================================
// SECTION: Workflow-Run
// ============================================================================

/// Snapshot of a workflow-run with its attached children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Object metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Run specification as submitted.
    #[serde(default)]
    pub spec: WorkflowRunSpec,
    /// Run status reported by the engine.
    #[serde(default)]
    pub status: WorkflowRunStatus,
    /// Child step-runs attached by the host controller.
    #[serde(skip)]
    children: Vec<StepRun>,
}

/// Workflow-run specification. Unknown fields are kept for verbatim re-emission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunSpec {
    /// Explicit parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    /// Referenced pipeline definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_ref: Option<DefinitionRef>,
    /// Service account the run executed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
    /// Remaining spec fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Workflow-run status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunStatus {
    /// Time the run started.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<OffsetDateTime>,
    /// Time the run completed.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<OffsetDateTime>,
    /// Status conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// Results emitted by the workflow.
    #[serde(default, alias = "pipelineResults", skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<RunResult>,
    /// Resolved pipeline definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_spec: Option<PipelineSpec>,
    /// Provenance recorded by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<RunProvenance>,
}

// ============================================================================
// SECTION: Pipeline Definition
// ============================================================================

/// Resolved pipeline definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Declared parameters with defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamSpec>,
    /// Regular tasks in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<PipelineTask>,
    /// Finally tasks in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finally: Vec<PipelineTask>,
}

/// Task node of a pipeline definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTask {
    /// Task node name.
    pub name: String,
    /// Referenced task definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_ref: Option<DefinitionRef>,
    /// Explicit ordering edges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_after: Vec<String>,
    /// Task parameters, possibly referencing prior task results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    /// Guard expressions, possibly referencing prior task results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<WhenExpression>,
}

/// Guard expression on a pipeline task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhenExpression {
    /// Expression input.
    #[serde(default)]
    pub input: String,
    /// Comparison operator.
    #[serde(default)]
    pub operator: String,
    /// Values compared against the input.
    #[serde(default)]
    pub values: Vec<String>,
}

impl PipelineTask {
    /// Returns the names of tasks whose results this task references, in first-seen order.
    #[must_use]
    pub fn result_ref_tasks(&self) -> Vec<String> {
        let mut referenced = Vec::new();
        let param_strings = self.params.iter().flat_map(|param| param.value.strings());
        let when_strings = self.when.iter().flat_map(|expression| {
            std::iter::once(expression.input.as_str())
                .chain(expression.values.iter().map(String::as_str))
        });
        for text in param_strings.chain(when_strings) {
            for task in task_result_refs(text) {
                if !referenced.iter().any(|known: &String| known == task) {
                    referenced.push(task.to_string());
                }
            }
        }
        referenced
    }
}

/// Extracts task names from `$(tasks.<task>.results.<result>)` references in `text`.
fn task_result_refs(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(TASK_RESULT_REF_PREFIX) {
        let after_prefix = &rest[start + TASK_RESULT_REF_PREFIX.len() ..];
        let end = after_prefix.find(')').unwrap_or(after_prefix.len());
        let expression = &after_prefix[.. end];
        if let Some((task, _result)) = expression.split_once(TASK_RESULT_REF_RESULTS)
            && !task.is_empty()
        {
            found.push(task);
        }
        rest = &after_prefix[end ..];
    }
    found
}

// ============================================================================
// SECTION: Accessors
// ============================================================================

impl WorkflowRun {
    /// Attaches a child step-run as it completes.
    pub fn attach_child(&mut self, child: StepRun) {
        self.children.push(child);
    }

    /// Returns a copy of this run with the given children attached.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = StepRun>) -> Self {
        for child in children {
            self.attach_child(child);
        }
        self
    }

    /// Returns the attached children in attachment order.
    #[must_use]
    pub fn children(&self) -> &[StepRun] {
        &self.children
    }

    /// Returns the child step-run spawned for a pipeline task.
    #[must_use]
    pub fn child_for_task(&self, task_name: &str) -> Option<&StepRun> {
        self.children.iter().find(|child| child.pipeline_task() == Some(task_name))
    }

    /// Returns true when `task_name` is declared in the finally block.
    #[must_use]
    pub fn is_finally_task(&self, task_name: &str) -> bool {
        self.status
            .pipeline_spec
            .as_ref()
            .is_some_and(|spec| spec.finally.iter().any(|task| task.name == task_name))
    }

    /// Returns the parameter declarations of the resolved pipeline.
    #[must_use]
    pub fn param_specs(&self) -> &[ParamSpec] {
        self.status.pipeline_spec.as_ref().map_or(&[], |spec| spec.params.as_slice())
    }

    /// Returns regular tasks followed by finally tasks, flagging finally tasks.
    pub fn pipeline_tasks(&self) -> impl Iterator<Item = (&PipelineTask, bool)> {
        self.status.pipeline_spec.iter().flat_map(|spec| {
            spec.tasks
                .iter()
                .map(|task| (task, false))
                .chain(spec.finally.iter().map(|task| (task, true)))
        })
    }

    /// Returns `(task, child)` pairs for every pipeline task whose child completed.
    ///
    /// Tasks without a child, or whose child lacks a completion time, are
    /// skipped and logged.
    pub fn completed_children(&self) -> Vec<(&PipelineTask, &StepRun)> {
        let mut completed = Vec::new();
        for (task, _) in self.pipeline_tasks() {
            match self.child_for_task(&task.name) {
                Some(child) if child.status.completion_time.is_some() => {
                    completed.push((task, child));
                }
                _ => {
                    tracing::info!(
                        run = %self.metadata.name,
                        task = %task.name,
                        "child run not found or not completed; skipping"
                    );
                }
            }
        }
        completed
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
