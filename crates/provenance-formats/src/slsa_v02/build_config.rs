// crates/provenance-formats/src/slsa_v02/build_config.rs
// ============================================================================
// Module: SLSA v0.2 Build Config
// Description: Per-step and per-task execution detail for the legacy predicate.
// Purpose: Record what executed and in which order.
// Dependencies: provenance-core, serde, time
// ============================================================================

//! ## Overview
//! Step-runs list their steps with entrypoint, arguments, and runtime image.
//! Workflow-runs list every pipeline task whose child completed, with an
//! `after` list built from `runAfter` plus tasks referenced through
//! `$(tasks.<name>.results.<result>)` in params and when expressions. A
//! finally task without `runAfter` runs after the last executed regular task.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use provenance_core::OCI_SCHEME;
use provenance_core::PipelineTask;
use provenance_core::RunObject;
use provenance_core::RunRecord;
use provenance_core::RunResult;
use provenance_core::StepRun;
use provenance_core::WorkflowRun;
use provenance_core::core::digest::IMAGE_ID_SCHEMES;
use provenance_core::core::run::common::DefinitionRef;
use provenance_core::core::run::step::ContainerState;
use provenance_core::core::run::step::StepDefinition;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::FormatError;
use crate::slsa_v02::invocation::Invocation;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Build config of either run shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BuildConfig {
    /// Steps of a step-run.
    Steps {
        /// Executed steps in order.
        steps: Vec<StepAttestation>,
    },
    /// Tasks of a workflow-run.
    Tasks {
        /// Completed pipeline tasks in declaration order.
        tasks: Vec<TaskAttestation>,
    },
}

/// Single executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepAttestation {
    /// Script or joined command.
    pub entry_point: String,
    /// Entrypoint arguments.
    pub arguments: Vec<String>,
    /// Runtime image and container name.
    pub environment: StepEnvironment,
    /// Step annotations; steps carry none, so this serializes as null.
    pub annotations: Option<BTreeMap<String, String>>,
}

/// Runtime environment of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepEnvironment {
    /// Runtime image as an `oci://` uri.
    pub image: String,
    /// Step container name.
    pub container: String,
}

/// Single completed pipeline task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttestation {
    /// Pipeline task name.
    pub name: String,
    /// Tasks that must finish before this one.
    pub after: Vec<String>,
    /// Task definition reference.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<DefinitionRef>,
    /// Child start time.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub started_on: Option<OffsetDateTime>,
    /// Child completion time.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub finished_on: Option<OffsetDateTime>,
    /// Service account the child ran under.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_account_name: String,
    /// Child outcome label.
    pub status: String,
    /// Child steps.
    pub steps: Vec<StepAttestation>,
    /// Child invocation.
    pub invocation: Invocation,
    /// Child results.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<RunResult>,
}

// ============================================================================
// SECTION: Construction
// ============================================================================

impl BuildConfig {
    /// Builds the config for either run shape.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when a child invocation cannot be read.
    pub fn from_run(run: &RunRecord) -> Result<Self, FormatError> {
        match run {
            RunRecord::Step(step) => Ok(Self::Steps { steps: step_attestations(step) }),
            RunRecord::Workflow(workflow) => Ok(Self::Tasks { tasks: task_attestations(workflow)? }),
        }
    }
}

/// Lists the executed steps of a step-run.
#[must_use]
pub fn step_attestations(run: &StepRun) -> Vec<StepAttestation> {
    let definitions = run.status.task_spec.as_ref().map_or(&[][..], |spec| spec.steps.as_slice());
    run.status
        .steps
        .iter()
        .enumerate()
        .map(|(index, state)| {
            let definition = definitions
                .iter()
                .find(|definition| !state.name.is_empty() && definition.name == state.name)
                .or_else(|| definitions.get(index));
            step_attestation(state, definition)
        })
        .collect()
}

/// Lists completed pipeline tasks with their ordering edges.
///
/// # Errors
///
/// Returns [`FormatError`] when a child invocation cannot be read.
pub fn task_attestations(run: &WorkflowRun) -> Result<Vec<TaskAttestation>, FormatError> {
    let mut tasks = Vec::new();
    let mut last_regular: Option<&str> = None;
    for (task, child) in run.completed_children() {
        let finally = run.is_finally_task(&task.name);
        let after = task_after(task, if finally { last_regular } else { None });
        if !finally {
            last_regular = Some(task.name.as_str());
        }
        tasks.push(TaskAttestation {
            name: task.name.clone(),
            after,
            reference: task.task_ref.clone().or_else(|| child.spec.task_ref.clone()),
            started_on: child.start_time(),
            finished_on: child.completion_time(),
            service_account_name: child.service_account_name().unwrap_or_default().to_string(),
            status: child.outcome().as_str().to_string(),
            steps: step_attestations(child),
            invocation: Invocation::from_run(child)?,
            results: child.results().to_vec(),
        });
    }
    Ok(tasks)
}

/// Returns the `after` list of a task.
///
/// `last_regular` is only set for finally tasks and applies when the task
/// has no edge from `runAfter` or from result references.
#[must_use]
pub fn task_after(task: &PipelineTask, last_regular: Option<&str>) -> Vec<String> {
    let mut after = task.run_after.clone();
    for name in task.result_ref_tasks() {
        if !after.contains(&name) {
            after.push(name);
        }
    }
    if after.is_empty()
        && let Some(last) = last_regular
    {
        after.push(last.to_string());
    }
    after
}

/// Describes one step from its runtime state and definition.
fn step_attestation(state: &ContainerState, definition: Option<&StepDefinition>) -> StepAttestation {
    StepAttestation {
        entry_point: definition.map(StepDefinition::entry_point).unwrap_or_default(),
        arguments: definition.map(|definition| definition.args.clone()).unwrap_or_default(),
        environment: StepEnvironment {
            image: runtime_image_uri(&state.image_id),
            container: state.name.clone(),
        },
        annotations: None,
    }
}

/// Rewrites a runtime image ID as an `oci://` uri without validating it.
fn runtime_image_uri(image_id: &str) -> String {
    if image_id.is_empty() {
        return String::new();
    }
    let stripped =
        IMAGE_ID_SCHEMES.iter().find_map(|scheme| image_id.strip_prefix(scheme)).unwrap_or(image_id);
    format!("{OCI_SCHEME}{stripped}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
