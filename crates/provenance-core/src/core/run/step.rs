// crates/provenance-core/src/core/run/step.rs
// ============================================================================
// Module: Step-Run Records
// Description: Single unit-of-work runs with containerized steps and sidecars.
// Purpose: Model the step-run shape consumed by extraction and assembly.
// Dependencies: crate::core::run::common, serde, time
// ============================================================================

//! ## Overview
//! A step-run executes one resolved task definition. Its status carries the
//! runtime image IDs of every step and sidecar container, the results the
//! task emitted, and the provenance block describing where the definition
//! came from.

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

// ============================================================================
// SECTION: Step-Run
// ============================================================================

/// Snapshot of a single step-run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRun {
    /// Object metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Run specification as submitted.
    #[serde(default)]
    pub spec: StepRunSpec,
    /// Run status reported by the engine.
    #[serde(default)]
    pub status: StepRunStatus,
}

/// Step-run specification. Unknown fields are kept for verbatim re-emission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRunSpec {
    /// Explicit parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    /// Referenced task definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_ref: Option<DefinitionRef>,
    /// Service account the run executed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
    /// Remaining spec fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Step-run status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRunStatus {
    /// Time the run started.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<OffsetDateTime>,
    /// Time the run completed.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<OffsetDateTime>,
    /// Status conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// Step container states in execution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ContainerState>,
    /// Sidecar container states.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidecars: Vec<ContainerState>,
    /// Results emitted by the run.
    #[serde(default, alias = "taskResults", skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<RunResult>,
    /// Resolved task definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_spec: Option<TaskSpec>,
    /// Provenance recorded by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<RunProvenance>,
}

/// Runtime state of a step or sidecar container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerState {
    /// Step or sidecar name.
    #[serde(default)]
    pub name: String,
    /// Container name assigned by the runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Runtime image ID (`docker-pullable://uri@algorithm:hex`).
    #[serde(rename = "imageID", default)]
    pub image_id: String,
}

// ============================================================================
// SECTION: Task Definition
// ============================================================================

/// Resolved task definition embedded in the run status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Declared parameters with defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamSpec>,
    /// Step definitions in execution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepDefinition>,
}

/// Single step definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Step name.
    #[serde(default)]
    pub name: String,
    /// Declared image.
    #[serde(default)]
    pub image: String,
    /// Entrypoint command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Entrypoint arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Inline script, replacing the command when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl StepDefinition {
    /// Returns the effective entrypoint: the script, or the joined command.
    #[must_use]
    pub fn entry_point(&self) -> String {
        match &self.script {
            Some(script) if !script.is_empty() => script.clone(),
            _ => self.command.join(" "),
        }
    }
}

// ============================================================================
// SECTION: Accessors
// ============================================================================

impl StepRun {
    /// Returns the parameter declarations of the resolved definition.
    #[must_use]
    pub fn param_specs(&self) -> &[ParamSpec] {
        self.status.task_spec.as_ref().map_or(&[], |spec| spec.params.as_slice())
    }

    /// Returns the pipeline task this step-run belongs to, if labeled.
    #[must_use]
    pub fn pipeline_task(&self) -> Option<&str> {
        self.metadata.labels.get(super::common::PIPELINE_TASK_LABEL).map(String::as_str)
    }
}
