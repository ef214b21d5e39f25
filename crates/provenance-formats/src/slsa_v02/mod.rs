// crates/provenance-formats/src/slsa_v02/mod.rs
// ============================================================================
// Module: SLSA v0.2 Statement Builder
// Description: Legacy provenance predicate served under `slsa/v1` and `in-toto`.
// Purpose: Embed invocation, per-task build config, and materials.
// Dependencies: crate::statement, provenance-core, serde, time
// ============================================================================

//! ## Overview
//! The legacy predicate records the invocation (config source, parameters
//! with defaults applied, filtered labels and annotations), a build config
//! describing every step or every completed pipeline task with its ordering
//! edges, timing metadata, and the deduplicated material list. Subjects use
//! the all-outputs policy.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod build_config;
pub mod invocation;

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::Material;
use provenance_core::RunKind;
use provenance_core::RunObject;
use provenance_core::RunRecord;
use provenance_core::SlsaConfig;
use provenance_core::SubjectPolicy;
use provenance_core::extract::dedup::dedupe_materials;
use provenance_core::extract::materials::run_materials;
use provenance_core::extract::subjects::run_subjects;
use serde::Serialize;
use time::OffsetDateTime;

pub use self::build_config::BuildConfig;
pub use self::build_config::StepAttestation;
pub use self::build_config::TaskAttestation;
pub use self::invocation::ConfigSource;
pub use self::invocation::Invocation;
use crate::error::FormatError;
use crate::statement::Builder;
use crate::statement::Statement;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Build type recorded for step-runs.
pub const TASK_RUN_BUILD_TYPE: &str = "tekton.dev/v1beta1/TaskRun";
/// Build type recorded for workflow-runs.
pub const PIPELINE_RUN_BUILD_TYPE: &str = "tekton.dev/v1beta1/PipelineRun";

// ============================================================================
// SECTION: Predicate Types
// ============================================================================

/// SLSA v0.2 provenance predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenancePredicate {
    /// Build platform identity.
    pub builder: Builder,
    /// Legacy build type for the run shape.
    pub build_type: String,
    /// Invocation that started the run.
    pub invocation: Invocation,
    /// Steps or pipeline tasks that executed.
    pub build_config: BuildConfig,
    /// Timing and completeness claims.
    pub metadata: Metadata,
    /// Deduplicated build inputs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
}

/// Timing and completeness metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Run start time.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub build_started_on: Option<OffsetDateTime>,
    /// Run completion time.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub build_finished_on: Option<OffsetDateTime>,
    /// Completeness claims; none are made.
    pub completeness: Completeness,
    /// Whether the build is reproducible; never claimed.
    pub reproducible: bool,
}

impl Metadata {
    /// Reads timing from a run.
    #[must_use]
    pub fn from_run(run: &dyn RunObject) -> Self {
        Self {
            build_started_on: run.start_time(),
            build_finished_on: run.completion_time(),
            completeness: Completeness::default(),
            reproducible: false,
        }
    }
}

/// Completeness claims of the predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Completeness {
    /// Parameters are complete.
    pub parameters: bool,
    /// Environment is complete.
    pub environment: bool,
    /// Materials are complete.
    pub materials: bool,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Returns the legacy build type for a run shape.
#[must_use]
pub const fn legacy_build_type(kind: RunKind) -> &'static str {
    match kind {
        RunKind::StepRun => TASK_RUN_BUILD_TYPE,
        RunKind::WorkflowRun => PIPELINE_RUN_BUILD_TYPE,
    }
}

/// Builds a SLSA v0.2 statement for a run.
///
/// # Errors
///
/// Returns [`FormatError`] when a runtime image ID is malformed or extraction
/// otherwise aborts.
pub fn build_statement(run: &RunRecord, config: Option<&SlsaConfig>) -> Result<Statement, FormatError> {
    let config = SlsaConfig::or_default(config);
    let deep_inspection = config.deep_inspection_enabled;
    let subject = run_subjects(run, SubjectPolicy::AllOutputs, deep_inspection)?;
    let materials = dedupe_materials(run_materials(run, deep_inspection)?).into_entries();
    let object = run.as_object();
    let predicate = ProvenancePredicate {
        builder: Builder::new(config.builder_id()),
        build_type: legacy_build_type(object.kind()).to_string(),
        invocation: Invocation::from_run(object)?,
        build_config: BuildConfig::from_run(run)?,
        metadata: Metadata::from_run(object),
        materials,
    };
    Ok(Statement::slsa_v02(subject, predicate))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
