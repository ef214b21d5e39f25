// crates/provenance-core/src/core/run/mod.rs
// ============================================================================
// Module: Run Records
// Description: Step-run and workflow-run snapshots behind one capability trait.
// Purpose: Let extraction code treat both run shapes uniformly.
// Dependencies: crate::core::run::{common, step, workflow}, serde_json, time
// ============================================================================

//! ## Overview
//! [`RunRecord`] is the sum of the two run shapes. [`RunObject`] is the small
//! capability interface extraction code is written against: results,
//! parameters, timing, conditions, and provenance.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod common;
pub mod step;
pub mod workflow;

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use self::common::Condition;
use self::common::ObjectMeta;
use self::common::Param;
use self::common::ParamSpec;
use self::common::RefSource;
use self::common::RunOutcome;
use self::common::RunProvenance;
use self::common::RunResult;
use self::step::StepRun;
use self::workflow::WorkflowRun;

// ============================================================================
// SECTION: Run Kind
// ============================================================================

/// Discriminates the two run shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RunKind {
    /// Single unit of work.
    StepRun,
    /// Collection of step-runs with dependency edges.
    WorkflowRun,
}

impl RunKind {
    /// Returns the engine resource kind name.
    #[must_use]
    pub const fn resource_kind(self) -> &'static str {
        match self {
            Self::StepRun => "TaskRun",
            Self::WorkflowRun => "PipelineRun",
        }
    }
}

// ============================================================================
// SECTION: Capability Trait
// ============================================================================

/// Read-only capabilities shared by every run shape.
pub trait RunObject {
    /// Returns the run shape.
    fn kind(&self) -> RunKind;
    /// Returns object metadata.
    fn metadata(&self) -> &ObjectMeta;
    /// Returns explicit parameters.
    fn params(&self) -> &[Param];
    /// Returns parameter declarations of the resolved definition.
    fn param_specs(&self) -> &[ParamSpec];
    /// Returns emitted results.
    fn results(&self) -> &[RunResult];
    /// Returns status conditions.
    fn conditions(&self) -> &[Condition];
    /// Returns the start time.
    fn start_time(&self) -> Option<OffsetDateTime>;
    /// Returns the completion time.
    fn completion_time(&self) -> Option<OffsetDateTime>;
    /// Returns the engine provenance block.
    fn provenance(&self) -> Option<&RunProvenance>;
    /// Returns the service account the run executed under.
    fn service_account_name(&self) -> Option<&str>;

    /// Serializes the run spec verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the spec cannot be serialized.
    fn spec_value(&self) -> Result<Value, serde_json::Error>;

    /// Returns the remote definition source, when resolved remotely.
    fn ref_source(&self) -> Option<&RefSource> {
        self.provenance().and_then(|provenance| provenance.ref_source.as_ref())
    }

    /// Returns the engine feature flags, when recorded.
    fn feature_flags(&self) -> Option<&Value> {
        self.provenance().and_then(|provenance| provenance.feature_flags.as_ref())
    }

    /// Returns the outcome derived from conditions.
    fn outcome(&self) -> RunOutcome {
        RunOutcome::from_conditions(self.conditions())
    }
}

impl RunObject for StepRun {
    fn kind(&self) -> RunKind {
        RunKind::StepRun
    }

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn params(&self) -> &[Param] {
        &self.spec.params
    }

    fn param_specs(&self) -> &[ParamSpec] {
        Self::param_specs(self)
    }

    fn results(&self) -> &[RunResult] {
        &self.status.results
    }

    fn conditions(&self) -> &[Condition] {
        &self.status.conditions
    }

    fn start_time(&self) -> Option<OffsetDateTime> {
        self.status.start_time
    }

    fn completion_time(&self) -> Option<OffsetDateTime> {
        self.status.completion_time
    }

    fn provenance(&self) -> Option<&RunProvenance> {
        self.status.provenance.as_ref()
    }

    fn service_account_name(&self) -> Option<&str> {
        self.spec.service_account_name.as_deref()
    }

    fn spec_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.spec)
    }
}

impl RunObject for WorkflowRun {
    fn kind(&self) -> RunKind {
        RunKind::WorkflowRun
    }

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn params(&self) -> &[Param] {
        &self.spec.params
    }

    fn param_specs(&self) -> &[ParamSpec] {
        Self::param_specs(self)
    }

    fn results(&self) -> &[RunResult] {
        &self.status.results
    }

    fn conditions(&self) -> &[Condition] {
        &self.status.conditions
    }

    fn start_time(&self) -> Option<OffsetDateTime> {
        self.status.start_time
    }

    fn completion_time(&self) -> Option<OffsetDateTime> {
        self.status.completion_time
    }

    fn provenance(&self) -> Option<&RunProvenance> {
        self.status.provenance.as_ref()
    }

    fn service_account_name(&self) -> Option<&str> {
        self.spec.service_account_name.as_deref()
    }

    fn spec_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.spec)
    }
}

// ============================================================================
// SECTION: Run Record
// ============================================================================

/// Immutable snapshot of either run shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RunRecord {
    /// Step-run snapshot.
    Step(StepRun),
    /// Workflow-run snapshot with attached children.
    Workflow(WorkflowRun),
}

impl RunRecord {
    /// Returns the run as a capability object.
    #[must_use]
    pub fn as_object(&self) -> &dyn RunObject {
        match self {
            Self::Step(run) => run,
            Self::Workflow(run) => run,
        }
    }
}

impl From<StepRun> for RunRecord {
    fn from(run: StepRun) -> Self {
        Self::Step(run)
    }
}

impl From<WorkflowRun> for RunRecord {
    fn from(run: WorkflowRun) -> Self {
        Self::Workflow(run)
    }
}

impl RunObject for RunRecord {
    fn kind(&self) -> RunKind {
        self.as_object().kind()
    }

    fn metadata(&self) -> &ObjectMeta {
        self.as_object().metadata()
    }

    fn params(&self) -> &[Param] {
        self.as_object().params()
    }

    fn param_specs(&self) -> &[ParamSpec] {
        self.as_object().param_specs()
    }

    fn results(&self) -> &[RunResult] {
        self.as_object().results()
    }

    fn conditions(&self) -> &[Condition] {
        self.as_object().conditions()
    }

    fn start_time(&self) -> Option<OffsetDateTime> {
        self.as_object().start_time()
    }

    fn completion_time(&self) -> Option<OffsetDateTime> {
        self.as_object().completion_time()
    }

    fn provenance(&self) -> Option<&RunProvenance> {
        self.as_object().provenance()
    }

    fn service_account_name(&self) -> Option<&str> {
        self.as_object().service_account_name()
    }

    fn spec_value(&self) -> Result<Value, serde_json::Error> {
        self.as_object().spec_value()
    }
}
