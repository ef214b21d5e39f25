// crates/provenance-formats/src/slsa_v1/mod.rs
// ============================================================================
// Module: SLSA v1.0 Provenance
// Description: Predicate types and builders for the `slsa/v2alpha*` formats.
// Purpose: Share one predicate shape across the three newer schema versions.
// Dependencies: crate::statement, provenance-core, serde, time
// ============================================================================

//! ## Overview
//! The three newer formats share the SLSA v1.0 predicate: a build definition
//! plus run details. They differ in how the build type is chosen, whether
//! byproducts are emitted, which subject policy applies, and the statement
//! type. Those differences live in [`Flavor`]; the versioned modules only
//! pick one.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod byproducts;
pub mod v2alpha2;
pub mod v2alpha3;
pub mod v2alpha4;

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::BuildDefinition;
use provenance_core::BuildType;
use provenance_core::ResolvedDependency;
use provenance_core::RunObject;
use provenance_core::RunRecord;
use provenance_core::SlsaConfig;
use provenance_core::SubjectPolicy;
use provenance_core::assemble::assemble_for;
use provenance_core::extract::subjects::run_subjects;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::FormatError;
use crate::slsa_v1::byproducts::run_byproducts;
use crate::statement::Builder;
use crate::statement::Statement;

// ============================================================================
// SECTION: Predicate Types
// ============================================================================

/// SLSA v1.0 provenance predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    /// What was built and from which inputs.
    pub build_definition: BuildDefinition,
    /// How the build ran.
    pub run_details: RunDetails,
}

/// Run details of a SLSA v1.0 predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDetails {
    /// Build platform identity.
    pub builder: Builder,
    /// Invocation identity and timing.
    pub metadata: BuildMetadata,
    /// Non-artifact outputs of the run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub byproducts: Vec<ResolvedDependency>,
}

/// Invocation identity and timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadata {
    /// Cluster uid of the run.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub invocation_id: String,
    /// Run start time.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub started_on: Option<OffsetDateTime>,
    /// Run completion time.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub finished_on: Option<OffsetDateTime>,
}

impl BuildMetadata {
    /// Reads identity and timing from a run.
    #[must_use]
    pub fn from_run(run: &dyn RunObject) -> Self {
        Self {
            invocation_id: run.metadata().uid.clone(),
            started_on: run.start_time(),
            finished_on: run.completion_time(),
        }
    }
}

// ============================================================================
// SECTION: Flavors
// ============================================================================

/// How a versioned format chooses its build type uri.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTypeSource {
    /// Fixed per-format uri, suffixed with the engine resource type.
    Versioned(&'static str),
    /// Build type taken from configuration.
    Configured,
}

/// Differences between the SLSA v1.0 formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flavor {
    /// In-toto statement type.
    pub statement_type: &'static str,
    /// Build type selection.
    pub build_type: BuildTypeSource,
    /// Subject policy.
    pub subjects: SubjectPolicy,
    /// Whether run results that are not build artifacts become byproducts.
    pub byproducts: bool,
}

/// Builds a SLSA v1.0 statement for a run in the given flavor.
///
/// # Errors
///
/// Returns [`FormatError`] for unsupported build types, malformed runtime
/// image IDs, or encoding failures.
pub fn build_statement(
    flavor: Flavor,
    run: &RunRecord,
    config: Option<&SlsaConfig>,
) -> Result<Statement, FormatError> {
    let config = SlsaConfig::or_default(config);
    let deep_inspection = config.deep_inspection_enabled;
    let object = run.as_object();
    let build_definition = match flavor.build_type {
        BuildTypeSource::Versioned(prefix) => {
            let mut definition = assemble_for(run, BuildType::Slsa, deep_inspection)?;
            definition.build_type = format!("{prefix}{}", resource_type(object));
            definition
        }
        BuildTypeSource::Configured => assemble_for(run, config.build_type()?, deep_inspection)?,
    };
    let byproducts = if flavor.byproducts { run_byproducts(run, deep_inspection)? } else { Vec::new() };
    let subject = run_subjects(run, flavor.subjects, deep_inspection)?;
    let predicate = Provenance {
        build_definition,
        run_details: RunDetails {
            builder: Builder::new(config.builder_id()),
            metadata: BuildMetadata::from_run(object),
            byproducts,
        },
    };
    Ok(Statement::slsa_v1(flavor.statement_type, subject, predicate))
}

/// Returns `tekton.dev/v1beta1/<Kind>` for a run.
fn resource_type(run: &dyn RunObject) -> String {
    format!("tekton.dev/v1beta1/{}", run.kind().resource_kind())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
