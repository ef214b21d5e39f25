// crates/provenance-core/src/assemble/build_definition.rs
// ============================================================================
// Module: Build-Definition Assembler
// Description: Combines build type, parameters, and resolved dependencies.
// Purpose: Produce the build definition embedded in SLSA v1 predicates.
// Dependencies: crate::{assemble, core}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`assemble_build_definition`] resolves the configured build type first, so
//! an unsupported type aborts before any extraction work. Dependency
//! conflicts found by deduplication are logged and kept; they never fail
//! assembly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::assemble::dependencies::DependencyError;
use crate::assemble::dependencies::resolved_dependencies;
use crate::assemble::parameters::ParameterError;
use crate::assemble::parameters::external_parameters;
use crate::assemble::parameters::internal_parameters;
use crate::core::artifact::ResolvedDependency;
use crate::core::config::BuildType;
use crate::core::config::SlsaConfig;
use crate::core::config::UnsupportedBuildType;
use crate::core::run::RunRecord;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Build definition of a SLSA v1 predicate.
///
/// # Invariants
/// - `resolved_dependencies` is deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDefinition {
    /// Build type uri.
    pub build_type: String,
    /// Verbatim invocation parameters.
    pub external_parameters: Map<String, Value>,
    /// Platform context parameters.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub internal_parameters: Map<String, Value>,
    /// Role-tagged build inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolved_dependencies: Vec<ResolvedDependency>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while assembling a build definition.
#[derive(Debug, Error)]
pub enum BuildDefinitionError {
    /// Configured build type is not recognized.
    #[error(transparent)]
    UnsupportedBuildType(#[from] UnsupportedBuildType),
    /// Parameter assembly failed.
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    /// Dependency extraction failed.
    #[error(transparent)]
    Dependencies(#[from] DependencyError),
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Assembles the build definition for a run using optional configuration.
///
/// # Errors
///
/// Returns [`BuildDefinitionError`] for unsupported build types, malformed
/// runtime image IDs, or serialization failures.
pub fn assemble_build_definition(
    run: &RunRecord,
    config: Option<&SlsaConfig>,
) -> Result<BuildDefinition, BuildDefinitionError> {
    let config = SlsaConfig::or_default(config);
    let build_type = config.build_type()?;
    assemble_for(run, build_type, config.deep_inspection_enabled)
}

/// Assembles the build definition for an already-resolved build type.
///
/// # Errors
///
/// Returns [`BuildDefinitionError`] for malformed runtime image IDs or
/// serialization failures.
pub fn assemble_for(
    run: &RunRecord,
    build_type: BuildType,
    deep_inspection: bool,
) -> Result<BuildDefinition, BuildDefinitionError> {
    let external = external_parameters(run)?;
    let internal = internal_parameters(run, build_type);
    let dependencies = resolved_dependencies(run, build_type, deep_inspection)?;
    Ok(BuildDefinition {
        build_type: build_type.uri().to_string(),
        external_parameters: external,
        internal_parameters: internal,
        resolved_dependencies: dependencies.into_entries(),
    })
}
