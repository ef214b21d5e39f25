// crates/provenance-core/src/assemble/parameters.rs
// ============================================================================
// Module: Parameter Assembler
// Description: External and internal build parameters per build type.
// Purpose: Record the literal invocation and the platform context of a run.
// Dependencies: crate::{core, extract::materials}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! External parameters reproduce the invocation verbatim: the run spec as
//! submitted and, for remotely resolved definitions, the source it came
//! from. Internal parameters carry platform context: engine feature flags
//! for every build type, plus filtered labels and annotations for the
//! Tekton build type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::config::BuildType;
use crate::core::run::RunObject;
use crate::core::run::common::RefSource;
use crate::extract::materials::MaterialError;
use crate::extract::materials::ref_source_digest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// External parameter holding the verbatim run spec.
pub const RUN_SPEC_KEY: &str = "runSpec";
/// External parameter describing a remotely resolved definition.
pub const BUILD_CONFIG_SOURCE_KEY: &str = "buildConfigSource";
/// Internal parameter holding engine feature flags.
pub const FEATURE_FLAGS_KEY: &str = "tekton-pipelines-feature-flags";
/// Internal parameter holding filtered labels.
pub const LABELS_KEY: &str = "labels";
/// Internal parameter holding filtered annotations.
pub const ANNOTATIONS_KEY: &str = "annotations";
/// Prefix of labels and annotations reserved by the attestation controller.
pub const RESERVED_PREFIX: &str = "chains.tekton.dev/";
/// Annotation holding the client-side applied manifest.
pub const LAST_APPLIED_CONFIGURATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while assembling parameters.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// The run spec could not be serialized.
    #[error("failed to serialize run spec: {0}")]
    Serialize(String),
    /// The definition source digest aborted assembly.
    #[error(transparent)]
    Source(#[from] MaterialError),
}

// ============================================================================
// SECTION: External Parameters
// ============================================================================

/// Remote source of the run's definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfigSource {
    /// Preferred digest as `algorithm:hex`.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Source repository uri.
    pub repository: String,
    /// Definition path within the repository.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
}

/// Describes a remote definition source, if its uri is present.
///
/// # Errors
///
/// Returns [`ParameterError::Source`] when the digest policy aborts.
pub fn build_config_source(ref_source: &RefSource) -> Result<Option<BuildConfigSource>, ParameterError> {
    if ref_source.uri.trim().is_empty() {
        return Ok(None);
    }
    let digest = ref_source_digest(ref_source)?;
    Ok(Some(BuildConfigSource {
        reference: digest.preferred().map(|digest| digest.to_string()),
        repository: ref_source.uri.clone(),
        path: ref_source.entry_point.clone(),
    }))
}

/// Returns the external parameters of a run.
///
/// # Errors
///
/// Returns [`ParameterError`] when the spec cannot be serialized or the
/// definition source aborts.
pub fn external_parameters(run: &dyn RunObject) -> Result<Map<String, Value>, ParameterError> {
    let mut params = Map::new();
    let spec = run.spec_value().map_err(|err| ParameterError::Serialize(err.to_string()))?;
    params.insert(RUN_SPEC_KEY.to_string(), spec);
    if let Some(ref_source) = run.ref_source()
        && let Some(source) = build_config_source(ref_source)?
    {
        let source = serde_json::to_value(source).map_err(|err| ParameterError::Serialize(err.to_string()))?;
        params.insert(BUILD_CONFIG_SOURCE_KEY.to_string(), source);
    }
    Ok(params)
}

// ============================================================================
// SECTION: Internal Parameters
// ============================================================================

/// Returns the internal parameters of a run for a build type.
///
/// Empty label and annotation maps are omitted.
#[must_use]
pub fn internal_parameters(run: &dyn RunObject, build_type: BuildType) -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(flags) = run.feature_flags() {
        params.insert(FEATURE_FLAGS_KEY.to_string(), flags.clone());
    }
    if build_type == BuildType::Tekton {
        let metadata = run.metadata();
        let labels = filter_reserved(&metadata.labels);
        if !labels.is_empty() {
            params.insert(LABELS_KEY.to_string(), string_map(labels));
        }
        let annotations = filter_reserved(&metadata.annotations);
        if !annotations.is_empty() {
            params.insert(ANNOTATIONS_KEY.to_string(), string_map(annotations));
        }
    }
    params
}

/// Drops reserved entries and the last-applied-configuration annotation.
#[must_use]
pub fn filter_reserved(entries: &BTreeMap<String, String>) -> BTreeMap<&str, &str> {
    entries
        .iter()
        .filter(|(key, _)| !key.starts_with(RESERVED_PREFIX) && key.as_str() != LAST_APPLIED_CONFIGURATION)
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

/// Converts a string map into a JSON object.
fn string_map(entries: BTreeMap<&str, &str>) -> Value {
    Value::Object(
        entries.into_iter().map(|(key, value)| (key.to_string(), Value::String(value.to_string()))).collect(),
    )
}
