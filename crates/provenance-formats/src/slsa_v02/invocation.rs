// crates/provenance-formats/src/slsa_v02/invocation.rs
// ============================================================================
// Module: SLSA v0.2 Invocation
// Description: Config source, effective parameters, and run environment.
// Purpose: Describe how a run or pipeline task was invoked.
// Dependencies: provenance-core, serde
// ============================================================================

//! ## Overview
//! Parameters are the resolved definition's defaults overlaid with the
//! explicit run params. The environment carries labels and annotations with
//! controller-reserved entries removed; empty maps are omitted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use provenance_core::DigestSet;
use provenance_core::ParamValue;
use provenance_core::RunObject;
use provenance_core::assemble::parameters::ANNOTATIONS_KEY;
use provenance_core::assemble::parameters::LABELS_KEY;
use provenance_core::assemble::parameters::filter_reserved;
use provenance_core::core::run::common::params_with_defaults;
use provenance_core::extract::materials::ref_source_digest;
use serde::Serialize;

use crate::error::FormatError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Remote source the run definition was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSource {
    /// Source uri.
    pub uri: String,
    /// Validated source digests.
    pub digest: DigestSet,
    /// Definition path within the source.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub entry_point: String,
}

/// Invocation block of the legacy predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Remote definition source, when resolved remotely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_source: Option<ConfigSource>,
    /// Effective parameters.
    pub parameters: BTreeMap<String, ParamValue>,
    /// Filtered labels and annotations.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, BTreeMap<String, String>>,
}

impl Invocation {
    /// Reads the invocation of a run.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Material`] when the source digest policy aborts.
    pub fn from_run(run: &dyn RunObject) -> Result<Self, FormatError> {
        Ok(Self {
            config_source: config_source(run)?,
            parameters: params_with_defaults(run.param_specs(), run.params()),
            environment: environment(run),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the config source of a remotely resolved run.
fn config_source(run: &dyn RunObject) -> Result<Option<ConfigSource>, FormatError> {
    let Some(ref_source) = run.ref_source() else {
        return Ok(None);
    };
    if ref_source.uri.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(ConfigSource {
        uri: ref_source.uri.clone(),
        digest: ref_source_digest(ref_source)?,
        entry_point: ref_source.entry_point.clone(),
    }))
}

/// Returns filtered labels and annotations keyed by kind.
fn environment(run: &dyn RunObject) -> BTreeMap<String, BTreeMap<String, String>> {
    let metadata = run.metadata();
    let mut environment = BTreeMap::new();
    for (key, entries) in [(LABELS_KEY, &metadata.labels), (ANNOTATIONS_KEY, &metadata.annotations)] {
        let filtered: BTreeMap<String, String> = filter_reserved(entries)
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        if !filtered.is_empty() {
            environment.insert(key.to_string(), filtered);
        }
    }
    environment
}
