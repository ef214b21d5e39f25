// crates/provenance-core/src/core/config.rs
// ============================================================================
// Module: Statement Builder Configuration
// Description: Builder identity, build type, and deep-inspection settings.
// Purpose: Carry the behavior flags statement builders consume.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`SlsaConfig`] is the narrow view of configuration the extraction and
//! assembly pipeline reads. Builders accept `Option<&SlsaConfig>`; a missing
//! config means [`SlsaConfig::default`].
//!
//! The build type is kept as the raw configured string and parsed at
//! assembly time so an unsupported value surfaces as a propagated error for
//! the run being attested.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Builder identity used when none is configured.
pub const DEFAULT_BUILDER_ID: &str = "https://tekton.dev/chains/v2";
/// Build type exposing only engine feature flags as internal parameters.
pub const SLSA_BUILD_TYPE: &str = "https://tekton.dev/chains/v2/slsa";
/// Build type also exposing labels, annotations, and embedded child records.
pub const TEKTON_BUILD_TYPE: &str = "https://tekton.dev/chains/v2/slsa-tekton";

// ============================================================================
// SECTION: Build Type
// ============================================================================

/// Supported build-definition types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    /// Platform-neutral SLSA build type.
    #[default]
    Slsa,
    /// Tekton-flavored build type with labels, annotations, and child content.
    Tekton,
}

impl BuildType {
    /// Returns the build type uri.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Slsa => SLSA_BUILD_TYPE,
            Self::Tekton => TEKTON_BUILD_TYPE,
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// Error returned when a build type uri is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported buildType {0:?}")]
pub struct UnsupportedBuildType(pub String);

impl FromStr for BuildType {
    type Err = UnsupportedBuildType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | SLSA_BUILD_TYPE => Ok(Self::Slsa),
            TEKTON_BUILD_TYPE => Ok(Self::Tekton),
            other => Err(UnsupportedBuildType(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Behavior flags for statement builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlsaConfig {
    /// Builder identity written into every statement.
    #[serde(rename = "builderID", alias = "builderId", default)]
    pub builder_id: String,
    /// Configured build type uri; empty selects the SLSA build type.
    #[serde(default)]
    pub build_type: String,
    /// Recurse into completed child step-runs of workflow-runs.
    #[serde(default)]
    pub deep_inspection_enabled: bool,
}

impl Default for SlsaConfig {
    fn default() -> Self {
        Self {
            builder_id: DEFAULT_BUILDER_ID.to_string(),
            build_type: SLSA_BUILD_TYPE.to_string(),
            deep_inspection_enabled: false,
        }
    }
}

impl SlsaConfig {
    /// Resolves an optional config to concrete settings.
    #[must_use]
    pub fn or_default(config: Option<&Self>) -> Self {
        config.cloned().unwrap_or_default()
    }

    /// Returns the builder id, falling back to the default when blank.
    #[must_use]
    pub fn builder_id(&self) -> &str {
        if self.builder_id.trim().is_empty() { DEFAULT_BUILDER_ID } else { &self.builder_id }
    }

    /// Parses the configured build type.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedBuildType`] for unrecognized uris.
    pub fn build_type(&self) -> Result<BuildType, UnsupportedBuildType> {
        self.build_type.parse()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
