// crates/provenance-core/src/extract/scanner.rs
// ============================================================================
// Module: Result Scanner
// Description: Recognizes artifact type hints in run results.
// Purpose: Turn loosely-typed result conventions into artifact candidates.
// Dependencies: crate::core::{digest, run}, thiserror, tracing
// ============================================================================

//! ## Overview
//! Run results describe artifacts through three overlapping conventions,
//! checked in precedence order for every result:
//!
//! 1. Structured objects holding `uri`, `digest`, and optional
//!    `isBuildArtifact`.
//! 2. Positional pairs `<prefix>_URL`/`<prefix>_DIGEST` and
//!    `<prefix>_ARTIFACT_URI`/`<prefix>_ARTIFACT_DIGEST`.
//! 3. The `IMAGES` list of `uri@algorithm:hex` tokens.
//!
//! Malformed hints are handled under [`TYPE_HINT_POLICY`]. Candidates with the
//! same role and uri that agree on an overlapping algorithm collapse into the
//! first-seen candidate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::core::digest::Digest;
use crate::core::digest::DigestError;
use crate::core::digest::DigestSet;
use crate::core::digest::ImageReference;
use crate::core::digest::strip_tag;
use crate::core::run::common::ParamValue;
use crate::core::run::common::RunResult;
use crate::extract::policy::TYPE_HINT_POLICY;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suffix marking structured results that describe build inputs.
pub const ARTIFACT_INPUTS_SUFFIX: &str = "ARTIFACT_INPUTS";
/// Suffix marking structured results that describe build outputs.
pub const ARTIFACT_OUTPUTS_SUFFIX: &str = "ARTIFACT_OUTPUTS";
/// Result holding a list of image references.
pub const IMAGES_RESULT: &str = "IMAGES";
/// Uri half of a generic positional pair.
pub const URL_SUFFIX: &str = "_URL";
/// Digest half of a generic positional pair.
pub const DIGEST_SUFFIX: &str = "_DIGEST";
/// Uri half of an artifact positional pair.
pub const ARTIFACT_URI_SUFFIX: &str = "_ARTIFACT_URI";
/// Digest half of an artifact positional pair.
pub const ARTIFACT_DIGEST_SUFFIX: &str = "_ARTIFACT_DIGEST";
/// Uri halves ending with this name describe container images.
const IMAGE_URL_SUFFIX: &str = "IMAGE_URL";
/// Structured object key holding the artifact uri.
const URI_KEY: &str = "uri";
/// Structured object key holding the `algorithm:hex` digest.
const DIGEST_KEY: &str = "digest";
/// Structured object key holding the build-artifact flag.
const BUILD_ARTIFACT_KEY: &str = "isBuildArtifact";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Direction of a scanned artifact relative to the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactRole {
    /// Artifact consumed by the build.
    Input,
    /// Artifact produced by the build.
    Output,
}

/// Convention a candidate was recognized through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintConvention {
    /// Object-valued result with `uri` and `digest`.
    StructuredObject,
    /// `<prefix>_URL`/`<prefix>_DIGEST` style result pair.
    PositionalPair,
    /// Entry of the `IMAGES` list.
    ImageList,
}

/// Artifact candidate recognized in run results.
///
/// # Invariants
/// - `uri` is non-empty and `digest` holds at least one validated entry.
/// - `result_names` lists every result that contributed, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedArtifact {
    /// Artifact uri as written in the result.
    pub uri: String,
    /// Validated digests.
    pub digest: DigestSet,
    /// True when the artifact is a deliverable of the build.
    pub is_build_artifact: bool,
    /// Input or output.
    pub role: ArtifactRole,
    /// Convention of the first contributing result.
    pub convention: HintConvention,
    /// True when the uri names a container image.
    pub is_image: bool,
    /// Names of the contributing results.
    pub result_names: Vec<String>,
}

impl ScannedArtifact {
    /// Returns the name to use for a subject; image names drop their tag.
    #[must_use]
    pub fn subject_name(&self) -> &str {
        if self.is_image { strip_tag(&self.uri) } else { &self.uri }
    }

    /// Returns true when the candidate is a build-artifact output.
    #[must_use]
    pub fn is_build_output(&self) -> bool {
        self.role == ArtifactRole::Output && self.is_build_artifact
    }

    /// Returns true when `other` describes the same artifact.
    fn collapses_with(&self, other: &Self) -> bool {
        self.role == other.role
            && self.uri == other.uri
            && self.digest.shares_value_with(&other.digest)
            && self.digest.conflict_with(&other.digest).is_none()
    }

    /// Folds a duplicate candidate into this one.
    fn absorb(&mut self, other: Self) {
        self.digest.absorb(&other.digest);
        self.is_build_artifact |= other.is_build_artifact;
        self.is_image |= other.is_image;
        for name in other.result_names {
            if !self.result_names.contains(&name) {
                self.result_names.push(name);
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Malformed type hint found while scanning results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A hinted result carried an invalid uri or digest.
    #[error("result {result:?} is malformed: {source}")]
    Digest {
        /// Offending result name.
        result: String,
        /// Underlying parse failure.
        source: DigestError,
    },
    /// One half of a positional pair was missing or not a string.
    #[error("result {present:?} has no matching string result {missing:?}")]
    MissingPair {
        /// Result that was found.
        present: String,
        /// Result that was expected.
        missing: String,
    },
}

// ============================================================================
// SECTION: Scanning
// ============================================================================

/// Scans results for artifact type hints.
///
/// # Errors
///
/// Returns [`ScanError`] only when [`TYPE_HINT_POLICY`] aborts on malformed
/// hints; under the skip policy malformed hints are logged and dropped.
pub fn scan_results(results: &[RunResult]) -> Result<Vec<ScannedArtifact>, ScanError> {
    let mut scanned: Vec<ScannedArtifact> = Vec::new();
    for result in results {
        let candidates = match &result.value {
            ParamValue::Object(fields) => structured_artifact(result, fields)?.into_iter().collect(),
            _ if result.name == IMAGES_RESULT => image_list(result)?,
            ParamValue::String(uri) => positional_pair(result, uri, results)?.into_iter().collect(),
            ParamValue::Array(_) => Vec::new(),
        };
        for candidate in candidates {
            match scanned.iter_mut().find(|existing| existing.collapses_with(&candidate)) {
                Some(existing) => existing.absorb(candidate),
                None => scanned.push(candidate),
            }
        }
    }
    Ok(scanned)
}

/// Returns results that are not part of any build-artifact output.
#[must_use]
pub fn byproduct_results<'a>(results: &'a [RunResult], scanned: &[ScannedArtifact]) -> Vec<&'a RunResult> {
    results
        .iter()
        .filter(|result| {
            !scanned
                .iter()
                .any(|artifact| artifact.is_build_output() && artifact.result_names.contains(&result.name))
        })
        .collect()
}

/// Parses an object-valued result; objects without both keys are not hints.
fn structured_artifact(
    result: &RunResult,
    fields: &BTreeMap<String, Value>,
) -> Result<Option<ScannedArtifact>, ScanError> {
    let uri = fields.get(URI_KEY).and_then(Value::as_str);
    let digest = fields.get(DIGEST_KEY).and_then(Value::as_str);
    let (Some(uri), Some(digest)) = (uri, digest) else {
        return Ok(None);
    };
    let parsed = parse_uri_and_digest(uri, digest).map_err(|source| ScanError::Digest {
        result: result.name.clone(),
        source,
    });
    let Some((uri, digest)) = TYPE_HINT_POLICY.apply(parsed, "structured result")? else {
        return Ok(None);
    };
    let role = if result.name.ends_with(ARTIFACT_INPUTS_SUFFIX) {
        ArtifactRole::Input
    } else {
        ArtifactRole::Output
    };
    let is_build_artifact = fields.get(BUILD_ARTIFACT_KEY).is_some_and(build_artifact_flag);
    Ok(Some(ScannedArtifact {
        uri,
        digest: digest.into_set(),
        is_build_artifact,
        role,
        convention: HintConvention::StructuredObject,
        is_image: false,
        result_names: vec![result.name.clone()],
    }))
}

/// Reads a build-artifact flag given as a JSON boolean or a `"true"` string.
fn build_artifact_flag(flag: &Value) -> bool {
    match flag {
        Value::Bool(flag) => *flag,
        Value::String(flag) => flag.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Parses the uri half of a positional pair together with its digest half.
fn positional_pair(
    result: &RunResult,
    uri: &str,
    results: &[RunResult],
) -> Result<Option<ScannedArtifact>, ScanError> {
    let name = result.name.as_str();
    let (prefix, digest_suffix, is_image) = if let Some(prefix) = name.strip_suffix(ARTIFACT_URI_SUFFIX) {
        (prefix, ARTIFACT_DIGEST_SUFFIX, false)
    } else if let Some(prefix) = name.strip_suffix(URL_SUFFIX) {
        (prefix, DIGEST_SUFFIX, name.ends_with(IMAGE_URL_SUFFIX))
    } else {
        return Ok(None);
    };
    let digest_name = format!("{prefix}{digest_suffix}");
    let digest_value = results
        .iter()
        .find(|candidate| candidate.name == digest_name)
        .and_then(|candidate| candidate.value.as_str())
        .ok_or_else(|| ScanError::MissingPair {
            present: name.to_string(),
            missing: digest_name.clone(),
        });
    let Some(digest_value) = TYPE_HINT_POLICY.apply(digest_value, "positional pair")? else {
        return Ok(None);
    };
    let parsed = parse_uri_and_digest(uri, digest_value).map_err(|source| ScanError::Digest {
        result: name.to_string(),
        source,
    });
    let Some((uri, digest)) = TYPE_HINT_POLICY.apply(parsed, "positional pair")? else {
        return Ok(None);
    };
    Ok(Some(ScannedArtifact {
        uri,
        digest: digest.into_set(),
        is_build_artifact: true,
        role: ArtifactRole::Output,
        convention: HintConvention::PositionalPair,
        is_image,
        result_names: vec![name.to_string(), digest_name],
    }))
}

/// Parses every token of the `IMAGES` result independently.
fn image_list(result: &RunResult) -> Result<Vec<ScannedArtifact>, ScanError> {
    let mut images = Vec::new();
    let tokens = result
        .value
        .strings()
        .into_iter()
        .flat_map(|text| text.split([',', '\n']))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    for token in tokens {
        let parsed = token.parse::<ImageReference>().map_err(|source| ScanError::Digest {
            result: result.name.clone(),
            source,
        });
        let Some(image) = TYPE_HINT_POLICY.apply(parsed, "image list")? else {
            continue;
        };
        images.push(ScannedArtifact {
            uri: image.uri().to_string(),
            digest: image.digest().clone().into_set(),
            is_build_artifact: true,
            role: ArtifactRole::Output,
            convention: HintConvention::ImageList,
            is_image: true,
            result_names: vec![result.name.clone()],
        });
    }
    Ok(images)
}

/// Validates a uri and `algorithm:hex` digest.
fn parse_uri_and_digest(uri: &str, digest: &str) -> Result<(String, Digest), DigestError> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(DigestError::EmptyUri {
            value: digest.to_string(),
        });
    }
    Ok((uri.to_string(), digest.parse()?))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
