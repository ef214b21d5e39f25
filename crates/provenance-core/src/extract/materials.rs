// crates/provenance-core/src/extract/materials.rs
// ============================================================================
// Module: Material Extractor
// Description: Discovers build inputs of step-runs and workflow-runs.
// Purpose: Collect definition sources, runtime images, git sources, and inputs.
// Dependencies: crate::{core, extract::{policy, scanner}}, thiserror, tracing
// ============================================================================

//! ## Overview
//! Materials are gathered in a fixed order per step-run:
//!
//! 1. The remote source of the run's own definition.
//! 2. Runtime image IDs of every step, then every sidecar.
//! 3. The git source named by the `CHAINS-GIT_URL`/`CHAINS-GIT_COMMIT`
//!    parameters or results.
//! 4. Scanner candidates with the input role.
//!
//! Workflow-runs contribute their own definition source, categories 1 and 2
//! of every completed child (plus 3 and 4 with deep inspection), then their
//! own git source and inputs. A malformed runtime image ID aborts extraction
//! under [`RUNTIME_IMAGE_ID_POLICY`]; it never yields a partial list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::artifact::Material;
use crate::core::digest::DigestError;
use crate::core::digest::DigestSet;
use crate::core::digest::ImageReference;
use crate::core::digest::SHA1;
use crate::core::run::RunObject;
use crate::core::run::RunRecord;
use crate::core::run::common::ParamValue;
use crate::core::run::common::RefSource;
use crate::core::run::common::params_with_defaults;
use crate::core::run::step::StepRun;
use crate::core::run::workflow::WorkflowRun;
use crate::extract::policy::REF_SOURCE_DIGEST_POLICY;
use crate::extract::policy::RUNTIME_IMAGE_ID_POLICY;
use crate::extract::scanner::ArtifactRole;
use crate::extract::scanner::ScanError;
use crate::extract::scanner::ScannedArtifact;
use crate::extract::scanner::scan_results;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Parameter or result naming the git repository url.
pub const GIT_URL_PARAM: &str = "CHAINS-GIT_URL";
/// Parameter or result naming the git commit or revision.
pub const GIT_COMMIT_PARAM: &str = "CHAINS-GIT_COMMIT";
/// Scheme prefix of git material uris.
const GIT_SCHEME: &str = "git+";
/// Suffix of git material uris.
const GIT_SUFFIX: &str = ".git";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that abort material extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterialError {
    /// A step or sidecar runtime image ID could not be parsed.
    #[error("container {container:?} has malformed image ID {image_id:?}: {source}")]
    ImageId {
        /// Step or sidecar name.
        container: String,
        /// Offending image ID.
        image_id: String,
        /// Underlying parse failure.
        source: DigestError,
    },
    /// A definition source carried an invalid digest.
    #[error("definition source {uri:?} has an invalid digest: {source}")]
    RefSource {
        /// Source uri.
        uri: String,
        /// Underlying parse failure.
        source: DigestError,
    },
    /// A type-hinted result aborted scanning.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

// ============================================================================
// SECTION: Definition Sources
// ============================================================================

/// Returns the material for a remote definition source.
///
/// A source left without any valid digest yields no material.
///
/// # Errors
///
/// Returns [`MaterialError::RefSource`] when [`REF_SOURCE_DIGEST_POLICY`] aborts.
pub fn ref_source_material(ref_source: &RefSource) -> Result<Option<Material>, MaterialError> {
    let uri = ref_source.uri.trim();
    if uri.is_empty() {
        return Ok(None);
    }
    let digest = ref_source_digest(ref_source)?;
    if digest.is_empty() {
        tracing::warn!(uri = %uri, "definition source has no valid digest; skipping");
        return Ok(None);
    }
    Ok(Some(Material::new(uri, digest)))
}

/// Validates the digest entries of a definition source.
///
/// # Errors
///
/// Returns [`MaterialError::RefSource`] when [`REF_SOURCE_DIGEST_POLICY`] aborts.
pub fn ref_source_digest(ref_source: &RefSource) -> Result<DigestSet, MaterialError> {
    let mut digest = DigestSet::new();
    for (algorithm, hex) in &ref_source.digest {
        let inserted = digest.insert(algorithm, hex).map_err(|source| MaterialError::RefSource {
            uri: ref_source.uri.clone(),
            source,
        });
        REF_SOURCE_DIGEST_POLICY.apply(inserted, "definition source digest")?;
    }
    Ok(digest)
}

// ============================================================================
// SECTION: Runtime Images
// ============================================================================

/// Returns `oci://` materials for every step then every sidecar image.
///
/// An empty image ID is malformed like any other unsplittable ID.
///
/// # Errors
///
/// Returns [`MaterialError::ImageId`] when an image ID is malformed.
pub fn container_image_materials(run: &StepRun) -> Result<Vec<Material>, MaterialError> {
    let mut materials = Vec::new();
    for container in run.status.steps.iter().chain(&run.status.sidecars) {
        let parsed = ImageReference::from_image_id(&container.image_id).map_err(|source| {
            MaterialError::ImageId {
                container: container.name.clone(),
                image_id: container.image_id.clone(),
                source,
            }
        });
        if let Some(image) = RUNTIME_IMAGE_ID_POLICY.apply(parsed, "runtime image ID")? {
            materials.push(Material::from_image(&image));
        }
    }
    Ok(materials)
}

// ============================================================================
// SECTION: Git Sources
// ============================================================================

/// Formats a git uri as `git+<url>.git[@revision]`.
#[must_use]
pub fn spdx_git(url: &str, revision: Option<&str>) -> String {
    let url = url.trim();
    let mut uri = if url.starts_with(GIT_SCHEME) { url.to_string() } else { format!("{GIT_SCHEME}{url}") };
    if !uri.ends_with(GIT_SUFFIX) {
        uri.push_str(GIT_SUFFIX);
    }
    if let Some(revision) = revision.map(str::trim).filter(|revision| !revision.is_empty()) {
        uri.push('@');
        uri.push_str(revision);
    }
    uri
}

/// Builds the git material from merged parameter values.
///
/// A commit that is a valid sha1 becomes the digest; any other revision is
/// appended to the uri with an empty digest set.
#[must_use]
pub fn git_material(values: &BTreeMap<String, ParamValue>) -> Option<Material> {
    let url = values.get(GIT_URL_PARAM).and_then(ParamValue::as_str).map(str::trim)?;
    let commit = values.get(GIT_COMMIT_PARAM).and_then(ParamValue::as_str).map(str::trim)?;
    if url.is_empty() || commit.is_empty() {
        return None;
    }
    match DigestSet::single(SHA1, commit) {
        Ok(digest) => Some(Material::new(spdx_git(url, None), digest)),
        Err(_) => {
            tracing::debug!(url = %url, revision = %commit, "git revision is symbolic");
            Some(Material::new(spdx_git(url, Some(commit)), DigestSet::new()))
        }
    }
}

/// Returns the git material of a run: defaults, then params, then results.
#[must_use]
pub fn run_git_material(run: &dyn RunObject) -> Option<Material> {
    let mut values = params_with_defaults(run.param_specs(), run.params());
    for result in run.results() {
        if result.name == GIT_URL_PARAM || result.name == GIT_COMMIT_PARAM {
            values.insert(result.name.clone(), result.value.clone());
        }
    }
    git_material(&values)
}

// ============================================================================
// SECTION: Scanned Inputs
// ============================================================================

/// Returns materials for scanner candidates with the input role.
#[must_use]
pub fn scanned_input_materials(scanned: &[ScannedArtifact]) -> Vec<Material> {
    scanned
        .iter()
        .filter(|artifact| artifact.role == ArtifactRole::Input)
        .map(|artifact| Material::new(artifact.uri.clone(), artifact.digest.clone()))
        .collect()
}

// ============================================================================
// SECTION: Run Materials
// ============================================================================

/// Returns the definition source material of a run, if any.
///
/// # Errors
///
/// Returns [`MaterialError::RefSource`] when the digest policy aborts.
pub fn definition_material(run: &dyn RunObject) -> Result<Vec<Material>, MaterialError> {
    match run.ref_source() {
        Some(ref_source) => Ok(ref_source_material(ref_source)?.into_iter().collect()),
        None => Ok(Vec::new()),
    }
}

/// Returns the definition source and runtime images of a step-run.
///
/// # Errors
///
/// Returns [`MaterialError::ImageId`] when an image ID is malformed.
pub fn step_run_build_materials(run: &StepRun) -> Result<Vec<Material>, MaterialError> {
    let mut materials = definition_material(run)?;
    materials.extend(container_image_materials(run)?);
    Ok(materials)
}

/// Returns the git source and scanned inputs of a run.
///
/// # Errors
///
/// Returns [`MaterialError::Scan`] when the type-hint policy aborts.
pub fn run_input_materials(run: &dyn RunObject) -> Result<Vec<Material>, MaterialError> {
    let mut materials: Vec<Material> = run_git_material(run).into_iter().collect();
    materials.extend(scanned_input_materials(&scan_results(run.results())?));
    Ok(materials)
}

/// Returns every material of a step-run in extraction order.
///
/// # Errors
///
/// Returns [`MaterialError`] when an image ID is malformed or scanning aborts.
pub fn step_run_materials(run: &StepRun) -> Result<Vec<Material>, MaterialError> {
    let mut materials = step_run_build_materials(run)?;
    materials.extend(run_input_materials(run)?);
    Ok(materials)
}

/// Returns every material of a workflow-run in extraction order.
///
/// # Errors
///
/// Returns [`MaterialError`] when an image ID is malformed or scanning aborts.
pub fn workflow_run_materials(run: &WorkflowRun, deep_inspection: bool) -> Result<Vec<Material>, MaterialError> {
    let mut materials = definition_material(run)?;
    for (_, child) in run.completed_children() {
        materials.extend(step_run_build_materials(child)?);
        if deep_inspection {
            materials.extend(run_input_materials(child)?);
        }
    }
    materials.extend(run_input_materials(run)?);
    Ok(materials)
}

/// Returns every material of either run shape in extraction order.
///
/// # Errors
///
/// Returns [`MaterialError`] when an image ID is malformed or scanning aborts.
pub fn run_materials(run: &RunRecord, deep_inspection: bool) -> Result<Vec<Material>, MaterialError> {
    match run {
        RunRecord::Step(step) => step_run_materials(step),
        RunRecord::Workflow(workflow) => workflow_run_materials(workflow, deep_inspection),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
