// crates/provenance-core/src/assemble/dependencies.rs
// ============================================================================
// Module: Resolved Dependencies
// Description: Role-tagged build inputs for the newer statement schemas.
// Purpose: Reuse material extraction and tag each category with its role.
// Dependencies: crate::{core, extract}, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Resolved dependencies follow the material extraction order and tag each
//! category: `task` or `pipeline` for the run's own definition source,
//! `pipelineTask` for each completed child's definition, untagged runtime
//! images, and `inputs/result` for git sources and scanned inputs. The Tekton
//! build type embeds each child record as JSON content of its `pipelineTask`
//! entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::artifact::JSON_MEDIA_TYPE;
use crate::core::artifact::Material;
use crate::core::artifact::ResolvedDependency;
use crate::core::config::BuildType;
use crate::core::run::RunRecord;
use crate::core::run::step::StepRun;
use crate::core::run::workflow::WorkflowRun;
use crate::extract::dedup::DedupReport;
use crate::extract::dedup::dedupe_resolved_dependencies;
use crate::extract::materials::MaterialError;
use crate::extract::materials::container_image_materials;
use crate::extract::materials::definition_material;
use crate::extract::materials::run_input_materials;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Role of a step-run's own definition source.
pub const TASK_DEPENDENCY: &str = "task";
/// Role of a workflow-run's own definition source.
pub const PIPELINE_DEPENDENCY: &str = "pipeline";
/// Role of a completed child's definition.
pub const PIPELINE_TASK_DEPENDENCY: &str = "pipelineTask";
/// Role of git sources and scanned inputs.
pub const INPUT_RESULT_DEPENDENCY: &str = "inputs/result";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while resolving dependencies.
#[derive(Debug, Error)]
pub enum DependencyError {
    /// Material extraction aborted.
    #[error(transparent)]
    Material(#[from] MaterialError),
    /// A child record could not be embedded.
    #[error("failed to embed child run {run:?}: {message}")]
    Content {
        /// Child run name.
        run: String,
        /// Serialization failure.
        message: String,
    },
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Returns the resolved dependencies of a step-run before deduplication.
///
/// # Errors
///
/// Returns [`DependencyError`] when material extraction aborts.
pub fn step_run_dependencies(run: &StepRun) -> Result<Vec<ResolvedDependency>, DependencyError> {
    let mut dependencies = named(definition_material(run)?, TASK_DEPENDENCY);
    dependencies.extend(container_image_materials(run)?.into_iter().map(ResolvedDependency::from));
    dependencies.extend(named(run_input_materials(run)?, INPUT_RESULT_DEPENDENCY));
    Ok(dependencies)
}

/// Returns the resolved dependencies of a workflow-run before deduplication.
///
/// # Errors
///
/// Returns [`DependencyError`] when material extraction aborts or a child
/// record cannot be embedded.
pub fn workflow_run_dependencies(
    run: &WorkflowRun,
    build_type: BuildType,
    deep_inspection: bool,
) -> Result<Vec<ResolvedDependency>, DependencyError> {
    let mut dependencies = named(definition_material(run)?, PIPELINE_DEPENDENCY);
    for (_, child) in run.completed_children() {
        dependencies.extend(pipeline_task_dependency(child, build_type)?);
        dependencies.extend(container_image_materials(child)?.into_iter().map(ResolvedDependency::from));
        if deep_inspection {
            dependencies.extend(named(run_input_materials(child)?, INPUT_RESULT_DEPENDENCY));
        }
    }
    dependencies.extend(named(run_input_materials(run)?, INPUT_RESULT_DEPENDENCY));
    Ok(dependencies)
}

/// Returns the deduplicated resolved dependencies of either run shape.
///
/// # Errors
///
/// Returns [`DependencyError`] when extraction aborts.
pub fn resolved_dependencies(
    run: &RunRecord,
    build_type: BuildType,
    deep_inspection: bool,
) -> Result<DedupReport<ResolvedDependency>, DependencyError> {
    let dependencies = match run {
        RunRecord::Step(step) => step_run_dependencies(step)?,
        RunRecord::Workflow(workflow) => workflow_run_dependencies(workflow, build_type, deep_inspection)?,
    };
    Ok(dedupe_resolved_dependencies(dependencies))
}

/// Returns the `pipelineTask` entry for a completed child.
fn pipeline_task_dependency(
    child: &StepRun,
    build_type: BuildType,
) -> Result<Option<ResolvedDependency>, DependencyError> {
    let source = definition_material(child)?.into_iter().next();
    let dependency = match (build_type, source) {
        (BuildType::Tekton, source) => {
            let content = serde_json::to_vec(child).map_err(|err| DependencyError::Content {
                run: child.metadata.name.clone(),
                message: err.to_string(),
            })?;
            let base = source.map(ResolvedDependency::from).unwrap_or_default();
            Some(base.named(PIPELINE_TASK_DEPENDENCY).with_content(content, JSON_MEDIA_TYPE))
        }
        (BuildType::Slsa, source) => {
            source.map(|material| ResolvedDependency::from(material).named(PIPELINE_TASK_DEPENDENCY))
        }
    };
    Ok(dependency)
}

/// Converts materials into dependencies tagged with `role`.
fn named(materials: Vec<Material>, role: &str) -> Vec<ResolvedDependency> {
    materials.into_iter().map(|material| ResolvedDependency::from(material).named(role)).collect()
}
