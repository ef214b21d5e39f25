// crates/provenance-formats/src/slsa_v1/byproducts.rs
// ============================================================================
// Module: Run Byproducts
// Description: Run results that are not build-artifact outputs.
// Purpose: Surface every other result as a JSON byproduct entry.
// Dependencies: provenance-core, serde_json
// ============================================================================

//! ## Overview
//! Byproducts are named `taskRunResults/<result>` for step-runs and
//! `pipelineRunResults/<result>` for workflow-runs. With deep inspection, the
//! results of each completed child are added as
//! `taskRunResults/<pipelineTask>/<result>`. Content is the JSON encoding of
//! the result value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::JSON_MEDIA_TYPE;
use provenance_core::ResolvedDependency;
use provenance_core::RunObject;
use provenance_core::RunRecord;
use provenance_core::RunResult;
use provenance_core::extract::scanner::byproduct_results;
use provenance_core::extract::scanner::scan_results;

use crate::error::FormatError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name prefix of step-run result byproducts.
pub const TASK_RUN_RESULTS: &str = "taskRunResults";
/// Name prefix of workflow-run result byproducts.
pub const PIPELINE_RUN_RESULTS: &str = "pipelineRunResults";

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Returns the byproducts of either run shape.
///
/// # Errors
///
/// Returns [`FormatError`] when scanning aborts or a value cannot be encoded.
pub fn run_byproducts(run: &RunRecord, deep_inspection: bool) -> Result<Vec<ResolvedDependency>, FormatError> {
    match run {
        RunRecord::Step(step) => result_byproducts(step.results(), TASK_RUN_RESULTS),
        RunRecord::Workflow(workflow) => {
            let mut byproducts = result_byproducts(workflow.results(), PIPELINE_RUN_RESULTS)?;
            if deep_inspection {
                for (task, child) in workflow.completed_children() {
                    let prefix = format!("{TASK_RUN_RESULTS}/{}", task.name);
                    byproducts.extend(result_byproducts(child.results(), &prefix)?);
                }
            }
            Ok(byproducts)
        }
    }
}

/// Converts the non-artifact results of one run into byproducts.
fn result_byproducts(results: &[RunResult], prefix: &str) -> Result<Vec<ResolvedDependency>, FormatError> {
    let scanned = scan_results(results)?;
    byproduct_results(results, &scanned)
        .into_iter()
        .map(|result| {
            let name = format!("{prefix}/{}", result.name);
            let content = serde_json::to_vec(&result.value).map_err(|err| FormatError::encode(&name, &err))?;
            Ok(ResolvedDependency::default().named(name).with_content(content, JSON_MEDIA_TYPE))
        })
        .collect()
}
