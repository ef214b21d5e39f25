// crates/provenance-core/src/extract/subjects.rs
// ============================================================================
// Module: Subject Extractor
// Description: Selects build outputs from scanned results.
// Purpose: Produce the statement subject list under a schema-specific policy.
// Dependencies: crate::{core, extract::scanner}
// ============================================================================

//! ## Overview
//! Subjects come from scanner candidates with the output role. The newest
//! schema admits only build artifacts; older schemas admit every well-formed
//! output. Workflow-runs with deep inspection also contribute the outputs of
//! completed children. Subjects sharing a name but not a digest remain
//! separate entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::artifact::Subject;
use crate::core::run::RunObject;
use crate::core::run::RunRecord;
use crate::core::run::step::StepRun;
use crate::core::run::workflow::WorkflowRun;
use crate::extract::scanner::ArtifactRole;
use crate::extract::scanner::ScanError;
use crate::extract::scanner::ScannedArtifact;
use crate::extract::scanner::scan_results;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Which scanner outputs become subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectPolicy {
    /// Only outputs flagged or hinted as build artifacts.
    BuildArtifactsOnly,
    /// Every well-formed output regardless of the flag.
    AllOutputs,
}

impl SubjectPolicy {
    /// Returns true when the candidate qualifies as a subject.
    #[must_use]
    pub fn admits(self, artifact: &ScannedArtifact) -> bool {
        match self {
            Self::BuildArtifactsOnly => artifact.is_build_output(),
            Self::AllOutputs => artifact.role == ArtifactRole::Output,
        }
    }
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Converts scanner candidates into subjects under `policy`.
#[must_use]
pub fn subjects_from_scan(scanned: &[ScannedArtifact], policy: SubjectPolicy) -> Vec<Subject> {
    let mut subjects = Vec::new();
    for artifact in scanned.iter().filter(|artifact| policy.admits(artifact)) {
        if let Some(subject) = Subject::new(artifact.subject_name(), artifact.digest.clone()) {
            push_subject(&mut subjects, subject);
        }
    }
    subjects
}

/// Extracts subjects from a step-run.
///
/// # Errors
///
/// Returns [`ScanError`] when the type-hint policy aborts on malformed results.
pub fn step_run_subjects(run: &StepRun, policy: SubjectPolicy) -> Result<Vec<Subject>, ScanError> {
    Ok(subjects_from_scan(&scan_results(run.results())?, policy))
}

/// Extracts subjects from a workflow-run and, with deep inspection, its completed children.
///
/// # Errors
///
/// Returns [`ScanError`] when the type-hint policy aborts on malformed results.
pub fn workflow_run_subjects(
    run: &WorkflowRun,
    policy: SubjectPolicy,
    deep_inspection: bool,
) -> Result<Vec<Subject>, ScanError> {
    let mut subjects = subjects_from_scan(&scan_results(run.results())?, policy);
    if deep_inspection {
        for (_, child) in run.completed_children() {
            for subject in step_run_subjects(child, policy)? {
                push_subject(&mut subjects, subject);
            }
        }
    }
    Ok(subjects)
}

/// Extracts subjects from either run shape.
///
/// # Errors
///
/// Returns [`ScanError`] when the type-hint policy aborts on malformed results.
pub fn run_subjects(
    run: &RunRecord,
    policy: SubjectPolicy,
    deep_inspection: bool,
) -> Result<Vec<Subject>, ScanError> {
    match run {
        RunRecord::Step(step) => step_run_subjects(step, policy),
        RunRecord::Workflow(workflow) => workflow_run_subjects(workflow, policy, deep_inspection),
    }
}

/// Lists every subject as `name@algorithm:hex` for uri-indexed storage.
///
/// # Errors
///
/// Returns [`ScanError`] when the type-hint policy aborts on malformed results.
pub fn artifact_uris(
    run: &RunRecord,
    policy: SubjectPolicy,
    deep_inspection: bool,
) -> Result<Vec<String>, ScanError> {
    Ok(run_subjects(run, policy, deep_inspection)?.iter().filter_map(Subject::artifact_uri).collect())
}

/// Appends a subject, folding it into an existing entry with the same name
/// and a compatible, overlapping digest set.
fn push_subject(subjects: &mut Vec<Subject>, subject: Subject) {
    let existing = subjects.iter_mut().find(|existing| {
        existing.name == subject.name
            && existing.digest.shares_value_with(&subject.digest)
            && existing.digest.conflict_with(&subject.digest).is_none()
    });
    match existing {
        Some(existing) => existing.digest.absorb(&subject.digest),
        None => subjects.push(subject),
    }
}
