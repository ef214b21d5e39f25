// crates/provenance-core/src/extract/mod.rs
// ============================================================================
// Module: Extraction
// Description: Result scanning, subject and material extraction, dedup.
// Purpose: Derive attestation inputs and outputs from run records.
// Dependencies: crate::extract::{dedup, materials, policy, scanner, subjects}
// ============================================================================

//! ## Overview
//! Extraction is synchronous and stateless. Every function derives its output
//! from the run record passed in, with children already attached.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dedup;
pub mod materials;
pub mod policy;
pub mod scanner;
pub mod subjects;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dedup::DedupReport;
pub use dedup::DigestConflict;
pub use dedup::DigestEntry;
pub use dedup::dedupe;
pub use dedup::dedupe_materials;
pub use dedup::dedupe_resolved_dependencies;
pub use materials::MaterialError;
pub use materials::run_materials;
pub use policy::MalformedInputPolicy;
pub use scanner::ArtifactRole;
pub use scanner::HintConvention;
pub use scanner::ScanError;
pub use scanner::ScannedArtifact;
pub use scanner::scan_results;
pub use subjects::SubjectPolicy;
pub use subjects::artifact_uris;
pub use subjects::run_subjects;
