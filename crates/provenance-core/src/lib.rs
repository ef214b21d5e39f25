// crates/provenance-core/src/lib.rs
// ============================================================================
// Module: Run Provenance Core Library
// Description: Public API surface for the provenance extraction pipeline.
// Purpose: Expose run records, extractors, deduplication, and assembly helpers.
// Dependencies: crate::{core, extract, assemble, interfaces}
// ============================================================================

//! ## Overview
//! Run Provenance core turns completed CI/CD run records into the building
//! blocks of a supply-chain attestation: subjects (what the run produced),
//! materials and resolved dependencies (what influenced it), and the build
//! definition that ties them to the invocation. Extraction is synchronous and
//! stateless; every value is derived from the run record alone.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assemble;
pub mod core;
pub mod extract;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use assemble::BuildDefinition;
pub use assemble::BuildDefinitionError;
pub use assemble::DependencyError;
pub use assemble::ParameterError;
pub use assemble::assemble_build_definition;
pub use extract::ArtifactRole;
pub use extract::DedupReport;
pub use extract::DigestConflict;
pub use extract::HintConvention;
pub use extract::MalformedInputPolicy;
pub use extract::MaterialError;
pub use extract::ScanError;
pub use extract::ScannedArtifact;
pub use extract::SubjectPolicy;
pub use interfaces::PayloadSignature;
pub use interfaces::PayloadSigner;
pub use interfaces::ProviderError;
pub use interfaces::RunIdentity;
pub use interfaces::RunRecordProvider;
pub use interfaces::SignError;
pub use interfaces::SignedPayload;
