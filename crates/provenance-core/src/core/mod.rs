// crates/provenance-core/src/core/mod.rs
// ============================================================================
// Module: Core Types
// Description: Digests, run records, artifacts, hashing, and builder config.
// Purpose: Define the data model every extraction and assembly stage shares.
// Dependencies: crate::core::{artifact, config, digest, hashing, run}
// ============================================================================

//! ## Overview
//! Leaf types of the provenance pipeline. Nothing in this module performs
//! extraction; it only validates and represents data.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod artifact;
pub mod config;
pub mod digest;
pub mod hashing;
pub mod run;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use artifact::JSON_MEDIA_TYPE;
pub use artifact::Material;
pub use artifact::OCI_SCHEME;
pub use artifact::ResolvedDependency;
pub use artifact::Subject;
pub use artifact::oci_uri;
pub use config::BuildType;
pub use config::DEFAULT_BUILDER_ID;
pub use config::SLSA_BUILD_TYPE;
pub use config::SlsaConfig;
pub use config::TEKTON_BUILD_TYPE;
pub use config::UnsupportedBuildType;
pub use digest::Digest;
pub use digest::DigestError;
pub use digest::DigestSet;
pub use digest::ImageReference;
pub use hashing::HashAlgorithm;
pub use hashing::HashError;
pub use hashing::canonical_json_bytes;
pub use hashing::hash_bytes;
pub use hashing::hash_canonical_json;
pub use run::RunKind;
pub use run::RunObject;
pub use run::RunRecord;
pub use run::common::Condition;
pub use run::common::ObjectMeta;
pub use run::common::Param;
pub use run::common::ParamSpec;
pub use run::common::ParamValue;
pub use run::common::RefSource;
pub use run::common::RunOutcome;
pub use run::common::RunProvenance;
pub use run::common::RunResult;
pub use run::step::StepRun;
pub use run::workflow::PipelineTask;
pub use run::workflow::WorkflowRun;
