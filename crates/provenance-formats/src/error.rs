// crates/provenance-formats/src/error.rs
// ============================================================================
// Module: Format Errors
// Description: Error taxonomy for statement building, encoding, and signing.
// Purpose: Give callers one error type that aborts attestation for a run.
// Dependencies: provenance-core, thiserror
// ============================================================================

//! ## Overview
//! Every variant aborts attestation generation for the run. Skippable
//! malformed input never reaches this type; it is logged and dropped inside
//! extraction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::BuildDefinitionError;
use provenance_core::HashError;
use provenance_core::MaterialError;
use provenance_core::ScanError;
use provenance_core::SignError;
use provenance_core::UnsupportedBuildType;
use thiserror::Error;

use crate::registry::RegistryError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building, encoding, or signing a statement.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Configured build type is not recognized.
    #[error(transparent)]
    UnsupportedBuildType(#[from] UnsupportedBuildType),
    /// Build-definition assembly failed.
    #[error(transparent)]
    BuildDefinition(#[from] BuildDefinitionError),
    /// Material extraction failed.
    #[error(transparent)]
    Material(#[from] MaterialError),
    /// Result scanning aborted.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// A predicate field could not be serialized.
    #[error("failed to encode {field}: {message}")]
    Encode {
        /// Field being encoded.
        field: String,
        /// Serializer message.
        message: String,
    },
    /// Canonical payload encoding failed.
    #[error(transparent)]
    Canonical(#[from] HashError),
    /// Payload type lookup failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The external signer failed.
    #[error(transparent)]
    Sign(#[from] SignError),
}

impl FormatError {
    /// Wraps a serializer failure for a named field.
    pub(crate) fn encode(field: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::Encode {
            field: field.into(),
            message: err.to_string(),
        }
    }
}
