// crates/provenance-formats/src/payload.rs
// ============================================================================
// Module: Payload Encoding
// Description: Canonical JSON bytes and digests for signable payloads.
// Purpose: Give the signer deterministic bytes for every statement.
// Dependencies: provenance-core, serde
// ============================================================================

//! ## Overview
//! Payloads are encoded with RFC 8785 canonical JSON so two builds of the
//! same statement produce identical bytes and therefore identical digests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::Digest;
use provenance_core::HashAlgorithm;
use provenance_core::canonical_json_bytes;
use provenance_core::hash_bytes;
use serde::Serialize;

use crate::error::FormatError;
use crate::statement::Statement;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Envelope payload type of in-toto statements.
pub const IN_TOTO_PAYLOAD_TYPE: &str = "application/vnd.in-toto+json";
/// Envelope payload type of simple-signing documents.
pub const SIMPLE_SIGNING_PAYLOAD_TYPE: &str = "application/vnd.dev.cosign.simplesigning.v1+json";

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Canonical payload bytes ready for signing.
///
/// # Invariants
/// - `digest` is the sha256 of `bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// Envelope payload type.
    pub payload_type: String,
    /// Canonical JSON bytes.
    pub bytes: Vec<u8>,
    /// Digest of `bytes`.
    pub digest: Digest,
}

/// Encodes any payload document as canonical JSON.
///
/// # Errors
///
/// Returns [`FormatError::Canonical`] when the value cannot be canonicalized.
pub fn encode_payload<T: Serialize + ?Sized>(value: &T, payload_type: &str) -> Result<EncodedPayload, FormatError> {
    let bytes = canonical_json_bytes(value)?;
    let digest = hash_bytes(HashAlgorithm::Sha256, &bytes);
    Ok(EncodedPayload {
        payload_type: payload_type.to_string(),
        bytes,
        digest,
    })
}

/// Encodes an in-toto statement.
///
/// # Errors
///
/// Returns [`FormatError::Canonical`] when the statement cannot be canonicalized.
pub fn encode_statement(statement: &Statement) -> Result<EncodedPayload, FormatError> {
    encode_payload(statement, IN_TOTO_PAYLOAD_TYPE)
}
