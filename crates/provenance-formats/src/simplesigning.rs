// crates/provenance-formats/src/simplesigning.rs
// ============================================================================
// Module: Simple Signing
// Description: Container-image signature payload for the OCI artifact class.
// Purpose: Sign an image digest without wrapping it in an in-toto statement.
// Dependencies: provenance-core, serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! The simple-signing document binds an image repository to its manifest
//! digest. It is handed to the signer as-is; it is never wrapped in an
//! in-toto statement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::ImageReference;
use provenance_core::PayloadSigner;
use provenance_core::SignedPayload;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::FormatError;
use crate::payload::SIMPLE_SIGNING_PAYLOAD_TYPE;
use crate::payload::encode_payload;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Payload type name used in configuration.
pub const SIMPLE_SIGNING_FORMAT: &str = "simplesigning";
/// Signature type recorded in the critical section.
pub const COSIGN_SIGNATURE_TYPE: &str = "cosign container image signature";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Simple-signing payload document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleSigning {
    /// Claims a verifier must understand.
    pub critical: Critical,
    /// Free-form annotations; none are recorded.
    pub optional: Option<Map<String, Value>>,
}

/// Critical section of a simple-signing payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Critical {
    /// Signed repository.
    pub identity: Identity,
    /// Signed manifest.
    pub image: Image,
    /// Signature type.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Repository identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Repository without tag or digest.
    #[serde(rename = "docker-reference")]
    pub docker_reference: String,
}

/// Manifest identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Manifest digest as `algorithm:hex`.
    #[serde(rename = "docker-manifest-digest")]
    pub docker_manifest_digest: String,
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the simple-signing payload for an image.
#[must_use]
pub fn simple_signing_payload(image: &ImageReference) -> SimpleSigning {
    SimpleSigning {
        critical: Critical {
            identity: Identity {
                docker_reference: image.repository().to_string(),
            },
            image: Image {
                docker_manifest_digest: image.digest().to_string(),
            },
            kind: COSIGN_SIGNATURE_TYPE.to_string(),
        },
        optional: None,
    }
}

/// Encodes and signs the simple-signing payload for an image.
///
/// # Errors
///
/// Returns [`FormatError`] when encoding or signing fails.
pub fn attest_image(image: &ImageReference, signer: &dyn PayloadSigner) -> Result<SignedPayload, FormatError> {
    let encoded = encode_payload(&simple_signing_payload(image), SIMPLE_SIGNING_PAYLOAD_TYPE)?;
    tracing::debug!(image = %image, digest = %encoded.digest, "signing simple-signing payload");
    Ok(signer.sign(&encoded.payload_type, &encoded.bytes)?)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
