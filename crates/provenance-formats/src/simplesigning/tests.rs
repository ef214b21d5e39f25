// crates/provenance-formats/src/simplesigning/tests.rs
// ============================================================================
// Module: Simple Signing Unit Tests
// Description: Unit coverage for the simple-signing payload.
// Purpose: Pin parsing and validation edge cases close to the code.
// Dependencies: provenance-formats, provenance-core, serde_json
// ============================================================================

//! ## Overview
//! Unit tests for the parent module's private and public helpers.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers for clarity."
)]

// ============================================================================
// SECTION: Tests
// ============================================================================

use super::*;
use std::cell::RefCell;

use provenance_core::PayloadSignature;
use provenance_core::SignError;
use serde_json::json;

struct RecordingSigner {
    calls: RefCell<Vec<(String, Vec<u8>)>>,
}

impl PayloadSigner for RecordingSigner {
    fn sign(&self, payload_type: &str, payload: &[u8]) -> Result<SignedPayload, SignError> {
        self.calls.borrow_mut().push((payload_type.to_string(), payload.to_vec()));
        Ok(SignedPayload {
            payload_type: payload_type.to_string(),
            payload: payload.to_vec(),
            signatures: vec![PayloadSignature { key_id: None, signature: vec![1, 2, 3] }],
        })
    }
}

fn image() -> ImageReference {
    let hex: String = std::iter::repeat_n('a', 64).collect();
    format!("gcr.io/org/web:v1@sha256:{hex}").parse().expect("image reference")
}

#[test]
fn payload_binds_repository_to_manifest_digest() {
    let hex: String = std::iter::repeat_n('a', 64).collect();
    let value = serde_json::to_value(simple_signing_payload(&image())).expect("json");
    assert_eq!(
        value,
        json!({
            "critical": {
                "identity": {"docker-reference": "gcr.io/org/web"},
                "image": {"docker-manifest-digest": format!("sha256:{hex}")},
                "type": "cosign container image signature"
            },
            "optional": null
        })
    );
}

#[test]
fn attest_image_signs_canonical_unwrapped_bytes() {
    let signer = RecordingSigner { calls: RefCell::new(Vec::new()) };
    let signed = attest_image(&image(), &signer).expect("signed");
    assert_eq!(signed.payload_type, SIMPLE_SIGNING_PAYLOAD_TYPE);
    let calls = signer.calls.borrow();
    assert_eq!(calls.len(), 1);
    let document: serde_json::Value = serde_json::from_slice(&calls[0].1).expect("payload json");
    assert!(document.get("_type").is_none());
    assert_eq!(document["critical"]["type"], COSIGN_SIGNATURE_TYPE);
}
