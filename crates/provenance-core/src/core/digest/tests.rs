// crates/provenance-core/src/core/digest/tests.rs
// ============================================================================
// Module: Digest Unit Tests
// Description: Unit coverage for digest helpers.
// Purpose: Pin parsing and validation edge cases close to the code.
// Dependencies: provenance-core
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

#[test]
fn normalize_algorithm_folds_case_and_separators() {
    assert_eq!(normalize_algorithm("SHA-256"), "sha256");
    assert_eq!(normalize_algorithm(" sha_512 "), "sha512");
    assert_eq!(normalize_algorithm("sha1"), "sha1");
}

#[test]
fn strip_tag_ignores_registry_port() {
    assert_eq!(strip_tag("gcr.io/x:v1"), "gcr.io/x");
    assert_eq!(strip_tag("localhost:5000/img"), "localhost:5000/img");
    assert_eq!(strip_tag("localhost:5000/img:latest"), "localhost:5000/img");
    assert_eq!(strip_tag("img"), "img");
}

#[test]
fn strip_tag_drops_embedded_digest() {
    let digest = format!("sha256:{}", "e".repeat(64));
    assert_eq!(strip_tag(&format!("gcr.io/x@{digest}")), "gcr.io/x");
    assert_eq!(strip_tag(&format!("gcr.io/x:v1@{digest}")), "gcr.io/x");
    assert_eq!(strip_tag(&format!("localhost:5000/img@{digest}")), "localhost:5000/img");
}

#[test]
fn digest_rejects_short_sha256() {
    let err = "sha256:deadbeef".parse::<Digest>().unwrap_err();
    assert!(matches!(err, DigestError::Length { expected: 64, actual: 8, .. }));
}

#[test]
fn digest_accepts_unknown_algorithm_of_any_length() {
    let digest: Digest = "blake3:abc123".parse().unwrap();
    assert_eq!(digest.to_string(), "blake3:abc123");
}

#[test]
fn conflict_with_reports_first_disagreement() {
    let mut left = DigestSet::new();
    left.insert("sha1", &"a".repeat(40)).unwrap();
    let mut right = DigestSet::new();
    right.insert("sha1", &"b".repeat(40)).unwrap();
    let conflict = left.conflict_with(&right).unwrap();
    assert_eq!(conflict.0, "sha1");
}
