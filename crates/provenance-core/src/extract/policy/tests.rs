// crates/provenance-core/src/extract/policy/tests.rs
// ============================================================================
// Module: Malformed Input Policy Unit Tests
// Description: Pins the skip-or-abort decision of every extraction site.
// Purpose: Catch accidental changes to fail-closed handling.
// Dependencies: provenance-core
// ============================================================================

//! ## Overview
//! The call-site constants are part of the attestation contract; changing one
//! must be a deliberate, reviewed edit of these tests.

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
fn call_site_policies_are_pinned() {
    assert_eq!(TYPE_HINT_POLICY, MalformedInputPolicy::Skip);
    assert_eq!(RUNTIME_IMAGE_ID_POLICY, MalformedInputPolicy::Abort);
    assert_eq!(REF_SOURCE_DIGEST_POLICY, MalformedInputPolicy::Skip);
}

#[test]
fn skip_drops_failures() {
    let outcome: Result<u8, String> = Err("bad".to_string());
    assert_eq!(MalformedInputPolicy::Skip.apply(outcome, "test"), Ok(None));
}

#[test]
fn abort_propagates_failures() {
    let outcome: Result<u8, String> = Err("bad".to_string());
    assert_eq!(MalformedInputPolicy::Abort.apply(outcome, "test"), Err("bad".to_string()));
}

#[test]
fn success_passes_through_either_policy() {
    assert_eq!(MalformedInputPolicy::Skip.apply(Ok::<u8, String>(7), "test"), Ok(Some(7)));
    assert_eq!(MalformedInputPolicy::Abort.apply(Ok::<u8, String>(7), "test"), Ok(Some(7)));
}
