// crates/provenance-core/tests/digest.rs
// ============================================================================
// Module: Digest and Image Reference Tests
// Description: Parsing, validation, and round-trip of digest strings.
// Purpose: Pin the `uri@algorithm:hex` wire format.
// ============================================================================

//! ## Overview
//! Verifies digest validation rules and that image references re-serialize
//! exactly as parsed.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use provenance_core::Digest;
use provenance_core::DigestError;
use provenance_core::DigestSet;
use provenance_core::ImageReference;
use proptest::prelude::*;

#[test]
fn digest_lowercases_and_normalizes_algorithm() {
    let hex = "AB".repeat(32);
    let digest: Digest = format!("SHA-256:{hex}").parse().expect("digest");
    assert_eq!(digest.algorithm(), "sha256");
    assert_eq!(digest.hex(), "ab".repeat(32));
}

#[test]
fn digest_rejects_wrong_length_for_known_algorithms() {
    let err = "sha1:abcd".parse::<Digest>().unwrap_err();
    assert!(matches!(err, DigestError::Length { expected: 40, actual: 4, .. }));
}

#[test]
fn digest_accepts_unknown_algorithms_of_any_hex_length() {
    let digest: Digest = "blake3:abcdef".parse().expect("digest");
    assert_eq!(digest.to_string(), "blake3:abcdef");
}

#[test]
fn image_reference_requires_separator() {
    let err = "gcr.io/a/b-sha256:deadbeef".parse::<ImageReference>().unwrap_err();
    assert!(matches!(err, DigestError::MissingSeparator { .. }));
}

#[test]
fn image_id_schemes_are_stripped() {
    let hex = "c".repeat(64);
    for scheme in ["docker-pullable://", "docker://", "containerd://", ""] {
        let image = ImageReference::from_image_id(&format!("{scheme}gcr.io/x/y:v1@sha256:{hex}")).expect("image");
        assert_eq!(image.uri(), "gcr.io/x/y:v1");
        assert_eq!(image.repository(), "gcr.io/x/y");
    }
}

#[test]
fn registry_port_is_not_mistaken_for_tag() {
    let hex = "c".repeat(64);
    let image: ImageReference = format!("localhost:5000/app@sha256:{hex}").parse().expect("image");
    assert_eq!(image.repository(), "localhost:5000/app");
}

#[test]
fn digest_set_serializes_as_plain_object() {
    let mut set = DigestSet::new();
    set.insert("sha256", &"a".repeat(64)).expect("sha256");
    set.insert("sha1", &"b".repeat(40)).expect("sha1");
    let value = serde_json::to_value(&set).expect("serialize");
    assert_eq!(value, serde_json::json!({"sha1": "b".repeat(40), "sha256": "a".repeat(64)}));
}

#[test]
fn preferred_digest_favors_sha256() {
    let mut set = DigestSet::new();
    set.insert("sha1", &"b".repeat(40)).expect("sha1");
    set.insert("sha512", &"d".repeat(128)).expect("sha512");
    assert_eq!(set.preferred().expect("preferred").algorithm(), "sha1");
    set.insert("sha256", &"a".repeat(64)).expect("sha256");
    assert_eq!(set.preferred().expect("preferred").algorithm(), "sha256");
}

proptest! {
    #[test]
    fn image_reference_round_trips(
        host in "[a-z]{1,10}\\.[a-z]{2,3}",
        path in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,2}",
        hex in "[0-9a-f]{64}",
    ) {
        let text = format!("{host}/{path}@sha256:{hex}");
        let image: ImageReference = text.parse().unwrap();
        prop_assert_eq!(image.to_string(), text);
    }

    #[test]
    fn uppercase_hex_is_lowercased(hex in "[0-9A-F]{40}") {
        let digest: Digest = format!("sha1:{hex}").parse().unwrap();
        prop_assert_eq!(digest.hex(), hex.to_ascii_lowercase());
    }
}
