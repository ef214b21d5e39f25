// crates/provenance-formats/tests/payload.rs
// ============================================================================
// Module: Payload Encoding Tests
// Description: Canonical bytes and digests of statement payloads.
// Purpose: Ensure signers always receive deterministic canonical JSON.
// ============================================================================

//! ## Overview
//! Statements built from arbitrary result sets encode to canonical JSON whose
//! digest is stable across repeated builds.

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

use proptest::prelude::*;
use provenance_core::HashAlgorithm;
use provenance_core::RunRecord;
use provenance_core::RunResult;
use provenance_core::StepRun;
use provenance_core::hash_bytes;
use provenance_formats::FormatterRegistry;
use provenance_formats::IN_TOTO_PAYLOAD_TYPE;
use provenance_formats::encode_statement;

fn run_with_results(results: Vec<RunResult>) -> RunRecord {
    let mut run = StepRun::default();
    run.metadata.name = "build".to_string();
    run.status.results = results;
    RunRecord::from(run)
}

#[test]
fn encoded_statement_is_canonical_json() {
    let registry = FormatterRegistry::with_builtin_formats().expect("registry");
    let statement = registry.create_payload("slsa/v2alpha4", &run_with_results(Vec::new()), None).expect("statement");
    let encoded = encode_statement(&statement).expect("encoded");
    assert_eq!(encoded.payload_type, IN_TOTO_PAYLOAD_TYPE);
    let text = String::from_utf8(encoded.bytes.clone()).expect("utf8");
    assert!(text.starts_with("{\"_type\":\"https://in-toto.io/Statement/v1\",\"predicate\":"));
    assert!(!text.contains('\n'));
    assert_eq!(encoded.digest, hash_bytes(HashAlgorithm::Sha256, &encoded.bytes));
    assert_eq!(encoded.digest.algorithm(), "sha256");
}

proptest! {
    #[test]
    fn encoding_is_stable_for_arbitrary_results(
        entries in proptest::collection::vec(("[A-Z_]{1,12}", "[ -~]{0,24}"), 0 .. 8),
    ) {
        let results: Vec<RunResult> =
            entries.iter().map(|(name, value)| RunResult::string(name.as_str(), value.as_str())).collect();
        let run = run_with_results(results);
        let registry = FormatterRegistry::with_builtin_formats().expect("registry");
        for payload_type in ["slsa/v1", "slsa/v2alpha2", "slsa/v2alpha3", "slsa/v2alpha4"] {
            let first = encode_statement(&registry.create_payload(payload_type, &run, None).expect("first"))
                .expect("encode first");
            let second = encode_statement(&registry.create_payload(payload_type, &run, None).expect("second"))
                .expect("encode second");
            prop_assert_eq!(&first.bytes, &second.bytes);
            prop_assert_eq!(first.digest, second.digest);
        }
    }
}
