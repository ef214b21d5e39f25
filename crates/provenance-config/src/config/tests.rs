// crates/provenance-config/src/config/tests.rs
// ============================================================================
// Module: Config Unit Tests
// Description: Path resolution and path limit checks.
// Purpose: Cover private helpers that integration tests cannot reach.
// ============================================================================

//! ## Overview
//! Path resolution takes the environment value as an argument so precedence
//! can be tested without mutating process state.

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
fn explicit_path_beats_environment() {
    let resolved = resolve_path(Some(Path::new("/etc/explicit.toml")), Some("/etc/env.toml".to_string()))
        .expect("resolved");
    assert_eq!(resolved, PathBuf::from("/etc/explicit.toml"));
}

#[test]
fn environment_beats_default() {
    let resolved = resolve_path(None, Some("/etc/env.toml".to_string())).expect("resolved");
    assert_eq!(resolved, PathBuf::from("/etc/env.toml"));
}

#[test]
fn default_name_is_used_last() {
    let resolved = resolve_path(None, None).expect("resolved");
    assert_eq!(resolved, PathBuf::from(DEFAULT_CONFIG_NAME));
}

#[test]
fn oversized_environment_path_is_rejected() {
    let env_path = "a".repeat(MAX_TOTAL_PATH_LENGTH + 1);
    let err = resolve_path(None, Some(env_path)).expect_err("too long");
    assert!(err.to_string().contains("config path exceeds max length"));
}

#[test]
fn validate_path_rejects_long_components() {
    let path = PathBuf::from(format!("/tmp/{}.toml", "c".repeat(MAX_PATH_COMPONENT_LENGTH)));
    let err = validate_path(&path).expect_err("component too long");
    assert!(err.to_string().contains("config path component too long"));
}

#[test]
fn validate_path_accepts_ordinary_paths() {
    validate_path(Path::new("/etc/provenance/provenance.toml")).expect("valid");
}

#[test]
fn builder_id_rejects_whitespace() {
    let builder = BuilderConfig { id: "https://ci example".to_string() };
    let err = builder.validate().expect_err("whitespace");
    assert!(err.to_string().contains("builder.id must not contain whitespace"));
}

#[test]
fn builder_id_rejects_oversized_values() {
    let builder = BuilderConfig { id: "b".repeat(MAX_BUILDER_ID_LENGTH + 1) };
    let err = builder.validate().expect_err("too long");
    assert!(err.to_string().contains("builder.id exceeds max length"));
}

#[test]
fn pipeline_fields_flatten_into_run_settings() {
    let fields: PipelineRunArtifactFields =
        toml::from_str("format = \"slsa/v2alpha4\"\nenable_deep_inspection = true").expect("fields");
    let config = PipelineRunArtifactConfig::from(fields);
    assert_eq!(config.run.format, "slsa/v2alpha4");
    assert_eq!(config.run.storage, BTreeSet::from([StorageBackend::Tekton]));
    assert_eq!(config.run.signer, SignerKind::X509);
    assert!(config.enable_deep_inspection);
}
