// crates/provenance-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `provenance.toml`. Every value shown is also the
//! default except deep inspection, which is enabled here.

/// Returns a canonical example `provenance.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[builder]
id = "https://tekton.dev/chains/v2"

[build_definition]
build_type = "https://tekton.dev/chains/v2/slsa"

[artifacts.taskrun]
format = "in-toto"
storage = ["tekton"]
signer = "x509"

[artifacts.pipelinerun]
format = "in-toto"
storage = ["tekton"]
signer = "x509"
enable_deep_inspection = true

[artifacts.oci]
format = "simplesigning"
storage = ["oci"]
signer = "x509"
"#,
    )
}
