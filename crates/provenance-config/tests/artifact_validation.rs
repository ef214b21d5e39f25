//! Artifact and builder config validation tests for provenance-config.
// crates/provenance-config/tests/artifact_validation.rs
// =============================================================================
// Module: Artifact Validation Tests
// Description: Validate format, build type, and builder settings.
// Purpose: Ensure misconfigured formats fail at load time and run shapes map to the right settings.
// =============================================================================

use std::collections::BTreeSet;

use provenance_config::SignerKind;
use provenance_config::StorageBackend;
use provenance_config::config_toml_example;
use provenance_core::DEFAULT_BUILDER_ID;
use provenance_core::RunKind;
use provenance_core::SLSA_BUILD_TYPE;
use provenance_core::TEKTON_BUILD_TYPE;
use provenance_formats::FormatterRegistry;
use provenance_formats::SchemaVersion;

mod common;

use common::TestResult;
use common::assert_invalid;

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.builder.id != DEFAULT_BUILDER_ID {
        return Err(format!("unexpected builder id {}", config.builder.id));
    }
    if config.build_definition.build_type != SLSA_BUILD_TYPE {
        return Err(format!("unexpected build type {}", config.build_definition.build_type));
    }
    if config.artifacts.oci.format != "simplesigning" {
        return Err(format!("unexpected oci format {}", config.artifacts.oci.format));
    }
    if config.artifacts.oci.storage != BTreeSet::from([StorageBackend::Oci]) {
        return Err("oci signatures default to oci storage".to_string());
    }
    if config.artifacts.pipelinerun.enable_deep_inspection {
        return Err("deep inspection is off by default".to_string());
    }
    Ok(())
}

#[test]
fn example_config_parses_and_validates() -> TestResult {
    let config = common::config_from_toml(&config_toml_example()).map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn unknown_taskrun_format_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.artifacts.taskrun.format = "slsa/v3".to_string();
    assert_invalid(config.validate(), "artifacts.taskrun.format: unsupported payload type: slsa/v3")
}

#[test]
fn unknown_pipelinerun_format_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.artifacts.pipelinerun.run.format = "tekton".to_string();
    assert_invalid(config.validate(), "artifacts.pipelinerun.format")
}

#[test]
fn oci_format_must_be_simplesigning() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.artifacts.oci.format = "in-toto".to_string();
    assert_invalid(config.validate(), "artifacts.oci.format must be \"simplesigning\"")
}

#[test]
fn unsupported_build_type_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.build_definition.build_type = "https://example.com/build/v9".to_string();
    assert_invalid(config.validate(), "build_definition.build_type")
}

#[test]
fn tekton_build_type_is_accepted() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.build_definition.build_type = TEKTON_BUILD_TYPE.to_string();
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn blank_builder_id_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.builder.id = "   ".to_string();
    assert_invalid(config.validate(), "builder.id must be non-empty")
}

#[test]
fn storage_and_signer_parse_from_toml() -> TestResult {
    let config = common::config_from_toml(
        "[artifacts.taskrun]\nstorage = [\"gcs\", \"docdb\", \"gcs\"]\nsigner = \"kms\"\n",
    )
    .map_err(|err| err.to_string())?;
    if config.artifacts.taskrun.storage != BTreeSet::from([StorageBackend::Docdb, StorageBackend::Gcs]) {
        return Err("storage should be deduplicated and sorted".to_string());
    }
    if config.artifacts.taskrun.signer != SignerKind::Kms {
        return Err("expected kms signer".to_string());
    }
    Ok(())
}

#[test]
fn deep_inspection_only_applies_to_workflow_runs() -> TestResult {
    let config = common::config_from_toml(&config_toml_example()).map_err(|err| err.to_string())?;
    if config.slsa_config(RunKind::StepRun).deep_inspection_enabled {
        return Err("step-runs never deep inspect".to_string());
    }
    if !config.slsa_config(RunKind::WorkflowRun).deep_inspection_enabled {
        return Err("workflow-runs follow the pipelinerun flag".to_string());
    }
    Ok(())
}

#[test]
fn formatter_follows_run_kind() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.artifacts.pipelinerun.run.format = "slsa/v2alpha4".to_string();
    let registry = FormatterRegistry::with_builtin_formats().map_err(|err| err.to_string())?;
    let step = config.formatter(&registry, RunKind::StepRun).map_err(|err| err.to_string())?;
    let workflow = config.formatter(&registry, RunKind::WorkflowRun).map_err(|err| err.to_string())?;
    if step.schema() != SchemaVersion::SlsaV1 || step.payload_type() != "in-toto" {
        return Err(format!("unexpected step formatter {}", step.schema()));
    }
    if workflow.schema() != SchemaVersion::V2Alpha4 {
        return Err(format!("unexpected workflow formatter {}", workflow.schema()));
    }
    Ok(())
}
