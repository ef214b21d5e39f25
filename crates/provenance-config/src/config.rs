// crates/provenance-config/src/config.rs
// ============================================================================
// Module: Run Provenance Configuration
// Description: Configuration loading and validation for attestation generation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: provenance-core, provenance-formats, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Each artifact class (step-runs, workflow-runs, OCI images) selects a
//! payload format, the storage backends that receive signed payloads, and a
//! signer. Formats are checked against the built-in formatter registry so a
//! typo fails at load time rather than on the first run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use provenance_core::BuildType;
use provenance_core::DEFAULT_BUILDER_ID;
use provenance_core::RunKind;
use provenance_core::SLSA_BUILD_TYPE;
use provenance_core::SlsaConfig;
use provenance_formats::Formatter;
use provenance_formats::FormatterRegistry;
use provenance_formats::RegistryError;
use provenance_formats::registry::IN_TOTO_PAYLOAD;
use provenance_formats::simplesigning::SIMPLE_SIGNING_FORMAT;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "provenance.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "PROVENANCE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the builder identifier.
pub(crate) const MAX_BUILDER_ID_LENGTH: usize = 2048;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Attestation generation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvenanceConfig {
    /// Builder identity.
    #[serde(default)]
    pub builder: BuilderConfig,
    /// Build-definition settings.
    #[serde(default)]
    pub build_definition: BuildDefinitionConfig,
    /// Per artifact-class settings.
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    /// Optional config source metadata (not serialized).
    #[serde(skip)]
    pub source_modified_at: Option<SystemTime>,
}

impl ProvenanceConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path argument wins, then `PROVENANCE_CONFIG`, then
    /// `provenance.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        let mut config = Self::from_bytes(&bytes)?;
        config.source_modified_at = fs::metadata(&resolved).and_then(|meta| meta.modified()).ok();
        Ok(config)
    }

    /// Parses and validates configuration from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bytes are oversized, not UTF-8, not
    /// valid TOML, or fail validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.builder.validate()?;
        self.build_definition.validate()?;
        let registry = FormatterRegistry::with_builtin_formats()
            .map_err(|err| ConfigError::Invalid(format!("formatter registry: {err}")))?;
        self.artifacts.validate(&registry)
    }

    /// Returns the statement-builder settings for a run shape.
    ///
    /// Deep inspection only applies to workflow-runs.
    #[must_use]
    pub fn slsa_config(&self, kind: RunKind) -> SlsaConfig {
        SlsaConfig {
            builder_id: self.builder.id.clone(),
            build_type: self.build_definition.build_type.clone(),
            deep_inspection_enabled: kind == RunKind::WorkflowRun
                && self.artifacts.pipelinerun.enable_deep_inspection,
        }
    }

    /// Returns the artifact settings for a run shape.
    #[must_use]
    pub const fn run_artifacts(&self, kind: RunKind) -> &RunArtifactConfig {
        match kind {
            RunKind::StepRun => &self.artifacts.taskrun,
            RunKind::WorkflowRun => &self.artifacts.pipelinerun.run,
        }
    }

    /// Binds the configured format for a run shape to its settings.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] when the format is not registered.
    pub fn formatter(&self, registry: &FormatterRegistry, kind: RunKind) -> Result<Formatter, RegistryError> {
        registry.formatter(&self.run_artifacts(kind).format, Some(self.slsa_config(kind)))
    }
}

/// Builder identity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuilderConfig {
    /// Builder identifier uri written into every statement.
    #[serde(default = "default_builder_id")]
    pub id: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self { id: default_builder_id() }
    }
}

impl BuilderConfig {
    /// Validates builder identity.
    fn validate(&self) -> Result<(), ConfigError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ConfigError::Invalid("builder.id must be non-empty".to_string()));
        }
        if id.len() > MAX_BUILDER_ID_LENGTH {
            return Err(ConfigError::Invalid("builder.id exceeds max length".to_string()));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid("builder.id must not contain whitespace".to_string()));
        }
        Ok(())
    }
}

/// Build-definition configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildDefinitionConfig {
    /// Build type uri.
    #[serde(default = "default_build_type")]
    pub build_type: String,
}

impl Default for BuildDefinitionConfig {
    fn default() -> Self {
        Self { build_type: default_build_type() }
    }
}

impl BuildDefinitionConfig {
    /// Validates the build type.
    fn validate(&self) -> Result<(), ConfigError> {
        self.build_type
            .parse::<BuildType>()
            .map(|_| ())
            .map_err(|err| ConfigError::Invalid(format!("build_definition.build_type: {err}")))
    }
}

/// Per artifact-class configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsConfig {
    /// Step-run attestations.
    #[serde(default)]
    pub taskrun: RunArtifactConfig,
    /// Workflow-run attestations.
    #[serde(default)]
    pub pipelinerun: PipelineRunArtifactConfig,
    /// OCI image signatures.
    #[serde(default)]
    pub oci: OciArtifactConfig,
}

impl ArtifactsConfig {
    /// Validates every artifact class.
    fn validate(&self, registry: &FormatterRegistry) -> Result<(), ConfigError> {
        self.taskrun.validate("artifacts.taskrun", registry)?;
        self.pipelinerun.run.validate("artifacts.pipelinerun", registry)?;
        self.oci.validate()
    }
}

/// Format, storage, and signer for a run artifact class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunArtifactConfig {
    /// Registered payload type.
    #[serde(default = "default_run_format")]
    pub format: String,
    /// Storage backends receiving signed payloads; empty disables storage.
    #[serde(default = "default_run_storage")]
    pub storage: BTreeSet<StorageBackend>,
    /// Signer backend.
    #[serde(default)]
    pub signer: SignerKind,
}

impl Default for RunArtifactConfig {
    fn default() -> Self {
        Self {
            format: default_run_format(),
            storage: default_run_storage(),
            signer: SignerKind::default(),
        }
    }
}

impl RunArtifactConfig {
    /// Validates the format against the registry.
    fn validate(&self, field: &str, registry: &FormatterRegistry) -> Result<(), ConfigError> {
        registry
            .resolve(&self.format)
            .map(|_| ())
            .map_err(|err| ConfigError::Invalid(format!("{field}.format: {err}")))
    }
}

/// Workflow-run artifact configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "PipelineRunArtifactFields")]
pub struct PipelineRunArtifactConfig {
    /// Format, storage, and signer.
    pub run: RunArtifactConfig,
    /// Recurse into completed child step-runs.
    pub enable_deep_inspection: bool,
}

/// Flat TOML shape of [`PipelineRunArtifactConfig`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PipelineRunArtifactFields {
    /// Registered payload type.
    #[serde(default = "default_run_format")]
    format: String,
    /// Storage backends receiving signed payloads.
    #[serde(default = "default_run_storage")]
    storage: BTreeSet<StorageBackend>,
    /// Signer backend.
    #[serde(default)]
    signer: SignerKind,
    /// Recurse into completed child step-runs.
    #[serde(default)]
    enable_deep_inspection: bool,
}

impl From<PipelineRunArtifactFields> for PipelineRunArtifactConfig {
    fn from(fields: PipelineRunArtifactFields) -> Self {
        Self {
            run: RunArtifactConfig {
                format: fields.format,
                storage: fields.storage,
                signer: fields.signer,
            },
            enable_deep_inspection: fields.enable_deep_inspection,
        }
    }
}

/// OCI image signature configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OciArtifactConfig {
    /// Payload format; only simple signing is supported.
    #[serde(default = "default_oci_format")]
    pub format: String,
    /// Storage backends receiving signatures.
    #[serde(default = "default_oci_storage")]
    pub storage: BTreeSet<StorageBackend>,
    /// Signer backend.
    #[serde(default)]
    pub signer: SignerKind,
}

impl Default for OciArtifactConfig {
    fn default() -> Self {
        Self {
            format: default_oci_format(),
            storage: default_oci_storage(),
            signer: SignerKind::default(),
        }
    }
}

impl OciArtifactConfig {
    /// Validates the OCI format.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.format != SIMPLE_SIGNING_FORMAT {
            return Err(ConfigError::Invalid(format!(
                "artifacts.oci.format must be \"{SIMPLE_SIGNING_FORMAT}\", got \"{}\"",
                self.format
            )));
        }
        Ok(())
    }
}

/// Storage backends for signed payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Annotations on the run object.
    Tekton,
    /// OCI registry next to the image.
    Oci,
    /// Google Cloud Storage bucket.
    Gcs,
    /// Document database.
    Docdb,
    /// Grafeas occurrence store.
    Grafeas,
    /// Pub/Sub topic.
    Pubsub,
    /// Archivista server.
    Archivista,
}

/// Signer backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerKind {
    /// Local x509 key pair.
    #[default]
    X509,
    /// Cloud key-management service.
    Kms,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default builder id.
fn default_builder_id() -> String {
    DEFAULT_BUILDER_ID.to_string()
}

/// Default build type.
fn default_build_type() -> String {
    SLSA_BUILD_TYPE.to_string()
}

/// Default payload type for run artifacts.
fn default_run_format() -> String {
    IN_TOTO_PAYLOAD.to_string()
}

/// Default storage for run artifacts.
fn default_run_storage() -> BTreeSet<StorageBackend> {
    BTreeSet::from([StorageBackend::Tekton])
}

/// Default OCI payload format.
fn default_oci_format() -> String {
    SIMPLE_SIGNING_FORMAT.to_string()
}

/// Default storage for OCI signatures.
fn default_oci_storage() -> BTreeSet<StorageBackend> {
    BTreeSet::from([StorageBackend::Oci])
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument, the environment, or the default.
fn resolve_path(path: Option<&Path>, env_path: Option<String>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
