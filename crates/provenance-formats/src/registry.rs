// crates/provenance-formats/src/registry.rs
// ============================================================================
// Module: Formatter Registry
// Description: Explicit payload-type to statement-builder dispatch.
// Purpose: Route runs to the configured schema version without global state.
// Dependencies: crate::{slsa_v02, slsa_v1, payload}, provenance-core, thiserror
// ============================================================================

//! ## Overview
//! [`SchemaVersion`] is the closed set of statement builders. The
//! [`FormatterRegistry`] maps payload-type strings (including aliases) onto
//! schema versions; it is constructed at startup and passed to whatever
//! dispatches runs. A [`Formatter`] binds one schema version to its
//! configuration and drives build, encode, and sign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use provenance_core::PayloadSigner;
use provenance_core::RunObject;
use provenance_core::RunRecord;
use provenance_core::SignedPayload;
use provenance_core::SlsaConfig;
use thiserror::Error;

use crate::error::FormatError;
use crate::payload::encode_statement;
use crate::slsa_v02;
use crate::slsa_v1::v2alpha2;
use crate::slsa_v1::v2alpha3;
use crate::slsa_v1::v2alpha4;
use crate::statement::Statement;

// ============================================================================
// SECTION: Schema Versions
// ============================================================================

/// Payload type of the legacy SLSA v0.2 format.
pub const SLSA_V1_PAYLOAD: &str = "slsa/v1";
/// Alias of [`SLSA_V1_PAYLOAD`].
pub const IN_TOTO_PAYLOAD: &str = "in-toto";
/// Payload type of the `v2alpha2` format.
pub const SLSA_V2ALPHA2_PAYLOAD: &str = "slsa/v2alpha2";
/// Payload type of the `v2alpha3` format.
pub const SLSA_V2ALPHA3_PAYLOAD: &str = "slsa/v2alpha3";
/// Payload type of the `v2alpha4` format.
pub const SLSA_V2ALPHA4_PAYLOAD: &str = "slsa/v2alpha4";

/// Supported statement schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaVersion {
    /// SLSA v0.2 predicate in a v0.1 statement.
    SlsaV1,
    /// SLSA v1.0 predicate with a format-versioned build type.
    V2Alpha2,
    /// SLSA v1.0 predicate with a configurable build type.
    V2Alpha3,
    /// SLSA v1.0 predicate in a v1 statement with byproducts.
    V2Alpha4,
}

impl SchemaVersion {
    /// Every schema version in registration order.
    pub const ALL: [Self; 4] = [Self::SlsaV1, Self::V2Alpha2, Self::V2Alpha3, Self::V2Alpha4];

    /// Returns the canonical payload type.
    #[must_use]
    pub const fn payload_type(self) -> &'static str {
        match self {
            Self::SlsaV1 => SLSA_V1_PAYLOAD,
            Self::V2Alpha2 => SLSA_V2ALPHA2_PAYLOAD,
            Self::V2Alpha3 => SLSA_V2ALPHA3_PAYLOAD,
            Self::V2Alpha4 => SLSA_V2ALPHA4_PAYLOAD,
        }
    }

    /// Returns true when the output is wrapped in an in-toto statement.
    #[must_use]
    pub const fn wraps_payload(self) -> bool {
        true
    }

    /// Builds the statement for a run.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when the builder aborts.
    pub fn build(self, run: &RunRecord, config: Option<&SlsaConfig>) -> Result<Statement, FormatError> {
        match self {
            Self::SlsaV1 => slsa_v02::build_statement(run, config),
            Self::V2Alpha2 => v2alpha2::build_statement(run, config),
            Self::V2Alpha3 => v2alpha3::build_statement(run, config),
            Self::V2Alpha4 => v2alpha4::build_statement(run, config),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.payload_type())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry lookup and registration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A payload type was registered twice.
    #[error("payload type already registered: {0}")]
    Duplicate(String),
    /// No builder is registered for the payload type.
    #[error("unsupported payload type: {0}")]
    Unknown(String),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Payload-type dispatch table.
///
/// # Invariants
/// - Payload types are unique within the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterRegistry {
    /// Schema versions keyed by payload type.
    formats: BTreeMap<String, SchemaVersion>,
}

impl FormatterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { formats: BTreeMap::new() }
    }

    /// Creates a registry holding every built-in format and the `in-toto` alias.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when built-in registration collides.
    pub fn with_builtin_formats() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register_builtin_formats()?;
        Ok(registry)
    }

    /// Registers every built-in format and the `in-toto` alias.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when any payload type is already present.
    pub fn register_builtin_formats(&mut self) -> Result<(), RegistryError> {
        for schema in SchemaVersion::ALL {
            self.register(schema.payload_type(), schema)?;
        }
        self.register(IN_TOTO_PAYLOAD, SchemaVersion::SlsaV1)
    }

    /// Registers a payload type for a schema version.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when the payload type is already registered.
    pub fn register(&mut self, payload_type: impl Into<String>, schema: SchemaVersion) -> Result<(), RegistryError> {
        let payload_type = payload_type.into();
        if self.formats.contains_key(&payload_type) {
            return Err(RegistryError::Duplicate(payload_type));
        }
        self.formats.insert(payload_type, schema);
        Ok(())
    }

    /// Resolves a payload type to its schema version.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] when nothing is registered for it.
    pub fn resolve(&self, payload_type: &str) -> Result<SchemaVersion, RegistryError> {
        self.formats.get(payload_type).copied().ok_or_else(|| RegistryError::Unknown(payload_type.to_string()))
    }

    /// Returns registered payload types in sorted order.
    pub fn payload_types(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// Binds a payload type to its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] when nothing is registered for it.
    pub fn formatter(&self, payload_type: &str, config: Option<SlsaConfig>) -> Result<Formatter, RegistryError> {
        Ok(Formatter {
            payload_type: payload_type.to_string(),
            schema: self.resolve(payload_type)?,
            config,
        })
    }

    /// Builds the statement for a run under a payload type.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when the payload type is unknown or the builder aborts.
    pub fn create_payload(
        &self,
        payload_type: &str,
        run: &RunRecord,
        config: Option<&SlsaConfig>,
    ) -> Result<Statement, FormatError> {
        let schema = self.resolve(payload_type)?;
        tracing::debug!(payload_type, schema = %schema, run = %run.metadata().name, "dispatching statement builder");
        schema.build(run, config)
    }
}

// ============================================================================
// SECTION: Formatter
// ============================================================================

/// Schema version bound to a payload type and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    /// Payload type the formatter was resolved from.
    payload_type: String,
    /// Statement builder.
    schema: SchemaVersion,
    /// Builder configuration; defaults apply when absent.
    config: Option<SlsaConfig>,
}

impl Formatter {
    /// Returns the payload type the formatter was resolved from.
    #[must_use]
    pub fn payload_type(&self) -> &str {
        &self.payload_type
    }

    /// Returns the bound schema version.
    #[must_use]
    pub const fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Returns true when the output is wrapped in an in-toto statement.
    #[must_use]
    pub const fn wraps_payload(&self) -> bool {
        self.schema.wraps_payload()
    }

    /// Builds the statement for a run.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when the builder aborts.
    pub fn create_payload(&self, run: &RunRecord) -> Result<Statement, FormatError> {
        self.schema.build(run, self.config.as_ref())
    }

    /// Builds, encodes, and signs the statement for a run.
    ///
    /// The signer is never called when building or encoding fails.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when building, encoding, or signing fails.
    pub fn attest(&self, run: &RunRecord, signer: &dyn PayloadSigner) -> Result<SignedPayload, FormatError> {
        let statement = self.create_payload(run).inspect_err(|err| {
            tracing::warn!(
                payload_type = %self.payload_type,
                run = %run.metadata().name,
                error = %err,
                "statement builder failed; not signing"
            );
        })?;
        let encoded = encode_statement(&statement)?;
        tracing::debug!(
            payload_type = %self.payload_type,
            digest = %encoded.digest,
            subjects = statement.subject.len(),
            "signing statement"
        );
        Ok(signer.sign(&encoded.payload_type, &encoded.bytes)?)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
