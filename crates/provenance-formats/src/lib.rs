// crates/provenance-formats/src/lib.rs
// ============================================================================
// Module: Run Provenance Formats Library
// Description: Versioned attestation statement builders and their registry.
// Purpose: Turn run records into signable in-toto statements and payloads.
// Dependencies: provenance-core, serde, serde_json, thiserror, time, tracing
// ============================================================================

//! ## Overview
//! Each supported payload type maps to one statement builder: a pure function
//! from a run record and optional configuration to a complete in-toto
//! statement. The [`FormatterRegistry`] is constructed explicitly at startup
//! and dispatches by payload type; [`Formatter::attest`] drives a builder,
//! canonical encoding, and the external signer, and never signs a payload
//! whose builder failed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
pub mod payload;
pub mod registry;
pub mod simplesigning;
pub mod slsa_v02;
pub mod slsa_v1;
pub mod statement;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::FormatError;
pub use payload::EncodedPayload;
pub use payload::IN_TOTO_PAYLOAD_TYPE;
pub use payload::SIMPLE_SIGNING_PAYLOAD_TYPE;
pub use payload::encode_payload;
pub use payload::encode_statement;
pub use registry::Formatter;
pub use registry::FormatterRegistry;
pub use registry::RegistryError;
pub use registry::SchemaVersion;
pub use simplesigning::SimpleSigning;
pub use simplesigning::attest_image;
pub use simplesigning::simple_signing_payload;
pub use statement::Builder;
pub use statement::Predicate;
pub use statement::Statement;
