// crates/provenance-config/src/lib.rs
// ============================================================================
// Module: Run Provenance Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for provenance.toml semantics.
// Dependencies: provenance-core, provenance-formats, serde, toml
// ============================================================================

//! ## Overview
//! `provenance-config` defines the configuration that selects a statement
//! format, storage backends, and signer for each artifact class, plus the
//! builder identity and build type handed to statement builders. Validation
//! is strict and fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
