// crates/provenance-core/src/assemble/mod.rs
// ============================================================================
// Module: Assembly
// Description: Parameters, resolved dependencies, and build definitions.
// Purpose: Combine extracted data into schema-neutral predicate parts.
// Dependencies: crate::assemble::{build_definition, dependencies, parameters}
// ============================================================================

//! ## Overview
//! Assembly sits between extraction and the versioned statement builders.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod build_definition;
pub mod dependencies;
pub mod parameters;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use build_definition::BuildDefinition;
pub use build_definition::BuildDefinitionError;
pub use build_definition::assemble_build_definition;
pub use build_definition::assemble_for;
pub use dependencies::DependencyError;
pub use dependencies::resolved_dependencies;
pub use parameters::ParameterError;
pub use parameters::external_parameters;
pub use parameters::internal_parameters;

// ============================================================================
// SECTION: Tests
// ============================================================================
