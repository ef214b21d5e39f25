// crates/provenance-formats/src/slsa_v1/v2alpha3.rs
// ============================================================================
// Module: slsa/v2alpha3
// Description: SLSA v1.0 predicate with a configurable build type.
// Purpose: Serve the `slsa/v2alpha3` payload type.
// Dependencies: crate::slsa_v1, provenance-core
// ============================================================================

//! ## Overview
//! The build type comes from configuration and selects the internal
//! parameter set and whether child records are embedded. An unknown build
//! type fails the statement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::RunRecord;
use provenance_core::SlsaConfig;
use provenance_core::SubjectPolicy;

use crate::error::FormatError;
use crate::slsa_v1::BuildTypeSource;
use crate::slsa_v1::Flavor;
use crate::statement::STATEMENT_V01;
use crate::statement::Statement;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Format flavor.
pub const FLAVOR: Flavor = Flavor {
    statement_type: STATEMENT_V01,
    build_type: BuildTypeSource::Configured,
    subjects: SubjectPolicy::AllOutputs,
    byproducts: false,
};

/// Builds a `slsa/v2alpha3` statement.
///
/// # Errors
///
/// Returns [`FormatError`] for unsupported build types or when extraction
/// aborts.
pub fn build_statement(run: &RunRecord, config: Option<&SlsaConfig>) -> Result<Statement, FormatError> {
    super::build_statement(FLAVOR, run, config)
}
