// crates/provenance-formats/src/slsa_v1/v2alpha2.rs
// ============================================================================
// Module: slsa/v2alpha2
// Description: SLSA v1.0 predicate with a format-versioned build type.
// Purpose: Serve the `slsa/v2alpha2` payload type.
// Dependencies: crate::slsa_v1, provenance-core
// ============================================================================

//! ## Overview
//! The build type is fixed to the format's own uri suffixed with the engine
//! resource type; configuration only supplies the builder id and deep
//! inspection. Internal parameters follow the SLSA build type. Subjects use
//! the all-outputs policy and no byproducts are emitted.

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

/// Build type prefix of the format.
pub const BUILD_TYPE_PREFIX: &str = "https://chains.tekton.dev/format/slsa/v2alpha2/type/";

/// Format flavor.
pub const FLAVOR: Flavor = Flavor {
    statement_type: STATEMENT_V01,
    build_type: BuildTypeSource::Versioned(BUILD_TYPE_PREFIX),
    subjects: SubjectPolicy::AllOutputs,
    byproducts: false,
};

/// Builds a `slsa/v2alpha2` statement.
///
/// # Errors
///
/// Returns [`FormatError`] when extraction aborts.
pub fn build_statement(run: &RunRecord, config: Option<&SlsaConfig>) -> Result<Statement, FormatError> {
    super::build_statement(FLAVOR, run, config)
}
