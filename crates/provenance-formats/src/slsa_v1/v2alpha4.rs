// crates/provenance-formats/src/slsa_v1/v2alpha4.rs
// ============================================================================
// Module: slsa/v2alpha4
// Description: SLSA v1.0 predicate in a v1 statement with byproducts.
// Purpose: Serve the `slsa/v2alpha4` payload type.
// Dependencies: crate::slsa_v1, provenance-core
// ============================================================================

//! ## Overview
//! The newest format. Subjects are restricted to outputs flagged or hinted as
//! build artifacts; every other result becomes a byproduct.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::RunRecord;
use provenance_core::SlsaConfig;
use provenance_core::SubjectPolicy;

use crate::error::FormatError;
use crate::slsa_v1::BuildTypeSource;
use crate::slsa_v1::Flavor;
use crate::statement::STATEMENT_V1;
use crate::statement::Statement;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Format flavor.
pub const FLAVOR: Flavor = Flavor {
    statement_type: STATEMENT_V1,
    build_type: BuildTypeSource::Configured,
    subjects: SubjectPolicy::BuildArtifactsOnly,
    byproducts: true,
};

/// Builds a `slsa/v2alpha4` statement.
///
/// # Errors
///
/// Returns [`FormatError`] for unsupported build types or when extraction
/// aborts.
pub fn build_statement(run: &RunRecord, config: Option<&SlsaConfig>) -> Result<Statement, FormatError> {
    super::build_statement(FLAVOR, run, config)
}
