// crates/provenance-formats/src/statement.rs
// ============================================================================
// Module: In-Toto Statement
// Description: Statement envelope shared by every schema version.
// Purpose: Pair a subject list with a version-specific predicate.
// Dependencies: provenance-core, serde
// ============================================================================

//! ## Overview
//! A [`Statement`] is `{_type, subject, predicateType, predicate}`. The
//! predicate is one of two shapes: the SLSA v0.2 provenance predicate, or the
//! SLSA v1.0 provenance predicate. Statement documents are produced, never
//! parsed, so only serialization is derived.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provenance_core::Subject;
use serde::Serialize;

use crate::slsa_v02::ProvenancePredicate;
use crate::slsa_v1::Provenance;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// In-toto statement type used by the older schemas.
pub const STATEMENT_V01: &str = "https://in-toto.io/Statement/v0.1";
/// In-toto statement type used by the newest schema.
pub const STATEMENT_V1: &str = "https://in-toto.io/Statement/v1";
/// Predicate type of SLSA v0.2 provenance.
pub const PREDICATE_SLSA_V02: &str = "https://slsa.dev/provenance/v0.2";
/// Predicate type of SLSA v1.0 provenance.
pub const PREDICATE_SLSA_V1: &str = "https://slsa.dev/provenance/v1";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Identity of the build platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Builder {
    /// Builder identifier uri.
    pub id: String,
}

impl Builder {
    /// Creates a builder identity.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Version-specific predicate body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Predicate {
    /// SLSA v0.2 provenance.
    SlsaV02(Box<ProvenancePredicate>),
    /// SLSA v1.0 provenance.
    SlsaV1(Box<Provenance>),
}

/// In-toto attestation statement.
///
/// # Invariants
/// - Every subject has a non-empty name and at least one digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Statement type uri.
    #[serde(rename = "_type")]
    pub statement_type: String,
    /// Artifacts the run produced.
    pub subject: Vec<Subject>,
    /// Predicate schema uri.
    pub predicate_type: String,
    /// Predicate body.
    pub predicate: Predicate,
}

impl Statement {
    /// Wraps a SLSA v0.2 predicate in a v0.1 statement.
    #[must_use]
    pub fn slsa_v02(subject: Vec<Subject>, predicate: ProvenancePredicate) -> Self {
        Self {
            statement_type: STATEMENT_V01.to_string(),
            subject,
            predicate_type: PREDICATE_SLSA_V02.to_string(),
            predicate: Predicate::SlsaV02(Box::new(predicate)),
        }
    }

    /// Wraps a SLSA v1.0 predicate in a statement of the given type.
    #[must_use]
    pub fn slsa_v1(statement_type: &str, subject: Vec<Subject>, predicate: Provenance) -> Self {
        Self {
            statement_type: statement_type.to_string(),
            subject,
            predicate_type: PREDICATE_SLSA_V1.to_string(),
            predicate: Predicate::SlsaV1(Box::new(predicate)),
        }
    }
}
