// crates/provenance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Provenance Interfaces
// Description: Collaborator seams for run-record retrieval and payload signing.
// Purpose: Keep cluster clients and key material out of the extraction core.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The extraction pipeline never talks to a cluster or a key store. A host
//! controller fetches run records (with children attached) through
//! [`RunRecordProvider`] and hands finished payload bytes to a
//! [`PayloadSigner`]. Implementations must fail closed: a provider that
//! cannot attach every child must return an error rather than a partial
//! record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::run::RunKind;
use crate::core::run::RunRecord;

// ============================================================================
// SECTION: Run Record Provider
// ============================================================================

/// Identifies a run within the cluster.
///
/// # Invariants
/// - `name` is unique within `namespace` for the given `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunIdentity {
    /// Run shape.
    pub kind: RunKind,
    /// Namespace holding the run.
    pub namespace: String,
    /// Run name.
    pub name: String,
}

impl RunIdentity {
    /// Creates a run identity.
    #[must_use]
    pub fn new(kind: RunKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// Run record provider errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No run exists for the identity.
    #[error("run {namespace}/{name} not found")]
    NotFound {
        /// Namespace searched.
        namespace: String,
        /// Run name searched.
        name: String,
    },
    /// The backing client failed.
    #[error("run record provider error: {0}")]
    Provider(String),
}

/// Supplies immutable run records with children already attached.
pub trait RunRecordProvider {
    /// Fetches the run record for an identity.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the run cannot be fetched completely.
    fn fetch(&self, identity: &RunIdentity) -> Result<RunRecord, ProviderError>;
}

// ============================================================================
// SECTION: Payload Signer
// ============================================================================

/// Single signature over a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSignature {
    /// Identifier of the signing key, if the backend reports one.
    pub key_id: Option<String>,
    /// Raw signature bytes.
    pub signature: Vec<u8>,
}

/// Payload bytes together with their signatures.
///
/// # Invariants
/// - `payload` is exactly the byte string that was signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Media type of the payload.
    pub payload_type: String,
    /// Signed payload bytes.
    pub payload: Vec<u8>,
    /// Signatures over `payload`.
    pub signatures: Vec<PayloadSignature>,
}

/// Payload signer errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SignError {
    /// The signing backend failed.
    #[error("signer error: {0}")]
    Signer(String),
}

/// Signs finished payload bytes.
pub trait PayloadSigner {
    /// Signs `payload` declared as `payload_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SignError`] when the backend cannot produce a signature.
    fn sign(&self, payload_type: &str, payload: &[u8]) -> Result<SignedPayload, SignError>;
}
