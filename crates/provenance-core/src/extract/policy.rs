// crates/provenance-core/src/extract/policy.rs
// ============================================================================
// Module: Malformed Input Policy
// Description: Per-call-site skip-or-abort decisions for malformed run data.
// Purpose: Make best-effort versus fail-closed handling explicit and testable.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! Every extraction site that can encounter malformed data consults one of
//! the constants below instead of choosing ad hoc. Skipped input is logged at
//! `warn` and dropped; aborted input propagates and halts attestation of the
//! run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Handling for malformed input at one extraction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedInputPolicy {
    /// Log and drop the entry; continue extraction.
    Skip,
    /// Propagate the error; abort attestation for the run.
    Abort,
}

impl MalformedInputPolicy {
    /// Applies the policy to a parse outcome.
    ///
    /// Returns `Ok(Some(value))` on success, `Ok(None)` when a failure is
    /// skipped, and the original error when the policy aborts.
    ///
    /// # Errors
    ///
    /// Returns the parse error unchanged under [`MalformedInputPolicy::Abort`].
    pub fn apply<T, E: fmt::Display>(self, outcome: Result<T, E>, site: &str) -> Result<Option<T>, E> {
        match (outcome, self) {
            (Ok(value), _) => Ok(Some(value)),
            (Err(err), Self::Skip) => {
                tracing::warn!(site = %site, error = %err, "skipping malformed input");
                Ok(None)
            }
            (Err(err), Self::Abort) => Err(err),
        }
    }
}

// ============================================================================
// SECTION: Call-Site Policies
// ============================================================================

/// Type-hinted results: malformed digests, half pairs, bad list tokens.
pub const TYPE_HINT_POLICY: MalformedInputPolicy = MalformedInputPolicy::Skip;

/// Runtime image IDs of step and sidecar containers.
pub const RUNTIME_IMAGE_ID_POLICY: MalformedInputPolicy = MalformedInputPolicy::Abort;

/// Digest entries on a remote definition source.
pub const REF_SOURCE_DIGEST_POLICY: MalformedInputPolicy = MalformedInputPolicy::Skip;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
