// crates/provenance-core/src/extract/dedup.rs
// ============================================================================
// Module: Deduplication
// Description: Merges duplicate materials and resolved dependencies.
// Purpose: Produce deterministic input lists without losing conflicting claims.
// Dependencies: crate::core::{artifact, digest}, tracing
// ============================================================================

//! ## Overview
//! Two entries describe the same input when they share an identity: name,
//! uri, and embedded content. Same-identity entries whose digest sets agree on
//! every shared algorithm merge by union into the first-seen entry. Entries
//! that disagree on an algorithm are both kept and reported as a
//! [`DigestConflict`].
//!
//! # Invariants
//! - First-seen order is preserved.
//! - No two output entries share identity and digest set.
//! - Entries with different names never merge.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::artifact::Material;
use crate::core::artifact::ResolvedDependency;
use crate::core::digest::DigestSet;

// ============================================================================
// SECTION: Entry Trait
// ============================================================================

/// Entry that can be deduplicated by identity and digest set.
pub trait DigestEntry {
    /// Returns the semantic role name, if any.
    fn entry_name(&self) -> Option<&str>;
    /// Returns the entry uri.
    fn entry_uri(&self) -> &str;
    /// Returns embedded content, if any.
    fn entry_content(&self) -> Option<&[u8]>;
    /// Returns the digest set.
    fn digest_set(&self) -> &DigestSet;
    /// Returns the digest set for merging.
    fn digest_set_mut(&mut self) -> &mut DigestSet;

    /// Returns true when both entries describe the same input.
    fn same_identity(&self, other: &Self) -> bool {
        self.entry_name() == other.entry_name()
            && self.entry_uri() == other.entry_uri()
            && self.entry_content() == other.entry_content()
    }
}

impl DigestEntry for Material {
    fn entry_name(&self) -> Option<&str> {
        None
    }

    fn entry_uri(&self) -> &str {
        &self.uri
    }

    fn entry_content(&self) -> Option<&[u8]> {
        None
    }

    fn digest_set(&self) -> &DigestSet {
        &self.digest
    }

    fn digest_set_mut(&mut self) -> &mut DigestSet {
        &mut self.digest
    }
}

impl DigestEntry for ResolvedDependency {
    fn entry_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn entry_uri(&self) -> &str {
        &self.uri
    }

    fn entry_content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    fn digest_set(&self) -> &DigestSet {
        &self.digest
    }

    fn digest_set_mut(&mut self) -> &mut DigestSet {
        &mut self.digest
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Two claims about the same input that disagree on a digest value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestConflict {
    /// Semantic role name of the entries, if any.
    pub name: Option<String>,
    /// Shared uri.
    pub uri: String,
    /// Algorithm with differing values.
    pub algorithm: String,
    /// Value of the first-seen entry.
    pub kept: String,
    /// Value of the entry kept alongside it.
    pub incoming: String,
}

/// Deduplicated entries plus the conflicts found along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupReport<T> {
    /// Deduplicated entries in first-seen order.
    pub entries: Vec<T>,
    /// Conflicting claims kept as separate entries.
    pub conflicts: Vec<DigestConflict>,
}

impl<T> DedupReport<T> {
    /// Returns the entries, discarding the conflict report.
    #[must_use]
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }
}

// ============================================================================
// SECTION: Deduplication
// ============================================================================

/// Deduplicates entries by identity, merging compatible digest sets.
#[must_use]
pub fn dedupe<T: DigestEntry>(entries: impl IntoIterator<Item = T>) -> DedupReport<T> {
    let mut kept: Vec<T> = Vec::new();
    let mut conflicts = Vec::new();
    for entry in entries {
        let compatible = kept.iter_mut().find(|existing| {
            existing.same_identity(&entry) && existing.digest_set().conflict_with(entry.digest_set()).is_none()
        });
        if let Some(existing) = compatible {
            existing.digest_set_mut().absorb(entry.digest_set());
            continue;
        }
        if let Some(conflict) = first_conflict(&kept, &entry) {
            tracing::warn!(
                uri = %conflict.uri,
                algorithm = %conflict.algorithm,
                kept = %conflict.kept,
                incoming = %conflict.incoming,
                "conflicting digests for the same input; keeping both"
            );
            conflicts.push(conflict);
        }
        kept.push(entry);
    }
    DedupReport {
        entries: kept,
        conflicts,
    }
}

/// Deduplicates materials.
#[must_use]
pub fn dedupe_materials(materials: impl IntoIterator<Item = Material>) -> DedupReport<Material> {
    dedupe(materials)
}

/// Deduplicates resolved dependencies.
#[must_use]
pub fn dedupe_resolved_dependencies(
    dependencies: impl IntoIterator<Item = ResolvedDependency>,
) -> DedupReport<ResolvedDependency> {
    dedupe(dependencies)
}

/// Describes the disagreement between `entry` and the first same-identity kept entry.
fn first_conflict<T: DigestEntry>(kept: &[T], entry: &T) -> Option<DigestConflict> {
    kept.iter().filter(|existing| existing.same_identity(entry)).find_map(|existing| {
        existing.digest_set().conflict_with(entry.digest_set()).map(|(algorithm, mine, theirs)| DigestConflict {
            name: entry.entry_name().map(str::to_string),
            uri: entry.entry_uri().to_string(),
            algorithm: algorithm.to_string(),
            kept: mine.to_string(),
            incoming: theirs.to_string(),
        })
    })
}
