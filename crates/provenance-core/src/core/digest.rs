// crates/provenance-core/src/core/digest.rs
// ============================================================================
// Module: Digest and Image Reference Utilities
// Description: Digest sets, `algorithm:hex` digests, and `uri@digest` references.
// Purpose: Parse, validate, and render the digest formats used in attestations.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Digests are always rendered as `algorithm:lowercase-hex`. Algorithm names
//! are normalized (`SHA-256` becomes `sha256`) and well-known algorithms are
//! length-checked. A [`DigestSet`] holds at most one value per algorithm.
//!
//! Image references (`uri@algorithm:hex`) and runtime image IDs
//! (`docker-pullable://uri@algorithm:hex`) are parsed into [`ImageReference`].
//! Rendering a parsed reference reproduces the canonical input exactly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// SHA-256 algorithm name.
pub const SHA256: &str = "sha256";
/// SHA-1 algorithm name (git commits).
pub const SHA1: &str = "sha1";
/// SHA-384 algorithm name.
pub const SHA384: &str = "sha384";
/// SHA-512 algorithm name.
pub const SHA512: &str = "sha512";

/// Runtime prefixes stripped from container image IDs before parsing.
pub const IMAGE_ID_SCHEMES: &[&str] = &["docker-pullable://", "docker://", "containerd://"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing digests and image references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// Digest text is not `algorithm:hex`.
    #[error("digest {value:?} is not of the form algorithm:hex")]
    Malformed {
        /// Offending digest text.
        value: String,
    },
    /// Digest value contains non-hex characters.
    #[error("digest value for {algorithm} is not hex")]
    NotHex {
        /// Normalized algorithm name.
        algorithm: String,
    },
    /// Digest value length does not match the algorithm.
    #[error("digest algorithm {algorithm} expects {expected} hex characters, found {actual}")]
    Length {
        /// Normalized algorithm name.
        algorithm: String,
        /// Expected number of hex characters.
        expected: usize,
        /// Actual number of hex characters.
        actual: usize,
    },
    /// Image reference has no `@` separator.
    #[error("image reference {value:?} is not separable by @")]
    MissingSeparator {
        /// Offending reference text.
        value: String,
    },
    /// Image reference has an empty uri.
    #[error("image reference {value:?} has an empty uri")]
    EmptyUri {
        /// Offending reference text.
        value: String,
    },
}

// ============================================================================
// SECTION: Algorithm Helpers
// ============================================================================

/// Normalizes a digest algorithm name (`SHA-256`, `sha_256` -> `sha256`).
#[must_use]
pub fn normalize_algorithm(name: &str) -> String {
    name.trim().chars().filter(|ch| *ch != '-' && *ch != '_').flat_map(char::to_lowercase).collect()
}

/// Returns the expected hex length for well-known algorithms.
#[must_use]
pub fn expected_hex_len(algorithm: &str) -> Option<usize> {
    match algorithm {
        SHA1 => Some(40),
        SHA256 => Some(64),
        SHA384 => Some(96),
        SHA512 => Some(128),
        _ => None,
    }
}

/// Validates a hex value for an already-normalized algorithm and lowercases it.
fn validate_hex(algorithm: &str, hex: &str) -> Result<String, DigestError> {
    let hex = hex.trim();
    if hex.is_empty() || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(DigestError::NotHex {
            algorithm: algorithm.to_string(),
        });
    }
    if let Some(expected) = expected_hex_len(algorithm)
        && hex.len() != expected
    {
        return Err(DigestError::Length {
            algorithm: algorithm.to_string(),
            expected,
            actual: hex.len(),
        });
    }
    Ok(hex.to_ascii_lowercase())
}

// ============================================================================
// SECTION: Digest
// ============================================================================

/// A single `algorithm:hex` digest.
///
/// # Invariants
/// - `algorithm` is normalized and non-empty.
/// - `hex` is lowercase and length-checked for well-known algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest {
    /// Normalized algorithm name.
    algorithm: String,
    /// Lowercase hex value.
    hex: String,
}

impl Digest {
    /// Creates a validated digest from an algorithm and hex value.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] when the algorithm is empty or the hex is invalid.
    pub fn new(algorithm: &str, hex: &str) -> Result<Self, DigestError> {
        let algorithm = normalize_algorithm(algorithm);
        if algorithm.is_empty() {
            return Err(DigestError::Malformed {
                value: format!("{algorithm}:{hex}"),
            });
        }
        let hex = validate_hex(&algorithm, hex)?;
        Ok(Self {
            algorithm,
            hex,
        })
    }

    /// Wraps a digest produced locally from a known algorithm and lowercase hex.
    pub(crate) fn from_trusted_hex(algorithm: &'static str, hex: String) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            hex,
        }
    }

    /// Returns the normalized algorithm name.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Returns the lowercase hex value.
    #[must_use]
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Converts the digest into a single-entry [`DigestSet`].
    #[must_use]
    pub fn into_set(self) -> DigestSet {
        let mut set = DigestSet::new();
        set.0.insert(self.algorithm, self.hex);
        set
    }
}

impl FromStr for Digest {
    type Err = DigestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let Some((algorithm, hex)) = trimmed.split_once(':') else {
            return Err(DigestError::Malformed {
                value: value.to_string(),
            });
        };
        if algorithm.trim().is_empty() || hex.trim().is_empty() {
            return Err(DigestError::Malformed {
                value: value.to_string(),
            });
        }
        Self::new(algorithm, hex)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

// ============================================================================
// SECTION: Digest Set
// ============================================================================

/// Mapping from algorithm name to lowercase hex digest.
///
/// # Invariants
/// - Each algorithm appears at most once.
/// - Entries added through [`DigestSet::insert`] are validated.
/// - Serializes as a plain JSON object in algorithm order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestSet(BTreeMap<String, String>);

impl DigestSet {
    /// Creates an empty digest set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Creates a validated single-entry digest set.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] when the digest is invalid.
    pub fn single(algorithm: &str, hex: &str) -> Result<Self, DigestError> {
        Digest::new(algorithm, hex).map(Digest::into_set)
    }

    /// Inserts a validated digest, replacing any value for the same algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] when the digest is invalid.
    pub fn insert(&mut self, algorithm: &str, hex: &str) -> Result<Option<String>, DigestError> {
        let digest = Digest::new(algorithm, hex)?;
        Ok(self.0.insert(digest.algorithm, digest.hex))
    }

    /// Returns the hex value for an algorithm.
    #[must_use]
    pub fn get(&self, algorithm: &str) -> Option<&str> {
        self.0.get(algorithm).map(String::as_str)
    }

    /// Returns true when the set holds no digests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of algorithms in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(algorithm, hex)` pairs in algorithm order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Returns the first algorithm whose value differs between the two sets.
    #[must_use]
    pub fn conflict_with<'a>(&'a self, other: &'a Self) -> Option<(&'a str, &'a str, &'a str)> {
        self.0.iter().find_map(|(algorithm, hex)| {
            other
                .0
                .get(algorithm)
                .filter(|other_hex| *other_hex != hex)
                .map(|other_hex| (algorithm.as_str(), hex.as_str(), other_hex.as_str()))
        })
    }

    /// Returns true when both sets agree on at least one algorithm.
    #[must_use]
    pub fn shares_value_with(&self, other: &Self) -> bool {
        self.0.iter().any(|(algorithm, hex)| other.0.get(algorithm) == Some(hex))
    }

    /// Adds every algorithm from `other` that is not already present.
    pub fn absorb(&mut self, other: &Self) {
        for (algorithm, hex) in &other.0 {
            self.0.entry(algorithm.clone()).or_insert_with(|| hex.clone());
        }
    }

    /// Returns the preferred digest for display (`sha256`, then `sha1`, then first).
    #[must_use]
    pub fn preferred(&self) -> Option<Digest> {
        [SHA256, SHA1]
            .iter()
            .find_map(|algorithm| self.0.get_key_value(*algorithm))
            .or_else(|| self.0.iter().next())
            .map(|(algorithm, hex)| Digest {
                algorithm: algorithm.clone(),
                hex: hex.clone(),
            })
    }
}

impl<'a> IntoIterator for &'a DigestSet {
    type IntoIter = btree_map::Iter<'a, String, String>;
    type Item = (&'a String, &'a String);

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// SECTION: Image Reference
// ============================================================================

/// A `uri@algorithm:hex` artifact reference.
///
/// # Invariants
/// - `uri` is non-empty and contains no `@digest` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    /// Artifact uri (may include a tag).
    uri: String,
    /// Artifact digest.
    digest: Digest,
}

impl ImageReference {
    /// Creates a reference from parts.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::EmptyUri`] when `uri` is blank.
    pub fn new(uri: &str, digest: Digest) -> Result<Self, DigestError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(DigestError::EmptyUri {
                value: format!("@{digest}"),
            });
        }
        Ok(Self {
            uri: uri.to_string(),
            digest,
        })
    }

    /// Parses a runtime image ID, stripping known runtime schemes first.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] when the ID cannot be split into uri, algorithm, and hex.
    pub fn from_image_id(image_id: &str) -> Result<Self, DigestError> {
        let trimmed = image_id.trim();
        let stripped = IMAGE_ID_SCHEMES
            .iter()
            .find_map(|scheme| trimmed.strip_prefix(scheme))
            .unwrap_or(trimmed);
        stripped.parse()
    }

    /// Returns the uri portion.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the digest portion.
    #[must_use]
    pub const fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Returns the uri without a trailing `:tag` on its last path segment.
    #[must_use]
    pub fn repository(&self) -> &str {
        strip_tag(&self.uri)
    }
}

impl FromStr for ImageReference {
    type Err = DigestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let Some((uri, digest)) = trimmed.rsplit_once('@') else {
            return Err(DigestError::MissingSeparator {
                value: value.to_string(),
            });
        };
        if uri.trim().is_empty() {
            return Err(DigestError::EmptyUri {
                value: value.to_string(),
            });
        }
        Self::new(uri, digest.parse()?)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.uri, self.digest)
    }
}

/// Strips a trailing `@digest` and then a `:tag` from the last path segment
/// of an image uri.
#[must_use]
pub fn strip_tag(uri: &str) -> &str {
    let uri = uri.split_once('@').map_or(uri, |(repository, _)| repository);
    let segment_start = uri.rfind('/').map_or(0, |index| index + 1);
    match uri[segment_start ..].rfind(':') {
        Some(offset) => &uri[.. segment_start + offset],
        None => uri,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
