// crates/provenance-core/src/core/artifact.rs
// ============================================================================
// Module: Attestation Artifacts
// Description: Subjects, materials, and resolved dependencies.
// Purpose: Hold the output and input entries shared by every statement schema.
// Dependencies: crate::core::digest, base64, serde
// ============================================================================

//! ## Overview
//! Subjects are build outputs; materials are build inputs for the older
//! schema; resolved dependencies generalize materials with an optional role
//! name and embedded content for the newer schemas. Every entry is complete
//! by construction: constructors refuse empty names and empty digest sets
//! where the schema requires them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::digest::DigestSet;
use crate::core::digest::ImageReference;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Scheme prefix for OCI image uris.
pub const OCI_SCHEME: &str = "oci://";
/// Media type of JSON-encoded content and byproducts.
pub const JSON_MEDIA_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Subject
// ============================================================================

/// Build output named by a statement.
///
/// # Invariants
/// - `name` is non-empty and `digest` holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// Artifact name or uri.
    pub name: String,
    /// Artifact digests.
    pub digest: DigestSet,
}

impl Subject {
    /// Creates a subject when both the name and digest set are present.
    #[must_use]
    pub fn new(name: impl Into<String>, digest: DigestSet) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() || digest.is_empty() {
            return None;
        }
        Some(Self {
            name,
            digest,
        })
    }

    /// Renders the subject as `name@algorithm:hex` using its preferred digest.
    #[must_use]
    pub fn artifact_uri(&self) -> Option<String> {
        self.digest.preferred().map(|digest| format!("{}@{digest}", self.name))
    }
}

// ============================================================================
// SECTION: Material
// ============================================================================

/// Build input recorded by the older statement schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Material {
    /// Input uri.
    pub uri: String,
    /// Input digests, possibly empty for symbolic git revisions.
    #[serde(default)]
    pub digest: DigestSet,
}

impl Material {
    /// Creates a material.
    #[must_use]
    pub fn new(uri: impl Into<String>, digest: DigestSet) -> Self {
        Self {
            uri: uri.into(),
            digest,
        }
    }

    /// Creates an `oci://` material from a parsed image reference.
    #[must_use]
    pub fn from_image(image: &ImageReference) -> Self {
        Self::new(oci_uri(image.uri()), image.digest().clone().into_set())
    }
}

/// Prefixes an image uri with the OCI scheme unless already present.
#[must_use]
pub fn oci_uri(uri: &str) -> String {
    if uri.starts_with(OCI_SCHEME) { uri.to_string() } else { format!("{OCI_SCHEME}{uri}") }
}

// ============================================================================
// SECTION: Resolved Dependency
// ============================================================================

/// Build input recorded by the newer statement schemas.
///
/// Empty optional fields are omitted on the wire; `content` is base64.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependency {
    /// Semantic role (`task`, `pipelineTask`, `inputs/result`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Dependency uri.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// Dependency digests.
    #[serde(default, skip_serializing_if = "DigestSet::is_empty")]
    pub digest: DigestSet,
    /// Embedded content bytes.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub content: Option<Vec<u8>>,
    /// Media type of the embedded content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl ResolvedDependency {
    /// Creates an unnamed dependency from a uri and digests.
    #[must_use]
    pub fn new(uri: impl Into<String>, digest: DigestSet) -> Self {
        Self {
            uri: uri.into(),
            digest,
            ..Self::default()
        }
    }

    /// Returns this dependency tagged with a role name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns this dependency with embedded content.
    #[must_use]
    pub fn with_content(mut self, content: Vec<u8>, media_type: impl Into<String>) -> Self {
        self.content = Some(content);
        self.media_type = Some(media_type.into());
        self
    }
}

impl From<Material> for ResolvedDependency {
    fn from(material: Material) -> Self {
        Self::new(material.uri, material.digest)
    }
}

// ============================================================================
// SECTION: Base64 Content
// ============================================================================

/// Serde adapter encoding optional bytes as standard base64.
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    /// Serializes optional bytes as a base64 string.
    #[allow(clippy::ref_option, reason = "Signature is fixed by serde's `with` adapter.")]
    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes optional bytes from a base64 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?;
        encoded
            .map(|text| STANDARD.decode(text.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
