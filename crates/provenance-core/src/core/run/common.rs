// crates/provenance-core/src/core/run/common.rs
// ============================================================================
// Module: Shared Run Record Types
// Description: Metadata, parameters, results, conditions, and provenance blocks.
// Purpose: Model the pieces shared by step-runs and workflow-runs.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! These types mirror the cluster API shape of run records closely enough to
//! deserialize them directly from JSON. Unknown fields on the run spec are
//! preserved so the spec can be re-emitted verbatim as external parameters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Label linking a child step-run to the pipeline task that spawned it.
pub const PIPELINE_TASK_LABEL: &str = "tekton.dev/pipelineTask";
/// Condition type describing overall run success.
pub const SUCCEEDED_CONDITION: &str = "Succeeded";

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Object metadata for a run record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Run name.
    #[serde(default)]
    pub name: String,
    /// Run namespace.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Cluster-assigned unique identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    /// Labels attached to the run.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations attached to the run.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Parameters and Results
// ============================================================================

/// Value of a parameter or result: string, string array, or flat object.
///
/// Object fields keep their JSON scalar type, so `{"isBuildArtifact": true}`
/// and `{"isBuildArtifact": "true"}` both deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Scalar string value.
    String(String),
    /// Array of strings.
    Array(Vec<String>),
    /// Flat string-keyed object.
    Object(BTreeMap<String, Value>),
}

impl ParamValue {
    /// Returns the scalar string value, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Array(_) | Self::Object(_) => None,
        }
    }

    /// Returns the object value, if any.
    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            Self::String(_) | Self::Array(_) => None,
        }
    }

    /// Returns every string embedded in the value; non-string object fields are skipped.
    #[must_use]
    pub fn strings(&self) -> Vec<&str> {
        match self {
            Self::String(value) => vec![value.as_str()],
            Self::Array(values) => values.iter().map(String::as_str).collect(),
            Self::Object(map) => map.values().filter_map(Value::as_str).collect(),
        }
    }
}

/// Named parameter supplied to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: ParamValue,
}

/// Parameter declaration on a resolved task or pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Declared parameter type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Default value when the run omits the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
}

/// Result emitted by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Result name.
    pub name: String,
    /// Declared result type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Result value.
    pub value: ParamValue,
}

impl RunResult {
    /// Creates a string-valued result.
    #[must_use]
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            value: ParamValue::String(value.into()),
        }
    }

    /// Creates an object-valued result.
    #[must_use]
    pub fn object<K, V>(name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            kind: None,
            value: ParamValue::Object(
                entries.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
            ),
        }
    }
}

/// Merges parameter defaults with explicit values (explicit wins).
#[must_use]
pub fn params_with_defaults(specs: &[ParamSpec], params: &[Param]) -> BTreeMap<String, ParamValue> {
    let mut merged = BTreeMap::new();
    for spec in specs {
        if let Some(default) = &spec.default {
            merged.insert(spec.name.clone(), default.clone());
        }
    }
    for param in params {
        merged.insert(param.name.clone(), param.value.clone());
    }
    merged
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// Status condition reported on a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition type (`Succeeded`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Condition status (`True`, `False`, `Unknown`).
    pub status: String,
    /// Machine-readable reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Summarized run outcome derived from the `Succeeded` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Run completed successfully.
    Succeeded,
    /// Run completed with a failure.
    Failed,
    /// Run is still executing or its state is unknown.
    Running,
}

impl RunOutcome {
    /// Derives the outcome from status conditions.
    #[must_use]
    pub fn from_conditions(conditions: &[Condition]) -> Self {
        match conditions.iter().find(|condition| condition.kind == SUCCEEDED_CONDITION) {
            Some(condition) if condition.status == "True" => Self::Succeeded,
            Some(condition) if condition.status == "False" => Self::Failed,
            _ => Self::Running,
        }
    }

    /// Returns the stable label used in build configs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Running => "Running",
        }
    }
}

// ============================================================================
// SECTION: Provenance
// ============================================================================

/// Remote source a run definition was resolved from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefSource {
    /// Source uri.
    #[serde(default)]
    pub uri: String,
    /// Source digest, untrusted until validated.
    #[serde(default)]
    pub digest: BTreeMap<String, String>,
    /// Path of the definition within the source.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub entry_point: String,
}

/// Provenance block recorded by the engine on a run status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProvenance {
    /// Remote definition source, when resolved remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_source: Option<RefSource>,
    /// Engine feature flags active for the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_flags: Option<Value>,
}

// ============================================================================
// SECTION: Definition References
// ============================================================================

/// Reference to a task or pipeline definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionRef {
    /// Definition name for in-cluster references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Definition kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Remote resolver name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    /// Resolver parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    /// Remaining reference fields (`bundle`, `apiVersion`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
