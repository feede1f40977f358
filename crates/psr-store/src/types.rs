use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    String,
    StringList,
    SecureString,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "String",
            ParameterType::StringList => "StringList",
            ParameterType::SecureString => "SecureString",
        }
    }

    /// Parse the wire name. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "String" => Some(ParameterType::String),
            "StringList" => Some(ParameterType::StringList),
            "SecureString" => Some(ParameterType::SecureString),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage tier of a parameter. Replicated as-is but never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParameterTier {
    #[default]
    Standard,
    Advanced,
    #[serde(rename = "Intelligent-Tiering")]
    IntelligentTiering,
}

impl ParameterTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterTier::Standard => "Standard",
            ParameterTier::Advanced => "Advanced",
            ParameterTier::IntelligentTiering => "Intelligent-Tiering",
        }
    }
}

/// A parameter as held by one store.
///
/// `version`, `last_modified` and `arn` are provenance assigned by the store
/// that holds the record. They are meaningless in any other store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub name: String,
    pub value: String,
    #[serde(rename = "Type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub tier: ParameterTier,
    /// Monotonic per-name version, starting at 1.
    #[serde(default)]
    pub version: i64,
    #[serde(rename = "LastModifiedDate", default)]
    pub last_modified: DateTime<Utc>,
    #[serde(rename = "ARN", default)]
    pub arn: String,
}

/// Target-bound write.
///
/// Carries only what a store accepts from a caller; provenance is assigned
/// by the receiving store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    pub name: String,
    pub value: String,
    #[serde(rename = "Type")]
    pub param_type: ParameterType,
    pub tier: ParameterTier,
    pub overwrite: bool,
}

impl PutRequest {
    /// Overwriting write of `param`'s name, value, type and tier.
    pub fn replicate(param: &Parameter) -> Self {
        Self {
            name: param.name.clone(),
            value: param.value.clone(),
            param_type: param.param_type,
            tier: param.tier,
            overwrite: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutResponse {
    pub version: i64,
    pub tier: ParameterTier,
}
