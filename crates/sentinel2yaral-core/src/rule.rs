//! Sentinel detection rule model

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

/// A Microsoft Sentinel detection rule.
///
/// The rule is carried as structured YAML rather than a fixed schema:
/// conversion is delegated to the model, so any well-formed mapping is
/// accepted and no detection semantics are validated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentinelRule {
    doc: Value,
}

impl SentinelRule {
    /// Parse a rule from a YAML string
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let doc: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(doc)
    }

    /// Parse a rule from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Wrap an already-parsed YAML document
    pub fn from_value(doc: Value) -> CoreResult<Self> {
        if !doc.is_mapping() {
            return Err(CoreError::InvalidRule(
                "Sentinel rule must be a YAML mapping".to_string(),
            ));
        }
        Ok(Self { doc })
    }

    /// Canonical YAML re-serialization, used for prompts and display
    pub fn to_yaml_string(&self) -> CoreResult<String> {
        Ok(serde_yaml::to_string(&self.doc)?)
    }

    /// Underlying YAML document
    pub fn as_value(&self) -> &Value {
        &self.doc
    }

    /// Rule display name (`displayName`, falling back to `name`)
    pub fn display_name(&self) -> Option<&str> {
        self.str_field("displayName").or_else(|| self.str_field("name"))
    }

    /// Rule description
    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// Rule severity as written in the source rule
    pub fn severity(&self) -> Option<&str> {
        self.str_field("severity")
    }

    /// KQL detection query
    pub fn query(&self) -> Option<&str> {
        self.str_field("query")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.doc.get(key).and_then(Value::as_str)
    }
}
