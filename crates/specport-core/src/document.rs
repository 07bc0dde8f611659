// ABOUTME: Parsed form of a specification's contents, in either YAML or JSON.
// ABOUTME: Serializes back to text in the same format it was parsed from.

use thiserror::Error;

use crate::annotations::{strip_json_annotations, strip_yaml_annotations};
use crate::model::ContentType;

/// Errors that can occur while parsing or serializing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specification document held as a generic key/value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecDocument {
    Yaml(serde_yaml::Value),
    Json(serde_json::Value),
}

impl SpecDocument {
    /// Parse raw contents according to the record's content type.
    pub fn parse(contents: &str, content_type: ContentType) -> Result<Self, DocumentError> {
        match content_type {
            ContentType::Yaml => Ok(SpecDocument::Yaml(serde_yaml::from_str(contents)?)),
            ContentType::Json => Ok(SpecDocument::Json(serde_json::from_str(contents)?)),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            SpecDocument::Yaml(_) => ContentType::Yaml,
            SpecDocument::Json(_) => ContentType::Json,
        }
    }

    /// The `openapi` (or legacy `swagger`) version string, if present.
    pub fn openapi_version(&self) -> Option<String> {
        match self {
            SpecDocument::Yaml(value) => ["openapi", "swagger"]
                .iter()
                .find_map(|key| value.get(*key))
                .and_then(yaml_scalar_to_string),
            SpecDocument::Json(value) => ["openapi", "swagger"]
                .iter()
                .find_map(|key| value.get(*key))
                .and_then(|v| v.as_str().map(str::to_owned)),
        }
    }

    /// Remove all `x-kong-*` keys from the tree, returning how many were removed.
    pub fn strip_annotations(&mut self) -> usize {
        match self {
            SpecDocument::Yaml(value) => strip_yaml_annotations(value),
            SpecDocument::Json(value) => strip_json_annotations(value),
        }
    }

    /// Serialize back to text. JSON is pretty-printed with a trailing newline.
    pub fn to_text(&self) -> Result<String, DocumentError> {
        match self {
            SpecDocument::Yaml(value) => Ok(serde_yaml::to_string(value)?),
            SpecDocument::Json(value) => {
                let mut text = serde_json::to_string_pretty(value)?;
                text.push('\n');
                Ok(text)
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
