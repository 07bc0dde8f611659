// ABOUTME: Defines the ApiSpec record representing one stored API specification document.
// ABOUTME: Field names follow the on-disk workspace format (_id, parentId, fileName, contentType).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The serialization format of a specification's raw contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Yaml,
    Json,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Yaml => "yaml",
            ContentType::Json => "json",
        }
    }

    /// Guess the format from a file extension, falling back to sniffing the contents.
    pub fn detect(path: &Path, contents: &str) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ContentType::Json,
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ContentType::Yaml
            }
            _ => Self::sniff(contents),
        }
    }

    /// A document whose first non-whitespace character is `{` is treated as JSON.
    pub fn sniff(contents: &str) -> Self {
        if contents.trim_start().starts_with('{') {
            ContentType::Json
        } else {
            ContentType::Yaml
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(ContentType::Yaml),
            "json" => Ok(ContentType::Json),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// A single API specification stored in a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpec {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub contents: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub modified: Option<DateTime<Utc>>,
}

impl ApiSpec {
    /// Create a record with the content type sniffed from the contents.
    pub fn new(id: impl Into<String>, file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        let contents = contents.into();
        Self {
            id: id.into(),
            parent_id: None,
            file_name: file_name.into(),
            content_type: ContentType::sniff(&contents),
            contents,
            modified: None,
        }
    }

    /// Whether the record carries a document at all. Records with blank
    /// contents cannot be exported and are reported as missing.
    pub fn has_contents(&self) -> bool {
        !self.contents.trim().is_empty()
    }
}
