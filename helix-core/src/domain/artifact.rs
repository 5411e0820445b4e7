//! Output artifact types

use serde::{Deserialize, Serialize};

/// One object in an object-store listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub key: String,
    pub size_bytes: u64,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            key: key.into(),
            size_bytes,
        }
    }
}

/// What the aggregator kept for an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArtifactBody {
    /// Full decoded content of a small file
    Inline(String),
    /// Location of a file too large to fetch
    Reference(String),
    /// Why fetching this file failed
    Error(String),
}

/// A single output artifact of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub key: String,
    pub size_bytes: u64,
    pub body: ArtifactBody,
}

impl ArtifactSummary {
    pub fn inline_content(&self) -> Option<&str> {
        match &self.body {
            ArtifactBody::Inline(content) => Some(content),
            _ => None,
        }
    }
}

/// A bucket plus key prefix parsed from an `s3://` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Location {
    pub bucket: String,
    pub prefix: String,
}

impl S3Location {
    /// Parses `s3://bucket/some/prefix/`
    ///
    /// Returns `None` for other schemes or an empty bucket. The prefix keeps any
    /// trailing slash and loses its leading one.
    pub fn parse(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("s3://")?;
        let (bucket, prefix) = match rest.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix.trim_start_matches('/')),
            None => (rest, ""),
        };

        if bucket.is_empty() {
            return None;
        }

        Some(Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }

    /// URI of an object inside this bucket
    pub fn object_uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

impl std::fmt::Display for S3Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.prefix)
    }
}
