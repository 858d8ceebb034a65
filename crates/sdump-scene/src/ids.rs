//! Scoped identifiers and reference extraction
//!
//! Scene documents cross-reference objects by `fileID` (document-scoped) and
//! scripts by `guid` (project-scoped). Both are opaque text: they are never
//! compared numerically.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

static FILE_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)fileID:\s*(-?\d+)").expect("valid fileID pattern"));

static GUID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)guid:\s*([a-f0-9]+)").expect("valid guid pattern"));

/// Document-scoped object identifier
///
/// Only meaningful inside the scene document that declared it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// The `fileID` value marking "no parent"
    pub const ROOT: &'static str = "0";

    /// Create from raw text
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root sentinel `0`
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Project-scoped script identifier (lowercase hex)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    /// Create from raw text, normalized to lowercase
    #[inline]
    #[must_use]
    pub fn new(guid: impl AsRef<str>) -> Self {
        Self(guid.as_ref().to_ascii_lowercase())
    }

    /// Raw identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Guid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Guid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Why a reference could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum Unresolved {
    /// There was no text to extract from (key missing)
    #[error("reference absent")]
    Absent,

    /// Text was present but carried no `fileID:`/`guid:` token
    #[error("no reference pattern in '{text}'")]
    PatternNotFound {
        /// The text that was searched
        text: String,
    },
}

/// Outcome of extracting one reference
pub type Reference<T> = Result<T, Unresolved>;

/// Extract the decimal number following `fileID:` (case-insensitive)
pub fn extract_file_id(text: Option<&str>) -> Reference<FileId> {
    capture(&FILE_ID_PATTERN, text).map(FileId::new)
}

/// Extract the hex token following `guid:` (case-insensitive)
pub fn extract_guid(text: Option<&str>) -> Reference<Guid> {
    capture(&GUID_PATTERN, text).map(Guid::new)
}

fn capture<'t>(pattern: &Regex, text: Option<&'t str>) -> Result<&'t str, Unresolved> {
    let text = text.ok_or(Unresolved::Absent)?;
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Unresolved::PatternNotFound {
            text: text.trim().to_string(),
        })
}
