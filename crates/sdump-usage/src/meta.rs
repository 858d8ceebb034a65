//! Metadata sidecars
//!
//! Each project asset has a `<asset>.meta` companion. Only its top-level
//! lines matter here: the `guid:` line and the importer marker.

use crate::error::UsageError;
use sdump_scene::{extract_guid, Guid, Reference, Unresolved};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar file extension
pub const META_EXTENSION: &str = "meta";

/// Importer marker of script assets
pub const SCRIPT_IMPORTER: &str = "MonoImporter:";

const GUID_KEY: &str = "guid:";

/// One sidecar, reduced to what cross-referencing needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaEntry {
    /// Top-level guid
    pub guid: Reference<Guid>,
    /// Path of the sidecar itself
    pub path: PathBuf,
    /// Whether the script importer marker was present
    pub is_script_asset: bool,
}

impl MetaEntry {
    /// Parse sidecar text
    ///
    /// Indented lines are skipped, so guids nested under importer settings
    /// never shadow the asset's own. The first top-level `guid:` line wins.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        let mut guid: Reference<Guid> = Err(Unresolved::Absent);
        let mut is_script_asset = false;

        for line in text.lines() {
            if line.starts_with(char::is_whitespace) {
                continue;
            }
            let line = line.trim_end();
            if line == SCRIPT_IMPORTER {
                is_script_asset = true;
            } else if line.starts_with(GUID_KEY) && guid == Err(Unresolved::Absent) {
                guid = extract_guid(Some(line));
            }
        }

        Self {
            guid,
            path: path.into(),
            is_script_asset,
        }
    }

    /// Read and parse a sidecar from disk
    ///
    /// # Errors
    /// [`UsageError::Io`] when the file cannot be read as text.
    pub fn load(path: &Path) -> Result<Self, UsageError> {
        let text = fs::read_to_string(path).map_err(|e| UsageError::io_error(path, e))?;
        Ok(Self::parse(path, &text))
    }

    /// The asset this sidecar describes: same directory, `.meta` removed
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        match self.path.extension() {
            Some(ext) if ext == META_EXTENSION => self.path.with_extension(""),
            _ => self.path.clone(),
        }
    }
}
