//! Run configuration
//!
//! [`DumpConfig`] can be loaded from TOML; every key is optional. The CLI
//! overrides individual values through the `with_*` builders.

use crate::error::DumpError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// How the report file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Rewrite on every run
    #[default]
    Truncate,
    /// Keep earlier runs' lines
    Append,
}

/// Configuration of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Project root
    pub project_dir: PathBuf,
    /// Where dumps and the report are written
    pub output_dir: PathBuf,
    /// Scene directory, relative to the project
    pub scenes_dir: PathBuf,
    /// Script directory, relative to the project
    pub scripts_dir: PathBuf,
    /// Scene file extension, without the dot
    pub scene_extension: String,
    /// Suffix appended to scene file names for dumps
    pub dump_extension: String,
    /// Report file name inside `output_dir`
    pub report_file_name: String,
    /// Report open mode
    pub report_mode: ReportMode,
    /// Worker threads; rayon decides when unset
    pub threads: Option<usize>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            scenes_dir: PathBuf::from("Assets/Scenes"),
            scripts_dir: PathBuf::from("Assets/Scripts"),
            scene_extension: "unity".to_string(),
            dump_extension: "dump".to_string(),
            report_file_name: "UnusedScripts.csv".to_string(),
            report_mode: ReportMode::Truncate,
            threads: None,
        }
    }
}

impl DumpConfig {
    /// Defaults for a project and output directory
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self::default()
            .with_project_dir(project_dir)
            .with_output_dir(output_dir)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// [`DumpError::Io`] if unreadable, [`DumpError::Config`] if malformed.
    pub fn load(path: &Path) -> Result<Self, DumpError> {
        let text = fs::read_to_string(path).map_err(|e| DumpError::io_error(path, e))?;
        toml::from_str(&text).map_err(|source| DumpError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// With project directory
    #[inline]
    #[must_use]
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// With output directory
    #[inline]
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// With report mode
    #[inline]
    #[must_use]
    pub fn with_report_mode(mut self, mode: ReportMode) -> Self {
        self.report_mode = mode;
        self
    }

    /// With worker thread count
    #[inline]
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Absolute-or-relative scene directory
    #[must_use]
    pub fn scenes_path(&self) -> PathBuf {
        self.project_dir.join(&self.scenes_dir)
    }

    /// Absolute-or-relative script directory
    #[must_use]
    pub fn scripts_path(&self) -> PathBuf {
        self.project_dir.join(&self.scripts_dir)
    }

    /// Report file location
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file_name)
    }

    /// Dump location for a scene: `<file name>.<dump_extension>`
    #[must_use]
    pub fn dump_path(&self, scene: &Path) -> PathBuf {
        let mut name = scene.file_name().map(OsString::from).unwrap_or_default();
        name.push(".");
        name.push(&self.dump_extension);
        self.output_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = DumpConfig::new("/proj", "/out");
        assert_eq!(config.scenes_path(), PathBuf::from("/proj/Assets/Scenes"));
        assert_eq!(config.scripts_path(), PathBuf::from("/proj/Assets/Scripts"));
        assert_eq!(config.report_path(), PathBuf::from("/out/UnusedScripts.csv"));
        assert_eq!(config.report_mode, ReportMode::Truncate);
        assert_eq!(config.threads, None);
    }

    #[test]
    fn dump_keeps_scene_extension() {
        let config = DumpConfig::new("/proj", "/out");
        assert_eq!(
            config.dump_path(Path::new("/proj/Assets/Scenes/Main.unity")),
            PathBuf::from("/out/Main.unity.dump")
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "report_mode = \"append\"\nthreads = 2\nscenes_dir = \"Levels\"").unwrap();

        let config = DumpConfig::load(file.path()).unwrap();
        assert_eq!(config.report_mode, ReportMode::Append);
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.scenes_dir, PathBuf::from("Levels"));
        assert_eq!(config.scripts_dir, PathBuf::from("Assets/Scripts"));
    }

    #[test]
    fn malformed_toml_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "report_mode = \"sometimes\"").unwrap();

        let err = DumpConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, DumpError::Config { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn builders_override() {
        let config = DumpConfig::default()
            .with_report_mode(ReportMode::Append)
            .with_threads(4);
        assert_eq!(config.report_mode, ReportMode::Append);
        assert_eq!(config.threads, Some(4));
    }
}
