//! Error types for SceneDump runs
//!
//! [`DumpError`] stops a run. [`SceneError`] fails one scene and is
//! collected into the run summary while sibling scenes continue.

use std::path::PathBuf;

/// Fatal run errors
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// IO error on a path the run cannot do without
    #[error("io error at {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {path}: {source}")]
    Config {
        /// Configuration file
        path: PathBuf,
        /// Parse error
        #[source]
        source: toml::de::Error,
    },

    /// Report rows could not be written
    #[error("report error at {path}: {source}")]
    Report {
        /// Report file
        path: PathBuf,
        /// Writer error
        #[source]
        source: csv::Error,
    },

    /// Worker pool could not be created
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl DumpError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a single scene
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Scene file could not be read
    #[error("io error reading {path}: {source}")]
    Read {
        /// Scene file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Scene file is not UTF-8 text
    #[error("{path} is not valid UTF-8 (first bad byte at offset {offset})")]
    InvalidUtf8 {
        /// Scene file
        path: PathBuf,
        /// Byte offset of the first invalid sequence
        offset: usize,
    },

    /// Dump file could not be written
    #[error("io error writing {path}: {source}")]
    Write {
        /// Dump file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}
