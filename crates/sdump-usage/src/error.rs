//! Error types for script usage analysis

use std::path::PathBuf;

/// Errors while loading project metadata
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl UsageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a field-visibility oracle could not answer
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Source file missing or unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        /// Source file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Grammar could not be loaded into the parser
    #[error("grammar load failed: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    /// Parser produced no tree
    #[error("parse aborted for {path}")]
    ParseAborted {
        /// Source file
        path: PathBuf,
    },

    /// Source contains syntax errors
    #[error("syntax error in {path} at line {line}")]
    Syntax {
        /// Source file
        path: PathBuf,
        /// 1-based line of the first error node
        line: usize,
    },
}

impl OracleError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
