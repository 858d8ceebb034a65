//! SceneDump orchestration
//!
//! Discovers a project's scenes and script sidecars, writes one hierarchy
//! dump per scene, and reports unused scripts.
//!
//! # Example
//!
//! ```rust,no_run
//! use sdump_core::{DumpConfig, Pipeline};
//!
//! let config = DumpConfig::new("MyGame", "out");
//! let summary = Pipeline::new(config).run()?;
//! println!("{summary}");
//! # Ok::<(), sdump_core::DumpError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod summary;

// Re-exports
pub use config::{DumpConfig, ReportMode};
pub use error::{DumpError, SceneError};
pub use logging::init_tracing;
pub use pipeline::Pipeline;
pub use report::{report_record, write_findings, write_report};
pub use summary::{FindingCounts, RunSummary, SceneSummary, TaskFailure};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
