//! SceneDump script usage analysis
//!
//! Collects the scripts instantiated across every scene of a project and
//! reports script assets that are never used, or used without any state
//! the editor could configure.
//!
//! # Flow
//!
//! ```text
//! scenes ─► ScriptRegistry ─freeze─► FrozenRegistry ─┐
//! *.meta ─► MetaEntry ─────────────────────────────────┴─► cross_reference ─► Finding
//! ```

#![warn(missing_docs)]

pub mod crossref;
pub mod error;
pub mod meta;
pub mod oracle;
pub mod registry;

// Re-exports
pub use crossref::{classify, cross_reference, sort_findings, Finding, FindingKind};
pub use error::{OracleError, UsageError};
pub use meta::{MetaEntry, META_EXTENSION, SCRIPT_IMPORTER};
pub use oracle::{CSharpFieldOracle, FieldVisibilityOracle};
pub use registry::{FrozenRegistry, ScriptRegistry, ScriptUsage};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
