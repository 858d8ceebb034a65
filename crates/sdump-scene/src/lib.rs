//! SceneDump scene parsing
//!
//! Line-oriented parsing of serialized scene documents and reconstruction of
//! their object hierarchy.
//!
//! # Pipeline
//!
//! ```text
//! document ─► Segmenter ─► RawBlock ─► parse ─► Record ─► render ─► Hierarchy
//! ```
//!
//! # Example
//!
//! ```rust
//! use sdump_scene::ParsedScene;
//!
//! let doc = "--- !u!1 &1\nGameObject:\n  m_Name: A\n\
//! --- !u!4 &10\nTransform:\n  m_GameObject: {fileID: 1}\n  m_Children: []\n  m_Father: {fileID: 0}\n";
//!
//! let scene = ParsedScene::parse(doc);
//! assert_eq!(scene.hierarchy().to_dump(), "A\n");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod record;
pub mod scene;
pub mod segment;

// Re-exports
pub use error::RecordError;
pub use hierarchy::{find_cycles, render, Hierarchy, HierarchyLine, StructuralFault, INDENT_MARKER};
pub use ids::{extract_file_id, extract_guid, FileId, Guid, Reference, Unresolved};
pub use record::{parse, GameObjectRecord, Record, ScalarKey, ScriptRecord, TransformRecord};
pub use scene::{ParsedScene, RECORD_TAGS};
pub use segment::{segment, segment_many, tags, RawBlock, Segmenter};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
