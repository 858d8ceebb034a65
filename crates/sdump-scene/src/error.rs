//! Error types for scene parsing
//!
//! Block-level errors reject a single block; the rest of the document is
//! still parsed.

use crate::ids::FileId;

/// A block that could not become a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Scalar key seen twice in one block
    #[error("block &{file_id}: duplicate key '{key}' at lines {first_line} and {second_line}")]
    DuplicateKey {
        /// Header fileID of the rejected block
        file_id: FileId,
        /// The repeated key
        key: &'static str,
        /// Line of the first occurrence
        first_line: usize,
        /// Line of the conflicting occurrence
        second_line: usize,
    },

    /// Tag with no record variant
    #[error("block &{file_id}: unsupported tag '{tag}'")]
    UnsupportedTag {
        /// Header fileID of the rejected block
        file_id: FileId,
        /// The tag
        tag: String,
    },
}

impl RecordError {
    /// Header fileID of the rejected block
    #[must_use]
    pub fn file_id(&self) -> &FileId {
        match self {
            Self::DuplicateKey { file_id, .. } | Self::UnsupportedTag { file_id, .. } => file_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_display() {
        let err = RecordError::DuplicateKey {
            file_id: FileId::from("12"),
            key: "m_Father",
            first_line: 4,
            second_line: 9,
        };
        assert_eq!(
            err.to_string(),
            "block &12: duplicate key 'm_Father' at lines 4 and 9"
        );
        assert_eq!(err.file_id().as_str(), "12");
    }
}
