//! Record parser
//!
//! Turns a [`RawBlock`] into one of the typed records by line-oriented
//! key/value extraction. Scalar keys may appear once per block; list items
//! (`- component: ...`, `- {fileID: ...}`) accumulate in order.

use crate::error::RecordError;
use crate::ids::{extract_file_id, extract_guid, FileId, Guid, Reference};
use crate::segment::{tags, RawBlock};
use serde::Serialize;
use std::collections::HashMap;

const COMPONENT_ITEM: &str = "- component";
const CHILD_ITEM: &str = "- {fileID";

/// A `GameObject` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameObjectRecord {
    /// Header fileID
    pub file_id: FileId,
    /// `m_Name`, if the key was present
    pub name: Option<String>,
    /// `m_Component` entries in order
    pub components: Vec<Reference<FileId>>,
}

/// A `Transform` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformRecord {
    /// Header fileID
    pub file_id: FileId,
    /// Owning game object
    pub game_object: Reference<FileId>,
    /// `m_Children` entries in order
    pub children: Vec<Reference<FileId>>,
    /// Parent transform, `0` for roots
    pub father: Reference<FileId>,
}

impl TransformRecord {
    /// Whether `m_Father` resolved to the root sentinel
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(&self.father, Ok(father) if father.is_root())
    }
}

/// A `MonoBehaviour` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRecord {
    /// Header fileID
    pub file_id: FileId,
    /// fileID embedded in `m_Script`
    pub script_file_id: Reference<FileId>,
    /// Script asset guid embedded in `m_Script`
    pub guid: Reference<Guid>,
    /// Owning game object
    pub game_object: Reference<FileId>,
}

/// Parsed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// Tag `1`
    GameObject(GameObjectRecord),
    /// Tag `4`
    Transform(TransformRecord),
    /// Tag `114`
    Script(ScriptRecord),
}

impl Record {
    /// Header fileID of the underlying block
    #[must_use]
    pub fn file_id(&self) -> &FileId {
        match self {
            Record::GameObject(r) => &r.file_id,
            Record::Transform(r) => &r.file_id,
            Record::Script(r) => &r.file_id,
        }
    }
}

/// Scalar keys recognized by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    /// `m_Name`
    Name,
    /// `m_Father`
    Father,
    /// `m_GameObject`
    GameObject,
    /// `m_Script`
    Script,
}

impl ScalarKey {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "m_Name" => Some(Self::Name),
            "m_Father" => Some(Self::Father),
            "m_GameObject" => Some(Self::GameObject),
            "m_Script" => Some(Self::Script),
            _ => None,
        }
    }

    /// Key as written in the document
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "m_Name",
            Self::Father => "m_Father",
            Self::GameObject => "m_GameObject",
            Self::Script => "m_Script",
        }
    }
}

#[derive(Debug, Default)]
struct BlockFields<'a> {
    scalars: HashMap<ScalarKey, (usize, &'a str)>,
    components: Vec<&'a str>,
    children: Vec<&'a str>,
}

impl<'a> BlockFields<'a> {
    fn collect(block: &RawBlock<'a>) -> Result<Self, RecordError> {
        let mut fields = Self::default();
        let Some(indent) = block
            .lines
            .iter()
            .find(|line| !line.trim().is_empty())
            .map(|line| indentation(line))
        else {
            return Ok(fields);
        };

        for (index, &line) in block.lines.iter().enumerate() {
            if indentation(line) != indent {
                continue;
            }
            let trimmed = line.trim();

            if trimmed.starts_with(COMPONENT_ITEM) {
                fields.components.push(trimmed);
                continue;
            }
            if trimmed.starts_with(CHILD_ITEM) {
                fields.children.push(trimmed);
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let Some(key) = ScalarKey::from_key(key.trim()) else {
                continue;
            };

            let line_number = block.line_number(index);
            if let Some((first, _)) = fields.scalars.get(&key) {
                return Err(RecordError::DuplicateKey {
                    file_id: block.file_id.clone(),
                    key: key.as_str(),
                    first_line: *first,
                    second_line: line_number,
                });
            }
            fields.scalars.insert(key, (line_number, value.trim()));
        }

        Ok(fields)
    }

    fn scalar(&self, key: ScalarKey) -> Option<&'a str> {
        self.scalars.get(&key).map(|(_, value)| *value)
    }

    fn reference(&self, key: ScalarKey) -> Reference<FileId> {
        extract_file_id(self.scalar(key))
    }
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Parse one block into its typed record
///
/// # Errors
/// [`RecordError::DuplicateKey`] when a scalar key repeats, and
/// [`RecordError::UnsupportedTag`] for tags without a record variant.
/// Unresolvable references are not errors; they stay in the record.
pub fn parse(block: &RawBlock<'_>) -> Result<Record, RecordError> {
    let fields = BlockFields::collect(block)?;
    let file_id = block.file_id.clone();

    let record = match block.tag {
        tags::GAME_OBJECT => Record::GameObject(GameObjectRecord {
            file_id,
            name: fields.scalar(ScalarKey::Name).map(str::to_string),
            components: fields
                .components
                .iter()
                .map(|line| extract_file_id(Some(*line)))
                .collect(),
        }),
        tags::TRANSFORM => Record::Transform(TransformRecord {
            file_id,
            game_object: fields.reference(ScalarKey::GameObject),
            children: fields
                .children
                .iter()
                .map(|line| extract_file_id(Some(*line)))
                .collect(),
            father: fields.reference(ScalarKey::Father),
        }),
        tags::SCRIPT => {
            let script = fields.scalar(ScalarKey::Script);
            Record::Script(ScriptRecord {
                file_id,
                script_file_id: extract_file_id(script),
                guid: extract_guid(script),
                game_object: fields.reference(ScalarKey::GameObject),
            })
        }
        other => {
            return Err(RecordError::UnsupportedTag {
                file_id,
                tag: other.to_string(),
            })
        }
    };

    Ok(record)
}
