//! Whole-document parse
//!
//! One pass over a scene document collecting every record kind, with
//! rejected blocks and end-of-file notices kept alongside.

use crate::error::RecordError;
use crate::hierarchy::{render, Hierarchy, StructuralFault};
use crate::record::{parse, GameObjectRecord, Record, ScriptRecord, TransformRecord};
use crate::segment::{segment_many, tags};

/// Tags with a record variant
pub const RECORD_TAGS: [&str; 3] = [tags::GAME_OBJECT, tags::TRANSFORM, tags::SCRIPT];

/// Records of one scene document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScene {
    /// Game objects in document order
    pub game_objects: Vec<GameObjectRecord>,
    /// Transforms in document order
    pub transforms: Vec<TransformRecord>,
    /// Script components in document order
    pub scripts: Vec<ScriptRecord>,
    /// Blocks that were rejected
    pub rejected: Vec<RecordError>,
    /// Segmenting notices
    pub notices: Vec<StructuralFault>,
}

impl ParsedScene {
    /// Parse a scene document
    #[must_use]
    pub fn parse(document: &str) -> Self {
        let mut scene = Self::default();

        for block in segment_many(document, &RECORD_TAGS) {
            if !block.terminated {
                scene.notices.push(StructuralFault::UnterminatedBlock {
                    file_id: block.file_id.clone(),
                    tag: block.tag.to_string(),
                    header_line: block.header_line,
                });
            }

            match parse(&block) {
                Ok(Record::GameObject(record)) => scene.game_objects.push(record),
                Ok(Record::Transform(record)) => scene.transforms.push(record),
                Ok(Record::Script(record)) => scene.scripts.push(record),
                Err(err) => scene.rejected.push(err),
            }
        }

        scene
    }

    /// Resolve the hierarchy; notices are listed first among the faults
    #[must_use]
    pub fn hierarchy(&self) -> Hierarchy {
        let mut hierarchy = render(&self.game_objects, &self.transforms);
        if !self.notices.is_empty() {
            let mut faults = self.notices.clone();
            faults.append(&mut hierarchy.faults);
            hierarchy.faults = faults;
        }
        hierarchy
    }

    /// Total records kept
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.game_objects.len() + self.transforms.len() + self.scripts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = "%YAML 1.1
--- !u!1 &1
GameObject:
  m_Component:
  - component: {fileID: 10}
  m_Name: Camera
--- !u!4 &10
Transform:
  m_GameObject: {fileID: 1}
  m_Children: []
  m_Father: {fileID: 0}
--- !u!20 &11
Camera:
  m_GameObject: {fileID: 1}
--- !u!114 &12
MonoBehaviour:
  m_GameObject: {fileID: 1}
  m_Script: {fileID: 11500000, guid: 0a1b2c, type: 3}
--- !u!1 &2
GameObject:
  m_Name: Bad
  m_Name: Twice
";

    #[test]
    fn collects_each_kind() {
        let scene = ParsedScene::parse(SCENE);
        assert_eq!(scene.game_objects.len(), 1);
        assert_eq!(scene.transforms.len(), 1);
        assert_eq!(scene.scripts.len(), 1);
        assert_eq!(scene.record_count(), 3);
    }

    #[test]
    fn rejected_block_does_not_stop_document() {
        let scene = ParsedScene::parse(SCENE);
        assert_eq!(scene.rejected.len(), 1);
        assert_eq!(scene.rejected[0].file_id().as_str(), "2");
        assert_eq!(scene.hierarchy().to_dump(), "Camera\n");
    }

    #[test]
    fn trailing_block_is_a_notice() {
        let scene = ParsedScene::parse(SCENE);
        assert_eq!(scene.notices.len(), 1);
        assert!(scene.notices[0].is_notice());
        assert!(scene.hierarchy().faults[0].is_notice());
    }
}
