//! Testing utilities for SceneDump workspace
//!
//! Scene-text builders and on-disk project fixtures.

#![allow(missing_docs)]

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCENES_DIR: &str = "Assets/Scenes";
pub const SCRIPTS_DIR: &str = "Assets/Scripts";

const PREAMBLE: &str = "%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n";

/// Builds scene documents in the editor's text layout
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    body: String,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_object(mut self, file_id: u64, name: &str, components: &[u64]) -> Self {
        let _ = writeln!(self.body, "--- !u!1 &{file_id}");
        self.body.push_str("GameObject:\n  m_ObjectHideFlags: 0\n  serializedVersion: 6\n");
        self.body.push_str("  m_Component:\n");
        for component in components {
            let _ = writeln!(self.body, "  - component: {{fileID: {component}}}");
        }
        let _ = writeln!(self.body, "  m_Layer: 0\n  m_Name: {name}\n  m_IsActive: 1");
        self
    }

    pub fn transform(mut self, file_id: u64, game_object: u64, father: u64, children: &[u64]) -> Self {
        let _ = writeln!(self.body, "--- !u!4 &{file_id}");
        self.body.push_str("Transform:\n  m_ObjectHideFlags: 0\n");
        let _ = writeln!(self.body, "  m_GameObject: {{fileID: {game_object}}}");
        self.body.push_str("  m_LocalRotation: {x: 0, y: 0, z: 0, w: 1}\n");
        self.body.push_str("  m_LocalPosition: {x: 0, y: 0, z: 0}\n");
        if children.is_empty() {
            self.body.push_str("  m_Children: []\n");
        } else {
            self.body.push_str("  m_Children:\n");
            for child in children {
                let _ = writeln!(self.body, "  - {{fileID: {child}}}");
            }
        }
        let _ = writeln!(self.body, "  m_Father: {{fileID: {father}}}");
        self.body.push_str("  m_RootOrder: 0\n");
        self
    }

    pub fn script(mut self, file_id: u64, game_object: u64, guid: &str) -> Self {
        let _ = writeln!(self.body, "--- !u!114 &{file_id}");
        self.body.push_str("MonoBehaviour:\n  m_ObjectHideFlags: 0\n");
        let _ = writeln!(self.body, "  m_GameObject: {{fileID: {game_object}}}");
        self.body.push_str("  m_Enabled: 1\n");
        let _ = writeln!(self.body, "  m_Script: {{fileID: 11500000, guid: {guid}, type: 3}}");
        self.body.push_str("  m_Name: \n  m_EditorClassIdentifier: \n");
        self
    }

    /// Any other block, closing the previous one
    pub fn other(mut self, tag: u32, file_id: u64, class: &str) -> Self {
        let _ = writeln!(self.body, "--- !u!{tag} &{file_id}\n{class}:\n  m_Enabled: 1");
        self
    }

    pub fn raw(mut self, text: &str) -> Self {
        self.body.push_str(text);
        self
    }

    pub fn build(self) -> String {
        format!("{PREAMBLE}{}", self.body)
    }
}

/// Two-level scene: `A` (go 1, transform 10) over `B` (go 2, transform 20)
pub fn two_level_scene() -> String {
    SceneBuilder::new()
        .game_object(1, "A", &[10])
        .transform(10, 1, 0, &[20])
        .game_object(2, "B", &[20])
        .transform(20, 2, 10, &[])
        .build()
}

pub fn mono_meta(guid: &str) -> String {
    format!(
        "fileFormatVersion: 2\nguid: {guid}\nMonoImporter:\n  externalObjects: {{}}\n  serializedVersion: 2\n  defaultReferences: []\n  executionOrder: 0\n  icon: {{instanceID: 0}}\n  userData: \n  assetBundleName: \n  assetBundleVariant: \n"
    )
}

pub fn plain_meta(guid: &str) -> String {
    format!(
        "fileFormatVersion: 2\nguid: {guid}\nDefaultImporter:\n  externalObjects: {{}}\n  userData: \n"
    )
}

pub const EXPOSED_SCRIPT: &str = "using UnityEngine;

public class Spawner : MonoBehaviour
{
    public float interval = 2f;
    private int count;
}
";

pub const SERIALIZED_SCRIPT: &str = "using UnityEngine;

public class Door : MonoBehaviour
{
    [SerializeField] private bool locked;
}
";

pub const INERT_SCRIPT: &str = "using UnityEngine;

public class Spinner : MonoBehaviour
{
    private float speed = 10f;

    void Update()
    {
        transform.Rotate(0, speed * Time.deltaTime, 0);
    }
}
";

/// Temporary project directory with the standard layout
#[derive(Debug)]
pub struct ProjectFixture {
    root: TempDir,
    output: TempDir,
}

impl ProjectFixture {
    pub fn new() -> io::Result<Self> {
        let root = tempfile::tempdir()?;
        fs::create_dir_all(root.path().join(SCENES_DIR))?;
        fs::create_dir_all(root.path().join(SCRIPTS_DIR))?;
        Ok(Self {
            root,
            output: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output.path().join("out")
    }

    pub fn write_scene(&self, file_name: &str, text: &str) -> io::Result<PathBuf> {
        let path = self.root.path().join(SCENES_DIR).join(file_name);
        fs::write(&path, text)?;
        Ok(path)
    }

    pub fn write_scene_bytes(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.root.path().join(SCENES_DIR).join(file_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes `<rel>` and `<rel>.meta` under the scripts directory
    pub fn write_script(&self, rel: &str, source: &str, meta: &str) -> io::Result<PathBuf> {
        let path = self.root.path().join(SCRIPTS_DIR).join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, source)?;
        let meta_path = PathBuf::from(format!("{}.meta", path.display()));
        fs::write(&meta_path, meta)?;
        Ok(meta_path)
    }

    /// Writes only the sidecar
    pub fn write_meta_only(&self, rel: &str, meta: &str) -> io::Result<PathBuf> {
        let meta_path = self.root.path().join(SCRIPTS_DIR).join(format!("{rel}.meta"));
        if let Some(parent) = meta_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&meta_path, meta)?;
        Ok(meta_path)
    }
}
