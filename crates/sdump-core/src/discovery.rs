//! Project file discovery

use sdump_usage::META_EXTENSION;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scene files directly inside `dir` with the given extension, sorted
///
/// A missing directory yields nothing.
#[must_use]
pub fn scene_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    collect(dir, Some(1), extension)
}

/// Sidecar files anywhere below `dir`, sorted
#[must_use]
pub fn meta_files(dir: &Path) -> Vec<PathBuf> {
    collect(dir, None, META_EXTENSION)
}

fn collect(dir: &Path, max_depth: Option<usize>, extension: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "directory not found, nothing to scan");
        return Vec::new();
    }

    let mut walker = WalkDir::new(dir).min_depth(1);
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scenes_are_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("B.unity"), "").unwrap();
        fs::write(dir.path().join("A.unity"), "").unwrap();
        fs::write(dir.path().join("A.unity.meta"), "").unwrap();
        fs::create_dir(dir.path().join("Sub")).unwrap();
        fs::write(dir.path().join("Sub/C.unity"), "").unwrap();

        let names: Vec<String> = scene_files(dir.path(), "unity")
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.unity", "B.unity"]);
    }

    #[test]
    fn metas_are_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("AI/States")).unwrap();
        fs::write(dir.path().join("Player.cs.meta"), "").unwrap();
        fs::write(dir.path().join("AI/States/Idle.cs.meta"), "").unwrap();
        fs::write(dir.path().join("AI/States/Idle.cs"), "").unwrap();

        assert_eq!(meta_files(dir.path()).len(), 2);
    }

    #[test]
    fn missing_directory_is_empty() {
        assert!(scene_files(Path::new("/nonexistent/Scenes"), "unity").is_empty());
        assert!(meta_files(Path::new("/nonexistent/Scripts")).is_empty());
    }
}
