//! Project-wide script registry
//!
//! Scene tasks insert concurrently into [`ScriptRegistry`]. Once every scene
//! is parsed the registry is frozen into a [`FrozenRegistry`], which only
//! answers queries.

use dashmap::DashMap;
use sdump_scene::{Guid, ScriptRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A script component together with the scene it was found in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptUsage {
    /// Scene document path
    pub scene: PathBuf,
    /// The component record
    pub record: ScriptRecord,
}

/// Insert-only registry filled during the scene phase
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    by_guid: DashMap<Guid, Vec<ScriptUsage>>,
    unresolved: AtomicUsize,
}

impl ScriptRegistry {
    /// Create empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one script component; returns `false` if its guid is unresolved
    pub fn record(&self, scene: &Path, script: &ScriptRecord) -> bool {
        match &script.guid {
            Ok(guid) => {
                self.by_guid.entry(guid.clone()).or_default().push(ScriptUsage {
                    scene: scene.to_path_buf(),
                    record: script.clone(),
                });
                true
            }
            Err(unresolved) => {
                tracing::warn!(
                    scene = %scene.display(),
                    file_id = %script.file_id,
                    %unresolved,
                    "script component without guid, not registered"
                );
                self.unresolved.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Record every script of one scene; returns how many were registered
    pub fn extend<'r>(&self, scene: &Path, scripts: impl IntoIterator<Item = &'r ScriptRecord>) -> usize {
        scripts
            .into_iter()
            .filter(|script| self.record(scene, script))
            .count()
    }

    /// Stop accepting inserts
    #[must_use]
    pub fn freeze(self) -> FrozenRegistry {
        let mut by_guid: HashMap<Guid, Vec<ScriptUsage>> = self.by_guid.into_iter().collect();
        for usages in by_guid.values_mut() {
            usages.sort_by(|a, b| {
                a.scene
                    .cmp(&b.scene)
                    .then_with(|| a.record.file_id.cmp(&b.record.file_id))
            });
        }
        FrozenRegistry {
            by_guid,
            unresolved: self.unresolved.into_inner(),
        }
    }
}

/// Read-only view of every script instantiated in the project
#[derive(Debug, Clone, Default)]
pub struct FrozenRegistry {
    by_guid: HashMap<Guid, Vec<ScriptUsage>>,
    unresolved: usize,
}

impl FrozenRegistry {
    /// Whether any scene instantiates the script
    #[inline]
    #[must_use]
    pub fn contains(&self, guid: &Guid) -> bool {
        self.by_guid.contains_key(guid)
    }

    /// Instantiations of one script, ordered by scene then fileID
    #[must_use]
    pub fn usages(&self, guid: &Guid) -> &[ScriptUsage] {
        self.by_guid.get(guid).map_or(&[][..], Vec::as_slice)
    }

    /// Distinct guids
    #[must_use]
    pub fn guid_count(&self) -> usize {
        self.by_guid.len()
    }

    /// All registered instantiations
    #[must_use]
    pub fn usage_count(&self) -> usize {
        self.by_guid.values().map(Vec::len).sum()
    }

    /// Components skipped for lack of a guid
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }
}
