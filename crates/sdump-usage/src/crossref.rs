//! Script usage cross-referencer
//!
//! Classifies every script asset in the project against the frozen registry
//! of instantiated scripts. Sidecars of other asset kinds are ignored.

use crate::meta::MetaEntry;
use crate::oracle::FieldVisibilityOracle;
use crate::registry::FrozenRegistry;
use rayon::prelude::*;
use sdump_scene::Guid;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Why a script asset is reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum FindingKind {
    /// No scene instantiates the script
    NeverInstantiated,
    /// Instantiated, but declares no exposed field
    NoExposedState,
    /// Could not be decided
    Inconclusive {
        /// What went wrong
        reason: String,
    },
}

impl FindingKind {
    /// Report category label
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NeverInstantiated => "never_instantiated",
            Self::NoExposedState => "no_exposed_state",
            Self::Inconclusive { .. } => "inconclusive",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::NeverInstantiated => 0,
            Self::NoExposedState => 1,
            Self::Inconclusive { .. } => 2,
        }
    }
}

impl Display for FindingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// One reported script asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Script guid, `None` when the sidecar had none
    pub guid: Option<Guid>,
    /// Sidecar path
    pub meta_path: PathBuf,
    /// Classification
    pub kind: FindingKind,
}

/// Classify one sidecar; `None` means nothing to report
pub fn classify<O>(registry: &FrozenRegistry, entry: &MetaEntry, oracle: &O) -> Option<Finding>
where
    O: FieldVisibilityOracle + ?Sized,
{
    if !entry.is_script_asset {
        return None;
    }

    let finding = |guid: Option<Guid>, kind: FindingKind| Finding {
        guid,
        meta_path: entry.path.clone(),
        kind,
    };

    let guid = match &entry.guid {
        Ok(guid) => guid.clone(),
        Err(unresolved) => {
            tracing::warn!(path = %entry.path.display(), %unresolved, "script sidecar without guid");
            return Some(finding(
                None,
                FindingKind::Inconclusive {
                    reason: format!("sidecar guid: {unresolved}"),
                },
            ));
        }
    };

    if !registry.contains(&guid) {
        return Some(finding(Some(guid), FindingKind::NeverInstantiated));
    }

    let source = entry.source_path();
    match oracle.has_exposed_field(&source) {
        Ok(true) => None,
        Ok(false) => Some(finding(Some(guid), FindingKind::NoExposedState)),
        Err(err) => {
            tracing::warn!(path = %source.display(), %guid, error = %err, "field visibility undecided");
            Some(finding(
                Some(guid),
                FindingKind::Inconclusive {
                    reason: err.to_string(),
                },
            ))
        }
    }
}

/// Classify every sidecar in parallel
///
/// Findings come back ordered by category, then sidecar path.
pub fn cross_reference<O>(registry: &FrozenRegistry, entries: &[MetaEntry], oracle: &O) -> Vec<Finding>
where
    O: FieldVisibilityOracle + ?Sized,
{
    let mut findings: Vec<Finding> = entries
        .par_iter()
        .filter_map(|entry| classify(registry, entry, oracle))
        .collect();
    sort_findings(&mut findings);

    tracing::info!(
        sidecars = entries.len(),
        findings = findings.len(),
        "cross-reference complete"
    );
    findings
}

/// Order by category, then sidecar path
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        a.kind
            .rank()
            .cmp(&b.kind.rank())
            .then_with(|| a.meta_path.cmp(&b.meta_path))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::oracle::MockFieldVisibilityOracle;
    use crate::registry::ScriptRegistry;
    use sdump_scene::{FileId, ScriptRecord, Unresolved};
    use std::path::Path;

    fn registry_with(guids: &[&str]) -> FrozenRegistry {
        let registry = ScriptRegistry::new();
        for (i, guid) in guids.iter().enumerate() {
            registry.record(
                Path::new("Main.unity"),
                &ScriptRecord {
                    file_id: FileId::new(i.to_string()),
                    script_file_id: Ok(FileId::from("11500000")),
                    guid: Ok(Guid::from(*guid)),
                    game_object: Ok(FileId::from("1")),
                },
            );
        }
        registry.freeze()
    }

    fn entry(guid: &str, path: &str, is_script_asset: bool) -> MetaEntry {
        MetaEntry {
            guid: Ok(Guid::from(guid)),
            path: PathBuf::from(path),
            is_script_asset,
        }
    }

    #[test]
    fn registered_guid_is_never_reported_as_never_instantiated() {
        let registry = registry_with(&["abc123"]);
        let mut oracle = MockFieldVisibilityOracle::new();
        oracle.expect_has_exposed_field().returning(|_| Ok(true));

        let finding = classify(&registry, &entry("abc123", "A.cs.meta", true), &oracle);
        assert_eq!(finding, None);
    }

    #[test]
    fn non_script_sidecar_is_never_flagged() {
        let registry = registry_with(&[]);
        let mut oracle = MockFieldVisibilityOracle::new();
        oracle.expect_has_exposed_field().times(0);

        assert_eq!(classify(&registry, &entry("abc123", "A.png.meta", false), &oracle), None);

        let malformed = MetaEntry {
            guid: Err(Unresolved::PatternNotFound {
                text: "guid: zz".to_string(),
            }),
            path: PathBuf::from("B.png.meta"),
            is_script_asset: false,
        };
        assert_eq!(classify(&registry, &malformed, &oracle), None);
    }

    #[test]
    fn unused_script_is_never_instantiated() {
        let registry = registry_with(&["abc123"]);
        let mut oracle = MockFieldVisibilityOracle::new();
        oracle.expect_has_exposed_field().times(0);

        let finding = classify(&registry, &entry("def456", "B.cs.meta", true), &oracle).unwrap();
        assert_eq!(finding.kind, FindingKind::NeverInstantiated);
        assert_eq!(finding.guid, Some(Guid::from("def456")));
    }

    #[test]
    fn oracle_consulted_with_source_path() {
        let registry = registry_with(&["abc123"]);
        let mut oracle = MockFieldVisibilityOracle::new();
        oracle
            .expect_has_exposed_field()
            .withf(|source| source == Path::new("Scripts/A.cs"))
            .times(1)
            .returning(|_| Ok(false));

        let finding = classify(&registry, &entry("abc123", "Scripts/A.cs.meta", true), &oracle).unwrap();
        assert_eq!(finding.kind, FindingKind::NoExposedState);
    }

    #[test]
    fn oracle_failure_is_inconclusive() {
        let registry = registry_with(&["abc123"]);
        let mut oracle = MockFieldVisibilityOracle::new();
        oracle.expect_has_exposed_field().returning(|source| {
            Err(OracleError::Syntax {
                path: source.to_path_buf(),
                line: 3,
            })
        });

        let finding = classify(&registry, &entry("abc123", "A.cs.meta", true), &oracle).unwrap();
        assert_eq!(finding.kind.category(), "inconclusive");
    }

    #[test]
    fn missing_guid_is_inconclusive() {
        let registry = registry_with(&[]);
        let oracle = MockFieldVisibilityOracle::new();
        let entry = MetaEntry {
            guid: Err(Unresolved::Absent),
            path: PathBuf::from("C.cs.meta"),
            is_script_asset: true,
        };
        let finding = classify(&registry, &entry, &oracle).unwrap();
        assert_eq!(finding.guid, None);
        assert!(matches!(finding.kind, FindingKind::Inconclusive { .. }));
    }

    #[test]
    fn findings_are_sorted_by_category_then_path() {
        let registry = registry_with(&["0001", "0002"]);
        let mut oracle = MockFieldVisibilityOracle::new();
        oracle.expect_has_exposed_field().returning(|_| Ok(false));

        let entries = vec![
            entry("0002", "z/Used.cs.meta", true),
            entry("0009", "b/Unused.cs.meta", true),
            entry("0001", "a/Used.cs.meta", true),
            entry("0008", "a/Unused.cs.meta", true),
        ];
        let findings = cross_reference(&registry, &entries, &oracle);
        let order: Vec<(&str, &str)> = findings
            .iter()
            .map(|f| (f.kind.category(), f.meta_path.to_str().unwrap()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("never_instantiated", "a/Unused.cs.meta"),
                ("never_instantiated", "b/Unused.cs.meta"),
                ("no_exposed_state", "a/Used.cs.meta"),
                ("no_exposed_state", "z/Used.cs.meta"),
            ]
        );
    }
}
