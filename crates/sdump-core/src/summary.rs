//! Run summary

use sdump_usage::{Finding, FindingKind};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Outcome of one processed scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    /// Scene file
    pub scene: PathBuf,
    /// Dump written for it
    pub dump: PathBuf,
    /// Printed hierarchy lines
    pub lines: usize,
    /// Structural faults, notices included
    pub faults: usize,
    /// Rejected blocks
    pub rejected: usize,
    /// Script components registered
    pub scripts: usize,
}

/// A scene or sidecar that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    /// File that failed
    pub path: PathBuf,
    /// Error text
    pub message: String,
}

/// Findings per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FindingCounts {
    /// Never instantiated in any scene
    pub never_instantiated: usize,
    /// Instantiated without exposed state
    pub no_exposed_state: usize,
    /// Undecided
    pub inconclusive: usize,
}

impl FindingCounts {
    /// Count findings by category
    #[must_use]
    pub fn tally(findings: &[Finding]) -> Self {
        findings.iter().fold(Self::default(), |mut counts, finding| {
            match finding.kind {
                FindingKind::NeverInstantiated => counts.never_instantiated += 1,
                FindingKind::NoExposedState => counts.no_exposed_state += 1,
                FindingKind::Inconclusive { .. } => counts.inconclusive += 1,
            }
            counts
        })
    }

    /// All findings
    #[must_use]
    pub fn total(&self) -> usize {
        self.never_instantiated + self.no_exposed_state + self.inconclusive
    }
}

/// Everything a run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Scenes dumped, in path order
    pub scenes: Vec<SceneSummary>,
    /// Scenes that failed
    pub scene_failures: Vec<TaskFailure>,
    /// Sidecars found
    pub sidecars_scanned: usize,
    /// Sidecars that could not be read
    pub sidecar_failures: Vec<TaskFailure>,
    /// Findings per category
    pub findings: FindingCounts,
    /// Output directory
    pub output_dir: PathBuf,
    /// Report file
    pub report: PathBuf,
}

impl RunSummary {
    /// Whether no task failed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.scene_failures.is_empty() && self.sidecar_failures.is_empty()
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "SceneDump Run Summary")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(f, "Scenes processed: {}", self.scenes.len())?;
        for scene in &self.scenes {
            writeln!(
                f,
                "  {} -> {} ({} lines, {} faults, {} rejected blocks)",
                scene.scene.display(),
                scene.dump.display(),
                scene.lines,
                scene.faults,
                scene.rejected
            )?;
        }
        writeln!(f, "Scene failures: {}", self.scene_failures.len())?;
        for failure in &self.scene_failures {
            writeln!(f, "  {}: {}", failure.path.display(), failure.message)?;
        }
        writeln!(f)?;
        writeln!(f, "Sidecars scanned: {}", self.sidecars_scanned)?;
        writeln!(f, "Sidecar failures: {}", self.sidecar_failures.len())?;
        for failure in &self.sidecar_failures {
            writeln!(f, "  {}: {}", failure.path.display(), failure.message)?;
        }
        writeln!(f)?;
        writeln!(f, "Findings: {}", self.findings.total())?;
        writeln!(f, "  never_instantiated: {}", self.findings.never_instantiated)?;
        writeln!(f, "  no_exposed_state: {}", self.findings.no_exposed_state)?;
        writeln!(f, "  inconclusive: {}", self.findings.inconclusive)?;
        writeln!(f, "Report: {}", self.report.display())
    }
}
