//! Run orchestration
//!
//! Two parallel phases on a dedicated rayon pool:
//!
//! 1. one task per scene: parse, resolve, write the dump, register scripts;
//! 2. after every scene has joined and the registry is frozen, sidecars are
//!    loaded in parallel and cross-referenced.
//!
//! The report is written once both phases are done. A failing scene or
//! sidecar is recorded in the summary and does not stop its siblings.

use crate::config::DumpConfig;
use crate::discovery;
use crate::error::{DumpError, SceneError};
use crate::report::write_report;
use crate::summary::{FindingCounts, RunSummary, SceneSummary, TaskFailure};
use rayon::prelude::*;
use sdump_scene::ParsedScene;
use sdump_usage::{
    cross_reference, CSharpFieldOracle, FieldVisibilityOracle, Finding, FrozenRegistry, MetaEntry,
    ScriptRegistry,
};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A configured run
pub struct Pipeline {
    config: DumpConfig,
    oracle: Box<dyn FieldVisibilityOracle>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Pipeline using the C# field oracle
    #[must_use]
    pub fn new(config: DumpConfig) -> Self {
        Self {
            config,
            oracle: Box::new(CSharpFieldOracle::new()),
        }
    }

    /// Replace the field-visibility oracle
    #[must_use]
    pub fn with_oracle(mut self, oracle: impl FieldVisibilityOracle + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &DumpConfig {
        &self.config
    }

    /// Execute both phases and write the report
    ///
    /// # Errors
    /// Only for failures that affect the whole run: the output directory,
    /// the worker pool, or the report file.
    pub fn run(&self) -> Result<RunSummary, DumpError> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| DumpError::io_error(output_dir, e))?;

        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("sdump-worker-{i}"));
        if let Some(threads) = self.config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        let scenes = discovery::scene_files(&self.config.scenes_path(), &self.config.scene_extension);
        let sidecars = discovery::meta_files(&self.config.scripts_path());

        let (mut summary, findings) = pool.install(|| {
            let registry = ScriptRegistry::new();
            let (scene_summaries, scene_failures) = self.scene_phase(&scenes, &registry);
            let registry = registry.freeze();
            tracing::info!(
                guids = registry.guid_count(),
                usages = registry.usage_count(),
                unresolved = registry.unresolved_count(),
                "script registry frozen"
            );

            let (findings, sidecar_failures) = self.sidecar_phase(&sidecars, &registry);
            let summary = RunSummary {
                scenes: scene_summaries,
                scene_failures,
                sidecars_scanned: sidecars.len(),
                sidecar_failures,
                ..RunSummary::default()
            };
            (summary, findings)
        });

        let report = self.config.report_path();
        write_report(&report, &findings, self.config.report_mode)?;

        summary.findings = FindingCounts::tally(&findings);
        summary.output_dir = output_dir.clone();
        summary.report = report;
        Ok(summary)
    }

    fn scene_phase(
        &self,
        scenes: &[PathBuf],
        registry: &ScriptRegistry,
    ) -> (Vec<SceneSummary>, Vec<TaskFailure>) {
        tracing::info!(scenes = scenes.len(), "scene phase started");

        let outcomes: Vec<Result<SceneSummary, TaskFailure>> = scenes
            .par_iter()
            .map(|scene| {
                self.process_scene(scene, registry).map_err(|err| {
                    tracing::warn!(scene = %scene.display(), error = %err, "scene failed");
                    TaskFailure {
                        path: scene.clone(),
                        message: err.to_string(),
                    }
                })
            })
            .collect();

        let (done, failed) = split(outcomes);
        tracing::info!(done = done.len(), failed = failed.len(), "scene phase finished");
        (done, failed)
    }

    /// Parse one scene, write its dump and register its scripts
    fn process_scene(&self, scene: &Path, registry: &ScriptRegistry) -> Result<SceneSummary, SceneError> {
        let bytes = fs::read(scene).map_err(|source| SceneError::Read {
            path: scene.to_path_buf(),
            source,
        })?;
        let text = std::str::from_utf8(&bytes).map_err(|err| SceneError::InvalidUtf8 {
            path: scene.to_path_buf(),
            offset: err.valid_up_to(),
        })?;

        let parsed = ParsedScene::parse(text);
        for rejected in &parsed.rejected {
            tracing::warn!(
                scene = %scene.display(),
                file_id = %rejected.file_id(),
                error = %rejected,
                "block rejected"
            );
        }

        let scripts = registry.extend(scene, &parsed.scripts);

        let hierarchy = parsed.hierarchy();
        for fault in &hierarchy.faults {
            if fault.is_notice() {
                tracing::debug!(scene = %scene.display(), %fault, "structural notice");
            } else {
                tracing::warn!(scene = %scene.display(), %fault, "structural fault");
            }
        }

        let dump = self.config.dump_path(scene);
        let write_error = |source: std::io::Error| SceneError::Write {
            path: dump.clone(),
            source,
        };
        let file = File::create(&dump).map_err(write_error)?;
        let mut out = BufWriter::new(file);
        hierarchy.write_dump(&mut out).map_err(write_error)?;
        out.flush().map_err(write_error)?;

        tracing::debug!(
            scene = %scene.display(),
            dump = %dump.display(),
            lines = hierarchy.lines.len(),
            "dump written"
        );

        Ok(SceneSummary {
            scene: scene.to_path_buf(),
            lines: hierarchy.lines.len(),
            faults: hierarchy.faults.len(),
            rejected: parsed.rejected.len(),
            scripts,
            dump,
        })
    }

    fn sidecar_phase(
        &self,
        sidecars: &[PathBuf],
        registry: &FrozenRegistry,
    ) -> (Vec<Finding>, Vec<TaskFailure>) {
        tracing::info!(sidecars = sidecars.len(), "cross-reference phase started");

        let loaded: Vec<Result<MetaEntry, TaskFailure>> = sidecars
            .par_iter()
            .map(|path| {
                MetaEntry::load(path).map_err(|err| {
                    tracing::warn!(path = %path.display(), error = %err, "sidecar failed");
                    TaskFailure {
                        path: path.clone(),
                        message: err.to_string(),
                    }
                })
            })
            .collect();

        let (entries, failed) = split(loaded);
        let findings = cross_reference(registry, &entries, self.oracle.as_ref());

        tracing::info!(
            findings = findings.len(),
            failed = failed.len(),
            "cross-reference phase finished"
        );
        (findings, failed)
    }
}

fn split<T>(outcomes: Vec<Result<T, TaskFailure>>) -> (Vec<T>, Vec<TaskFailure>) {
    let mut done = Vec::new();
    let mut failed = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(value) => done.push(value),
            Err(failure) => failed.push(failure),
        }
    }
    (done, failed)
}
