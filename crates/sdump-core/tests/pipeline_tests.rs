use pretty_assertions::assert_eq;
use sdump_core::{DumpConfig, Pipeline, ReportMode};
use sdump_usage::{FieldVisibilityOracle, OracleError};
use sdump_test_utils::{
    mono_meta, plain_meta, two_level_scene, ProjectFixture, SceneBuilder, EXPOSED_SCRIPT,
    INERT_SCRIPT,
};
use std::fs;
use std::path::Path;

fn config(project: &ProjectFixture) -> DumpConfig {
    DumpConfig::new(project.path(), project.output_dir()).with_threads(2)
}

/// Project with one used exposed script, one used inert script, one unused
/// script, one used script without source, and a texture sidecar.
fn sample_project() -> ProjectFixture {
    let project = ProjectFixture::new().unwrap();
    project
        .write_script("Spawner.cs", EXPOSED_SCRIPT, &mono_meta("aa01"))
        .unwrap();
    project
        .write_script("Spinner.cs", INERT_SCRIPT, &mono_meta("aa02"))
        .unwrap();
    project
        .write_script("Legacy/Old.cs", EXPOSED_SCRIPT, &mono_meta("aa03"))
        .unwrap();
    project.write_meta_only("Ghost.cs", &mono_meta("aa04")).unwrap();
    project.write_meta_only("Icon.png", &plain_meta("aa05")).unwrap();

    let main = SceneBuilder::new()
        .game_object(1, "World", &[10])
        .transform(10, 1, 0, &[20])
        .game_object(2, "Spawner", &[20, 30])
        .transform(20, 2, 10, &[])
        .script(30, 2, "aa01")
        .build();
    let menu = SceneBuilder::new()
        .game_object(1, "Logo", &[10, 30, 31])
        .transform(10, 1, 0, &[])
        .script(30, 1, "aa02")
        .script(31, 1, "aa04")
        .build();
    project.write_scene("Main.unity", &main).unwrap();
    project.write_scene("Menu.unity", &menu).unwrap();
    project
}

#[test]
fn test_dumps_written_per_scene() {
    let project = sample_project();
    let summary = Pipeline::new(config(&project)).run().unwrap();

    assert_eq!(summary.scenes.len(), 2);
    assert!(summary.is_clean());
    let main = fs::read_to_string(project.output_dir().join("Main.unity.dump")).unwrap();
    let menu = fs::read_to_string(project.output_dir().join("Menu.unity.dump")).unwrap();
    assert_eq!(main, "World\n--Spawner\n");
    assert_eq!(menu, "Logo\n");
}

fn report_rows(path: &Path) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap()
        .records()
        .map(|row| row.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn file_name(path: &str) -> String {
    Path::new(path).file_name().unwrap().to_string_lossy().into_owned()
}

#[test]
fn test_report_categories() {
    let project = sample_project();
    let summary = Pipeline::new(config(&project)).run().unwrap();

    assert_eq!(summary.sidecars_scanned, 5);
    assert_eq!(summary.findings.never_instantiated, 1);
    assert_eq!(summary.findings.no_exposed_state, 1);
    assert_eq!(summary.findings.inconclusive, 1);

    let rows: Vec<(String, String, String)> = report_rows(&summary.report)
        .into_iter()
        .map(|row| (row[0].clone(), file_name(&row[1]), row[2].clone()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("aa03".to_string(), "Old.cs.meta".to_string(), "never_instantiated".to_string()),
            ("aa02".to_string(), "Spinner.cs.meta".to_string(), "no_exposed_state".to_string()),
            ("aa04".to_string(), "Ghost.cs.meta".to_string(), "inconclusive".to_string()),
        ]
    );
}

#[test]
fn test_inconclusive_reason_reaches_report() {
    let project = sample_project();
    let summary = Pipeline::new(config(&project)).run().unwrap();

    let rows = report_rows(&summary.report);
    assert!(rows.iter().all(|row| row.len() == 4));
    let ghost = rows.iter().find(|row| row[2] == "inconclusive").unwrap();
    assert!(ghost[3].contains("Ghost.cs"), "reason was {:?}", ghost[3]);
    assert!(rows
        .iter()
        .filter(|row| row[2] != "inconclusive")
        .all(|row| row[3].is_empty()));
}

/// Says every script is inert
struct NothingExposed;

impl FieldVisibilityOracle for NothingExposed {
    fn has_exposed_field(&self, _source: &Path) -> Result<bool, OracleError> {
        Ok(false)
    }
}

#[test]
fn test_custom_oracle_drives_classification() {
    let project = sample_project();
    let summary = Pipeline::new(config(&project))
        .with_oracle(NothingExposed)
        .run()
        .unwrap();

    // Spawner and Spinner are used; Ghost no longer fails on its missing source
    assert_eq!(summary.findings.never_instantiated, 1);
    assert_eq!(summary.findings.no_exposed_state, 3);
    assert_eq!(summary.findings.inconclusive, 0);
}

#[test]
fn test_deep_cyclic_scene_does_not_stop_siblings() {
    let project = ProjectFixture::new().unwrap();
    project.write_scene("A_Good.unity", &two_level_scene()).unwrap();

    // 60k transforms linked in one ring; no root reaches them
    let depth: u64 = 60_000;
    let mut builder = SceneBuilder::new();
    for i in 0..depth {
        let id = 100_000 + i;
        let next = 100_000 + (i + 1) % depth;
        let father = 100_000 + (i + depth - 1) % depth;
        builder = builder.transform(id, i + 1, father, &[next]);
    }
    project.write_scene("Deep.unity", &builder.build()).unwrap();

    let summary = Pipeline::new(config(&project)).run().unwrap();
    assert!(summary.is_clean());
    assert_eq!(summary.scenes.len(), 2);
    assert_eq!(
        fs::read_to_string(project.output_dir().join("A_Good.unity.dump")).unwrap(),
        "A\n--B\n"
    );
    let deep = &summary.scenes[1];
    assert_eq!(deep.lines, 0);
    assert!(deep.faults >= 1);
}

#[test]
fn test_second_run_is_identical() {
    let project = sample_project();
    let pipeline = Pipeline::new(config(&project));

    let first = pipeline.run().unwrap();
    let dump_before = fs::read(project.output_dir().join("Main.unity.dump")).unwrap();
    let report_before = fs::read(&first.report).unwrap();

    let second = pipeline.run().unwrap();
    assert_eq!(fs::read(project.output_dir().join("Main.unity.dump")).unwrap(), dump_before);
    assert_eq!(fs::read(&second.report).unwrap(), report_before);
}

#[test]
fn test_append_mode_accumulates() {
    let project = sample_project();
    let pipeline = Pipeline::new(config(&project).with_report_mode(ReportMode::Append));

    let summary = pipeline.run().unwrap();
    pipeline.run().unwrap();
    let report = fs::read_to_string(&summary.report).unwrap();
    assert_eq!(report.lines().count(), 6);
}

#[test]
fn test_broken_scene_is_isolated() {
    let project = sample_project();
    project
        .write_scene_bytes("Broken.unity", b"--- !u!1 &1\nGameObject:\n  m_Name: \xff\xfe\n")
        .unwrap();

    let summary = Pipeline::new(config(&project)).run().unwrap();
    assert_eq!(summary.scenes.len(), 2);
    assert_eq!(summary.scene_failures.len(), 1);
    assert!(summary.scene_failures[0].path.ends_with("Broken.unity"));
    assert!(project.output_dir().join("Main.unity.dump").exists());
    assert!(!project.output_dir().join("Broken.unity.dump").exists());
}

#[test]
fn test_cyclic_scene_completes() {
    let project = ProjectFixture::new().unwrap();
    let cyclic = SceneBuilder::new()
        .game_object(1, "A", &[10])
        .transform(10, 1, 0, &[20])
        .game_object(2, "B", &[20])
        .transform(20, 2, 10, &[10])
        .build();
    project.write_scene("Loop.unity", &cyclic).unwrap();

    let summary = Pipeline::new(config(&project)).run().unwrap();
    assert_eq!(summary.scenes[0].lines, 2);
    assert!(summary.scenes[0].faults >= 1);
}

#[test]
fn test_missing_directories_run_empty() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let summary = Pipeline::new(DumpConfig::new(dir.path().join("NoProject"), &out))
        .run()
        .unwrap();

    assert!(summary.scenes.is_empty());
    assert_eq!(summary.sidecars_scanned, 0);
    assert_eq!(fs::read_to_string(out.join("UnusedScripts.csv")).unwrap(), "");
}

#[test]
fn test_non_script_scene_extension_ignored() {
    let project = ProjectFixture::new().unwrap();
    project.write_scene("Main.unity", &two_level_scene()).unwrap();
    project.write_scene("Notes.txt", "not a scene").unwrap();

    let summary = Pipeline::new(config(&project)).run().unwrap();
    assert_eq!(summary.scenes.len(), 1);
    assert_eq!(summary.scenes[0].lines, 2);
}
