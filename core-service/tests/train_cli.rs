//! Runs the compiled trainer binary against bad dataset directories.

use std::process::Command;

use tempfile::tempdir;

fn run_trainer(dataset: &std::path::Path, model: &std::path::Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fallwatch-train"))
        .env("DATASET_DIR", dataset)
        .env("MODEL_PATH", model)
        .env("TRAIN_TREES", "5")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run trainer")
}

#[test]
fn test_no_matching_subfolders_exits_non_zero() {
    let root = tempdir().unwrap();
    let dataset = root.path().join("dataset");
    std::fs::create_dir_all(dataset.join("cycling")).unwrap();
    std::fs::write(dataset.join("cycling").join("a.csv"), "x,y,z\n1,2,3\n").unwrap();
    let model = root.path().join("models").join("model.json");

    let output = run_trainer(&dataset, &model);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No usable data"));
    assert!(!model.exists());
}

#[test]
fn test_no_parsable_csv_exits_non_zero() {
    let root = tempdir().unwrap();
    let dataset = root.path().join("dataset");
    std::fs::create_dir_all(dataset.join("walkfall")).unwrap();
    std::fs::write(dataset.join("walkfall").join("a.csv"), "temp,humidity\n20,40\n").unwrap();
    let model = root.path().join("model.json");

    let output = run_trainer(&dataset, &model);

    assert_eq!(output.status.code(), Some(1));
    assert!(!model.exists());
}

#[test]
fn test_missing_dataset_dir_exits_non_zero() {
    let root = tempdir().unwrap();
    let model = root.path().join("model.json");

    let output = run_trainer(&root.path().join("nope"), &model);

    assert_eq!(output.status.code(), Some(1));
    assert!(!model.exists());
}
