use std::process::Command;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_merge-sight"))
}

/// A small python script with enough structure to clear the extraction
/// thresholds used in these tests.
fn python_script(marker: &str) -> String {
    let mut s = String::from(
        "import logging\n\ndef handler(x):\n    if x:\n        logging.info('handled')\n",
    );
    for i in 0..6 {
        s.push_str(&format!("{marker}_{i} = {i}\n"));
    }
    s
}

#[test]
fn doctor_returns_json() {
    let output = cargo_bin()
        .args(["doctor", "--config", "/nonexistent/merge-sight-test.toml"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid JSON");
    assert_eq!(json["version"], PKG_VERSION);
    assert_eq!(json["languages"].as_array().unwrap().len(), 6);

    // All grammars should be available
    for lang in json["languages"].as_array().unwrap() {
        assert!(
            lang["available"].as_bool().unwrap(),
            "Language {:?} not available",
            lang["language"]
        );
    }

    // Defaults apply when the config file does not exist
    assert_eq!(json["thresholds"]["min_script_lines"], 100);
    assert_eq!(json["thresholds"]["similarity_threshold"], 0.75);
    assert_eq!(json["thresholds"]["top_n"], 10);
}

#[test]
fn analyze_groups_identical_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let body = python_script("value");
    std::fs::write(dir.path().join("first.py"), &body).unwrap();
    std::fs::write(dir.path().join("second.py"), &body).unwrap();

    let output = cargo_bin()
        .args([
            "analyze",
            "--dir",
            dir.path().to_str().unwrap(),
            "--min-lines",
            "3",
            "--complexity",
            "0.5",
        ])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid JSON");
    assert_eq!(json["statistics"]["files_discovered"], 2);
    assert_eq!(json["statistics"]["files_analyzed"], 2);
    assert_eq!(json["total_groups"], 1);

    let group = &json["groups"][0];
    assert_eq!(group["rank"], 1);
    assert_eq!(group["members"].as_array().unwrap().len(), 2);
    assert_eq!(group["aggregate_similarity"], 1.0);
    assert_eq!(group["potential"], "HIGH");
    assert_eq!(group["recommended_action"], "IMMEDIATE_CONSOLIDATION");
}

#[test]
fn analyze_disjoint_corpus_has_no_groups() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("one.py"), python_script("alpha")).unwrap();
    std::fs::write(
        dir.path().join("two.rs"),
        "use std::fs;\n\nfn main() {\n    for entry in fs::read_dir(\".\").unwrap() {\n        let _ = entry;\n    }\n}\n",
    )
    .unwrap();

    let output = cargo_bin()
        .args([
            "analyze",
            "--dir",
            dir.path().to_str().unwrap(),
            "--min-lines",
            "3",
            "--threshold",
            "0.95",
        ])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid JSON");
    assert_eq!(json["statistics"]["files_analyzed"], 2);
    assert_eq!(json["total_groups"], 0);
    assert!(json["groups"].as_array().unwrap().is_empty());
}

#[test]
fn analyze_glob_filters_files() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("keep.py"), python_script("a")).unwrap();
    std::fs::write(dir.path().join("skip.sh"), "#!/bin/bash\necho hi\necho bye\n").unwrap();

    let output = cargo_bin()
        .args([
            "analyze",
            "--dir",
            dir.path().to_str().unwrap(),
            "--glob",
            "*.py",
            "--min-lines",
            "3",
        ])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid JSON");
    assert_eq!(json["statistics"]["files_discovered"], 1);
}

#[test]
fn analyze_missing_dir_is_json_error() {
    let output = cargo_bin()
        .args(["analyze", "--dir", "/definitely/not/a/dir"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());

    // Error should be JSON on stdout
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("error should be JSON");
    assert_eq!(json["error"]["code"], "FILE_NOT_FOUND");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("/definitely/not/a/dir")
    );
}

#[test]
fn inspect_returns_record() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("script.py");
    std::fs::write(&path, python_script("v")).unwrap();

    let output = cargo_bin()
        .args([
            "inspect",
            "--path",
            path.to_str().unwrap(),
            "--min-lines",
            "3",
        ])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid JSON");
    assert_eq!(json["name"], "script.py");
    assert_eq!(json["language"], "python");
    assert!(json["line_count"].as_u64().unwrap() >= 3);
    assert_eq!(json["declarations"]["functions"], 1);
    assert_eq!(json["content_fingerprint"].as_str().unwrap().len(), 64);
    assert!(
        json["feature_tags"]
            .as_array()
            .unwrap()
            .iter()
            .any(|t| t == "logging")
    );
}

#[test]
fn inspect_file_not_found() {
    let output = cargo_bin()
        .args(["inspect", "--path", "nonexistent.py"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("error should be JSON");
    assert_eq!(json["error"]["code"], "FILE_NOT_FOUND");
}

#[test]
fn inspect_batch_ndjson() {
    let dir = tempfile::TempDir::new().unwrap();
    let good = dir.path().join("good.py");
    std::fs::write(&good, python_script("v")).unwrap();

    let paths = format!("{},{}", good.to_str().unwrap(), "missing.py");
    let output = cargo_bin()
        .args(["inspect", "--paths", &paths, "--min-lines", "3"])
        .output()
        .expect("failed to run");
    // Batch mode reports per-line results; the run itself succeeds
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.trim().lines().collect();
    assert_eq!(lines.len(), 2, "Should have 2 NDJSON lines");

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["name"], "good.py");

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["error"]["code"], "FILE_NOT_FOUND");
}

#[test]
fn inspect_paths_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let script = dir.path().join("one.py");
    std::fs::write(&script, python_script("v")).unwrap();

    let list = dir.path().join("paths.txt");
    std::fs::write(&list, format!("{}\n", script.to_str().unwrap())).unwrap();

    let output = cargo_bin()
        .args([
            "inspect",
            "--paths-file",
            list.to_str().unwrap(),
            "--min-lines",
            "3",
        ])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.trim().lines().collect();
    assert_eq!(lines.len(), 1);

    let json: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(json["name"], "one.py");
}

#[test]
fn inspect_requires_a_path_argument() {
    let output = cargo_bin().arg("inspect").output().expect("failed to run");
    assert!(!output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("error should be JSON");
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
}

#[test]
fn init_writes_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    let output = cargo_bin()
        .args(["init", "--path", config_path.to_str().unwrap()])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    assert!(config_path.exists());

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("similarity_threshold = 0.75"));
}

#[test]
fn pretty_flag_indents_output() {
    let output = cargo_bin()
        .args([
            "doctor",
            "--pretty",
            "--config",
            "/nonexistent/merge-sight-test.toml",
        ])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\n  "), "Pretty output should be indented");
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    assert_eq!(json["version"], PKG_VERSION);
}
