//! GATE lecture-count import and lecture checkboxes

use crate::common::fixtures::{progress_of, status_of, GATE_COUNTS};
use crate::common::TestWorkspace;
use crate::tally;
use anyhow::{Context, Result};
use serde_json::Value;

const FILE: &str = "gate.json";

fn lecture_id(doc: &Value, subject: usize, chapter: usize, lecture: usize) -> Result<String> {
    doc["subjects"][subject]["chapters"][chapter]["lectures"][lecture]["id"]
        .as_str()
        .map(str::to_string)
        .context("lecture id missing")
}

#[test]
fn test_import_gate_builds_plan() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write("counts.json", GATE_COUNTS)?;

    let result = tally!(ws.path(), "import-gate", "counts.json", "--out", FILE, "--name", "GATE 2025")
        .assert_success()?;
    assert!(result.contains_stdout("2 subjects, 3 chapters, 6 lectures"));

    let doc = ws.read_json(FILE)?;
    assert_eq!(doc["type"], "study");
    assert_eq!(doc["name"], "GATE 2025");
    assert_eq!(doc["subjects"][0]["name"], "Algorithms");
    assert_eq!(doc["subjects"][0]["chapters"][1]["name"], "Graphs");
    let sorting = &doc["subjects"][0]["chapters"][0];
    assert_eq!(sorting["lectures"].as_array().map(Vec::len), Some(3));
    assert_eq!(sorting["lectures"][2]["name"], "Lecture 3");
    assert_eq!(sorting["lectures"][0]["completed"], false);
    assert_eq!(sorting["lectures"][0]["timeSpent"], "00:00:00:00");
    assert_eq!(doc["progress"], 0.0);

    tally!(ws.path(), "check", FILE).assert_success()?;
    Ok(())
}

#[test]
fn test_import_gate_refuses_overwrite() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write("counts.json", GATE_COUNTS)?;
    ws.write(FILE, "{}")?;

    let result = tally!(ws.path(), "import-gate", "counts.json", "--out", FILE).assert_failure()?;
    assert!(result.contains_stderr("already exists"));
    assert_eq!(ws.read(FILE)?, "{}");

    tally!(ws.path(), "import-gate", "counts.json", "--out", FILE, "--force").assert_success()?;
    assert_eq!(ws.read_json(FILE)?["type"], "study");
    Ok(())
}

#[test]
fn test_lecture_checkboxes_roll_up() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write("counts.json", GATE_COUNTS)?;
    tally!(ws.path(), "import-gate", "counts.json", "--out", FILE).assert_success()?;

    let doc = ws.read_json(FILE)?;
    let normalization = lecture_id(&doc, 1, 0, 0)?;
    let databases = doc["subjects"][1]["id"].as_str().context("subject id")?.to_string();
    let root = doc["id"].as_str().context("root id")?.to_string();

    tally!(ws.path(), "set", FILE, normalization.as_str(), "--done").assert_success()?;
    let doc = ws.read_json(FILE)?;
    assert_eq!(doc["subjects"][1]["chapters"][0]["lectures"][0]["completed"], true);
    assert_eq!(progress_of(&doc, &normalization), 100.0);
    assert_eq!(status_of(&doc, &databases), "completed");
    assert_eq!(progress_of(&doc, &root), 50.0);
    assert_eq!(status_of(&doc, &root), "in-progress");

    tally!(ws.path(), "set", FILE, normalization.as_str(), "--undone").assert_success()?;
    let doc = ws.read_json(FILE)?;
    assert_eq!(progress_of(&doc, &databases), 0.0);
    assert_eq!(status_of(&doc, &root), "not-started");

    // A lecture is a checkbox and refuses in-progress
    tally!(ws.path(), "set", FILE, normalization.as_str(), "--done").assert_success()?;
    let saved = ws.read(FILE)?;
    let result = tally!(ws.path(), "set", FILE, normalization.as_str(), "--status", "in-progress")
        .assert_failure()?;
    assert!(result.contains_stderr("checkbox"));
    assert_eq!(ws.read(FILE)?, saved);
    let doc = ws.read_json(FILE)?;
    assert_eq!(progress_of(&doc, &normalization), 100.0);
    assert_eq!(status_of(&doc, &normalization), "completed");
    Ok(())
}

#[test]
fn test_integer_rounding_from_environment() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write("counts.json", GATE_COUNTS)?;
    tally!(ws.path(), "import-gate", "counts.json", "--out", FILE).assert_success()?;

    let doc = ws.read_json(FILE)?;
    let first = lecture_id(&doc, 0, 0, 0)?;
    let sorting = doc["subjects"][0]["chapters"][0]["id"].as_str().context("chapter id")?.to_string();
    let algorithms = doc["subjects"][0]["id"].as_str().context("subject id")?.to_string();

    let mut cmd = tally!(ws.path(), "set", FILE, first.as_str(), "--done");
    cmd.env("TALLY_ROUNDING", "integer").assert_success()?;

    let doc = ws.read_json(FILE)?;
    // 1 of 3 lectures, then mean(33, 0), then mean(17, 0)
    assert_eq!(progress_of(&doc, &sorting), 33.0);
    assert_eq!(progress_of(&doc, &algorithms), 17.0);
    assert_eq!(doc["progress"], 9.0);
    Ok(())
}
