//! Invalid requests leave documents untouched

use crate::common::fixtures::STALE_PROJECT;
use crate::common::TestWorkspace;
use crate::tally;
use anyhow::Result;

const FILE: &str = "site.json";

/// Workspace holding a repaired copy of the sample project
fn workspace() -> Result<TestWorkspace> {
    let ws = TestWorkspace::new()?;
    ws.write(FILE, STALE_PROJECT)?;
    tally!(ws.path(), "recompute", FILE).assert_success()?;
    Ok(ws)
}

#[test]
fn test_rejected_mutations() -> Result<()> {
    let ws = workspace()?;
    let before = ws.read(FILE)?;

    let result = tally!(ws.path(), "set", FILE, "landing", "--progress", "10").assert_failure()?;
    assert!(result.contains_stderr("derives its progress from children"));

    let result = tally!(ws.path(), "add", FILE, "hero", "Detail").assert_failure()?;
    assert!(result.contains_stderr("cannot have children"));

    let result = tally!(ws.path(), "delete", FILE, "site").assert_failure()?;
    assert!(result.contains_stderr("cannot be deleted"));

    let result = tally!(ws.path(), "rename", FILE, "ghost", "Boo").assert_failure()?;
    assert!(result.contains_stderr("ghost"));

    let result = tally!(ws.path(), "rename", FILE, "design", "   ").assert_failure()?;
    assert!(result.contains_stderr("Invalid name"));

    let result = tally!(ws.path(), "set", FILE, "hero").assert_failure()?;
    assert!(result.contains_stderr("Nothing to update"));

    tally!(ws.path(), "set", FILE, "hero", "--done", "--undone").assert_failure()?;
    tally!(ws.path(), "set", FILE, "hero", "--status", "paused").assert_failure()?;

    assert_eq!(ws.read(FILE)?, before);
    Ok(())
}

#[test]
fn test_bad_documents() -> Result<()> {
    let ws = TestWorkspace::new()?;

    ws.write("broken.json", "{\"type\": \"project\", ")?;
    let result = tally!(ws.path(), "show", "broken.json").assert_failure()?;
    assert!(result.contains_stderr("broken.json"));

    ws.write(
        "dupes.json",
        r#"{"type": "study", "id": "x", "name": "Plan", "subjects": [{"id": "x", "name": "Again"}]}"#,
    )?;
    let result = tally!(ws.path(), "check", "dupes.json").assert_failure()?;
    assert!(result.contains_stderr("Duplicate node id"));

    let result = tally!(ws.path(), "show", "missing.json").assert_failure()?;
    assert!(result.contains_stderr("Failed to read"));
    Ok(())
}

#[test]
fn test_init_refuses_existing_file() -> Result<()> {
    let ws = workspace()?;
    let before = ws.read(FILE)?;

    let result = tally!(ws.path(), "init", FILE, "--name", "Other").assert_failure()?;
    assert!(result.contains_stderr("already exists"));
    assert_eq!(ws.read(FILE)?, before);

    tally!(ws.path(), "init", FILE, "--name", "Other", "--study", "--force").assert_success()?;
    assert_eq!(ws.read_json(FILE)?["type"], "study");
    Ok(())
}

#[test]
fn test_invalid_settings_rejected() -> Result<()> {
    let ws = workspace()?;

    let result = tally!(ws.path(), "show", FILE, "--config", "nope.toml").assert_failure()?;
    assert!(result.contains_stderr("nope.toml"));

    ws.write("bad.toml", "nominal_in_progress = 0\n")?;
    let result = tally!(ws.path(), "show", FILE, "--config", "bad.toml").assert_failure()?;
    assert!(result.contains_stderr("nominal_in_progress"));
    Ok(())
}
