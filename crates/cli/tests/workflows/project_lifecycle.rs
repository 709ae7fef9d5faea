//! Build a project from scratch and drive it to completion

use crate::common::fixtures::{progress_of, status_of};
use crate::common::TestWorkspace;
use crate::tally;
use anyhow::{Context, Result};

const FILE: &str = "site.json";

/// Add a child and return the id the CLI printed
fn add(ws: &TestWorkspace, parent: &str, name: &str) -> Result<String> {
    tally!(ws.path(), "add", FILE, parent, name)
        .assert_success()?
        .parse_node_id()
        .context("add did not print an id")
}

#[test]
fn test_init_add_set_delete_rename() -> Result<()> {
    let ws = TestWorkspace::new()?;

    let result = tally!(ws.path(), "init", FILE, "--name", "Website").assert_success()?;
    assert!(result.contains_stdout("Website"));
    let root = result.parse_node_id().context("init did not print the root id")?;

    let doc = ws.read_json(FILE)?;
    assert_eq!(doc["type"], "project");
    assert_eq!(doc["id"], root.as_str());
    assert_eq!(doc["status"], "not-started");

    let phase = add(&ws, &root, "Design")?;
    let step = add(&ws, &phase, "Wireframes")?;
    let task = add(&ws, &step, "Landing page")?;
    let hero = add(&ws, &task, "Hero")?;

    tally!(ws.path(), "set", FILE, hero.as_str(), "--progress", "40").assert_success()?;
    let doc = ws.read_json(FILE)?;
    assert_eq!(progress_of(&doc, &hero), 40.0);
    assert_eq!(status_of(&doc, &hero), "in-progress");
    assert_eq!(progress_of(&doc, &root), 40.0);
    assert_eq!(status_of(&doc, &root), "in-progress");

    tally!(ws.path(), "set", FILE, hero.as_str(), "--status", "completed").assert_success()?;
    let doc = ws.read_json(FILE)?;
    assert_eq!(progress_of(&doc, &hero), 100.0);
    assert_eq!(status_of(&doc, &phase), "completed");
    assert_eq!(status_of(&doc, &root), "completed");

    let footer = add(&ws, &task, "Footer")?;
    let doc = ws.read_json(FILE)?;
    assert_eq!(progress_of(&doc, &footer), 0.0);
    assert_eq!(progress_of(&doc, &task), 50.0);
    assert_eq!(progress_of(&doc, &root), 50.0);

    tally!(ws.path(), "delete", FILE, footer.as_str()).assert_success()?;
    let doc = ws.read_json(FILE)?;
    assert_eq!(progress_of(&doc, &task), 100.0);
    assert_eq!(status_of(&doc, &root), "completed");

    tally!(ws.path(), "rename", FILE, step.as_str(), "Mockups").assert_success()?;
    let doc = ws.read_json(FILE)?;
    assert_eq!(doc["phases"][0]["steps"][0]["name"], "Mockups");

    Ok(())
}

#[test]
fn test_status_without_progress_gets_nominal_value() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let root = tally!(ws.path(), "init", FILE, "--name", "Garden")
        .assert_success()?
        .parse_node_id()
        .context("missing root id")?;
    let phase = add(&ws, &root, "Beds")?;
    let step = add(&ws, &phase, "Soil")?;
    let task = add(&ws, &step, "Compost")?;
    let leaf = add(&ws, &task, "Turn pile")?;

    tally!(ws.path(), "set", FILE, leaf.as_str(), "--status", "in-progress").assert_success()?;

    let doc = ws.read_json(FILE)?;
    assert_eq!(progress_of(&doc, &leaf), 10.0);
    for id in [&task, &step, &phase, &root] {
        assert_eq!(status_of(&doc, id), "in-progress", "{}", id);
    }
    Ok(())
}

#[test]
fn test_settings_file_changes_nominal_value() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write("tally.toml", "nominal_in_progress = 25\n")?;
    let root = tally!(ws.path(), "init", FILE, "--name", "Garden")
        .assert_success()?
        .parse_node_id()
        .context("missing root id")?;
    let phase = add(&ws, &root, "Beds")?;
    let step = add(&ws, &phase, "Soil")?;
    let task = add(&ws, &step, "Compost")?;
    let leaf = add(&ws, &task, "Turn pile")?;

    tally!(ws.path(), "set", FILE, leaf.as_str(), "--status", "doing").assert_success()?;

    let doc = ws.read_json(FILE)?;
    assert_eq!(progress_of(&doc, &leaf), 25.0);
    assert_eq!(progress_of(&doc, &root), 25.0);
    Ok(())
}

#[test]
fn test_show_prints_tree() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let root = tally!(ws.path(), "init", FILE, "--name", "Website")
        .assert_success()?
        .parse_node_id()
        .context("missing root id")?;
    let phase = add(&ws, &root, "Design")?;
    add(&ws, &phase, "Wireframes")?;

    let result = tally!(ws.path(), "show", FILE, "--ids").assert_success()?;
    assert!(result.contains_stdout("Website"));
    assert!(result.contains_stdout("Design"));
    assert!(result.contains_stdout("Wireframes"));
    assert!(result.contains_stdout(&phase));
    assert!(result.contains_stdout("0 leaves"));

    let shallow = tally!(ws.path(), "show", FILE, "--depth", "1").assert_success()?;
    assert!(shallow.contains_stdout("Design"));
    assert!(!shallow.contains_stdout("Wireframes"));

    let json = tally!(ws.path(), "show", FILE, "--json").assert_success()?;
    let parsed: serde_json::Value = serde_json::from_str(&json.stdout)?;
    assert_eq!(parsed["phases"][0]["name"], "Design");
    Ok(())
}
