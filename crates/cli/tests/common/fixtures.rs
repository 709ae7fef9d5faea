//! Test workspaces and sample documents

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Project whose stored composite values are deliberately stale
pub const STALE_PROJECT: &str = r#"{
  "type": "project",
  "id": "site",
  "name": "Website",
  "progress": 5,
  "status": "not-started",
  "phases": [
    {
      "id": "design",
      "name": "Design",
      "progress": 0,
      "steps": [
        {
          "id": "wire",
          "name": "Wireframes",
          "tasks": [
            {
              "id": "landing",
              "name": "Landing page",
              "subtasks": [
                { "id": "hero", "name": "Hero", "progress": 100, "status": "completed" },
                { "id": "footer", "name": "Footer", "progress": 0 }
              ]
            }
          ]
        }
      ]
    },
    {
      "id": "build",
      "name": "Build",
      "steps": []
    }
  ]
}"#;

/// Lecture counts in the GATE import shape
pub const GATE_COUNTS: &str = r#"{
  "Algorithms": { "Sorting": 3, "Graphs": 2 },
  "Databases": { "Normalization": 1 }
}"#;

/// Temporary directory holding test documents
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file inside the workspace
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file and return its path as a string for CLI arguments
    pub fn write(&self, name: &str, contents: &str) -> Result<String> {
        let path = self.file(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.file(name);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    pub fn read_json(&self, name: &str) -> Result<Value> {
        Ok(serde_json::from_str(&self.read(name)?)?)
    }
}

/// Find a node by id anywhere in a serialized document
pub fn find_node<'a>(node: &'a Value, id: &str) -> Option<&'a Value> {
    if node.get("id").and_then(Value::as_str) == Some(id) {
        return Some(node);
    }
    ["phases", "steps", "tasks", "subtasks", "subjects", "chapters", "lectures"]
        .iter()
        .filter_map(|field| node.get(*field).and_then(Value::as_array))
        .flatten()
        .find_map(|child| find_node(child, id))
}

/// Progress stored on a node in a serialized document
pub fn progress_of(doc: &Value, id: &str) -> f64 {
    find_node(doc, id)
        .and_then(|node| node.get("progress"))
        .and_then(Value::as_f64)
        .unwrap_or(f64::NAN)
}

/// Status stored on a node in a serialized document
pub fn status_of<'a>(doc: &'a Value, id: &str) -> &'a str {
    find_node(doc, id)
        .and_then(|node| node.get("status"))
        .and_then(Value::as_str)
        .unwrap_or("")
}
