//! Snapshot and catalog files for CLI tests

use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Scratch directory doubling as `STREE_HOME`
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn home(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Write `payload` as JSON and return its path as a string
    pub fn write(&self, name: &str, payload: &Value) -> String {
        let path: PathBuf = self.dir.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(payload).expect("json")).expect("write");
        path.display().to_string()
    }
}

/// Two projects; petclinic has a stereotype with a located bean below it
pub fn petclinic_snapshot() -> Value {
    json!([
        {
            "kind": "project",
            "name": "petclinic",
            "children": [
                {
                    "attributes": {"text": "Controllers", "icon": "fa-stereotype"},
                    "children": [
                        {
                            "kind": "bean",
                            "name": "ownerController",
                            "type": "org.springframework.samples.petclinic.owner.OwnerController",
                            "location": {
                                "uri": "file:///src/OwnerController.java",
                                "range": {
                                    "start": {"line": 41, "character": 0},
                                    "end": {"line": 41, "character": 15}
                                }
                            }
                        }
                    ]
                }
            ]
        },
        {"kind": "project", "name": "library"}
    ])
}

pub fn catalog() -> Value {
    json!([
        {
            "projectName": "petclinic",
            "groups": [
                {"identifier": "web", "displayName": "Web"},
                {"identifier": "data", "displayName": "Data"},
                {"identifier": "events", "displayName": "Events"}
            ]
        }
    ])
}
