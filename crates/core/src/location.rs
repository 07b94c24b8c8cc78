//! Source locations as sent by the language server

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Zero-based position in a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Range between two positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Empty range at the given position
    pub fn at(line: u32, character: u32) -> Self {
        let pos = Position { line, character };
        Self { start: pos, end: pos }
    }
}

/// A document URI plus a range inside it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    #[serde(default)]
    pub range: Range,
}

impl Location {
    /// Location pointing at the start of a document
    pub fn document(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            range: Range::default(),
        }
    }

    /// Key used by node identities: `uri:line:character` of the range start
    pub fn key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.uri, self.range.start.line, self.range.start.character
        )
    }

    /// Best-effort parse of a JSON value shaped like a location
    ///
    /// Returns `None` for anything that lacks a string `uri`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.get("uri").is_some_and(Value::is_string) {
            return None;
        }
        Location::deserialize(value).ok()
    }
}
