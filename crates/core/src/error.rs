//! Error types for structure decoding

use thiserror::Error;

/// Why a single wire element produced no node
///
/// Decoding never fails as a whole: the offending element is dropped and
/// its siblings continue.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("structure element is not a JSON object")]
    NotAnObject,

    #[error("unknown node kind '{0}'")]
    UnknownKind(String),

    #[error("invalid fields for '{kind}' node: {source}")]
    InvalidFields {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
