//! Store error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("grouping database error: {0}")]
    Db(#[from] sled::Error),

    #[error("failed to encode grouping entry: {0}")]
    Encoding(#[from] serde_json::Error),
}
