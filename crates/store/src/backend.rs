//! Key/value backends for group selections
//!
//! A key is a top-level project name; the value is the list of selected
//! group identifiers. An absent entry means "no restriction".

use crate::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use sled::{Db, Tree};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Name of the sled tree holding the grouping entries
pub const GROUPING_TREE: &str = "stereotype-structure-grouping";

/// Durable storage of group selections
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Selected identifiers for `key`, `None` when unrestricted
    async fn load(&self, key: &str) -> Result<Option<Vec<String>>>;

    /// Persist a selection; `None` removes the entry
    async fn save(&self, key: &str, ids: Option<&[String]>) -> Result<()>;

    /// Every stored entry
    async fn load_all(&self) -> Result<BTreeMap<String, Vec<String>>>;
}

/// Group store kept in a sled tree, one JSON-encoded list per key
pub struct SledGroupStore {
    /// Owning database handle (kept so the tree outlives callers' handles)
    _db: Db,
    /// Grouping tree inside the database
    tree: Tree,
}

impl SledGroupStore {
    /// Open or create the store in the given directory
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        Self::with_db(db)
    }

    /// Use the grouping tree of an already open database
    pub fn with_db(db: Db) -> Result<Self> {
        let tree = db.open_tree(GROUPING_TREE)?;
        debug!("Opened grouping tree with {} entries", tree.len());
        Ok(Self { _db: db, tree })
    }

    fn decode(value: &[u8]) -> Result<Vec<String>> {
        Ok(serde_json::from_slice(value)?)
    }
}

#[async_trait]
impl GroupStore for SledGroupStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.tree.get(key.as_bytes())? {
            Some(value) => Ok(Some(Self::decode(&value)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, ids: Option<&[String]>) -> Result<()> {
        match ids {
            Some(ids) => {
                let value = serde_json::to_vec(ids)?;
                self.tree.insert(key.as_bytes(), value)?;
            }
            None => {
                self.tree.remove(key.as_bytes())?;
            }
        }

        // Flush to ensure durability
        self.tree.flush()?;
        Ok(())
    }

    async fn load_all(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut entries = BTreeMap::new();
        for item in self.tree.iter() {
            let (key, value) = item?;
            let key = String::from_utf8_lossy(&key).into_owned();
            entries.insert(key, Self::decode(&value)?);
        }
        Ok(entries)
    }
}

/// Volatile group store for hosts without a workspace directory
#[derive(Default)]
pub struct MemoryGroupStore {
    entries: RwLock<BTreeMap<String, Vec<String>>>,
}

impl MemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupStore for MemoryGroupStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn save(&self, key: &str, ids: Option<&[String]>) -> Result<()> {
        let mut entries = self.entries.write();
        match ids {
            Some(ids) => {
                entries.insert(key.to_string(), ids.to_vec());
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<BTreeMap<String, Vec<String>>> {
        Ok(self.entries.read().clone())
    }
}
