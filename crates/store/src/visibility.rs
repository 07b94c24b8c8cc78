//! Per-project group visibility
//!
//! Selections are cached in memory and written through to a [`GroupStore`].
//! Changing a selection never touches the current tree; it only changes the
//! `groups` parameter of the next fetch.

use crate::backend::GroupStore;
use crate::Result;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use stree_core::{Group, ProjectGroups};
use tracing::{debug, info};

/// Which groups of a project are visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSelection {
    /// No restriction
    All,
    /// Only these group identifiers (possibly none)
    Only(BTreeSet<String>),
}

impl GroupSelection {
    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupSelection::Only(ids.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, GroupSelection::All)
    }

    pub fn includes(&self, id: &str) -> bool {
        match self {
            GroupSelection::All => true,
            GroupSelection::Only(ids) => ids.contains(id),
        }
    }
}

/// Group selection state for every project of a workspace
pub struct VisibilityStore<S> {
    /// Durable backend
    backend: S,
    /// Restricted projects; unrestricted ones have no entry
    selected: RwLock<BTreeMap<String, BTreeSet<String>>>,
    /// Last known group catalog, by project name
    available: RwLock<AHashMap<String, ProjectGroups>>,
}

impl<S: GroupStore> VisibilityStore<S> {
    /// Load every persisted selection from `backend`
    pub async fn open(backend: S) -> Result<Self> {
        let selected: BTreeMap<_, _> = backend
            .load_all()
            .await?
            .into_iter()
            .map(|(key, ids)| (key, ids.into_iter().collect::<BTreeSet<_>>()))
            .collect();

        debug!("Loaded {} restricted grouping entries", selected.len());

        Ok(Self {
            backend,
            selected: RwLock::new(selected),
            available: RwLock::new(AHashMap::new()),
        })
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn selected_groups(&self, key: &str) -> GroupSelection {
        match self.selected.read().get(key) {
            Some(ids) => GroupSelection::Only(ids.clone()),
            None => GroupSelection::All,
        }
    }

    /// Persist a selection for `key`
    ///
    /// A selection covering every available group of the project (when the
    /// catalog is known) is stored as "all", i.e. as an absent entry.
    pub async fn set_selected_groups(&self, key: &str, selection: GroupSelection) -> Result<()> {
        let selection = self.normalize(key, selection);

        match &selection {
            GroupSelection::All => self.backend.save(key, None).await?,
            GroupSelection::Only(ids) => {
                let ids: Vec<String> = ids.iter().cloned().collect();
                self.backend.save(key, Some(&ids)).await?;
            }
        }

        let mut selected = self.selected.write();
        match selection {
            GroupSelection::All => {
                selected.remove(key);
                info!("Showing all groups of {}", key);
            }
            GroupSelection::Only(ids) => {
                info!("Showing {} group(s) of {}", ids.len(), key);
                selected.insert(key.to_string(), ids);
            }
        }
        Ok(())
    }

    fn normalize(&self, key: &str, selection: GroupSelection) -> GroupSelection {
        let GroupSelection::Only(ids) = selection else {
            return GroupSelection::All;
        };

        let available = self.available.read();
        match available.get(key) {
            Some(catalog) if catalog.identifiers().all(|id| ids.contains(id)) => GroupSelection::All,
            _ => GroupSelection::Only(ids),
        }
    }

    /// Record the group catalog reported by the structure source
    pub fn set_available(&self, catalog: Vec<ProjectGroups>) {
        let mut available = self.available.write();
        available.clear();
        for entry in catalog {
            available.insert(entry.project_name.clone(), entry);
        }
    }

    /// Known groups of `key`, `None` before the catalog has been fetched
    pub fn available(&self, key: &str) -> Option<Vec<Group>> {
        self.available.read().get(key).map(|entry| entry.groups.clone())
    }

    /// `groups` parameter for the next fetch; `None` when nothing is restricted
    pub fn request_groups(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let selected = self.selected.read();
        if selected.is_empty() {
            return None;
        }
        Some(
            selected
                .iter()
                .map(|(key, ids)| (key.clone(), ids.iter().cloned().collect()))
                .collect(),
        )
    }
}
