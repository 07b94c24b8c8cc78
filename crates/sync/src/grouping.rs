//! State of the group selection dialog
//!
//! One checkable item per project, with one checkable child per group. The
//! dialog is seeded from the catalog plus the current selections and its
//! result is written back to the visibility store.

use std::collections::BTreeSet;
use stree_core::ProjectGroups;
use stree_store::{GroupSelection, GroupStore, StoreError, VisibilityStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupItem {
    pub identifier: String,
    pub display_name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub project_name: String,
    pub groups: Vec<GroupItem>,
}

impl ProjectItem {
    /// Tri-state check mark: `None` when only some groups are checked
    pub fn checked(&self) -> Option<bool> {
        let total = self.groups.len();
        let checked = self.groups.iter().filter(|g| g.checked).count();
        match checked {
            n if n == total => Some(true),
            0 => Some(false),
            _ => None,
        }
    }

    /// Check or uncheck every group of the project
    pub fn set_checked(&mut self, checked: bool) {
        for group in &mut self.groups {
            group.checked = checked;
        }
    }

    /// Check or uncheck one group; false if the project has no such group
    pub fn set_group_checked(&mut self, identifier: &str, checked: bool) -> bool {
        match self.groups.iter_mut().find(|g| g.identifier == identifier) {
            Some(group) => {
                group.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn selection(&self) -> GroupSelection {
        if self.groups.iter().all(|g| g.checked) {
            return GroupSelection::All;
        }
        GroupSelection::Only(
            self.groups
                .iter()
                .filter(|g| g.checked)
                .map(|g| g.identifier.clone())
                .collect::<BTreeSet<_>>(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingModel {
    projects: Vec<ProjectItem>,
}

impl GroupingModel {
    /// Build the dialog from the catalog and the current selection per project
    pub fn load(catalog: &[ProjectGroups], current: impl Fn(&str) -> GroupSelection) -> Self {
        let projects = catalog
            .iter()
            .map(|entry| {
                let selection = current(&entry.project_name);
                ProjectItem {
                    project_name: entry.project_name.clone(),
                    groups: entry
                        .groups
                        .iter()
                        .map(|group| GroupItem {
                            identifier: group.identifier.clone(),
                            display_name: group.display_name.clone(),
                            checked: selection.includes(&group.identifier),
                        })
                        .collect(),
                }
            })
            .collect();
        Self { projects }
    }

    pub fn projects(&self) -> &[ProjectItem] {
        &self.projects
    }

    pub fn project_mut(&mut self, name: &str) -> Option<&mut ProjectItem> {
        self.projects.iter_mut().find(|p| p.project_name == name)
    }

    /// Selection per project, in catalog order
    pub fn result(&self) -> Vec<(String, GroupSelection)> {
        self.projects
            .iter()
            .map(|p| (p.project_name.clone(), p.selection()))
            .collect()
    }

    /// Write every project's selection to `store`
    pub async fn apply<S: GroupStore>(&self, store: &VisibilityStore<S>) -> Result<(), StoreError> {
        for (project, selection) in self.result() {
            store.set_selected_groups(&project, selection).await?;
        }
        Ok(())
    }
}
