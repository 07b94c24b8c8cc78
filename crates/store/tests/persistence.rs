//! Grouping selections persisted through sled survive a restart

use stree_core::{Group, ProjectGroups};
use stree_store::{GroupSelection, SledGroupStore, VisibilityStore};
use tempfile::TempDir;

fn petclinic_catalog() -> Vec<ProjectGroups> {
    vec![ProjectGroups {
        project_name: "petclinic".to_string(),
        groups: ["web", "data", "events"]
            .iter()
            .map(|id| Group {
                identifier: id.to_string(),
                display_name: id.to_string(),
            })
            .collect(),
    }]
}

#[tokio::test]
async fn test_selection_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = VisibilityStore::open(SledGroupStore::open(temp_dir.path()).unwrap())
            .await
            .unwrap();
        store.set_available(petclinic_catalog());
        store
            .set_selected_groups("petclinic", GroupSelection::only(["web", "events"]))
            .await
            .unwrap();
    }

    let store = VisibilityStore::open(SledGroupStore::open(temp_dir.path()).unwrap())
        .await
        .unwrap();
    assert_eq!(
        store.selected_groups("petclinic"),
        GroupSelection::only(["events", "web"])
    );

    let groups = store.request_groups().unwrap();
    assert_eq!(groups["petclinic"], vec!["events".to_string(), "web".to_string()]);
}

#[tokio::test]
async fn test_selecting_everything_clears_entry_on_disk() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = VisibilityStore::open(SledGroupStore::open(temp_dir.path()).unwrap())
            .await
            .unwrap();
        store.set_available(petclinic_catalog());
        store
            .set_selected_groups("petclinic", GroupSelection::only(["web"]))
            .await
            .unwrap();
        store
            .set_selected_groups("petclinic", GroupSelection::only(["web", "data", "events"]))
            .await
            .unwrap();
    }

    let store = VisibilityStore::open(SledGroupStore::open(temp_dir.path()).unwrap())
        .await
        .unwrap();
    assert!(store.selected_groups("petclinic").is_all());
    assert_eq!(store.request_groups(), None);
}
