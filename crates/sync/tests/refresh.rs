//! Refresh cycles against a scripted structure source

mod common;

use common::{project, projects, root_keys, stereotype, sync_over, ScriptedChannel};
use serde_json::json;
use std::sync::Arc;
use stree_core::IndexUpdated;
use stree_store::{GroupSelection, SledGroupStore, VisibilityStore};
use stree_sync::{
    ChannelError, RefreshAfterGrouping, RefreshOutcome, StructureSync, SyncConfig, SyncError,
    SyncPhase, TreeChange,
};
use tokio::sync::broadcast::error::TryRecvError;

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn test_scoped_refresh_replaces_in_place() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;

    channel.answer(projects(&["a", "b"]));
    sync.refresh_full(false).await.unwrap();
    let before = sync.roots();

    channel.answer(json!([project("a", vec![stereotype("web", vec![])])]));
    let outcome = sync.refresh_scoped(&keys(&["a"])).await.unwrap();

    let after = sync.roots();
    assert_eq!(root_keys(&after), vec!["a", "b"]);
    assert!(!Arc::ptr_eq(&after[0], &before[0]));
    assert!(after[0].has_children());
    assert!(Arc::ptr_eq(&after[1], &before[1]));
    match outcome {
        RefreshOutcome::Merged(summary) => assert_eq!(summary.replaced, vec!["a"]),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_scoped_refresh_drops_omitted_project() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;

    channel.answer(projects(&["a", "b"]));
    sync.refresh_full(false).await.unwrap();
    let b = Arc::clone(&sync.roots()[1]);

    channel.answer(json!([]));
    sync.refresh_scoped(&keys(&["a"])).await.unwrap();

    let roots = sync.roots();
    assert_eq!(root_keys(&roots), vec!["b"]);
    assert!(Arc::ptr_eq(&roots[0], &b));
}

#[tokio::test]
async fn test_scoped_refresh_appends_new_project() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;

    channel.answer(projects(&["a", "b"]));
    sync.refresh_full(false).await.unwrap();

    channel.answer(projects(&["c"]));
    sync.refresh_scoped(&keys(&["c"])).await.unwrap();

    assert_eq!(root_keys(&sync.roots()), vec!["a", "b", "c"]);
    assert_eq!(
        channel.requests()[1].affected_projects,
        Some(keys(&["c"]))
    );
}

#[tokio::test]
async fn test_scoped_refresh_fires_once_after_merge() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;
    channel.answer(projects(&["a"]));
    sync.refresh_full(false).await.unwrap();

    let mut events = sync.subscribe();
    channel.answer(projects(&["a"]));
    sync.refresh_scoped(&keys(&["a"])).await.unwrap();

    assert!(matches!(events.try_recv(), Ok(TreeChange::All)));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_older_full_refresh_cannot_overwrite_newer_scoped() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;
    channel.answer(projects(&["a", "b"]));
    sync.refresh_full(false).await.unwrap();

    let mut events = sync.subscribe();
    let r1 = channel.script();
    let r2 = channel.script();
    let affected = keys(&["a"]);

    let (full, scoped, ()) = tokio::join!(
        sync.refresh_full(false),
        async {
            // Issue R2 strictly after R1
            while channel.request_count() < 2 {
                tokio::task::yield_now().await;
            }
            sync.refresh_scoped(&affected).await
        },
        async {
            while channel.request_count() < 3 {
                tokio::task::yield_now().await;
            }
            r2.respond(json!([project("a", vec![stereotype("scoped", vec![])])]));
            while sync.phase() != SyncPhase::Idle {
                tokio::task::yield_now().await;
            }
            r1.respond(projects(&["stale"]));
        }
    );

    assert_eq!(full.unwrap(), RefreshOutcome::Superseded);
    assert!(matches!(scoped.unwrap(), RefreshOutcome::Merged(_)));

    let roots = sync.roots();
    assert_eq!(root_keys(&roots), vec!["a", "b"]);
    assert_eq!(roots[0].children()[0].label(), "scoped");

    // R1's loading announcement and R2's merge; nothing for the stale result
    assert!(matches!(events.try_recv(), Ok(TreeChange::All)));
    assert!(matches!(events.try_recv(), Ok(TreeChange::All)));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_stale_result_resolving_first_is_discarded() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;

    let r1 = channel.script();
    let r2 = channel.script();

    let (first, second, ()) = tokio::join!(
        sync.refresh_full(false),
        async {
            while channel.request_count() < 1 {
                tokio::task::yield_now().await;
            }
            sync.refresh_full(true).await
        },
        async {
            while channel.request_count() < 2 {
                tokio::task::yield_now().await;
            }
            r1.respond(projects(&["old"]));
            r2.respond(projects(&["new"]));
        }
    );

    assert_eq!(first.unwrap(), RefreshOutcome::Superseded);
    assert_eq!(second.unwrap(), RefreshOutcome::Replaced { roots: 1 });
    assert_eq!(root_keys(&sync.roots()), vec!["new"]);
}

#[tokio::test]
async fn test_rejected_fetch_keeps_roots() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;
    channel.answer(projects(&["a"]));
    sync.refresh_full(false).await.unwrap();
    let before = sync.roots();

    let mut events = sync.subscribe();
    channel.script().reject("index not ready");
    let err = sync.refresh_scoped(&keys(&["a"])).await.unwrap_err();

    assert!(matches!(err, SyncError::Fetch(ChannelError::Rejected(_))));
    assert!(Arc::ptr_eq(&sync.roots()[0], &before[0]));
    assert_eq!(sync.phase(), SyncPhase::Idle);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_rejected_full_refresh_clears_loading() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;
    let mut events = sync.subscribe();

    channel.script().reject("boom");
    assert!(sync.refresh_full(false).await.is_err());

    assert!(matches!(events.try_recv(), Ok(TreeChange::All)));
    assert!(matches!(events.try_recv(), Ok(TreeChange::All)));
    assert!(sync.roots().is_empty());
}

#[tokio::test]
async fn test_index_update_without_scope_refreshes_everything() {
    let channel = ScriptedChannel::new();
    let sync = sync_over(channel.clone(), SyncConfig::default()).await;

    channel.answer(projects(&["a"]));
    sync.handle_index_updated(&IndexUpdated::all()).await.unwrap();
    channel.answer(projects(&["a"]));
    sync.handle_index_updated(&IndexUpdated::projects(Vec::<String>::new()))
        .await
        .unwrap();
    channel.answer(projects(&["a"]));
    sync.handle_index_updated(&IndexUpdated::projects(["a"]))
        .await
        .unwrap();

    let requests = channel.requests();
    assert!(requests[0].affected_projects.is_none());
    assert!(requests[1].affected_projects.is_none());
    assert_eq!(requests[2].affected_projects, Some(keys(&["a"])));
}

#[tokio::test]
async fn test_index_update_falls_back_when_scoping_disabled() {
    let channel = ScriptedChannel::new();
    let config = SyncConfig {
        scoped_refresh: false,
        ..SyncConfig::default()
    };
    let sync = sync_over(channel.clone(), config).await;

    channel.answer(projects(&["a", "b"]));
    let outcome = sync
        .handle_index_updated(&IndexUpdated::projects(["a"]))
        .await
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Replaced { roots: 2 });
    assert!(channel.requests()[0].affected_projects.is_none());
}

#[tokio::test]
async fn test_full_group_selection_omits_restriction() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let channel = ScriptedChannel::new();
    channel.set_groups(json!([{
        "projectName": "a",
        "groups": [
            {"identifier": "web", "displayName": "Web"},
            {"identifier": "data", "displayName": "Data"}
        ]
    }]));

    let store = SledGroupStore::open(temp_dir.path()).unwrap();
    let visibility = Arc::new(VisibilityStore::open(store).await.unwrap());
    let sync = StructureSync::new(channel.clone(), visibility, SyncConfig::default());

    sync.fetch_groups().await.unwrap();

    channel.answer(projects(&["a"]));
    sync.set_selected_groups("a", GroupSelection::only(["web"]), RefreshAfterGrouping::Scoped)
        .await
        .unwrap();
    channel.answer(projects(&["a"]));
    sync.set_selected_groups(
        "a",
        GroupSelection::only(["web", "data"]),
        RefreshAfterGrouping::Scoped,
    )
    .await
    .unwrap();
    let untouched = sync
        .set_selected_groups("a", GroupSelection::All, RefreshAfterGrouping::None)
        .await
        .unwrap();

    let requests = channel.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].groups.as_ref().unwrap()["a"], keys(&["web"]));
    assert_eq!(requests[1].groups, None);
    assert!(untouched.is_none());
    assert!(sync.visibility().selected_groups("a").is_all());
}
