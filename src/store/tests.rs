use std::path::PathBuf;

use super::*;
use crate::model::ArtifactKind;

fn artifact(conversation_id: &str, id: &str, created_at: &str) -> Artifact {
    Artifact {
        id: id.to_string(),
        conversation_id: conversation_id.to_string(),
        kind: ArtifactKind::Report,
        title: format!("Report {id}"),
        content: format!("<p>{id}</p>"),
        created_at: created_at.to_string(),
    }
}

fn temp_store_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "geochat-store-{}-{name}",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn exercise_store_contract(store: &mut dyn ArtifactStore) {
    assert!(store.get("conv-a", "missing").unwrap().is_none());
    assert!(store.list_by_conversation("conv-a").unwrap().is_empty());

    store.set(artifact("conv-a", "b", "2026-01-01T00:00:02Z")).unwrap();
    store.set(artifact("conv-a", "a", "2026-01-01T00:00:01Z")).unwrap();
    store.set(artifact("conv-a", "c", "2026-01-01T00:00:02Z")).unwrap();
    store.set(artifact("conv-b", "a", "2026-01-01T00:00:00Z")).unwrap();

    let listed = store.list_by_conversation("conv-a").unwrap();
    let ids = listed.iter().map(|item| item.id.as_str()).collect::<Vec<&str>>();
    assert_eq!(ids, vec!["a", "b", "c"]);

    let mut replacement = artifact("conv-a", "b", "2026-01-01T00:00:02Z");
    replacement.kind = ArtifactKind::Map;
    replacement.content = "<div>updated</div>".to_string();
    store.set(replacement.clone()).unwrap();
    assert_eq!(store.get("conv-a", "b").unwrap(), Some(replacement));
    assert_eq!(store.list_by_conversation("conv-a").unwrap().len(), 3);

    assert!(store.delete("conv-a", "a").unwrap());
    assert!(!store.delete("conv-a", "a").unwrap());
    assert!(store.get("conv-a", "a").unwrap().is_none());

    assert_eq!(store.list_by_conversation("conv-b").unwrap().len(), 1);
    assert_eq!(
        store.get("conv-b", "a").unwrap().map(|item| item.conversation_id),
        Some("conv-b".to_string())
    );

    assert_eq!(
        store.conversation_ids().unwrap(),
        vec!["conv-a".to_string(), "conv-b".to_string()]
    );
}

#[test]
fn memory_store_satisfies_contract() {
    let mut store = MemoryArtifactStore::new();
    exercise_store_contract(&mut store);
}

#[test]
fn sqlite_store_satisfies_contract() {
    let mut store = SqliteArtifactStore::open_in_memory().unwrap();
    exercise_store_contract(&mut store);
}

#[test]
fn json_store_satisfies_contract() {
    let path = temp_store_path("contract.json");
    let mut store = JsonFileArtifactStore::new(&path);
    exercise_store_contract(&mut store);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn json_store_uses_local_storage_style_keys() {
    let path = temp_store_path("keys.json");
    let mut store = JsonFileArtifactStore::new(&path);
    store.set(artifact("conv-z", "x", "2026-01-01T00:00:00Z")).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(document.get("artifacts_conv-z").is_some());

    store.delete("conv-z", "x").unwrap();
    assert!(store.conversation_ids().unwrap().is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let path = temp_store_path("persist.sqlite");
    {
        let mut store = SqliteArtifactStore::open(&path).unwrap();
        store.set(artifact("conv-a", "kept", "2026-01-01T00:00:00Z")).unwrap();
    }

    let store = SqliteArtifactStore::open(&path).unwrap();
    assert!(store.get("conv-a", "kept").unwrap().is_some());

    drop(store);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

#[test]
fn boxed_store_dispatches_to_backend() {
    let mut store = open_store(StoreBackend::Memory, Path::new("unused")).unwrap();
    store.set(artifact("conv-a", "a", "2026-01-01T00:00:00Z")).unwrap();
    assert_eq!(store.list_by_conversation("conv-a").unwrap().len(), 1);
}
