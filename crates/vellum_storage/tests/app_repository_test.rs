//! Tests for app persistence.

use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;
use vellum_core::{ActionStatus, ActionType, AppConfig, BagEntry, InputField, InputType};
use vellum_error::VellumErrorKind;
use vellum_storage::{
    AppRepository, FileStore, FileSystemStore, InMemoryFileStore, StorageErrorKind,
};

fn sample_app() -> AppConfig {
    let mut app = AppConfig::new("Story maker");
    app.add_input(InputField::new("name.md", InputType::Text, "Name"))
        .unwrap();
    let action_id = app.add_action(ActionType::GenerateText, "Story").id;
    app.actions[0].prompt.insert("en-US", "Tell a story about @name.md".to_string());
    app.last_execution
        .bag
        .insert("name.md", BagEntry::text("Ana"));
    app.last_execution
        .bag
        .insert("story.md", BagEntry::text("Once upon a time, Ana..."));
    app.last_execution
        .set_status(action_id, ActionStatus::Complete);
    app
}

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemStore::new(temp_dir.path()).unwrap());
    let repo = AppRepository::new(store);

    let app = sample_app();
    repo.save(&app).await.unwrap();

    assert!(temp_dir
        .path()
        .join("apps")
        .join(format!("{}.json", app.id))
        .exists());
    assert_eq!(repo.load(&app.id).await.unwrap(), app);
}

#[tokio::test]
async fn test_load_missing_app() {
    let repo = AppRepository::new(Arc::new(InMemoryFileStore::new()));

    let err = repo.load(&Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_load_corrupt_document() {
    let store = Arc::new(InMemoryFileStore::new());
    let repo = AppRepository::new(store.clone());
    let id = Uuid::new_v4();
    store.write(&repo.key(&id), "{ not json").await.unwrap();

    let err = repo.load(&id).await.unwrap_err();
    match err.kind() {
        VellumErrorKind::Storage(e) => {
            assert!(matches!(
                &e.kind,
                StorageErrorKind::Corrupt { path, .. } if path.ends_with(".json")
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_list_and_delete() {
    let store = Arc::new(InMemoryFileStore::new());
    let repo = AppRepository::new(store.clone());

    let first = AppConfig::new("One");
    let second = AppConfig::new("Two");
    repo.save(&first).await.unwrap();
    repo.save(&second).await.unwrap();
    store.write("apps/readme.txt", "not an app").await.unwrap();

    let mut expected = vec![first.id, second.id];
    expected.sort();
    assert_eq!(repo.list().await.unwrap(), expected);

    repo.delete(&first.id).await.unwrap();
    assert!(!repo.exists(&first.id).await.unwrap());
    assert_eq!(repo.list().await.unwrap(), vec![second.id]);
}

#[tokio::test]
async fn test_custom_prefix() {
    let store = Arc::new(InMemoryFileStore::new());
    let repo = AppRepository::with_prefix(store.clone(), "tenants/acme/");
    let app = AppConfig::new("Scoped");

    repo.save(&app).await.unwrap();

    assert!(store
        .exists(&format!("tenants/acme/{}.json", app.id))
        .await
        .unwrap());
    assert_eq!(repo.list().await.unwrap(), vec![app.id]);
}

#[tokio::test]
async fn test_load_resets_actions_saved_mid_run() {
    let repo = AppRepository::new(Arc::new(InMemoryFileStore::new()));
    let mut app = sample_app();
    let finished = app.actions[0].id;
    let abandoned = app.add_action(ActionType::GenerateImage, "Cover").id;
    app.last_execution
        .set_status(abandoned, ActionStatus::Loading);
    repo.save(&app).await.unwrap();

    let loaded = repo.load(&app.id).await.unwrap();

    assert_eq!(loaded.last_execution.status(&abandoned), ActionStatus::Idle);
    assert_eq!(loaded.last_execution.status(&finished), ActionStatus::Complete);
    assert_eq!(loaded.last_execution.bag, app.last_execution.bag);
}
