use storage::repository::{KeyValueRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_overwrites_and_removes() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_value("quiz-progress-v1").await.unwrap(), None);

    repo.put_value("quiz-progress-v1", r#"{"page":1}"#)
        .await
        .unwrap();
    repo.put_value("quiz-progress-v1", r#"{"page":3}"#)
        .await
        .unwrap();
    let stored = repo.get_value("quiz-progress-v1").await.unwrap();
    assert_eq!(stored.as_deref(), Some(r#"{"page":3}"#));

    repo.remove_value("quiz-progress-v1").await.unwrap();
    repo.remove_value("quiz-progress-v1").await.unwrap();
    assert_eq!(repo.get_value("quiz-progress-v1").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.put_value("quiz-total-questions", "10").await.unwrap();
    repo.migrate().await.expect("second migrate");

    let value = repo.get_value("quiz-total-questions").await.unwrap();
    assert_eq!(value.as_deref(), Some("10"));
}

#[tokio::test]
async fn storage_sqlite_exposes_kv_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");

    storage.kv.put_value("a", "1").await.unwrap();
    storage.kv.put_value("b", "2").await.unwrap();
    storage.kv.remove_value("a").await.unwrap();

    assert_eq!(storage.kv.get_value("a").await.unwrap(), None);
    assert_eq!(storage.kv.get_value("b").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn entry_count_tracks_stored_keys() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_count?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    assert_eq!(repo.entry_count().await.unwrap(), 0);

    repo.put_value("quiz-progress-v1", "{}").await.unwrap();
    repo.put_value("quiz-progress-v1", r#"{"page":2}"#).await.unwrap();
    repo.put_value("quiz-total-questions", "all").await.unwrap();
    assert_eq!(repo.entry_count().await.unwrap(), 2);

    repo.remove_value("quiz-total-questions").await.unwrap();
    assert_eq!(repo.entry_count().await.unwrap(), 1);
}
