use deadlinks_core::outcome::{Availability, Outcome, Success};
use deadlinks_db::SqliteStore;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> SqliteStore {
    SqliteStore::new(dir.path().join("url_cache.db"))
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.initialize().await.unwrap();
    store.initialize().await.unwrap();

    store
        .store("http://example.com", &Outcome::from_status(200))
        .await
        .unwrap();
    assert!(store.load("http://example.com").await.unwrap().is_some());
}

#[tokio::test]
async fn initialize_creates_a_missing_database_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert!(!store.path().exists());

    store.initialize().await.unwrap();

    assert!(store.path().exists());
}

#[tokio::test]
async fn missing_entry_is_absent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.initialize().await.unwrap();

    assert_eq!(store.load("http://example.com").await.unwrap(), None);
}

#[tokio::test]
async fn every_outcome_shape_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.initialize().await.unwrap();

    let outcomes = [
        Outcome::from_status(200),
        Outcome::from_status(404),
        Outcome::timed_out(),
        Outcome::transport_failed(),
    ];

    for (i, outcome) in outcomes.iter().enumerate() {
        let url = format!("http://example.com/{i}");
        store.store(&url, outcome).await.unwrap();
        assert_eq!(store.load(&url).await.unwrap(), Some(*outcome));
    }
}

#[tokio::test]
async fn absent_is_distinct_from_stored_unknown() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.initialize().await.unwrap();

    store
        .store("http://known.example.com", &Outcome::transport_failed())
        .await
        .unwrap();

    let stored = store.load("http://known.example.com").await.unwrap().unwrap();
    assert_eq!(stored.availability, Availability::Unknown);
    assert_eq!(stored.success, Success::NotOk);
    assert_eq!(store.load("http://other.example.com").await.unwrap(), None);
}

#[tokio::test]
async fn upsert_replaces_the_existing_entry() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.initialize().await.unwrap();

    store
        .store("http://example.com", &Outcome::from_status(404))
        .await
        .unwrap();
    store
        .store("http://example.com", &Outcome::from_status(200))
        .await
        .unwrap();

    assert_eq!(
        store.load("http://example.com").await.unwrap(),
        Some(Outcome::from_status(200))
    );
}

#[tokio::test]
async fn one_row_per_distinct_url() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.initialize().await.unwrap();

    for _ in 0..3 {
        store
            .store("http://a.example.com", &Outcome::from_status(404))
            .await
            .unwrap();
    }
    store
        .store("http://b.example.com", &Outcome::timed_out())
        .await
        .unwrap();

    use sqlx::Connection;
    use sqlx::Row;
    let mut conn = sqlx::SqliteConnection::connect(&format!(
        "sqlite://{}",
        store.path().display()
    ))
    .await
    .unwrap();
    let row = sqlx::query("SELECT COUNT(*) AS n FROM url_cache")
        .fetch_one(&mut conn)
        .await
        .unwrap();
    let n: i64 = row.get("n");
    assert_eq!(n, 2);
}

#[tokio::test]
async fn unwritable_path_is_a_cache_error() {
    let store = SqliteStore::new("/nonexistent-dir/url_cache.db");
    let err = store.initialize().await.unwrap_err();
    assert!(matches!(
        err,
        deadlinks_core::error::AppError::CacheError(_)
    ));
}
