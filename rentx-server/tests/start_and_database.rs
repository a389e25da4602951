use anyhow::Result;
use tempfile::TempDir;
use std::fs;
use std::path::PathBuf;
use rentx_server::{build_sqlite_url, connect_pool, health_with_pool, run_migrations, sqlite_url_for_path};
use rentx_server::{NewListing, SqliteStore, Store, StoreError};

// Funzione di utilità per costruire l'URL SQLite da un percorso di file
fn sqlite_url_for(p: &PathBuf) -> String {
    sqlite_url_for_path(p.as_path()).expect("build sqlite url")
}

async fn fresh_store(td: &TempDir) -> Result<(sqlx::SqlitePool, SqliteStore)> {
    let url = sqlite_url_for(&td.path().join("rentx.db"));
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;
    Ok((pool.clone(), SqliteStore::new(pool)))
}

fn listing(user_id: i64, name: &str) -> NewListing {
    NewListing {
        user_id,
        name: name.to_string(),
        description: format!("{} description", name),
        payment_per_day: 25,
        image_path: format!("uploads/{}_{}.png", user_id, name),
    }
}

// Test che verifica che le migrazioni creino le tabelle necessarie, e che rieseguirle non fallisca
#[tokio::test]
async fn run_migrations_creates_tables() -> Result<()> {
    let td = TempDir::new()?;
    let db_path = td.path().join("rentx.db");
    fs::File::create(&db_path)?;

    let url = sqlite_url_for(&db_path);
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;
    run_migrations(&pool).await?;

    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('users','listings')"
    ).fetch_all(&pool).await?;

    for expected in ["users", "listings"] {
        assert!(names.contains(&expected.to_string()), "missing table {}", expected);
    }
    Ok(())
}

// Test che verifica che l'handler di health funzioni dopo le migrazioni
#[tokio::test]
async fn health_handler_works_after_migrations() -> Result<()> {
    let td = TempDir::new()?;
    let (pool, _) = fresh_store(&td).await?;

    let status = health_with_pool(&pool).await;
    assert!(status.is_success(), "health should return 200 OK");
    Ok(())
}

// Test che verifica che la creazione del file DB e delle directory genitrici sia idempotente
#[tokio::test]
async fn creating_db_file_and_parent_dirs_is_idempotent() -> Result<()> {
    let td = TempDir::new()?;
    let nested = td.path().join("a").join("b").join("rentx.db");
    let parent = nested.parent().unwrap().to_path_buf();
    assert!(!parent.exists());

    // passa da build_sqlite_url come fa main, con il prefisso sqlite://
    let url = build_sqlite_url(&format!("sqlite://{}", nested.display()))?;
    let again = build_sqlite_url(&format!("sqlite://{}", nested.display()))?;
    assert_eq!(url, again);
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;

    assert!(parent.exists(), "parent dir should have been created");
    assert!(nested.exists(), "db file should have been created");
    Ok(())
}

#[tokio::test]
async fn in_memory_database_keeps_schema() -> Result<()> {
    let url = build_sqlite_url("sqlite::memory:")?;
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);

    let id = store.insert_user("Ann", "ann@example.com", "pw").await?;
    assert_eq!(store.find_user_by_credentials("ann@example.com", "pw").await?, id);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_atomically() -> Result<()> {
    let td = TempDir::new()?;
    let (pool, store) = fresh_store(&td).await?;

    let first = store.insert_user("Ann", "ann@example.com", "pw").await?;
    let err = store.insert_user("Other Ann", "ann@example.com", "pw2").await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail(_)), "got {:?}", err);
    assert!(err.to_string().contains("UNIQUE"), "store message kept: {}", err);

    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&pool).await?;
    assert_eq!(n, 1);
    // gli id sono assegnati dallo store e crescono
    let second = store.insert_user("Bob", "bob@example.com", "pw").await?;
    assert!(second > first);
    Ok(())
}

// Confronto esatto: niente trim, niente case folding
#[tokio::test]
async fn credentials_match_exactly() -> Result<()> {
    let td = TempDir::new()?;
    let (_, store) = fresh_store(&td).await?;
    let id = store.insert_user("Ann", "ann@example.com", "Secret").await?;

    assert_eq!(store.find_user_by_credentials("ann@example.com", "Secret").await?, id);
    for (email, pw) in [
        ("ann@example.com", "secret"),
        ("ANN@example.com", "Secret"),
        ("ann@example.com ", "Secret"),
        ("nobody@example.com", "Secret"),
    ] {
        let err = store.find_user_by_credentials(email, pw).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound), "{} / {} -> {:?}", email, pw, err);
    }
    Ok(())
}

// Le foreign key sono attive su ogni connessione del pool, non solo sulla prima
#[tokio::test]
async fn listing_requires_existing_owner() -> Result<()> {
    let td = TempDir::new()?;
    let (pool, store) = fresh_store(&td).await?;

    for _ in 0..4 {
        let err = store.insert_listing(&listing(999, "ghost")).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)), "got {:?}", err);
    }
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings").fetch_one(&pool).await?;
    assert_eq!(n, 0);
    Ok(())
}

#[tokio::test]
async fn list_all_and_by_owner() -> Result<()> {
    let td = TempDir::new()?;
    let (_, store) = fresh_store(&td).await?;
    let ann = store.insert_user("Ann", "ann@example.com", "pw").await?;
    let bob = store.insert_user("Bob", "bob@example.com", "pw").await?;

    let bike = store.insert_listing(&listing(ann, "bike")).await?;
    let kayak = store.insert_listing(&listing(bob, "kayak")).await?;
    let tent = store.insert_listing(&listing(ann, "tent")).await?;

    let all = store.list_all().await?;
    let ids: Vec<i64> = all.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![bike, kayak, tent]);

    let mine = store.list_by_owner(ann).await?;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|l| l.user_id == ann));
    assert_eq!(mine[0].image_path, format!("uploads/{}_bike.png", ann));
    assert_eq!(mine[0].payment_per_day, 25);

    assert!(store.list_by_owner(12345).await?.is_empty());
    Ok(())
}

// Righe con colonne NULL (database creati a mano) vengono saltate invece di far fallire la lista
#[tokio::test]
async fn undecodable_rows_are_skipped() -> Result<()> {
    let td = TempDir::new()?;
    let (pool, store) = fresh_store(&td).await?;
    let ann = store.insert_user("Ann", "ann@example.com", "pw").await?;
    store.insert_listing(&listing(ann, "bike")).await?;
    sqlx::query("INSERT INTO listings (user_id, name) VALUES (?, NULL)")
        .bind(ann)
        .execute(&pool)
        .await?;

    let all = store.list_all().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "bike");
    Ok(())
}
