//! Postgres document store against a real database.
//!
//! Skipped unless `DATABASE_URL` is set (e.g. via `.env`). Uses throwaway
//! collection names and drops them afterwards.

use order_catalogue::storage::document::{Document, DocumentStore, Patch, StoreError};
use order_catalogue::{ObjectId, PgDocumentStore};
use serde_json::json;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn doc(v: serde_json::Value) -> Document {
    v.as_object().cloned().unwrap_or_default()
}

async fn store_or_skip() -> Result<Option<PgDocumentStore>, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        println!("DATABASE_URL not set; skipping Postgres store test");
        return Ok(None);
    };
    Ok(Some(PgDocumentStore::connect(&url, 2).await?))
}

async fn drop_collection(store: &PgDocumentStore, name: &str) {
    let _ = sqlx::query(&format!("DROP TABLE IF EXISTS {}", name))
        .execute(store.pool())
        .await;
}

#[tokio::test]
async fn crud_round_trip_against_postgres() -> TestResult {
    let Some(store) = store_or_skip().await? else {
        return Ok(());
    };
    let collection = format!("smoke_products_{}", ObjectId::new());
    store.ensure_collection(&collection, &[]).await?;
    store.ping().await?;

    let created = store
        .insert(
            &collection,
            doc(json!({"name": "Frosted Flakes", "manufacturer": "Kellogs", "price": 5.99})),
        )
        .await?;
    let id = ObjectId::parse_str(created["_id"].as_str().unwrap_or_default())?;
    assert_eq!(created["price"], json!(5.99));

    let fetched = store.find_by_id(&collection, &id).await?;
    assert_eq!(fetched.as_ref(), Some(&created));

    let updated = store
        .update_by_id(
            &collection,
            &id,
            Patch {
                set: doc(json!({"price": 6.25})),
                unset: vec!["manufacturer".to_string()],
            },
        )
        .await?
        .expect("record exists");
    assert_eq!(updated["price"], json!(6.25));
    assert_eq!(updated["name"], json!("Frosted Flakes"));
    assert!(!updated.contains_key("manufacturer"));

    let second = store
        .insert(&collection, doc(json!({"name": "Corn Pops"})))
        .await?;
    let listed = store.find_all(&collection).await?;
    assert_eq!(listed, vec![updated.clone(), second.clone()]);
    let second_id = ObjectId::parse_str(second["_id"].as_str().unwrap_or_default())?;
    assert!(store.delete_by_id(&collection, &second_id).await?.is_some());

    assert!(store.delete_by_id(&collection, &id).await?.is_some());
    assert!(store.find_by_id(&collection, &id).await?.is_none());
    assert!(store
        .update_by_id(&collection, &id, Patch::default())
        .await?
        .is_none());

    drop_collection(&store, &collection).await;
    Ok(())
}

#[tokio::test]
async fn unique_index_reports_duplicates() -> TestResult {
    let Some(store) = store_or_skip().await? else {
        return Ok(());
    };
    let collection = format!("smoke_customers_{}", ObjectId::new());
    store.ensure_collection(&collection, &["email"]).await?;

    store
        .insert(&collection, doc(json!({"email": "ada@example.com"})))
        .await?;
    let err = store
        .insert(&collection, doc(json!({"email": "ada@example.com"})))
        .await
        .unwrap_err();
    match err {
        StoreError::Duplicate { field, value, .. } => {
            assert_eq!(field, "email");
            assert_eq!(value, json!("ada@example.com"));
        }
        other => panic!("expected a duplicate-key error, got {other}"),
    }

    drop_collection(&store, &collection).await;
    Ok(())
}
