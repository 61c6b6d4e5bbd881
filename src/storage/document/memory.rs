//! In-process document store with the same semantics as the Postgres store.

use super::{with_id, Document, DocumentStore, Patch, StoreError};
use crate::domain::object_id::ObjectId;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

struct StoredDocument {
    /// Insertion order; ids alone do not sort once the counter wraps.
    seq: u64,
    doc: Document,
}

#[derive(Default)]
struct MemoryCollection {
    unique_fields: Vec<String>,
    next_seq: u64,
    documents: HashMap<String, StoredDocument>,
}

impl MemoryCollection {
    fn push(&mut self, id: String, doc: Document) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.documents.insert(id, StoredDocument { seq, doc });
    }

    fn ordered(&self) -> Vec<(&String, &Document)> {
        let mut entries: Vec<_> = self.documents.iter().collect();
        entries.sort_by_key(|(_, stored)| stored.seq);
        entries
            .into_iter()
            .map(|(id, stored)| (id, &stored.doc))
            .collect()
    }

    fn check_unique(
        &self,
        collection: &str,
        candidate: &Document,
        exclude_id: Option<&str>,
    ) -> Result<(), StoreError> {
        for field in &self.unique_fields {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let clash = self
                .documents
                .iter()
                .filter(|(id, _)| Some(id.as_str()) != exclude_id)
                .any(|(_, stored)| stored.doc.get(field) == Some(value));
            if clash {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: field.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unknown(collection: &str) -> StoreError {
    StoreError::UnknownCollection(collection.to_string())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn ensure_collection(
        &self,
        collection: &str,
        unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let entry = collections.entry(collection.to_string()).or_default();
        for field in unique_fields {
            if !entry.unique_fields.iter().any(|f| f == field) {
                entry.unique_fields.push(field.to_string());
            }
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, collection: &str, doc: Document) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;
        coll.check_unique(collection, &doc, None)?;

        let id = ObjectId::new().to_hex();
        coll.push(id.clone(), doc.clone());
        Ok(with_id(&id, doc))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;
        let id = id.to_hex();
        Ok(coll
            .documents
            .get(&id)
            .map(|stored| with_id(&id, stored.doc.clone())))
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;
        Ok(coll
            .ordered()
            .into_iter()
            .map(|(id, doc)| with_id(id, doc.clone()))
            .collect())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        patch: Patch,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;
        let id = id.to_hex();

        let Some(current) = coll.documents.get(&id) else {
            return Ok(None);
        };
        let mut updated = current.doc.clone();
        patch.apply_to(&mut updated);
        coll.check_unique(collection, &updated, Some(&id))?;

        if let Some(stored) = coll.documents.get_mut(&id) {
            stored.doc = updated.clone();
        }
        Ok(Some(with_id(&id, updated)))
    }

    async fn delete_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;
        let id = id.to_hex();
        Ok(coll
            .documents
            .remove(&id)
            .map(|stored| with_id(&id, stored.doc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_find_update_delete() {
        let store = MemoryDocumentStore::new();
        store.ensure_collection("products", &[]).await.unwrap();

        let created = store
            .insert("products", doc(json!({"name": "Frosted Flakes", "price": 5.99})))
            .await
            .unwrap();
        let id = ObjectId::parse_str(created["_id"].as_str().unwrap()).unwrap();

        let found = store.find_by_id("products", &id).await.unwrap().unwrap();
        assert_eq!(found, created);

        let patch = Patch {
            set: doc(json!({"price": 4.5})),
            unset: vec!["name".to_string()],
        };
        let updated = store
            .update_by_id("products", &id, patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["price"], json!(4.5));
        assert!(!updated.contains_key("name"));

        let deleted = store.delete_by_id("products", &id).await.unwrap();
        assert!(deleted.is_some());
        assert!(store.find_by_id("products", &id).await.unwrap().is_none());
        assert!(store.delete_by_id("products", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unique_fields_are_enforced_on_insert_and_update() {
        let store = MemoryDocumentStore::new();
        store.ensure_collection("customers", &["email"]).await.unwrap();

        store
            .insert("customers", doc(json!({"email": "a@x.io"})))
            .await
            .unwrap();
        let second = store
            .insert("customers", doc(json!({"email": "b@x.io"})))
            .await
            .unwrap();

        let err = store
            .insert("customers", doc(json!({"email": "a@x.io"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref field, .. } if field == "email"));

        let id = ObjectId::parse_str(second["_id"].as_str().unwrap()).unwrap();
        let clash = Patch {
            set: doc(json!({"email": "a@x.io"})),
            unset: vec![],
        };
        assert!(store.update_by_id("customers", &id, clash).await.is_err());

        // re-saving its own email is not a clash
        let same = Patch {
            set: doc(json!({"email": "b@x.io"})),
            unset: vec![],
        };
        assert!(store.update_by_id("customers", &id, same).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn find_all_follows_creation_order() {
        let store = MemoryDocumentStore::new();
        store.ensure_collection("orders", &[]).await.unwrap();
        for n in 0..5 {
            store
                .insert("orders", doc(json!({"total": n})))
                .await
                .unwrap();
        }
        let totals: Vec<_> = store
            .find_all("orders")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["total"].clone())
            .collect();
        assert_eq!(totals, vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
    }

    #[test]
    fn listing_order_survives_a_counter_wrap() {
        let mut coll = MemoryCollection::default();
        // same second; the counter wrapped between the two ids
        coll.push("65e0f0d9c3a2b6a8e7ffffff".to_string(), doc(json!({"n": 1})));
        coll.push("65e0f0d9c3a2b6a8e7000000".to_string(), doc(json!({"n": 2})));
        let ns: Vec<_> = coll.ordered().into_iter().map(|(_, d)| d["n"].clone()).collect();
        assert_eq!(ns, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn updates_keep_listing_position() {
        let store = MemoryDocumentStore::new();
        store.ensure_collection("products", &[]).await.unwrap();
        let first = store
            .insert("products", doc(json!({"name": "a"})))
            .await
            .unwrap();
        store
            .insert("products", doc(json!({"name": "b"})))
            .await
            .unwrap();
        let id = ObjectId::parse_str(first["_id"].as_str().unwrap()).unwrap();
        let patch = Patch {
            set: doc(json!({"name": "a2"})),
            unset: vec![],
        };
        store.update_by_id("products", &id, patch).await.unwrap();
        let names: Vec<_> = store
            .find_all("products")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("a2"), json!("b")]);
    }

    #[tokio::test]
    async fn unknown_collection_is_an_error() {
        let store = MemoryDocumentStore::new();
        let err = store.find_all("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownCollection(_)));
    }
}
