//! Document collections: the repository layer under the resource handlers.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

use crate::domain::object_id::ObjectId;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// A stored record. Returned documents carry their identifier under `_id`.
pub type Document = serde_json::Map<String, JsonValue>;

pub const ID_FIELD: &str = "_id";

/// A partial update: `set` is merged over the stored document, `unset` keys are removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub set: Document,
    pub unset: Vec<String>,
}

impl Patch {
    pub fn apply_to(&self, doc: &mut Document) {
        for (k, v) in &self.set {
            doc.insert(k.clone(), v.clone());
        }
        for k in &self.unset {
            doc.remove(k);
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Mirrors the wording clients of the reference store already match on.
    #[error("E11000 duplicate key error collection: {collection} index: {field}_1 dup key: {{ {field}: {value} }}")]
    Duplicate {
        collection: String,
        field: String,
        value: JsonValue,
    },

    #[error("collection `{0}` has not been initialized")]
    UnknownCollection(String),

    #[error("`{0}` is not a valid collection or field name")]
    InvalidName(String),

    #[error("malformed record in `{collection}`: {reason}")]
    MalformedRecord { collection: String, reason: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Generic create/find/update/delete over named collections.
///
/// Every method is a single round trip to the backing store; implementations
/// assign identifiers on insert and enforce the unique fields registered
/// through `ensure_collection`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates the collection (and its unique indexes) if missing.
    async fn ensure_collection(
        &self,
        collection: &str,
        unique_fields: &[&str],
    ) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert(&self, collection: &str, doc: Document) -> Result<Document, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError>;

    /// Whole collection in identifier (creation) order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Applies `patch` and returns the post-update document.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        patch: Patch,
    ) -> Result<Option<Document>, StoreError>;

    /// Removes the document and returns what was deleted.
    async fn delete_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError>;
}

/// Builds the outward document: `_id` first, then the stored fields.
pub fn with_id(id: &str, doc: Document) -> Document {
    let mut out = Document::new();
    out.insert(ID_FIELD.to_string(), JsonValue::from(id));
    for (k, v) in doc {
        if k != ID_FIELD {
            out.insert(k, v);
        }
    }
    out
}

/// Collection and field names are interpolated into SQL, so they must be plain identifiers.
pub fn validate_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_sets_then_unsets() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3}).as_object().unwrap().clone();
        let patch = Patch {
            set: json!({"a": 10, "d": 4}).as_object().unwrap().clone(),
            unset: vec!["c".to_string()],
        };
        patch.apply_to(&mut doc);
        assert_eq!(JsonValue::Object(doc), json!({"a": 10, "b": 2, "d": 4}));
    }

    #[test]
    fn with_id_ignores_a_stored_id_field() {
        let doc = json!({"_id": "spoofed", "name": "x"}).as_object().unwrap().clone();
        let out = with_id("65e0f0d9c3a2b6a8e7b1c3d4", doc);
        assert_eq!(out["_id"], json!("65e0f0d9c3a2b6a8e7b1c3d4"));
        assert_eq!(out["name"], json!("x"));
    }

    #[test]
    fn duplicate_error_names_collection_and_key() {
        let err = StoreError::Duplicate {
            collection: "customers".to_string(),
            field: "email".to_string(),
            value: json!("ada@example.com"),
        };
        assert_eq!(
            err.to_string(),
            "E11000 duplicate key error collection: customers index: email_1 dup key: { email: \"ada@example.com\" }"
        );
    }

    #[test]
    fn idents_are_restricted() {
        assert!(validate_ident("customers"));
        assert!(validate_ident("_tmp_1"));
        assert!(!validate_ident("1abc"));
        assert!(!validate_ident("orders; DROP TABLE x"));
        assert!(!validate_ident(""));
    }
}
