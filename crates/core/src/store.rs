//! Document store collaborator.
//!
//! The services in this crate persist JSON documents in named collections through the
//! [`DocumentStore`] trait. Queries support equality and the inclusive range operators
//! needed for title prefix matching. [`MemoryStore`] is the in-process implementation used
//! by the server binary and the tests.

use crate::error::{RecipeError, RecipeResult};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ge,
    Le,
}

/// A single `field op value` condition. All filters in a query must hold.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Ge,
            value: value.into(),
        }
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Le,
            value: value.into(),
        }
    }

    fn is_range(&self) -> bool {
        matches!(self.op, FilterOp::Ge | FilterOp::Le)
    }

    fn matches(&self, doc: &Value) -> bool {
        let Some(actual) = doc.get(&self.field) else {
            return false;
        };
        match (self.op, compare(actual, &self.value)) {
            (FilterOp::Eq, Some(Ordering::Equal)) => true,
            (FilterOp::Ge, Some(Ordering::Greater | Ordering::Equal)) => true,
            (FilterOp::Le, Some(Ordering::Less | Ordering::Equal)) => true,
            _ => false,
        }
    }
}

/// Orders two JSON scalars of the same kind. Strings compare by code point, as the
/// hosted store does; mixed kinds are incomparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// A stored document and its id.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `doc` under a store-generated id and returns the id.
    async fn create(&self, collection: &str, doc: Value) -> RecipeResult<String>;

    /// Stores `doc` under a caller-chosen id, replacing any existing document.
    async fn set(&self, collection: &str, id: &str, doc: Value) -> RecipeResult<()>;

    async fn get(&self, collection: &str, id: &str) -> RecipeResult<Option<Value>>;

    /// Shallow-merges the top-level fields of `patch` into an existing document.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> RecipeResult<()>;

    /// Removes a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> RecipeResult<()>;

    async fn query(&self, collection: &str, filters: &[Filter]) -> RecipeResult<Vec<Document>>;
}

type Collections = HashMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of documents in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.read().get(collection).map_or(0, BTreeMap::len)
    }
}

fn ensure_object(doc: &Value) -> RecipeResult<()> {
    if doc.is_object() {
        Ok(())
    } else {
        Err(RecipeError::InvalidInput(
            "documents must be JSON objects".into(),
        ))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, doc: Value) -> RecipeResult<String> {
        ensure_object(&doc)?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, doc: Value) -> RecipeResult<()> {
        ensure_object(&doc)?;
        self.write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> RecipeResult<Option<Value>> {
        Ok(self
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> RecipeResult<()> {
        let Value::Object(patch) = patch else {
            return Err(RecipeError::InvalidInput(
                "update patch must be a JSON object".into(),
            ));
        };

        let mut collections = self.write();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| RecipeError::not_found(format!("{collection}/{id}")))?;

        for (key, value) in patch {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> RecipeResult<()> {
        if let Some(docs) = self.write().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, filters: &[Filter]) -> RecipeResult<Vec<Document>> {
        let collections = self.read();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<Document> = docs
            .iter()
            .filter(|(_, data)| filters.iter().all(|f| f.matches(data)))
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect();

        // Range queries come back ordered by the ranged field; ties and plain equality
        // queries keep id order.
        if let Some(range) = filters.iter().find(|f| f.is_range()) {
            let field = range.field.as_str();
            results.sort_by(|a, b| {
                let ord = match (a.data.get(field), b.data.get(field)) {
                    (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                ord.then_with(|| a.id.cmp(&b.id))
            });
        }

        Ok(results)
    }
}
