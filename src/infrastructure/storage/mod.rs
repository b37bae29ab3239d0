//! In-process storage implementations

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StoreError;
use crate::domain::traits::{DocumentStore, SessionStore};

type Collection = BTreeMap<String, Value>;

/// In-memory document store with the same path and merge rules as the
/// remote database. Generated keys sort in insertion order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
    next_key: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map(|c| c.len()).unwrap_or(0)
    }

    fn generate_key(&self) -> String {
        let n = self.next_key.fetch_add(1, Ordering::SeqCst);
        format!("-M{:016}", n)
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let parts = split_path(path);
        let collections = self.collections.read().await;

        let Some((name, rest)) = parts.split_first() else {
            return Ok(None);
        };
        let Some(collection) = collections.get(*name) else {
            return Ok(None);
        };

        let Some((id, fields)) = rest.split_first() else {
            if collection.is_empty() {
                return Ok(None);
            }
            let object: Map<String, Value> = collection.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            return Ok(Some(Value::Object(object)));
        };

        let mut current = collection.get(*id);
        for field in fields {
            current = current.and_then(|v| v.get(*field));
        }
        Ok(current.filter(|v| !v.is_null()).cloned())
    }

    async fn push(&self, collection: &str, value: &Value) -> Result<String, StoreError> {
        let parts = split_path(collection);
        if parts.len() != 1 {
            return Err(StoreError::Status {
                status: 400,
                body: format!("cannot push under {}", collection),
            });
        }
        let key = self.generate_key();
        let mut collections = self.collections.write().await;
        collections
            .entry(parts[0].to_string())
            .or_default()
            .insert(key.clone(), value.clone());
        Ok(key)
    }

    async fn patch(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        let parts = split_path(path);
        let (name, id) = match parts.as_slice() {
            [name, id] => (*name, *id),
            _ => {
                return Err(StoreError::Status {
                    status: 400,
                    body: format!("unsupported patch path {}", path),
                })
            }
        };
        let Value::Object(fields) = value else {
            return Err(StoreError::Status {
                status: 400,
                body: "patch body must be an object".to_string(),
            });
        };

        let mut collections = self.collections.write().await;
        let doc = collections
            .entry(name.to_string())
            .or_default()
            .entry(id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !doc.is_object() {
            *doc = Value::Object(Map::new());
        }
        if let Value::Object(existing) = doc {
            for (key, v) in fields {
                if v.is_null() {
                    existing.remove(key);
                } else {
                    existing.insert(key.clone(), v.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let parts = split_path(path);
        let mut collections = self.collections.write().await;
        match parts.as_slice() {
            [name] => {
                collections.remove(*name);
            }
            [name, id] => {
                if let Some(collection) = collections.get_mut(*name) {
                    collection.remove(*id);
                }
            }
            _ => {
                return Err(StoreError::Status {
                    status: 400,
                    body: format!("unsupported delete path {}", path),
                })
            }
        }
        Ok(())
    }
}

/// Session storage living as long as the process
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    kv: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        let kv = self.kv.read().await;
        kv.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) {
        let mut kv = self.kv.write().await;
        kv.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_collection_reads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("softwares").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_push_keys_keep_insertion_order() {
        let store = MemoryStore::new();
        let first = store.push("softwares", &json!({ "name": "a" })).await.unwrap();
        let second = store.push("softwares", &json!({ "name": "b" })).await.unwrap();
        assert!(first < second);

        let all = store.get("softwares").await.unwrap().unwrap();
        let keys: Vec<_> = all.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec![first, second]);
    }

    #[tokio::test]
    async fn test_patch_merges_top_level_keys() {
        let store = MemoryStore::new();
        let id = store
            .push("softwares", &json!({ "name": "a", "version": "1", "requirements": { "os": "x", "ram": "1" } }))
            .await
            .unwrap();

        store
            .patch(&format!("softwares/{}", id), &json!({ "version": "2", "requirements": { "os": "y" } }))
            .await
            .unwrap();

        let doc = store.get(&format!("softwares/{}", id)).await.unwrap().unwrap();
        assert_eq!(doc, json!({ "name": "a", "version": "2", "requirements": { "os": "y" } }));
        assert_eq!(
            store.get(&format!("softwares/{}/requirements/os", id)).await.unwrap(),
            Some(json!("y"))
        );
    }

    #[tokio::test]
    async fn test_patch_null_removes_key() {
        let store = MemoryStore::new();
        let id = store.push("visitors", &json!({ "ip": "1.1.1.1", "city": "Nice" })).await.unwrap();
        store.patch(&format!("visitors/{}", id), &json!({ "city": null })).await.unwrap();
        let doc = store.get(&format!("visitors/{}", id)).await.unwrap().unwrap();
        assert_eq!(doc, json!({ "ip": "1.1.1.1" }));
    }

    #[tokio::test]
    async fn test_delete_document() {
        let store = MemoryStore::new();
        let id = store.push("softwares", &json!({ "name": "a" })).await.unwrap();
        store.delete(&format!("softwares/{}", id)).await.unwrap();
        assert_eq!(store.len("softwares").await, 0);
        assert_eq!(store.get("softwares").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_session_store() {
        let session = MemorySessionStore::new();
        assert_eq!(session.get("zetsu_visitor_id").await, None);
        session.set("zetsu_visitor_id", "-M1").await;
        assert_eq!(session.get("zetsu_visitor_id").await, Some("-M1".to_string()));
    }
}
