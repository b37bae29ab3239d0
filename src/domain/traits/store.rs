use async_trait::async_trait;
use serde_json::Value;

use crate::application::errors::StoreError;

/// Remote JSON document store addressed by slash-separated paths
/// (`softwares`, `softwares/{id}`).
///
/// Writes follow last-write-wins; there is no transaction support.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the value at `path`, `None` when nothing is stored there
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Append a child under `collection` and return the generated key
    async fn push(&self, collection: &str, value: &Value) -> Result<String, StoreError>;

    /// Merge the top-level keys of `value` into the document at `path`
    async fn patch(&self, path: &str, value: &Value) -> Result<(), StoreError>;

    /// Remove the document at `path`
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

/// Key-value storage scoped to one browsing session
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str);
}
