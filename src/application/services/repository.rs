//! Data access for product records and visitor logs.
//!
//! Reads never fail: a broken store reads as empty. Product writes are
//! user-initiated and propagate their errors. Visitor writes run in the
//! background and are best-effort.

use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::application::errors::StoreError;
use crate::application::services::seed::SEED_CATALOG;
use crate::domain::entities::visitor::IpVisitorRecord;
use crate::domain::entities::{LocationMethod, NewVisitor, Software, SoftwarePatch, VisitorLog, VisitorPatch};
use crate::domain::traits::DocumentStore;

pub const SOFTWARES: &str = "softwares";
pub const VISITORS: &str = "visitors";

/// Typed access to the `softwares` and `visitors` collections
#[derive(Clone)]
pub struct SiteRepository {
    store: Arc<dyn DocumentStore>,
}

impl SiteRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every product, in store key order. Empty on any failure.
    pub async fn get_all(&self) -> Vec<Software> {
        match self.store.get(SOFTWARES).await {
            Ok(value) => collect_records(value, |id, mut software: Software| {
                software.id = Some(id);
                software
            }),
            Err(e) => {
                tracing::error!("Firebase fetch error: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist a new product and return its store-assigned id
    pub async fn create(&self, software: &Software) -> Result<String, StoreError> {
        if software.id.is_some() {
            tracing::debug!("Ignoring id on create for {}", software.name);
        }
        let body = serde_json::to_value(software.as_draft())?;
        self.store.push(SOFTWARES, &body).await.map_err(|e| {
            tracing::error!("Firebase create error: {}", e);
            e
        })
    }

    /// Merge the fields present in `patch` into product `id`
    pub async fn update(&self, id: &str, patch: &SoftwarePatch) -> Result<(), StoreError> {
        let body = serde_json::to_value(patch)?;
        self.store.patch(&format!("{}/{}", SOFTWARES, id), &body).await.map_err(|e| {
            tracing::error!("Firebase update error: {}", e);
            e
        })
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(&format!("{}/{}", SOFTWARES, id)).await.map_err(|e| {
            tracing::error!("Firebase delete error: {}", e);
            e
        })
    }

    /// Record an IP-located visit. `None` when anything went wrong; callers
    /// are free to ignore the outcome.
    pub async fn log_visitor(&self, visitor: &NewVisitor) -> Option<String> {
        let record = IpVisitorRecord {
            visitor,
            location_method: LocationMethod::Ip,
        };
        let body = match serde_json::to_value(&record) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Visitor log error: {}", e);
                return None;
            }
        };
        match self.store.push(VISITORS, &body).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("Visitor log error: {}", e);
                None
            }
        }
    }

    /// Merge fields into an existing visit. Failures are only logged.
    pub async fn update_visitor(&self, id: &str, patch: &VisitorPatch) {
        let result = match serde_json::to_value(patch) {
            Ok(body) => self.store.patch(&format!("{}/{}", VISITORS, id), &body).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::error!("Visitor update error: {}", e);
        }
    }

    /// All visits, newest first. Empty on any failure.
    pub async fn get_visitors(&self) -> Vec<VisitorLog> {
        match self.store.get(VISITORS).await {
            Ok(value) => {
                let mut visitors = collect_records(value, |id, mut log: VisitorLog| {
                    log.id = id;
                    log
                });
                visitors.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                visitors
            }
            Err(e) => {
                tracing::error!("Fetch visitors error: {}", e);
                Vec::new()
            }
        }
    }

    /// Load the catalog, inserting the default products first when the
    /// store is empty.
    ///
    /// Two first loads racing each other can both see an empty store and
    /// both seed.
    pub async fn load_catalog(&self) -> Vec<Software> {
        if self.has_products().await {
            return self.get_all().await;
        }

        tracing::info!("Database empty, seeding initial data...");
        let mut tasks = JoinSet::new();
        for software in SEED_CATALOG.iter().cloned() {
            let repo = self.clone();
            tasks.spawn(async move { repo.create(&software).await });
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(id)) => tracing::debug!("Seeded product {}", id),
                Ok(Err(e)) => tracing::error!("Error seeding product: {}", e),
                Err(e) => tracing::error!("Seeding task failed: {}", e),
            }
        }

        self.get_all().await
    }

    /// Whether the product collection holds any entry, readable or not
    async fn has_products(&self) -> bool {
        match self.store.get(SOFTWARES).await {
            Ok(Some(Value::Object(entries))) => !entries.is_empty(),
            Ok(_) => false,
            Err(e) => {
                tracing::error!("Firebase fetch error: {}", e);
                false
            }
        }
    }
}

/// Turn a `{ id: record }` object into records, skipping malformed entries
fn collect_records<T, F>(value: Option<Value>, attach_id: F) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
    F: Fn(String, T) -> T,
{
    let Some(Value::Object(entries)) = value else {
        return Vec::new();
    };

    entries
        .into_iter()
        .filter_map(|(id, raw)| match serde_json::from_value::<T>(raw) {
            Ok(record) => Some(attach_id(id, record)),
            Err(e) => {
                tracing::warn!("Skipping malformed record {}: {}", id, e);
                None
            }
        })
        .collect()
}
