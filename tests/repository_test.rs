//! Repository behavior against the in-memory store
//! Run with: cargo test --test repository_test

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use zetsu_site::application::errors::StoreError;
use zetsu_site::application::services::repository::{SOFTWARES, VISITORS};
use zetsu_site::application::services::SiteRepository;
use zetsu_site::domain::entities::{Icon, LocationMethod, NewVisitor, Software, SoftwarePatch, VisitorPatch};
use zetsu_site::domain::traits::DocumentStore;
use zetsu_site::infrastructure::storage::MemoryStore;

/// Store that rejects every request
struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn get(&self, _path: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Network("connection refused".to_string()))
    }

    async fn push(&self, _collection: &str, _value: &Value) -> Result<String, StoreError> {
        Err(StoreError::Network("connection refused".to_string()))
    }

    async fn patch(&self, _path: &str, _value: &Value) -> Result<(), StoreError> {
        Err(StoreError::Network("connection refused".to_string()))
    }

    async fn delete(&self, _path: &str) -> Result<(), StoreError> {
        Err(StoreError::Network("connection refused".to_string()))
    }
}

fn setup() -> (MemoryStore, SiteRepository) {
    let store = MemoryStore::new();
    let repository = SiteRepository::new(Arc::new(store.clone()));
    (store, repository)
}

fn visitor(city: &str, minutes_ago: i64) -> NewVisitor {
    NewVisitor {
        ip: "203.0.113.7".to_string(),
        city: city.to_string(),
        country: "France".to_string(),
        country_code: "FR".to_string(),
        isp: "Orange".to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() - Duration::minutes(minutes_ago),
        user_agent: "test-agent".to_string(),
    }
}

#[tokio::test]
async fn test_empty_store_reads_empty() {
    let (_, repository) = setup();
    assert!(repository.get_all().await.is_empty());
    assert!(repository.get_visitors().await.is_empty());
}

#[tokio::test]
async fn test_create_returns_id_and_record_reads_back() {
    let (store, repository) = setup();
    let software = Software::new("Zetsu Ghost VPN");

    let id = repository.create(&software).await.unwrap();
    assert!(!id.is_empty());
    assert_eq!(store.len(SOFTWARES).await, 1);

    let all = repository.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id.as_deref(), Some(id.as_str()));
    assert_eq!(all[0].name, "Zetsu Ghost VPN");
}

#[tokio::test]
async fn test_create_ignores_caller_id() {
    let (store, repository) = setup();
    let software = Software::new("Zetsu KeyVault").with_id("chosen-by-caller");

    let id = repository.create(&software).await.unwrap();
    assert_ne!(id, "chosen-by-caller");

    let raw = store.get(&format!("{}/{}", SOFTWARES, id)).await.unwrap().unwrap();
    assert!(raw.get("id").is_none());
}

#[tokio::test]
async fn test_update_merges_only_given_fields() {
    let (_, repository) = setup();
    let mut software = Software::new("Zetsu System Boost");
    software.version = "1.0.0".to_string();
    let id = repository.create(&software).await.unwrap();

    let patch = SoftwarePatch {
        version: Some("1.1.0".to_string()),
        ..Default::default()
    };
    repository.update(&id, &patch).await.unwrap();

    let all = repository.get_all().await;
    assert_eq!(all[0].version, "1.1.0");
    assert_eq!(all[0].name, "Zetsu System Boost");
}

#[tokio::test]
async fn test_delete_removes_record() {
    let (_, repository) = setup();
    let keep = repository.create(&Software::new("keep")).await.unwrap();
    let drop = repository.create(&Software::new("drop")).await.unwrap();

    repository.delete(&drop).await.unwrap();

    let ids: Vec<_> = repository.get_all().await.into_iter().filter_map(|s| s.id).collect();
    assert_eq!(ids, vec![keep]);
}

#[tokio::test]
async fn test_unreadable_record_is_skipped() {
    let (store, repository) = setup();
    repository.create(&Software::new("ok")).await.unwrap();
    store
        .push(SOFTWARES, &json!({ "name": "bad", "features": "not a list" }))
        .await
        .unwrap();

    let all = repository.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "ok");
}

#[tokio::test]
async fn test_legacy_records_read_with_defaults() {
    let (store, repository) = setup();
    store
        .push(SOFTWARES, &json!({ "name": "Legacy", "iconName": "Banana" }))
        .await
        .unwrap();

    let all = repository.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Legacy");
    assert_eq!(all[0].icon_name, Icon::ShieldAlert);
}

#[tokio::test]
async fn test_load_catalog_does_not_seed_over_legacy_records() {
    let (store, repository) = setup();
    store
        .push(SOFTWARES, &json!({ "name": "Legacy", "iconName": "Shield" }))
        .await
        .unwrap();
    store
        .push(SOFTWARES, &json!({ "tagline": "no name field", "iconName": "Lock" }))
        .await
        .unwrap();

    let catalog = repository.load_catalog().await;
    assert_eq!(store.len(SOFTWARES).await, 2);
    assert_eq!(catalog.len(), 2);
    assert!(catalog.iter().all(|s| s.id.is_some()));
    let legacy = catalog.iter().find(|s| s.name == "Legacy").unwrap();
    assert_eq!(legacy.icon_name, Icon::ShieldAlert);
    let unnamed = catalog.iter().find(|s| s.name.is_empty()).unwrap();
    assert_eq!(unnamed.icon_name, Icon::Lock);
}

#[tokio::test]
async fn test_load_catalog_does_not_seed_over_unreadable_records() {
    let (store, repository) = setup();
    store.push(SOFTWARES, &json!("garbage")).await.unwrap();

    let catalog = repository.load_catalog().await;
    assert!(catalog.is_empty());
    assert_eq!(store.len(SOFTWARES).await, 1);
}

#[tokio::test]
async fn test_visitor_logged_with_ip_method_and_enriched() {
    let (store, repository) = setup();
    let id = repository.log_visitor(&visitor("Paris", 0)).await.unwrap();

    let raw = store.get(&format!("{}/{}", VISITORS, id)).await.unwrap().unwrap();
    assert_eq!(raw["locationMethod"], "IP");
    assert_eq!(raw["countryCode"], "FR");

    repository.update_visitor(&id, &VisitorPatch::gps(48.85, 2.35, 20.0)).await;

    let visitors = repository.get_visitors().await;
    assert_eq!(visitors.len(), 1);
    assert_eq!(visitors[0].id, id);
    assert_eq!(visitors[0].location_method, Some(LocationMethod::Gps));
    assert_eq!(visitors[0].coordinates(), Some((48.85, 2.35)));
    assert_eq!(visitors[0].city, "Paris");
}

#[tokio::test]
async fn test_visitors_newest_first() {
    let (_, repository) = setup();
    repository.log_visitor(&visitor("Lyon", 30)).await.unwrap();
    repository.log_visitor(&visitor("Paris", 0)).await.unwrap();
    repository.log_visitor(&visitor("Nice", 90)).await.unwrap();

    let cities: Vec<_> = repository.get_visitors().await.into_iter().map(|v| v.city).collect();
    assert_eq!(cities, vec!["Paris", "Lyon", "Nice"]);
}

#[tokio::test]
async fn test_load_catalog_seeds_empty_store_once() {
    let (store, repository) = setup();

    let first = repository.load_catalog().await;
    assert_eq!(first.len(), 4);
    assert!(first.iter().all(|s| s.id.is_some()));

    let second = repository.load_catalog().await;
    assert_eq!(second.len(), 4);
    assert_eq!(store.len(SOFTWARES).await, 4);
}

#[tokio::test]
async fn test_load_catalog_keeps_existing_products() {
    let (_, repository) = setup();
    let mut custom = Software::new("Zetsu Custom");
    custom.icon_name = Icon::Server;
    repository.create(&custom).await.unwrap();

    let catalog = repository.load_catalog().await;
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].icon_name, Icon::Server);
}

#[tokio::test]
async fn test_broken_store_reads_empty_and_writes_fail() {
    let repository = SiteRepository::new(Arc::new(BrokenStore));

    assert!(repository.get_all().await.is_empty());
    assert!(repository.get_visitors().await.is_empty());
    assert!(repository.load_catalog().await.is_empty());
    assert!(repository.log_visitor(&visitor("Paris", 0)).await.is_none());
    repository.update_visitor("x", &VisitorPatch::gps(0.0, 0.0, 1.0)).await;

    assert!(repository.create(&Software::new("x")).await.is_err());
    assert!(repository.update("x", &SoftwarePatch::default()).await.is_err());
    assert!(repository.delete("x").await.is_err());
}
