//! Visitor tracking and precise-location consent
//! Run with: cargo test --test visitor_tracking_test

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use zetsu_site::application::errors::{GeoError, GeolocationError, StoreError};
use zetsu_site::application::services::repository::VISITORS;
use zetsu_site::application::services::visitor_service::SESSION_KEY;
use zetsu_site::application::services::{ConsentOutcome, SiteRepository, TrackOutcome, TrackingState, VisitorTracker};
use zetsu_site::application::shell::AppShell;
use zetsu_site::domain::entities::{LocationMethod, View};
use zetsu_site::domain::traits::{
    DeviceLocator, DocumentStore, IpLocation, IpLocator, Position, PositionOptions, SessionStore,
};
use zetsu_site::infrastructure::storage::{MemorySessionStore, MemoryStore};

struct FixedIp {
    calls: AtomicUsize,
}

impl FixedIp {
    fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl IpLocator for FixedIp {
    async fn locate(&self) -> Result<IpLocation, GeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(IpLocation {
            ip: "198.51.100.4".to_string(),
            city: "Lyon".to_string(),
            country: "France".to_string(),
            country_code: "FR".to_string(),
            isp: "Free SAS".to_string(),
        })
    }
}

struct OfflineIp;

#[async_trait]
impl IpLocator for OfflineIp {
    async fn locate(&self) -> Result<IpLocation, GeoError> {
        Err(GeoError::Network("dns failure".to_string()))
    }
}

enum Device {
    Fix(Position),
    Deny,
    Hang,
}

#[async_trait]
impl DeviceLocator for Device {
    async fn current_position(&self, options: PositionOptions) -> Result<Position, GeolocationError> {
        assert!(options.enable_high_accuracy);
        assert_eq!(options.maximum_age, Duration::ZERO);
        match self {
            Device::Fix(pos) => Ok(*pos),
            Device::Deny => Err(GeolocationError::PermissionDenied),
            Device::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(GeolocationError::Unsupported)
            }
        }
    }
}

/// Store that refuses writes
struct ReadOnlyStore;

#[async_trait]
impl DocumentStore for ReadOnlyStore {
    async fn get(&self, _path: &str) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }

    async fn push(&self, _collection: &str, _value: &Value) -> Result<String, StoreError> {
        Err(StoreError::Status {
            status: 401,
            body: "Permission denied".to_string(),
        })
    }

    async fn patch(&self, _path: &str, _value: &Value) -> Result<(), StoreError> {
        Err(StoreError::Status {
            status: 401,
            body: "Permission denied".to_string(),
        })
    }

    async fn delete(&self, _path: &str) -> Result<(), StoreError> {
        Err(StoreError::Status {
            status: 401,
            body: "Permission denied".to_string(),
        })
    }
}

const PARIS: Position = Position {
    latitude: 48.8566,
    longitude: 2.3522,
    accuracy: 15.0,
};

struct Fixture {
    store: MemoryStore,
    session: Arc<MemorySessionStore>,
    tracker: VisitorTracker,
}

fn fixture(ip: Arc<dyn IpLocator>, device: Device) -> Fixture {
    let store = MemoryStore::new();
    let session = Arc::new(MemorySessionStore::new());
    let tracker = VisitorTracker::new(
        SiteRepository::new(Arc::new(store.clone())),
        session.clone(),
        ip,
        Arc::new(device),
    )
    .with_user_agent("Mozilla/5.0 (test)");
    Fixture { store, session, tracker }
}

#[tokio::test]
async fn test_first_visit_is_logged_once() {
    let ip = FixedIp::new();
    let f = fixture(ip.clone(), Device::Deny);

    let outcome = f.tracker.track().await;
    let TrackOutcome::Logged(id) = outcome else {
        panic!("expected a logged visit, got {:?}", outcome);
    };
    assert_eq!(f.session.get(SESSION_KEY).await, Some(id.clone()));
    assert_eq!(f.tracker.state(), TrackingState::IpLogged { visitor_id: id.clone() });

    // Navigation or a reload within the session must not log again
    assert_eq!(f.tracker.track().await, TrackOutcome::Resumed(id));
    assert_eq!(f.store.len(VISITORS).await, 1);
    assert_eq!(ip.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_logged_entry_fields() {
    let f = fixture(FixedIp::new(), Device::Deny);
    f.tracker.track().await;

    let repository = SiteRepository::new(Arc::new(f.store.clone()));
    let visitors = repository.get_visitors().await;
    assert_eq!(visitors.len(), 1);
    let entry = &visitors[0];
    assert_eq!(entry.city, "Lyon");
    assert_eq!(entry.isp, "Free SAS");
    assert_eq!(entry.user_agent, "Mozilla/5.0 (test)");
    assert_eq!(entry.location_method, Some(LocationMethod::Ip));
    assert_eq!(entry.coordinates(), None);
}

#[tokio::test]
async fn test_lookup_failure_leaves_session_untracked() {
    let f = fixture(Arc::new(OfflineIp), Device::Deny);

    assert_eq!(f.tracker.track().await, TrackOutcome::Skipped);
    assert_eq!(f.tracker.state(), TrackingState::NotTracked);
    assert_eq!(f.session.get(SESSION_KEY).await, None);
    assert_eq!(f.store.len(VISITORS).await, 0);
    assert_eq!(f.tracker.enable_precise_location().await, ConsentOutcome::NotLogged);
}

#[tokio::test]
async fn test_rejected_write_leaves_session_untracked() {
    let ip = FixedIp::new();
    let session = Arc::new(MemorySessionStore::new());
    let repository = SiteRepository::new(Arc::new(ReadOnlyStore));
    let tracker = VisitorTracker::new(repository.clone(), session.clone(), ip.clone(), Arc::new(Device::Fix(PARIS)));
    let mut shell = AppShell::new(repository, Arc::new(tracker), "admin").with_consent_delay(Duration::ZERO);

    let outcome = shell.start_tracking().await.unwrap();
    assert_eq!(outcome, TrackOutcome::Skipped);
    assert_eq!(ip.calls.load(Ordering::SeqCst), 1);
    assert_eq!(shell.tracker().state(), TrackingState::NotTracked);
    assert_eq!(session.get(SESSION_KEY).await, None);

    tokio::time::sleep(Duration::from_millis(100)).await;
    shell.poll_events();
    assert!(!shell.location_prompt_visible());
    assert_eq!(shell.tracker().enable_precise_location().await, ConsentOutcome::NotLogged);
}

#[tokio::test]
async fn test_consent_enriches_entry() {
    let f = fixture(FixedIp::new(), Device::Fix(PARIS));
    f.tracker.track().await;

    assert_eq!(f.tracker.enable_precise_location().await, ConsentOutcome::Enriched(PARIS));
    assert!(matches!(f.tracker.state(), TrackingState::GpsEnriched { .. }));

    let visitors = SiteRepository::new(Arc::new(f.store.clone())).get_visitors().await;
    assert!(visitors[0].is_gps());
    assert_eq!(visitors[0].coordinates(), Some((48.8566, 2.3522)));
    assert_eq!(visitors[0].accuracy, Some(15.0));
    assert_eq!(visitors[0].city, "Lyon");

    assert_eq!(f.tracker.enable_precise_location().await, ConsentOutcome::AlreadyEnriched);
}

#[tokio::test]
async fn test_denied_consent_keeps_ip_entry() {
    let f = fixture(FixedIp::new(), Device::Deny);
    f.tracker.track().await;

    assert_eq!(
        f.tracker.enable_precise_location().await,
        ConsentOutcome::Failed(GeolocationError::PermissionDenied)
    );
    let visitors = SiteRepository::new(Arc::new(f.store.clone())).get_visitors().await;
    assert_eq!(visitors[0].location_method, Some(LocationMethod::Ip));
}

#[tokio::test]
async fn test_device_timeout() {
    let f = fixture(FixedIp::new(), Device::Hang);
    let tracker = f.tracker.with_device_timeout(Duration::from_millis(50));
    tracker.track().await;

    assert_eq!(
        tracker.enable_precise_location().await,
        ConsentOutcome::Failed(GeolocationError::Timeout)
    );
}

#[tokio::test]
async fn test_prompt_appears_after_delay_on_public_pages_only() {
    let f = fixture(FixedIp::new(), Device::Fix(PARIS));
    let repository = SiteRepository::new(Arc::new(f.store.clone()));
    let mut shell = AppShell::new(repository, Arc::new(f.tracker), "admin")
        .with_consent_delay(Duration::from_millis(300));

    let handle = shell.start_tracking();
    tokio::time::sleep(Duration::from_millis(50)).await;
    shell.poll_events();
    assert!(!shell.location_prompt_visible());

    let outcome = handle.await.unwrap();
    assert!(matches!(outcome, TrackOutcome::Logged(_)));
    shell.poll_events();
    assert!(shell.location_prompt_visible());

    shell.navigate(View::Admin);
    assert!(!shell.location_prompt_visible());
    shell.navigate(View::Contact);
    assert!(shell.location_prompt_visible());

    assert_eq!(shell.accept_location().await, ConsentOutcome::Enriched(PARIS));
    assert!(!shell.location_prompt_visible());
    assert!(shell.take_notice().is_some());
    assert!(shell.take_notice().is_none());
}

#[tokio::test]
async fn test_no_prompt_for_resumed_session() {
    let f = fixture(FixedIp::new(), Device::Deny);
    f.session.set(SESSION_KEY, "-Mexisting").await;
    let repository = SiteRepository::new(Arc::new(f.store.clone()));
    let mut shell = AppShell::new(repository, Arc::new(f.tracker), "admin").with_consent_delay(Duration::ZERO);

    let outcome = shell.start_tracking().await.unwrap();
    assert_eq!(outcome, TrackOutcome::Resumed("-Mexisting".to_string()));
    tokio::time::sleep(Duration::from_millis(100)).await;
    shell.poll_events();
    assert!(!shell.location_prompt_visible());
}

#[tokio::test]
async fn test_dismiss_prompt() {
    let f = fixture(FixedIp::new(), Device::Deny);
    let repository = SiteRepository::new(Arc::new(f.store.clone()));
    let mut shell = AppShell::new(repository, Arc::new(f.tracker), "admin").with_consent_delay(Duration::ZERO);

    shell.start_tracking().await.unwrap();
    shell.poll_events();
    assert!(shell.location_prompt_visible());
    shell.dismiss_location_prompt();
    assert!(!shell.location_prompt_visible());
}
