//! Shell navigation, catalog loading and the back-office
//! Run with: cargo test --test site_flow_test

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use zetsu_site::application::errors::{GeoError, GeolocationError, SiteError};
use zetsu_site::application::services::repository::SOFTWARES;
use zetsu_site::application::services::{AdminDashboard, AdminTab, SiteRepository, VisitorTracker};
use zetsu_site::application::shell::AppShell;
use zetsu_site::domain::entities::{Icon, NewVisitor, Platform, View, VisitorPatch};
use zetsu_site::domain::traits::{DeviceLocator, IpLocation, IpLocator, Position, PositionOptions};
use zetsu_site::infrastructure::adapters::console::pages;
use zetsu_site::infrastructure::storage::{MemorySessionStore, MemoryStore};

struct NoIp;

#[async_trait]
impl IpLocator for NoIp {
    async fn locate(&self) -> Result<IpLocation, GeoError> {
        Err(GeoError::Status(503))
    }
}

struct NoDevice;

#[async_trait]
impl DeviceLocator for NoDevice {
    async fn current_position(&self, _options: PositionOptions) -> Result<Position, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

fn shell_over(store: &MemoryStore) -> AppShell {
    let repository = SiteRepository::new(Arc::new(store.clone()));
    let tracker = VisitorTracker::new(
        repository.clone(),
        Arc::new(MemorySessionStore::new()),
        Arc::new(NoIp),
        Arc::new(NoDevice),
    );
    AppShell::new(repository, Arc::new(tracker), "zetsu-admin")
}

fn visit(country: &str) -> NewVisitor {
    NewVisitor {
        ip: "192.0.2.1".to_string(),
        city: "Ville".to_string(),
        country: country.to_string(),
        country_code: "XX".to_string(),
        isp: "ISP".to_string(),
        timestamp: Utc::now(),
        user_agent: "test".to_string(),
    }
}

#[tokio::test]
async fn test_first_load_seeds_and_detail_shows_product() {
    let store = MemoryStore::new();
    let mut shell = shell_over(&store);
    assert!(shell.is_loading());
    assert_eq!(shell.view(), View::Home);

    shell.load().await;
    assert!(!shell.is_loading());
    assert_eq!(shell.softwares().len(), 4);
    assert_eq!(store.len(SOFTWARES).await, 4);

    let vpn_id = shell
        .softwares()
        .iter()
        .find(|s| s.name == "Zetsu Ghost VPN")
        .and_then(|s| s.id.clone())
        .unwrap();

    let resets = shell.scroll_resets();
    let selected = shell.select_software(&vpn_id).unwrap();
    assert_eq!(selected.icon_name, Icon::Globe);
    assert!(!selected.full_description.is_empty());
    assert!(!selected.requirements.os.is_empty());
    assert_eq!(shell.view(), View::Detail);
    assert_eq!(shell.scroll_resets(), resets + 1);

    let page = pages::render(&shell);
    let selected = shell.selected().unwrap();
    assert!(page.contains(&selected.full_description));
    assert!(page.contains(&selected.requirements.os));
    assert!(page.contains("Configuration Requise"));
}

#[tokio::test]
async fn test_select_unknown_product() {
    let store = MemoryStore::new();
    let mut shell = shell_over(&store);
    shell.load().await;

    assert!(matches!(shell.select_software("missing"), Err(SiteError::NotFound(_))));
    assert_eq!(shell.view(), View::Home);
}

#[tokio::test]
async fn test_every_view_renders() {
    let store = MemoryStore::new();
    let mut shell = shell_over(&store);
    shell.load().await;

    let views = [
        View::Home,
        View::Downloads,
        View::Product(Platform::Windows),
        View::Product(Platform::MacOs),
        View::Product(Platform::Android),
        View::Product(Platform::Ios),
        View::SupportHelp,
        View::SupportKb,
        View::SupportStatus,
        View::Contact,
        View::LegalPrivacy,
        View::LegalTerms,
        View::LegalCookies,
    ];
    for view in views {
        shell.navigate(view);
        let page = pages::render(&shell);
        assert!(page.contains("ZETSU"), "{} is missing the navbar", view);
        assert!(page.contains("Légal"), "{} is missing the footer", view);
    }

    shell.navigate(View::Admin);
    let page = pages::render(&shell);
    assert!(!page.contains("Légal"));
    assert!(page.contains("/login"));
}

#[tokio::test]
async fn test_admin_requires_passphrase() {
    let store = MemoryStore::new();
    let mut shell = shell_over(&store);
    shell.load().await;

    let err = shell.admin_login("wrong").await.unwrap_err();
    assert!(matches!(err, SiteError::Auth(_)));
    assert!(!shell.admin().is_authenticated());

    let mut draft = AdminDashboard::new_draft();
    draft.name = "Unauthorized".to_string();
    assert!(matches!(shell.save_software(draft).await, Err(SiteError::Auth(_))));
    assert_eq!(store.len(SOFTWARES).await, 4);
}

#[tokio::test]
async fn test_admin_crud() {
    let store = MemoryStore::new();
    let mut shell = shell_over(&store);
    shell.load().await;
    shell.navigate(View::Admin);
    shell.admin_login("zetsu-admin").await.unwrap();

    // Create
    let mut draft = AdminDashboard::new_draft();
    assert_eq!(draft.version, "1.0.0");
    assert_eq!(draft.icon_name, Icon::ShieldAlert);
    draft.name = "Zetsu Sentinel".to_string();
    draft.features = vec!["Surveillance réseau".to_string()];
    let created = shell.save_software(draft).await.unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(shell.softwares().len(), 5);
    assert_eq!(store.len(SOFTWARES).await, 5);

    // Update
    let mut edited = created.clone();
    edited.version = "1.0.1".to_string();
    edited.icon_name = Icon::Server;
    shell.save_software(edited).await.unwrap();
    let reloaded = SiteRepository::new(Arc::new(store.clone())).get_all().await;
    let stored = reloaded.iter().find(|s| s.id.as_deref() == Some(id.as_str())).unwrap();
    assert_eq!(stored.version, "1.0.1");
    assert_eq!(stored.icon_name, Icon::Server);
    assert_eq!(stored.features, vec!["Surveillance réseau"]);
    assert_eq!(shell.softwares().len(), 5);

    // Blank name is rejected
    let mut blank = created.clone();
    blank.name = "  ".to_string();
    assert!(matches!(shell.save_software(blank).await, Err(SiteError::Validation(_))));

    // Delete clears a stale selection
    shell.select_software(&id).unwrap();
    shell.delete_software(&id).await.unwrap();
    assert!(shell.selected().is_none());
    assert_eq!(shell.softwares().len(), 4);
    assert_eq!(store.len(SOFTWARES).await, 4);

    shell.admin_logout();
    assert!(!shell.admin().is_authenticated());
    assert_eq!(shell.view(), View::Home);
}

#[tokio::test]
async fn test_admin_stats_and_tabs() {
    let store = MemoryStore::new();
    let repository = SiteRepository::new(Arc::new(store.clone()));
    repository.log_visitor(&visit("France")).await.unwrap();
    repository.log_visitor(&visit("France")).await.unwrap();
    let gps_id = repository.log_visitor(&visit("Japon")).await.unwrap();
    repository.update_visitor(&gps_id, &VisitorPatch::gps(35.68, 139.69, 30.0)).await;

    let mut shell = shell_over(&store);
    shell.load().await;
    shell.admin_login("zetsu-admin").await.unwrap();

    let stats = shell.admin().stats(shell.softwares());
    assert_eq!(stats.software_count, 4);
    assert_eq!(stats.visitor_count, 3);
    assert_eq!(stats.unique_countries, 2);
    assert_eq!(stats.gps_visitors, 1);

    // New visits show up when switching tabs
    repository.log_visitor(&visit("Canada")).await.unwrap();
    shell.admin_tab(AdminTab::Users).await;
    assert_eq!(shell.admin().tab(), AdminTab::Users);
    assert_eq!(shell.admin().visitors().len(), 4);

    shell.navigate(View::Admin);
    shell.admin_tab(AdminTab::Location).await;
    let page = pages::render(&shell);
    assert!(page.contains("35.68000"));
    assert_eq!(shell.admin().gps_visitors().len(), 1);
}
