//! Application shell: which view is shown, the in-memory product list and
//! the location consent prompt.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::errors::SiteError;
use crate::application::services::{
    AdminDashboard, AdminTab, ConsentOutcome, SiteRepository, TrackOutcome, VisitorTracker,
};
use crate::domain::entities::{Software, View};

/// Default wait between logging a visit and asking for precise location
pub const CONSENT_DELAY: Duration = Duration::from_millis(3000);

/// Notifications raised by background work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    ShowLocationPrompt,
}

pub struct AppShell {
    repository: SiteRepository,
    tracker: Arc<VisitorTracker>,
    admin: AdminDashboard,
    view: View,
    softwares: Vec<Software>,
    selected: Option<Software>,
    loading: bool,
    prompt_visible: bool,
    notice: Option<String>,
    scroll_resets: usize,
    consent_delay: Duration,
    events_tx: mpsc::UnboundedSender<ShellEvent>,
    events_rx: mpsc::UnboundedReceiver<ShellEvent>,
}

impl AppShell {
    pub fn new(repository: SiteRepository, tracker: Arc<VisitorTracker>, admin_passphrase: impl Into<String>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            admin: AdminDashboard::new(repository.clone(), admin_passphrase),
            repository,
            tracker,
            view: View::Home,
            softwares: Vec::new(),
            selected: None,
            loading: true,
            prompt_visible: false,
            notice: None,
            scroll_resets: 0,
            consent_delay: CONSENT_DELAY,
            events_tx,
            events_rx,
        }
    }

    pub fn with_consent_delay(mut self, delay: Duration) -> Self {
        self.consent_delay = delay;
        self
    }

    /// Load the product list once, seeding an empty store
    pub async fn load(&mut self) {
        self.loading = true;
        self.softwares = self.repository.load_catalog().await;
        self.loading = false;
        tracing::info!("Loaded {} products", self.softwares.len());
    }

    /// Run visitor tracking in the background. When a new visit is logged,
    /// the consent prompt is raised after the configured delay.
    pub fn start_tracking(&self) -> JoinHandle<TrackOutcome> {
        let tracker = Arc::clone(&self.tracker);
        let events = self.events_tx.clone();
        let delay = self.consent_delay;

        tokio::spawn(async move {
            let outcome = tracker.track().await;
            if let TrackOutcome::Logged(_) = outcome {
                tokio::time::sleep(delay).await;
                let _ = events.send(ShellEvent::ShowLocationPrompt);
            }
            outcome
        })
    }

    /// Apply events raised by background work since the last call
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                ShellEvent::ShowLocationPrompt => self.prompt_visible = true,
            }
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn softwares(&self) -> &[Software] {
        &self.softwares
    }

    pub fn selected(&self) -> Option<&Software> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of scroll-to-top resets caused by navigation
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    pub fn tracker(&self) -> &VisitorTracker {
        &self.tracker
    }

    pub fn admin(&self) -> &AdminDashboard {
        &self.admin
    }

    pub fn navigate(&mut self, view: View) {
        tracing::debug!("Navigate {} -> {}", self.view, view);
        self.view = view;
        self.scroll_resets += 1;
    }

    /// Show the detail page of product `id`
    pub fn select_software(&mut self, id: &str) -> Result<&Software, SiteError> {
        let software = self
            .softwares
            .iter()
            .find(|s| s.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| SiteError::NotFound(format!("software {}", id)))?;
        self.navigate(View::Detail);
        Ok(&*self.selected.insert(software))
    }

    /// Prompt is only shown on public pages
    pub fn location_prompt_visible(&self) -> bool {
        self.prompt_visible && self.view.shows_site_chrome()
    }

    pub fn dismiss_location_prompt(&mut self) {
        self.prompt_visible = false;
    }

    /// Visitor accepted precise location. Once a logged visit exists the
    /// prompt closes whatever the outcome and is not offered again.
    pub async fn accept_location(&mut self) -> ConsentOutcome {
        let outcome = self.tracker.enable_precise_location().await;
        if outcome == ConsentOutcome::NotLogged {
            return outcome;
        }
        self.prompt_visible = false;
        if let ConsentOutcome::Enriched(_) = outcome {
            self.notice = Some("Localisation optimisée activée. Merci.".to_string());
        }
        outcome
    }

    /// One-shot message for the visitor, cleared once read
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub async fn admin_login(&mut self, attempt: &str) -> Result<(), SiteError> {
        self.admin.login(attempt).await
    }

    /// Leave the back-office and return home
    pub fn admin_logout(&mut self) {
        self.admin.logout();
        self.navigate(View::Home);
    }

    pub async fn admin_tab(&mut self, tab: AdminTab) {
        self.admin.set_tab(tab).await;
    }

    pub async fn admin_refresh_visitors(&mut self) {
        self.admin.refresh_visitors().await;
    }

    pub async fn save_software(&mut self, draft: Software) -> Result<Software, SiteError> {
        self.admin.save(&mut self.softwares, draft).await
    }

    pub async fn delete_software(&mut self, id: &str) -> Result<(), SiteError> {
        self.admin.delete(&mut self.softwares, id).await?;
        if self.selected.as_ref().and_then(|s| s.id.as_deref()) == Some(id) {
            self.selected = None;
        }
        Ok(())
    }
}
