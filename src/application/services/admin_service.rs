//! Back-office: passphrase gate, product CRUD and visitor statistics

use chrono::Local;
use std::collections::HashSet;

use crate::application::errors::SiteError;
use crate::application::services::SiteRepository;
use crate::domain::entities::{Icon, Requirements, Software, SoftwarePatch, VisitorLog};

/// Dashboard sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Overview,
    Products,
    Users,
    Location,
}

impl AdminTab {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "overview" => Some(Self::Overview),
            "products" => Some(Self::Products),
            "users" => Some(Self::Users),
            "location" => Some(Self::Location),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Tableau de Bord",
            Self::Products => "Logiciels",
            Self::Users => "Utilisateurs & Trafic",
            Self::Location => "Localisation",
        }
    }
}

/// Headline numbers on the overview tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub software_count: usize,
    pub visitor_count: usize,
    pub unique_countries: usize,
    pub gps_visitors: usize,
}

/// Admin session. The passphrase is a UI gate only, compared in plain text.
pub struct AdminDashboard {
    repository: SiteRepository,
    passphrase: String,
    authenticated: bool,
    tab: AdminTab,
    visitors: Vec<VisitorLog>,
}

impl AdminDashboard {
    pub fn new(repository: SiteRepository, passphrase: impl Into<String>) -> Self {
        Self {
            repository,
            passphrase: passphrase.into(),
            authenticated: false,
            tab: AdminTab::Overview,
            visitors: Vec::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn tab(&self) -> AdminTab {
        self.tab
    }

    pub fn visitors(&self) -> &[VisitorLog] {
        &self.visitors
    }

    /// Unlock the dashboard and load visitor logs
    pub async fn login(&mut self, attempt: &str) -> Result<(), SiteError> {
        if attempt != self.passphrase {
            return Err(SiteError::Auth("Mot de passe incorrect".to_string()));
        }
        self.authenticated = true;
        self.refresh_visitors().await;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.tab = AdminTab::Overview;
        self.visitors.clear();
    }

    /// Switch section; visitor logs are reloaded on every switch
    pub async fn set_tab(&mut self, tab: AdminTab) {
        self.tab = tab;
        if self.authenticated {
            self.refresh_visitors().await;
        }
    }

    pub async fn refresh_visitors(&mut self) -> &[VisitorLog] {
        self.visitors = self.repository.get_visitors().await;
        &self.visitors
    }

    /// Blank product form with sensible defaults
    pub fn new_draft() -> Software {
        Software {
            id: None,
            name: String::new(),
            tagline: String::new(),
            short_description: String::new(),
            full_description: String::new(),
            version: "1.0.0".to_string(),
            size: "0 MB".to_string(),
            last_update: Local::now().format("%d/%m/%Y").to_string(),
            icon_name: Icon::ShieldAlert,
            download_url: String::new(),
            image_url: Some(String::new()),
            features: Vec::new(),
            requirements: Requirements::new("Windows 10", "4GB", "1GB"),
        }
    }

    fn ensure_authenticated(&self) -> Result<(), SiteError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(SiteError::Auth("Accès réservé".to_string()))
        }
    }

    /// Create or update `draft` in the store, then mirror the change into
    /// `catalog`. Returns the saved record with its id.
    pub async fn save(&mut self, catalog: &mut Vec<Software>, draft: Software) -> Result<Software, SiteError> {
        self.ensure_authenticated()?;
        if draft.name.trim().is_empty() {
            return Err(SiteError::Validation("Le nom est requis".to_string()));
        }

        match draft.id.clone() {
            Some(id) => {
                self.repository.update(&id, &SoftwarePatch::from(&draft)).await?;
                match catalog.iter_mut().find(|s| s.id.as_deref() == Some(id.as_str())) {
                    Some(existing) => *existing = draft.clone(),
                    None => catalog.push(draft.clone()),
                }
                Ok(draft)
            }
            None => {
                let id = self.repository.create(&draft).await?;
                let saved = draft.with_id(id);
                catalog.push(saved.clone());
                Ok(saved)
            }
        }
    }

    /// Delete product `id` from the store, then from `catalog`
    pub async fn delete(&mut self, catalog: &mut Vec<Software>, id: &str) -> Result<(), SiteError> {
        self.ensure_authenticated()?;
        self.repository.delete(id).await?;
        catalog.retain(|s| s.id.as_deref() != Some(id));
        Ok(())
    }

    pub fn stats(&self, catalog: &[Software]) -> DashboardStats {
        let countries: HashSet<&str> = self.visitors.iter().map(|v| v.country.as_str()).collect();
        DashboardStats {
            software_count: catalog.len(),
            visitor_count: self.visitors.len(),
            unique_countries: countries.len(),
            gps_visitors: self.visitors.iter().filter(|v| v.is_gps()).count(),
        }
    }

    pub fn gps_visitors(&self) -> Vec<&VisitorLog> {
        self.visitors.iter().filter(|v| v.is_gps()).collect()
    }
}
