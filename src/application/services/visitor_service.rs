//! Visitor tracking: one IP-located log entry per session, optionally
//! enriched with device coordinates after explicit consent.

use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::errors::GeolocationError;
use crate::application::services::SiteRepository;
use crate::domain::entities::{NewVisitor, VisitorPatch};
use crate::domain::traits::{DeviceLocator, IpLocator, Position, PositionOptions, SessionStore};

/// Session key recording that this session was already logged
pub const SESSION_KEY: &str = "zetsu_visitor_id";

/// Where the current session stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingState {
    NotTracked,
    IpLogged { visitor_id: String },
    GpsEnriched { visitor_id: String },
}

/// Result of the initial tracking pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Lookup or logging failed; nothing was recorded
    Skipped,
    /// The session was already logged earlier
    Resumed(String),
    /// A new entry was written; the consent prompt should follow
    Logged(String),
}

/// Result of a precise-location request
#[derive(Debug, Clone, PartialEq)]
pub enum ConsentOutcome {
    Enriched(Position),
    Failed(GeolocationError),
    /// No logged entry to enrich
    NotLogged,
    AlreadyEnriched,
}

pub struct VisitorTracker {
    repository: SiteRepository,
    session: Arc<dyn SessionStore>,
    ip_locator: Arc<dyn IpLocator>,
    device: Arc<dyn DeviceLocator>,
    user_agent: String,
    session_key: String,
    position_options: PositionOptions,
    state: Mutex<TrackingState>,
}

impl VisitorTracker {
    pub fn new(
        repository: SiteRepository,
        session: Arc<dyn SessionStore>,
        ip_locator: Arc<dyn IpLocator>,
        device: Arc<dyn DeviceLocator>,
    ) -> Self {
        Self {
            repository,
            session,
            ip_locator,
            device,
            user_agent: format!("zetsu-site/{}", env!("CARGO_PKG_VERSION")),
            session_key: SESSION_KEY.to_string(),
            position_options: PositionOptions::default(),
            state: Mutex::new(TrackingState::NotTracked),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    pub fn with_device_timeout(mut self, timeout: Duration) -> Self {
        self.position_options.timeout = timeout;
        self
    }

    pub fn state(&self) -> TrackingState {
        self.state.lock().map(|s| s.clone()).unwrap_or(TrackingState::NotTracked)
    }

    fn set_state(&self, state: TrackingState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }

    /// Log this session's visit unless it already was. Never fails: any
    /// problem leaves the session untracked.
    pub async fn track(&self) -> TrackOutcome {
        if let Some(visitor_id) = self.session.get(&self.session_key).await {
            // Don't downgrade an enriched session
            if self.state() == TrackingState::NotTracked {
                self.set_state(TrackingState::IpLogged { visitor_id: visitor_id.clone() });
            }
            return TrackOutcome::Resumed(visitor_id);
        }

        let location = match self.ip_locator.locate().await {
            Ok(location) => location,
            Err(e) => {
                tracing::info!("Analytics tracking skipped: {}", e);
                return TrackOutcome::Skipped;
            }
        };

        let visitor = NewVisitor {
            ip: location.ip,
            city: location.city,
            country: location.country,
            country_code: location.country_code,
            isp: location.isp,
            timestamp: Utc::now(),
            user_agent: self.user_agent.clone(),
        };

        match self.repository.log_visitor(&visitor).await {
            Some(visitor_id) => {
                self.session.set(&self.session_key, &visitor_id).await;
                self.set_state(TrackingState::IpLogged { visitor_id: visitor_id.clone() });
                tracing::info!("Visitor logged successfully");
                TrackOutcome::Logged(visitor_id)
            }
            None => TrackOutcome::Skipped,
        }
    }

    /// Ask the device for a fresh high-accuracy fix and attach it to the
    /// logged entry. Denial or timeout is not retried.
    pub async fn enable_precise_location(&self) -> ConsentOutcome {
        let visitor_id = match self.state() {
            TrackingState::NotTracked => return ConsentOutcome::NotLogged,
            TrackingState::GpsEnriched { .. } => return ConsentOutcome::AlreadyEnriched,
            TrackingState::IpLogged { visitor_id } => visitor_id,
        };

        let options = self.position_options;
        let position = match tokio::time::timeout(options.timeout, self.device.current_position(options)).await {
            Ok(Ok(position)) => position,
            Ok(Err(e)) => {
                tracing::error!("Geolocation error ({}): {}", e.code(), e);
                return ConsentOutcome::Failed(e);
            }
            Err(_) => {
                let e = GeolocationError::Timeout;
                tracing::error!("Geolocation error ({}): {}", e.code(), e);
                return ConsentOutcome::Failed(e);
            }
        };

        self.repository
            .update_visitor(
                &visitor_id,
                &VisitorPatch::gps(position.latitude, position.longitude, position.accuracy),
            )
            .await;
        self.set_state(TrackingState::GpsEnriched { visitor_id });
        ConsentOutcome::Enriched(position)
    }
}
