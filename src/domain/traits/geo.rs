use async_trait::async_trait;
use std::time::Duration;

use crate::application::errors::{GeoError, GeolocationError};

/// Network-derived location of the current visitor
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub ip: String,
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub isp: String,
}

/// External IP geolocation service
#[async_trait]
pub trait IpLocator: Send + Sync {
    async fn locate(&self) -> Result<IpLocation, GeoError>;
}

/// Options for a device position request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix accepted; zero forces a fresh reading
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Device position fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in meters
    pub accuracy: f64,
}

/// Platform geolocation capability
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(&self, options: PositionOptions) -> Result<Position, GeolocationError>;
}
