//! Application layer errors

use thiserror::Error;

/// General site errors
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Parse(e.to_string())
        } else {
            StoreError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e.to_string())
    }
}

/// IP geolocation lookup errors
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("GeoAPI error: {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Device geolocation failures, mirroring the platform error codes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("User denied geolocation")]
    PermissionDenied,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Timed out waiting for position")]
    Timeout,

    #[error("Geolocation not supported")]
    Unsupported,
}

impl GeolocationError {
    pub fn code(&self) -> u8 {
        match self {
            GeolocationError::PermissionDenied => 1,
            GeolocationError::PositionUnavailable => 2,
            GeolocationError::Timeout => 3,
            GeolocationError::Unsupported => 0,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
