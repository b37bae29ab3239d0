//! Console line input and a device locator that asks the operator for a fix

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::application::errors::GeolocationError;
use crate::domain::traits::{DeviceLocator, Position, PositionOptions};

static COORDINATES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*[,;\s]\s*(-?\d+(?:\.\d+)?)(?:\s*[,;\s]\s*(\d+(?:\.\d+)?))?\s*$")
        .expect("coordinate pattern compiles")
});

/// Accuracy reported when the operator gives none, in meters
const DEFAULT_ACCURACY: f64 = 50.0;

/// Shared stdin reader, so prompts inside services do not race the main loop
#[derive(Clone)]
pub struct ConsoleInput {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl ConsoleInput {
    pub fn stdin() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
        }
    }

    /// Print `prompt` and wait for one line. `None` on end of input.
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read console input: {}", e);
                None
            }
        }
    }
}

/// Parse "lat, lon[, accuracy]". Blank input means the operator declined.
pub fn parse_position(line: &str) -> Result<Position, GeolocationError> {
    if line.trim().is_empty() {
        return Err(GeolocationError::PermissionDenied);
    }

    let caps = COORDINATES
        .captures(line)
        .ok_or(GeolocationError::PositionUnavailable)?;
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());

    let latitude = number(1).ok_or(GeolocationError::PositionUnavailable)?;
    let longitude = number(2).ok_or(GeolocationError::PositionUnavailable)?;
    let accuracy = number(3).unwrap_or(DEFAULT_ACCURACY);

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(GeolocationError::PositionUnavailable);
    }

    Ok(Position { latitude, longitude, accuracy })
}

/// Device locator for terminal sessions
pub struct ConsoleDeviceLocator {
    input: ConsoleInput,
}

impl ConsoleDeviceLocator {
    pub fn new(input: ConsoleInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl DeviceLocator for ConsoleDeviceLocator {
    async fn current_position(&self, options: PositionOptions) -> Result<Position, GeolocationError> {
        tracing::debug!("Requesting position (high accuracy: {})", options.enable_high_accuracy);
        let line = self
            .input
            .read_line("Position (lat, lon[, précision m]) ou Entrée pour refuser: ")
            .await
            .ok_or(GeolocationError::PositionUnavailable)?;
        parse_position(&line)
    }
}
