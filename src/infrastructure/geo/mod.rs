//! IP geolocation over HTTP

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::errors::GeoError;
use crate::domain::traits::{IpLocation, IpLocator};

/// Default lookup endpoint, resolves the caller's own address
pub const GEOJS_ENDPOINT: &str = "https://get.geojs.io/v1/ip/geo.json";

/// geojs.io style lookup
pub struct GeoJsLocator {
    endpoint: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    ip: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    organization_name: Option<String>,
    #[serde(default)]
    organization: Option<String>,
}

impl GeoResponse {
    fn into_location(self) -> IpLocation {
        let isp = self.organization_name
            .filter(|s| !s.is_empty())
            .or(self.organization.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "Unknown".to_string());

        IpLocation {
            ip: self.ip,
            city: self.city.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            country_code: self.country_code.unwrap_or_default(),
            isp,
        }
    }
}

impl GeoJsLocator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }
}

impl Default for GeoJsLocator {
    fn default() -> Self {
        Self::new(GEOJS_ENDPOINT)
    }
}

#[async_trait]
impl IpLocator for GeoJsLocator {
    async fn locate(&self) -> Result<IpLocation, GeoError> {
        let response = self.client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| GeoError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }

        let body: GeoResponse = response
            .json()
            .await
            .map_err(|e| GeoError::Parse(e.to_string()))?;

        Ok(body.into_location())
    }
}
