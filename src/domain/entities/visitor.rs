//! Visitor log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a visitor location was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationMethod {
    #[serde(rename = "IP")]
    Ip,
    #[serde(rename = "GPS")]
    Gps,
}

impl LocationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationMethod::Ip => "IP",
            LocationMethod::Gps => "GPS",
        }
    }
}

/// Visit data gathered from IP geolocation, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisitor {
    pub ip: String,
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub isp: String,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
}

/// One recorded site visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorLog {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub isp: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_method: Option<LocationMethod>,
}

impl VisitorLog {
    pub fn is_gps(&self) -> bool {
        self.location_method == Some(LocationMethod::Gps)
    }

    /// Coordinates, when the visitor shared a device position
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Stored shape of a freshly logged visit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IpVisitorRecord<'a> {
    #[serde(flatten)]
    pub visitor: &'a NewVisitor,
    pub location_method: LocationMethod,
}

/// Partial visitor update, used to attach device coordinates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_method: Option<LocationMethod>,
}

impl VisitorPatch {
    /// GPS enrichment for an existing entry
    pub fn gps(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            accuracy: Some(accuracy),
            location_method: Some(LocationMethod::Gps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_method_tags() {
        assert_eq!(serde_json::to_value(LocationMethod::Ip).unwrap(), json!("IP"));
        assert_eq!(serde_json::to_value(LocationMethod::Gps).unwrap(), json!("GPS"));
    }

    #[test]
    fn test_ip_record_is_tagged() {
        let visitor = NewVisitor {
            ip: "1.2.3.4".to_string(),
            city: "Lyon".to_string(),
            country: "France".to_string(),
            country_code: "FR".to_string(),
            isp: "Orange".to_string(),
            timestamp: "2024-01-01T10:00:00Z".parse().unwrap(),
            user_agent: "test".to_string(),
        };
        let value = serde_json::to_value(IpVisitorRecord {
            visitor: &visitor,
            location_method: LocationMethod::Ip,
        })
        .unwrap();
        assert_eq!(value["locationMethod"], "IP");
        assert_eq!(value["countryCode"], "FR");
        assert_eq!(value["timestamp"], "2024-01-01T10:00:00Z");
    }

    #[test]
    fn test_gps_patch() {
        let value = serde_json::to_value(VisitorPatch::gps(45.75, 4.85, 12.0)).unwrap();
        assert_eq!(
            value,
            json!({ "latitude": 45.75, "longitude": 4.85, "accuracy": 12.0, "locationMethod": "GPS" })
        );
    }

    #[test]
    fn test_parse_stored_entry() {
        let log: VisitorLog = serde_json::from_value(json!({
            "ip": "1.2.3.4",
            "city": "Paris",
            "country": "France",
            "countryCode": "FR",
            "isp": "Free",
            "timestamp": "2023-11-05T08:30:00.123Z",
            "userAgent": "Mozilla/5.0",
            "locationMethod": "GPS",
            "latitude": 48.85,
            "longitude": 2.35
        }))
        .unwrap();
        assert!(log.is_gps());
        assert_eq!(log.coordinates(), Some((48.85, 2.35)));
        assert_eq!(log.accuracy, None);
    }
}
