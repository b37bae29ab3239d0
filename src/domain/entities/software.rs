//! Software product records

use serde::{Deserialize, Serialize};

use super::Icon;

/// Minimum system requirements for a product
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub os: String,
    pub ram: String,
    pub storage: String,
}

impl Requirements {
    pub fn new(os: impl Into<String>, ram: impl Into<String>, storage: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            ram: ram.into(),
            storage: storage.into(),
        }
    }
}

/// One downloadable application offering.
///
/// `id` is assigned by the store; a record without one is a draft that
/// has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Software {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub last_update: String,
    #[serde(default, deserialize_with = "Icon::deserialize_lenient")]
    pub icon_name: Icon,
    #[serde(default)]
    pub download_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    // The store drops empty arrays, so a missing key means no features
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub requirements: Requirements,
}

impl Software {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Copy of this record without its identifier, ready to be created
    pub fn as_draft(&self) -> Software {
        Software {
            id: None,
            ..self.clone()
        }
    }

    /// Merge the fields present in `patch`, leaving the others untouched
    pub fn apply(&mut self, patch: &SoftwarePatch) {
        if let Some(ref v) = patch.name {
            self.name = v.clone();
        }
        if let Some(ref v) = patch.tagline {
            self.tagline = v.clone();
        }
        if let Some(ref v) = patch.short_description {
            self.short_description = v.clone();
        }
        if let Some(ref v) = patch.full_description {
            self.full_description = v.clone();
        }
        if let Some(ref v) = patch.version {
            self.version = v.clone();
        }
        if let Some(ref v) = patch.size {
            self.size = v.clone();
        }
        if let Some(ref v) = patch.last_update {
            self.last_update = v.clone();
        }
        if let Some(v) = patch.icon_name {
            self.icon_name = v;
        }
        if let Some(ref v) = patch.download_url {
            self.download_url = v.clone();
        }
        if let Some(ref v) = patch.image_url {
            self.image_url = Some(v.clone());
        }
        if let Some(ref v) = patch.features {
            self.features = v.clone();
        }
        if let Some(ref v) = patch.requirements {
            self.requirements = v.clone();
        }
    }
}

/// Partial product update. Only fields that are `Some` are sent to the store.
///
/// There is no identifier field: the id travels in the request path only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwarePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
}

impl SoftwarePatch {
    pub fn is_empty(&self) -> bool {
        *self == SoftwarePatch::default()
    }
}

impl From<&Software> for SoftwarePatch {
    /// Patch carrying every field of `software`, as sent when an edited record is saved
    fn from(software: &Software) -> Self {
        Self {
            name: Some(software.name.clone()),
            tagline: Some(software.tagline.clone()),
            short_description: Some(software.short_description.clone()),
            full_description: Some(software.full_description.clone()),
            version: Some(software.version.clone()),
            size: Some(software.size.clone()),
            last_update: Some(software.last_update.clone()),
            icon_name: Some(software.icon_name),
            download_url: Some(software.download_url.clone()),
            image_url: software.image_url.clone(),
            features: Some(software.features.clone()),
            requirements: Some(software.requirements.clone()),
        }
    }
}
