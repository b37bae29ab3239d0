//! Icon registry - closed set of product icons

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Icon attached to a product record, stored by its key name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    ShieldAlert,
    Globe,
    Lock,
    Zap,
    Cpu,
    HardDrive,
    Monitor,
    Download,
    ShieldCheck,
    Activity,
    Terminal,
    Wifi,
    Database,
    Server,
}

impl Icon {
    /// Every icon an admin can pick, in display order
    pub const ALL: [Icon; 14] = [
        Icon::ShieldAlert,
        Icon::Globe,
        Icon::Lock,
        Icon::Zap,
        Icon::Cpu,
        Icon::HardDrive,
        Icon::Monitor,
        Icon::Download,
        Icon::ShieldCheck,
        Icon::Activity,
        Icon::Terminal,
        Icon::Wifi,
        Icon::Database,
        Icon::Server,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Icon::ShieldAlert => "ShieldAlert",
            Icon::Globe => "Globe",
            Icon::Lock => "Lock",
            Icon::Zap => "Zap",
            Icon::Cpu => "Cpu",
            Icon::HardDrive => "HardDrive",
            Icon::Monitor => "Monitor",
            Icon::Download => "Download",
            Icon::ShieldCheck => "ShieldCheck",
            Icon::Activity => "Activity",
            Icon::Terminal => "Terminal",
            Icon::Wifi => "Wifi",
            Icon::Database => "Database",
            Icon::Server => "Server",
        }
    }

    /// Displayable glyph for terminal rendering
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::ShieldAlert => "🛡",
            Icon::Globe => "🌐",
            Icon::Lock => "🔒",
            Icon::Zap => "⚡",
            Icon::Cpu => "🧠",
            Icon::HardDrive => "💽",
            Icon::Monitor => "🖥",
            Icon::Download => "⬇",
            Icon::ShieldCheck => "✅",
            Icon::Activity => "📈",
            Icon::Terminal => "⌨",
            Icon::Wifi => "📶",
            Icon::Database => "🗄",
            Icon::Server => "🖧",
        }
    }
}

impl Default for Icon {
    fn default() -> Self {
        Icon::ShieldAlert
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Unknown icon key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown icon: {0}")]
pub struct UnknownIcon(pub String);

impl FromStr for Icon {
    type Err = UnknownIcon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Icon::ALL
            .iter()
            .copied()
            .find(|icon| icon.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIcon(s.to_string()))
    }
}

impl Icon {
    /// Read an icon key from a stored record. Keys outside the registry,
    /// and values that are not strings, read as the default icon.
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stored {
            Key(String),
            Other(serde::de::IgnoredAny),
        }

        Ok(match Stored::deserialize(deserializer)? {
            Stored::Key(key) => key.parse().unwrap_or_else(|e: UnknownIcon| {
                tracing::warn!("{}, using {}", e, Icon::default());
                Icon::default()
            }),
            Stored::Other(_) => Icon::default(),
        })
    }
}
