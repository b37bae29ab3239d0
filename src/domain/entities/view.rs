//! Site views selectable by the application shell

use std::fmt;
use std::str::FromStr;

/// Platform landing pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Android,
    Ios,
}

impl Platform {
    pub const ALL: [Platform; 4] = [Platform::Windows, Platform::MacOs, Platform::Android, Platform::Ios];

    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }
}

/// The page currently rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Downloads,
    Detail,
    Admin,
    Product(Platform),
    SupportHelp,
    SupportKb,
    SupportStatus,
    Contact,
    LegalPrivacy,
    LegalTerms,
    LegalCookies,
}

/// Navbar entry highlighted for a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTab {
    Home,
    Downloads,
    Detail,
}

impl View {
    pub fn slug(&self) -> String {
        match self {
            View::Home => "home".to_string(),
            View::Downloads => "downloads".to_string(),
            View::Detail => "detail".to_string(),
            View::Admin => "admin".to_string(),
            View::Product(p) => format!("product-{}", p.slug()),
            View::SupportHelp => "support-help".to_string(),
            View::SupportKb => "support-kb".to_string(),
            View::SupportStatus => "support-status".to_string(),
            View::Contact => "contact".to_string(),
            View::LegalPrivacy => "legal-privacy".to_string(),
            View::LegalTerms => "legal-terms".to_string(),
            View::LegalCookies => "legal-cookies".to_string(),
        }
    }

    /// Navbar, footer and the consent prompt are hidden in the back-office
    pub fn shows_site_chrome(&self) -> bool {
        *self != View::Admin
    }

    pub fn nav_tab(&self) -> NavTab {
        match self {
            View::Downloads => NavTab::Downloads,
            View::Detail => NavTab::Detail,
            _ => NavTab::Home,
        }
    }
}

impl Default for View {
    fn default() -> Self {
        View::Home
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown view: {0}")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().to_lowercase();
        let view = match slug.as_str() {
            "home" => View::Home,
            "downloads" => View::Downloads,
            "detail" => View::Detail,
            "admin" => View::Admin,
            "support-help" => View::SupportHelp,
            "support-kb" => View::SupportKb,
            "support-status" => View::SupportStatus,
            "contact" => View::Contact,
            "legal-privacy" => View::LegalPrivacy,
            "legal-terms" => View::LegalTerms,
            "legal-cookies" => View::LegalCookies,
            other => {
                let platform = other
                    .strip_prefix("product-")
                    .and_then(|p| Platform::ALL.into_iter().find(|platform| platform.slug() == p));
                match platform {
                    Some(p) => View::Product(p),
                    None => return Err(UnknownView(s.to_string())),
                }
            }
        };
        Ok(view)
    }
}
