//! Brand-wide settings singleton.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Brand name used when the settings table has none.
pub const DEFAULT_BRAND: &str = "Nomadisch Labs";
/// Instagram profile used when the settings table has none.
pub const DEFAULT_INSTAGRAM_URL: &str = "https://www.instagram.com/nomadischlabs/";
/// Tickets button label used when the settings table has none.
pub const DEFAULT_TICKETS_CTA_TEXT: &str = "TICKETS";
/// Events button label.
pub const DEFAULT_EVENTS_CTA_TEXT: &str = "VIEW ALL";

/// Site-wide settings.
///
/// Read-mostly. Only the admin update path mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Brand name.
    pub brand: String,
    /// Instagram profile URL.
    pub instagram_url: String,
    /// Explicit tickets link; blank means "no override".
    pub tickets_cta_url: String,
    /// Tickets button label.
    pub tickets_cta_text: String,
    /// Events button label.
    pub events_cta_text: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_string(),
            instagram_url: DEFAULT_INSTAGRAM_URL.to_string(),
            tickets_cta_url: String::new(),
            tickets_cta_text: DEFAULT_TICKETS_CTA_TEXT.to_string(),
            events_cta_text: DEFAULT_EVENTS_CTA_TEXT.to_string(),
        }
    }
}

impl GlobalSettings {
    /// The tickets override, trimmed, when one is configured.
    #[must_use]
    pub fn tickets_override(&self) -> Option<&str> {
        Some(self.tickets_cta_url.trim()).filter(|url| !url.is_empty())
    }
}

/// Admin-submitted settings change.
///
/// `tickets_cta_url` may be an empty string, which clears the override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    /// New brand name; blank keeps the default.
    #[serde(default)]
    pub brand: Option<String>,
    /// New Instagram URL.
    #[serde(default)]
    pub instagram_url: Option<String>,
    /// New tickets override; `""` clears it.
    #[serde(default)]
    pub tickets_cta_url: Option<String>,
    /// New tickets label; blank falls back to the default.
    #[serde(default)]
    pub tickets_cta_text: Option<String>,
}

impl SettingsUpdate {
    /// Applies the change on top of `current`.
    ///
    /// Omitted fields keep their current value. Blank brand, Instagram URL,
    /// or tickets label fall back to the defaults; a blank tickets URL is
    /// kept blank.
    #[must_use]
    pub fn apply(&self, current: &GlobalSettings) -> GlobalSettings {
        fn pick(new: Option<&String>, current: &str, default: &str) -> String {
            match new.map(|v| v.trim()) {
                Some("") => default.to_string(),
                Some(v) => v.to_string(),
                None => current.to_string(),
            }
        }

        GlobalSettings {
            brand: pick(self.brand.as_ref(), &current.brand, DEFAULT_BRAND),
            instagram_url: pick(
                self.instagram_url.as_ref(),
                &current.instagram_url,
                DEFAULT_INSTAGRAM_URL,
            ),
            tickets_cta_url: pick(self.tickets_cta_url.as_ref(), &current.tickets_cta_url, ""),
            tickets_cta_text: pick(
                self.tickets_cta_text.as_ref(),
                &current.tickets_cta_text,
                DEFAULT_TICKETS_CTA_TEXT,
            ),
            events_cta_text: current.events_cta_text.clone(),
        }
    }
}
