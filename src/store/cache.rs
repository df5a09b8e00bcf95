//! Cache window hint attached to reads.

use std::fmt;

/// How long (seconds) a read may be reused by whatever caches sit in front
/// of the site. The store client does not cache; it only carries the hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CacheWindow(u32);

impl CacheWindow {
    /// Always fetch fresh data; used by the admin panel.
    pub const NONE: Self = Self(0);

    /// A window of `secs` seconds.
    #[must_use]
    pub const fn seconds(secs: u32) -> Self {
        Self(secs)
    }

    /// The window length in seconds.
    #[must_use]
    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// `Cache-Control` value advertising this window.
    #[must_use]
    pub fn cache_control(&self) -> String {
        if self.0 == 0 {
            "no-store".to_string()
        } else {
            format!("public, max-age={}", self.0)
        }
    }
}

impl fmt::Display for CacheWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
