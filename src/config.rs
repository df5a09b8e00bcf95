//! Site configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The values are read once at startup
//! and threaded into the components that need them; nothing reads the
//! environment on a per-request basis.

use std::net::SocketAddr;
use std::time::Duration;

/// Default datastore REST endpoint.
pub const DEFAULT_STORE_API_URL: &str = "https://api.airtable.com/v0";

/// Default media host upload endpoint.
pub const DEFAULT_MEDIA_API_URL: &str = "https://api.cloudinary.com/v1_1";

/// Top-level site configuration.
///
/// Loaded once at startup via [`SiteConfig::from_env`].
#[derive(Clone)]
pub struct SiteConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Datastore connection settings.
    pub store: StoreConfig,

    /// Media host settings; `None` disables the upload route.
    pub media: Option<MediaConfig>,

    /// Shared admin secret; `None` rejects every admin call.
    pub admin_password: Option<String>,

    /// Timeout applied to every outbound request.
    pub http_timeout: Duration,

    /// Cache window (seconds) advertised on public reads.
    pub cache_window_secs: u32,
}

impl std::fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteConfig")
            .field("listen_addr", &self.listen_addr)
            .field("store", &self.store)
            .field("media", &self.media)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .field("http_timeout", &self.http_timeout)
            .field("cache_window_secs", &self.cache_window_secs)
            .finish()
    }
}

/// Datastore settings.
///
/// Credentials stay optional here so a misconfigured process still boots;
/// [`crate::store::StoreClient::new`] refuses to build without them.
#[derive(Clone)]
pub struct StoreConfig {
    /// Bearer token for the datastore REST API.
    pub api_token: Option<String>,
    /// Base identifier that holds the tables.
    pub base_id: Option<String>,
    /// Events table name.
    pub events_table: String,
    /// Singleton settings table name.
    pub globals_table: String,
    /// REST root, without trailing slash.
    pub api_url: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_id", &self.base_id)
            .field("events_table", &self.events_table)
            .field("globals_table", &self.globals_table)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_id: None,
            events_table: "Events".to_string(),
            globals_table: "Globals".to_string(),
            api_url: DEFAULT_STORE_API_URL.to_string(),
        }
    }
}

/// Unsigned-upload settings for the media host.
#[derive(Clone)]
pub struct MediaConfig {
    /// Account ("cloud") name on the media host.
    pub cloud_name: String,
    /// Unsigned upload preset.
    pub upload_preset: String,
    /// Folder the uploads land in.
    pub folder: String,
    /// Upload API root, without trailing slash.
    pub api_url: String,
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("upload_preset", &"<redacted>")
            .field("folder", &self.folder)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl SiteConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let store = StoreConfig {
            api_token: non_empty_env("STORE_API_TOKEN"),
            base_id: non_empty_env("STORE_BASE_ID"),
            events_table: non_empty_env("STORE_EVENTS_TABLE")
                .unwrap_or_else(|| "Events".to_string()),
            globals_table: non_empty_env("STORE_GLOBALS_TABLE")
                .unwrap_or_else(|| "Globals".to_string()),
            api_url: non_empty_env("STORE_API_URL")
                .unwrap_or_else(|| DEFAULT_STORE_API_URL.to_string()),
        };

        let media = match (
            non_empty_env("MEDIA_CLOUD_NAME"),
            non_empty_env("MEDIA_UPLOAD_PRESET"),
        ) {
            (Some(cloud_name), Some(upload_preset)) => Some(MediaConfig {
                cloud_name,
                upload_preset,
                folder: non_empty_env("MEDIA_UPLOAD_FOLDER")
                    .unwrap_or_else(|| "nomadisch/events".to_string()),
                api_url: non_empty_env("MEDIA_API_URL")
                    .unwrap_or_else(|| DEFAULT_MEDIA_API_URL.to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            listen_addr,
            store,
            media,
            admin_password: non_empty_env("ADMIN_PASSWORD"),
            http_timeout: Duration::from_secs(parse_env("HTTP_TIMEOUT_SECS", 10)),
            cache_window_secs: parse_env("CACHE_WINDOW_SECS", 60),
        })
    }
}

/// Reads an environment variable, treating blank values as unset.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
