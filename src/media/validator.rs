//! Reachability check for cover image URLs.
//!
//! The datastore accepts an attachment URL, answers 2xx, and only later
//! tries to fetch the file. If that fetch fails the record silently ends
//! up without a cover. Probing the URL first turns that into an error the
//! admin sees.
//!
//! Known limitation: the check trusts the declared `content-type`. A
//! server that mislabels its content passes.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};

use crate::error::SiteError;

/// User-Agent sent with cover checks; some CDNs reject anonymous clients.
pub const CHECK_USER_AGENT: &str = "NomadischLabs-AirtableAttach/1.0";

/// Longest body prefix quoted in a not-an-image error.
const SNIPPET_CHARS: usize = 200;

/// Confirms a URL serves image content before it is stored as an attachment.
#[derive(Debug, Clone)]
pub struct RemoteImageValidator {
    client: Client,
}

impl RemoteImageValidator {
    /// Builds a validator whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Transport`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, SiteError> {
        let client = Client::builder()
            .user_agent(CHECK_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Checks that `url` is an http(s) URL answering with `image/*`.
    ///
    /// A blank URL passes without any request. The check starts with
    /// `HEAD`; a 403/405 or a transport failure retries with `GET`.
    ///
    /// # Errors
    ///
    /// - [`SiteError::CoverInvalid`] for a non-http(s) URL.
    /// - [`SiteError::CoverUnreachable`] when the final response is not 2xx.
    /// - [`SiteError::CoverNotAnImage`] when the content type is not `image/*`.
    pub async fn validate(&self, url: &str) -> Result<(), SiteError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(());
        }
        if !has_http_scheme(url) {
            return Err(SiteError::CoverInvalid(url.chars().take(80).collect()));
        }

        let (response, method) = match self.send(Method::HEAD, url).await {
            Ok(res)
                if res.status() == StatusCode::FORBIDDEN
                    || res.status() == StatusCode::METHOD_NOT_ALLOWED =>
            {
                tracing::debug!(url, status = %res.status(), "HEAD refused, retrying with GET");
                (self.get(url).await?, Method::GET)
            }
            Ok(res) => (res, Method::HEAD),
            Err(err) => {
                tracing::debug!(url, error = %err, "HEAD failed, retrying with GET");
                (self.get(url).await?, Method::GET)
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::CoverUnreachable {
                status: status.to_string(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type.to_ascii_lowercase().starts_with("image/") {
            tracing::debug!(url, content_type = %content_type, "cover image reachable");
            return Ok(());
        }

        let snippet = if method == Method::GET {
            body_snippet(response).await
        } else {
            None
        };
        Err(SiteError::CoverNotAnImage {
            content_type,
            url: url.to_string(),
            snippet,
        })
    }

    async fn send(&self, method: Method, url: &str) -> Result<Response, reqwest::Error> {
        self.client.request(method, url).send().await
    }

    async fn get(&self, url: &str) -> Result<Response, SiteError> {
        self.send(Method::GET, url)
            .await
            .map_err(|err| SiteError::CoverUnreachable {
                status: format!("network error: {err}"),
                url: url.to_string(),
            })
    }
}

/// Reads just enough of the body to quote its first [`SNIPPET_CHARS`]
/// characters, then drops the connection.
async fn body_snippet(mut response: Response) -> Option<String> {
    // A UTF-8 char is at most four bytes.
    let limit = SNIPPET_CHARS * 4;
    let mut head: Vec<u8> = Vec::new();
    while head.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => head.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    let snippet: String = String::from_utf8_lossy(&head)
        .chars()
        .take(SNIPPET_CHARS)
        .collect();
    Some(snippet).filter(|s| !s.is_empty())
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
