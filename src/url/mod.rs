//! URL handling module for Site-Mirror
//!
//! This module turns raw `href`/`src` references into absolute URLs under the
//! site's root host, and maps absolute URLs onto local filesystem paths.

mod local_path;
mod resolve;

use crate::{UrlError, UrlResult};
use std::fmt;
use url::{ParseError, Url};

// Re-export main functions
pub use local_path::{map_to_local_path, page_index_path, EXTERNAL_ASSETS_DIR, PAGE_INDEX_FILE};
pub use resolve::{resolve, strip_fragment};

/// The authority (host plus explicit port) of the site being mirrored
///
/// Fixed for the whole run. It partitions every URL into "same host"
/// (followed and stored under the output root) and "external host"
/// (never followed, assets stored under [`EXTERNAL_ASSETS_DIR`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootHost(String);

impl RootHost {
    /// Creates a root host from a bare authority such as `example.com` or
    /// `127.0.0.1:8080`
    pub fn new(authority: &str) -> Self {
        Self(authority.to_lowercase())
    }

    /// Derives the root host from the root page URL
    ///
    /// # Examples
    ///
    /// ```
    /// use site_mirror::url::RootHost;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://EXAMPLE.com/docs/").unwrap();
    /// assert_eq!(RootHost::from_url(&url).unwrap().as_str(), "example.com");
    ///
    /// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
    /// assert_eq!(RootHost::from_url(&url).unwrap().as_str(), "127.0.0.1:8080");
    /// ```
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        authority_of(url)
            .map(Self)
            .ok_or_else(|| UrlError::MissingHost(url.to_string()))
    }

    /// Returns true if the URL is served by this host
    pub fn matches(&self, url: &Url) -> bool {
        authority_of(url).as_deref() == Some(self.0.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RootHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses the root URL given on the command line
///
/// A bare authority such as `example.com` or `localhost:8080/docs` gets an
/// `http://` prefix. Only `http` and `https` roots with a host and without
/// credentials are accepted.
///
/// # Examples
///
/// ```
/// use site_mirror::url::parse_root_url;
///
/// assert_eq!(parse_root_url("example.com").unwrap().as_str(), "http://example.com/");
/// assert!(parse_root_url("ftp://example.com/").is_err());
/// assert!(parse_root_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_root_url(input: &str) -> UrlResult<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = match Url::parse(input) {
        Ok(url) if url.host_str().is_none() && is_bare_port(&url) => with_http(input)?,
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => with_http(input)?,
        Err(e) => return Err(UrlError::Parse(format!("{}: {}", input, e))),
    };

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }
    let Some(host) = url.host_str() else {
        return Err(UrlError::MissingHost(input.to_string()));
    };
    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlError::Credentials(host.to_string()));
    }

    Ok(url)
}

/// True for `host:port` input that the URL parser read as `scheme:path`
fn is_bare_port(url: &Url) -> bool {
    url.path().starts_with(|c: char| c.is_ascii_digit())
}

fn with_http(input: &str) -> UrlResult<Url> {
    Url::parse(&format!("http://{}", input)).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))
}

/// Extracts the lowercase host of a URL, with the port appended when it is
/// explicit and not the scheme's default
///
/// Returns `None` for URLs without a host (`mailto:`, `data:`, ...).
pub fn authority_of(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
