//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the mirror:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for page HTML and for raw asset bytes
//! - Classifying failures as transport errors

use crate::config::{Config, UserAgentConfig};
use crate::MirrorError;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Body of a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    /// The response was HTML (or carried no Content-Type at all)
    Html(String),

    /// The link pointed at something other than a document
    Other {
        /// The Content-Type received
        content_type: String,
        /// Raw response body
        bytes: Vec<u8>,
    },
}

/// Formats the user agent string: `Name/Version (+ContactURL)`
pub fn user_agent(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::Config;
/// use site_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent(&config.user_agent))
        .timeout(Duration::from_secs(config.crawler.request_timeout))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves pages and assets over HTTP
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &Config) -> Result<Self, MirrorError> {
        build_http_client(config)
            .map(Self::from_client)
            .map_err(MirrorError::Client)
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a page, decoding it as text when the server says it is HTML
    pub async fn fetch_page(&self, url: &Url) -> Result<PageBody, MirrorError> {
        let response = self.get(url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if is_html(&content_type) {
            let text = response.text().await.map_err(|e| transport(url, e))?;
            Ok(PageBody::Html(text))
        } else {
            let bytes = response.bytes().await.map_err(|e| transport(url, e))?;
            Ok(PageBody::Other {
                content_type,
                bytes: bytes.to_vec(),
            })
        }
    }

    /// Fetches a URL as raw bytes
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, MirrorError> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| transport(url, e))?;
        Ok(bytes.to_vec())
    }

    /// Sends a GET request and rejects non-success statuses
    async fn get(&self, url: &Url) -> Result<Response, MirrorError> {
        tracing::trace!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

fn transport(url: &Url, source: reqwest::Error) -> MirrorError {
    MirrorError::Transport {
        url: url.to_string(),
        source,
    }
}

/// Returns true if the Content-Type denotes a document to extract links from
///
/// A missing Content-Type is treated as HTML.
fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml+xml")
}
