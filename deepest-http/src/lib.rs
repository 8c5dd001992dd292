//! Page fetcher: one GET, strict status check, body flattened to one line.
//!
//! - Only `http`/`https` URLs are accepted
//! - The status must be exactly `200 OK`; anything else is an error, even
//!   other 2xx codes
//! - The body is decoded as UTF-8 (invalid sequences replaced) and every
//!   line terminator is dropped with nothing put in its place
//! - No retries: every failure is terminal for the call
//! - Optional *raw* body logging via `DEEPEST_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), deepest_http::HttpError> {
//! let fetcher = deepest_http::PageFetcher::new()?;
//! let page = fetcher.fetch("https://example.com/").await?;
//! assert!(!page.contains('\n'));
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), and final errors. Raw bodies
//! go to target `http.raw` when `DEEPEST_HTTP_RAW=1`.

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::env;
use std::time::Duration;
use thiserror::Error;

pub use reqwest::StatusCode;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "DEEPEST_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}, body_snippet: {body_snippet}")]
    Status {
        status: StatusCode,
        body_snippet: String,
    },
}

// ==============================
// Page source seam
// ==============================

/// Anything that can turn a URL into page markup.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, HttpError>;
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct PageFetcher {
    inner: Client,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
}

impl PageFetcher {
    /// Construct a fetcher with default timeouts.
    ///
    /// ```no_run
    /// use deepest_http::{HttpError, PageFetcher};
    /// use std::time::Duration;
    ///
    /// let fetcher = PageFetcher::new()?;
    /// assert_eq!(fetcher.timeout, Duration::from_secs(15));
    /// assert_eq!(fetcher.connect_timeout, Duration::from_secs(5));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        let connect_timeout = Duration::from_secs(5);
        Ok(Self {
            inner: build_client(connect_timeout, None)?,
            timeout: Duration::from_secs(15),
            connect_timeout,
            user_agent: None,
        })
    }

    /// Override the whole-request timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.timeout = dur;
        self
    }

    /// Override the connect timeout. Rebuilds the underlying client.
    pub fn with_connect_timeout(mut self, dur: Duration) -> Result<Self, HttpError> {
        self.connect_timeout = dur;
        self.inner = build_client(dur, self.user_agent.as_deref())?;
        Ok(self)
    }

    /// Send a custom `User-Agent`. Rebuilds the underlying client.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Result<Self, HttpError> {
        let agent = agent.into();
        self.inner = build_client(self.connect_timeout, Some(&agent))?;
        self.user_agent = Some(agent);
        Ok(self)
    }

    /// GET `url` and return its body as a single line.
    pub async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        let url = parse_page_url(url)?;

        // Lightweight request id without extra deps
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms=self.timeout.as_millis() as u64,
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = self
            .inner
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
                HttpError::Network(err.to_string())
            })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, %status, message=%err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            "http.response.headers"
        );

        if raw_enabled() {
            let mut body_snip = bytes.to_vec();
            let truncated = body_snip.len() > RAW_MAX_BODY;
            if truncated {
                body_snip.truncate(RAW_MAX_BODY);
            }
            let text = String::from_utf8_lossy(&body_snip);
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(req_id=%req_id, body_snippet=%snippet, "http.response.body_snippet");

        if status != StatusCode::OK {
            tracing::warn!(req_id=%req_id, %status, body_snippet=%snippet, "http.error");
            return Err(HttpError::Status {
                status,
                body_snippet: snippet,
            });
        }

        Ok(join_lines(&String::from_utf8_lossy(&bytes)))
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, HttpError> {
        self.fetch(url).await
    }
}

// ==============================
// Helpers
// ==============================

fn build_client(connect_timeout: Duration, user_agent: Option<&str>) -> Result<Client, HttpError> {
    let mut builder = Client::builder().connect_timeout(connect_timeout);
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }
    builder.build().map_err(|e| HttpError::Build(e.to_string()))
}

fn parse_page_url(raw: &str) -> Result<Url, HttpError> {
    let url = Url::parse(raw.trim()).map_err(|e| HttpError::Url(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HttpError::Url(format!("unsupported scheme `{other}`"))),
    }
}

/// Concatenate the lines of `body` with no separator.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn join_lines(body: &str) -> String {
    body.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        let mut cut = 500;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
