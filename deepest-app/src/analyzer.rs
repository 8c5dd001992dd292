use deepest_common::{DeepestError, Result};
use deepest_config::HttpSettings;
use deepest_http::{PageFetcher, PageSource};
use deepest_scan::{ScanOutcome, ScanReport, scan};
use std::time::Duration;

/// Fetch-then-scan pipeline. The scanner only runs on a successfully read page.
pub struct Analyzer<S> {
    source: S,
}

impl<S: PageSource> Analyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn analyze(&self, url: &str) -> Result<ScanReport> {
        let page = self
            .source
            .fetch_page(url)
            .await
            .map_err(|e| DeepestError::Fetch(e.to_string()))?;
        tracing::debug!(url, page_len = page.len(), "analyze.fetched");

        let report = scan(&page);
        match &report.outcome {
            ScanOutcome::Malformed { offset } => {
                tracing::info!(url, offset, "analyze.malformed");
            }
            ScanOutcome::Deepest { text } => {
                tracing::debug!(
                    url,
                    max_depth = report.max_depth,
                    text_len = text.len(),
                    "analyze.deepest"
                );
            }
        }
        Ok(report)
    }
}

/// Build the real fetcher from configuration.
pub fn fetcher_from_settings(settings: &HttpSettings) -> Result<PageFetcher> {
    let to_config = |e: deepest_http::HttpError| DeepestError::Config(e.to_string());

    let mut fetcher = PageFetcher::new()
        .map_err(to_config)?
        .with_timeout(Duration::from_secs(settings.timeout_secs))
        .with_connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .map_err(to_config)?;
    if let Some(agent) = &settings.user_agent {
        fetcher = fetcher.with_user_agent(agent.as_str()).map_err(to_config)?;
    }
    Ok(fetcher)
}
