use deepest_common::OutputFormat;
use deepest_scan::{ScanOutcome, ScanReport};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    url: &'a str,
    outcome: &'a ScanOutcome,
    max_depth: u64,
}

/// Render one scan result for stdout.
pub fn render(url: &str, report: &ScanReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(report.outcome.as_str().to_string()),
        OutputFormat::Json => Ok(serde_json::to_string(&JsonReport {
            url,
            outcome: &report.outcome,
            max_depth: report.max_depth,
        })?),
    }
}
