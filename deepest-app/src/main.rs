use anyhow::Result;
use clap::{Parser, ValueEnum};
use deepest_common::observability::init_logging;
use deepest_common::{DeepestError, OutputFormat};
use deepest_config::DeepestConfigLoader;
use std::path::PathBuf;
use std::process::ExitCode;

use analyzer::{Analyzer, fetcher_from_settings};
use render::render;

mod analyzer;
mod render;

const DEFAULT_CONFIG_FILE: &str = "deepest.yaml";

/// Fetch a web page and print the text found at its deepest tag nesting.
#[derive(Debug, Parser)]
#[command(name = "deepest", version, about)]
struct Cli {
    /// Page to analyze (http or https).
    url: String,

    /// Configuration file. Defaults to `deepest.yaml` in the working
    /// directory when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format; overrides the configured one.
    #[arg(long, value_enum)]
    output: Option<OutputArg>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    Text,
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Text => OutputFormat::Text,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Usage errors exit here, before any config, logging or network work.
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // 1) Load config (env wins)
    let loader = match &cli.config {
        Some(path) => DeepestConfigLoader::new().with_file(path),
        None => DeepestConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let cfg = loader.load()?;

    // 2) Logging
    let mut log = cfg.log.to_log_config("deepest");
    if cli.verbose {
        log.default_filter = "debug".into();
    }
    if let Some(path) = init_logging(log)? {
        tracing::debug!(path = %path.display(), "logging to file");
    }

    // 3) Fetch and scan
    let analyzer = Analyzer::new(fetcher_from_settings(&cfg.http)?);
    let format = cli.output.map(OutputFormat::from).unwrap_or(cfg.output);

    match analyzer.analyze(&cli.url).await {
        Ok(report) => {
            println!("{}", render(&cli.url, &report, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(DeepestError::Fetch(reason)) => {
            tracing::warn!(url = %cli.url, %reason, "page read failed");
            eprintln!("Error: Unable to read the page: {reason}");
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other.into()),
    }
}
