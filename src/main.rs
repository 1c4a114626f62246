//! rfi-analyzer - rate-limited batch analysis of RFI responses
//!
//! Reads Markdown responses, asks the model for a structured analysis of each
//! one and prints one JSON line per document on stdout. Logs go to stderr.

#![allow(missing_docs)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rfi_analyzer::core::batch::{discover_documents, select_documents};
use rfi_analyzer::{AppConfig, BatchRunner, GeminiClient, RequestExecutor, build_info};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Analyze public-comment RFI responses with a generative model
#[derive(Debug, Parser)]
#[command(name = "rfi-analyzer", version, about, long_about = None)]
struct Cli {
    /// 0-based indices of the documents to process (default: all)
    #[arg(value_name = "K")]
    indices: Vec<usize>,

    /// File or directory of Markdown responses; may be repeated
    #[arg(short, long = "input", value_name = "PATH", default_value = ".")]
    inputs: Vec<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Google AI API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide = true, hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Model name, e.g. gemini-1.5-flash
    #[arg(long)]
    model: Option<String>,

    /// List the discovered documents with their indices and exit
    #[arg(long)]
    list_files: bool,

    /// Requests per minute limit
    #[arg(long, value_name = "N")]
    rpm_limit: Option<f64>,

    /// Input tokens per minute limit
    #[arg(long, value_name = "N")]
    input_tpm_limit: Option<f64>,

    /// Output tokens per minute limit
    #[arg(long, value_name = "N")]
    output_tpm_limit: Option<f64>,

    /// Attempts per document before giving up
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,

    /// Minimum seconds spent per document
    #[arg(long, value_name = "SECONDS")]
    target_cycle_time_per_doc: Option<f64>,

    /// Append identified document sections to this file
    #[arg(long, value_name = "FILE")]
    sections_log_file: Option<PathBuf>,

    /// Skip the one-request API check made before the batch starts
    #[arg(long)]
    skip_preflight: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// Apply command-line overrides on top of the file configuration
    fn apply(&self, config: &mut AppConfig) {
        if let Some(key) = self.api_key.clone().or_else(|| self.gemini_api_key.clone()) {
            config.gemini.api_key = Some(key);
        }
        if let Some(model) = &self.model {
            config.gemini.model = model.clone();
        }
        if let Some(rpm) = self.rpm_limit {
            config.scheduler.requests_per_minute = rpm;
        }
        if let Some(tpm) = self.input_tpm_limit {
            config.scheduler.input_tokens_per_minute = tpm;
        }
        if let Some(tpm) = self.output_tpm_limit {
            config.scheduler.output_tokens_per_minute = tpm;
        }
        if let Some(max_retries) = self.max_retries {
            config.scheduler.max_retries = max_retries;
        }
        if let Some(seconds) = self.target_cycle_time_per_doc {
            config.batch.target_cycle_seconds = seconds;
        }
        if let Some(path) = &self.sections_log_file {
            config.batch.sections_log_file = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries results only
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let build = build_info();
    info!(
        "rfi-analyzer {} ({}, {})",
        build.version, build.git_hash, build.rust_version
    );

    let documents = discover_documents(&cli.inputs).await?;
    if cli.list_files {
        if documents.is_empty() {
            warn!("No documents found");
        }
        for (index, path) in documents.iter().enumerate() {
            println!("{}: {}", index, path.display());
        }
        return Ok(());
    }
    let selected = select_documents(&documents, &cli.indices)?;
    info!("Selected {} of {} documents", selected.len(), documents.len());

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path).await?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let client = GeminiClient::new(config.gemini.clone()).context("Failed to create Gemini client")?;
    let executor = Arc::new(RequestExecutor::new(Arc::new(client), &config.scheduler)?);
    if cli.skip_preflight {
        warn!("Skipping preflight API check");
    } else {
        executor
            .preflight()
            .await
            .context("Check the API key and model name")?;
    }
    let runner = BatchRunner::new(executor, config.batch.clone());

    let mut stdout = tokio::io::stdout();
    let summary = runner.run(&selected, &mut stdout).await?;
    info!(
        "Processed {} documents: {} analyzed, {} failed",
        summary.documents, summary.analyzed, summary.failed
    );

    Ok(())
}
