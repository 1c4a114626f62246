//! Sequential batch runner

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tracing::{info, warn};

use super::discovery::document_name;
use crate::config::BatchConfig;
use crate::core::analysis::{AnalysisPrompt, SubmissionAnalysis};
use crate::core::scheduler::{RequestExecutor, UsageSummary};
use crate::utils::error::Result;

/// One output line: the document name followed by its analysis fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentResult {
    pub file: String,
    #[serde(flatten)]
    pub analysis: SubmissionAnalysis,
}

/// Totals for a finished batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub documents: usize,
    pub analyzed: usize,
    pub failed: usize,
    pub usage: UsageSummary,
}

/// Runs documents one at a time through a shared [`RequestExecutor`]
#[derive(Debug)]
pub struct BatchRunner {
    executor: Arc<RequestExecutor>,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(executor: Arc<RequestExecutor>, config: BatchConfig) -> Self {
        Self { executor, config }
    }

    /// Analyze every document, writing one JSON line per document to `out`
    pub async fn run<W>(&self, documents: &[PathBuf], out: &mut W) -> Result<BatchSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let mut analyzed = 0;
        let mut failed = 0;

        for path in documents {
            let started = Instant::now();
            info!("Processing: {}...", path.display());

            let result = self.analyze_document(path).await;
            self.log_sections(&result).await;

            if result.analysis.is_failure() {
                failed += 1;
            } else {
                analyzed += 1;
            }

            let mut line = serde_json::to_vec(&result)?;
            line.push(b'\n');
            out.write_all(&line).await?;
            out.flush().await?;

            self.pace(started).await;
        }

        let summary = BatchSummary {
            documents: documents.len(),
            analyzed,
            failed,
            usage: self.executor.usage_summary(),
        };
        info!("--- End of Analysis ---");
        info!(
            model = %summary.usage.model_name,
            requests = summary.usage.requests,
            input_tokens = summary.usage.input_tokens,
            output_tokens = summary.usage.output_tokens,
            errors = summary.usage.errors,
            "API usage summary"
        );
        Ok(summary)
    }

    /// Read one document and analyze it
    ///
    /// Unreadable and empty documents yield sentinel records without calling
    /// the model.
    pub async fn analyze_document(&self, path: &Path) -> DocumentResult {
        let file = document_name(path);

        let analysis = match tokio::fs::read(path).await {
            Err(e) => {
                warn!("Skipping {} due to read error: {}", path.display(), e);
                SubmissionAnalysis::read_error()
            }
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                let text = text.trim();
                if text.is_empty() {
                    warn!("Skipping {} as content is empty.", path.display());
                    SubmissionAnalysis::empty_content()
                } else {
                    info!(
                        "Read text (length: {} chars) for {}.",
                        text.chars().count(),
                        path.display()
                    );
                    let prompt = AnalysisPrompt::render(&file, text, self.config.max_text_length);
                    self.executor.execute(&prompt).await
                }
            }
        };

        DocumentResult { file, analysis }
    }

    async fn log_sections(&self, result: &DocumentResult) {
        let Some(log_file) = &self.config.sections_log_file else {
            return;
        };
        if result.analysis.is_failure() {
            return;
        }

        let sections = &result.analysis.identified_sections;
        if sections.is_empty() {
            info!("No sections identified for {} to log.", result.file);
            return;
        }

        if let Err(e) = append_sections(log_file, &result.file, sections).await {
            warn!(
                "Could not write to sections log file '{}': {}",
                log_file.display(),
                e
            );
            return;
        }
        info!(
            "Logged identified sections to '{}'. Sections: {:?}",
            log_file.display(),
            sections
        );
    }

    /// Sleep out the rest of the minimum per-document cycle
    async fn pace(&self, started: Instant) {
        let target =
            Duration::try_from_secs_f64(self.config.target_cycle_seconds).unwrap_or_default();
        let spent = started.elapsed();

        match target.checked_sub(spent) {
            Some(remaining) if !remaining.is_zero() => {
                info!(
                    "Document processing took {:.2}s. Min cycle time enforced: Waiting for {:.2}s.",
                    spent.as_secs_f64(),
                    remaining.as_secs_f64()
                );
                tokio::time::sleep(remaining).await;
            }
            _ => info!(
                "Document processing took {:.2}s. (Min cycle target: {}s).",
                spent.as_secs_f64(),
                self.config.target_cycle_seconds
            ),
        }
    }
}

async fn append_sections(log_file: &Path, file: &str, sections: &[String]) -> Result<()> {
    let line = format!("{} : {}\n", file, serde_json::to_string(sections)?);
    let mut handle = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .await?;
    handle.write_all(line.as_bytes()).await?;
    handle.flush().await?;
    Ok(())
}
