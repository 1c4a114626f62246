//! Batch integration tests
//!
//! Discovery, selection and the sequential runner over real files.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedModel, analysis_json};
    use rfi_analyzer::core::batch::{discover_documents, select_documents};
    use rfi_analyzer::core::scheduler::PREFLIGHT_PROMPT;
    use rfi_analyzer::{
        AnalyzerError, BatchConfig, BatchRunner, Generation, ProviderError, RequestExecutor,
        SchedulerConfig,
    };
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn corpus() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("acme.md"), "# ACME\n\nWe support the plan.").unwrap();
        std::fs::write(dir.path().join("beta.md"), "# Beta Labs\n\nOpen weights matter.").unwrap();
        std::fs::write(dir.path().join("blank.md"), "  \n\n ").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a submission").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.md"), "hidden").unwrap();
        dir
    }

    fn runner(model: Arc<ScriptedModel>, sections_log: Option<PathBuf>) -> BatchRunner {
        let executor = RequestExecutor::new(model, &SchedulerConfig::default()).unwrap();
        let config = BatchConfig {
            target_cycle_seconds: 0.0,
            sections_log_file: sections_log,
            ..BatchConfig::default()
        };
        BatchRunner::new(Arc::new(executor), config)
    }

    fn lines(out: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn names(paths: &[PathBuf]) -> Vec<&str> {
        paths
            .iter()
            .map(|p| p.file_name().and_then(|n| n.to_str()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_discovery_lists_markdown_in_order() {
        let dir = corpus();
        let documents = discover_documents(&[dir.path().to_path_buf()]).await.unwrap();
        assert_eq!(names(&documents), vec!["acme.md", "beta.md", "blank.md"]);
    }

    #[tokio::test]
    async fn test_selection_keeps_requested_order() {
        let dir = corpus();
        let documents = discover_documents(&[dir.path().to_path_buf()]).await.unwrap();

        let selected = select_documents(&documents, &[1, 0]).unwrap();
        assert_eq!(names(&selected), vec!["beta.md", "acme.md"]);

        let err = select_documents(&documents, &[3]).unwrap_err();
        assert!(err.to_string().contains("valid range is 0 to 2"));
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let dir = corpus();
        let documents = discover_documents(&[dir.path().to_path_buf()]).await.unwrap();
        let model = Arc::new(ScriptedModel::new([
            Ok(Generation::new(analysis_json("ACME")).with_output_tokens(40)),
            Err(ProviderError::authentication("gemini", "key revoked")),
        ]));

        let mut out = Vec::new();
        let summary = runner(model.clone(), None)
            .run(&documents, &mut out)
            .await
            .unwrap();

        let records = lines(&out);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["file"], "acme.md");
        assert_eq!(records[0]["submitter_name"], "ACME");
        assert_eq!(records[1]["file"], "beta.md");
        assert_eq!(records[1]["submitter_name"], "API Handler Error");
        assert_eq!(records[1]["inferred_submitter_type"], "Request Rejected");
        assert_eq!(records[2]["file"], "blank.md");
        assert_eq!(records[2]["submitter_name"], "Empty Content");

        // The blank document never reaches the model
        assert_eq!(model.generate_calls(), 2);
        assert_eq!(summary.documents, 3);
        assert_eq!(summary.analyzed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.usage.requests, 1);
        assert_eq!(summary.usage.errors, 1);
    }

    #[tokio::test]
    async fn test_long_document_is_truncated_in_prompt() {
        let dir = corpus();
        let documents = vec![dir.path().join("acme.md")];
        let model = Arc::new(ScriptedModel::new([Ok(
            Generation::new(analysis_json("ACME")).with_output_tokens(40),
        )]));
        let executor = RequestExecutor::new(model.clone(), &SchedulerConfig::default()).unwrap();
        let config = BatchConfig {
            target_cycle_seconds: 0.0,
            max_text_length: 10,
            ..BatchConfig::default()
        };

        let mut out = Vec::new();
        BatchRunner::new(Arc::new(executor), config)
            .run(&documents, &mut out)
            .await
            .unwrap();

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("filename 'acme.md'"));
        assert!(prompts[0].contains("first 10 characters if truncated"));
        assert!(prompts[0].contains("# ACME\n\nWe...\n```"));
        assert!(!prompts[0].contains("support the plan"));
    }

    #[tokio::test]
    async fn test_failed_preflight_stops_before_documents() {
        let dir = corpus();
        let documents = discover_documents(&[dir.path().to_path_buf()]).await.unwrap();
        let model = Arc::new(ScriptedModel::new([
            Err(ProviderError::authentication("gemini", "API key not valid")),
            Ok(Generation::new(analysis_json("ACME")).with_output_tokens(40)),
        ]));
        let executor =
            Arc::new(RequestExecutor::new(model.clone(), &SchedulerConfig::default()).unwrap());

        let mut out = Vec::new();
        let result = match executor.preflight().await {
            Ok(()) => BatchRunner::new(executor.clone(), BatchConfig::default())
                .run(&documents, &mut out)
                .await
                .map(|_| ()),
            Err(e) => Err(e),
        };

        assert!(matches!(result, Err(AnalyzerError::Preflight(_))));
        assert_eq!(model.generate_calls(), 1);
        assert_eq!(model.prompts(), vec![PREFLIGHT_PROMPT.to_string()]);
        assert!(out.is_empty());
        assert_eq!(executor.usage_summary().errors, 1);
    }

    #[tokio::test]
    async fn test_sections_log_across_documents() {
        let dir = corpus();
        let log = dir.path().join("sections.log");
        let documents = vec![dir.path().join("acme.md"), dir.path().join("beta.md")];
        let model = Arc::new(ScriptedModel::new([
            Ok(Generation::new(analysis_json("ACME")).with_output_tokens(40)),
            Ok(Generation::new(analysis_json("Beta Labs")).with_output_tokens(40)),
        ]));

        let mut out = Vec::new();
        runner(model, Some(log.clone()))
            .run(&documents, &mut out)
            .await
            .unwrap();

        let logged = std::fs::read_to_string(&log).unwrap();
        let logged: Vec<&str> = logged.lines().collect();
        assert_eq!(
            logged,
            vec![
                r#"acme.md : ["Summary","Recommendations"]"#,
                r#"beta.md : ["Summary","Recommendations"]"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_explicit_file_outside_directory_scan() {
        let dir = corpus();
        let deep = dir.path().join("nested").join("deep.md");
        let documents = discover_documents(&[dir.path().to_path_buf(), deep.clone()])
            .await
            .unwrap();
        assert!(documents.iter().any(|p| p == &deep));
        assert_eq!(documents.len(), 4);
    }
}
