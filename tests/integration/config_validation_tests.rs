//! Configuration loading and validation tests

#[cfg(test)]
mod tests {
    use crate::common::ScriptedModel;
    use crate::{assert_err, assert_ok};
    use rfi_analyzer::config::Validate;
    use rfi_analyzer::{AnalyzerError, AppConfig, RequestExecutor, SchedulerConfig};
    use std::io::Write;
    use std::sync::Arc;

    fn write_config(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_full_config_file() {
        let file = write_config(
            r#"
gemini:
  api_key: test-key
  model: gemini-2.0-flash
  request_timeout: 120
scheduler:
  requests_per_minute: 10
  input_tokens_per_minute: 250000
  output_tokens_per_minute: 8000
  max_retries: 5
  output_estimate_cap: 1024
batch:
  target_cycle_seconds: 2.5
  max_text_length: 40000
  sections_log_file: sections.log
"#,
        );

        let config = assert_ok!(AppConfig::from_file(file.path()).await);
        assert_ok!(config.validate());

        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.request_timeout, 120);
        assert_eq!(config.scheduler.input_tokens_per_minute, 250_000.0);
        assert_eq!(config.scheduler.max_retries, 5);
        assert_eq!(config.scheduler.output_estimate_cap, 1024);
        assert_eq!(config.batch.target_cycle_seconds, 2.5);
        assert_eq!(config.batch.max_text_length, 40_000);
    }

    #[tokio::test]
    async fn test_partial_config_falls_back_to_defaults() {
        let file = write_config("gemini:\n  api_key: test-key\n");

        let config = AppConfig::from_file(file.path()).await.unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.scheduler, SchedulerConfig::default());
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_zero_output_limit_rejected() {
        let file = write_config(
            "gemini:\n  api_key: test-key\nscheduler:\n  output_tokens_per_minute: 0\n",
        );

        let config = assert_ok!(AppConfig::from_file(file.path()).await);
        let err = assert_err!(config.validate());
        assert!(matches!(err, AnalyzerError::Config(_)));
        assert!(err.to_string().contains("output_tokens_per_minute"));
    }

    #[test]
    fn test_negative_cycle_time_rejected() {
        let mut config = AppConfig::default();
        config.gemini.api_key = Some("test-key".to_string());
        config.batch.target_cycle_seconds = -1.0;
        assert!(config.batch.validate().unwrap_err().contains("target_cycle_seconds"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = AppConfig::default();
        config.gemini.api_key = Some("test-key".to_string());
        config.gemini.base_url = "ftp://example.com".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("Base URL"));
    }

    #[test]
    fn test_executor_rejects_unadmittable_limits() {
        let model = Arc::new(ScriptedModel::new([]));
        let config = SchedulerConfig::default().with_input_tokens_per_minute(0.0);
        assert!(RequestExecutor::new(model, &config).is_err());
    }
}
