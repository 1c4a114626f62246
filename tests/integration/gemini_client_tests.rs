//! Gemini client integration tests
//!
//! Runs the REST client against a wiremock server standing in for the
//! Generative Language API.

#[cfg(test)]
mod tests {
    use crate::common::{analysis_json, gemini_error_body, gemini_response_body};
    use rfi_analyzer::core::analysis::FailureKind;
    use rfi_analyzer::{
        ErrorClass, GeminiClient, GeminiConfig, GenerativeModel, ProviderError, RequestExecutor,
        SchedulerConfig,
    };
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";
    const COUNT_PATH: &str = "/v1beta/models/gemini-1.5-flash:countTokens";

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(GeminiConfig::new_google_ai("test-key").with_base_url(server.uri()))
            .unwrap()
    }

    async fn mount_error(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    // ==================== Success Paths ====================

    #[tokio::test]
    async fn test_generate_sends_prompt_and_reads_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "test-key"))
            .and(body_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(gemini_response_body("hi there", Some(7))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let generation = client(&server).generate("hello").await.unwrap();
        assert_eq!(generation.text, "hi there");
        assert_eq!(generation.output_tokens(), Some(7));
    }

    #[tokio::test]
    async fn test_generate_without_usage_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response_body("x", None)))
            .mount(&server)
            .await;

        let generation = client(&server).generate("hello").await.unwrap();
        assert_eq!(generation.output_tokens(), None);
    }

    #[tokio::test]
    async fn test_count_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COUNT_PATH))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 42})))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client(&server).count_tokens("some text").await.unwrap(), 42);
    }

    // ==================== Error Mapping ====================

    #[tokio::test]
    async fn test_quota_exhausted_is_rate_limit() {
        let server = MockServer::start().await;
        let mut body = gemini_error_body(429, "RESOURCE_EXHAUSTED", "Quota exceeded");
        body["error"]["details"] = json!([{
            "@type": "type.googleapis.com/google.rpc.RetryInfo",
            "retryDelay": "17s"
        }]);
        mount_error(&server, 429, body).await;

        let err = client(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimit { .. }));
        assert_eq!(err.retry_after(), Some(17));
        assert_eq!(ErrorClass::of(&err), ErrorClass::RateLimited);
    }

    #[tokio::test]
    async fn test_unavailable_is_server_error() {
        let server = MockServer::start().await;
        mount_error(
            &server,
            503,
            gemini_error_body(503, "UNAVAILABLE", "The model is overloaded"),
        )
        .await;

        let err = client(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::ProviderUnavailable { .. }));
        assert_eq!(ErrorClass::of(&err), ErrorClass::ServerUnavailable);
    }

    #[tokio::test]
    async fn test_plain_500_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let err = client(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { status: 500, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_invalid_key_is_fatal() {
        let server = MockServer::start().await;
        mount_error(
            &server,
            400,
            gemini_error_body(400, "INVALID_ARGUMENT", "API key not valid"),
        )
        .await;

        let err = client(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_invalid_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
            )
            .mount(&server)
            .await;

        let err = client(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let err = client(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::ResponseParsing { .. }));
    }

    // ==================== Through the Executor ====================

    #[tokio::test]
    async fn test_executor_recovers_from_one_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COUNT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 12})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(gemini_error_body(429, "RESOURCE_EXHAUSTED", "slow down")),
            )
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(gemini_response_body(
                    &format!("```json\n{}\n```", analysis_json("TechNet")),
                    Some(64),
                )),
            )
            .with_priority(2)
            .mount(&server)
            .await;

        let executor =
            RequestExecutor::new(Arc::new(client(&server)), &SchedulerConfig::default()).unwrap();
        let outcome = executor.execute_with_outcome("analyze").await;

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.analysis.submitter_name, "TechNet");
        assert_eq!(outcome.estimate.input_tokens, 12);

        let usage = executor.usage_summary();
        assert_eq!(usage.model_name, "gemini-1.5-flash");
        assert_eq!(usage.requests, 1);
        assert_eq!(usage.output_tokens, 64);
        assert_eq!(usage.errors, 1);
    }

    #[tokio::test]
    async fn test_executor_gives_up_on_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COUNT_PATH))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(gemini_error_body(403, "PERMISSION_DENIED", "denied")),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(gemini_error_body(403, "PERMISSION_DENIED", "denied")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let executor =
            RequestExecutor::new(Arc::new(client(&server)), &SchedulerConfig::default()).unwrap();
        let outcome = executor.execute_with_outcome("three word prompt").await;

        assert_eq!(outcome.attempts, 1);
        assert!(outcome.estimate.is_approximate);
        assert_eq!(outcome.analysis.failure_kind(), Some(FailureKind::RequestRejected));
    }
}
