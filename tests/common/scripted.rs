//! Scripted generative model

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rfi_analyzer::{GenerativeModel, Generation, ProviderError};

/// Plays back queued `generate` results in order
///
/// Once the script runs out every further call fails with an invalid-request
/// error, which the executor never retries.
#[derive(Debug)]
pub struct ScriptedModel {
    name: String,
    script: Mutex<VecDeque<Result<Generation, ProviderError>>>,
    token_count: Option<u32>,
    generate_calls: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(script: impl IntoIterator<Item = Result<Generation, ProviderError>>) -> Self {
        Self {
            name: "scripted-model".to_string(),
            script: Mutex::new(script.into_iter().collect()),
            token_count: Some(100),
            generate_calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer `count_tokens` with `count`, or fail it when `None`
    pub fn with_token_count(mut self, count: Option<u32>) -> Self {
        self.token_count = count;
        self
    }

    pub fn generate_calls(&self) -> u32 {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn model_name(&self) -> String {
        self.name.clone()
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, ProviderError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        self.script.lock().pop_front().unwrap_or_else(|| {
            Err(ProviderError::invalid_request(
                "scripted",
                "script exhausted",
            ))
        })
    }

    async fn count_tokens(&self, _text: &str) -> Result<u32, ProviderError> {
        self.token_count
            .ok_or_else(|| ProviderError::network("scripted", "countTokens unavailable"))
    }
}
