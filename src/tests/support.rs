//! Shared fixtures: a scripted model client and a recording progress sink.

use async_trait::async_trait;
use log::info;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::{ ModelConfig, ModelId };
use crate::errors::ClientError;
use crate::implementations::config::GeneratorConfig;
use crate::implementations::pipeline::DocumentationPipeline;
use crate::models::stage::{ Stage, StageResult };
use crate::traits::model_client::{ GenerationRequest, ModelClient };
use crate::traits::progress::ProgressSink;

/// Initialize logging once per test binary
pub fn setup() {
    if env_logger::builder().is_test(true).try_init().is_ok() {
        info!("Logger initialized");
    }
}

/// Replays canned responses in order and records every request it receives.
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, ClientError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<Result<String, ClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| Ok(t.to_string()))
                .collect()
        )
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressSink
    ) -> Result<String, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ClientError::EmptyResponse));

        if let Ok(text) = &next {
            // Deliver in two chunks like a streaming client would
            let mid = text.char_indices().nth(text.chars().count() / 2).map(|(i, _)| i).unwrap_or(0);
            progress.token(request.stage, &text[..mid]);
            progress.token(request.stage, &text[mid..]);
        }
        next
    }
}

/// Records progress notifications as strings
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
    pub chunks: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn chunks(&self) -> Vec<String> {
        self.chunks.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn stage_started(&self, stage: Stage) {
        self.events.lock().unwrap().push(format!("start:{}", stage.template_name()));
    }

    fn token(&self, stage: Stage, chunk: &str) {
        self.events.lock().unwrap().push(format!("token:{}", stage.template_name()));
        self.chunks.lock().unwrap().push(chunk.to_string());
    }

    fn stage_finished(&self, stage: Stage, result: &StageResult) {
        let outcome = if result.is_parsed() { "parsed" } else { "unparseable" };
        self.events.lock().unwrap().push(format!("finish:{}:{}", stage.template_name(), outcome));
    }
}

pub fn test_model_config() -> ModelConfig {
    ModelConfig::new(ModelId::Gpt35Turbo, 0.7, "sk-test")
}

pub fn test_pipeline(client: ScriptedClient) -> DocumentationPipeline<ScriptedClient> {
    DocumentationPipeline::new(client, &GeneratorConfig::default())
}
