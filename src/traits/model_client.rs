use async_trait::async_trait;

use crate::config::ModelId;
use crate::errors::ClientError;
use crate::models::stage::Stage;
use crate::traits::progress::ProgressSink;

/// One prompt submitted to the model on behalf of a stage
#[derive(Clone)]
pub struct GenerationRequest {
    pub stage: Stage,
    /// Description text or serialized JSON of the previous stage
    pub input: String,
    /// Fully rendered prompt
    pub prompt: String,
    pub model: ModelId,
    pub temperature: f32,
    pub api_key: String,
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("stage", &self.stage)
            .field("input_len", &self.input.len())
            .field("prompt_len", &self.prompt.len())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Text-in, text-out access to a hosted language model
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate the complete response for a request.
    ///
    /// Implementations that receive the answer incrementally pass each chunk to
    /// `progress.token` but only return once the full text is assembled.
    async fn generate(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressSink
    ) -> Result<String, ClientError>;
}
