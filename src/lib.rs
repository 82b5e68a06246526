pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod recovery;
pub mod render;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ ModelConfig, ModelId, DEFAULT_TEMPERATURE, MAX_TEMPERATURE, MIN_TEMPERATURE };
pub use errors::{ ClientError, DocGenError, DocGenResult, ErrorContext, ErrorSeverity, RecoverableError };
pub use implementations::config::GeneratorConfig;
pub use implementations::openai_client::OpenAiClient;
pub use implementations::pipeline::{ DocumentationPipeline, StageDescriptor, ValidationMode };
pub use models::{
    bundle::DocumentationBundle,
    documents::{ ApiMapDoc, FlowDoc, RequirementsDoc },
    stage::{ Stage, StageResult, UNPARSEABLE_MESSAGE },
};
pub use recovery::recover_json;
pub use render::{ render, serialize };
pub use traits::{ GenerationRequest, ModelClient, NoopProgress, ProgressSink };
