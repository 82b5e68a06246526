pub mod model_client;
pub mod progress;

// Re-export traits
pub use model_client::{ GenerationRequest, ModelClient };
pub use progress::{ NoopProgress, ProgressSink };
