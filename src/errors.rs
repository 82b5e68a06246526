use thiserror::Error;

use crate::implementations::config::ConfigError;
use crate::models::stage::Stage;

/// Custom error types for the documentation generator
#[derive(Debug, Error)]
pub enum DocGenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model invocation failed during the {stage} stage: {source}")]
    ModelInvocation {
        stage: Stage,
        #[source]
        source: ClientError,
    },

    #[error("The {stage} stage produced output that does not match its schema: {message}")]
    SchemaValidation { stage: Stage, message: String },

    #[error("Rendering error: {0}")]
    Rendering(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Failures of the model API collaborator
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("The model returned no content")]
    EmptyResponse,
}

/// Result type specific to documentation generation
pub type DocGenResult<T> = Result<T, DocGenError>;

/// Context for error reporting
#[derive(Debug)]
pub struct ErrorContext {
    pub stage: Option<Stage>,
    pub suggestion: Option<String>,
    pub severity: ErrorSeverity,
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Nothing will change on a rerun until the user fixes their input or setup
    Fatal,
    /// The run failed at a stage; rerunning may succeed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Fatal => f.write_str("fatal"),
            ErrorSeverity::Error => f.write_str("error"),
        }
    }
}

/// Recoverable vs. non-recoverable errors
pub trait RecoverableError {
    fn is_recoverable(&self) -> bool;
    fn recovery_strategy(&self) -> Option<String>;
}

impl RecoverableError for DocGenError {
    /// Every error aborts the run; "recoverable" means a user action can make a rerun succeed.
    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DocGenError::ModelInvocation { .. } | DocGenError::SchemaValidation { .. }
        )
    }

    fn recovery_strategy(&self) -> Option<String> {
        match self {
            DocGenError::Configuration(_) =>
                Some(
                    "Provide an API key (--api-key, config file or OPENAI_API_KEY) and a non-empty description.".to_string()
                ),
            DocGenError::ModelInvocation { source: ClientError::Http { status: 401, .. }, .. } =>
                Some("Check that the API key is valid.".to_string()),
            DocGenError::ModelInvocation { source: ClientError::Http { status: 429, .. }, .. } =>
                Some("Rate limit reached; wait a moment before trying again.".to_string()),
            DocGenError::ModelInvocation { .. } | DocGenError::SchemaValidation { .. } =>
                Some("Try adjusting the temperature or using a different model.".to_string()),
            DocGenError::ConfigFile(_) => Some("Fix or remove the configuration file.".to_string()),
            _ => None,
        }
    }
}

impl DocGenError {
    /// Build the reporting context shown to the user
    pub fn context(&self) -> ErrorContext {
        let stage = match self {
            DocGenError::ModelInvocation { stage, .. } => Some(*stage),
            DocGenError::SchemaValidation { stage, .. } => Some(*stage),
            _ => None,
        };
        let severity = if self.is_recoverable() { ErrorSeverity::Error } else { ErrorSeverity::Fatal };

        ErrorContext {
            stage,
            suggestion: self.recovery_strategy(),
            severity,
        }
    }
}
