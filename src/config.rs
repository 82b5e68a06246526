use std::fmt;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };

use crate::errors::{ DocGenError, DocGenResult };

/// Lowest accepted sampling temperature
pub const MIN_TEMPERATURE: f32 = 0.0;
/// Highest accepted sampling temperature
pub const MAX_TEMPERATURE: f32 = 1.0;
/// Temperature used when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Models the generator can be pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "gpt-4")]
    Gpt4,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::Gpt35Turbo, ModelId::Gpt4];

    /// Identifier sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gpt35Turbo => "gpt-3.5-turbo",
            ModelId::Gpt4 => "gpt-4",
        }
    }
}

impl Default for ModelId {
    fn default() -> Self {
        ModelId::Gpt35Turbo
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = DocGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gpt-3.5-turbo" | "gpt-3.5" | "gpt35" => Ok(ModelId::Gpt35Turbo),
            "gpt-4" | "gpt4" => Ok(ModelId::Gpt4),
            _ =>
                Err(
                    DocGenError::Configuration(
                        format!(
                            "Unsupported model: {} (expected one of: {})",
                            s,
                            ModelId::ALL.iter()
                                .map(|m| m.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )
                    )
                ),
        }
    }
}

/// Model settings for one documentation run
#[derive(Clone, PartialEq)]
pub struct ModelConfig {
    pub model: ModelId,
    pub temperature: f32,
    pub api_key: String,
}

impl ModelConfig {
    pub fn new(model: ModelId, temperature: f32, api_key: impl Into<String>) -> Self {
        Self {
            model,
            temperature,
            api_key: api_key.into(),
        }
    }

    /// Check the preconditions of a run. The key's format is not inspected.
    pub fn validate(&self) -> DocGenResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(DocGenError::Configuration("An API key is required".to_string()));
        }

        if
            !self.temperature.is_finite() ||
            self.temperature < MIN_TEMPERATURE ||
            self.temperature > MAX_TEMPERATURE
        {
            return Err(
                DocGenError::Configuration(
                    format!(
                        "Temperature must be between {} and {}, got {}",
                        MIN_TEMPERATURE,
                        MAX_TEMPERATURE,
                        self.temperature
                    )
                )
            );
        }

        Ok(())
    }
}

// Keeps the credential out of logs and panic messages.
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
