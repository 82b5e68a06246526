use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::{ ModelId, DEFAULT_TEMPERATURE };
use crate::models::stage::Stage;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required API key: {0}")]
    MissingApiKey(String),

    #[error("Unknown prompt template: {0}")]
    UnknownTemplate(String),
}

/// Environment variable consulted for the API key
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Default chat-completions endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    /// API key for the LLM service
    pub api_key: Option<String>,

    /// Chat-completions endpoint
    pub api_endpoint: String,

    /// Model used when none is given on the command line
    pub model: ModelId,

    /// Temperature for generation (0.0-1.0)
    pub temperature: f32,

    /// Per-request timeout of the HTTP client, in seconds
    pub request_timeout_secs: u64,

    /// Receive the model output incrementally
    pub stream: bool,

    /// Reject stage output that does not match the stage's schema
    pub strict: bool,

    /// Prompt templates overriding the built-in ones, keyed by stage template name
    pub prompt_templates: HashMap<String, String>,
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_yaml::from_str(&contents)?;
        config.check_templates()?;
        Ok(config)
    }

    /// Resolve the API key: explicit value, then the config file, then the environment.
    pub fn get_api_key(&self, explicit: Option<&str>) -> Result<String, ConfigError> {
        use log::debug;

        if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from the command line");
            return Ok(key.to_string());
        }

        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from config");
            return Ok(key.to_string());
        }

        match std::env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => {
                debug!("Using API key from {}", API_KEY_ENV_VAR);
                Ok(key)
            }
            _ =>
                Err(
                    ConfigError::MissingApiKey(
                        format!("set --api-key, api_key in the config file, or {}", API_KEY_ENV_VAR)
                    )
                ),
        }
    }

    /// Template for a stage, falling back to the built-in one
    pub fn get_template(&self, stage: Stage) -> String {
        self.prompt_templates
            .get(stage.template_name())
            .cloned()
            .unwrap_or_else(|| default_template(stage).to_string())
    }

    fn check_templates(&self) -> Result<(), ConfigError> {
        for name in self.prompt_templates.keys() {
            if !Stage::ALL.iter().any(|s| s.template_name() == name) {
                return Err(ConfigError::UnknownTemplate(name.clone()));
            }
        }
        Ok(())
    }
}

/// Default configuration
impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            api_key: None,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model: ModelId::default(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: 120,
            stream: true,
            strict: false,
            prompt_templates: HashMap::new(),
        }
    }
}

/// Built-in prompt for a stage
pub fn default_template(stage: Stage) -> &'static str {
    match stage {
        Stage::Requirements => REQUIREMENTS_TEMPLATE,
        Stage::Flow => FLOW_TEMPLATE,
        Stage::ApiMap => API_MAP_TEMPLATE,
    }
}

const REQUIREMENTS_TEMPLATE: &str =
    r#"
Analise a seguinte descrição do sistema e gere requisitos funcionais e não funcionais.
Retorne APENAS um objeto JSON com requisitos funcionais e não funcionais.

O JSON deve seguir este formato:
{
    "requisitos_funcionais": [
        {"id": "RF01", "descricao": "descrição do requisito", "prioridade": "Alta/Média/Baixa"}
    ],
    "requisitos_nao_funcionais": [
        {"id": "RNF01", "descricao": "descrição do requisito", "tipo": "Desempenho/Segurança/Usabilidade"}
    ]
}

Descrição do sistema:
{{descricao_sistema}}
"#;

const FLOW_TEMPLATE: &str =
    r#"
Com base nos requisitos fornecidos, descreva o fluxo de componentes e a arquitetura geral.
Retorne APENAS um objeto JSON com componentes e seus fluxos.

O JSON deve seguir este formato:
{
    "componentes": [
        {
            "nome": "nome do componente",
            "descricao": "descrição detalhada",
            "responsabilidades": ["responsabilidade 1", "responsabilidade 2"],
            "dependencias": ["dependencia 1", "dependencia 2"]
        }
    ],
    "fluxos": [
        {
            "nome": "nome do fluxo",
            "passos": ["passo 1", "passo 2", "passo 3"]
        }
    ]
}

Requisitos:
{{requisitos}}
"#;

const API_MAP_TEMPLATE: &str =
    r#"
Com base no fluxo de componentes, gere um mapa de APIs detalhado.
Retorne APENAS um objeto JSON com as definições das APIs.

O JSON deve seguir este formato:
{
    "apis": [
        {
            "rota": "/caminho/da/api",
            "metodo": "GET/POST/PUT/DELETE",
            "descricao": "descrição da funcionalidade",
            "parametros": {
                "param1": "descrição do parâmetro"
            },
            "respostas": {
                "200": "descrição da resposta de sucesso",
                "400": "descrição do erro"
            }
        }
    ]
}

Fluxo de componentes:
{{fluxo_componentes}}
"#;
