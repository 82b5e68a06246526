use std::fmt;

use serde_json::{ Map, Value };

/// Message stored in the error marker when no JSON could be salvaged
pub const UNPARSEABLE_MESSAGE: &str = "Não foi possível gerar um JSON válido";

/// Key of the error marker's message field
pub const MARKER_ERROR_KEY: &str = "erro";

/// Key of the error marker's raw-text field
pub const MARKER_RAW_KEY: &str = "resposta_original";

/// One of the three sequential generation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Requirements,
    Flow,
    ApiMap,
}

impl Stage {
    /// Execution order
    pub const ALL: [Stage; 3] = [Stage::Requirements, Stage::Flow, Stage::ApiMap];

    /// Name of the prompt template for this stage
    pub fn template_name(&self) -> &'static str {
        match self {
            Stage::Requirements => "requisitos",
            Stage::Flow => "fluxo",
            Stage::ApiMap => "apis",
        }
    }

    /// Placeholder the stage's input is substituted into
    pub fn input_placeholder(&self) -> &'static str {
        match self {
            Stage::Requirements => "descricao_sistema",
            Stage::Flow => "requisitos",
            Stage::ApiMap => "fluxo_componentes",
        }
    }

    /// Top-level key of the stage's document in the combined export
    pub fn export_key(&self) -> &'static str {
        match self {
            Stage::Requirements => "requisitos",
            Stage::Flow => "fluxo_componentes",
            Stage::ApiMap => "mapa_apis",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Requirements => "requirements",
            Stage::Flow => "component flow",
            Stage::ApiMap => "API map",
        };
        f.write_str(name)
    }
}

/// Outcome of one stage: the recovered JSON, or a marker carrying the raw model text.
#[derive(Debug, Clone, PartialEq)]
pub enum StageResult {
    Parsed(Value),
    Unparseable { raw: String },
}

impl StageResult {
    pub fn is_parsed(&self) -> bool {
        matches!(self, StageResult::Parsed(_))
    }

    /// JSON form of the result; the unparseable case becomes `{"erro": ..., "resposta_original": ...}`
    pub fn to_value(&self) -> Value {
        match self {
            StageResult::Parsed(value) => value.clone(),
            StageResult::Unparseable { raw } => error_marker(raw),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            StageResult::Parsed(value) => value,
            StageResult::Unparseable { raw } => error_marker(&raw),
        }
    }

    /// Compact JSON text handed to the next stage's prompt
    pub fn to_input_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// Build the error marker object for unrecoverable model output
pub fn error_marker(raw: &str) -> Value {
    let mut marker = Map::new();
    marker.insert(MARKER_ERROR_KEY.to_string(), Value::String(UNPARSEABLE_MESSAGE.to_string()));
    marker.insert(MARKER_RAW_KEY.to_string(), Value::String(raw.to_string()));
    Value::Object(marker)
}

/// Whether a document is an error marker produced by an unrecovered stage
pub fn is_error_marker(value: &Value) -> bool {
    value
        .as_object()
        .map(|obj| obj.contains_key(MARKER_ERROR_KEY) && obj.contains_key(MARKER_RAW_KEY))
        .unwrap_or(false)
}
