use serde::{ Deserialize, Serialize };
use serde_json::Value;

use crate::errors::DocGenResult;
use crate::models::stage::{ is_error_marker, Stage, StageResult };

/// The three stage documents of one run, exported together.
///
/// Field order fixes the key order of the combined export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationBundle {
    #[serde(rename = "requisitos")]
    pub requirements: Value,

    #[serde(rename = "fluxo_componentes")]
    pub flow: Value,

    #[serde(rename = "mapa_apis")]
    pub api_map: Value,
}

impl DocumentationBundle {
    pub fn new(requirements: StageResult, flow: StageResult, api_map: StageResult) -> Self {
        Self {
            requirements: requirements.into_value(),
            flow: flow.into_value(),
            api_map: api_map.into_value(),
        }
    }

    /// Document produced by the given stage
    pub fn document(&self, stage: Stage) -> &Value {
        match stage {
            Stage::Requirements => &self.requirements,
            Stage::Flow => &self.flow,
            Stage::ApiMap => &self.api_map,
        }
    }

    /// Stages whose document is an error marker
    pub fn unparseable_stages(&self) -> Vec<Stage> {
        Stage::ALL.iter()
            .copied()
            .filter(|stage| is_error_marker(self.document(*stage)))
            .collect()
    }

    /// Pretty-printed combined export (2-space indentation, non-ASCII kept as is)
    pub fn to_json_pretty(&self) -> DocGenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a combined export back into a bundle
    pub fn from_json(text: &str) -> DocGenResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
