use std::collections::BTreeMap;

use serde::{ Deserialize, Serialize };
use serde_json::Value;

use crate::errors::{ DocGenError, DocGenResult };
use crate::models::stage::{ is_error_marker, Stage };

/// Priority of a functional requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Alta", alias = "High")]
    High,
    #[serde(rename = "Média", alias = "Media", alias = "Medium")]
    Medium,
    #[serde(rename = "Baixa", alias = "Low")]
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalRequirement {
    pub id: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonFunctionalRequirement {
    pub id: String,
    #[serde(rename = "descricao")]
    pub description: String,
    /// Desempenho, Segurança, Usabilidade, ... (open set)
    #[serde(rename = "tipo")]
    pub category: String,
}

/// Output of the requirements stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementsDoc {
    #[serde(rename = "requisitos_funcionais")]
    pub functional: Vec<FunctionalRequirement>,
    #[serde(rename = "requisitos_nao_funcionais")]
    pub non_functional: Vec<NonFunctionalRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "responsabilidades", default)]
    pub responsibilities: Vec<String>,
    #[serde(rename = "dependencias", default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "passos")]
    pub steps: Vec<String>,
}

/// Output of the component flow stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDoc {
    #[serde(rename = "componentes")]
    pub components: Vec<Component>,
    #[serde(rename = "fluxos", default)]
    pub flows: Vec<Flow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
    #[serde(alias = "patch")]
    Patch,
    #[serde(alias = "delete")]
    Delete,
    #[serde(alias = "head")]
    Head,
    #[serde(alias = "options")]
    Options,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    #[serde(rename = "rota")]
    pub route: String,
    #[serde(rename = "metodo")]
    pub http_method: HttpMethod,
    #[serde(rename = "descricao")]
    pub description: String,
    /// Parameter name to description, possibly empty
    #[serde(rename = "parametros", default)]
    pub parameters: BTreeMap<String, String>,
    /// Status code to description
    #[serde(rename = "respostas")]
    pub responses: BTreeMap<String, String>,
}

/// Output of the API map stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMapDoc {
    pub apis: Vec<ApiEndpoint>,
}

/// Check a recovered document against the typed schema of its stage.
pub fn validate_document(stage: Stage, document: &Value) -> DocGenResult<()> {
    if is_error_marker(document) {
        return Err(DocGenError::SchemaValidation {
            stage,
            message: "the model output could not be parsed as JSON".to_string(),
        });
    }

    let outcome = match stage {
        Stage::Requirements => RequirementsDoc::deserialize(document).map(|_| ()),
        Stage::Flow => FlowDoc::deserialize(document).map(|_| ()),
        Stage::ApiMap => ApiMapDoc::deserialize(document).map(|_| ()),
    };

    outcome.map_err(|e| DocGenError::SchemaValidation {
        stage,
        message: e.to_string(),
    })
}
