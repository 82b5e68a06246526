//! Turns a [`DocumentationBundle`] into a flat list of styled blocks.
//!
//! The layout is a pure function of the bundle. Documents that do not have the expected shape
//! (error markers, unexpected objects, non-objects) are printed field by field instead.

use serde_json::{ Map, Value };

use crate::models::bundle::DocumentationBundle;
use crate::models::stage::is_error_marker;

pub const DOCUMENT_TITLE: &str = "Documentação Técnica";
pub const MISSING_VALUE: &str = "(não informado)";

const REQUIREMENTS_HEADING: &str = "1. Requisitos do Sistema";
const FUNCTIONAL_HEADING: &str = "1.1 Requisitos Funcionais";
const NON_FUNCTIONAL_HEADING: &str = "1.2 Requisitos Não Funcionais";
const FLOW_HEADING: &str = "2. Fluxo de Componentes";
const FLOWS_HEADING: &str = "Fluxos:";
const API_HEADING: &str = "3. Mapa de APIs";

/// One laid-out element of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Section(String),
    Subsection(String),
    Paragraph(String),
    Bullet(String),
    Numbered(usize, String),
    Spacer,
}

impl Block {
    /// Text as it appears on the page, list markers included
    pub fn display_text(&self) -> String {
        match self {
            Block::Title(text) | Block::Section(text) | Block::Subsection(text) | Block::Paragraph(text) =>
                text.clone(),
            Block::Bullet(text) => format!("• {}", text),
            Block::Numbered(n, text) => format!("{}. {}", n, text),
            Block::Spacer => String::new(),
        }
    }
}

/// Lay out the whole document: title, requirements, component flow, API map.
pub fn layout(bundle: &DocumentationBundle) -> Vec<Block> {
    let mut blocks = vec![Block::Title(DOCUMENT_TITLE.to_string()), Block::Spacer];

    requirements_section(&mut blocks, &bundle.requirements);
    flow_section(&mut blocks, &bundle.flow);
    api_section(&mut blocks, &bundle.api_map);

    blocks
}

/// Plain-text rendition of a block list, one line per block
pub fn plain_text(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&block.display_text());
        out.push('\n');
    }
    out
}

fn requirements_section(blocks: &mut Vec<Block>, doc: &Value) {
    blocks.push(Block::Section(REQUIREMENTS_HEADING.to_string()));
    blocks.push(Block::Spacer);

    if !has_any_collection(doc, &["requisitos_funcionais", "requisitos_nao_funcionais"]) {
        literal_fields(blocks, doc);
        return;
    }

    if let Some(items) = non_empty_list(doc, "requisitos_funcionais") {
        blocks.push(Block::Subsection(FUNCTIONAL_HEADING.to_string()));
        for item in items {
            requirement_block(blocks, item, "Prioridade", "prioridade");
        }
    }

    if let Some(items) = non_empty_list(doc, "requisitos_nao_funcionais") {
        blocks.push(Block::Subsection(NON_FUNCTIONAL_HEADING.to_string()));
        for item in items {
            requirement_block(blocks, item, "Tipo", "tipo");
        }
    }
}

fn requirement_block(blocks: &mut Vec<Block>, item: &Value, last_label: &str, last_key: &str) {
    if !item.is_object() {
        blocks.push(Block::Paragraph(scalar_text(item)));
        blocks.push(Block::Spacer);
        return;
    }

    blocks.push(Block::Paragraph(format!("ID: {}", text_field(item, "id"))));
    blocks.push(Block::Paragraph(format!("Descrição: {}", text_field(item, "descricao"))));
    blocks.push(Block::Paragraph(format!("{}: {}", last_label, text_field(item, last_key))));
    blocks.push(Block::Spacer);
}

fn flow_section(blocks: &mut Vec<Block>, doc: &Value) {
    blocks.push(Block::Section(FLOW_HEADING.to_string()));
    blocks.push(Block::Spacer);

    if !has_any_collection(doc, &["componentes", "fluxos"]) {
        literal_fields(blocks, doc);
        return;
    }

    for component in non_empty_list(doc, "componentes").into_iter().flatten() {
        if !component.is_object() {
            blocks.push(Block::Paragraph(scalar_text(component)));
            blocks.push(Block::Spacer);
            continue;
        }

        blocks.push(Block::Subsection(format!("Componente: {}", text_field(component, "nome"))));
        blocks.push(Block::Paragraph(format!("Descrição: {}", text_field(component, "descricao"))));
        bullet_list(blocks, component, "responsabilidades", "Responsabilidades:");
        bullet_list(blocks, component, "dependencias", "Dependências:");
        blocks.push(Block::Spacer);
    }

    if let Some(flows) = non_empty_list(doc, "fluxos") {
        blocks.push(Block::Subsection(FLOWS_HEADING.to_string()));
        for flow in flows {
            if !flow.is_object() {
                blocks.push(Block::Paragraph(scalar_text(flow)));
                blocks.push(Block::Spacer);
                continue;
            }

            blocks.push(Block::Paragraph(format!("Fluxo: {}", text_field(flow, "nome"))));
            for (i, step) in non_empty_list(flow, "passos").into_iter().flatten().enumerate() {
                blocks.push(Block::Numbered(i + 1, scalar_text(step)));
            }
            blocks.push(Block::Spacer);
        }
    }
}

fn api_section(blocks: &mut Vec<Block>, doc: &Value) {
    blocks.push(Block::Section(API_HEADING.to_string()));
    blocks.push(Block::Spacer);

    if !has_any_collection(doc, &["apis"]) {
        literal_fields(blocks, doc);
        return;
    }

    for api in non_empty_list(doc, "apis").into_iter().flatten() {
        if !api.is_object() {
            blocks.push(Block::Paragraph(scalar_text(api)));
            blocks.push(Block::Spacer);
            continue;
        }

        blocks.push(Block::Subsection(format!("Rota: {}", text_field(api, "rota"))));
        blocks.push(Block::Paragraph(format!("Método: {}", text_field(api, "metodo"))));
        blocks.push(Block::Paragraph(format!("Descrição: {}", text_field(api, "descricao"))));
        bullet_map(blocks, api, "parametros", "Parâmetros:");
        bullet_map(blocks, api, "respostas", "Respostas:");
        blocks.push(Block::Spacer);
    }
}

fn bullet_list(blocks: &mut Vec<Block>, item: &Value, key: &str, label: &str) {
    if let Some(entries) = non_empty_list(item, key) {
        blocks.push(Block::Paragraph(label.to_string()));
        for entry in entries {
            blocks.push(Block::Bullet(scalar_text(entry)));
        }
    }
}

fn bullet_map(blocks: &mut Vec<Block>, item: &Value, key: &str, label: &str) {
    match item.get(key) {
        Some(Value::Object(map)) if !map.is_empty() => {
            blocks.push(Block::Paragraph(label.to_string()));
            for (name, description) in map {
                blocks.push(Block::Bullet(format!("{}: {}", name, scalar_text(description))));
            }
        }
        // Models sometimes answer with a list of parameter descriptions instead of a map.
        Some(Value::Array(entries)) if !entries.is_empty() => {
            blocks.push(Block::Paragraph(label.to_string()));
            for entry in entries {
                blocks.push(Block::Bullet(scalar_text(entry)));
            }
        }
        _ => {}
    }
}

/// Print a document that lacks the expected structure, one field per line.
fn literal_fields(blocks: &mut Vec<Block>, doc: &Value) {
    match doc {
        Value::Object(map) => {
            if is_error_marker(doc) {
                log::debug!("Rendering an error marker literally");
            }
            push_map_literally(blocks, map);
        }
        Value::Null => blocks.push(Block::Paragraph(MISSING_VALUE.to_string())),
        other => blocks.push(Block::Paragraph(scalar_text(other))),
    }
    blocks.push(Block::Spacer);
}

fn push_map_literally(blocks: &mut Vec<Block>, map: &Map<String, Value>) {
    if map.is_empty() {
        blocks.push(Block::Paragraph(MISSING_VALUE.to_string()));
    }
    for (key, value) in map {
        blocks.push(Block::Paragraph(format!("{}: {}", key, scalar_text(value))));
    }
}

fn has_any_collection(doc: &Value, keys: &[&str]) -> bool {
    keys.iter().any(|key| matches!(doc.get(*key), Some(Value::Array(_))))
}

fn non_empty_list<'a>(doc: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    match doc.get(key) {
        Some(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => None,
    }
}

fn text_field(item: &Value, key: &str) -> String {
    match item.get(key) {
        None | Some(Value::Null) => MISSING_VALUE.to_string(),
        Some(value) => scalar_text(value),
    }
}

/// Strings unquoted, everything else as compact JSON
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
