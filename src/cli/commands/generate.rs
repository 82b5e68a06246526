use anyhow::{ anyhow, Context, Result };
use log::info;
use std::fs;
use std::path::{ Path, PathBuf };

use techdoc::{
    render,
    serialize,
    DocGenError,
    DocumentationPipeline,
    GeneratorConfig,
    ModelConfig,
    ModelId,
    OpenAiClient,
    Stage,
    ValidationMode,
};

use crate::cli::ui;

/// Base name of the exported files
pub const EXPORT_BASENAME: &str = "documentacao_tecnica";

pub struct GenerateArgs<'a> {
    pub description: Option<&'a str>,
    pub input: Option<&'a Path>,
    pub model: Option<&'a str>,
    pub temperature: Option<f32>,
    pub api_key: Option<&'a str>,
    pub output_dir: &'a Path,
    pub strict: bool,
    pub no_pdf: bool,
}

/// Documentation generation command
pub async fn execute(config: &GeneratorConfig, args: GenerateArgs<'_>) -> Result<()> {
    ui::print_header("Technical Documentation Generator");

    let interactive = args.description.is_none() && args.input.is_none();
    let description = match (args.description, args.input) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) =>
            fs
                ::read_to_string(path)
                .with_context(|| format!("Failed to read description file {}", path.display()))?,
        (None, None) => ui::ask_description()?,
    };

    let model = match args.model {
        Some(name) => name.parse::<ModelId>()?,
        None if interactive => ui::select_model(config.model)?,
        None => config.model,
    };
    let temperature = args.temperature.unwrap_or(config.temperature);

    let api_key = config
        .get_api_key(args.api_key)
        .map_err(|e| DocGenError::Configuration(e.to_string()))?;

    let model_config = ModelConfig::new(model, temperature, api_key);
    model_config.validate()?;

    ui::print_result("Model", model.as_str());
    ui::print_result("Temperature", &format!("{:.1}", temperature));

    let client = OpenAiClient::new(config).map_err(|e| anyhow!("Failed to initialize the model client: {}", e))?;
    let mut pipeline = DocumentationPipeline::new(client, config);
    if args.strict {
        pipeline = pipeline.with_mode(ValidationMode::Strict);
    }

    let progress = ui::ConsoleProgress::new();
    let bundle = match pipeline.run(&description, &model_config, &progress).await {
        Ok(bundle) => bundle,
        Err(e) => {
            progress.clear();
            return Err(e.into());
        }
    };

    for stage in Stage::ALL {
        ui::print_header(&stage_title(stage));
        ui::print_json(bundle.document(stage));
    }

    let unparseable = bundle.unparseable_stages();
    if !unparseable.is_empty() {
        ui::print_warning(
            &format!(
                "{} stage(s) returned text that is not JSON; their raw answers are kept in the export",
                unparseable.len()
            )
        );
    }

    fs::create_dir_all(args.output_dir)?;

    if !args.no_pdf {
        // A failed PDF does not prevent the JSON export.
        match render(&bundle) {
            Ok(bytes) => {
                let pdf_path = export_path(args.output_dir, "pdf");
                fs::write(&pdf_path, bytes)?;
                ui::print_success(&format!("PDF saved to {}", pdf_path.display()));
            }
            Err(e) => ui::print_error(&format!("Failed to generate PDF: {}", e)),
        }
    }

    let json_path = export_path(args.output_dir, "json");
    fs::write(&json_path, serialize(&bundle)?)?;
    ui::print_success(&format!("JSON saved to {}", json_path.display()));

    info!("Documentation written to {}", args.output_dir.display());
    Ok(())
}

fn stage_title(stage: Stage) -> String {
    match stage {
        Stage::Requirements => "System Requirements".to_string(),
        Stage::Flow => "Component Flow".to_string(),
        Stage::ApiMap => "API Map".to_string(),
    }
}

pub fn export_path(dir: &Path, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", EXPORT_BASENAME, extension))
}
