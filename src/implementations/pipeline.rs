use log::{ debug, error, info, warn };

use crate::config::ModelConfig;
use crate::errors::{ DocGenError, DocGenResult };
use crate::implementations::config::GeneratorConfig;
use crate::models::bundle::DocumentationBundle;
use crate::models::documents::validate_document;
use crate::models::stage::{ Stage, StageResult };
use crate::recovery::recover_json;
use crate::traits::model_client::{ GenerationRequest, ModelClient };
use crate::traits::progress::ProgressSink;

/// How stage output is checked after JSON recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Keep whatever recovery produced, error markers included
    #[default]
    Lenient,
    /// Fail the run unless the output matches the stage's typed schema
    Strict,
}

/// A stage and the prompt template it runs with
#[derive(Debug, Clone)]
pub struct StageDescriptor {
    pub stage: Stage,
    pub template: String,
}

impl StageDescriptor {
    /// Substitute the stage input into the template
    pub fn render_prompt(&self, input: &str) -> String {
        let placeholder = format!("{{{{{}}}}}", self.stage.input_placeholder());
        if !self.template.contains(&placeholder) {
            warn!("Template for the {} stage has no {} placeholder", self.stage, placeholder);
        }
        self.template.replace(&placeholder, input)
    }
}

/// Runs the requirements, component flow and API map stages in order, each stage's
/// JSON becoming the next stage's input.
pub struct DocumentationPipeline<C: ModelClient> {
    client: C,
    stages: Vec<StageDescriptor>,
    mode: ValidationMode,
}

impl<C: ModelClient> DocumentationPipeline<C> {
    pub fn new(client: C, config: &GeneratorConfig) -> Self {
        let stages = Stage::ALL.iter()
            .map(|stage| StageDescriptor {
                stage: *stage,
                template: config.get_template(*stage),
            })
            .collect();
        let mode = if config.strict { ValidationMode::Strict } else { ValidationMode::Lenient };

        Self { client, stages, mode }
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn descriptor(&self, stage: Stage) -> Option<&StageDescriptor> {
        self.stages.iter().find(|d| d.stage == stage)
    }

    /// Generate the full documentation bundle for a system description.
    ///
    /// Configuration problems fail before any request is made. A model failure aborts the run
    /// at that stage. Unparseable output does not: its error marker is fed to the next stage.
    pub async fn run(
        &self,
        description: &str,
        config: &ModelConfig,
        progress: &dyn ProgressSink
    ) -> DocGenResult<DocumentationBundle> {
        config.validate()?;
        if description.trim().is_empty() {
            return Err(DocGenError::Configuration("The system description is empty".to_string()));
        }

        info!("Generating documentation with {} (temperature {})", config.model, config.temperature);

        let mut input = description.to_string();
        let mut results = Vec::with_capacity(self.stages.len());

        for descriptor in &self.stages {
            let result = self.run_stage(descriptor.stage, &input, config, progress).await?;
            input = result.to_input_json();
            results.push(result);
        }

        let [requirements, flow, api_map] = <[StageResult; 3]>
            ::try_from(results)
            .map_err(|r| {
                DocGenError::Configuration(
                    format!("Pipeline must run exactly three stages, ran {}", r.len())
                )
            })?;

        let bundle = DocumentationBundle::new(requirements, flow, api_map);
        let degraded = bundle.unparseable_stages();
        if degraded.is_empty() {
            info!("All stages produced valid JSON");
        } else {
            warn!("Stages without valid JSON: {:?}", degraded);
        }

        Ok(bundle)
    }

    /// Run a single stage on the given input.
    ///
    /// Public so a caller can retry one stage with the previous stage's serialized result.
    pub async fn run_stage(
        &self,
        stage: Stage,
        input: &str,
        config: &ModelConfig,
        progress: &dyn ProgressSink
    ) -> DocGenResult<StageResult> {
        config.validate()?;
        if input.trim().is_empty() {
            return Err(DocGenError::Configuration(format!("The {} stage input is empty", stage)));
        }

        let descriptor = self
            .descriptor(stage)
            .ok_or_else(|| DocGenError::Configuration(format!("No template for the {} stage", stage)))?;

        let request = GenerationRequest {
            stage,
            input: input.to_string(),
            prompt: descriptor.render_prompt(input),
            model: config.model,
            temperature: config.temperature,
            api_key: config.api_key.clone(),
        };

        info!("Running the {} stage", stage);
        debug!("Request: {:?}", request);
        progress.stage_started(stage);

        let raw = self.client.generate(&request, progress).await.map_err(|source| {
            error!("Model invocation failed during the {} stage: {}", stage, source);
            DocGenError::ModelInvocation { stage, source }
        })?;

        debug!("The {} stage returned {} characters", stage, raw.len());
        let result = recover_json(&raw);

        if self.mode == ValidationMode::Strict {
            validate_document(stage, &result.to_value())?;
        }

        progress.stage_finished(stage, &result);
        Ok(result)
    }
}
