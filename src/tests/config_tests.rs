#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::{ ModelConfig, ModelId, DEFAULT_TEMPERATURE };
    use crate::errors::{ ClientError, DocGenError, ErrorSeverity, RecoverableError };
    use crate::implementations::config::{ default_template, ConfigError, GeneratorConfig };
    use crate::models::stage::Stage;

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("techdoc_{}_{}.yaml", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn model_ids_parse_case_insensitively() {
        assert_eq!("GPT-4".parse::<ModelId>().unwrap(), ModelId::Gpt4);
        assert_eq!("gpt-3.5-turbo".parse::<ModelId>().unwrap(), ModelId::Gpt35Turbo);
        assert_eq!(ModelId::Gpt4.to_string(), "gpt-4");
    }

    #[test]
    fn unknown_model_is_a_configuration_error() {
        let err = "llama-3".parse::<ModelId>().unwrap_err();
        assert!(matches!(err, DocGenError::Configuration(ref msg) if msg.contains("gpt-4")));
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        assert!(ModelConfig::new(ModelId::Gpt4, 0.0, "k").validate().is_ok());
        assert!(ModelConfig::new(ModelId::Gpt4, 1.0, "k").validate().is_ok());
        assert!(ModelConfig::new(ModelId::Gpt4, -0.1, "k").validate().is_err());
        assert!(ModelConfig::new(ModelId::Gpt4, 1.01, "k").validate().is_err());
        assert!(ModelConfig::new(ModelId::Gpt4, f32::NAN, "k").validate().is_err());
    }

    #[test]
    fn credential_format_is_not_checked() {
        assert!(ModelConfig::new(ModelId::Gpt4, 0.5, "anything").validate().is_ok());
        assert!(ModelConfig::new(ModelId::Gpt4, 0.5, "").validate().is_err());
    }

    #[test]
    fn debug_output_hides_the_credential() {
        let config = ModelConfig::new(ModelId::Gpt4, 0.5, "sk-secret-value");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret-value"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn configuration_errors_are_fatal_with_a_remedy() {
        let err = DocGenError::Configuration("An API key is required".to_string());
        let context = err.context();
        assert_eq!(context.severity, ErrorSeverity::Fatal);
        assert!(context.stage.is_none());
        assert!(err.recovery_strategy().is_some());
    }

    #[test]
    fn model_failures_report_their_stage() {
        let err = DocGenError::ModelInvocation {
            stage: Stage::ApiMap,
            source: ClientError::Http { status: 429, message: "slow down".to_string() },
        };
        let context = err.context();
        assert_eq!(context.stage, Some(Stage::ApiMap));
        assert_eq!(context.severity, ErrorSeverity::Error);
        assert_eq!(context.severity.to_string(), "error");
        assert!(context.suggestion.unwrap().contains("Rate limit"));
    }

    #[test]
    fn defaults_match_the_form_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.model, ModelId::Gpt35Turbo);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert!(config.stream);
        assert!(!config.strict);
        assert_eq!(config.get_template(Stage::Flow), default_template(Stage::Flow));
    }

    #[test]
    fn default_templates_have_their_placeholders() {
        for stage in Stage::ALL {
            let placeholder = format!("{{{{{}}}}}", stage.input_placeholder());
            assert!(default_template(stage).contains(&placeholder), "{} template", stage);
        }
        assert!(default_template(Stage::Requirements).contains("requisitos_funcionais"));
        assert!(default_template(Stage::Flow).contains("\"fluxos\""));
        assert!(default_template(Stage::ApiMap).contains("\"respostas\""));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let path = write_temp_config("partial", "model: gpt-4\ntemperature: 0.3\nstrict: true\n");
        let config = GeneratorConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.model, ModelId::Gpt4);
        assert_eq!(config.temperature, 0.3);
        assert!(config.strict);
        assert_eq!(config.request_timeout_secs, 120);
        assert!(config.api_endpoint.starts_with("https://"));
    }

    #[test]
    fn template_overrides_are_loaded() {
        let path = write_temp_config(
            "templates",
            "prompt_templates:\n  apis: \"Mapa para {{fluxo_componentes}}\"\n"
        );
        let config = GeneratorConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.get_template(Stage::ApiMap), "Mapa para {{fluxo_componentes}}");
        assert_eq!(config.get_template(Stage::Requirements), default_template(Stage::Requirements));
    }

    #[test]
    fn unknown_template_names_are_rejected() {
        let path = write_temp_config("unknown", "prompt_templates:\n  resumo: \"x\"\n");
        let result = GeneratorConfig::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::UnknownTemplate(name)) if name == "resumo"));
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let result = GeneratorConfig::from_file(&PathBuf::from("/nonexistent/techdoc.yaml"));
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }

    #[test]
    fn explicit_key_wins_over_config() {
        let mut config = GeneratorConfig::default();
        config.api_key = Some("from-config".to_string());

        assert_eq!(config.get_api_key(Some("from-flag")).unwrap(), "from-flag");
        assert_eq!(config.get_api_key(None).unwrap(), "from-config");
        assert_eq!(config.get_api_key(Some("  ")).unwrap(), "from-config");
    }
}
