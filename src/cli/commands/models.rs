use techdoc::{ GeneratorConfig, ModelId, DEFAULT_TEMPERATURE, MAX_TEMPERATURE, MIN_TEMPERATURE };

use crate::cli::ui;

/// List supported models and temperature bounds
pub fn execute(config: &GeneratorConfig) {
    ui::print_header("Supported Models");
    for model in ModelId::ALL {
        let marker = if model == config.model { " (default)" } else { "" };
        println!("  - {}{}", model, marker);
    }

    ui::print_header("Temperature");
    ui::print_result("Range", &format!("{:.1} - {:.1}", MIN_TEMPERATURE, MAX_TEMPERATURE));
    ui::print_result("Default", &format!("{:.1}", DEFAULT_TEMPERATURE));
    ui::print_result("Configured", &format!("{:.1}", config.temperature));
}
