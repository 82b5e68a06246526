use anyhow::Result;
use clap::Parser;
use log::{ debug, info };

use techdoc::{ DocGenError, GeneratorConfig };
mod cli;
use cli::{ commands, ui, Commands, TechdocCli };

#[tokio::main]
async fn main() {
    // Parse the command line arguments
    let cli = TechdocCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    if let Err(e) = run(&cli).await {
        ui::print_error(&format!("{:#}", e));
        if let Some(context) = e.downcast_ref::<DocGenError>().map(DocGenError::context) {
            ui::print_error_context(&context);
        }
        std::process::exit(1);
    }
}

async fn run(cli: &TechdocCli) -> Result<()> {
    // A missing .env file is fine
    if dotenv::dotenv().is_ok() {
        debug!("Loaded environment variables from .env file");
    }

    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            GeneratorConfig::from_file(path).map_err(DocGenError::from)?
        }
        None => GeneratorConfig::default(),
    };

    match &cli.command {
        Commands::Generate {
            description,
            input,
            model,
            temperature,
            api_key,
            output_dir,
            strict,
            no_pdf,
        } => {
            let args = commands::generate::GenerateArgs {
                description: description.as_deref(),
                input: input.as_deref(),
                model: model.as_deref(),
                temperature: *temperature,
                api_key: api_key.as_deref(),
                output_dir: output_dir.as_path(),
                strict: *strict || config.strict,
                no_pdf: *no_pdf,
            };
            commands::generate::execute(&config, args).await?;
        }

        Commands::Render { bundle, output, text } => {
            commands::render::execute(bundle, output, *text)?;
        }

        Commands::Models => commands::models::execute(&config),
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Warn,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
