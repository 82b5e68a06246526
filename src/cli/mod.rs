use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "techdoc",
    about = "Generates technical documentation from a system description",
    version,
    author,
    long_about = None
)]
pub struct TechdocCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Path to configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate requirements, component flow and API map for a system
    Generate {
        /// Description of the system to document
        #[arg(short, long, conflicts_with = "input")]
        description: Option<String>,

        /// File containing the system description
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Model to use (gpt-3.5-turbo, gpt-4)
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature between 0.0 and 1.0
        #[arg(short, long)]
        temperature: Option<f32>,

        /// API key (falls back to the config file and OPENAI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Directory the JSON and PDF files are written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Fail when a stage's output does not match its schema
        #[arg(long, default_value = "false")]
        strict: bool,

        /// Skip the PDF export
        #[arg(long, default_value = "false")]
        no_pdf: bool,
    },

    /// Render a saved JSON export as a PDF document
    Render {
        /// Combined JSON export produced by `generate`
        #[arg(short, long)]
        bundle: PathBuf,

        /// Output PDF file
        #[arg(short, long, default_value = "documentacao_tecnica.pdf")]
        output: PathBuf,

        /// Print the document as text instead of writing a PDF
        #[arg(long, default_value = "false")]
        text: bool,
    },

    /// List supported models and the temperature range
    Models,
}
