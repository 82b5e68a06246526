use colored::*;
use console::{ measure_text_width, Term };
use dialoguer::{ theme::ColorfulTheme, Input, Select };
use indicatif::{ ProgressBar, ProgressStyle };
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;
use textwrap::fill;

use techdoc::{ ErrorContext, ModelId, ProgressSink, Stage, StageResult };

/// Characters of streamed output shown next to the spinner
const PREVIEW_CHARS: usize = 60;
/// Used when stdout is not a terminal
const DEFAULT_WIDTH: usize = 100;

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

#[derive(Clone, Copy)]
enum Tone {
    Error,
    Warning,
    Success,
    Info,
}

impl Tone {
    fn tag(self) -> ColoredString {
        match self {
            Tone::Error => "✗ error".red().bold(),
            Tone::Warning => "! warning".yellow().bold(),
            Tone::Success => "✓ done".green().bold(),
            Tone::Info => "i info".blue(),
        }
    }
}

/// Problems go to stderr so stdout stays usable for the JSON output.
fn status(tone: Tone, message: &str) {
    let line = format!("{} {}", tone.tag(), message);
    match tone {
        Tone::Error | Tone::Warning => eprintln!("{}", line),
        Tone::Success | Tone::Info => println!("{}", line),
    }
}

/// Section title with a rule underneath
pub fn print_header(title: &str) {
    let rule = "─".repeat(measure_text_width(title).max(3));
    println!("\n{}\n{}", title.bold().cyan(), rule.dimmed());
}

/// Wrap text to the terminal width
pub fn print_text(text: &str) {
    let width = Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH);
    println!("{}", fill(text, width.saturating_sub(2).max(20)));
}

pub fn print_error(message: &str) {
    status(Tone::Error, message);
}

pub fn print_warning(message: &str) {
    status(Tone::Warning, message);
}

pub fn print_success(message: &str) {
    status(Tone::Success, message);
}

pub fn print_info(message: &str) {
    status(Tone::Info, message);
}

/// Where a run failed and what the user can do about it
pub fn print_error_context(context: &ErrorContext) {
    let scope = match context.stage {
        Some(stage) => format!("{} during the {} stage", context.severity, stage),
        None => context.severity.to_string(),
    };
    eprintln!("  {}", scope.dimmed());
    if let Some(suggestion) = &context.suggestion {
        print_info(suggestion);
    }
}

/// `label: value` pair
pub fn print_result(label: &str, value: &str) {
    let label = format!("{:<12}", format!("{}:", label));
    println!("  {} {}", label.dimmed(), value);
}

/// Pretty-print a stage document
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text.cyan()),
        Err(_) => println!("{}", value),
    }
}

/// Spinner for one stage, showing elapsed time
fn stage_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} [{elapsed}] {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Ask for the system description interactively
pub fn ask_description() -> std::io::Result<String> {
    Input::<String>
        ::with_theme(&get_theme())
        .with_prompt("Describe the system you want to document")
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() { Err("The description cannot be empty") } else { Ok(()) }
        })
        .interact_text()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Interactive selection of a model
pub fn select_model(default: ModelId) -> std::io::Result<ModelId> {
    let models: Vec<&str> = ModelId::ALL.iter()
        .map(|m| m.as_str())
        .collect();
    let default_index = ModelId::ALL.iter()
        .position(|m| *m == default)
        .unwrap_or(0);

    let selection = Select::with_theme(&get_theme())
        .with_prompt("Select model")
        .items(&models)
        .default(default_index)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(ModelId::ALL[selection])
}

/// Live progress on the terminal: a spinner per stage with a preview of the streamed output.
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
    received: Mutex<String>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            received: Mutex::new(String::new()),
        }
    }

    /// Stop any running spinner, e.g. before printing an error
    pub fn clear(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(spinner) = spinner.take() {
                spinner.finish_and_clear();
            }
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn stage_started(&self, stage: Stage) {
        if let Ok(mut received) = self.received.lock() {
            received.clear();
        }
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(stage_spinner(format!("Generating {}...", stage)));
        }
    }

    fn token(&self, stage: Stage, chunk: &str) {
        let preview = match self.received.lock() {
            Ok(mut received) => {
                received.push_str(chunk);
                let tail: String = received
                    .chars()
                    .rev()
                    .take(PREVIEW_CHARS)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("{} chars | {}", received.chars().count(), tail.replace('\n', " "))
            }
            Err(_) => return,
        };

        if let Ok(spinner) = self.spinner.lock() {
            if let Some(spinner) = spinner.as_ref() {
                spinner.set_message(format!("Generating {}... {}", stage, preview.dimmed()));
            }
        }
    }

    fn stage_finished(&self, stage: Stage, result: &StageResult) {
        self.clear();
        match result {
            StageResult::Parsed(_) => print_success(&format!("The {} stage produced valid JSON", stage)),
            StageResult::Unparseable { .. } =>
                print_warning(
                    &format!("The {} stage did not return valid JSON; continuing with the raw answer", stage)
                ),
        }
    }
}
