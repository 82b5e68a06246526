use anyhow::{ Context, Result };
use std::fs;
use std::path::Path;

use techdoc::render::{ layout, plain_text };
use techdoc::{ render, DocumentationBundle };

use crate::cli::ui;

/// Re-render a saved combined JSON export
pub fn execute(bundle_path: &Path, output_path: &Path, as_text: bool) -> Result<()> {
    let text = fs
        ::read_to_string(bundle_path)
        .with_context(|| format!("Failed to read {}", bundle_path.display()))?;
    let bundle = DocumentationBundle::from_json(&text).with_context(||
        format!("{} is not a documentation export", bundle_path.display())
    )?;

    let unparseable = bundle.unparseable_stages();
    if !unparseable.is_empty() {
        ui::print_warning(&format!("Stages without valid JSON: {:?}", unparseable));
    }

    if as_text {
        ui::print_text(&plain_text(&layout(&bundle)));
        return Ok(());
    }

    let bytes = render(&bundle)?;
    fs::write(output_path, bytes)?;
    ui::print_success(&format!("PDF saved to {}", output_path.display()));
    Ok(())
}
