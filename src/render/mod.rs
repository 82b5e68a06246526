pub mod layout;
pub mod pdf;

use log::info;

use crate::errors::DocGenResult;
use crate::models::bundle::DocumentationBundle;

pub use layout::{ layout, plain_text, Block, DOCUMENT_TITLE };

/// Render the bundle as a paginated PDF document.
///
/// Bundles holding error markers or unexpected shapes still render; their fields are printed
/// literally.
pub fn render(bundle: &DocumentationBundle) -> DocGenResult<Vec<u8>> {
    let blocks = layout(bundle);
    let bytes = pdf::render_pdf(&blocks, DOCUMENT_TITLE)?;
    info!("Rendered {} blocks into a {} byte PDF", blocks.len(), bytes.len());
    Ok(bytes)
}

/// Combined JSON export: keys `requisitos`, `fluxo_componentes`, `mapa_apis`, 2-space indent.
pub fn serialize(bundle: &DocumentationBundle) -> DocGenResult<String> {
    bundle.to_json_pretty()
}
