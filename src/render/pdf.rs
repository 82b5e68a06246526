use chrono::{ DateTime, Local };
use log::debug;
use printpdf::{ BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference };
use textwrap::wrap;

use crate::errors::{ DocGenError, DocGenResult };
use crate::render::layout::Block;

/// US letter, 72pt margins
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 25.4;

const PT_TO_MM: f32 = 0.352_778;
const LINE_SPACING: f32 = 1.3;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;
const SPACER_PT: f32 = 12.0;
const FOOTER_SIZE_PT: f32 = 8.0;
const LAYER_NAME: &str = "Layer 1";

struct TextStyle {
    size_pt: f32,
    bold: bool,
    indent_mm: f32,
    space_before_pt: f32,
}

fn style_for(block: &Block) -> TextStyle {
    match block {
        Block::Title(_) => TextStyle { size_pt: 20.0, bold: true, indent_mm: 0.0, space_before_pt: 0.0 },
        Block::Section(_) => TextStyle { size_pt: 15.0, bold: true, indent_mm: 0.0, space_before_pt: 10.0 },
        Block::Subsection(_) => TextStyle { size_pt: 12.0, bold: true, indent_mm: 0.0, space_before_pt: 6.0 },
        Block::Paragraph(_) => TextStyle { size_pt: 10.0, bold: false, indent_mm: 0.0, space_before_pt: 0.0 },
        Block::Bullet(_) | Block::Numbered(..) =>
            TextStyle { size_pt: 10.0, bold: false, indent_mm: 6.0, space_before_pt: 0.0 },
        Block::Spacer => TextStyle { size_pt: 0.0, bold: false, indent_mm: 0.0, space_before_pt: 0.0 },
    }
}

/// Writes lines top to bottom, opening a new page when the current one is full.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor_mm: f32,
    page_number: usize,
    footer: String,
}

impl PageWriter {
    fn new(title: &str, generated_at: DateTime<Local>) -> DocGenResult<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            LAYER_NAME
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        let writer = Self {
            doc,
            layer,
            regular,
            bold,
            cursor_mm: PAGE_HEIGHT_MM - MARGIN_MM,
            page_number: 1,
            footer: format!("{} - gerado em {}", title, generated_at.format("%d/%m/%Y %H:%M")),
        };
        writer.write_footer();
        Ok(writer)
    }

    fn write_footer(&self) {
        let text = winansi_safe(&format!("{} - página {}", self.footer, self.page_number));
        self.layer.use_text(text, FOOTER_SIZE_PT, Mm(MARGIN_MM), Mm(MARGIN_MM / 2.0), &self.regular);
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        self.page_number += 1;
        self.write_footer();
    }

    fn advance(&mut self, height_mm: f32) {
        if self.cursor_mm - height_mm < MARGIN_MM {
            self.new_page();
        } else {
            self.cursor_mm -= height_mm;
        }
    }

    fn write_line(&mut self, text: &str, style: &TextStyle) {
        let line_height_mm = style.size_pt * LINE_SPACING * PT_TO_MM;
        if self.cursor_mm - line_height_mm < MARGIN_MM {
            self.new_page();
        }
        self.cursor_mm -= line_height_mm;

        let font = if style.bold { &self.bold } else { &self.regular };
        self.layer.use_text(
            winansi_safe(text),
            style.size_pt,
            Mm(MARGIN_MM + style.indent_mm),
            Mm(self.cursor_mm),
            font
        );
    }

    fn write_block(&mut self, block: &Block) {
        if *block == Block::Spacer {
            self.advance(SPACER_PT * PT_TO_MM);
            return;
        }

        let style = style_for(block);
        if style.space_before_pt > 0.0 {
            self.advance(style.space_before_pt * PT_TO_MM);
        }

        let usable_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - style.indent_mm;
        let glyph_mm = style.size_pt * AVG_GLYPH_WIDTH * PT_TO_MM;
        let width = ((usable_mm / glyph_mm).floor() as usize).max(10);

        for line in wrap(&block.display_text(), width) {
            self.write_line(&line, &style);
        }
    }

    fn finish(self) -> DocGenResult<Vec<u8>> {
        debug!("PDF laid out on {} page(s)", self.page_number);
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

/// Paginate blocks into a PDF document
pub fn render_pdf(blocks: &[Block], title: &str) -> DocGenResult<Vec<u8>> {
    let mut writer = PageWriter::new(title, Local::now())?;
    for block in blocks {
        writer.write_block(block);
    }
    writer.finish()
}

fn pdf_error(e: impl std::fmt::Display) -> DocGenError {
    DocGenError::Rendering(e.to_string())
}

/// Built-in PDF fonts only cover WinAnsi; anything else becomes `?`.
pub(crate) fn winansi_safe(text: &str) -> String {
    text.chars()
        .map(|c| {
            let code = c as u32;
            let representable =
                (0x20..0x7f).contains(&code) ||
                (0xa0..=0xff).contains(&code) ||
                "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ".contains(c);
            if c == '\t' {
                ' '
            } else if representable {
                c
            } else {
                '?'
            }
        })
        .collect()
}
