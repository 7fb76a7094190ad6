//! Serializes an [`AssembledDocument`] to DOCX bytes with `docx-rs`.
//!
//! The writer makes no layout decisions of its own: every font, size,
//! alignment and spacing value comes from the assembled paragraphs.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, Footnote as DocxFootnote, LineSpacing, PageMargin,
    Paragraph as DocxParagraph, Run as DocxRun, RunFonts, SpecialIndentType,
};
use tracing::{debug, instrument};

use crate::document::{AssembledDocument, FootnoteAnchor, Paragraph, Run, TextRun};
use crate::error::ExportError;
use crate::format::{Alignment, FontSize};

const DEFAULT_FAMILY: &str = "宋体";
const DEFAULT_SIZE: FontSize = FontSize::XiaoSi;

fn fonts(family: &str) -> RunFonts {
    RunFonts::new()
        .ascii(family)
        .hi_ansi(family)
        .east_asia(family)
        .cs(family)
}

fn alignment(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}

fn twips(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn text_run(run: &TextRun) -> DocxRun {
    let mut out = DocxRun::new()
        .add_text(run.text.as_str())
        .size(run.half_points as usize)
        .fonts(fonts(&run.family));
    if run.bold {
        out = out.bold();
    }
    out
}

fn footnote_run(anchor: &FootnoteAnchor) -> DocxRun {
    let body = DocxParagraph::new().add_run(
        DocxRun::new()
            .add_text(anchor.content.as_str())
            .size(anchor.half_points as usize)
            .fonts(fonts(&anchor.family)),
    );
    DocxRun::new().add_footnote_reference(DocxFootnote::new().add_content(body))
}

fn paragraph(p: &Paragraph) -> DocxParagraph {
    if p.is_blank() {
        return DocxParagraph::new();
    }

    let mut out = DocxParagraph::new().align(alignment(p.alignment)).line_spacing(
        LineSpacing::new()
            .line(twips(p.line_units))
            .before(p.spacing_before)
            .after(p.spacing_after),
    );
    if p.first_line_indent > 0 {
        out = out.indent(
            None,
            Some(SpecialIndentType::FirstLine(twips(p.first_line_indent))),
            None,
            None,
        );
    }

    for run in &p.runs {
        out = match run {
            Run::Text(t) => out.add_run(text_run(t)),
            Run::Footnote(anchor) => out.add_run(footnote_run(anchor)),
        };
    }
    out
}

/// Render `doc` into an in-memory DOCX package.
#[instrument(skip(doc), fields(paragraphs = doc.paragraphs.len()))]
pub fn render(doc: &AssembledDocument) -> Result<Vec<u8>, ExportError> {
    let margins = doc.margins;
    let mut docx = Docx::new()
        .default_fonts(fonts(DEFAULT_FAMILY))
        .default_size(DEFAULT_SIZE.half_points() as usize)
        .page_margin(
            PageMargin::new()
                .top(twips(margins.top))
                .right(twips(margins.right))
                .bottom(twips(margins.bottom))
                .left(twips(margins.left)),
        );

    for p in &doc.paragraphs {
        docx = docx.add_paragraph(paragraph(p));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;

    let bytes = cursor.into_inner();
    debug!("Rendered {} bytes", bytes.len());
    Ok(bytes)
}
