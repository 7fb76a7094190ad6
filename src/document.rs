//! The assembled, format-independent document: styled paragraphs and runs
//! in final order, ready to be serialized.

use serde::Serialize;

use crate::format::{Alignment, ConcreteStyle};
use crate::sanitize::sanitize_file_name;

/// Extension of the produced file.
pub const FILE_EXTENSION: &str = "docx";

/// Which part of the paper a paragraph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Part {
    Title,
    PersonalInfo,
    AbstractTitle,
    Abstract,
    Keywords,
    IntroductionTitle,
    Introduction,
    Divider,
    Body,
    ConclusionTitle,
    Conclusion,
    ReferencesTitle,
    References,
}

/// A span of literal text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub family: String,
    pub half_points: u32,
    pub bold: bool,
}

impl TextRun {
    pub fn styled(text: impl Into<String>, style: &ConcreteStyle) -> Self {
        Self {
            text: text.into(),
            family: style.family.clone(),
            half_points: style.half_points(),
            bold: style.bold,
        }
    }
}

/// A reference to a footnote, carrying the footnote body and its style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootnoteAnchor {
    pub id: u32,
    pub content: String,
    pub family: String,
    pub half_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Run {
    Text(TextRun),
    Footnote(FootnoteAnchor),
}

/// Block-level unit. Lengths are in twips; `line_units` in document line units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub part: Part,
    pub alignment: Alignment,
    pub line_units: u32,
    pub spacing_before: u32,
    pub spacing_after: u32,
    pub first_line_indent: u32,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// An unstyled empty paragraph, used for blank lines and dividers.
    pub fn blank(part: Part) -> Self {
        Self {
            part,
            alignment: Alignment::Left,
            line_units: 0,
            spacing_before: 0,
            spacing_after: 0,
            first_line_indent: 0,
            runs: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.runs.is_empty()
    }

    /// Visible text with footnote anchors written back as `[n]`.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|run| match run {
                Run::Text(t) => t.text.clone(),
                Run::Footnote(f) => format!("[{}]", f.id),
            })
            .collect()
    }
}

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl PageMargins {
    pub fn uniform(twips: u32) -> Self {
        Self {
            top: twips,
            right: twips,
            bottom: twips,
            left: twips,
        }
    }
}

/// One page section holding every paragraph of the paper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledDocument {
    pub title: String,
    pub margins: PageMargins,
    pub paragraphs: Vec<Paragraph>,
}

impl AssembledDocument {
    /// Sanitized title plus the `.docx` extension.
    pub fn file_name(&self) -> String {
        format!("{}.{}", sanitize_file_name(self.title.trim()), FILE_EXTENSION)
    }

    pub fn part(&self, part: Part) -> impl Iterator<Item = &Paragraph> + '_ {
        self.paragraphs.iter().filter(move |p| p.part == part)
    }

    pub fn footnote_anchors(&self) -> impl Iterator<Item = &FootnoteAnchor> + '_ {
        self.paragraphs.iter().flat_map(|p| {
            p.runs.iter().filter_map(|run| match run {
                Run::Footnote(anchor) => Some(anchor),
                Run::Text(_) => None,
            })
        })
    }
}
