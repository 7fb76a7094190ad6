//! Input sanitization and validation.
//!
//! Everything here is pure and total. Problems are reported as data
//! (`ValidationReport`, `FootnoteCheck`, `ExportCheck`) so that callers can
//! decide whether to block an export or merely warn.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::ConfigJsonError;
use crate::footnote::find_markers;
use crate::model::{Footnote, PaperContent, PersonalInfoItem};

/// Length ceilings, in characters.
pub mod limits {
    pub const TITLE: usize = 200;
    pub const ABSTRACT: usize = 1000;
    pub const KEYWORDS: usize = 500;
    pub const CONTENT: usize = 50_000;
    pub const PERSONAL_INFO_LABEL: usize = 50;
    pub const PERSONAL_INFO_VALUE: usize = 200;
    pub const FOOTNOTE: usize = 2000;
    pub const CONFIG_TEXT: usize = 10_000;
    pub const FILE_NAME: usize = 100;
}

/// Top-level sections an imported configuration must carry.
pub const REQUIRED_CONFIG_SECTIONS: [&str; 4] =
    ["title", "personalInfo", "abstractTitle", "abstractContent"];

fn is_stripped(c: char, keep_newlines: bool) -> bool {
    match c {
        '\n' if keep_newlines => false,
        '\u{00}'..='\u{1F}' | '\u{7F}' | '\u{FFFE}' | '\u{FFFF}' => true,
        _ => false,
    }
}

/// Whitespace plus the byte-order mark, which editors paste along with text.
fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

fn clean(text: &str, max_length: usize, keep_newlines: bool) -> String {
    let stripped: String = text.chars().filter(|&c| !is_stripped(c, keep_newlines)).collect();
    stripped.trim_matches(is_trimmed).chars().take(max_length).collect()
}

/// Strip control characters and non-characters, trim, then truncate to
/// `max_length` characters.
pub fn sanitize_text(text: &str, max_length: usize) -> String {
    clean(text, max_length, false)
}

/// Like [`sanitize_text`] but keeps line breaks, for multi-line sections.
/// `\r\n` collapses to `\n`.
pub fn sanitize_block(text: &str, max_length: usize) -> String {
    clean(text, max_length, true)
}

/// Sanitize an output file stem: filesystem-unsafe characters and whitespace
/// become `_`, capped at 100 characters.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => out.push('_'),
            c if c.is_control() => out.push('_'),
            c => out.push(c),
        }
    }
    out.chars().take(limits::FILE_NAME).collect()
}

/// Itemized validation errors. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: String) {
        self.errors.push(message);
    }
}

/// Every item needs a non-empty label and value within their ceilings.
pub fn validate_personal_info(items: &[PersonalInfoItem]) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, item) in items.iter().enumerate() {
        let n = index + 1;
        if item.label.trim().is_empty() {
            report.push(format!("Personal info item {} is missing a label", n));
        } else if item.label.chars().count() > limits::PERSONAL_INFO_LABEL {
            report.push(format!(
                "Personal info item {} label exceeds {} characters",
                n,
                limits::PERSONAL_INFO_LABEL
            ));
        }

        if item.value.trim().is_empty() {
            report.push(format!("Personal info item {} is missing a value", n));
        } else if item.value.chars().count() > limits::PERSONAL_INFO_VALUE {
            report.push(format!(
                "Personal info item {} value exceeds {} characters",
                n,
                limits::PERSONAL_INFO_VALUE
            ));
        }
    }
    report
}

/// Footnote ids must be positive and unique; content within its ceiling.
pub fn validate_footnotes(footnotes: &[Footnote]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen = HashSet::new();
    for footnote in footnotes {
        if footnote.id == 0 {
            report.push("Footnote ids must be positive".to_string());
        } else if !seen.insert(footnote.id) {
            report.push(format!("Duplicate footnote id {}", footnote.id));
        }
        if footnote.content.chars().count() > limits::FOOTNOTE {
            report.push(format!(
                "Footnote {} exceeds {} characters",
                footnote.id,
                limits::FOOTNOTE
            ));
        }
    }
    report
}

/// Markers in a text that have no matching footnote, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteCheck {
    pub invalid_refs: Vec<u64>,
    /// The same markers as written, e.g. `[05]`.
    pub invalid_markers: Vec<String>,
}

impl FootnoteCheck {
    pub fn is_valid(&self) -> bool {
        self.invalid_refs.is_empty()
    }
}

/// Cross-check every `[n]` marker in `text` against the footnote ids.
///
/// Advisory only: generation renders dangling markers as literal text.
pub fn validate_footnote_references(text: &str, footnotes: &[Footnote]) -> FootnoteCheck {
    let ids: HashSet<u64> = footnotes.iter().map(|f| u64::from(f.id)).collect();
    let (invalid_refs, invalid_markers) = find_markers(text)
        .filter(|marker| !ids.contains(&marker.id))
        .map(|marker| (marker.id, marker.text.to_string()))
        .unzip();
    FootnoteCheck {
        invalid_refs,
        invalid_markers,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Structural check of an externally supplied configuration text.
///
/// Returns the parsed JSON on success so callers do not parse twice.
pub fn validate_config_json(json_text: &str) -> Result<Value, ConfigJsonError> {
    if json_text.chars().count() > limits::CONFIG_TEXT {
        return Err(ConfigJsonError::TooLong {
            limit: limits::CONFIG_TEXT,
        });
    }

    let value: Value =
        serde_json::from_str(json_text).map_err(|e| ConfigJsonError::Parse(e.to_string()))?;
    let object = value.as_object().ok_or(ConfigJsonError::NotAnObject)?;

    for section in REQUIRED_CONFIG_SECTIONS {
        if !object.get(section).is_some_and(is_truthy) {
            return Err(ConfigJsonError::MissingSection(section));
        }
    }

    Ok(value)
}

/// Apply the length ceilings to every field of a paper.
pub fn sanitize_paper(paper: &PaperContent) -> PaperContent {
    PaperContent {
        title: sanitize_text(&paper.title, limits::TITLE),
        personal_info: paper
            .personal_info
            .iter()
            .map(|item| PersonalInfoItem {
                id: item.id.clone(),
                label: sanitize_text(&item.label, limits::PERSONAL_INFO_LABEL),
                value: sanitize_text(&item.value, limits::PERSONAL_INFO_VALUE),
            })
            .collect(),
        abstract_text: sanitize_block(&paper.abstract_text, limits::ABSTRACT),
        keywords: sanitize_text(&paper.keywords, limits::KEYWORDS),
        introduction: sanitize_block(&paper.introduction, limits::CONTENT),
        body: sanitize_block(&paper.body, limits::CONTENT),
        conclusion: sanitize_block(&paper.conclusion, limits::CONTENT),
        references: sanitize_block(&paper.references, limits::CONTENT),
        footnotes: paper
            .footnotes
            .iter()
            .map(|f| Footnote {
                id: f.id,
                content: sanitize_text(&f.content, limits::FOOTNOTE),
            })
            .collect(),
    }
}

/// Outcome of the pre-export check: errors block the export, warnings do not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ExportCheck {
    pub fn can_export(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a sanitized paper before handing it to the assembler.
pub fn check_for_export(paper: &PaperContent) -> ExportCheck {
    let mut check = ExportCheck::default();

    if paper.title.trim().is_empty() || sanitize_file_name(paper.title.trim()).is_empty() {
        check.errors.push("Paper title is required".to_string());
    }
    check
        .errors
        .extend(validate_personal_info(&paper.personal_info).errors);
    check.errors.extend(validate_footnotes(&paper.footnotes).errors);

    let sections = [
        ("introduction", &paper.introduction),
        ("body", &paper.body),
        ("conclusion", &paper.conclusion),
        ("references", &paper.references),
    ];
    for (name, text) in sections {
        let refs = validate_footnote_references(text, &paper.footnotes);
        if !refs.is_valid() {
            check.warnings.push(format!(
                "Footnotes {} referenced in {} do not exist",
                refs.invalid_markers.join(", "),
                name
            ));
        }
    }

    check
}
