//! Per-line script and outline-numbering classification.
//!
//! Both passes are pure functions of a single line and share no state, so
//! they can run in any order alongside footnote splicing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::format::NumberingIndents;

/// Dominant writing system of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Chinese,
    English,
    Mixed,
}

impl Script {
    /// Mixed lines take the Chinese font pair.
    pub fn uses_chinese_font(self) -> bool {
        !matches!(self, Script::English)
    }
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Classify a line by the presence of CJK ideographs and ASCII letters.
/// Lines with neither (digits, punctuation) count as Chinese so they pick up
/// the base body font.
pub fn detect_script(line: &str) -> Script {
    let has_chinese = line.chars().any(is_cjk_ideograph);
    let has_english = line.chars().any(|c| c.is_ascii_alphabetic());
    match (has_chinese, has_english) {
        (true, true) => Script::Mixed,
        (false, true) => Script::English,
        _ => Script::Chinese,
    }
}

/// Outline depth inferred from a line's leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NumberingLevel {
    None,
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
}

impl NumberingLevel {
    pub fn depth(self) -> u8 {
        match self {
            NumberingLevel::None => 0,
            NumberingLevel::Level1 => 1,
            NumberingLevel::Level2 => 2,
            NumberingLevel::Level3 => 3,
            NumberingLevel::Level4 => 4,
            NumberingLevel::Level5 => 5,
        }
    }

    /// Built-in first-line indent in em.
    pub fn default_indent(self) -> f32 {
        match self {
            NumberingLevel::None => 2.0,
            NumberingLevel::Level1 => 0.0,
            NumberingLevel::Level2 => 2.0,
            NumberingLevel::Level3 => 4.0,
            NumberingLevel::Level4 => 6.0,
            NumberingLevel::Level5 => 8.0,
        }
    }
}

/// Prefix patterns, most specific first. Order matters: a line such as
/// "（1）" must not be taken for anything shallower.
static PREFIXES: LazyLock<[(NumberingLevel, Regex); 5]> = LazyLock::new(|| {
    let compile = |pattern: &str| Regex::new(pattern).expect("numbering pattern is valid");
    [
        (NumberingLevel::Level5, compile(r"^[①②③④⑤⑥⑦⑧⑨⑩]")),
        (NumberingLevel::Level4, compile(r"^（[0-9]+）")),
        (NumberingLevel::Level3, compile(r"^[0-9]+\.")),
        (NumberingLevel::Level2, compile(r"^（[一二三四五六七八九十]+）")),
        (NumberingLevel::Level1, compile(r"^[一二三四五六七八九十]+、")),
    ]
});

fn matching_prefix(trimmed: &str) -> Option<(NumberingLevel, usize)> {
    PREFIXES
        .iter()
        .find_map(|(level, re)| re.find(trimmed).map(|m| (*level, m.end())))
}

/// Detect the numbering level of a line; first matching pattern wins.
pub fn detect_numbering_level(line: &str) -> NumberingLevel {
    matching_prefix(line.trim()).map_or(NumberingLevel::None, |(level, _)| level)
}

/// Indent in em for `level`. Overrides replace levels 1–5; the unnumbered
/// indent is fixed.
pub fn indent_for_level(level: NumberingLevel, overrides: Option<&NumberingIndents>) -> f32 {
    overrides
        .and_then(|o| o.get(level))
        .unwrap_or_else(|| level.default_indent())
}

/// Strip numbering markers and surrounding whitespace.
///
/// Stacked markers ("1.2. text") are stripped until none remain, which makes
/// the function idempotent. Lines without a marker come back unchanged.
pub fn remove_numbering_prefix(line: &str) -> String {
    let mut rest = line.trim();
    let mut stripped = false;
    while let Some((_, end)) = matching_prefix(rest) {
        rest = rest[end..].trim();
        stripped = true;
    }
    if stripped {
        rest.to_string()
    } else {
        line.to_string()
    }
}

/// A classified line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberingPattern {
    pub level: NumberingLevel,
    pub text: String,
    pub indent: f32,
}

pub fn parse_line_with_numbering(line: &str, overrides: Option<&NumberingIndents>) -> NumberingPattern {
    let level = detect_numbering_level(line);
    NumberingPattern {
        level,
        text: line.to_string(),
        indent: indent_for_level(level, overrides),
    }
}

pub fn parse_content_with_numbering(
    content: &str,
    overrides: Option<&NumberingIndents>,
) -> Vec<NumberingPattern> {
    content
        .split('\n')
        .map(|line| parse_line_with_numbering(line, overrides))
        .collect()
}
