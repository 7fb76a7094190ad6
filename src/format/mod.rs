//! Format configuration and style resolution.
//!
//! `FormatConfig` mirrors the JSON users export and import: a fixed set of
//! named sections, each leaf a font + paragraph description whose fields are
//! all optional. Missing values are filled in by [`resolve`] from the
//! built-in defaults, so a partial configuration is always usable.

mod exchange;
mod resolve;

pub use exchange::{export_config_text, import_config_text, ConfigManager};
pub use resolve::{
    mm_to_twips, resolve, resolve_path, Alignment, ConcreteStyle, FontSize, SectionPath,
    SectionShape, LINE_SPACING_BASE,
};

use serde::{Deserialize, Serialize};

use crate::classify::NumberingLevel;

/// Font and paragraph settings of one configurable leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Named Chinese font size, e.g. "小四".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// One of `left`, `center`, `right`, `justify`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    /// Multiplier, typically 1.0, 1.15, 1.5 or 2.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f64>,
}

impl StyleSpec {
    pub fn new(family: &str, size: &str) -> Self {
        Self {
            family: Some(family.to_string()),
            size: Some(size.to_string()),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn align(mut self, alignment: &str) -> Self {
        self.alignment = Some(alignment.to_string());
        self
    }

    pub fn spacing(mut self, multiplier: f64) -> Self {
        self.line_spacing = Some(multiplier);
        self
    }
}

/// A captioned section: heading leaf plus content leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<StyleSpec>,
}

/// User-configured first-line indents (em) for numbered body lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberingIndents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level1: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level2: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level3: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level4: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level5: Option<f32>,
}

impl NumberingIndents {
    /// Override for `level`. Unnumbered lines are never overridable.
    pub fn get(&self, level: NumberingLevel) -> Option<f32> {
        match level {
            NumberingLevel::None => None,
            NumberingLevel::Level1 => self.level1,
            NumberingLevel::Level2 => self.level2,
            NumberingLevel::Level3 => self.level3,
            NumberingLevel::Level4 => self.level4,
            NumberingLevel::Level5 => self.level5,
        }
        .filter(|em| em.is_finite() && *em >= 0.0)
    }
}

/// Per-section formatting of a paper.
///
/// `Default` yields the built-in configuration; [`FormatConfig::empty`]
/// yields one with nothing set, which resolves to the same styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_title: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_content: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<SectionFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<SectionFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<SectionFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_chinese: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_english: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footnote_chinese: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footnote_english: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering_indents: Option<NumberingIndents>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        let heading = || StyleSpec::new("黑体", "小四").bold().align("left");
        let captioned = |content_alignment: &str| SectionFormat {
            title: Some(heading()),
            content: Some(StyleSpec::new("宋体", "小四").align(content_alignment).spacing(1.5)),
        };

        Self {
            title: Some(StyleSpec::new("宋体", "三号").bold().align("center")),
            personal_info: Some(StyleSpec::new("宋体", "五号").align("center")),
            abstract_title: Some(StyleSpec::new("黑体", "四号").align("center")),
            abstract_content: Some(StyleSpec::new("宋体", "小四").align("justify")),
            keywords: Some(StyleSpec::new("黑体", "小四").bold().align("left")),
            introduction: Some(captioned("justify")),
            conclusion: Some(captioned("justify")),
            references: Some(captioned("left")),
            content_chinese: Some(StyleSpec::new("宋体", "小四").align("justify").spacing(1.5)),
            content_english: Some(
                StyleSpec::new("Times New Roman", "小四").align("justify").spacing(1.5),
            ),
            footnote_chinese: Some(StyleSpec::new("宋体", "小五")),
            footnote_english: Some(StyleSpec::new("Times New Roman", "小五")),
            numbering_indents: None,
        }
    }
}

impl FormatConfig {
    /// A configuration with no explicit values.
    pub fn empty() -> Self {
        Self {
            title: None,
            personal_info: None,
            abstract_title: None,
            abstract_content: None,
            keywords: None,
            introduction: None,
            conclusion: None,
            references: None,
            content_chinese: None,
            content_english: None,
            footnote_chinese: None,
            footnote_english: None,
            numbering_indents: None,
        }
    }

    /// A copy with the sections every exchanged configuration must carry
    /// (title, personal info, abstract title and content) filled in from the
    /// built-in defaults where absent. Resolves exactly like `self`.
    pub fn with_required_sections(&self) -> Self {
        let builtin = Self::default();
        Self {
            title: self.title.clone().or(builtin.title),
            personal_info: self.personal_info.clone().or(builtin.personal_info),
            abstract_title: self.abstract_title.clone().or(builtin.abstract_title),
            abstract_content: self.abstract_content.clone().or(builtin.abstract_content),
            ..self.clone()
        }
    }

    /// The explicit leaf at `path`, if configured.
    pub fn leaf(&self, path: SectionPath) -> Option<&StyleSpec> {
        fn section(s: &Option<SectionFormat>, heading: bool) -> Option<&StyleSpec> {
            let s = s.as_ref()?;
            if heading {
                s.title.as_ref()
            } else {
                s.content.as_ref()
            }
        }

        match path {
            SectionPath::Title => self.title.as_ref(),
            SectionPath::PersonalInfo => self.personal_info.as_ref(),
            SectionPath::AbstractTitle => self.abstract_title.as_ref(),
            SectionPath::AbstractContent => self.abstract_content.as_ref(),
            SectionPath::Keywords => self.keywords.as_ref(),
            SectionPath::IntroductionTitle => section(&self.introduction, true),
            SectionPath::IntroductionContent => section(&self.introduction, false),
            SectionPath::ConclusionTitle => section(&self.conclusion, true),
            SectionPath::ConclusionContent => section(&self.conclusion, false),
            SectionPath::ReferencesTitle => section(&self.references, true),
            SectionPath::ReferencesContent => section(&self.references, false),
            SectionPath::ContentChinese => self.content_chinese.as_ref(),
            SectionPath::ContentEnglish => self.content_english.as_ref(),
            SectionPath::FootnoteChinese => self.footnote_chinese.as_ref(),
            SectionPath::FootnoteEnglish => self.footnote_english.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_covers_every_leaf() {
        let config = FormatConfig::default();
        for path in SectionPath::ALL {
            let leaf = config.leaf(path).unwrap_or_else(|| panic!("{} missing", path));
            assert!(leaf.family.is_some(), "{} has no family", path);
            assert!(leaf.size.is_some(), "{} has no size", path);
        }
    }

    #[test]
    fn test_empty_config_has_no_leaves() {
        let config = FormatConfig::empty();
        assert!(SectionPath::ALL.iter().all(|p| config.leaf(*p).is_none()));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(FormatConfig::default()).unwrap();
        assert_eq!(json["title"]["size"], "三号");
        assert_eq!(json["title"]["bold"], true);
        assert_eq!(json["introduction"]["content"]["lineSpacing"], 1.5);
        assert_eq!(json["contentEnglish"]["family"], "Times New Roman");
        assert!(json.get("numberingIndents").is_none());
    }

    #[test]
    fn test_numbering_indent_overrides_ignore_negative_values() {
        let indents = NumberingIndents {
            level2: Some(-1.0),
            level4: Some(5.0),
            ..Default::default()
        };
        assert_eq!(indents.get(NumberingLevel::Level2), None);
        assert_eq!(indents.get(NumberingLevel::Level4), Some(5.0));
        assert_eq!(indents.get(NumberingLevel::None), None);
    }
}
