use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::Serialize;

use super::{FormatConfig, StyleSpec};
use crate::error::FormatError;

/// Document line units per 1.0 line-spacing multiplier.
pub const LINE_SPACING_BASE: u32 = 360;

const GLOBAL_FAMILY: &str = "宋体";
const GLOBAL_SIZE: FontSize = FontSize::XiaoSi;

static BUILTIN: LazyLock<FormatConfig> = LazyLock::new(FormatConfig::default);

/// Millimetres to twentieths of a point, rounded down.
pub fn mm_to_twips(mm: f64) -> u32 {
    (mm / 25.4 * 1440.0).floor() as u32
}

/// Addressable leaves of a [`FormatConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionPath {
    Title,
    PersonalInfo,
    AbstractTitle,
    AbstractContent,
    Keywords,
    IntroductionTitle,
    IntroductionContent,
    ConclusionTitle,
    ConclusionContent,
    ReferencesTitle,
    ReferencesContent,
    ContentChinese,
    ContentEnglish,
    FootnoteChinese,
    FootnoteEnglish,
}

/// Which settings a leaf honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionShape {
    pub has_bold: bool,
    /// Alignment applies; false for footnote text.
    pub has_paragraph: bool,
    pub has_line_spacing: bool,
}

impl SectionShape {
    const fn new(has_bold: bool, has_paragraph: bool, has_line_spacing: bool) -> Self {
        Self {
            has_bold,
            has_paragraph,
            has_line_spacing,
        }
    }
}

impl SectionPath {
    pub const ALL: [SectionPath; 15] = [
        SectionPath::Title,
        SectionPath::PersonalInfo,
        SectionPath::AbstractTitle,
        SectionPath::AbstractContent,
        SectionPath::Keywords,
        SectionPath::IntroductionTitle,
        SectionPath::IntroductionContent,
        SectionPath::ConclusionTitle,
        SectionPath::ConclusionContent,
        SectionPath::ReferencesTitle,
        SectionPath::ReferencesContent,
        SectionPath::ContentChinese,
        SectionPath::ContentEnglish,
        SectionPath::FootnoteChinese,
        SectionPath::FootnoteEnglish,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionPath::Title => "title",
            SectionPath::PersonalInfo => "personalInfo",
            SectionPath::AbstractTitle => "abstractTitle",
            SectionPath::AbstractContent => "abstractContent",
            SectionPath::Keywords => "keywords",
            SectionPath::IntroductionTitle => "introduction.title",
            SectionPath::IntroductionContent => "introduction.content",
            SectionPath::ConclusionTitle => "conclusion.title",
            SectionPath::ConclusionContent => "conclusion.content",
            SectionPath::ReferencesTitle => "references.title",
            SectionPath::ReferencesContent => "references.content",
            SectionPath::ContentChinese => "contentChinese",
            SectionPath::ContentEnglish => "contentEnglish",
            SectionPath::FootnoteChinese => "footnoteChinese",
            SectionPath::FootnoteEnglish => "footnoteEnglish",
        }
    }

    pub fn shape(self) -> SectionShape {
        match self {
            SectionPath::Title
            | SectionPath::Keywords
            | SectionPath::IntroductionTitle
            | SectionPath::ConclusionTitle
            | SectionPath::ReferencesTitle => SectionShape::new(true, true, false),
            SectionPath::PersonalInfo
            | SectionPath::AbstractTitle
            | SectionPath::AbstractContent => SectionShape::new(false, true, false),
            SectionPath::IntroductionContent
            | SectionPath::ConclusionContent
            | SectionPath::ReferencesContent
            | SectionPath::ContentChinese
            | SectionPath::ContentEnglish => SectionShape::new(false, true, true),
            SectionPath::FootnoteChinese | SectionPath::FootnoteEnglish => {
                SectionShape::new(false, false, false)
            }
        }
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionPath {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionPath::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| FormatError::UnknownSection(s.to_string()))
    }
}

/// The ten named Chinese font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontSize {
    XiaoWu,
    WuHao,
    XiaoSi,
    SiHao,
    XiaoSan,
    SanHao,
    XiaoEr,
    ErHao,
    XiaoYi,
    YiHao,
}

impl FontSize {
    pub const ALL: [FontSize; 10] = [
        FontSize::XiaoWu,
        FontSize::WuHao,
        FontSize::XiaoSi,
        FontSize::SiHao,
        FontSize::XiaoSan,
        FontSize::SanHao,
        FontSize::XiaoEr,
        FontSize::ErHao,
        FontSize::XiaoYi,
        FontSize::YiHao,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FontSize::XiaoWu => "小五",
            FontSize::WuHao => "五号",
            FontSize::XiaoSi => "小四",
            FontSize::SiHao => "四号",
            FontSize::XiaoSan => "小三",
            FontSize::SanHao => "三号",
            FontSize::XiaoEr => "小二",
            FontSize::ErHao => "二号",
            FontSize::XiaoYi => "小一",
            FontSize::YiHao => "一号",
        }
    }

    /// Size in half-points, the unit DOCX run sizes use.
    pub fn half_points(self) -> u32 {
        match self {
            FontSize::XiaoWu => 18,
            FontSize::WuHao => 21,
            FontSize::XiaoSi => 24,
            FontSize::SiHao => 28,
            FontSize::XiaoSan => 30,
            FontSize::SanHao => 32,
            FontSize::XiaoEr => 36,
            FontSize::ErHao => 44,
            FontSize::XiaoYi => 48,
            FontSize::YiHao => 52,
        }
    }

    pub fn points(self) -> f64 {
        f64::from(self.half_points()) / 2.0
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontSize::ALL
            .into_iter()
            .find(|size| size.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Unrecognised keywords fall back to `Left`.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "center" => Alignment::Center,
            "right" => Alignment::Right,
            "justify" => Alignment::Justify,
            _ => Alignment::Left,
        }
    }
}

/// A fully resolved style; every field concrete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcreteStyle {
    pub family: String,
    pub size: FontSize,
    pub bold: bool,
    pub alignment: Alignment,
    /// Line-spacing multiplier; 1.0 when the leaf has none.
    pub line_spacing: f64,
}

impl ConcreteStyle {
    pub fn half_points(&self) -> u32 {
        self.size.half_points()
    }

    /// Line height in document line units.
    pub fn line_units(&self) -> u32 {
        (f64::from(LINE_SPACING_BASE) * self.line_spacing).round() as u32
    }
}

fn field<'a, T: ?Sized>(
    explicit: Option<&'a StyleSpec>,
    builtin: Option<&'a StyleSpec>,
    get: impl Fn(&'a StyleSpec) -> Option<&'a T>,
) -> Option<&'a T> {
    explicit.and_then(&get).or_else(|| builtin.and_then(&get))
}

/// Resolve the style of `path`.
///
/// Each field comes from `config` if set, else from the built-in default for
/// that path, else from the global default (宋体, 小四, left, single spacing).
/// Only an unknown font size name fails.
pub fn resolve(path: SectionPath, config: &FormatConfig) -> Result<ConcreteStyle, FormatError> {
    let shape = path.shape();
    let explicit = config.leaf(path);
    let builtin = BUILTIN.leaf(path);

    let family = field(explicit, builtin, |s| s.family.as_deref())
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(GLOBAL_FAMILY)
        .to_string();

    let size = match field(explicit, builtin, |s| s.size.as_deref()) {
        Some(name) => name.parse::<FontSize>().map_err(|name| FormatError::UnknownFontSize {
            section: path.as_str(),
            name,
        })?,
        None => GLOBAL_SIZE,
    };

    let bold = shape.has_bold && field(explicit, builtin, |s| s.bold.as_ref()).copied().unwrap_or(false);

    let alignment = if shape.has_paragraph {
        field(explicit, builtin, |s| s.alignment.as_deref()).map_or(Alignment::Left, Alignment::from_keyword)
    } else {
        Alignment::Left
    };

    let line_spacing = if shape.has_line_spacing {
        field(explicit, builtin, |s| s.line_spacing.as_ref().filter(|m| m.is_finite() && **m > 0.0))
            .copied()
            .unwrap_or(1.0)
    } else {
        1.0
    };

    Ok(ConcreteStyle {
        family,
        size,
        bold,
        alignment,
        line_spacing,
    })
}

/// Resolve a dotted path such as `introduction.content`.
pub fn resolve_path(path: &str, config: &FormatConfig) -> Result<ConcreteStyle, FormatError> {
    resolve(path.parse()?, config)
}
