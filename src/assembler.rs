//! Assembles paper content and a format configuration into an
//! [`AssembledDocument`].
//!
//! Sections are emitted in a fixed order:
//!
//! ```text
//! title
//! personal info
//! abstract caption + abstract            (if non-empty)
//! keywords                               (if non-empty)
//! introduction caption + introduction    (if non-empty)
//! divider + body                         (if non-empty)
//! divider + conclusion caption + text    (if non-empty)
//! divider + references caption + text   (if non-empty)
//! ```
//!
//! Every run is styled through [`resolve`]; nothing here names a font.

use tracing::{debug, instrument};

use crate::classify::{detect_numbering_level, detect_script, indent_for_level};
use crate::document::{AssembledDocument, FootnoteAnchor, PageMargins, Paragraph, Part, Run, TextRun};
use crate::error::FormatError;
use crate::footnote::{splice, FootnoteTable, Segment};
use crate::format::{mm_to_twips, resolve, ConcreteStyle, FormatConfig, SectionPath};
use crate::model::PaperContent;

pub const ABSTRACT_CAPTION: &str = "摘  要";
pub const KEYWORDS_LABEL: &str = "关键词：";
pub const INTRODUCTION_CAPTION: &str = "引言";
pub const CONCLUSION_CAPTION: &str = "结论";
pub const REFERENCES_CAPTION: &str = "参考文献";

const PERSONAL_INFO_SEPARATOR: &str = "  ";
const PAGE_MARGIN_MM: f64 = 25.4;
const SECTION_FIRST_LINE_INDENT_MM: f64 = 20.0;

/// Paragraph spacing before/after, in millimetres.
#[derive(Debug, Clone, Copy)]
struct Spacing(f64, f64);

const TITLE_SPACING: Spacing = Spacing(10.0, 10.0);
const PERSONAL_INFO_SPACING: Spacing = Spacing(5.0, 15.0);
const CAPTION_SPACING: Spacing = Spacing(10.0, 5.0);
const ABSTRACT_SPACING: Spacing = Spacing(5.0, 15.0);
const KEYWORDS_SPACING: Spacing = Spacing(5.0, 15.0);
const CONTENT_SPACING: Spacing = Spacing(5.0, 5.0);

/// A captioned free-text section.
struct Captioned {
    caption: &'static str,
    caption_part: Part,
    caption_path: SectionPath,
    content_part: Part,
    content_path: SectionPath,
    indent: bool,
}

const INTRODUCTION: Captioned = Captioned {
    caption: INTRODUCTION_CAPTION,
    caption_part: Part::IntroductionTitle,
    caption_path: SectionPath::IntroductionTitle,
    content_part: Part::Introduction,
    content_path: SectionPath::IntroductionContent,
    indent: true,
};

const CONCLUSION: Captioned = Captioned {
    caption: CONCLUSION_CAPTION,
    caption_part: Part::ConclusionTitle,
    caption_path: SectionPath::ConclusionTitle,
    content_part: Part::Conclusion,
    content_path: SectionPath::ConclusionContent,
    indent: true,
};

const REFERENCES: Captioned = Captioned {
    caption: REFERENCES_CAPTION,
    caption_part: Part::ReferencesTitle,
    caption_path: SectionPath::ReferencesTitle,
    content_part: Part::References,
    content_path: SectionPath::ReferencesContent,
    indent: false,
};

fn styled_paragraph(
    part: Part,
    style: &ConcreteStyle,
    spacing: Spacing,
    first_line_indent: u32,
    runs: Vec<Run>,
) -> Paragraph {
    Paragraph {
        part,
        alignment: style.alignment,
        line_units: style.line_units(),
        spacing_before: mm_to_twips(spacing.0),
        spacing_after: mm_to_twips(spacing.1),
        first_line_indent,
        runs,
    }
}

/// Stateless assembler over borrowed inputs; cheap to construct per export.
pub struct DocumentAssembler<'a> {
    paper: &'a PaperContent,
    config: &'a FormatConfig,
    footnotes: FootnoteTable<'a>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(paper: &'a PaperContent, config: &'a FormatConfig) -> Self {
        Self {
            paper,
            config,
            footnotes: FootnoteTable::new(&paper.footnotes),
        }
    }

    fn style(&self, path: SectionPath) -> Result<ConcreteStyle, FormatError> {
        resolve(path, self.config)
    }

    /// Build the ordered paragraph sequence.
    ///
    /// Fails only if the configuration names an unknown font size.
    #[instrument(skip(self), fields(title = %self.paper.title))]
    pub fn assemble(&self) -> Result<AssembledDocument, FormatError> {
        let paper = self.paper;
        let mut paragraphs = Vec::new();

        paragraphs.push(self.single_line(Part::Title, &paper.title, SectionPath::Title, TITLE_SPACING)?);
        paragraphs.push(self.personal_info()?);

        if !paper.abstract_text.trim().is_empty() {
            paragraphs.push(self.single_line(
                Part::AbstractTitle,
                ABSTRACT_CAPTION,
                SectionPath::AbstractTitle,
                CAPTION_SPACING,
            )?);
            self.push_lines(
                &mut paragraphs,
                Part::Abstract,
                &paper.abstract_text,
                SectionPath::AbstractContent,
                ABSTRACT_SPACING,
                true,
            )?;
        }

        if !paper.keywords.trim().is_empty() {
            paragraphs.push(self.keywords()?);
        }

        if !paper.introduction.trim().is_empty() {
            self.push_captioned(&mut paragraphs, &INTRODUCTION, &paper.introduction)?;
        }

        if !paper.body.trim().is_empty() {
            paragraphs.push(Paragraph::blank(Part::Divider));
            self.push_body(&mut paragraphs)?;
        }

        if !paper.conclusion.trim().is_empty() {
            paragraphs.push(Paragraph::blank(Part::Divider));
            self.push_captioned(&mut paragraphs, &CONCLUSION, &paper.conclusion)?;
        }

        if !paper.references.trim().is_empty() {
            paragraphs.push(Paragraph::blank(Part::Divider));
            self.push_captioned(&mut paragraphs, &REFERENCES, &paper.references)?;
        }

        debug!("Assembled {} paragraphs", paragraphs.len());
        Ok(AssembledDocument {
            title: paper.title.clone(),
            margins: PageMargins::uniform(mm_to_twips(PAGE_MARGIN_MM)),
            paragraphs,
        })
    }

    fn single_line(
        &self,
        part: Part,
        text: &str,
        path: SectionPath,
        spacing: Spacing,
    ) -> Result<Paragraph, FormatError> {
        let style = self.style(path)?;
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![Run::Text(TextRun::styled(text, &style))]
        };
        Ok(styled_paragraph(part, &style, spacing, 0, runs))
    }

    fn personal_info(&self) -> Result<Paragraph, FormatError> {
        let line = self
            .paper
            .personal_info
            .iter()
            .map(|item| format!("{}：{}", item.label, item.value))
            .collect::<Vec<_>>()
            .join(PERSONAL_INFO_SEPARATOR);
        self.single_line(Part::PersonalInfo, &line, SectionPath::PersonalInfo, PERSONAL_INFO_SPACING)
    }

    fn keywords(&self) -> Result<Paragraph, FormatError> {
        let style = self.style(SectionPath::Keywords)?;
        let label = TextRun {
            bold: true,
            ..TextRun::styled(KEYWORDS_LABEL, &style)
        };
        let runs = vec![
            Run::Text(label),
            Run::Text(TextRun::styled(self.paper.keywords.as_str(), &style)),
        ];
        Ok(styled_paragraph(Part::Keywords, &style, KEYWORDS_SPACING, 0, runs))
    }

    /// One paragraph per line; blank lines become empty paragraphs.
    fn push_lines(
        &self,
        out: &mut Vec<Paragraph>,
        part: Part,
        text: &str,
        path: SectionPath,
        spacing: Spacing,
        indent: bool,
    ) -> Result<(), FormatError> {
        let style = self.style(path)?;
        let first_line_indent = if indent {
            mm_to_twips(SECTION_FIRST_LINE_INDENT_MM)
        } else {
            0
        };
        for line in text.split('\n') {
            if line.trim().is_empty() {
                out.push(Paragraph::blank(part));
                continue;
            }
            let runs = vec![Run::Text(TextRun::styled(line, &style))];
            out.push(styled_paragraph(part, &style, spacing, first_line_indent, runs));
        }
        Ok(())
    }

    fn push_captioned(
        &self,
        out: &mut Vec<Paragraph>,
        section: &Captioned,
        text: &str,
    ) -> Result<(), FormatError> {
        out.push(self.single_line(
            section.caption_part,
            section.caption,
            section.caption_path,
            CAPTION_SPACING,
        )?);
        self.push_lines(
            out,
            section.content_part,
            text,
            section.content_path,
            CONTENT_SPACING,
            section.indent,
        )
    }

    /// Body lines: script picks the Chinese or English style, numbering
    /// picks the first-line indent, and footnote markers become anchors.
    fn push_body(&self, out: &mut Vec<Paragraph>) -> Result<(), FormatError> {
        let indents = self.config.numbering_indents.as_ref();

        for line in self.paper.body.split('\n') {
            if line.trim().is_empty() {
                out.push(Paragraph::blank(Part::Body));
                continue;
            }

            let path = if detect_script(line).uses_chinese_font() {
                SectionPath::ContentChinese
            } else {
                SectionPath::ContentEnglish
            };
            let style = self.style(path)?;

            let indent_em = indent_for_level(detect_numbering_level(line), indents);
            let first_line_indent = (f64::from(indent_em) * style.size.points() * 20.0).round() as u32;

            let runs = splice(line, &self.footnotes)
                .into_iter()
                .map(|segment| self.body_run(segment, &style))
                .collect::<Result<Vec<_>, _>>()?;

            out.push(styled_paragraph(Part::Body, &style, CONTENT_SPACING, first_line_indent, runs));
        }
        Ok(())
    }

    fn body_run(&self, segment: Segment<'_>, style: &ConcreteStyle) -> Result<Run, FormatError> {
        match segment {
            Segment::Text(text) => Ok(Run::Text(TextRun::styled(text, style))),
            Segment::Anchor { id, content, .. } => {
                let path = if detect_script(content).uses_chinese_font() {
                    SectionPath::FootnoteChinese
                } else {
                    SectionPath::FootnoteEnglish
                };
                let note_style = self.style(path)?;
                Ok(Run::Footnote(FootnoteAnchor {
                    id,
                    content: content.to_string(),
                    half_points: note_style.half_points(),
                    family: note_style.family,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Alignment, NumberingIndents, StyleSpec};
    use crate::model::{Footnote, PersonalInfoItem};
    use pretty_assertions::assert_eq;

    fn parts(doc: &AssembledDocument) -> Vec<Part> {
        doc.paragraphs.iter().map(|p| p.part).collect()
    }

    fn first_text(paragraph: &Paragraph) -> &TextRun {
        match &paragraph.runs[0] {
            Run::Text(t) => t,
            Run::Footnote(_) => panic!("expected text run"),
        }
    }

    #[test]
    fn test_minimal_paper_has_title_and_personal_info() {
        let paper = PaperContent {
            title: "标题".into(),
            ..Default::default()
        };
        let config = FormatConfig::default();
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();
        assert_eq!(parts(&doc), vec![Part::Title, Part::PersonalInfo]);
        assert!(doc.paragraphs[1].is_blank());
        assert_eq!(doc.margins, PageMargins::uniform(1440));
    }

    #[test]
    fn test_full_section_order() {
        let paper = PaperContent {
            title: "标题".into(),
            personal_info: vec![PersonalInfoItem::new("姓名", "张三")],
            abstract_text: "摘要内容".into(),
            keywords: "甲；乙".into(),
            introduction: "引言内容".into(),
            body: "正文".into(),
            conclusion: "结论内容".into(),
            references: "[1] 文献".into(),
            footnotes: Vec::new(),
        };
        let config = FormatConfig::default();
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();
        assert_eq!(
            parts(&doc),
            vec![
                Part::Title,
                Part::PersonalInfo,
                Part::AbstractTitle,
                Part::Abstract,
                Part::Keywords,
                Part::IntroductionTitle,
                Part::Introduction,
                Part::Divider,
                Part::Body,
                Part::Divider,
                Part::ConclusionTitle,
                Part::Conclusion,
                Part::Divider,
                Part::ReferencesTitle,
                Part::References,
            ]
        );
    }

    #[test]
    fn test_personal_info_line_joins_items() {
        let paper = PaperContent {
            title: "标题".into(),
            personal_info: vec![
                PersonalInfoItem::new("姓名", "张三"),
                PersonalInfoItem::new("学号", "2024001"),
            ],
            ..Default::default()
        };
        let config = FormatConfig::default();
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();
        assert_eq!(doc.paragraphs[1].text(), "姓名：张三  学号：2024001");
        assert_eq!(doc.paragraphs[1].alignment, Alignment::Center);
    }

    #[test]
    fn test_keywords_label_is_bold() {
        let paper = PaperContent {
            title: "标题".into(),
            keywords: "排序".into(),
            ..Default::default()
        };
        let mut config = FormatConfig::default();
        config.keywords = Some(StyleSpec {
            bold: Some(false),
            ..StyleSpec::new("黑体", "小四")
        });
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();

        let keywords = doc.part(Part::Keywords).next().unwrap();
        match keywords.runs.as_slice() {
            [Run::Text(label), Run::Text(value)] => {
                assert_eq!(label.text, KEYWORDS_LABEL);
                assert!(label.bold);
                assert_eq!(value.text, "排序");
                assert!(!value.bold);
            }
            other => panic!("unexpected runs: {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines_and_reference_indent() {
        let paper = PaperContent {
            title: "标题".into(),
            introduction: "第一行\n\n第三行".into(),
            references: "文献一\n文献二".into(),
            ..Default::default()
        };
        let config = FormatConfig::default();
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();

        let intro: Vec<_> = doc.part(Part::Introduction).collect();
        assert_eq!(intro.len(), 3);
        assert!(intro[1].is_blank());
        assert_eq!(intro[0].first_line_indent, mm_to_twips(20.0));

        let refs: Vec<_> = doc.part(Part::References).collect();
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|p| p.first_line_indent == 0));
        assert_eq!(refs[0].alignment, Alignment::Left);
        assert_eq!(refs[0].line_units, 540);
    }

    #[test]
    fn test_body_script_selects_style() {
        let paper = PaperContent {
            title: "标题".into(),
            body: "English only line\n中文行\nmixed 中文".into(),
            ..Default::default()
        };
        let config = FormatConfig::default();
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();
        let families: Vec<_> = doc
            .part(Part::Body)
            .map(|p| first_text(p).family.clone())
            .collect();
        assert_eq!(families, vec!["Times New Roman", "宋体", "宋体"]);
    }

    #[test]
    fn test_body_numbering_indent() {
        let paper = PaperContent {
            title: "标题".into(),
            body: "一、绪论\n（1）要点\n普通段落".into(),
            ..Default::default()
        };
        let mut config = FormatConfig::default();
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();
        let indents: Vec<_> = doc.part(Part::Body).map(|p| p.first_line_indent).collect();
        // 12pt body: 0em, 6em, 2em
        assert_eq!(indents, vec![0, 1440, 480]);

        config.numbering_indents = Some(NumberingIndents {
            level1: Some(1.0),
            ..Default::default()
        });
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();
        assert_eq!(doc.part(Part::Body).next().unwrap().first_line_indent, 240);
    }

    #[test]
    fn test_body_footnotes() {
        let paper = PaperContent {
            title: "测试论文".into(),
            body: "第一段 [1] 内容。\n第二段 [5]。".into(),
            footnotes: vec![Footnote { id: 1, content: "Footnote text".into() }],
            ..Default::default()
        };
        let config = FormatConfig::default();
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();
        let body: Vec<_> = doc.part(Part::Body).collect();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].runs.len(), 3);
        match &body[0].runs[1] {
            Run::Footnote(anchor) => {
                assert_eq!(anchor.id, 1);
                assert_eq!(anchor.family, "Times New Roman");
                assert_eq!(anchor.half_points, 18);
            }
            other => panic!("expected anchor, got {:?}", other),
        }
        // Dangling reference stays visible
        assert_eq!(body[1].text(), "第二段 [5]。");
        assert_eq!(doc.footnote_anchors().count(), 1);
    }

    #[test]
    fn test_unknown_font_size_aborts() {
        let paper = PaperContent {
            title: "标题".into(),
            body: "正文".into(),
            ..Default::default()
        };
        let mut config = FormatConfig::default();
        config.content_chinese = Some(StyleSpec::new("宋体", "12pt"));
        let err = DocumentAssembler::new(&paper, &config).assemble().unwrap_err();
        assert!(matches!(err, FormatError::UnknownFontSize { section: "contentChinese", .. }));
    }

    #[test]
    fn test_file_name() {
        let paper = PaperContent {
            title: " 我的 论文:初稿 ".into(),
            ..Default::default()
        };
        let config = FormatConfig::default();
        let doc = DocumentAssembler::new(&paper, &config).assemble().unwrap();
        assert_eq!(doc.file_name(), "我的_论文_初稿.docx");
    }
}
