//! Footnote marker parsing and splicing.
//!
//! The only inline markup the engine recognises is `[n]`, where `n` is one or
//! more ASCII digits. Splicing turns a line into an ordered list of plain text
//! and footnote-anchor segments; no text is ever dropped.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::Footnote;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9]+)\]").expect("footnote marker pattern is valid"));

/// A `[n]` marker located in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    /// Parsed number; saturates for absurdly long digit runs, which then
    /// never match a footnote.
    pub id: u64,
    /// Byte range of the marker, brackets included.
    pub start: usize,
    pub end: usize,
    /// The marker exactly as written, e.g. `[01]`.
    pub text: &'a str,
}

/// Markers in left-to-right order, non-overlapping, leftmost first.
pub fn find_markers(text: &str) -> impl Iterator<Item = Marker<'_>> {
    MARKER.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let digits = caps.get(1)?.as_str();
        Some(Marker {
            id: digits.parse::<u64>().unwrap_or(u64::MAX),
            start: whole.start(),
            end: whole.end(),
            text: whole.as_str(),
        })
    })
}

/// Footnote lookup by id. Only footnotes with non-empty content can anchor.
#[derive(Debug, Clone, Default)]
pub struct FootnoteTable<'a> {
    entries: HashMap<u64, &'a str>,
}

impl<'a> FootnoteTable<'a> {
    pub fn new(footnotes: &'a [Footnote]) -> Self {
        let entries = footnotes
            .iter()
            .filter(|f| !f.content.is_empty())
            .map(|f| (u64::from(f.id), f.content.as_str()))
            .collect();
        Self { entries }
    }

    /// Content of the footnote that `id` anchors to, if any.
    pub fn content(&self, id: u64) -> Option<&'a str> {
        self.entries.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One piece of a spliced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, including markers that matched no footnote.
    Text(&'a str),
    /// A reference to a defined footnote.
    Anchor {
        id: u32,
        marker: &'a str,
        content: &'a str,
    },
}

impl Segment<'_> {
    /// The segment as it appeared in the source line.
    pub fn source_text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Anchor { marker, .. } => marker,
        }
    }
}

/// Split `line` into text and anchor segments.
///
/// A line without markers yields a single text segment holding the whole
/// line (an empty line yields no segments).
pub fn splice<'a>(line: &'a str, table: &FootnoteTable<'a>) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for marker in find_markers(line) {
        if marker.start > last {
            segments.push(Segment::Text(&line[last..marker.start]));
        }
        let anchor = u32::try_from(marker.id)
            .ok()
            .and_then(|id| table.content(marker.id).map(|content| (id, content)));
        match anchor {
            Some((id, content)) => segments.push(Segment::Anchor {
                id,
                marker: marker.text,
                content,
            }),
            None => segments.push(Segment::Text(marker.text)),
        }
        last = marker.end;
    }

    if last < line.len() {
        segments.push(Segment::Text(&line[last..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footnotes() -> Vec<Footnote> {
        vec![
            Footnote { id: 1, content: "注释一".into() },
            Footnote { id: 3, content: String::new() },
            Footnote { id: 7, content: "Note seven".into() },
        ]
    }

    fn rebuild(segments: &[Segment<'_>]) -> String {
        segments.iter().map(Segment::source_text).collect()
    }

    #[test]
    fn test_splice_plain_line() {
        let notes = footnotes();
        let table = FootnoteTable::new(&notes);
        let segments = splice("没有脚注的一行", &table);
        assert_eq!(segments, vec![Segment::Text("没有脚注的一行")]);
        assert!(splice("", &table).is_empty());
    }

    #[test]
    fn test_splice_anchor_between_text() {
        let notes = footnotes();
        let table = FootnoteTable::new(&notes);
        let segments = splice("第一段 [1] 内容。", &table);
        assert_eq!(
            segments,
            vec![
                Segment::Text("第一段 "),
                Segment::Anchor { id: 1, marker: "[1]", content: "注释一" },
                Segment::Text(" 内容。"),
            ]
        );
    }

    #[test]
    fn test_splice_keeps_undefined_and_empty_markers_literal() {
        let notes = footnotes();
        let table = FootnoteTable::new(&notes);
        let segments = splice("[5]see[3][7]", &table);
        assert_eq!(
            segments,
            vec![
                Segment::Text("[5]"),
                Segment::Text("see"),
                Segment::Text("[3]"),
                Segment::Anchor { id: 7, marker: "[7]", content: "Note seven" },
            ]
        );
    }

    #[test]
    fn test_whitespace_only_footnote_still_anchors() {
        let notes = vec![Footnote { id: 4, content: " ".into() }];
        let table = FootnoteTable::new(&notes);
        assert_eq!(table.len(), 1);
        assert_eq!(
            splice("x[4]", &table),
            vec![Segment::Text("x"), Segment::Anchor { id: 4, marker: "[4]", content: " " }]
        );
    }

    #[test]
    fn test_splice_reconstructs_source() {
        let notes = footnotes();
        let table = FootnoteTable::new(&notes);
        for line in [
            "a[1]b[2]c[07][99999999999999999999999]d",
            "[[1]]",
            "[1][1][1]",
            "[ 1 ] [x] []",
            "末尾[7]",
        ] {
            assert_eq!(rebuild(&splice(line, &table)), line);
        }
    }

    #[test]
    fn test_find_markers_order_and_saturation() {
        let ids: Vec<u64> = find_markers("[2] then [10] then [99999999999999999999999]")
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![2, 10, u64::MAX]);
    }

    #[test]
    fn test_leading_zero_marker_anchors_by_value() {
        let notes = footnotes();
        let table = FootnoteTable::new(&notes);
        let segments = splice("x[01]", &table);
        assert_eq!(
            segments[1],
            Segment::Anchor { id: 1, marker: "[01]", content: "注释一" }
        );
    }
}
