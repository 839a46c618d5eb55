use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::markup::{collapse_ws, MarkupHints};
use crate::config::ParserConfig;

static SKIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(introduction|thank\s+you|thanks\b|questionnaire|survey|the\s+ultimate|dear\s|hello\b|welcome\b)")
        .unwrap()
});
static QUESTION_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.+)$").unwrap());
static QUESTION_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:question\s+|q\.?\s*)(\d+)[.:)]?\s+(.+)$").unwrap());
static SECTION_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(section|part|chapter|module|unit)\s+([a-z0-9]+)\s*:\s*(.*)$").unwrap()
});
static LETTER_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[IVX]+|[A-Z])\.\s+[A-Z][a-z]{3,}").unwrap());
static SCALE_INDICATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[]\s*[)\]]\s*\d+\s+[(\[]\s*[)\]]\s*\d+").unwrap());
static OPTION_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\(\s*\)|\[\s*\])\s*\S|(?:[•○●▪▫■□◦‣⁃►▸*\-–—]|\(?\d+\)|\(?[A-Za-z]\))\s+\S)").unwrap()
});
static BLANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:_{3,}|\[[^\]]*\]$|\.{3,}|…)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineTag {
    Section,
    Question,
    Option,
    Blank,
    Skip,
    Plain,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub index: usize,
    pub raw: String,
    pub tag: LineTag,
    consumed: bool,
}

impl Line {
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

struct TagRule {
    tag: LineTag,
    matches: fn(&str, &MarkupHints, &ParserConfig) -> bool,
}

/// First match wins. Ambiguous lines resolve by position in this table.
const TAG_RULES: &[TagRule] = &[
    TagRule { tag: LineTag::Skip, matches: is_boilerplate },
    TagRule { tag: LineTag::Section, matches: is_section_heading },
    TagRule { tag: LineTag::Question, matches: is_question_line },
    TagRule { tag: LineTag::Option, matches: |l, _, _| is_option_marker(l) },
    TagRule { tag: LineTag::Blank, matches: |l, _, _| is_blank_placeholder(l) },
];

pub fn classify_line(line: &str, hints: &MarkupHints, config: &ParserConfig) -> LineTag {
    TAG_RULES
        .iter()
        .find(|rule| (rule.matches)(line, hints, config))
        .map(|rule| rule.tag)
        .unwrap_or(LineTag::Plain)
}

/// Arena of tagged lines. Each entry can be consumed at most once per parse.
#[derive(Debug, Clone, Default)]
pub struct LineTable {
    lines: Vec<Line>,
}

impl LineTable {
    pub fn build(text: &str, hints: &MarkupHints, config: &ParserConfig) -> Self {
        let lines = normalize_lines(text)
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let tag = classify_line(&raw, hints, config);
                Line { index, raw, tag, consumed: false }
            })
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn tag(&self, index: usize) -> Option<LineTag> {
        self.lines.get(index).map(|l| l.tag)
    }

    pub fn is_consumed(&self, index: usize) -> bool {
        self.lines.get(index).is_some_and(|l| l.consumed)
    }

    /// Returns `false` when the line was already consumed or does not exist.
    pub fn consume(&mut self, index: usize) -> bool {
        match self.lines.get_mut(index) {
            Some(line) if !line.consumed => {
                line.consumed = true;
                true
            }
            _ => false,
        }
    }

    pub fn consumed_count(&self) -> usize {
        self.lines.iter().filter(|l| l.consumed).count()
    }
}

/// Trimmed, whitespace-collapsed, non-empty lines in document order.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(collapse_ws)
        .filter(|l| !l.is_empty())
        .collect()
}

/// `(number, text)` for numbered forms, `(None, line)` for a long `?` line.
pub fn parse_question(line: &str, config: &ParserConfig) -> Option<(Option<u32>, String)> {
    if let Some((number, text)) = numbered_question(line) {
        return Some((Some(number), text));
    }
    if line.ends_with('?') && line.chars().count() > config.question_mark_min_len {
        return Some((None, line.to_string()));
    }
    None
}

fn numbered_question(line: &str) -> Option<(u32, String)> {
    let caps = QUESTION_NUMBER_RE
        .captures(line)
        .or_else(|| QUESTION_LABEL_RE.captures(line))?;
    let number = caps[1].parse::<u32>().ok()?;
    Some((number, caps[2].trim().to_string()))
}

pub fn is_question_line(line: &str, _: &MarkupHints, config: &ParserConfig) -> bool {
    parse_question(line, config).is_some()
}

pub fn is_option_marker(line: &str) -> bool {
    OPTION_MARKER_RE.is_match(line)
}

/// `( ) 1 ( ) 2 ...` style inline numeric scales.
pub fn is_scale_indicator(line: &str) -> bool {
    SCALE_INDICATOR_RE.is_match(line)
}

pub fn is_blank_placeholder(line: &str) -> bool {
    BLANK_RE.is_match(line)
}

fn is_boilerplate(line: &str, _: &MarkupHints, config: &ParserConfig) -> bool {
    SKIP_RE.is_match(line) && parse_question(line, config).is_none() && !line.ends_with('?')
}

fn is_section_heading(line: &str, hints: &MarkupHints, config: &ParserConfig) -> bool {
    if numbered_question(line).is_some()
        || is_scale_indicator(line)
        || is_option_marker(line)
        || is_blank_placeholder(line)
    {
        return false;
    }

    let explicit = is_explicit_section(line);
    let emphasized = hints.is_emphasized(line)
        && !line.ends_with('?')
        && (explicit || line.chars().count() < config.section_markup_max_len);

    explicit || LETTER_HEADING_RE.is_match(line) || is_caps_heading(line) || emphasized
}

/// `Section A: ...`, `Part 2: ...` and the other marker-word headings.
pub fn is_explicit_section(line: &str) -> bool {
    SECTION_MARKER_RE.is_match(line)
}

fn is_caps_heading(line: &str) -> bool {
    let len = line.chars().count();
    line.chars().any(char::is_alphabetic)
        && line == line.to_uppercase()
        && line.split_whitespace().count() >= 3
        && !line.contains('?')
        && len > 15
        && len < 100
}

/// Canonical `"<Marker> <id>: <rest>"` for explicit markers, the raw line otherwise.
pub fn clean_section_title(line: &str) -> String {
    match SECTION_MARKER_RE.captures(line) {
        Some(caps) => {
            let rest = caps[3].trim();
            if rest.is_empty() {
                format!("{} {}", &caps[1], &caps[2])
            } else {
                format!("{} {}: {}", &caps[1], &caps[2], rest)
            }
        }
        None => line.to_string(),
    }
}
