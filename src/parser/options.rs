use std::sync::LazyLock;

use regex::Regex;

use super::context::{lookahead, lookbehind};
use super::lines::{is_scale_indicator, Line, LineTable, LineTag};
use crate::config::ParserConfig;
use crate::model::{ChoiceOption, MultilingualText, QuestionType};

/// Bullet syntaxes, tried in order; the first match wins for a line.
static OPTION_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("parenthesis", r"^\(\s*\)\s*(.+)$"),
        ("bracket", r"^\[\s*\]\s*(.+)$"),
        ("bullet", r"^[•○●▪▫■□◦‣⁃►▸]\s+(.+)$"),
        ("dash", r"^[\-–—]\s+(.+)$"),
        ("asterisk", r"^\*\s+(.+)$"),
        ("numbered", r"^\(?\d+\)\s+(.+)$"),
        ("lettered", r"^\(?[A-Za-z]\)\s+(.+)$"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});
static OTHER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)other.*(specify|fill|text)").unwrap());
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:to|-|through)\s*(\d+)").unwrap());
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

const MIN_LITERAL_SCALE_OPTIONS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct OptionBlock {
    pub options: Vec<ChoiceOption>,
    /// First line index after the scanned block.
    pub end: usize,
    /// Options came from a numeric range, not from literal lines.
    pub synthesized: bool,
}

/// Lowercase, non-alphanumeric runs to `_`, trimmed.
pub fn slugify(label: &str) -> String {
    SLUG_RE
        .replace_all(&label.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

/// Strip the bullet syntax from an option line. `None` if no pattern matches.
pub fn match_option(line: &str) -> Option<(&'static str, String)> {
    OPTION_PATTERNS.iter().find_map(|(name, re)| {
        re.captures(line)
            .map(|caps| (*name, caps[1].trim().to_string()))
    })
}

pub fn build_option(label: &str, position: usize) -> ChoiceOption {
    if OTHER_RE.is_match(label) {
        return ChoiceOption {
            value: "other".to_string(),
            label: MultilingualText::replicate(label),
            allow_text: true,
        };
    }

    let slug = slugify(label);
    let value = if slug.is_empty() {
        format!("option_{}", position + 1)
    } else {
        slug
    };

    ChoiceOption {
        value,
        label: MultilingualText::replicate(label),
        allow_text: false,
    }
}

/// Consume the contiguous option block starting at `start`. Options are
/// assumed contiguous: once one is found, the first non-matching line ends
/// the block.
pub fn extract_options(
    table: &mut LineTable,
    start: usize,
    question_line: usize,
    question_text: &str,
    kind: QuestionType,
    config: &ParserConfig,
) -> OptionBlock {
    let mut options = Vec::new();
    let limit = start.saturating_add(config.option_scan_limit).min(table.len());
    let mut i = start;

    while i < limit {
        let Some(line) = table.get(i) else { break };
        if line.is_consumed() {
            break;
        }
        if matches!(line.tag, LineTag::Question | LineTag::Section | LineTag::Blank) {
            break;
        }
        if is_scale_indicator(&line.raw) {
            break;
        }

        match match_option(&line.raw) {
            Some((pattern, label)) => {
                tracing::trace!(line = i, pattern, "option");
                options.push(build_option(&label, options.len()));
                table.consume(i);
            }
            None if !options.is_empty() => break,
            None => {}
        }
        i += 1;
    }

    let mut block = OptionBlock {
        options,
        end: i,
        synthesized: false,
    };

    if kind == QuestionType::Rating && block.options.len() < MIN_LITERAL_SCALE_OPTIONS {
        if let Some((min, max)) = find_scale(table, question_line, start, question_text, config) {
            block.options = (min..=max)
                .map(|n| {
                    let label = n.to_string();
                    ChoiceOption {
                        value: label.clone(),
                        label: MultilingualText::replicate(&label),
                        allow_text: false,
                    }
                })
                .collect();
            block.synthesized = true;
        }
    }

    block
}

/// Numeric range for a rating question: the question's own text first, then
/// nearby lines, then the numbers of a nearby `( ) 1 ( ) 2` indicator.
/// Nearby lines never reach past the neighbouring questions or sections.
fn find_scale(
    table: &LineTable,
    question_line: usize,
    start: usize,
    question_text: &str,
    config: &ParserConfig,
) -> Option<(i64, i64)> {
    let window: Vec<&Line> = lookbehind(table, question_line, config.scale_window)
        .iter()
        .filter(|l| !l.is_consumed())
        .chain(lookahead(table, start, config.scale_window))
        .collect();

    let joined = window.iter().map(|l| l.raw.as_str()).collect::<Vec<_>>().join(" ");

    let textual = [question_text, joined.as_str()].into_iter().find_map(|text| {
        RANGE_RE.captures(text).and_then(|caps| {
            let a = caps[1].parse::<i64>().ok()?;
            let b = caps[2].parse::<i64>().ok()?;
            Some((a, b))
        })
    });

    let range = textual.or_else(|| {
        window.iter().find(|l| is_scale_indicator(&l.raw)).and_then(|l| {
            let numbers: Vec<i64> = DIGITS_RE
                .find_iter(&l.raw)
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            Some((*numbers.iter().min()?, *numbers.iter().max()?))
        })
    })?;

    let (min, max) = if range.0 <= range.1 { range } else { (range.1, range.0) };
    if max - min > config.max_scale_span {
        tracing::debug!(min, max, "scale span too wide, not synthesizing");
        return None;
    }
    Some((min, max))
}
