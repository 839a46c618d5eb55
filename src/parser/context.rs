use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::lines::{is_blank_placeholder, is_option_marker, is_scale_indicator, Line, LineTable, LineTag};
use crate::config::ParserConfig;

static PAREN_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\(\s*\)\s*[A-Za-z]").unwrap());
static BRACKET_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[\s*\]").unwrap());
static YES_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[(\[]?\s*[)\]]?\s*(yes|no)$").unwrap());
static UNDERSCORES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{3,}").unwrap());
static INSTRUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)instruction|note|please|important").unwrap());

/// Signals from the lines around a question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Context {
    pub has_options_after: bool,
    pub has_scale_after: bool,
    pub has_blank_after: bool,
    pub option_count: usize,
    pub paren_option_count: usize,
    pub has_bracket_options: bool,
    pub yes_no_count: usize,
    /// A plain instruction line sits between the previous question and this one.
    pub has_instructions: bool,
}

/// `question` is the question's own line, `start` the first line after its
/// merged continuation.
pub fn analyze(table: &LineTable, question: usize, start: usize, config: &ParserConfig) -> Context {
    let ahead = lookahead(table, start, config.lookahead_window);
    let near = &ahead[..ahead.len().min(config.context_window)];

    let options: Vec<&str> = ahead
        .iter()
        .map(|l| l.raw.as_str())
        .filter(|l| is_option_marker(l) && !is_scale_indicator(l))
        .collect();

    let has_instructions = lookbehind(table, question, config.context_window)
        .iter()
        .any(|l| l.tag == LineTag::Plain && INSTRUCTION_RE.is_match(&l.raw));

    Context {
        has_options_after: !options.is_empty(),
        has_scale_after: ahead.iter().any(|l| is_scale_indicator(&l.raw)),
        has_blank_after: near
            .iter()
            .any(|l| is_blank_placeholder(&l.raw) || UNDERSCORES_RE.is_match(&l.raw)),
        option_count: options.len(),
        paren_option_count: options.iter().filter(|l| PAREN_OPTION_RE.is_match(l)).count(),
        has_bracket_options: options.iter().any(|l| BRACKET_OPTION_RE.is_match(l)),
        yes_no_count: ahead.iter().filter(|l| YES_NO_RE.is_match(&l.raw)).count(),
        has_instructions,
    }
}

/// Unconsumed lines from `start`, at most `limit`, ending before the next question or section.
pub fn lookahead(table: &LineTable, start: usize, limit: usize) -> Vec<&Line> {
    table
        .lines()
        .iter()
        .skip(start)
        .take(limit)
        .take_while(|l| !matches!(l.tag, LineTag::Question | LineTag::Section))
        .filter(|l| !l.is_consumed())
        .collect()
}

/// Up to `limit` lines right before `question`, newest last, starting after
/// the previous question or section.
pub fn lookbehind(table: &LineTable, question: usize, limit: usize) -> &[Line] {
    let lines = table.lines();
    let end = question.min(lines.len());
    let from = lines[..end]
        .iter()
        .rposition(|l| matches!(l.tag, LineTag::Question | LineTag::Section))
        .map_or(0, |i| i + 1)
        .max(end.saturating_sub(limit));
    &lines[from..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::markup::MarkupHints;

    fn ctx(text: &str) -> Context {
        let config = ParserConfig::default();
        let table = LineTable::build(text, &MarkupHints::default(), &config);
        analyze(&table, 0, 1, &config)
    }

    #[test]
    fn parenthesis_options_counted() {
        let c = ctx("1. Pick a color\n( ) Red\n( ) Blue");
        assert!(c.has_options_after);
        assert_eq!(c.option_count, 2);
        assert_eq!(c.paren_option_count, 2);
        assert!(!c.has_bracket_options);
        assert!(!c.has_scale_after);
    }

    #[test]
    fn lookahead_stops_at_next_question() {
        let c = ctx("1. Your email?\n2. Pick one\n( ) A\n( ) B");
        assert!(!c.has_options_after);
        assert_eq!(c.option_count, 0);
    }

    #[test]
    fn scale_indicator_is_not_an_option() {
        let c = ctx("1. Rate us\n( ) 1 ( ) 2 ( ) 3 ( ) 4 ( ) 5");
        assert!(c.has_scale_after);
        assert!(!c.has_options_after);
    }

    #[test]
    fn blank_and_yes_no() {
        let c = ctx("1. Do you smoke\n( ) Yes\n( ) No");
        assert_eq!(c.yes_no_count, 2);
        let c = ctx("1. Your name\n____________");
        assert!(c.has_blank_after);
        assert!(!c.has_options_after);
    }

    #[test]
    fn brackets_detected() {
        let c = ctx("1. Which apply\n[ ] Car\n[ ] Bike\n[ ] Bus");
        assert!(c.has_bracket_options);
        assert_eq!(c.option_count, 3);
    }

    fn ctx_at(text: &str, question: usize) -> Context {
        let config = ParserConfig::default();
        let table = LineTable::build(text, &MarkupHints::default(), &config);
        analyze(&table, question, question + 1, &config)
    }

    #[test]
    fn instructions_before() {
        assert!(ctx_at("Please answer in your own words\n1. Your views on the park", 1).has_instructions);
        assert!(!ctx_at("1. Your views on the park", 0).has_instructions);
    }

    #[test]
    fn instructions_do_not_leak_across_questions() {
        let c = ctx_at("1. Please describe your home\n2. Your views on the park", 1);
        assert!(!c.has_instructions);
        let c = ctx_at("1. Pick one\n( ) Other (please specify)\n2. Your views on the park", 2);
        assert!(!c.has_instructions);
    }

    #[test]
    fn lookbehind_stops_at_section() {
        let config = ParserConfig::default();
        let table = LineTable::build(
            "Note the dates\nSection B: Travel\nPlease be exact\n1. Your route",
            &MarkupHints::default(),
            &config,
        );
        let raws: Vec<&str> = lookbehind(&table, 3, 5).iter().map(|l| l.raw.as_str()).collect();
        assert_eq!(raws, vec!["Please be exact"]);
    }
}
