use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use super::classify::{classify, Classification};
use super::context::{analyze, Context};
use super::features::{extract_features, FeatureSet};
use super::lines::{is_explicit_section, is_scale_indicator, parse_question, LineTable, LineTag};
use super::options::extract_options;
use super::sections::SectionSegmenter;
use super::validation::build_rules;
use crate::config::ParserConfig;
use crate::model::{MultilingualText, Question, QuestionType, Section};
use crate::report::{DegradedReason, Diagnostic};

static REQUIRED_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\((required|mandatory)\)").unwrap());

/// Why a question got the type it did.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionTrace {
    pub line: usize,
    pub number: Option<u32>,
    pub text: String,
    pub features: FeatureSet,
    pub context: Context,
    pub classification: Classification,
    pub option_count: usize,
}

#[derive(Debug, Default)]
pub struct Assembly {
    pub sections: Vec<Section>,
    pub diagnostics: Vec<Diagnostic>,
    pub traces: Vec<QuestionTrace>,
}

pub fn assemble(table: &mut LineTable, config: &ParserConfig) -> Assembly {
    let mut segmenter = SectionSegmenter::new();
    let mut diagnostics = Vec::new();
    let mut traces = Vec::new();

    for i in 0..table.len() {
        if table.is_consumed(i) {
            continue;
        }
        let Some(line) = table.get(i) else { break };

        match line.tag {
            LineTag::Section => {
                let raw = line.raw.clone();
                claim(table, i);
                segmenter.start_section(&raw);
            }
            LineTag::Question => {
                if let Some((question, trace)) = build_question(table, i, config, &mut diagnostics) {
                    debug!(
                        line = i,
                        number = ?question.number,
                        kind = %question.kind,
                        confidence = question.confidence,
                        "question"
                    );
                    segmenter.push_question(question);
                    traces.push(trace);
                }
            }
            _ => {}
        }
    }

    let (mut sections, default_only) = segmenter.finish();

    if default_only {
        diagnostics.push(Diagnostic::Fallback { tier: 1 });
    }

    if sections.is_empty() {
        match imported_content(table, config) {
            Some(section) => {
                debug!(questions = section.questions.len(), "no structure found, using imported content");
                diagnostics.push(Diagnostic::Fallback { tier: 2 });
                sections.push(section);
            }
            None => {
                warn!("no questions detected, even by fallback");
                diagnostics.push(Diagnostic::NoStructureDetected);
            }
        }
    }

    Assembly {
        sections,
        diagnostics,
        traces,
    }
}

fn claim(table: &mut LineTable, index: usize) {
    if !table.consume(index) {
        warn!(line = index, "line claimed twice");
    }
}

fn build_question(
    table: &mut LineTable,
    index: usize,
    config: &ParserConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(Question, QuestionTrace)> {
    let (number, mut text) = parse_question(&table.get(index)?.raw, config)?;
    claim(table, index);

    // continuation lines
    let mut next = index + 1;
    let mut merged = 0;
    while next < table.len() && merged < config.continuation_limit && !text.ends_with('?') {
        let Some(line) = table.get(next) else { break };
        if line.is_consumed() || line.tag != LineTag::Plain || is_scale_indicator(&line.raw) {
            break;
        }
        text.push(' ');
        text.push_str(&line.raw);
        claim(table, next);
        next += 1;
        merged += 1;
    }

    let features = extract_features(&text);
    let context = analyze(table, index, next, config);
    let classification = classify(&features, &context, config);
    let kind = classification.kind;

    if classification.low_confidence {
        diagnostics.push(Diagnostic::Degraded {
            line: index,
            reason: DegradedReason::LowConfidence,
        });
    }

    let options = if kind.is_selection() {
        let block = extract_options(table, next, index, &text, kind, config);
        if block.synthesized {
            diagnostics.push(Diagnostic::Degraded {
                line: index,
                reason: DegradedReason::ScaleSynthesized,
            });
        }
        if block.options.is_empty() {
            warn!(line = index, %kind, "selection question without options");
            diagnostics.push(Diagnostic::Degraded {
                line: index,
                reason: DegradedReason::MissingOptions,
            });
            None
        } else {
            Some(block.options)
        }
    } else {
        None
    };

    let required = text.contains('*') || REQUIRED_MARK_RE.is_match(&text);
    let clean = text.trim_end_matches('*').trim().to_string();

    let question = Question {
        number,
        text: MultilingualText::replicate(&clean),
        kind,
        options,
        required,
        order_index: 0,
        validation_rules: build_rules(kind, &text),
        help_text: MultilingualText::empty(),
        confidence: classification.confidence,
    };

    let trace = QuestionTrace {
        line: index,
        number,
        text: clean,
        features,
        context,
        option_count: question.options.as_ref().map_or(0, Vec::len),
        classification,
    };

    Some((question, trace))
}

/// Last tier: treat plausible-length content lines as free-text questions.
///
/// Headings count as content here. Explicit `Section X:` markers are only
/// used when nothing else is left.
fn imported_content(table: &LineTable, config: &ParserConfig) -> Option<Section> {
    let candidates = |bounded: bool, keep_markers: bool| -> Vec<String> {
        table
            .lines()
            .iter()
            .filter(|l| l.tag != LineTag::Skip)
            .filter(|l| keep_markers || !is_explicit_section(&l.raw))
            .filter(|l| {
                let len = l.raw.chars().count();
                !bounded || (len > config.fallback_min_len && len < config.fallback_max_len)
            })
            .take(config.fallback_cap)
            .map(|l| l.raw.chars().take(config.fallback_max_len).collect())
            .collect()
    };

    let texts = [(true, false), (false, false), (false, true)]
        .into_iter()
        .map(|(bounded, keep_markers)| candidates(bounded, keep_markers))
        .find(|texts| !texts.is_empty())?;

    let questions = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let kind = if text.chars().count() < config.fallback_textarea_len {
                QuestionType::Text
            } else {
                QuestionType::Textarea
            };
            Question {
                number: None,
                text: MultilingualText::replicate(text),
                kind,
                options: None,
                required: false,
                order_index: i,
                validation_rules: build_rules(kind, text),
                help_text: MultilingualText::empty(),
                confidence: config.fallback_confidence,
            }
        })
        .collect();

    Some(Section {
        title: MultilingualText::imported_content(),
        description: MultilingualText::empty(),
        order_index: 0,
        questions,
    })
}
