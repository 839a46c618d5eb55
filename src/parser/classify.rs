use serde::{Serialize, Serializer};

use super::context::Context;
use super::features::FeatureSet;
use crate::config::ParserConfig;
use crate::model::QuestionType;

/// Accumulated evidence per question type, indexed by declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTable([i32; QuestionType::COUNT]);

impl ScoreTable {
    pub fn get(&self, kind: QuestionType) -> i32 {
        self.0[kind.index()]
    }

    pub fn add(&mut self, kind: QuestionType, delta: i32) {
        self.0[kind.index()] += delta;
    }

    /// Subtract, flooring at zero.
    pub fn penalize(&mut self, kind: QuestionType, amount: i32) {
        let slot = &mut self.0[kind.index()];
        *slot = (*slot - amount).max(0);
    }

    /// Highest score; ties go to the type declared first.
    pub fn best(&self) -> (QuestionType, i32) {
        let mut best = (QuestionType::ALL[0], self.0[0]);
        for kind in QuestionType::ALL.iter().skip(1) {
            let score = self.get(*kind);
            if score > best.1 {
                best = (*kind, score);
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionType, i32)> + '_ {
        QuestionType::ALL.iter().map(|k| (*k, self.get(*k)))
    }
}

impl Serialize for ScoreTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(k, s)| (k.as_str(), s)))
    }
}

struct Rule {
    name: &'static str,
    kind: QuestionType,
    delta: i32,
    applies: fn(&FeatureSet, &Context, &ParserConfig) -> bool,
}

macro_rules! rule {
    ($name:literal, $kind:ident, $delta:expr, |$f:ident, $c:ident, $cfg:ident| $body:expr) => {
        Rule {
            name: $name,
            kind: QuestionType::$kind,
            delta: $delta,
            applies: |$f, $c, $cfg| $body,
        }
    };
}

/// Every matching rule contributes; nothing short-circuits here.
#[rustfmt::skip]
const RULES: &[Rule] = &[
    // contact fields
    rule!("email_keyword", Email, 80, |f, _c, _cfg| f.has_email),
    rule!("email_mention", Email, 50, |f, _c, _cfg| f.mentions_email && !f.has_select),
    rule!("phone_keyword", Phone, 80, |f, _c, _cfg| f.has_phone),
    rule!("url_keyword", Url, 80, |f, _c, _cfg| f.has_url),
    rule!("url_mention", Url, 40, |f, _c, _cfg| f.mentions_url),
    // date and time
    rule!("temporal", Date, 60, |f, _c, _cfg| f.has_temporal && !f.has_select && !f.time_phrase),
    rule!("date_phrase", Date, 50, |f, c, _cfg| f.date_phrase && !c.has_options_after),
    rule!("time_phrase", Time, 60, |f, c, _cfg| f.time_phrase && !c.has_options_after),
    // numbers
    rule!("quantity", Number, 70, |f, _c, _cfg| f.has_quantity),
    rule!("numeric_not_scale", Number, 50, |f, _c, _cfg| f.has_numeric && !f.has_scale),
    rule!("how_many", Number, 60, |f, c, _cfg| f.how_many && !c.has_options_after),
    rule!("age", Number, 70, |f, c, _cfg| f.mentions_age && !c.has_options_after),
    // scales
    rule!("scale_keyword", Rating, 80, |f, _c, _cfg| f.has_scale),
    rule!("scale_keyword_radio", Radio, 40, |f, _c, _cfg| f.has_scale),
    rule!("agreement", Rating, 70, |f, _c, _cfg| f.has_agreement),
    rule!("agreement_radio", Radio, 50, |f, _c, _cfg| f.has_agreement),
    rule!("likert", Rating, 60, |f, _c, _cfg| f.has_likert),
    rule!("likert_radio", Radio, 40, |f, _c, _cfg| f.has_likert),
    rule!("scale_after", Rating, 50, |_f, c, _cfg| c.has_scale_after),
    rule!("scale_after_radio", Radio, 60, |_f, c, _cfg| c.has_scale_after),
    rule!("numeric_range", Rating, 70, |f, _c, _cfg| f.numeric_range),
    rule!("numeric_range_radio", Radio, 50, |f, _c, _cfg| f.numeric_range),
    rule!("slider", Slider, 80, |f, _c, _cfg| f.slider_phrase),
    // ranking
    rule!("rank_importance", Textarea, 40, |f, _c, _cfg| f.has_rank && f.has_importance),
    rule!("rank_importance_multi", Checkbox, 30, |f, _c, _cfg| f.has_rank && f.has_importance),
    rule!("rank_order", Textarea, 50, |f, _c, _cfg| f.rank_order),
    // multiple choice
    rule!("all_that_apply", Checkbox, 90, |f, _c, _cfg| f.has_all),
    rule!("select_all", Checkbox, 80, |f, _c, _cfg| f.select_all),
    rule!("bracket_options", Checkbox, 100, |_f, c, _cfg| c.has_bracket_options),
    // single choice
    rule!("select_single", Radio, 70, |f, _c, _cfg| f.has_one && f.has_select),
    rule!("select_one", Radio, 80, |f, _c, _cfg| f.select_one),
    rule!("paren_options", Radio, 100, |_f, c, _cfg| c.paren_option_count > 0),
    rule!("two_paren_options", Radio, 100, |_f, c, cfg| cfg.two_option_radio && c.paren_option_count == 2),
    rule!("binary", Radio, 90, |f, _c, _cfg| f.has_binary),
    rule!("yes_no_options", Radio, 100, |_f, c, _cfg| c.yes_no_count == 2),
    // dropdowns
    rule!("many_options", Select, 60, |f, c, cfg| c.option_count > cfg.select_option_threshold && !f.has_all),
    rule!("many_options_radio", Radio, -20, |f, c, cfg| c.option_count > cfg.select_option_threshold && !f.has_all),
    // long-form text
    rule!("describe", Textarea, 70, |f, _c, _cfg| f.has_describe),
    rule!("opinion_feedback", Textarea, 60, |f, _c, _cfg| f.has_opinion || f.has_feedback),
    rule!("why", Textarea, 50, |f, _c, _cfg| f.has_why),
    rule!("long_form", Textarea, 70, |f, _c, _cfg| f.long_form),
    rule!("long_answer", Textarea, 60, |f, _c, _cfg| f.has_long_answer),
    rule!("blank_no_options", Textarea, 40, |_f, c, _cfg| c.has_blank_after && !c.has_options_after),
    rule!("long_question", Textarea, 30, |f, _c, _cfg| f.word_count > 20),
    rule!("instructed_free_text", Textarea, 20, |_f, c, _cfg| {
        c.has_instructions && !c.has_options_after && !c.has_scale_after
    }),
    // short text
    rule!("name_field", Text, 80, |f, c, _cfg| f.has_name && !c.has_options_after),
    rule!("short_wh", Text, 50, |f, c, _cfg| {
        (f.has_what || f.has_who || f.has_where) && !c.has_options_after && !f.has_describe && f.word_count < 15
    }),
    rule!("short_blank", Text, 40, |f, c, _cfg| c.has_blank_after && f.word_count < 12),
];

struct Adjustment {
    name: &'static str,
    applies: fn(&Context) -> bool,
    penalties: &'static [(QuestionType, i32)],
}

const ADJUSTMENTS: &[Adjustment] = &[
    Adjustment {
        name: "options_follow",
        applies: |c| c.has_options_after,
        penalties: &[
            (QuestionType::Text, 50),
            (QuestionType::Textarea, 50),
            (QuestionType::Number, 30),
            (QuestionType::Date, 30),
        ],
    },
    Adjustment {
        name: "no_choices_follow",
        applies: |c| !c.has_options_after && !c.has_scale_after,
        penalties: &[
            (QuestionType::Radio, 40),
            (QuestionType::Checkbox, 40),
            (QuestionType::Select, 40),
        ],
    },
];

const LADDER_LONG_WORDS: usize = 15;
const LADDER_CONFIDENCE: f64 = 0.4;
const LADDER_FLOOR_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub kind: QuestionType,
    pub confidence: f64,
    pub scores: ScoreTable,
    pub fired: Vec<&'static str>,
    /// Winning score was under the floor and the fallback ladder decided.
    pub low_confidence: bool,
}

pub fn classify(features: &FeatureSet, context: &Context, config: &ParserConfig) -> Classification {
    let mut scores = ScoreTable::default();

    if features.has_upload {
        scores.add(QuestionType::File, 100);
        return Classification {
            kind: QuestionType::File,
            confidence: config.file_confidence,
            scores,
            fired: vec!["upload_override"],
            low_confidence: false,
        };
    }

    let mut fired = Vec::new();
    for rule in RULES {
        if (rule.applies)(features, context, config) {
            scores.add(rule.kind, rule.delta);
            fired.push(rule.name);
        }
    }

    for adj in ADJUSTMENTS {
        if (adj.applies)(context) {
            for (kind, amount) in adj.penalties {
                scores.penalize(*kind, *amount);
            }
            fired.push(adj.name);
        }
    }

    let (best, max_score) = scores.best();

    if max_score < config.score_floor {
        let (kind, confidence) = if features.word_count > LADDER_LONG_WORDS {
            (QuestionType::Textarea, LADDER_CONFIDENCE)
        } else if context.has_blank_after {
            (QuestionType::Text, LADDER_CONFIDENCE)
        } else {
            (QuestionType::Text, LADDER_FLOOR_CONFIDENCE)
        };
        return Classification {
            kind,
            confidence,
            scores,
            fired,
            low_confidence: true,
        };
    }

    Classification {
        kind: best,
        confidence: (f64::from(max_score) / 100.0).min(config.confidence_cap),
        scores,
        fired,
        low_confidence: false,
    }
}
