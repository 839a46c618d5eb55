use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

macro_rules! cue {
    ($name:ident, $pattern:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new(concat!("(?i)", $pattern)).unwrap());
    };
}

// Interrogatives
cue!(WHO_RE, r"\b(who|whom|whose)\b");
cue!(WHAT_RE, r"\b(what|what's)\b");
cue!(WHEN_RE, r"\b(when|what time)\b");
cue!(WHERE_RE, r"\bwhere\b");
cue!(WHY_RE, r"\bwhy\b");
cue!(HOW_RE, r"\b(how|how many|how much|how often|how long)\b");
cue!(WHICH_RE, r"\bwhich\b");

// Modality and preference
cue!(WOULD_RE, r"\b(would|could|should|might)\b");
cue!(PREFER_RE, r"\b(prefer|preference|like|love|enjoy|favorite)\b");

// Time
cue!(TEMPORAL_RE, r"\b(date|time|year|month|day|week|yesterday|today|tomorrow|when|schedule|deadline)\b");
cue!(FREQUENCY_RE, r"\b(often|frequency|daily|weekly|monthly|yearly|always|never|sometimes|regularly)\b");
cue!(DATE_PHRASE_RE, r"\bdate\b|birth|\bdob\b|when did|when will");
cue!(TIME_PHRASE_RE, r"\b(time|hours?|minutes?|am|pm)\b");

// Quantity and scale
cue!(QUANTITY_RE, r"\b(how many|number of|count|quantity|amount|total|sum)\b");
cue!(NUMERIC_RE, r"\b(age|years old|score|rating|percentage|rate)\b");
cue!(SCALE_RE, r"\b(scale|rate|rating|rank|grade|level|from \d+ to \d+|out of \d+|\d+-point)\b");
cue!(HOW_MANY_RE, r"\bhow many\b|\bnumber of\b");
cue!(AGE_RE, r"\bage\b|years old");
cue!(RANGE_RE, r"\b\d+\s*(to|-|through)\s*\d+\b");
cue!(SLIDER_RE, r"slider|continuous|spectrum");

// Long-form answers
cue!(DESCRIBE_RE, r"\b(describe|explain|elaborate|tell us|share|detail|discuss)\b");
cue!(OPINION_RE, r"\b(opinion|think|believe|feel|thoughts|view|perspective)\b");
cue!(FEEDBACK_RE, r"\b(feedback|comment|suggestion|input|remarks|notes)\b");
cue!(LONG_FORM_RE, r"explain|elaborate|detail|discuss|comment|feedback|thoughts");
cue!(LONG_ANSWER_RE, r"\b(maximum|up to \d+ words|brief|short|long)\b");

// Selection
cue!(SELECT_RE, r"\b(select|choose|pick|mark)\b");
cue!(ALL_RE, r"\b(all that apply|all applicable|multiple|up to \d+)\b");
cue!(ONE_RE, r"\b(one|single|only one)\b");
cue!(SELECT_ALL_RE, r"select all|check all|mark all|choose all|multiple|up to \d+");
cue!(SELECT_ONE_RE, r"select one|choose one|pick one|single choice");
cue!(BINARY_RE, r"\b(yes/no|true/false|agree/disagree)\b");

// Contact fields
cue!(EMAIL_RE, r"\b(email|e-mail|email address)\b");
cue!(EMAIL_MENTION_RE, r"email");
cue!(PHONE_RE, r"\b(phone|telephone|mobile|cell|contact number)\b");
cue!(NAME_RE, r"\b(name|first name|last name|full name)\b");
cue!(ADDRESS_RE, r"\b(address|street|city|zip|postal code|location)\b");
cue!(URL_RE, r"\b(website|url|link|web address|homepage|http)\b");
cue!(URL_MENTION_RE, r"website|url|link");

// Ranking
cue!(RANK_RE, r"\b(rank|order|priority|prioritize|arrange|sequence)\b");
cue!(IMPORTANCE_RE, r"\b(importance|important|most|least|priority)\b");
cue!(RANK_ORDER_RE, r"rank.*order|order.*importance|top \d+|first.*second.*third");

// Agreement scales
cue!(AGREEMENT_RE, r"\b(strongly agree|agree|neutral|disagree|strongly disagree|satisfaction|satisfied)\b");
cue!(LIKERT_RE, r"\b(strongly|somewhat|neither|not at all)\b");

cue!(UPLOAD_RE, r"\b(upload|attach|file|document|image|photo|resume|cv)\b");
cue!(REQUIRED_RE, r"\b(required|mandatory|must|necessary)\b");
cue!(OPTIONAL_RE, r"\b(optional|if applicable|if any)\b");

/// Linguistic and keyword cues of a question's text. Position independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    pub has_who: bool,
    pub has_what: bool,
    pub has_when: bool,
    pub has_where: bool,
    pub has_why: bool,
    pub has_how: bool,
    pub has_which: bool,
    pub has_would: bool,
    pub has_prefer: bool,
    pub has_temporal: bool,
    pub has_frequency: bool,
    pub date_phrase: bool,
    pub time_phrase: bool,
    pub has_quantity: bool,
    pub has_numeric: bool,
    pub has_scale: bool,
    pub how_many: bool,
    pub mentions_age: bool,
    pub numeric_range: bool,
    pub slider_phrase: bool,
    pub has_describe: bool,
    pub has_opinion: bool,
    pub has_feedback: bool,
    pub long_form: bool,
    pub has_long_answer: bool,
    pub has_select: bool,
    pub has_all: bool,
    pub has_one: bool,
    pub select_all: bool,
    pub select_one: bool,
    pub has_binary: bool,
    pub has_email: bool,
    pub mentions_email: bool,
    pub has_phone: bool,
    pub has_name: bool,
    pub has_address: bool,
    pub has_url: bool,
    pub mentions_url: bool,
    pub has_rank: bool,
    pub has_importance: bool,
    pub rank_order: bool,
    pub has_agreement: bool,
    pub has_likert: bool,
    pub has_upload: bool,
    pub has_required: bool,
    pub has_optional: bool,
    pub word_count: usize,
}

pub fn extract_features(text: &str) -> FeatureSet {
    let has = |re: &Regex| re.is_match(text);

    FeatureSet {
        has_who: has(&WHO_RE),
        has_what: has(&WHAT_RE),
        has_when: has(&WHEN_RE),
        has_where: has(&WHERE_RE),
        has_why: has(&WHY_RE),
        has_how: has(&HOW_RE),
        has_which: has(&WHICH_RE),
        has_would: has(&WOULD_RE),
        has_prefer: has(&PREFER_RE),
        has_temporal: has(&TEMPORAL_RE),
        has_frequency: has(&FREQUENCY_RE),
        date_phrase: has(&DATE_PHRASE_RE),
        time_phrase: has(&TIME_PHRASE_RE),
        has_quantity: has(&QUANTITY_RE),
        has_numeric: has(&NUMERIC_RE),
        has_scale: has(&SCALE_RE),
        how_many: has(&HOW_MANY_RE),
        mentions_age: has(&AGE_RE),
        numeric_range: has(&RANGE_RE),
        slider_phrase: has(&SLIDER_RE),
        has_describe: has(&DESCRIBE_RE),
        has_opinion: has(&OPINION_RE),
        has_feedback: has(&FEEDBACK_RE),
        long_form: has(&LONG_FORM_RE),
        has_long_answer: has(&LONG_ANSWER_RE),
        has_select: has(&SELECT_RE),
        has_all: has(&ALL_RE),
        has_one: has(&ONE_RE),
        select_all: has(&SELECT_ALL_RE),
        select_one: has(&SELECT_ONE_RE),
        has_binary: has(&BINARY_RE),
        has_email: has(&EMAIL_RE),
        mentions_email: has(&EMAIL_MENTION_RE),
        has_phone: has(&PHONE_RE),
        has_name: has(&NAME_RE),
        has_address: has(&ADDRESS_RE),
        has_url: has(&URL_RE),
        mentions_url: has(&URL_MENTION_RE),
        has_rank: has(&RANK_RE),
        has_importance: has(&IMPORTANCE_RE),
        rank_order: has(&RANK_ORDER_RE),
        has_agreement: has(&AGREEMENT_RE),
        has_likert: has(&LIKERT_RE),
        has_upload: has(&UPLOAD_RE),
        has_required: text.contains('*') || has(&REQUIRED_RE),
        has_optional: has(&OPTIONAL_RE),
        word_count: text.split_whitespace().count(),
    }
}
