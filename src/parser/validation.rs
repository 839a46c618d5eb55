use std::sync::LazyLock;

use regex::Regex;

use crate::model::{QuestionType, ValidationRules};

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*(?:to|-)\s*(\d+)").unwrap());
static WORDS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*words").unwrap());
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)email").unwrap());

pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub const URL_PATTERN: &str = r"^https?://";
pub const PHONE_PATTERN: &str = r"^[\d\s\-\+\(\)]+$";

const TEXT_MAX_LENGTH: usize = 500;
const TEXTAREA_MAX_LENGTH: usize = 5000;

/// `None` when the type carries no constraints.
pub fn build_rules(kind: QuestionType, text: &str) -> Option<ValidationRules> {
    let mut rules = ValidationRules::default();

    match kind {
        QuestionType::Number => {
            rules.min = Some(0);
            if let Some(caps) = RANGE_RE.captures(text) {
                if let (Ok(min), Ok(max)) = (caps[1].parse::<i64>(), caps[2].parse::<i64>()) {
                    rules.min = Some(min);
                    rules.max = Some(max);
                }
            }
        }
        QuestionType::Text => {
            rules.max_length = Some(TEXT_MAX_LENGTH);
            if EMAIL_RE.is_match(text) {
                rules.pattern = Some(EMAIL_PATTERN.to_string());
            }
        }
        QuestionType::Textarea => {
            rules.max_length = Some(TEXTAREA_MAX_LENGTH);
            rules.max_words = WORDS_RE.captures(text).and_then(|c| c[1].parse().ok());
        }
        QuestionType::Email => rules.pattern = Some(EMAIL_PATTERN.to_string()),
        QuestionType::Url => rules.pattern = Some(URL_PATTERN.to_string()),
        QuestionType::Phone => rules.pattern = Some(PHONE_PATTERN.to_string()),
        _ => {}
    }

    (!rules.is_empty()).then_some(rules)
}
