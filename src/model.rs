use serde::{Deserialize, Serialize};

/// Already-extracted document text plus the optional rendered-markup side channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    #[serde(default)]
    pub markup: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }
}

/// Same source text under every locale key, awaiting external translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultilingualText {
    pub en: String,
    pub sq: String,
    pub sr: String,
}

impl MultilingualText {
    pub fn replicate(text: &str) -> Self {
        Self {
            en: text.to_string(),
            sq: text.to_string(),
            sr: text.to_string(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn localized(en: &str, sq: &str, sr: &str) -> Self {
        Self {
            en: en.to_string(),
            sq: sq.to_string(),
            sr: sr.to_string(),
        }
    }

    pub fn default_section() -> Self {
        Self::localized("General Questions", "Pyetje të Përgjithshme", "Општа питања")
    }

    pub fn imported_content() -> Self {
        Self::localized("Imported Content", "Përmbajtje e Importuar", "Увезени садржај")
    }
}

/// Closed set of input types.
///
/// Declaration order is part of the contract: equal classifier scores resolve
/// to the variant declared first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Email,
    Phone,
    Url,
    Date,
    Time,
    Number,
    Radio,
    Checkbox,
    Select,
    Rating,
    Slider,
    File,
}

impl QuestionType {
    pub const COUNT: usize = 14;

    pub const ALL: [QuestionType; Self::COUNT] = [
        QuestionType::Text,
        QuestionType::Textarea,
        QuestionType::Email,
        QuestionType::Phone,
        QuestionType::Url,
        QuestionType::Date,
        QuestionType::Time,
        QuestionType::Number,
        QuestionType::Radio,
        QuestionType::Checkbox,
        QuestionType::Select,
        QuestionType::Rating,
        QuestionType::Slider,
        QuestionType::File,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Types whose answers come from a choice list.
    pub fn is_selection(self) -> bool {
        matches!(
            self,
            QuestionType::Radio | QuestionType::Checkbox | QuestionType::Select | QuestionType::Rating
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Textarea => "textarea",
            QuestionType::Email => "email",
            QuestionType::Phone => "phone",
            QuestionType::Url => "url",
            QuestionType::Date => "date",
            QuestionType::Time => "time",
            QuestionType::Number => "number",
            QuestionType::Radio => "radio",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Select => "select",
            QuestionType::Rating => "rating",
            QuestionType::Slider => "slider",
            QuestionType::File => "file",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: MultilingualText,
    #[serde(rename = "allowText")]
    pub allow_text: bool,
}

/// Keys mirror what form renderers consume: `min`, `max`, `maxLength`, `maxWords`, `pattern`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub number: Option<u32>,
    pub text: MultilingualText,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: Option<Vec<ChoiceOption>>,
    pub required: bool,
    pub order_index: usize,
    pub validation_rules: Option<ValidationRules>,
    pub help_text: MultilingualText,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: MultilingualText,
    pub description: MultilingualText,
    pub order_index: usize,
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_order_matches_all_table() {
        for (i, kind) in QuestionType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert!(QuestionType::Text < QuestionType::File);
    }

    #[test]
    fn question_serializes_with_contract_field_names() {
        let q = Question {
            number: Some(1),
            text: MultilingualText::replicate("Pick one"),
            kind: QuestionType::Radio,
            options: Some(vec![ChoiceOption {
                value: "other".into(),
                label: MultilingualText::replicate("Other (please specify)"),
                allow_text: true,
            }]),
            required: false,
            order_index: 0,
            validation_rules: None,
            help_text: MultilingualText::empty(),
            confidence: 0.5,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "radio");
        assert_eq!(json["options"][0]["allowText"], true);
        assert_eq!(json["text"]["sq"], "Pick one");
        assert!(json["validation_rules"].is_null());
        assert!(json.get("order_index").is_some());
        assert!(json.get("help_text").is_some());
    }

    #[test]
    fn validation_rules_omit_absent_keys() {
        let rules = ValidationRules {
            max_length: Some(500),
            ..ValidationRules::default()
        };
        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(json, r#"{"maxLength":500}"#);
    }
}
