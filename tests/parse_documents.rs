use std::collections::HashSet;

use questionnaire_parser::{
    explain_document, parse_document, parse_document_with, DegradedReason, Diagnostic, Document,
    ParseError, ParseOutcome, ParserConfig, Question, QuestionType,
};

fn parse(text: &str) -> ParseOutcome {
    parse_document(&Document::from_text(text)).unwrap()
}

fn only_question(outcome: &ParseOutcome) -> &Question {
    assert_eq!(outcome.sections.len(), 1);
    assert_eq!(outcome.sections[0].questions.len(), 1);
    &outcome.sections[0].questions[0]
}

fn option_values(q: &Question) -> Vec<&str> {
    q.options
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|o| o.value.as_str())
        .collect()
}

const DEMOGRAPHICS: &str = "Section A: Demographics\n\
1. What is your email address?\n\
2. Select all that apply:\n\
( ) Option X\n\
( ) Option Y";

#[test]
fn sectioned_email_and_two_option_radio() {
    let outcome = parse(DEMOGRAPHICS);
    assert_eq!(outcome.sections.len(), 1);
    let section = &outcome.sections[0];
    assert_eq!(section.title.en, "Section A: Demographics");
    assert_eq!(section.questions.len(), 2);

    let q1 = &section.questions[0];
    assert_eq!(q1.kind, QuestionType::Email);
    assert!(q1.options.is_none());
    assert_eq!(q1.number, Some(1));

    let q2 = &section.questions[1];
    assert_eq!(q2.kind, QuestionType::Radio);
    assert_eq!(option_values(q2), vec!["option_x", "option_y"]);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn two_option_rule_can_be_disabled() {
    let config = ParserConfig {
        two_option_radio: false,
        ..ParserConfig::default()
    };
    let outcome = parse_document_with(&Document::from_text(DEMOGRAPHICS), &config).unwrap();
    assert_eq!(outcome.sections[0].questions[1].kind, QuestionType::Checkbox);
}

#[test]
fn describe_prompt_is_textarea() {
    let outcome = parse("1. Please describe your experience.");
    let q = only_question(&outcome);
    assert_eq!(q.kind, QuestionType::Textarea);
    assert!(q.options.is_none());
    assert!((q.confidence - 0.7).abs() < 1e-9);
    assert_eq!(outcome.sections[0].title.en, "General Questions");
    assert!(outcome.diagnostics.contains(&Diagnostic::Fallback { tier: 1 }));
}

#[test]
fn how_many_is_number() {
    let outcome = parse("1. How many children do you have?");
    let q = only_question(&outcome);
    assert_eq!(q.kind, QuestionType::Number);
    assert!(q.options.is_none());
    assert_eq!(q.validation_rules.as_ref().and_then(|r| r.min), Some(0));
}

#[test]
fn upload_is_file() {
    let outcome = parse("1. Please upload your resume.");
    let q = only_question(&outcome);
    assert_eq!(q.kind, QuestionType::File);
    assert_eq!(q.confidence, 0.95);
}

#[test]
fn empty_input_is_an_error() {
    let err = parse_document(&Document::from_text(" \n \t")).unwrap_err();
    assert!(matches!(err, ParseError::InputEmpty));
}

#[test]
fn repeated_parses_are_identical() {
    let text = include_str!("fixtures/sectioned_survey.txt");
    let a = serde_json::to_string(&parse(text).sections).unwrap();
    let b = serde_json::to_string(&parse(text).sections).unwrap();
    assert_eq!(a, b);
}

#[test]
fn options_never_shared_between_questions() {
    let outcome = parse(
        "1. Pick one\n( ) Alpha\n( ) Beta\n2. Pick another\n( ) Gamma\n( ) Delta\n( ) Epsilon\n3. Select all that apply\n[ ] Zeta\n[ ] Eta",
    );
    let mut seen = HashSet::new();
    for q in outcome.sections.iter().flat_map(|s| &s.questions) {
        for value in option_values(q) {
            assert!(seen.insert(value.to_string()), "{value} assigned twice");
        }
    }
    assert_eq!(seen.len(), 7);
}

#[test]
fn order_indices_follow_position() {
    let outcome = parse(include_str!("fixtures/sectioned_survey.txt"));
    for (i, section) in outcome.sections.iter().enumerate() {
        assert_eq!(section.order_index, i);
        for (j, q) in section.questions.iter().enumerate() {
            assert_eq!(q.order_index, j);
        }
    }
}

#[test]
fn confidence_stays_in_range() {
    let outcome = parse(include_str!("fixtures/sectioned_survey.txt"));
    for q in outcome.sections.iter().flat_map(|s| &s.questions) {
        assert!(q.confidence > 0.0 && q.confidence <= 1.0, "{}", q.confidence);
        if q.kind != QuestionType::File {
            assert!(q.confidence <= 0.99);
        }
    }
}

#[test]
fn question_mark_lines_without_numbers() {
    let outcome = parse("Do you own a bicycle today?\nWhere do you usually park it?");
    assert_eq!(outcome.sections.len(), 1);
    let qs = &outcome.sections[0].questions;
    assert_eq!(qs.len(), 2);
    assert!(qs.iter().all(|q| q.number.is_none()));
}

#[test]
fn selection_without_options_is_reported() {
    let outcome = parse("1. Choose one of the following that best fits you");
    let q = only_question(&outcome);
    assert!(q.kind.is_selection());
    assert!(q.options.is_none());
    assert!(outcome.diagnostics.contains(&Diagnostic::Degraded {
        line: 0,
        reason: DegradedReason::MissingOptions,
    }));
}

#[test]
fn boilerplate_only_has_no_structure() {
    let outcome = parse("Thank you for your time\nQuestionnaire");
    assert!(outcome.sections.is_empty());
    assert_eq!(outcome.diagnostics, vec![Diagnostic::NoStructureDetected]);
}

#[test]
fn long_prose_fallback_is_capped() {
    let text = (1..=45)
        .map(|i| format!("Paragraph {i} talks about the project timeline and budget"))
        .collect::<Vec<_>>()
        .join("\n");
    let outcome = parse(&text);
    assert_eq!(outcome.sections.len(), 1);
    assert_eq!(outcome.sections[0].questions.len(), 20);
    assert_eq!(outcome.fallback_tier(), Some(2));
}

#[test]
fn long_fallback_lines_become_textarea() {
    let long = "word ".repeat(50);
    let outcome = parse(&format!("{}\nA short closing line here", long.trim()));
    let qs = &outcome.sections[0].questions;
    assert_eq!(qs[0].kind, QuestionType::Textarea);
    assert_eq!(qs[1].kind, QuestionType::Text);
    assert!(qs.iter().all(|q| q.confidence == 0.3));
}

#[test]
fn output_uses_contract_field_names() {
    let json = serde_json::to_value(parse(DEMOGRAPHICS).sections).unwrap();
    let q1 = &json[0]["questions"][0];
    assert_eq!(q1["type"], "email");
    assert_eq!(q1["order_index"], 0);
    assert!(q1["options"].is_null());
    assert_eq!(q1["validation_rules"]["pattern"], r"^[^\s@]+@[^\s@]+\.[^\s@]+$");
    assert_eq!(q1["help_text"]["en"], "");
    assert_eq!(q1["text"]["sr"], "What is your email address?");

    let q2 = &json[0]["questions"][1];
    assert_eq!(q2["options"][0]["allowText"], false);
    assert_eq!(q2["options"][1]["label"]["en"], "Option Y");
    assert!(q2["validation_rules"].is_null());
}

#[test]
fn explain_lists_every_question() {
    let doc = Document::from_text(DEMOGRAPHICS);
    let traces = explain_document(&doc, &ParserConfig::default()).unwrap();
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[1].line, 2);
    assert_eq!(traces[1].option_count, 2);
    assert_eq!(traces[1].classification.scores.get(QuestionType::Radio), 200);
    assert!(traces[1].classification.fired.contains(&"two_paren_options"));
}

#[test]
fn heading_only_document_falls_back_to_imported_content() {
    for text in [
        "GENERAL HEALTH AND WELLBEING\nHOUSEHOLD AND FAMILY BACKGROUND",
        "Section A: Demographics\nSection B: Household",
    ] {
        let outcome = parse(text);
        assert_eq!(outcome.sections.len(), 1, "{text}");
        assert_eq!(outcome.sections[0].questions.len(), 2, "{text}");
        assert_eq!(outcome.fallback_tier(), Some(2));
        assert!(!outcome.diagnostics.contains(&Diagnostic::NoStructureDetected));
    }
}

#[test]
fn rating_scale_not_borrowed_from_previous_question() {
    let outcome = parse("1. What is your age (18-25 only)?\n2. How would you rate our service?");
    let q2 = &outcome.sections[0].questions[1];
    assert_eq!(q2.kind, QuestionType::Rating);
    assert!(q2.options.is_none());
    assert!(outcome.diagnostics.contains(&Diagnostic::Degraded {
        line: 1,
        reason: DegradedReason::MissingOptions,
    }));
}

#[test]
fn rating_scale_not_borrowed_from_next_question() {
    let outcome = parse("1. How would you rate our service?\n2. How many hours (1-8) do you sleep?");
    let q1 = &outcome.sections[0].questions[0];
    assert_eq!(q1.kind, QuestionType::Rating);
    assert!(q1.options.is_none());
    assert!(!outcome.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::Degraded { reason: DegradedReason::ScaleSynthesized, .. }
    )));
}
