use questionnaire_parser::{
    parse_document, DegradedReason, Diagnostic, Document, ParseOutcome, Question, QuestionType,
};

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"))
}

fn parse(doc: Document) -> ParseOutcome {
    parse_document(&doc).unwrap()
}

fn kinds(questions: &[Question]) -> Vec<QuestionType> {
    questions.iter().map(|q| q.kind).collect()
}

fn values(q: &Question) -> Vec<&str> {
    q.options.iter().flatten().map(|o| o.value.as_str()).collect()
}

#[test]
fn sectioned_survey() {
    let outcome = parse(Document::from_text(fixture("sectioned_survey.txt")));

    let titles: Vec<&str> = outcome.sections.iter().map(|s| s.title.en.as_str()).collect();
    assert_eq!(titles, vec!["Section A: About You", "Section B: Your Visit"]);

    let about = &outcome.sections[0].questions;
    assert_eq!(
        kinds(about),
        vec![QuestionType::Text, QuestionType::Email, QuestionType::Number, QuestionType::Radio]
    );
    assert_eq!(values(&about[3]), vec!["female", "male", "prefer_not_to_say"]);

    let visit = &outcome.sections[1].questions;
    assert_eq!(
        kinds(visit),
        vec![QuestionType::Checkbox, QuestionType::Rating, QuestionType::Textarea, QuestionType::File]
    );
    assert_eq!(values(&visit[0]), vec!["restaurant", "spa", "gym", "other"]);
    let other = &visit[0].options.as_ref().unwrap()[3];
    assert!(other.allow_text);
    assert_eq!(other.label.en, "Other (please specify)");

    assert_eq!(values(&visit[1]), vec!["1", "2", "3", "4", "5"]);

    let numbers: Vec<Option<u32>> = outcome
        .sections
        .iter()
        .flat_map(|s| &s.questions)
        .map(|q| q.number)
        .collect();
    assert_eq!(numbers, (1..=8).map(Some).collect::<Vec<_>>());

    assert!(outcome.diagnostics.iter().all(|d| matches!(
        d,
        Diagnostic::Degraded { reason: DegradedReason::ScaleSynthesized, .. }
    )));
    assert_eq!(outcome.diagnostics.len(), 1);
}

#[test]
fn inline_scale_indicator_becomes_rating() {
    let outcome = parse(Document::from_text(fixture("rating_scale.txt")));
    assert_eq!(outcome.sections.len(), 1);
    assert_eq!(outcome.sections[0].title.en, "PART 1: SATISFACTION");

    let qs = &outcome.sections[0].questions;
    assert_eq!(qs[0].number, Some(1));
    assert_eq!(qs[0].kind, QuestionType::Rating);
    assert_eq!(values(&qs[0]), vec!["1", "2", "3", "4", "5"]);

    assert_eq!(qs[1].kind, QuestionType::Radio);
    assert_eq!(
        values(&qs[1]),
        vec!["strongly_agree", "agree", "neutral", "disagree", "strongly_disagree"]
    );
}

#[test]
fn unnumbered_prose_is_imported() {
    let outcome = parse(Document::from_text(fixture("unnumbered.txt")));
    assert_eq!(outcome.sections.len(), 1);
    let section = &outcome.sections[0];
    assert_eq!(section.title.en, "Imported Content");
    assert_eq!(section.title.sq, "Përmbajtje e Importuar");
    assert_eq!(section.title.sr, "Увезени садржај");
    assert_eq!(section.questions.len(), 3);
    assert!(section.questions.iter().all(|q| q.kind == QuestionType::Text && q.confidence == 0.3));
    assert_eq!(outcome.fallback_tier(), Some(2));
}

#[test]
fn markup_headings_open_sections() {
    let text = fixture("household.txt");

    let plain = parse(Document::from_text(text.clone()));
    assert_eq!(plain.sections.len(), 1);
    assert_eq!(plain.sections[0].title.en, "General Questions");
    assert_eq!(plain.sections[0].questions.len(), 3);

    let marked = parse(Document::from_text(text).with_markup(fixture("household.html")));
    let titles: Vec<&str> = marked.sections.iter().map(|s| s.title.en.as_str()).collect();
    assert_eq!(titles, vec!["Your Household", "Your Opinions"]);
    assert_eq!(
        kinds(&marked.sections[0].questions),
        vec![QuestionType::Number, QuestionType::Radio]
    );
    assert_eq!(values(&marked.sections[0].questions[1]), vec!["rent", "own"]);
    assert_eq!(marked.sections[1].questions[0].kind, QuestionType::Textarea);
    assert_eq!(marked.sections[1].questions[0].order_index, 0);
}

#[test]
fn summary_of_sectioned_survey() {
    let outcome = parse(Document::from_text(fixture("sectioned_survey.txt")));
    let summary = outcome.summary();
    assert_eq!(summary.sections, 2);
    assert_eq!(summary.questions, 8);
    assert_eq!(summary.question_types.len(), 8);
    assert_eq!(summary.question_types[&QuestionType::Radio], 1);
}
