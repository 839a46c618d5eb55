pub mod assemble;
pub mod classify;
pub mod context;
pub mod features;
pub mod lines;
pub mod markup;
pub mod options;
pub mod sections;
pub mod validation;

use tracing::info;

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::model::Document;
use crate::report::ParseOutcome;
use assemble::{Assembly, QuestionTrace};
use lines::LineTable;
use markup::MarkupHints;

/// Three-pass pipeline: text → tagged lines → classified questions → sections.
pub fn parse_document(doc: &Document) -> Result<ParseOutcome, ParseError> {
    parse_document_with(doc, &ParserConfig::default())
}

pub fn parse_document_with(doc: &Document, config: &ParserConfig) -> Result<ParseOutcome, ParseError> {
    let assembly = run(doc, config)?;
    let outcome = ParseOutcome {
        sections: assembly.sections,
        diagnostics: assembly.diagnostics,
    };

    info!(
        sections = outcome.sections.len(),
        questions = outcome.question_count(),
        diagnostics = outcome.diagnostics.len(),
        "parsed document"
    );
    Ok(outcome)
}

/// Per-question scoring trace for the same parse `parse_document_with` does.
pub fn explain_document(doc: &Document, config: &ParserConfig) -> Result<Vec<QuestionTrace>, ParseError> {
    Ok(run(doc, config)?.traces)
}

fn run(doc: &Document, config: &ParserConfig) -> Result<Assembly, ParseError> {
    if doc.text.trim().is_empty() {
        return Err(ParseError::InputEmpty);
    }

    let hints = MarkupHints::from_markup(doc.markup.as_deref());
    let mut table = LineTable::build(&doc.text, &hints, config);
    tracing::debug!(lines = table.len(), emphasized = hints.len(), "tagged lines");

    Ok(assemble::assemble(&mut table, config))
}
