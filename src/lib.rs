//! Turns extracted document text into a questionnaire: sections, questions
//! with inferred input types, choice lists and confidence scores.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;

pub use config::ParserConfig;
pub use error::ParseError;
pub use model::{ChoiceOption, Document, MultilingualText, Question, QuestionType, Section, ValidationRules};
pub use parser::assemble::QuestionTrace;
pub use parser::{explain_document, parse_document, parse_document_with};
pub use report::{DegradedReason, Diagnostic, ParseOutcome, ParseSummary};
