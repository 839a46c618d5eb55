use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{QuestionType, Section};

/// Result of a successful parse: the section tree plus what went sideways.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub sections: Vec<Section>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    pub fn summary(&self) -> ParseSummary {
        ParseSummary::from_sections(&self.sections)
    }

    /// Fallback tier used, if any. Tier 2 wins over tier 1.
    pub fn fallback_tier(&self) -> Option<u8> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::Fallback { tier } => Some(*tier),
                _ => None,
            })
            .max()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Nothing usable, even after both fallback tiers.
    NoStructureDetected,
    Fallback { tier: u8 },
    Degraded { line: usize, reason: DegradedReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    MissingOptions,
    ScaleSynthesized,
    LowConfidence,
}

/// Per-document aggregate, the shape recorded alongside each import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseSummary {
    pub sections: usize,
    pub questions: usize,
    pub average_confidence: f64,
    pub question_types: BTreeMap<QuestionType, usize>,
}

impl ParseSummary {
    pub fn from_sections(sections: &[Section]) -> Self {
        let mut question_types = BTreeMap::new();
        let mut questions = 0;
        let mut confidence_total = 0.0;

        for q in sections.iter().flat_map(|s| &s.questions) {
            *question_types.entry(q.kind).or_insert(0) += 1;
            questions += 1;
            confidence_total += q.confidence;
        }

        let average_confidence = if questions == 0 {
            0.0
        } else {
            confidence_total / questions as f64
        };

        Self {
            sections: sections.len(),
            questions,
            average_confidence,
            question_types,
        }
    }
}
