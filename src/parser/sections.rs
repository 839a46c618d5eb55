use super::lines::clean_section_title;
use crate::model::{MultilingualText, Question, Section};

#[derive(Debug)]
struct Pending {
    title: MultilingualText,
    order_index: usize,
    explicit: bool,
    questions: Vec<Question>,
}

/// Groups questions into ordered sections as boundaries are met.
///
/// Starts with a "General Questions" accumulator so questions that precede
/// any heading still land in a section.
#[derive(Debug)]
pub struct SectionSegmenter {
    sections: Vec<Section>,
    current: Pending,
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionSegmenter {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            current: Pending {
                title: MultilingualText::default_section(),
                order_index: 0,
                explicit: false,
                questions: Vec::new(),
            },
        }
    }

    pub fn emitted(&self) -> usize {
        self.sections.len()
    }

    pub fn pending_len(&self) -> usize {
        self.current.questions.len()
    }

    /// Appends with `order_index` = position in the current section.
    pub fn push_question(&mut self, mut question: Question) {
        question.order_index = self.current.questions.len();
        self.current.questions.push(question);
    }

    /// Close the current section and open one titled by `line`.
    ///
    /// An empty current section is kept only once an earlier section exists,
    /// so a heading right at the top does not leave an empty default behind.
    pub fn start_section(&mut self, line: &str) {
        if !self.current.questions.is_empty() || !self.sections.is_empty() {
            self.flush();
        }

        let title = clean_section_title(line);
        tracing::debug!(order = self.sections.len(), %title, "section");
        self.current = Pending {
            title: MultilingualText::replicate(&title),
            order_index: self.sections.len(),
            explicit: true,
            questions: Vec::new(),
        };
    }

    fn flush(&mut self) {
        let questions = std::mem::take(&mut self.current.questions);
        self.sections.push(Section {
            title: self.current.title.clone(),
            description: MultilingualText::empty(),
            order_index: self.current.order_index,
            questions,
        });
    }

    /// Completed sections plus whether questions only ever landed in the
    /// seeded default section.
    pub fn finish(mut self) -> (Vec<Section>, bool) {
        let default_only = !self.current.explicit
            && self.sections.is_empty()
            && !self.current.questions.is_empty();
        if !self.current.questions.is_empty() {
            self.flush();
        }
        (self.sections, default_only)
    }
}
