use std::collections::HashMap;

use crate::error::ContentError;
use crate::models::{Question, QuestionId};

/// An ordered, titled, non-empty set of questions with unique ids.
#[derive(Debug, Clone)]
pub struct Quiz {
    title: String,
    questions: Vec<Question>,
    positions: HashMap<QuestionId, usize>,
}

impl Quiz {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Result<Self, ContentError> {
        if questions.is_empty() {
            return Err(ContentError::EmptyQuiz);
        }

        let mut positions = HashMap::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            if positions.insert(question.id().clone(), index).is_some() {
                return Err(ContentError::DuplicateId(question.id().clone()));
            }
        }

        Ok(Self {
            title: title.into(),
            questions,
            positions,
        })
    }

    /// A one-question quiz; always valid.
    pub(crate) fn single(title: impl Into<String>, question: Question) -> Self {
        let positions = HashMap::from([(question.id().clone(), 0)]);
        Self {
            title: title.into(),
            questions: vec![question],
            positions,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; a `Quiz` cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.position(id).map(|index| &self.questions[index])
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.questions.iter().filter_map(Question::category) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}
