//! Single-question comprehension check embedded in article content.

use crate::error::SelectError;
use crate::models::{Question, Quiz};

use super::session::{AnswerState, Feedback, QuizSession, Score, Selection};

/// A one-question [`QuizSession`].
#[derive(Debug, Clone)]
pub struct InlineCheck {
    session: QuizSession,
}

impl InlineCheck {
    pub fn new(question: Question) -> Self {
        let title = question.id().to_string();
        Self {
            session: QuizSession::new(Quiz::single(title, question)),
        }
    }

    pub fn question(&self) -> &Question {
        &self.session.quiz().questions()[0]
    }

    pub fn state(&self) -> AnswerState {
        self.session.state_at(0)
    }

    pub fn select_answer(&mut self, option: usize) -> Result<Selection, SelectError> {
        self.session.select_at(0, option)
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.session.is_correct_at(0)
    }

    pub fn feedback(&self) -> Option<Feedback<'_>> {
        self.session.feedback_at(0)
    }

    pub fn score(&self) -> Score {
        self.session.score()
    }

    pub fn reset(&mut self) {
        self.session.reset_all();
    }
}
