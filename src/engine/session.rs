//! Answer tracking and scoring for a quiz.
//!
//! Each question moves from [`AnswerState::Unanswered`] to
//! [`AnswerState::Answered`] once. The first answer is locked in: picking
//! the same option again is a no-op, picking a different one is refused
//! with [`SelectError::Locked`]. [`QuizSession::reset`] and
//! [`QuizSession::reset_all`] start a question or the whole quiz over.

use tracing::debug;

use crate::error::SelectError;
use crate::models::{Question, QuestionId, Quiz};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerState {
    #[default]
    Unanswered,
    Answered(usize),
}

impl AnswerState {
    pub fn selected(self) -> Option<usize> {
        match self {
            AnswerState::Unanswered => None,
            AnswerState::Answered(index) => Some(index),
        }
    }

    pub fn is_answered(self) -> bool {
        matches!(self, AnswerState::Answered(_))
    }
}

/// When correctness is shown to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealMode {
    /// Right after each answer, as on course pages.
    #[default]
    Immediate,
    /// Only on the results screen, as in mock exams.
    OnFinish,
}

/// Result of a successful `select_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Recorded,
    /// The same option was already selected; nothing changed.
    Unchanged,
}

/// What the learner sees after answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback<'a> {
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

impl Score {
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.correct as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Whether the score reaches `threshold` percent.
    pub fn passed(&self, threshold: u8) -> bool {
        self.correct * 100 >= usize::from(threshold) * self.total
    }

    fn add(&mut self, state: AnswerState, question: &Question) {
        self.total += 1;
        if let AnswerState::Answered(selected) = state {
            self.answered += 1;
            if question.is_correct_option(selected) {
                self.correct += 1;
            }
        }
    }
}

/// One learner's attempt at a quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    answers: Vec<AnswerState>,
    reveal: RevealMode,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        let answers = vec![AnswerState::Unanswered; quiz.len()];
        Self {
            quiz,
            answers,
            reveal: RevealMode::Immediate,
        }
    }

    pub fn with_reveal(mut self, reveal: RevealMode) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn reveal_mode(&self) -> RevealMode {
        self.reveal
    }

    pub fn answers(&self) -> &[AnswerState] {
        &self.answers
    }

    pub fn answer_state(&self, id: &QuestionId) -> Option<AnswerState> {
        self.quiz.position(id).map(|index| self.answers[index])
    }

    pub fn state_at(&self, index: usize) -> AnswerState {
        self.answers.get(index).copied().unwrap_or_default()
    }

    /// Record `option` as the answer to question `id`.
    pub fn select_answer(&mut self, id: &QuestionId, option: usize) -> Result<Selection, SelectError> {
        let index = self
            .quiz
            .position(id)
            .ok_or_else(|| SelectError::UnknownQuestion(id.clone()))?;
        self.record(index, option)
    }

    /// Like [`select_answer`](Self::select_answer) but addressed by position.
    pub fn select_at(&mut self, index: usize, option: usize) -> Result<Selection, SelectError> {
        if index >= self.quiz.len() {
            return Err(SelectError::PositionOutOfRange {
                index,
                len: self.quiz.len(),
            });
        }
        self.record(index, option)
    }

    fn record(&mut self, index: usize, option: usize) -> Result<Selection, SelectError> {
        let question = &self.quiz.questions()[index];

        if !question.has_option(option) {
            return Err(SelectError::OptionOutOfRange {
                id: question.id().clone(),
                index: option,
                len: question.options().len(),
            });
        }

        match self.answers[index] {
            AnswerState::Answered(selected) if selected == option => Ok(Selection::Unchanged),
            AnswerState::Answered(selected) => {
                debug!(question = %question.id(), selected, attempted = option, "answer locked");
                Err(SelectError::Locked {
                    id: question.id().clone(),
                    selected,
                })
            }
            AnswerState::Unanswered => {
                self.answers[index] = AnswerState::Answered(option);
                debug!(
                    question = %question.id(),
                    option,
                    correct = question.is_correct_option(option),
                    "answer recorded"
                );
                Ok(Selection::Recorded)
            }
        }
    }

    /// `None` while unanswered or when `id` is not in the quiz.
    pub fn is_correct(&self, id: &QuestionId) -> Option<bool> {
        self.quiz.position(id).and_then(|index| self.is_correct_at(index))
    }

    pub fn is_correct_at(&self, index: usize) -> Option<bool> {
        let question = self.quiz.questions().get(index)?;
        self.state_at(index)
            .selected()
            .map(|selected| question.is_correct_option(selected))
    }

    pub fn feedback(&self, id: &QuestionId) -> Option<Feedback<'_>> {
        self.quiz.position(id).and_then(|index| self.feedback_at(index))
    }

    pub fn feedback_at(&self, index: usize) -> Option<Feedback<'_>> {
        let question = self.quiz.questions().get(index)?;
        let selected = self.state_at(index).selected()?;
        Some(Feedback {
            selected,
            correct_index: question.correct_index(),
            is_correct: question.is_correct_option(selected),
            explanation: question.explanation(),
        })
    }

    pub fn score(&self) -> Score {
        self.quiz
            .questions()
            .iter()
            .zip(self.answers.iter())
            .fold(Score::default(), |mut score, (question, state)| {
                score.add(*state, question);
                score
            })
    }

    /// Scores per category, in the quiz's category order. Questions with no
    /// category are left out.
    pub fn category_scores(&self) -> Vec<(String, Score)> {
        self.quiz
            .categories()
            .into_iter()
            .map(|category| {
                let score = self
                    .quiz
                    .questions()
                    .iter()
                    .zip(self.answers.iter())
                    .filter(|(question, _)| question.category() == Some(category))
                    .fold(Score::default(), |mut score, (question, state)| {
                        score.add(*state, question);
                        score
                    });
                (category.to_string(), score)
            })
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|state| state.is_answered()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(|state| state.is_answered())
    }

    /// Return question `id` to unanswered. Returns false for unknown ids.
    pub fn reset(&mut self, id: &QuestionId) -> bool {
        match self.quiz.position(id) {
            Some(index) => {
                self.answers[index] = AnswerState::Unanswered;
                debug!(question = %id, "answer reset");
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&mut self) {
        self.answers.fill(AnswerState::Unanswered);
        debug!(quiz = self.quiz.title(), "all answers reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64, option_count: usize, correct: usize) -> Question {
        let options = (0..option_count).map(|i| format!("Option {}", i)).collect();
        Question::new(id, format!("Question {}", id), options, correct, format!("Because {}", id))
            .unwrap()
    }

    fn session(questions: Vec<Question>) -> QuizSession {
        QuizSession::new(Quiz::new("Knowledge Check", questions).unwrap())
    }

    fn id(n: u64) -> QuestionId {
        QuestionId::Number(n)
    }

    #[test]
    fn test_fresh_session_is_unanswered() {
        let s = session(vec![question(1, 4, 2), question(2, 4, 0)]);
        assert_eq!(s.is_correct(&id(1)), None);
        assert_eq!(s.is_correct(&id(2)), None);
        assert_eq!(s.answer_state(&id(1)), Some(AnswerState::Unanswered));
        assert!(s.feedback(&id(1)).is_none());
        assert_eq!(s.score(), Score { correct: 0, answered: 0, total: 2 });
    }

    #[test]
    fn test_single_question_correct() {
        let mut s = session(vec![question(1, 4, 2)]);
        assert_eq!(s.select_answer(&id(1), 2), Ok(Selection::Recorded));
        assert_eq!(s.is_correct(&id(1)), Some(true));
        let score = s.score();
        assert_eq!((score.correct, score.total), (1, 1));
    }

    #[test]
    fn test_single_question_incorrect() {
        let mut s = session(vec![question(1, 4, 2)]);
        s.select_answer(&id(1), 0).unwrap();
        assert_eq!(s.is_correct(&id(1)), Some(false));
        let score = s.score();
        assert_eq!((score.correct, score.total), (0, 1));
    }

    #[test]
    fn test_mixed_answers_with_unanswered() {
        let mut s = session(vec![question(1, 4, 1), question(2, 4, 3), question(3, 4, 0)]);
        s.select_answer(&id(1), 1).unwrap();
        s.select_answer(&id(2), 0).unwrap();

        let score = s.score();
        assert_eq!((score.correct, score.total), (1, 3));
        assert_eq!(score.answered, 2);
        assert_eq!(s.is_correct(&id(3)), None);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_first_answer_is_locked() {
        let mut s = session(vec![question(1, 4, 2)]);
        s.select_answer(&id(1), 0).unwrap();

        assert_eq!(s.select_answer(&id(1), 0), Ok(Selection::Unchanged));
        assert_eq!(
            s.select_answer(&id(1), 2),
            Err(SelectError::Locked { id: id(1), selected: 0 })
        );
        assert_eq!(s.answer_state(&id(1)), Some(AnswerState::Answered(0)));
        assert_eq!(s.is_correct(&id(1)), Some(false));
    }

    #[test]
    fn test_invalid_selection_leaves_state() {
        let mut s = session(vec![question(1, 2, 1)]);
        assert_eq!(
            s.select_answer(&id(1), 2),
            Err(SelectError::OptionOutOfRange { id: id(1), index: 2, len: 2 })
        );
        assert_eq!(
            s.select_answer(&id(9), 0),
            Err(SelectError::UnknownQuestion(id(9)))
        );
        assert_eq!(s.answered_count(), 0);
        assert_eq!(
            s.select_at(5, 0),
            Err(SelectError::PositionOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_feedback_reveals_explanation_either_way() {
        let mut s = session(vec![question(1, 4, 2), question(2, 4, 1)]);
        s.select_answer(&id(1), 2).unwrap();
        s.select_answer(&id(2), 3).unwrap();

        let right = s.feedback(&id(1)).unwrap();
        assert!(right.is_correct);
        assert_eq!(right.explanation, "Because 1");

        let wrong = s.feedback(&id(2)).unwrap();
        assert!(!wrong.is_correct);
        assert_eq!(wrong.selected, 3);
        assert_eq!(wrong.correct_index, 1);
        assert_eq!(wrong.explanation, "Because 2");
    }

    #[test]
    fn test_reset_allows_retry() {
        let mut s = session(vec![question(1, 4, 2), question(2, 4, 0)]);
        s.select_answer(&id(1), 0).unwrap();
        s.select_answer(&id(2), 0).unwrap();

        assert!(s.reset(&id(1)));
        assert!(!s.reset(&id(7)));
        assert_eq!(s.select_answer(&id(1), 2), Ok(Selection::Recorded));
        assert_eq!(s.score().correct, 2);

        s.reset_all();
        assert_eq!(s.answered_count(), 0);
        assert_eq!(s.score().correct, 0);
    }

    #[test]
    fn test_pass_threshold() {
        let score = Score { correct: 16, answered: 20, total: 20 };
        assert!(score.passed(80));
        assert!(!score.passed(81));
        assert_eq!(score.percentage(), 80.0);

        let empty = Score::default();
        assert_eq!(empty.percentage(), 0.0);
    }

    #[test]
    fn test_category_scores() {
        let questions = vec![
            question(1, 4, 0).with_category("PPE"),
            question(2, 4, 0).with_category("Legislation"),
            question(3, 4, 0).with_category("PPE"),
            question(4, 4, 0),
        ];
        let mut s = session(questions);
        s.select_answer(&id(1), 0).unwrap();
        s.select_answer(&id(3), 1).unwrap();
        s.select_answer(&id(2), 0).unwrap();

        let scores = s.category_scores();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].0, "PPE");
        assert_eq!(scores[0].1, Score { correct: 1, answered: 2, total: 2 });
        assert_eq!(scores[1].0, "Legislation");
        assert_eq!(scores[1].1, Score { correct: 1, answered: 1, total: 1 });
    }
}
