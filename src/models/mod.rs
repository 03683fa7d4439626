mod question;
mod quiz;

pub use question::{Difficulty, MIN_OPTIONS, Question, QuestionId, QuestionRecord};
pub use quiz::Quiz;

/// Which screen the quiz view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Quiz,
    Result,
}
