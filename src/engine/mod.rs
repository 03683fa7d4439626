mod inline;
mod session;

pub use inline::InlineCheck;
pub use session::{AnswerState, Feedback, QuizSession, RevealMode, Score, Selection};
