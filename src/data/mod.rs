mod exam;
mod loader;
mod validate;

pub use exam::{
    DEFAULT_PASS_THRESHOLD, DifficultyMix, ExamClock, MockExam, MockExamConfig, draw_balanced,
    draw_by_difficulty, format_remaining,
};
pub use loader::{
    DEFAULT_QUESTIONS_PATH, QuestionBank, RejectedQuestion, load_bank, load_questions_from_json,
    parse_bank,
};
pub use validate::{BankReport, Defect, validate_bank};
