//! # course-quiz
//!
//! Quizzes, mock exams and inline comprehension checks for trade course
//! content, played in the terminal.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use course_quiz::{CourseQuiz, QuizError};
//!
//! fn main() -> Result<(), QuizError> {
//!     // Load a question bank from a JSON file
//!     let quiz = CourseQuiz::from_json("questions.json")?;
//!
//!     // Run the quiz in the terminal
//!     let score = quiz.run()?;
//!     println!("{}/{}", score.correct, score.total);
//!
//!     Ok(())
//! }
//! ```
//!
//! The engine can also be used without the terminal:
//!
//! ```rust
//! use course_quiz::{Question, QuestionId, Quiz, QuizSession};
//!
//! let question = Question::new(
//!     1,
//!     "What does COSHH stand for?",
//!     vec![
//!         "Control of Substances Harmful to Humans".into(),
//!         "Control of Substances Hazardous to Health".into(),
//!     ],
//!     1,
//!     "The COSHH Regulations 2002.",
//! )?;
//! let mut session = QuizSession::new(Quiz::new("Section 1", vec![question])?);
//!
//! session.select_answer(&QuestionId::Number(1), 1).unwrap();
//! assert_eq!(session.is_correct(&QuestionId::Number(1)), Some(true));
//! assert_eq!(session.score().correct, 1);
//! # Ok::<(), course_quiz::ContentError>(())
//! ```

mod app;
mod data;
mod engine;
mod error;
pub mod logging;
mod models;
pub mod terminal;
mod ui;

use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub use app::{App, CheckApp, ReviewFilter};
pub use data::{
    BankReport, DEFAULT_PASS_THRESHOLD, DEFAULT_QUESTIONS_PATH, Defect, DifficultyMix, ExamClock,
    MockExam, MockExamConfig, QuestionBank, RejectedQuestion, draw_balanced, draw_by_difficulty,
    format_remaining, load_bank, load_questions_from_json, parse_bank, validate_bank,
};
pub use engine::{AnswerState, Feedback, InlineCheck, QuizSession, RevealMode, Score, Selection};
pub use error::{ContentError, LoadError, QuizError, SelectError};
pub use models::{AppState, Difficulty, MIN_OPTIONS, Question, QuestionId, QuestionRecord, Quiz};

/// How often a timed exam checks its clock while waiting for input.
const TICK_RATE: Duration = Duration::from_millis(250);

fn fallback_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_else(|| "Quiz".to_string())
}

/// A quiz or mock exam that can be run in the terminal.
pub struct CourseQuiz {
    app: App,
}

impl CourseQuiz {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            app: App::with_session(QuizSession::new(quiz)),
        }
    }

    /// Load a quiz from a question bank file.
    ///
    /// Records that fail validation are left out and listed as unavailable
    /// on the welcome screen; the file only fails to load when it is
    /// unreadable or no valid question remains.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let path = path.as_ref();
        let bank = load_bank(path)?;
        let quiz = bank.to_quiz(&fallback_title(path))?;
        Ok(Self {
            app: App::with_session(QuizSession::new(quiz)).with_rejected(bank.rejected),
        })
    }

    /// Draw a mock exam from a bank file that carries an `exam` section.
    ///
    /// `seed` makes the draw reproducible; `question_limit` overrides the
    /// configured number of questions.
    pub fn exam_from_json<P: AsRef<Path>>(
        path: P,
        seed: Option<u64>,
        question_limit: Option<usize>,
    ) -> Result<Self, QuizError> {
        let path = path.as_ref();
        let bank = load_bank(path)?;

        let mut config = match (&bank.exam, &bank.exam_error) {
            (Some(config), _) => config.clone(),
            (None, Some(error)) => return Err(error.clone().into()),
            (None, None) => {
                return Err(ContentError::InvalidExam(format!(
                    "{} has no exam section",
                    path.display()
                ))
                .into());
            }
        };
        if let Some(limit) = question_limit {
            config.total_questions = limit;
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let exam = MockExam::draw(config, &bank.questions, &mut rng)?;

        Ok(Self {
            app: App::with_exam(exam, bank.questions, rng).with_rejected(bank.rejected),
        })
    }

    /// Run in the terminal until the user quits. Returns the final score.
    pub fn run(mut self) -> Result<Score, QuizError> {
        terminal::with_terminal(|term| run_event_loop(term, &mut self.app))?;
        Ok(self.app.score())
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

/// A single inline check that can be run in the terminal.
pub struct QuickCheck {
    app: CheckApp,
}

impl QuickCheck {
    pub fn new(question: Question) -> Self {
        Self {
            app: CheckApp::new(InlineCheck::new(question)),
        }
    }

    /// Pick question `id` out of a bank file.
    pub fn from_json<P: AsRef<Path>>(path: P, id: &QuestionId) -> Result<Self, QuizError> {
        let bank = load_bank(path)?;
        let question = bank
            .find(id)
            .cloned()
            .ok_or_else(|| QuizError::QuestionNotFound(id.to_string()))?;
        Ok(Self::new(question))
    }

    /// Run in the terminal. Returns whether the last answer was correct.
    pub fn run(mut self) -> Result<Option<bool>, QuizError> {
        terminal::with_terminal(|term| run_check_loop(term, &mut self.app))?;
        Ok(self.app.check().is_correct())
    }

    pub fn app(&self) -> &CheckApp {
        &self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        app.tick();
        terminal.draw(|frame| ui::render(frame, app))?;

        if app.is_timed() && !event::poll(TICK_RATE)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

fn run_check_loop(terminal: &mut terminal::AppTerminal, app: &mut CheckApp) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render_check(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_check_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    match app.state {
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter => {
            app.start_quiz();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            false
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.previous_question();
            false
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.next_question();
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.submit_answer();
            false
        }
        KeyCode::Char('f') => {
            app.toggle_flag();
            false
        }
        KeyCode::Char('n') => {
            app.next_flagged();
            false
        }
        KeyCode::Char('s') => {
            app.finish();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            false
        }
        KeyCode::Tab | KeyCode::Char('f') => {
            app.cycle_review_filter();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_check_input(app: &mut CheckApp, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.submit_answer();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.retry();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}
