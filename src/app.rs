use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::data::{ExamClock, MockExam, MockExamConfig, RejectedQuestion};
use crate::engine::{InlineCheck, QuizSession, RevealMode, Score};
use crate::models::{AppState, Question};

/// A mock exam in progress, with what is needed to redraw it on retry.
struct ExamRun {
    config: MockExamConfig,
    bank: Vec<Question>,
    rng: StdRng,
    clock: Option<ExamClock>,
}

/// Which questions the results breakdown lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    All,
    Correct,
    Incorrect,
    Unanswered,
    Flagged,
}

impl ReviewFilter {
    pub fn next(self) -> Self {
        match self {
            ReviewFilter::All => ReviewFilter::Correct,
            ReviewFilter::Correct => ReviewFilter::Incorrect,
            ReviewFilter::Incorrect => ReviewFilter::Unanswered,
            ReviewFilter::Unanswered => ReviewFilter::Flagged,
            ReviewFilter::Flagged => ReviewFilter::All,
        }
    }
}

impl fmt::Display for ReviewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReviewFilter::All => "all",
            ReviewFilter::Correct => "correct",
            ReviewFilter::Incorrect => "incorrect",
            ReviewFilter::Unanswered => "unanswered",
            ReviewFilter::Flagged => "flagged",
        };
        f.write_str(label)
    }
}

/// State behind the quiz screens.
pub struct App {
    pub state: AppState,
    session: QuizSession,
    current_question_index: usize,
    selected_option: usize,
    result_scroll: usize,
    review_filter: ReviewFilter,
    flagged: BTreeSet<usize>,
    exam: Option<ExamRun>,
    rejected: Vec<RejectedQuestion>,
}

impl App {
    pub fn with_session(session: QuizSession) -> Self {
        Self {
            state: AppState::Welcome,
            session,
            current_question_index: 0,
            selected_option: 0,
            result_scroll: 0,
            review_filter: ReviewFilter::All,
            flagged: BTreeSet::new(),
            exam: None,
            rejected: Vec::new(),
        }
    }

    /// Exam mode: answers are revealed on the results screen only, and
    /// retry draws a fresh set of questions from `bank`.
    pub fn with_exam(exam: MockExam, bank: Vec<Question>, rng: StdRng) -> Self {
        let session = QuizSession::new(exam.quiz).with_reveal(RevealMode::OnFinish);
        let mut app = Self::with_session(session);
        app.exam = Some(ExamRun {
            config: exam.config,
            bank,
            rng,
            clock: None,
        });
        app
    }

    /// Records that failed to load, shown as unavailable.
    pub fn with_rejected(mut self, rejected: Vec<RejectedQuestion>) -> Self {
        self.rejected = rejected;
        self
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn title(&self) -> &str {
        self.session.quiz().title()
    }

    pub fn rejected(&self) -> &[RejectedQuestion] {
        &self.rejected
    }

    pub fn exam_config(&self) -> Option<&MockExamConfig> {
        self.exam.as_ref().map(|exam| &exam.config)
    }

    pub fn pass_threshold(&self) -> Option<u8> {
        self.exam_config().map(|config| config.pass_threshold)
    }

    pub fn remaining_time(&self) -> Option<Duration> {
        self.exam
            .as_ref()
            .and_then(|exam| exam.clock.as_ref())
            .map(ExamClock::remaining)
    }

    pub fn is_timed(&self) -> bool {
        self.exam_config().and_then(MockExamConfig::time_limit).is_some()
    }

    pub fn current_question(&self) -> &Question {
        &self.session.quiz().questions()[self.current_question_index]
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question_number(&self) -> usize {
        self.current_question_index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.session.quiz().len()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn score(&self) -> Score {
        self.session.score()
    }

    pub fn review_filter(&self) -> ReviewFilter {
        self.review_filter
    }

    pub fn is_flagged(&self, index: usize) -> bool {
        self.flagged.contains(&index)
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged.len()
    }

    /// Whether correctness of question `index` may be shown right now.
    pub fn is_revealed(&self, index: usize) -> bool {
        match self.session.reveal_mode() {
            RevealMode::Immediate => self.session.state_at(index).is_answered(),
            RevealMode::OnFinish => self.state == AppState::Result,
        }
    }

    fn option_count(&self) -> usize {
        self.current_question().options().len()
    }

    pub fn select_next_option(&mut self) {
        self.selected_option = (self.selected_option + 1) % self.option_count();
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        self.selected_option = (self.selected_option + count - 1) % count;
    }

    pub fn start_quiz(&mut self) {
        if let Some(exam) = &mut self.exam {
            exam.clock = exam.config.time_limit().map(ExamClock::start);
        }
        self.state = AppState::Quiz;
    }

    /// Enter on the quiz screen: answer the current question, or move on
    /// once it has been answered.
    pub fn submit_answer(&mut self) {
        let index = self.current_question_index;

        if self.session.state_at(index).is_answered() {
            self.advance();
            return;
        }

        if let Err(err) = self.session.select_at(index, self.selected_option) {
            warn!(error = %err, "selection refused");
            return;
        }

        if self.session.reveal_mode() == RevealMode::OnFinish {
            self.advance();
        }
    }

    /// Move past the current question. A quiz finishes after its last
    /// question; an exam only finishes on `finish` or when time runs out,
    /// so from the last question it goes back to the first one unanswered.
    fn advance(&mut self) {
        let next = self.current_question_index + 1;
        if next < self.total_questions() {
            self.go_to(next);
            return;
        }

        match self.session.reveal_mode() {
            RevealMode::Immediate => self.finish(),
            RevealMode::OnFinish => {
                if let Some(index) = self.first_unanswered() {
                    self.go_to(index);
                }
            }
        }
    }

    fn first_unanswered(&self) -> Option<usize> {
        self.session
            .answers()
            .iter()
            .position(|state| !state.is_answered())
    }

    /// Flag or unflag the current question for review.
    pub fn toggle_flag(&mut self) {
        let index = self.current_question_index;
        if !self.flagged.remove(&index) {
            self.flagged.insert(index);
        }
    }

    /// Jump to the next flagged question, wrapping to the first.
    pub fn next_flagged(&mut self) {
        let current = self.current_question_index;
        let target = self
            .flagged
            .range(current + 1..)
            .next()
            .or_else(|| self.flagged.iter().next())
            .copied();
        if let Some(index) = target {
            self.go_to(index);
        }
    }

    pub fn next_question(&mut self) {
        if self.current_question_index + 1 < self.total_questions() {
            self.go_to(self.current_question_index + 1);
        }
    }

    pub fn previous_question(&mut self) {
        if self.current_question_index > 0 {
            self.go_to(self.current_question_index - 1);
        }
    }

    fn go_to(&mut self, index: usize) {
        self.current_question_index = index;
        self.selected_option = self.session.state_at(index).selected().unwrap_or(0);
    }

    pub fn finish(&mut self) {
        let score = self.session.score();
        info!(
            quiz = self.title(),
            correct = score.correct,
            answered = score.answered,
            total = score.total,
            "quiz finished"
        );
        self.result_scroll = 0;
        self.review_filter = ReviewFilter::All;
        self.state = AppState::Result;
    }

    /// Called between key presses. Ends a timed exam once time is up;
    /// returns true when that happened.
    pub fn tick(&mut self) -> bool {
        let expired = self
            .exam
            .as_ref()
            .and_then(|exam| exam.clock.as_ref())
            .is_some_and(ExamClock::is_expired);

        if expired && self.state == AppState::Quiz {
            info!("exam time is up");
            self.finish();
            return true;
        }
        false
    }

    /// Positions of the questions the results breakdown lists.
    pub fn review_indices(&self) -> Vec<usize> {
        (0..self.total_questions())
            .filter(|&index| match self.review_filter {
                ReviewFilter::All => true,
                ReviewFilter::Correct => self.session.is_correct_at(index) == Some(true),
                ReviewFilter::Incorrect => self.session.is_correct_at(index) == Some(false),
                ReviewFilter::Unanswered => self.session.is_correct_at(index).is_none(),
                ReviewFilter::Flagged => self.is_flagged(index),
            })
            .collect()
    }

    pub fn cycle_review_filter(&mut self) {
        self.review_filter = self.review_filter.next();
        self.result_scroll = 0;
    }

    /// Lines in the results breakdown, used to bound scrolling.
    fn result_line_count(&self) -> usize {
        let categories = self.session.category_scores().len();
        let category_lines = if categories > 0 { categories + 2 } else { 0 };
        1 + self.review_indices().len().max(1) + category_lines
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.result_line_count().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn restart(&mut self) {
        if let Some(exam) = &mut self.exam {
            match MockExam::draw(exam.config.clone(), &exam.bank, &mut exam.rng) {
                Ok(redrawn) => {
                    self.session = QuizSession::new(redrawn.quiz).with_reveal(RevealMode::OnFinish);
                }
                Err(err) => {
                    warn!(error = %err, "could not redraw exam, reusing questions");
                    self.session.reset_all();
                }
            }
            exam.clock = None;
        } else {
            self.session.reset_all();
        }

        self.state = AppState::Welcome;
        self.current_question_index = 0;
        self.selected_option = 0;
        self.result_scroll = 0;
        self.review_filter = ReviewFilter::All;
        self.flagged.clear();
    }
}

/// State behind the inline check screen.
pub struct CheckApp {
    check: InlineCheck,
    selected_option: usize,
}

impl CheckApp {
    pub fn new(check: InlineCheck) -> Self {
        Self {
            check,
            selected_option: 0,
        }
    }

    pub fn check(&self) -> &InlineCheck {
        &self.check
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn select_next_option(&mut self) {
        let count = self.check.question().options().len();
        self.selected_option = (self.selected_option + 1) % count;
    }

    pub fn select_previous_option(&mut self) {
        let count = self.check.question().options().len();
        self.selected_option = (self.selected_option + count - 1) % count;
    }

    pub fn submit_answer(&mut self) {
        if let Err(err) = self.check.select_answer(self.selected_option) {
            warn!(error = %err, "selection refused");
        }
    }

    pub fn retry(&mut self) {
        self.check.reset();
        self.selected_option = 0;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rand::SeedableRng;

    use super::*;
    use crate::models::Quiz;

    fn question(id: u64, correct: usize) -> Question {
        Question::new(
            id,
            format!("Question {}", id),
            vec!["A".into(), "B".into(), "C".into()],
            correct,
            "",
        )
        .unwrap()
    }

    fn app() -> App {
        let quiz = Quiz::new("Section 1", vec![question(1, 1), question(2, 2)]).unwrap();
        App::with_session(QuizSession::new(quiz))
    }

    fn exam_app(time_limit: Option<u64>) -> App {
        let bank: Vec<Question> = (1..=6).map(|id| question(id, 0)).collect();
        let config = MockExamConfig {
            exam_id: "mock".into(),
            exam_title: "Mock".into(),
            total_questions: 3,
            time_limit,
            pass_threshold: 80,
            categories: Vec::new(),
            difficulty_mix: None,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let exam = MockExam::draw(config, &bank, &mut rng).unwrap();
        App::with_exam(exam, bank, rng)
    }

    #[test]
    fn test_option_cursor_wraps_by_option_count() {
        let mut app = app();
        app.start_quiz();
        app.select_previous_option();
        assert_eq!(app.selected_option(), 2);
        app.select_next_option();
        assert_eq!(app.selected_option(), 0);
    }

    #[test]
    fn test_answer_reveals_then_advances() {
        let mut app = app();
        app.start_quiz();
        app.select_next_option();
        app.submit_answer();

        assert_eq!(app.current_question_number(), 1);
        assert!(app.is_revealed(0));
        assert_eq!(app.session().is_correct_at(0), Some(true));

        app.submit_answer();
        assert_eq!(app.current_question_number(), 2);
        assert!(!app.is_revealed(1));

        app.submit_answer();
        app.submit_answer();
        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.score().correct, 1);
    }

    #[test]
    fn test_browsing_keeps_locked_answer() {
        let mut app = app();
        app.start_quiz();
        app.submit_answer();
        app.next_question();
        app.previous_question();
        assert_eq!(app.selected_option(), 0);

        app.select_next_option();
        app.submit_answer();
        assert_eq!(app.session().state_at(0).selected(), Some(0));
        assert_eq!(app.current_question_number(), 2);
    }

    #[test]
    fn test_restart_clears_answers() {
        let mut app = app();
        app.start_quiz();
        app.submit_answer();
        app.finish();
        app.restart();

        assert_eq!(app.state, AppState::Welcome);
        assert_eq!(app.session().answered_count(), 0);
        assert_eq!(app.current_question_number(), 1);
    }

    #[test]
    fn test_exam_hides_feedback_until_results() {
        let mut app = exam_app(None);
        app.start_quiz();
        app.submit_answer();

        assert_eq!(app.current_question_number(), 2);
        assert!(!app.is_revealed(0));

        app.submit_answer();
        app.submit_answer();
        assert_eq!(app.state, AppState::Quiz);
        assert!(app.session().is_complete());

        app.finish();
        assert_eq!(app.state, AppState::Result);
        assert!(app.is_revealed(0));
        assert_eq!(app.score().correct, 3);
        assert_eq!(app.pass_threshold(), Some(80));
    }

    #[test]
    fn test_exam_last_question_returns_to_skipped() {
        let mut app = exam_app(None);
        app.start_quiz();
        app.next_question();
        app.next_question();
        app.submit_answer();

        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.current_question_number(), 1);
        assert_eq!(app.score().answered, 1);

        app.submit_answer();
        assert_eq!(app.current_question_number(), 2);
        app.submit_answer();
        assert_eq!(app.current_question_number(), 3);
        assert_eq!(app.state, AppState::Quiz);
    }

    #[test]
    fn test_exam_ends_when_time_runs_out() {
        let mut app = exam_app(Some(600));
        app.start_quiz();
        if let Some(exam) = &mut app.exam {
            let start = Instant::now() - Duration::from_secs(5);
            exam.clock = Some(ExamClock::started_at(start, Duration::from_secs(1)));
        }

        assert!(app.tick());
        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.remaining_time(), Some(Duration::ZERO));

        let score = app.score();
        assert_eq!((score.correct, score.answered, score.total), (0, 0, 3));
        assert!(!app.tick());
    }

    #[test]
    fn test_flags_and_next_flagged() {
        let mut app = exam_app(None);
        app.start_quiz();
        app.toggle_flag();
        app.next_question();
        app.next_question();
        app.toggle_flag();
        assert_eq!(app.flagged_count(), 2);

        app.next_flagged();
        assert_eq!(app.current_question_number(), 1);
        app.next_flagged();
        assert_eq!(app.current_question_number(), 3);

        app.toggle_flag();
        assert!(!app.is_flagged(2));
        app.restart();
        assert_eq!(app.flagged_count(), 0);
    }

    #[test]
    fn test_review_filter() {
        let quiz = Quiz::new(
            "Section 1",
            vec![question(1, 0), question(2, 0), question(3, 0)],
        )
        .unwrap();
        let mut app = App::with_session(QuizSession::new(quiz));
        app.start_quiz();
        app.toggle_flag();
        app.submit_answer();
        app.submit_answer();
        app.select_next_option();
        app.submit_answer();
        app.finish();

        assert_eq!(app.review_indices(), vec![0, 1, 2]);
        app.cycle_review_filter();
        assert_eq!(app.review_filter(), ReviewFilter::Correct);
        assert_eq!(app.review_indices(), vec![0]);
        app.cycle_review_filter();
        assert_eq!(app.review_indices(), vec![1]);
        app.cycle_review_filter();
        assert_eq!(app.review_indices(), vec![2]);
        app.cycle_review_filter();
        assert_eq!(app.review_indices(), vec![0]);
        app.cycle_review_filter();
        assert_eq!(app.review_filter(), ReviewFilter::All);
    }

    #[test]
    fn test_exam_restart_redraws() {
        let mut app = exam_app(Some(600));
        app.start_quiz();
        assert!(app.is_timed());
        assert!(app.remaining_time().is_some());
        assert!(!app.tick());

        app.restart();
        assert_eq!(app.total_questions(), 3);
        assert_eq!(app.session().answered_count(), 0);
        assert!(app.remaining_time().is_none());
    }

    #[test]
    fn test_check_app() {
        let mut app = CheckApp::new(InlineCheck::new(question(1, 1)));
        app.select_next_option();
        app.submit_answer();
        assert_eq!(app.check().is_correct(), Some(true));

        app.select_next_option();
        app.submit_answer();
        assert_eq!(app.check().state().selected(), Some(1));

        app.retry();
        assert_eq!(app.check().is_correct(), None);
        assert_eq!(app.selected_option(), 0);
    }
}
