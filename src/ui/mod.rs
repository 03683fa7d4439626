mod check;
mod quiz;
mod result;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, CheckApp};
use crate::models::AppState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Welcome => welcome::render(frame, area, app),
        AppState::Quiz => quiz::render(frame, area, app),
        AppState::Result => result::render(frame, area, app),
    }
}

pub fn render_check(frame: &mut Frame, app: &CheckApp) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);
    check::render(frame, area, app);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::engine::{InlineCheck, QuizSession};
    use crate::models::{Question, Quiz};

    fn question(id: u64) -> Question {
        Question::new(
            id,
            "Which regulation in BS 7671 covers initial verification?",
            vec![
                "Regulation 643.1".into(),
                "Regulation 411.3.3".into(),
                "Regulation 314.1".into(),
            ],
            0,
            "Regulation 643.1 covers initial verification.",
        )
        .unwrap()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_quiz_screen_shows_feedback_after_answer() {
        let quiz = Quiz::new("Testing", vec![question(1), question(2)]).unwrap();
        let mut app = App::with_session(QuizSession::new(quiz));
        app.start_quiz();
        app.select_next_option();
        app.submit_answer();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("1/2"));
        assert!(text.contains("Incorrect"));
        assert!(text.contains("Regulation 643.1 covers initial verification."));
    }

    #[test]
    fn test_result_screen_shows_score() {
        let quiz = Quiz::new("Testing", vec![question(1), question(2)]).unwrap();
        let mut app = App::with_session(QuizSession::new(quiz));
        app.start_quiz();
        app.submit_answer();
        app.finish();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Testing"));
        assert!(text.contains("RESULTS"));
        assert!(text.contains("1 / 2"));
        assert!(text.contains("1 unanswered"));
        assert!(text.contains("Showing all"));
    }

    #[test]
    fn test_result_screen_filters_breakdown() {
        let first = Question::new(1, "First prompt", vec!["A".into(), "B".into()], 0, "").unwrap();
        let second = Question::new(2, "Second prompt", vec!["A".into(), "B".into()], 0, "").unwrap();
        let quiz = Quiz::new("Testing", vec![first, second]).unwrap();
        let mut app = App::with_session(QuizSession::new(quiz));
        app.start_quiz();
        app.submit_answer();
        app.next_question();
        app.toggle_flag();
        app.finish();

        // all -> correct -> incorrect -> unanswered
        app.cycle_review_filter();
        app.cycle_review_filter();
        app.cycle_review_filter();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Showing unanswered"));
        assert!(text.contains("Second prompt"));
        assert!(text.contains("[flagged]"));
        assert!(!text.contains("First prompt"));
    }

    #[test]
    fn test_check_screen_before_answer() {
        let app = CheckApp::new(InlineCheck::new(question(1)));

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render_check(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Quick Check"));
        assert!(text.contains("Regulation 411.3.3"));
        assert!(!text.contains("Correct"));
    }
}
