use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::data::format_remaining;
use crate::engine::{AnswerState, Feedback};
use crate::models::Question;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let index = app.current_question_index();
    let question = app.current_question();
    let state = app.session().state_at(index);
    let feedback = if app.is_revealed(index) {
        app.session().feedback_at(index)
    } else {
        None
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(if feedback.is_some() { 7 } else { 0 }),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], question.prompt());
    frame.render_widget(
        Paragraph::new(option_lines(question, app.selected_option(), state, feedback.as_ref())),
        chunks[2],
    );
    if let Some(feedback) = &feedback {
        render_feedback(frame, chunks[3], question, feedback);
    }
    render_controls(frame, chunks[4], app);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Length(34)]).split(area);

    let title = Paragraph::new(app.title()).fg(Color::DarkGray);
    frame.render_widget(title, chunks[0]);

    let mut progress = format!(
        "{}/{}",
        app.current_question_number(),
        app.total_questions()
    );
    if app.is_flagged(app.current_question_index()) {
        progress = format!("flagged  ·  {}", progress);
    }
    if let Some(remaining) = app.remaining_time() {
        progress = format!("{}  ·  {}", format_remaining(remaining), progress);
    }
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, chunks[1]);
}

pub(super) fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

pub(super) fn option_label(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// One line per option plus a blank spacer.
///
/// Before an answer the cursor is highlighted. Once answered, a revealed
/// question marks the correct option and a wrong pick; an unrevealed one
/// only marks the pick.
pub(super) fn option_lines<'a>(
    question: &'a Question,
    cursor: usize,
    state: AnswerState,
    feedback: Option<&Feedback<'_>>,
) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options().len() * 2);

    for (index, option) in question.options().iter().enumerate() {
        let (marker, style) = match (feedback, state.selected()) {
            (Some(feedback), _) if index == feedback.correct_index => {
                ("+", Style::default().fg(Color::Green).bold())
            }
            (Some(feedback), _) if index == feedback.selected => {
                ("-", Style::default().fg(Color::Red).bold())
            }
            (Some(_), _) => (" ", Style::default().fg(Color::DarkGray)),
            (None, Some(selected)) if index == selected => {
                ("*", Style::default().fg(Color::Cyan).bold())
            }
            (None, Some(_)) => (" ", Style::default().fg(Color::Gray)),
            (None, None) if index == cursor => (">", Style::default().fg(Color::Cyan).bold()),
            (None, None) => (" ", Style::default().fg(Color::Gray)),
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    lines
}

pub(super) fn render_feedback(frame: &mut Frame, area: Rect, question: &Question, feedback: &Feedback<'_>) {
    let verdict = if feedback.is_correct {
        Line::from(Span::styled("Correct", Style::default().fg(Color::Green).bold()))
    } else {
        let answer = question
            .options()
            .get(feedback.correct_index)
            .map(String::as_str)
            .unwrap_or_default();
        Line::from(vec![
            Span::styled("Incorrect", Style::default().fg(Color::Red).bold()),
            Span::styled(
                format!("  ·  answer: {}. {}", option_label(feedback.correct_index), answer),
                Style::default().fg(Color::Gray),
            ),
        ])
    };

    let content = vec![verdict, Line::from(""), Line::from(feedback.explanation.fg(Color::White))];

    let widget = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let answered = app.session().state_at(app.current_question_index()).is_answered();
    let text = match (app.exam_config().is_some(), answered) {
        (true, _) => "j/k navigate  ·  enter answer  ·  h/l previous/next  ·  f flag  ·  n next flagged  ·  s submit  ·  q quit",
        (false, true) => "enter continue  ·  h/l previous/next  ·  s finish  ·  q quit",
        (false, false) => "j/k navigate  ·  enter answer  ·  h/l previous/next  ·  f flag  ·  q quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
