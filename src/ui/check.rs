use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::CheckApp;

use super::quiz::{option_lines, render_feedback, render_question_text};

pub fn render(frame: &mut Frame, area: Rect, app: &CheckApp) {
    let check = app.check();
    let question = check.question();
    let feedback = check.feedback();

    let outer = Block::default()
        .title(Span::styled(" Quick Check ", Style::default().fg(Color::Cyan).bold()))
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .padding(Padding::uniform(1));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(if feedback.is_some() { 7 } else { 0 }),
        Constraint::Length(1),
    ])
    .split(inner);

    render_question_text(frame, chunks[0], question.prompt());
    frame.render_widget(
        Paragraph::new(option_lines(
            question,
            app.selected_option(),
            check.state(),
            feedback.as_ref(),
        )),
        chunks[1],
    );
    if let Some(feedback) = &feedback {
        render_feedback(frame, chunks[2], question, feedback);
    }

    let controls = if feedback.is_some() {
        "r retry  ·  q quit"
    } else {
        "j/k navigate  ·  enter answer  ·  q quit"
    };
    let widget = Paragraph::new(controls)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, chunks[3]);
}
