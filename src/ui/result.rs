use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::engine::Score;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.score();
    let percentage = score.percentage();
    let grade_color = get_grade_color(percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new(app.title())
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(title, chunks[0]);

    render_score_summary(frame, chunks[1], &score, app.pass_threshold(), grade_color);
    render_question_breakdown(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn verdict(score: &Score, threshold: u8) -> Line<'static> {
    if score.passed(threshold) {
        Line::from(Span::styled(
            format!("PASSED  ·  pass mark {}%", threshold),
            Style::default().fg(Color::Green).bold(),
        ))
    } else {
        Line::from(Span::styled(
            format!("NOT PASSED  ·  pass mark {}%", threshold),
            Style::default().fg(Color::Red).bold(),
        ))
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    score: &Score,
    threshold: Option<u8>,
    grade_color: Color,
) {
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                score.correct,
                score.total,
                score.percentage()
            ),
            Style::default().fg(grade_color).bold(),
        )),
    ];
    match threshold {
        Some(threshold) => content.push(verdict(score, threshold)),
        None => content.push(Line::from("")),
    }
    if score.answered < score.total {
        content.push(Line::from(Span::styled(
            format!("{} unanswered", score.total - score.answered),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let questions = session.quiz().questions();

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled("Showing ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.review_filter().to_string(),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("  ·  {} flagged", app.flagged_count()),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    let indices = app.review_indices();
    if indices.is_empty() {
        lines.push(Line::from(Span::styled(
            "No questions match this filter.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.extend(indices.into_iter().map(|index| {
        let question = &questions[index];
        let (symbol, color) = match session.is_correct_at(index) {
            Some(true) => ("+", Color::Green),
            Some(false) => ("-", Color::Red),
            None => ("?", Color::DarkGray),
        };

        Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                truncate_question(question.prompt()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                if app.is_flagged(index) { "  [flagged]" } else { "" },
                Style::default().fg(Color::Yellow),
            ),
        ])
    }));

    let categories = session.category_scores();
    if !categories.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "By category",
            Style::default().fg(Color::Cyan).bold(),
        )));
        for (category, score) in categories {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:>3}/{:<3} ", score.correct, score.total),
                    Style::default().fg(get_grade_color(score.percentage())),
                ),
                Span::styled(category, Style::default().fg(Color::Gray)),
            ]));
        }
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  tab filter  ·  r retry  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
