use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;

/// Rejected records listed on the welcome screen before "and N more".
const REJECTED_PREVIEW: usize = 3;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let rejected_lines = app.rejected().len().min(REJECTED_PREVIEW + 1);
    let notice_height = if app.rejected().is_empty() {
        0
    } else {
        rejected_lines as u16 + 3
    };

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Length(notice_height),
        Constraint::Fill(1),
    ])
    .split(area);

    let mut details = format!("{} Questions", app.total_questions());
    if let Some(config) = app.exam_config() {
        details.push_str(&format!("  ·  Pass mark {}%", config.pass_threshold));
        if let Some(limit) = config.time_limit {
            details.push_str(&format!("  ·  {} min", limit.div_ceil(60)));
        }
    }

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.title().to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(details, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, chunks[1]);

    if !app.rejected().is_empty() {
        render_unavailable(frame, chunks[2], app);
    }
}

fn render_unavailable(frame: &mut Frame, area: Rect, app: &App) {
    let rejected = app.rejected();
    let mut lines = vec![Line::from(Span::styled(
        format!("{} question(s) unavailable", rejected.len()),
        Style::default().fg(Color::Yellow).bold(),
    ))];

    for entry in rejected.iter().take(REJECTED_PREVIEW) {
        lines.push(Line::from(Span::styled(
            format!("{}: {}", entry.record, entry.error),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if rejected.len() > REJECTED_PREVIEW {
        lines.push(Line::from(Span::styled(
            format!("and {} more", rejected.len() - REJECTED_PREVIEW),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::top(1)));
    frame.render_widget(widget, area);
}
