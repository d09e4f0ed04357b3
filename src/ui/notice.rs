//! Blocking notice for validation and lookup errors
//!
//! Renders a centered modal that stays until the user dismisses it.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::app::Notice;

/// Width of the notice box
const NOTICE_WIDTH: u16 = 60;

/// Renders the notice on top of the form
pub fn render(frame: &mut Frame, notice: &Notice) {
    let mut lines: Vec<Line> = notice
        .message
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to dismiss",
        Style::default().fg(Color::DarkGray),
    )));

    // Rough wrap estimate so long messages still fit
    let inner_width = usize::from(NOTICE_WIDTH - 2);
    let body_height: usize = notice
        .message
        .lines()
        .map(|line| line.chars().count().max(1).div_ceil(inner_width))
        .sum();
    let height = (body_height + 4) as u16;

    let area = centered_rect(NOTICE_WIDTH, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", notice.title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
