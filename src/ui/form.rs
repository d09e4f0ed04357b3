//! Forecast form rendering
//!
//! Renders the three input fields, the result panel with the weather icon,
//! and a key hint footer.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, Field, ResultPanel};
use crate::data::countries::accepted_codes;
use crate::data::WeatherIcon;
use crate::forecast::ForecastReport;
use crate::presenter::present;

/// Color for an icon category
fn icon_color(icon: WeatherIcon) -> Color {
    match icon {
        WeatherIcon::Clear => Color::Yellow,
        WeatherIcon::Cloudy => Color::Gray,
        WeatherIcon::Rain => Color::Blue,
        WeatherIcon::Snow => Color::White,
    }
}

/// Renders the form screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // City
            Constraint::Length(3), // Country
            Constraint::Length(3), // Date
            Constraint::Min(6),    // Result
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let title = Paragraph::new("Weather Forecast Tool")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    for (field, chunk) in Field::ALL.into_iter().zip(&chunks[1..4]) {
        render_field(frame, app, field, *chunk);
    }

    render_result(frame, app, chunks[4]);
    render_footer(frame, chunks[5]);
}

/// Renders one labelled input box, with the cursor if it has focus
fn render_field(frame: &mut Frame, app: &App, field: Field, area: Rect) {
    let focused = app.focus == field && app.state == AppState::Editing && !app.show_help;
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };

    let mut block = Block::default()
        .title(format!(" {} ", field.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if field == Field::Country {
        block = block.title_bottom(format!(" {} ", accepted_codes()));
    }

    let value = app.value(field);
    frame.render_widget(Paragraph::new(value).block(block), area);

    if focused {
        frame.set_cursor_position((cursor_x(area, value), area.y + 1));
    }
}

/// Column after the last typed character, kept inside the box border
fn cursor_x(area: Rect, value: &str) -> u16 {
    let width = u16::try_from(Span::raw(value).width()).unwrap_or(u16::MAX);
    let max_x = area.right().saturating_sub(2);
    area.x.saturating_add(1).saturating_add(width).min(max_x)
}

/// Renders the result panel for the current state
fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Forecast ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines: Vec<Line> = if app.state == AppState::Fetching {
        vec![Line::from(Span::styled(
            "Fetching forecast...",
            Style::default().fg(Color::Cyan),
        ))]
    } else {
        match &app.panel {
            ResultPanel::Empty => vec![Line::from(Span::styled(
                "Fill in the fields and press Enter.",
                Style::default().fg(Color::DarkGray),
            ))],
            ResultPanel::Report(report) => report_lines(report),
            ResultPanel::Unavailable(messages) => messages
                .iter()
                .enumerate()
                .map(|(i, message)| {
                    let style = if i == 0 {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    Line::from(Span::styled(message.clone(), style))
                })
                .collect(),
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Icon line followed by the presenter's text, with a blank line between sections
fn report_lines(report: &ForecastReport) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(icon) = report.icon {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}  ", icon.symbol()),
                Style::default().fg(icon_color(icon)),
            ),
            Span::styled(
                icon.label().to_uppercase(),
                Style::default()
                    .fg(icon_color(icon))
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
    }

    for (i, text) in present(report).into_iter().enumerate() {
        // The presenter's own icon line duplicates the one above
        if text.starts_with("Sky:") {
            continue;
        }
        let style = match i {
            0 => Style::default().add_modifier(Modifier::BOLD),
            _ if text.contains("unavailable") => Style::default().fg(Color::DarkGray),
            _ => Style::default(),
        };
        lines.push(Line::from(Span::styled(text, style)));
        if i == 0 {
            lines.push(Line::from(""));
        }
    }

    lines
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" forecast  "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" next field  "),
        Span::styled("F1", Style::default().fg(Color::Yellow)),
        Span::raw(" help  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}
