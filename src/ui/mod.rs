//! UI rendering module for dualcast
//!
//! This module contains all the rendering logic for the terminal form,
//! using the ratatui library for TUI components.

pub mod form;
pub mod help_overlay;
pub mod notice;

pub use form::render as render_form;
pub use help_overlay::render as render_help_overlay;
pub use notice::render as render_notice;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::{App, AppState};

/// Renders the form plus whichever overlay is active
pub fn render(frame: &mut Frame, app: &App) {
    render_form(frame, app);

    if let AppState::Notice(notice) = &app.state {
        render_notice(frame, notice);
    }
    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
