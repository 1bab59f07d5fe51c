//! Frame layout: title bar with search, form beside the table, status bar,
//! then overlays (help, notifications).
//!
pub mod components;
pub mod form;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let proj = app.projection();

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(root[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(body[0]);

    components::render_title_bar(f, root[0], app);
    form::render_form(f, left[0], app);
    table::render_table(f, body[1], app, &proj);
    components::render_status_bar(f, root[2], app, &proj);

    if app.input_mode == InputMode::Help {
        components::render_help_modal(f, f.area(), app);
    }
    components::render_toasts(f, f.area(), app);
}
