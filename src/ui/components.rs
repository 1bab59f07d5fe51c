//! Shared UI components (title bar, status bar, help overlay, notifications).
//!
use std::collections::{BTreeMap, BTreeSet};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::toast::ToastKind;
use crate::app::{AppState, InputMode};
use crate::table::TableProjection;

/// Render the top bar: app name, endpoint and the search prompt.
pub fn render_title_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let searching = app.input_mode == InputMode::Search;
    let term = app.dashboard.search_term();
    let search_style = if searching {
        Style::default().fg(app.theme.focus).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.muted)
    };
    let mut spans = vec![
        Span::styled("Search: ", search_style),
        Span::styled(term.to_string(), Style::default().fg(app.theme.text)),
    ];
    if term.is_empty() && !searching {
        spans.push(Span::styled(
            "press / to filter by id, name or email",
            Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
        ));
    }

    let block = Block::default()
        .title(format!("user-dashboard ({})", app.base_url))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if searching {
            app.theme.focus
        } else {
            app.theme.border
        }));
    let inner = block.inner(area);
    let p = Paragraph::new(Line::from(spans))
        .block(block)
        .style(Style::default().bg(app.theme.header_bg));
    f.render_widget(p, area);

    if searching {
        let typed = u16::try_from("Search: ".len() + term.chars().count()).unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(typed);
        f.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState, proj: &TableProjection) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form => "FORM",
        InputMode::Help => "HELP",
    };
    let sort = match app.table.sort() {
        Some(s) => format!("  sort:{} {}", s.key, s.direction.indicator()),
        None => String::new(),
    };
    let msg = format!(
        "mode: {mode}  users:{}  shown:{}{sort}  rows/page:{}  ?: help",
        app.dashboard.records().len(),
        proj.total,
        proj.items_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn display_key(mods: KeyModifiers, code: KeyCode) -> String {
    match code {
        KeyCode::BackTab => "Shift+Tab".to_string(),
        _ => Keymap::format_key(mods, code),
    }
}

/// Render the help overlay; key columns come from the live keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 30u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let mut general: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut navigation: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut columns: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

    for ((mods, code), action) in app.keymap.all_bindings() {
        let key = display_key(mods, code);
        let (section, label) = match action {
            KeyAction::Quit => (&mut general, "Quit"),
            KeyAction::StartSearch => (&mut general, "Search"),
            KeyAction::NewRecord => (&mut general, "New user"),
            KeyAction::EditSelection => (&mut general, "Edit user"),
            KeyAction::DeleteSelection => (&mut general, "Delete user"),
            KeyAction::ToggleHelp => (&mut general, "Help"),
            KeyAction::MoveUp => (&mut navigation, "Move up"),
            KeyAction::MoveDown => (&mut navigation, "Move down"),
            KeyAction::FirstPage => (&mut navigation, "First page"),
            KeyAction::PrevPage => (&mut navigation, "Previous page"),
            KeyAction::NextPage => (&mut navigation, "Next page"),
            KeyAction::LastPage => (&mut navigation, "Last page"),
            KeyAction::CyclePageSize => (&mut navigation, "Rows per page"),
            KeyAction::FocusNextColumn => (&mut columns, "Focus next column"),
            KeyAction::FocusPrevColumn => (&mut columns, "Focus previous column"),
            KeyAction::SortFocusedColumn => (&mut columns, "Sort by column"),
            KeyAction::MoveColumnLeft => (&mut columns, "Move column left"),
            KeyAction::MoveColumnRight => (&mut columns, "Move column right"),
            KeyAction::Ignore => continue,
        };
        section.entry(label).or_default().insert(key);
    }

    let contextual: [(&str, &str); 5] = [
        ("Search: keep / clear", "Enter / Esc"),
        ("Form: switch field", "Tab"),
        ("Form: submit", "Enter"),
        ("Form: cancel", "Esc"),
        ("Mouse", "click header sorts, drag reorders"),
    ];

    let col1_w = general
        .keys()
        .chain(navigation.keys())
        .chain(columns.keys())
        .map(|k| k.len())
        .chain(contextual.iter().map(|(k, _)| k.len()))
        .max()
        .unwrap_or(0);

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::raw(format!("  {:>width$} │ ", label, width = col1_w)),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)))
    };

    let mut lines: Vec<Line> = Vec::new();
    for (title, section) in [
        ("General:", &general),
        ("Navigation:", &navigation),
        ("Columns:", &columns),
    ] {
        lines.push(heading(title));
        for (label, keys) in section {
            lines.push(row(*label, keys.iter().cloned().collect::<Vec<_>>().join(", ")));
        }
        lines.push(Line::raw(""));
    }
    lines.push(heading("Contextual:"));
    for (label, value) in contextual {
        lines.push(row(label, value.to_string()));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help (Esc to close)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Stack live notifications in the top-right corner, newest at the bottom.
pub fn render_toasts(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 48u16.min(area.width);
    let mut y = area.y + 1;
    for toast in app.toasts.iter() {
        if y + 3 > area.bottom() {
            break;
        }
        let rect = Rect {
            x: area.right().saturating_sub(width + 1),
            y,
            width,
            height: 3,
        };
        let (title, color) = match toast.kind {
            ToastKind::Success => ("Success", app.theme.success),
            ToastKind::Error => ("Error", app.theme.error),
        };
        let p = Paragraph::new(toast.message.clone())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        y += 3;
    }
}
