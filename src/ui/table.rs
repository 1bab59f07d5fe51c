//! Records table: sortable header, current page of rows, pagination footer.
//!
//! Header cell rects and the rows area are written back into `app.hits` so the
//! mouse adapter can tell which column a click landed on.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, InputMode, Theme};
use crate::table::{EMPTY_STATE_TEXT, TableProjection};

const ACTIONS_LABEL: &str = "Actions";
const ACTIONS_HINT: &str = "e: edit  d: delete";

fn column_width(key: &str) -> Constraint {
    match key {
        "id" => Constraint::Length(6),
        _ => Constraint::Fill(1),
    }
}

fn widths(proj: &TableProjection) -> Vec<Constraint> {
    let mut w: Vec<Constraint> = proj.headers.iter().map(|h| column_width(&h.key)).collect();
    w.push(Constraint::Length(ACTIONS_HINT.len() as u16));
    w
}

pub fn render_table(f: &mut Frame, area: Rect, app: &mut AppState, proj: &TableProjection) {
    let focused = app.input_mode == InputMode::Normal;
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused {
            app.theme.title
        } else {
            app.theme.border
        }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let widths = widths(proj);
    let header_row = Rect {
        height: 1.min(table_area.height),
        ..table_area
    };
    let cells = Layout::horizontal(widths.clone())
        .flex(Flex::Start)
        .spacing(1)
        .split(header_row);
    app.hits.headers = cells.iter().take(proj.headers.len()).copied().collect();
    app.hits.rows = Rect {
        y: table_area.y.saturating_add(1),
        height: table_area.height.saturating_sub(1),
        ..table_area
    };

    let theme = app.theme;
    let mut header_cells: Vec<Cell> = proj
        .headers
        .iter()
        .map(|h| {
            let mut style = Style::default()
                .fg(theme.header_fg)
                .add_modifier(Modifier::BOLD);
            if h.focused {
                style = style.fg(theme.focus).add_modifier(Modifier::UNDERLINED);
            }
            Cell::from(h.title()).style(style)
        })
        .collect();
    header_cells.push(
        Cell::from(ACTIONS_LABEL).style(Style::default().fg(theme.muted).add_modifier(Modifier::BOLD)),
    );
    let header = Row::new(header_cells);

    let rows: Vec<Row> = proj
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let selected = i == app.selected_row;
            let mut cells: Vec<Cell> = r.cells.iter().map(|c| Cell::from(c.clone())).collect();
            cells.push(Cell::from(if selected { ACTIONS_HINT } else { "" }).style(
                Style::default().fg(theme.muted),
            ));
            let style = if selected {
                Style::default()
                    .fg(theme.highlight_fg)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(cells).style(style)
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .flex(Flex::Start)
        .column_spacing(1);
    f.render_widget(table, table_area);

    if proj.is_empty() && app.hits.rows.height > 0 {
        let empty = Paragraph::new(EMPTY_STATE_TEXT)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC));
        f.render_widget(empty, Rect { height: 1, ..app.hits.rows });
    }

    f.render_widget(Paragraph::new(footer_line(proj, &theme)), footer_area);
}

/// "Rows per page: [5] 10 15   1 – 5 of 12   « ‹ › »" with unavailable controls dimmed.
pub fn footer_line(proj: &TableProjection, theme: &Theme) -> Line<'static> {
    let active = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let dimmed = Style::default().fg(theme.muted);

    let mut spans = vec![Span::styled("Rows per page: ", Style::default().fg(theme.muted))];
    for n in &proj.page_size_options {
        if *n == proj.items_per_page {
            spans.push(Span::styled(format!("[{n}] "), Style::default().fg(theme.focus)));
        } else {
            spans.push(Span::styled(format!("{n} "), dimmed));
        }
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(proj.range_label(), Style::default().fg(theme.text)));
    spans.push(Span::raw("   "));
    for (glyph, enabled) in [
        ("«", proj.can_go_back),
        ("‹", proj.can_go_back),
        ("›", proj.can_go_forward),
        ("»", proj.can_go_forward),
    ] {
        spans.push(Span::styled(format!("{glyph} "), if enabled { active } else { dimmed }));
    }
    Line::from(spans)
}
