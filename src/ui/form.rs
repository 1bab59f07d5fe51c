use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};
use crate::dashboard::form::{FormField, FormMode};

/// Submit button caption for the current form mode.
pub fn submit_label(mode: FormMode) -> &'static str {
    match mode {
        FormMode::New => "Add User",
        FormMode::Edit => "Update User",
    }
}

pub fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let editing = app.input_mode == InputMode::Form;
    let form = &app.dashboard.form;
    let title = match (form.mode, form.edit_target) {
        (FormMode::Edit, Some(id)) => format!("Edit user #{id}"),
        _ => "New user".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing {
            app.theme.title
        } else {
            app.theme.border
        }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [name_area, email_area, _, buttons_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    for (field, field_area) in [(FormField::Name, name_area), (FormField::Email, email_area)] {
        let focused = editing && app.form_field == field;
        let [input_area, error_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(field_area);
        let value = form.value(field);
        let input = Paragraph::new(value.to_string())
            .style(Style::default().fg(app.theme.text))
            .block(
                Block::default()
                    .title(field.label())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(if focused {
                        app.theme.focus
                    } else if form.error(field).is_some() {
                        app.theme.error
                    } else {
                        app.theme.border
                    })),
            );
        f.render_widget(input, input_area);
        if let Some(msg) = form.error(field) {
            f.render_widget(
                Paragraph::new(msg).style(Style::default().fg(app.theme.error)),
                error_area,
            );
        }
        if focused {
            let max_x = input_area.right().saturating_sub(2);
            let typed = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
            let x = input_area.x.saturating_add(1).saturating_add(typed).min(max_x);
            f.set_cursor_position(Position::new(x, input_area.y + 1));
        }
    }

    let key_style = Style::default()
        .fg(if editing { app.theme.focus } else { app.theme.muted })
        .add_modifier(Modifier::BOLD);
    let buttons = Line::from(vec![
        Span::styled("[Enter] ", key_style),
        Span::styled(submit_label(form.mode), Style::default().fg(app.theme.text)),
        Span::raw("   "),
        Span::styled("[Esc] ", key_style),
        Span::styled("Cancel", Style::default().fg(app.theme.text)),
    ]);
    f.render_widget(Paragraph::new(buttons), buttons_area);
}
