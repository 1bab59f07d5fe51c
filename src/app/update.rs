use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Position;
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::dashboard::actions;
use crate::dashboard::form::FormField;
use crate::error::DashboardError;
use crate::service::UserService;
use crate::table::{RowAction, TableIntent};
use crate::ui;

/// Load the collection once, then draw and dispatch input until the user quits.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    service: &dyn UserService,
) -> Result<()> {
    if let Err(e) = actions::load(&mut app.dashboard, service) {
        app.toasts.error(format!("Failed to load users: {e}"));
    }

    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            handle_event(app, service, ev);
        }
        app.toasts.prune(Instant::now());

        if app.should_quit {
            break;
        }
    }

    info!(uptime_ms = app.started_at.elapsed().as_millis() as u64, "exiting");
    Ok(())
}

pub fn handle_event(app: &mut AppState, service: &dyn UserService, ev: Event) {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, service, key),
        Event::Mouse(m) => handle_mouse(app, m),
        _ => {}
    }
}

pub fn handle_key(app: &mut AppState, service: &dyn UserService, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => {
            if let Some(action) = app.keymap.resolve(&key) {
                handle_action(app, service, action);
            }
        }
        InputMode::Help => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                app.input_mode = InputMode::Normal;
            }
            _ => {}
        },
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Form => handle_form_key(app, service, key.code),
    }
}

/// Apply one normal-mode action.
pub fn handle_action(app: &mut AppState, service: &dyn UserService, action: KeyAction) {
    let len = app.dashboard.filtered().len();
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::NewRecord => {
            app.dashboard.reset_form();
            app.form_field = FormField::Name;
            app.input_mode = InputMode::Form;
        }
        KeyAction::EditSelection => activate_row(app, service, RowAction::Edit),
        KeyAction::DeleteSelection => activate_row(app, service, RowAction::Delete),
        KeyAction::MoveUp => app.selected_row = app.selected_row.saturating_sub(1),
        KeyAction::MoveDown => {
            let visible = app.projection().rows.len();
            if app.selected_row + 1 < visible {
                app.selected_row += 1;
            }
        }
        KeyAction::FirstPage => {
            app.table.first_page();
            app.selected_row = 0;
        }
        KeyAction::PrevPage => {
            app.table.prev_page();
            app.selected_row = 0;
        }
        KeyAction::NextPage => {
            app.table.next_page(len);
            app.selected_row = 0;
        }
        KeyAction::LastPage => {
            app.table.last_page(len);
            app.selected_row = 0;
        }
        KeyAction::CyclePageSize => {
            app.table.cycle_page_size();
            app.selected_row = 0;
        }
        KeyAction::FocusNextColumn => app.table.focus_next_column(),
        KeyAction::FocusPrevColumn => app.table.focus_prev_column(),
        KeyAction::SortFocusedColumn => app.table.sort_focused_column(),
        KeyAction::MoveColumnLeft => app.table.move_focused_column_left(),
        KeyAction::MoveColumnRight => app.table.move_focused_column_right(),
        KeyAction::ToggleHelp => app.input_mode = InputMode::Help,
        KeyAction::Ignore => {}
    }
}

fn activate_row(app: &mut AppState, service: &dyn UserService, action: RowAction) {
    let intent = app.projection().intent_for(app.selected_row, action);
    if let Some(intent) = intent {
        apply_intent(app, service, intent);
    }
}

/// Carry out an edit or delete request raised by the table.
pub fn apply_intent(app: &mut AppState, service: &dyn UserService, intent: TableIntent) {
    match intent {
        TableIntent::Edit(record) => {
            debug!(id = record.id, "editing user");
            app.dashboard.begin_edit(&record);
            app.form_field = FormField::Name;
            app.input_mode = InputMode::Form;
        }
        TableIntent::Delete(id) => match actions::delete(&mut app.dashboard, service, id) {
            Ok(notice) => app.toasts.success(notice),
            Err(e) => app.toasts.error(format!("Failed to delete user: {e}")),
        },
    }
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.dashboard.apply_search("");
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            let mut term = app.dashboard.search_term().to_string();
            term.pop();
            app.dashboard.apply_search(term);
        }
        KeyCode::Char(c) => {
            let mut term = app.dashboard.search_term().to_string();
            term.push(c);
            app.dashboard.apply_search(term);
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, service: &dyn UserService, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.dashboard.reset_form();
            app.form_field = FormField::Name;
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.form_field = app.form_field.next();
        }
        KeyCode::Backspace => app.dashboard.form.pop_char(app.form_field),
        KeyCode::Char(c) => app.dashboard.form.push_char(app.form_field, c),
        KeyCode::Enter => submit_form(app, service),
        _ => {}
    }
}

fn submit_form(app: &mut AppState, service: &dyn UserService) {
    match actions::submit(&mut app.dashboard, service) {
        Ok(notice) => {
            app.toasts.success(notice);
            app.form_field = FormField::Name;
            app.input_mode = InputMode::Normal;
        }
        Err(DashboardError::Validation) => {
            if app.dashboard.form.errors.name.is_some() {
                app.form_field = FormField::Name;
            } else {
                app.form_field = FormField::Email;
            }
        }
        Err(e @ DashboardError::NotFound(_)) => {
            app.toasts.error(format!("Failed to update user: {e}"));
            app.dashboard.reset_form();
            app.input_mode = InputMode::Normal;
        }
        Err(e) => app.toasts.error(format!("Failed to save user: {e}")),
    }
}

/// Mouse adapter: click a header to sort, drag it onto another header to
/// reorder, click a row to select it.
pub fn handle_mouse(app: &mut AppState, m: MouseEvent) {
    if app.input_mode != InputMode::Normal {
        return;
    }
    let pos = Position::new(m.column, m.row);
    let header = app.hits.headers.iter().position(|r| r.contains(pos));
    match m.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(idx) = header {
                app.drag_from = Some(idx);
                app.table.focus_column(idx);
            } else if app.hits.rows.contains(pos) {
                let row = usize::from(pos.y - app.hits.rows.y);
                if row < app.projection().rows.len() {
                    app.selected_row = row;
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(from) = app.drag_from.take() else {
                return;
            };
            match header {
                Some(to) if to == from => app.table.sort_by_display_column(to),
                Some(to) => app.table.move_column(from, to),
                None => {}
            }
        }
        MouseEventKind::ScrollDown => handle_mouse_scroll(app, true),
        MouseEventKind::ScrollUp => handle_mouse_scroll(app, false),
        _ => {}
    }
}

fn handle_mouse_scroll(app: &mut AppState, down: bool) {
    if down {
        let visible = app.projection().rows.len();
        if app.selected_row + 1 < visible {
            app.selected_row += 1;
        }
    } else {
        app.selected_row = app.selected_row.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Theme;
    use crate::app::keymap::Keymap;
    use crate::app::settings::Settings;
    use crate::error::ServiceError;
    use crate::service::Record;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use ratatui::layout::Rect;
    use std::cell::Cell;

    #[derive(Default)]
    struct Memory {
        fail: Cell<bool>,
    }

    impl UserService for Memory {
        fn list(&self) -> Result<Vec<Record>, ServiceError> {
            Ok((1..=7)
                .map(|i| Record::new(i, format!("user{i}"), format!("u{i}@x.com")))
                .collect())
        }
        fn create(&self, record: &Record) -> Result<Record, ServiceError> {
            Ok(record.clone())
        }
        fn update(&self, _id: i64, record: &Record) -> Result<Record, ServiceError> {
            Ok(record.clone())
        }
        fn delete(&self, _id: i64) -> Result<(), ServiceError> {
            if self.fail.get() {
                return Err(ServiceError::Status {
                    url: "http://fake/users/1".into(),
                    status: 503,
                    body: String::new(),
                });
            }
            Ok(())
        }
    }

    fn app(svc: &Memory) -> AppState {
        let mut app = AppState::with_parts(&Settings::default(), Theme::mocha(), Keymap::new_defaults());
        actions::load(&mut app.dashboard, svc).expect("load");
        app
    }

    fn press(app: &mut AppState, svc: &Memory, code: KeyCode) {
        handle_key(app, svc, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut AppState, svc: &Memory, s: &str) {
        for c in s.chars() {
            press(app, svc, KeyCode::Char(c));
        }
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn search_filters_live_and_esc_clears() {
        let svc = Memory::default();
        let mut app = app(&svc);
        press(&mut app, &svc, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        type_str(&mut app, &svc, "USER7");
        assert_eq!(app.dashboard.filtered().len(), 1);
        press(&mut app, &svc, KeyCode::Esc);
        assert_eq!(app.dashboard.search_term(), "");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn new_record_through_form() {
        let svc = Memory::default();
        let mut app = app(&svc);
        press(&mut app, &svc, KeyCode::Char('n'));
        press(&mut app, &svc, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Form);
        assert!(app.dashboard.form.errors.name.is_some());

        type_str(&mut app, &svc, "Ann");
        press(&mut app, &svc, KeyCode::Tab);
        type_str(&mut app, &svc, "ann@x.com");
        press(&mut app, &svc, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.dashboard.records().last().map(|r| r.id), Some(8));
        assert_eq!(app.toasts.len(), 1);
    }

    #[test]
    fn failed_delete_restores_row_and_toasts() {
        let svc = Memory::default();
        svc.fail.set(true);
        let mut app = app(&svc);
        press(&mut app, &svc, KeyCode::Char('d'));
        assert_eq!(app.dashboard.records().len(), 7);
        assert_eq!(app.toasts.iter().next().map(|t| t.kind), Some(crate::app::toast::ToastKind::Error));
    }

    #[test]
    fn paging_resets_selection() {
        let svc = Memory::default();
        let mut app = app(&svc);
        press(&mut app, &svc, KeyCode::Down);
        press(&mut app, &svc, KeyCode::Down);
        assert_eq!(app.selected_row, 2);
        press(&mut app, &svc, KeyCode::Right);
        assert_eq!(app.table.current_page(), 2);
        assert_eq!(app.selected_row, 0);
        press(&mut app, &svc, KeyCode::Right);
        assert_eq!(app.table.current_page(), 2);
    }

    #[test]
    fn header_click_sorts_and_drag_reorders() {
        let svc = Memory::default();
        let mut app = app(&svc);
        app.hits.headers = vec![Rect::new(0, 2, 10, 1), Rect::new(11, 2, 10, 1)];

        handle_mouse(&mut app, click(MouseEventKind::Down(MouseButton::Left), 3, 2));
        handle_mouse(&mut app, click(MouseEventKind::Up(MouseButton::Left), 4, 2));
        assert_eq!(app.table.sort().map(|s| s.key.as_str()), Some("name"));

        handle_mouse(&mut app, click(MouseEventKind::Down(MouseButton::Left), 12, 2));
        handle_mouse(&mut app, click(MouseEventKind::Up(MouseButton::Left), 1, 2));
        let keys: Vec<&str> = app.table.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["email", "name"]);
        assert_eq!(app.table.sort().map(|s| s.key.as_str()), Some("name"));
    }
}
