// Unit tests for user-dashboard
// These tests work with the public API without a terminal or network

use std::cell::RefCell;

use user_dashboard::service::{Record, ServiceError, UserService};

fn people(n: i64) -> Vec<Record> {
    (1..=n)
        .map(|i| Record::new(i, format!("person{:02}", (n - i) % 7), format!("p{i}@x.com")))
        .collect()
}

/// In-memory service that remembers calls and can refuse everything.
#[derive(Default)]
struct Memory {
    records: Vec<Record>,
    calls: RefCell<Vec<&'static str>>,
    refuse: bool,
}

impl Memory {
    fn with(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    fn call(&self, op: &'static str) -> Result<(), ServiceError> {
        self.calls.borrow_mut().push(op);
        if self.refuse {
            return Err(ServiceError::Status {
                url: "memory://users".into(),
                status: 500,
                body: String::new(),
            });
        }
        Ok(())
    }
}

impl UserService for Memory {
    fn list(&self) -> Result<Vec<Record>, ServiceError> {
        self.call("list")?;
        Ok(self.records.clone())
    }
    fn create(&self, record: &Record) -> Result<Record, ServiceError> {
        self.call("create")?;
        Ok(record.clone())
    }
    fn update(&self, _id: i64, record: &Record) -> Result<Record, ServiceError> {
        self.call("update")?;
        Ok(record.clone())
    }
    fn delete(&self, _id: i64) -> Result<(), ServiceError> {
        self.call("delete")
    }
}

#[cfg(test)]
mod table_tests {
    use super::*;
    use user_dashboard::table::{Column, SortDirection, TableView};

    fn view(page_size: usize) -> TableView {
        TableView::new(Column::defaults(), &[page_size, 50])
    }

    #[test]
    fn pages_concatenate_to_sorted_dataset() {
        let data = people(23);
        let mut v = view(5);
        v.toggle_sort("name");
        assert_eq!(v.total_pages(data.len()), 5);

        let mut seen = Vec::new();
        loop {
            let proj = v.project(&data);
            assert!(proj.rows.len() <= 5);
            seen.extend(proj.rows.into_iter().map(|r| r.record));
            if !proj.can_go_forward {
                break;
            }
            v.next_page(data.len());
        }
        assert_eq!(seen, v.sorted(&data));
    }

    #[test]
    fn second_click_descends_third_matches_first() {
        let data = people(9);
        let mut v = view(50);
        v.sort_by_display_column(0);
        let first = v.project(&data);
        assert_eq!(first.headers[0].sort, Some(SortDirection::Ascending));

        v.sort_by_display_column(0);
        let second = v.project(&data);
        assert_eq!(second.headers[0].sort, Some(SortDirection::Descending));
        let mut reversed = second.rows.iter().map(|r| r.record.name.clone()).collect::<Vec<_>>();
        reversed.reverse();
        let names = first.rows.iter().map(|r| r.record.name.clone()).collect::<Vec<_>>();
        assert_eq!(names, reversed);

        v.sort_by_display_column(0);
        assert_eq!(v.project(&data).rows, first.rows);
    }

    #[test]
    fn reorder_keeps_header_bound_to_its_field() {
        let data = people(4);
        let mut v = view(50);
        v.move_column(1, 0);
        let proj = v.project(&data);
        assert_eq!(proj.headers[0].key, "email");
        assert_eq!(proj.rows[0].cells[0], data[0].email);

        v.sort_by_display_column(0);
        assert_eq!(v.sort().map(|s| s.key.as_str()), Some("email"));
    }

    #[test]
    fn empty_dataset_disables_forward_navigation() {
        let mut v = view(5);
        let proj = v.project(&[]);
        assert!(proj.is_empty());
        assert_eq!(proj.total_pages, 0);
        assert!(!proj.can_go_forward);
        assert!(!proj.can_go_back);
        assert_eq!(proj.range_label(), "0 – 0 of 0");
    }

    #[test]
    fn shrinking_dataset_clamps_page() {
        let data = people(12);
        let mut v = view(5);
        v.last_page(data.len());
        assert_eq!(v.current_page(), 3);
        let proj = v.project(&data[..4]);
        assert_eq!(proj.current_page, 1);
        assert_eq!(proj.range_label(), "1 – 4 of 4");
    }

    #[test]
    fn changing_page_size_returns_to_first_page() {
        let data = people(12);
        let mut v = view(5);
        v.next_page(data.len());
        assert!(v.set_items_per_page(50));
        assert_eq!(v.current_page(), 1);
        assert!(!v.set_items_per_page(7));
        assert_eq!(v.items_per_page(), 50);
    }
}

#[cfg(test)]
mod dashboard_tests {
    use super::*;
    use user_dashboard::dashboard::DashboardState;
    use user_dashboard::dashboard::actions::{self, USER_DELETED};
    use user_dashboard::dashboard::form::{EMAIL_INVALID, FormField, NAME_REQUIRED};
    use user_dashboard::error::DashboardError;
    use user_dashboard::search::filter_records;

    fn bob_and_cleo() -> Vec<Record> {
        vec![Record::new(1, "Bob", "b@x.com"), Record::new(2, "Cleo", "c@x.com")]
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_email() {
        let data = bob_and_cleo();
        assert_eq!(filter_records(&data, "bob"), filter_records(&data, "BOB"));
        assert_eq!(filter_records(&data, "bob").len(), 1);
        assert_eq!(filter_records(&data, "c@x").len(), 1);
        assert!(filter_records(&data, "zz").is_empty());
        assert_eq!(filter_records(&data, "").len(), 2);
    }

    #[test]
    fn invalid_submit_shows_both_errors_without_network() {
        let svc = Memory::with(bob_and_cleo());
        let mut st = DashboardState::new();
        actions::load(&mut st, &svc).expect("load");
        st.form.set_field(FormField::Email, "abc");
        assert!(matches!(actions::submit(&mut st, &svc), Err(DashboardError::Validation)));
        assert_eq!(st.form.error(FormField::Name), Some(NAME_REQUIRED));
        assert_eq!(st.form.error(FormField::Email), Some(EMAIL_INVALID));
        assert_eq!(*svc.calls.borrow(), vec!["list"]);
    }

    #[test]
    fn delete_removes_locally_then_restores_on_refusal() {
        let svc = Memory::with(bob_and_cleo());
        let mut st = DashboardState::new();
        actions::load(&mut st, &svc).expect("load");
        assert_eq!(actions::delete(&mut st, &svc, 2).expect("delete"), USER_DELETED);
        assert_eq!(st.records(), &[Record::new(1, "Bob", "b@x.com")]);

        let refusing = Memory {
            refuse: true,
            ..Memory::default()
        };
        assert!(actions::delete(&mut st, &refusing, 1).is_err());
        assert_eq!(st.records(), &[Record::new(1, "Bob", "b@x.com")]);
    }
}

#[cfg(test)]
mod app_tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use user_dashboard::app::keymap::{KeyAction, Keymap};
    use user_dashboard::app::settings::Settings;
    use user_dashboard::app::update::{handle_action, handle_key};
    use user_dashboard::app::{AppState, InputMode, Theme};
    use user_dashboard::dashboard::actions;
    use user_dashboard::dashboard::form::FormMode;

    fn app_with(svc: &Memory) -> AppState {
        let mut app = AppState::with_parts(&Settings::default(), Theme::dark(), Keymap::new_defaults());
        actions::load(&mut app.dashboard, svc).expect("load");
        app
    }

    fn screen(app: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).expect("terminal");
        terminal
            .draw(|f| user_dashboard::ui::render(f, app))
            .expect("draw");
        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn edit_selection_loads_form() {
        let svc = Memory::with(people(3));
        let mut app = app_with(&svc);
        handle_action(&mut app, &svc, KeyAction::MoveDown);
        handle_action(&mut app, &svc, KeyAction::EditSelection);
        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.dashboard.form.mode, FormMode::Edit);
        assert_eq!(app.dashboard.form.edit_target, Some(2));

        handle_key(&mut app, &svc, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.dashboard.form.mode, FormMode::New);
    }

    #[test]
    fn column_keys_reorder_and_sort() {
        let svc = Memory::with(people(3));
        let mut app = app_with(&svc);
        handle_action(&mut app, &svc, KeyAction::MoveColumnRight);
        let keys: Vec<&str> = app.table.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["email", "name"]);
        assert_eq!(app.table.focused_column(), 1);
        handle_action(&mut app, &svc, KeyAction::SortFocusedColumn);
        assert_eq!(app.table.sort().map(|s| s.key.as_str()), Some("name"));
    }

    #[test]
    fn renders_rows_footer_and_empty_state() {
        let svc = Memory::with(people(7));
        let mut app = app_with(&svc);
        let text = screen(&mut app);
        assert!(text.contains("Name"));
        assert!(text.contains("Email"));
        assert!(text.contains("p1@x.com"));
        assert!(text.contains("1 – 5 of 7"));
        assert!(text.contains("Add User"));
        assert_eq!(app.hits.headers.len(), 2);

        app.dashboard.apply_search("zz");
        let text = screen(&mut app);
        assert!(text.contains("No records found"));
        assert!(text.contains("0 – 0 of 0"));
    }

    #[test]
    fn sort_indicator_and_update_caption_render() {
        let svc = Memory::with(people(3));
        let mut app = app_with(&svc);
        handle_action(&mut app, &svc, KeyAction::SortFocusedColumn);
        handle_action(&mut app, &svc, KeyAction::EditSelection);
        let text = screen(&mut app);
        assert!(text.contains("Name ▲"));
        assert!(text.contains("Update User"));
    }

    #[test]
    fn idle_search_hint_lists_every_searchable_field() {
        let svc = Memory::with(people(2));
        let mut app = app_with(&svc);
        assert!(screen(&mut app).contains("press / to filter by id, name or email"));
    }

    #[test]
    fn oversized_input_keeps_cursor_inside_the_frame() {
        use user_dashboard::dashboard::form::FormField;

        let svc = Memory::with(people(2));
        let mut app = app_with(&svc);
        let huge = "n".repeat(70_000);

        app.input_mode = InputMode::Form;
        app.form_field = FormField::Name;
        app.dashboard.form.set_field(FormField::Name, huge.clone());
        assert!(screen(&mut app).contains("Add User"));

        app.input_mode = InputMode::Search;
        app.dashboard.apply_search(&huge);
        assert!(screen(&mut app).contains("No records found"));
    }

    #[test]
    fn load_failure_leaves_empty_table() {
        let svc = Memory {
            refuse: true,
            ..Memory::default()
        };
        let mut app = AppState::with_parts(&Settings::default(), Theme::dark(), Keymap::new_defaults());
        assert!(actions::load(&mut app.dashboard, &svc).is_err());
        assert!(screen(&mut app).contains("No records found"));
    }
}
