//! Table view state: sorting, pagination and column order.
//!
//! `TableView` owns only display state. It receives the already filtered
//! records on every frame, derives a sorted, paginated, column-reordered
//! [`TableProjection`] and hands edit/delete intents back to the caller. It
//! never mutates records and never talks to the data service.
//!
use crate::service::Record;

/// Page sizes offered when the caller supplies none.
pub const DEFAULT_PAGE_SIZES: [usize; 3] = [5, 10, 15];

/// Text shown in place of data rows when nothing matches.
pub const EMPTY_STATE_TEXT: &str = "No records found";

/// A column definition: `key` names a [`Record`] field, `label` is display text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Column for a known record field, with its conventional label.
    pub fn for_key(key: &str) -> Option<Self> {
        let label = match key.trim() {
            "id" => "ID",
            "name" => "Name",
            "email" => "Email",
            _ => return None,
        };
        Some(Self::new(key.trim(), label))
    }

    /// The dashboard's canonical columns.
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("name", "Name"), Self::new("email", "Email")]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

/// Per-row controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

/// What the table asks its owner to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableIntent {
    Edit(Record),
    Delete(i64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sort: Option<SortDirection>,
    pub focused: bool,
}

impl HeaderCell {
    pub fn title(&self) -> String {
        match self.sort {
            Some(dir) => format!("{} {}", self.label, dir.indicator()),
            None => self.label.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectedRow {
    pub record: Record,
    /// Cell text in display column order.
    pub cells: Vec<String>,
}

/// Everything needed to draw one frame of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableProjection {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<ProjectedRow>,
    pub total: usize,
    pub start: usize,
    pub end: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub page_size_options: Vec<usize>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl TableProjection {
    /// True when the empty-state row should replace data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// "1 – 5 of 12"; an empty dataset reads "0 – 0 of 0".
    pub fn range_label(&self) -> String {
        if self.total == 0 {
            return "0 – 0 of 0".to_string();
        }
        format!("{} – {} of {}", self.start + 1, self.end, self.total)
    }

    /// Intent for a control on a visible row, `None` if the row is not on this page.
    pub fn intent_for(&self, row: usize, action: RowAction) -> Option<TableIntent> {
        let r = self.rows.get(row)?;
        Some(match action {
            RowAction::Edit => TableIntent::Edit(r.record.clone()),
            RowAction::Delete => TableIntent::Delete(r.record.id),
        })
    }
}

#[derive(Clone, Debug)]
pub struct TableView {
    columns: Vec<Column>,
    page_size_options: Vec<usize>,
    current_page: usize,
    items_per_page: usize,
    sort: Option<SortConfig>,
    focused_column: usize,
}

impl TableView {
    pub fn new(columns: Vec<Column>, page_size_options: &[usize]) -> Self {
        let mut options: Vec<usize> = Vec::with_capacity(page_size_options.len());
        for &n in page_size_options {
            if n > 0 && !options.contains(&n) {
                options.push(n);
            }
        }
        if options.is_empty() {
            options = DEFAULT_PAGE_SIZES.to_vec();
        }
        Self {
            columns,
            items_per_page: options[0],
            page_size_options: options,
            current_page: 1,
            sort: None,
            focused_column: 0,
        }
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn sort(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    pub fn focused_column(&self) -> usize {
        self.focused_column
    }

    // ---- sorting ----

    /// Sort by `key`: ascending first, a repeat request on an ascending key flips it.
    pub fn toggle_sort(&mut self, key: &str) {
        let direction = match &self.sort {
            Some(s) if s.key == key && s.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortConfig {
            key: key.to_string(),
            direction,
        });
    }

    /// Header activation: sorts by whichever logical column sits at `index` now.
    pub fn sort_by_display_column(&mut self, index: usize) {
        if let Some(key) = self.columns.get(index).map(|c| c.key.clone()) {
            self.toggle_sort(&key);
        }
    }

    pub fn sort_focused_column(&mut self) {
        self.sort_by_display_column(self.focused_column);
    }

    /// Stable sort of the whole dataset by the current sort config.
    pub fn sorted(&self, records: &[Record]) -> Vec<Record> {
        let mut out = records.to_vec();
        if let Some(cfg) = &self.sort {
            out.sort_by(|a, b| {
                let ord = a.field(&cfg.key).cmp(&b.field(&cfg.key));
                match cfg.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        out
    }

    // ---- pagination ----

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.items_per_page)
    }

    /// Half-open slice bounds of the current page.
    pub fn page_bounds(&self, len: usize) -> (usize, usize) {
        let start = ((self.current_page - 1) * self.items_per_page).min(len);
        let end = (start + self.items_per_page).min(len);
        (start, end)
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_forward(&self, len: usize) -> bool {
        self.current_page < self.total_pages(len)
    }

    pub fn first_page(&mut self) {
        self.current_page = 1;
    }

    pub fn prev_page(&mut self) {
        if self.can_go_back() {
            self.current_page -= 1;
        }
    }

    pub fn next_page(&mut self, len: usize) {
        if self.can_go_forward(len) {
            self.current_page += 1;
        }
    }

    pub fn last_page(&mut self, len: usize) {
        self.current_page = self.total_pages(len).max(1);
    }

    /// Pull the page back inside the dataset after it shrank.
    pub fn clamp_page(&mut self, len: usize) {
        let last = self.total_pages(len).max(1);
        if self.current_page > last {
            self.current_page = last;
        }
    }

    /// Returns false (and changes nothing) for sizes outside the configured options.
    pub fn set_items_per_page(&mut self, n: usize) -> bool {
        if !self.page_size_options.contains(&n) {
            return false;
        }
        self.items_per_page = n;
        self.current_page = 1;
        true
    }

    /// Step the page-size selector to the next option, wrapping around.
    pub fn cycle_page_size(&mut self) {
        let pos = self
            .page_size_options
            .iter()
            .position(|n| *n == self.items_per_page)
            .unwrap_or(0);
        let next = self.page_size_options[(pos + 1) % self.page_size_options.len()];
        self.set_items_per_page(next);
    }

    // ---- column order ----

    /// Take the column at `from` out and reinsert it at `to`.
    pub fn move_column(&mut self, from: usize, to: usize) {
        let n = self.columns.len();
        if from == to || from >= n || to >= n {
            return;
        }
        let col = self.columns.remove(from);
        self.columns.insert(to, col);

        let f = self.focused_column;
        self.focused_column = if f == from {
            to
        } else if from < f && f <= to {
            f - 1
        } else if to <= f && f < from {
            f + 1
        } else {
            f
        };
    }

    pub fn focus_column(&mut self, index: usize) {
        if index < self.columns.len() {
            self.focused_column = index;
        }
    }

    pub fn focus_next_column(&mut self) {
        if !self.columns.is_empty() {
            self.focused_column = (self.focused_column + 1) % self.columns.len();
        }
    }

    pub fn focus_prev_column(&mut self) {
        let n = self.columns.len();
        if n > 0 {
            self.focused_column = (self.focused_column + n - 1) % n;
        }
    }

    pub fn move_focused_column_left(&mut self) {
        if self.focused_column > 0 {
            self.move_column(self.focused_column, self.focused_column - 1);
        }
    }

    pub fn move_focused_column_right(&mut self) {
        self.move_column(self.focused_column, self.focused_column + 1);
    }

    // ---- projection ----

    /// Clamp, sort, slice and lay out `records` for display.
    pub fn project(&mut self, records: &[Record]) -> TableProjection {
        let len = records.len();
        self.clamp_page(len);
        let sorted = self.sorted(records);
        let (start, end) = self.page_bounds(len);

        let headers = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| HeaderCell {
                key: c.key.clone(),
                label: c.label.clone(),
                sort: self
                    .sort
                    .as_ref()
                    .filter(|s| s.key == c.key)
                    .map(|s| s.direction),
                focused: i == self.focused_column,
            })
            .collect();

        let rows = sorted[start..end]
            .iter()
            .map(|r| ProjectedRow {
                record: r.clone(),
                cells: self.columns.iter().map(|c| r.field_text(&c.key)).collect(),
            })
            .collect();

        TableProjection {
            headers,
            rows,
            total: len,
            start,
            end,
            current_page: self.current_page,
            total_pages: self.total_pages(len),
            items_per_page: self.items_per_page,
            page_size_options: self.page_size_options.clone(),
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(n: usize) -> Vec<Record> {
        (1..=n as i64)
            .map(|i| Record::new(i, format!("user{i:02}"), format!("u{i}@x.com")))
            .collect()
    }

    fn names(rows: &[ProjectedRow]) -> Vec<String> {
        rows.iter().map(|r| r.record.name.clone()).collect()
    }

    #[test]
    fn pages_cover_sorted_sequence_exactly_once() {
        for len in [0usize, 1, 4, 5, 6, 12, 15, 16] {
            for p in [5usize, 10, 15] {
                let data = people(len);
                let mut view = TableView::new(Column::defaults(), &[p]);
                view.toggle_sort("email");
                let expected = view.sorted(&data);

                let pages = view.total_pages(len);
                assert_eq!(pages, len.div_ceil(p));

                let mut seen = Vec::new();
                for page in 1..=pages.max(1) {
                    view.first_page();
                    for _ in 1..page {
                        view.next_page(len);
                    }
                    let proj = view.project(&data);
                    seen.extend(proj.rows.into_iter().map(|r| r.record));
                }
                assert_eq!(seen, expected, "len={len} p={p}");
            }
        }
    }

    #[test]
    fn single_page_when_page_size_exceeds_len() {
        let data = people(3);
        let mut view = TableView::new(Column::defaults(), &[10]);
        let proj = view.project(&data);
        assert_eq!(proj.total_pages, 1);
        assert_eq!(proj.rows.len(), 3);
        assert!(!proj.can_go_back);
        assert!(!proj.can_go_forward);
        assert_eq!(proj.range_label(), "1 – 3 of 3");
    }

    #[test]
    fn navigation_is_noop_at_boundaries() {
        let data = people(12);
        let mut view = TableView::new(Column::defaults(), &[5]);
        view.prev_page();
        assert_eq!(view.current_page(), 1);
        view.last_page(data.len());
        assert_eq!(view.current_page(), 3);
        view.next_page(data.len());
        assert_eq!(view.current_page(), 3);
        let proj = view.project(&data);
        assert_eq!(proj.range_label(), "11 – 12 of 12");
        view.first_page();
        view.next_page(data.len());
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn changing_page_size_resets_to_first_page() {
        let data = people(30);
        let mut view = TableView::new(Column::defaults(), &DEFAULT_PAGE_SIZES);
        view.last_page(data.len());
        assert_eq!(view.current_page(), 6);
        assert!(view.set_items_per_page(10));
        assert_eq!(view.current_page(), 1);
        assert!(!view.set_items_per_page(7));
        assert_eq!(view.items_per_page(), 10);

        view.next_page(data.len());
        view.cycle_page_size();
        assert_eq!(view.items_per_page(), 15);
        assert_eq!(view.current_page(), 1);
        view.cycle_page_size();
        assert_eq!(view.items_per_page(), 5);
    }

    #[test]
    fn shrinking_dataset_clamps_to_last_page() {
        let mut data = people(11);
        let mut view = TableView::new(Column::defaults(), &[5]);
        view.last_page(data.len());
        assert_eq!(view.current_page(), 3);
        data.pop();
        let proj = view.project(&data);
        assert_eq!(proj.current_page, 2);
        assert_eq!(names(&proj.rows), vec!["user06", "user07", "user08", "user09", "user10"]);

        let proj = view.project(&[]);
        assert_eq!(proj.current_page, 1);
        assert!(proj.is_empty());
        assert_eq!(proj.range_label(), "0 – 0 of 0");
        assert!(!proj.can_go_forward);
    }

    #[test]
    fn sort_toggles_and_resets_on_new_column() {
        let data = vec![
            Record::new(1, "Carol", "a@x.com"),
            Record::new(2, "alice", "c@x.com"),
            Record::new(3, "Bob", "b@x.com"),
        ];
        let mut view = TableView::new(Column::defaults(), &[10]);
        assert_eq!(view.sorted(&data), data);

        view.toggle_sort("name");
        let asc = view.sorted(&data);
        assert_eq!(asc.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 1, 2]);

        view.toggle_sort("name");
        assert_eq!(view.sort().map(|s| s.direction), Some(SortDirection::Descending));
        let desc = view.sorted(&data);
        assert_eq!(desc.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1, 3]);

        view.toggle_sort("name");
        assert_eq!(view.sorted(&data), asc);

        view.toggle_sort("name");
        view.toggle_sort("email");
        assert_eq!(
            view.sort(),
            Some(&SortConfig {
                key: "email".into(),
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn id_sorts_numerically_and_stably() {
        let data = vec![
            Record::new(10, "same", "a@x.com"),
            Record::new(9, "same", "b@x.com"),
            Record::new(100, "same", "c@x.com"),
        ];
        let mut view = TableView::new(Column::defaults(), &[10]);
        view.toggle_sort("id");
        let ids: Vec<i64> = view.sorted(&data).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9, 10, 100]);

        view.toggle_sort("name");
        let ids: Vec<i64> = view.sorted(&data).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 9, 100]);
    }

    #[test]
    fn sort_spans_full_dataset_not_just_page() {
        let data = people(12);
        let mut view = TableView::new(Column::defaults(), &[5]);
        view.toggle_sort("id");
        view.toggle_sort("id");
        let proj = view.project(&data);
        assert_eq!(proj.rows[0].record.id, 12);
    }

    #[test]
    fn move_column_shifts_intervening_columns() {
        let cols = vec![
            Column::new("id", "ID"),
            Column::new("name", "Name"),
            Column::new("email", "Email"),
        ];
        let mut view = TableView::new(cols, &[5]);
        view.move_column(0, 2);
        let keys: Vec<&str> = view.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "email", "id"]);
        assert_eq!(view.focused_column(), 2);

        view.move_column(2, 0);
        let keys: Vec<&str> = view.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "name", "email"]);

        view.move_column(1, 9);
        view.move_column(1, 1);
        let keys: Vec<&str> = view.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "name", "email"]);
    }

    #[test]
    fn reordering_keeps_sort_bound_to_logical_column() {
        let data = vec![Record::new(1, "b", "a@x.com"), Record::new(2, "a", "b@x.com")];
        let mut view = TableView::new(Column::defaults(), &[5]);
        view.move_column(0, 1);
        // "name" now sits at display index 1
        view.sort_by_display_column(1);
        assert_eq!(view.sort().map(|s| s.key.as_str()), Some("name"));

        let proj = view.project(&data);
        assert_eq!(proj.headers[0].title(), "Email");
        assert_eq!(proj.headers[1].title(), "Name ▲");
        assert_eq!(proj.rows[0].cells, vec!["b@x.com".to_string(), "a".to_string()]);
    }

    #[test]
    fn focused_column_follows_keyboard_moves() {
        let mut view = TableView::new(Column::defaults(), &[5]);
        view.move_focused_column_left();
        assert_eq!(view.focused_column(), 0);
        view.move_focused_column_right();
        assert_eq!(view.focused_column(), 1);
        assert_eq!(view.columns()[1].key, "name");
        view.focus_next_column();
        assert_eq!(view.focused_column(), 0);
        view.focus_prev_column();
        assert_eq!(view.focused_column(), 1);
        view.sort_focused_column();
        assert_eq!(view.sort().map(|s| s.key.as_str()), Some("name"));
    }

    #[test]
    fn intents_carry_row_or_id() {
        let data = people(7);
        let mut view = TableView::new(Column::defaults(), &[5]);
        view.next_page(data.len());
        let proj = view.project(&data);
        assert_eq!(proj.intent_for(1, RowAction::Delete), Some(TableIntent::Delete(7)));
        assert_eq!(
            proj.intent_for(0, RowAction::Edit),
            Some(TableIntent::Edit(data[5].clone()))
        );
        assert_eq!(proj.intent_for(2, RowAction::Edit), None);
    }

    #[test]
    fn repeated_page_sizes_collapse_and_cycle_reaches_every_option() {
        let mut view = TableView::new(Column::defaults(), &[5, 5, 0, 10, 5]);
        assert_eq!(view.page_size_options(), &[5, 10]);
        view.cycle_page_size();
        assert_eq!(view.items_per_page(), 10);
        view.cycle_page_size();
        assert_eq!(view.items_per_page(), 5);
    }

    #[test]
    fn bad_page_size_options_fall_back_to_defaults() {
        let view = TableView::new(Column::defaults(), &[0]);
        assert_eq!(view.page_size_options(), &DEFAULT_PAGE_SIZES);
        assert_eq!(view.items_per_page(), 5);
        assert_eq!(Column::for_key(" id ").map(|c| c.label), Some("ID".to_string()));
        assert_eq!(Column::for_key("phone"), None);
    }
}
