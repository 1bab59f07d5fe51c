//! Dashboard container state.
//!
//! `DashboardState` is the source of truth for the record collection, the
//! search term and the form. Every change goes through a small transition
//! (`apply_search`, `apply_create`, `apply_update`, `apply_delete`) so the UI
//! can re-render from the value and tests can drive it without a terminal.
//! Optimistic transitions return a [`Mutation`] that [`DashboardState::revert`]
//! undoes when the remote call fails.
//!
pub mod actions;
pub mod form;

use tracing::warn;

use crate::search;
use crate::service::Record;
use form::{FormState, FormValues};

/// A local change that can still be compensated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Updated { previous: Record },
    Deleted { index: usize, record: Record },
}

#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    records: Vec<Record>,
    search_term: String,
    pub form: FormState,
    load_error: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub(crate) fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.load_error = None;
    }

    pub(crate) fn set_load_error(&mut self, message: String) {
        self.load_error = Some(message);
    }

    pub fn apply_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// The view handed to the table, recomputed from scratch on every call.
    pub fn filtered(&self) -> Vec<Record> {
        search::filter_records(&self.records, &self.search_term)
    }

    pub fn begin_edit(&mut self, record: &Record) {
        self.form.begin_edit(record);
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    /// One past the largest id in use; never a length-based guess.
    pub fn next_local_id(&self) -> i64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0).max(0) + 1
    }

    /// Append a record the server accepted. The server id wins unless it is
    /// missing or already taken locally.
    pub fn apply_create(&mut self, server_id: i64, values: &FormValues) -> Record {
        let id = if server_id > 0 && !self.records.iter().any(|r| r.id == server_id) {
            server_id
        } else {
            let local = self.next_local_id();
            warn!(server_id, local, "server id unusable, assigning local id");
            local
        };
        let record = Record::new(id, values.name.clone(), values.email.clone());
        self.records.push(record.clone());
        record
    }

    pub fn apply_update(&mut self, id: i64, values: &FormValues) -> Option<Mutation> {
        let rec = self.records.iter_mut().find(|r| r.id == id)?;
        let previous = rec.clone();
        rec.name = values.name.clone();
        rec.email = values.email.clone();
        Some(Mutation::Updated { previous })
    }

    pub fn apply_delete(&mut self, id: i64) -> Option<Mutation> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let record = self.records.remove(index);
        Some(Mutation::Deleted { index, record })
    }

    /// Undo a mutation returned by `apply_update` or `apply_delete`.
    pub fn revert(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Updated { previous } => {
                if let Some(rec) = self.records.iter_mut().find(|r| r.id == previous.id) {
                    *rec = previous;
                }
            }
            Mutation::Deleted { index, record } => {
                if self.records.iter().any(|r| r.id == record.id) {
                    return;
                }
                let at = index.min(self.records.len());
                self.records.insert(at, record);
            }
        }
    }
}
