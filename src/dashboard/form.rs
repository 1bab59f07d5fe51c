//! Create/edit form state and client-side validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::service::Record;

pub const NAME_REQUIRED: &str = "Name is required.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Email is invalid.";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Name,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    New,
    Edit,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub email: String,
}

impl FormValues {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: FormValues,
    pub errors: FormErrors,
    pub mode: FormMode,
    pub edit_target: Option<i64>,
}

impl FormState {
    /// Load `record` into the form for editing; previous errors are dropped.
    pub fn begin_edit(&mut self, record: &Record) {
        self.values = FormValues {
            name: record.name.clone(),
            email: record.email.clone(),
        };
        self.errors = FormErrors::default();
        self.mode = FormMode::Edit;
        self.edit_target = Some(record.id);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.values.name,
            FormField::Email => &self.values.email,
        }
    }

    pub fn error(&self, field: FormField) -> Option<&'static str> {
        match field {
            FormField::Name => self.errors.name,
            FormField::Email => self.errors.email,
        }
    }

    /// Replace a value; editing a field clears its error.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        match field {
            FormField::Name => {
                self.values.name = value.into();
                self.errors.name = None;
            }
            FormField::Email => {
                self.values.email = value.into();
                self.errors.email = None;
            }
        }
    }

    pub fn push_char(&mut self, field: FormField, c: char) {
        let mut v = self.value(field).to_string();
        v.push(c);
        self.set_field(field, v);
    }

    pub fn pop_char(&mut self, field: FormField) {
        let mut v = self.value(field).to_string();
        v.pop();
        self.set_field(field, v);
    }

    /// Recompute errors from the current values. Returns true when the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_values(&self.values);
        self.errors.is_empty()
    }
}

pub fn validate_values(values: &FormValues) -> FormErrors {
    let name = values.name.trim();
    let email = values.email.trim();
    FormErrors {
        name: name.is_empty().then_some(NAME_REQUIRED),
        email: if email.is_empty() {
            Some(EMAIL_REQUIRED)
        } else if !is_valid_email(email) {
            Some(EMAIL_INVALID)
        } else {
            None
        },
    }
}

/// Loose `local@domain.tld` check, unanchored.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}
