//! Remote data service for user records.
//!
//! `UserService` is the seam the dashboard talks to; `HttpUserService` is the
//! production implementation backed by a blocking `reqwest` client.
//!
use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use crate::error::ServiceError;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// A user record as exchanged with the API. Extra JSON fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Typed view of a single record field, ordered the way the table sorts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue<'a> {
    Int(i64),
    Text(&'a str),
}

impl std::fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl Record {
    pub const FIELDS: [&'static str; 3] = ["id", "name", "email"];

    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "id" => Some(FieldValue::Int(self.id)),
            "name" => Some(FieldValue::Text(&self.name)),
            "email" => Some(FieldValue::Text(&self.email)),
            _ => None,
        }
    }

    /// Display string for a column; unknown keys render empty.
    pub fn field_text(&self, key: &str) -> String {
        self.field(key).map(|v| v.to_string()).unwrap_or_default()
    }
}

/// The four REST operations the dashboard relies on.
pub trait UserService {
    fn list(&self) -> Result<Vec<Record>, ServiceError>;
    fn create(&self, record: &Record) -> Result<Record, ServiceError>;
    fn update(&self, id: i64, record: &Record) -> Result<Record, ServiceError>;
    fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpUserService {
    base_url: String,
    http: HttpClient,
}

impl HttpUserService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(ServiceError::Client)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: i64) -> String {
        format!("{}/users/{id}", self.base_url)
    }
}

impl UserService for HttpUserService {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    fn list(&self) -> Result<Vec<Record>, ServiceError> {
        let url = self.users_url();
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|source| send_error(&url, source))?;
        let records: Vec<Record> = decode(check_status(&url, response)?, &url)?;
        debug!(count = records.len(), "listed users");
        Ok(records)
    }

    #[instrument(skip(self, record), fields(name = %record.name))]
    fn create(&self, record: &Record) -> Result<Record, ServiceError> {
        let url = self.users_url();
        let response = self
            .http
            .post(&url)
            .json(record)
            .send()
            .map_err(|source| send_error(&url, source))?;
        decode(check_status(&url, response)?, &url)
    }

    #[instrument(skip(self, record))]
    fn update(&self, id: i64, record: &Record) -> Result<Record, ServiceError> {
        let url = self.user_url(id);
        let response = self
            .http
            .put(&url)
            .json(record)
            .send()
            .map_err(|source| send_error(&url, source))?;
        decode(check_status(&url, response)?, &url)
    }

    #[instrument(skip(self))]
    fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let url = self.user_url(id);
        let response = self
            .http
            .delete(&url)
            .send()
            .map_err(|source| send_error(&url, source))?;
        check_status(&url, response)?;
        Ok(())
    }
}

fn send_error(url: &str, source: reqwest::Error) -> ServiceError {
    let url = url.to_owned();
    if source.is_timeout() {
        ServiceError::Timeout { url, source }
    } else {
        ServiceError::Connect { url, source }
    }
}

fn check_status(url: &str, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ServiceError::Status {
        url: url.to_owned(),
        status: status.as_u16(),
        body,
    })
}

fn decode<T: serde::de::DeserializeOwned>(response: Response, url: &str) -> Result<T, ServiceError> {
    response.json().map_err(|source| {
        let url = url.to_owned();
        // a body that stalls mid-read is a timeout, not a bad payload
        if source.is_timeout() {
            ServiceError::Timeout { url, source }
        } else {
            ServiceError::Decode { url, source }
        }
    })
}
