//! Library crate for user-dashboard.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, settings and update loop (`app`)
//! - Dashboard container state, form validation and CRUD flows (`dashboard`)
//! - Error and result types (`error`)
//! - In-memory search helpers (`search`)
//! - REST data service for user records (`service`)
//! - Sortable, paginated table view state (`table`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-dashboard` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod dashboard;
pub mod error;
pub mod search;
pub mod service;
pub mod table;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
