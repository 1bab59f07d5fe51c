//! Dashboard settings: parse/write `dashboard.conf`.
//!
//! The file uses the same `<key> = <value>` format as the theme and keybinds
//! files. Missing keys keep their defaults; command-line flags are applied on
//! top by the binary.

use std::path::Path;
use std::time::Duration;

use crate::service::DEFAULT_BASE_URL;
use crate::table::{Column, DEFAULT_PAGE_SIZES};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// REST endpoint root; `/users` is appended per request.
    pub base_url: String,
    /// Per-request timeout. A hung request fails instead of blocking forever.
    pub timeout: Duration,
    /// Rows-per-page options; the first one is selected at startup.
    pub page_sizes: Vec<usize>,
    /// Table columns in their canonical order.
    pub columns: Vec<Column>,
    /// How long a notification stays on screen.
    pub toast_duration: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            columns: Column::defaults(),
            toast_duration: Duration::from_millis(2000),
        }
    }
}

impl Settings {
    /// Load `path`, or create it with defaults when missing.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let p = path.as_ref();
        if p.exists() {
            return Self::from_file(p).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(p) {
            tracing::warn!(path = %p.display(), error = %e, "could not write default settings");
        }
        cfg
    }

    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Unknown keys and unparsable values are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if rhs.is_empty() {
                continue;
            }
            match lhs {
                "base_url" => cfg.base_url = rhs.trim_end_matches('/').to_string(),
                "timeout_secs" => {
                    if let Ok(secs) = rhs.parse::<u64>()
                        && secs > 0
                    {
                        cfg.timeout = Duration::from_secs(secs);
                    }
                }
                "page_sizes" => {
                    if let Some(sizes) = parse_page_sizes(rhs) {
                        cfg.page_sizes = sizes;
                    }
                }
                "columns" => {
                    if let Some(cols) = parse_columns(rhs) {
                        cfg.columns = cols;
                    }
                }
                "toast_ms" => {
                    if let Ok(ms) = rhs.parse::<u64>() {
                        cfg.toast_duration = Duration::from_millis(ms);
                    }
                }
                _ => {}
            }
        }
        cfg
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-dashboard settings\n");
        buf.push_str("# Command-line flags override these values.\n\n");
        let _ = writeln!(&mut buf, "base_url = {}", self.base_url);
        let _ = writeln!(&mut buf, "timeout_secs = {}", self.timeout.as_secs());
        let sizes: Vec<String> = self.page_sizes.iter().map(|n| n.to_string()).collect();
        let _ = writeln!(&mut buf, "page_sizes = {}", sizes.join(","));
        buf.push_str("# Known columns: id, name, email\n");
        let cols: Vec<&str> = self.columns.iter().map(|c| c.key.as_str()).collect();
        let _ = writeln!(&mut buf, "columns = {}", cols.join(","));
        let _ = writeln!(&mut buf, "toast_ms = {}", self.toast_duration.as_millis());
        std::fs::write(path, buf)
    }
}

/// "5, 10,15" -> [5, 10, 15]. Zero, garbage, repeats or an empty list reject the list.
pub fn parse_page_sizes(s: &str) -> Option<Vec<usize>> {
    let mut sizes: Vec<usize> = Vec::new();
    for part in s.split(',') {
        let n = part.trim().parse::<usize>().ok().filter(|n| *n > 0)?;
        if sizes.contains(&n) {
            return None;
        }
        sizes.push(n);
    }
    (!sizes.is_empty()).then_some(sizes)
}

/// "id,name" -> ID and Name columns. Unknown or repeated keys reject the list.
pub fn parse_columns(s: &str) -> Option<Vec<Column>> {
    let mut cols: Vec<Column> = Vec::new();
    for key in s.split(',') {
        let col = Column::for_key(key)?;
        if cols.iter().any(|c| c.key == col.key) {
            return None;
        }
        cols.push(col);
    }
    (!cols.is_empty()).then_some(cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_known_keys_only() {
        let cfg = Settings::parse(
            "# c\nbase_url = http://localhost:3000/\ntimeout_secs = 3\npage_sizes = 20, 50\ncolumns = id,email\ntoast_ms = 500\ncolour = blue\n",
        );
        assert_eq!(cfg.base_url, "http://localhost:3000");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
        assert_eq!(cfg.page_sizes, vec![20, 50]);
        assert_eq!(
            cfg.columns.iter().map(|c| c.key.as_str()).collect::<Vec<_>>(),
            vec!["id", "email"]
        );
        assert_eq!(cfg.toast_duration, Duration::from_millis(500));
    }

    #[test]
    fn bad_values_keep_defaults() {
        let cfg = Settings::parse("timeout_secs = 0\npage_sizes = 5,x\ncolumns = name,name\ntoast_ms = soon\n");
        assert_eq!(cfg, Settings::default());
    }

    #[test]
    fn list_parsers() {
        assert_eq!(parse_page_sizes("5,10,15"), Some(vec![5, 10, 15]));
        assert_eq!(parse_page_sizes("0"), None);
        assert_eq!(parse_page_sizes("5,5,10"), None);
        assert_eq!(parse_page_sizes(""), None);
        assert!(parse_columns("name, email").is_some());
        assert!(parse_columns("name,phone").is_none());
    }
}
