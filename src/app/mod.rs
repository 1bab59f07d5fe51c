//! Application state types and entry glue.
//!
//! `AppState` bundles the dashboard container, the table view state and the
//! terminal-only concerns (input mode, theme, keymap, notifications, mouse hit
//! areas). The event loop lives in [`update`] and is re-exported as `run`.
//!
pub mod keymap;
pub mod settings;
pub mod toast;
pub mod update;

use std::path::{Path, PathBuf};
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::dashboard::DashboardState;
use crate::dashboard::form::FormField;
use crate::table::{TableProjection, TableView};
use keymap::Keymap;
use settings::Settings;
use toast::Toasts;

pub const APP_NAME: &str = "user-dashboard";

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub focus: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            focus: Color::Magenta,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            focus: Color::Rgb(0xf5, 0xc2, 0xe7),        // pink
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key.trim() {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "focus" => theme.focus = color,
                "success" => theme.success = color,
                "error" => theme.error = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the special name "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-dashboard theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("focus", self.focus);
        kv("success", self.success);
        kv("error", self.error);

        std::fs::write(path, buf)
    }

    /// Load `path`, writing the `mocha` defaults there first if it is missing.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let p = path.as_ref();
        if p.exists() {
            return Self::from_file(p).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(p) {
            tracing::warn!(path = %p.display(), error = %e, "could not write default theme");
        }
        t
    }
}

/// Screen regions recorded while drawing, used to map mouse events back to the table.
#[derive(Clone, Debug, Default)]
pub struct HitAreas {
    /// One rect per header cell, in display order.
    pub headers: Vec<Rect>,
    /// Area holding the data rows (below the header).
    pub rows: Rect,
}

pub struct AppState {
    pub started_at: Instant,
    pub dashboard: DashboardState,
    pub table: TableView,
    /// Selected row, relative to the current page.
    pub selected_row: usize,
    pub input_mode: InputMode,
    pub form_field: FormField,
    pub theme: Theme,
    pub keymap: Keymap,
    pub toasts: Toasts,
    pub hits: HitAreas,
    /// Header index where a mouse drag started.
    pub drag_from: Option<usize>,
    pub base_url: String,
    pub should_quit: bool,
}

impl AppState {
    /// Build state from settings with an explicit theme and keymap (no file access).
    pub fn with_parts(settings: &Settings, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            dashboard: DashboardState::new(),
            table: TableView::new(settings.columns.clone(), &settings.page_sizes),
            selected_row: 0,
            input_mode: InputMode::Normal,
            form_field: FormField::Name,
            theme,
            keymap,
            toasts: Toasts::new(settings.toast_duration),
            hits: HitAreas::default(),
            drag_from: None,
            base_url: settings.base_url.clone(),
            should_quit: false,
        }
    }

    /// Build state loading `theme.conf` and `keybinds.conf` from `config_dir`.
    pub fn new(settings: &Settings, config_dir: &Path) -> Self {
        let theme = Theme::load_or_init(config_dir.join("theme.conf"));
        let keymap = Keymap::load_or_init(config_dir.join("keybinds.conf"));
        Self::with_parts(settings, theme, keymap)
    }

    /// Current table frame for the filtered records. Also keeps the row
    /// selection inside the visible page.
    pub fn projection(&mut self) -> TableProjection {
        let filtered = self.dashboard.filtered();
        let proj = self.table.project(&filtered);
        self.selected_row = self.selected_row.min(proj.rows.len().saturating_sub(1));
        proj
    }
}

/// Default directory for settings, theme, keybinds and the log file.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
