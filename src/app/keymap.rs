//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only normal-mode keys go through the keymap. Search and form input read
//! raw characters, so their editing keys (Enter, Esc, Tab, Backspace) are fixed.

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Focus the search box; the table filters on every keystroke.
    StartSearch,
    /// Open the form in "new" mode.
    NewRecord,
    /// Load the selected row into the form.
    EditSelection,
    /// Delete the selected row.
    DeleteSelection,
    MoveUp,
    MoveDown,
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    /// Step the rows-per-page selector.
    CyclePageSize,
    FocusNextColumn,
    FocusPrevColumn,
    /// Sort by the focused column, or flip its direction.
    SortFocusedColumn,
    /// Swap the focused column with its left neighbour.
    MoveColumnLeft,
    /// Swap the focused column with its right neighbour.
    MoveColumnRight,
    /// Show or hide the keybindings overlay.
    ToggleHelp,
    /// Ignore this key.
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 19] = [
    KeyAction::Quit,
    KeyAction::StartSearch,
    KeyAction::NewRecord,
    KeyAction::EditSelection,
    KeyAction::DeleteSelection,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::FirstPage,
    KeyAction::PrevPage,
    KeyAction::NextPage,
    KeyAction::LastPage,
    KeyAction::CyclePageSize,
    KeyAction::FocusNextColumn,
    KeyAction::FocusPrevColumn,
    KeyAction::SortFocusedColumn,
    KeyAction::MoveColumnLeft,
    KeyAction::MoveColumnRight,
    KeyAction::ToggleHelp,
    KeyAction::Ignore,
];

/// Canonical mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style letters for navigation, single letters for commands.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewRecord);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Enter), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('?')), KeyAction::ToggleHelp);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);

        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);
        bindings.insert((M::NONE, Char('g')), KeyAction::FirstPage);
        bindings.insert((M::NONE, Char('G')), KeyAction::LastPage);
        bindings.insert((M::NONE, Char('p')), KeyAction::CyclePageSize);

        bindings.insert((M::NONE, Tab), KeyAction::FocusNextColumn);
        // Shift+Tab arrives as BackTab, with or without SHIFT depending on the terminal
        bindings.insert((M::NONE, BackTab), KeyAction::FocusPrevColumn);
        bindings.insert((M::SHIFT, BackTab), KeyAction::FocusPrevColumn);
        bindings.insert((M::NONE, Char('s')), KeyAction::SortFocusedColumn);
        bindings.insert((M::NONE, Char('<')), KeyAction::MoveColumnLeft);
        bindings.insert((M::NONE, Char('>')), KeyAction::MoveColumnRight);

        Self { bindings }
    }

    /// Load `path`, or write the defaults there when it does not exist yet.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let p = path.as_ref();
        if p.exists() {
            return Self::from_file(p).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(p) {
            tracing::warn!(path = %p.display(), error = %e, "could not write default keybinds");
        }
        km
    }

    /// Parse `<Action> = <KeySpec>` lines on top of the defaults.
    ///
    /// Returns `None` only when the file cannot be read; unknown lines are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    /// Write every current binding, grouped by action, as a reference file.
    pub fn write_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-dashboard keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, BackTab, Up, Down, Left, Right, Home, End, PageUp, PageDown, Delete, /, <, >\n\n");

        for action in ALL_ACTIONS {
            let mut keys: Vec<String> = self
                .bindings
                .iter()
                .filter(|(_, a)| **a == action)
                .map(|((m, c), _)| Self::format_key(*m, *c))
                .collect();
            keys.sort();
            keys.dedup();
            for k in keys {
                let _ = writeln!(&mut buf, "{} = {}", format_action(action), k);
            }
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event. SHIFT is dropped for characters so `G` and `?`
    /// match regardless of how the terminal reports them.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        let mods = match key.code {
            KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        self.bindings.get(&(mods, key.code)).copied()
    }

    /// Return a snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Format a key (modifiers + code) into a human-readable spec like "Ctrl+q", "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "Home" => Home,
        "End" => End,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ALL_ACTIONS
        .into_iter()
        .find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::NewRecord => "NewRecord",
        KeyAction::EditSelection => "EditSelection",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::FirstPage => "FirstPage",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextPage => "NextPage",
        KeyAction::LastPage => "LastPage",
        KeyAction::CyclePageSize => "CyclePageSize",
        KeyAction::FocusNextColumn => "FocusNextColumn",
        KeyAction::FocusPrevColumn => "FocusPrevColumn",
        KeyAction::SortFocusedColumn => "SortFocusedColumn",
        KeyAction::MoveColumnLeft => "MoveColumnLeft",
        KeyAction::MoveColumnRight => "MoveColumnRight",
        KeyAction::ToggleHelp => "ToggleHelp",
        KeyAction::Ignore => "Ignore",
    }
}
