//! User configuration: motion preferences and keybindings.
//!
//! Settings are read from a simple key-value text file at
//! `$XDG_CONFIG_HOME/page-motion/config.toml` (default
//! `~/.config/page-motion/config.toml`).  The file is only ever read; CLI
//! flags are layered on top in `main`.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::policy::DEFAULT_BREAKPOINT_COLS;

pub const DEFAULT_FPS: u32 = 60;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    TiltUp,
    TiltDown,
    TiltLeft,
    TiltRight,
    ToggleNav,
    Quit,
}

impl Action {
    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "scroll_up" => Some(Action::ScrollUp),
            "scroll_down" => Some(Action::ScrollDown),
            "page_up" => Some(Action::PageUp),
            "page_down" => Some(Action::PageDown),
            "top" => Some(Action::Top),
            "bottom" => Some(Action::Bottom),
            "tilt_up" => Some(Action::TiltUp),
            "tilt_down" => Some(Action::TiltDown),
            "tilt_left" => Some(Action::TiltLeft),
            "tilt_right" => Some(Action::TiltRight),
            "toggle_nav" => Some(Action::ToggleNav),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding, key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Ctrl+c"`, `"←"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"PageDown"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Keep the original case for single characters ("G" != "g").
            s if s.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration as loaded from disk.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Ask for reduced motion regardless of the CLI flag.
    pub reduced_motion: bool,
    /// Whether the pointer device can hover.
    pub hover: bool,
    /// Target frame rate of the scheduler.
    pub fps: u32,
    /// Terminal width (columns) below which the narrow layout is used.
    pub breakpoint_cols: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            reduced_motion: false,
            hover: true,
            fps: DEFAULT_FPS,
            breakpoint_cols: DEFAULT_BREAKPOINT_COLS,
        }
    }
}

impl AppConfig {
    /// Built-in bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]);
        m.insert(Action::PageDown, vec![KeyBind::new(KeyCode::PageDown, n)]);
        m.insert(Top, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(Bottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(TiltUp, vec![KeyBind::new(Up, n)]);
        m.insert(TiltDown, vec![KeyBind::new(Down, n)]);
        m.insert(TiltLeft, vec![KeyBind::new(Left, n)]);
        m.insert(TiltRight, vec![KeyBind::new(Right, n)]);
        m.insert(ToggleNav, vec![KeyBind::new(Char('m'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When several bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}{}{}{}: tilt | {}: menu | {}: quit",
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::TiltLeft),
            self.short_binding(Action::TiltUp),
            self.short_binding(Action::TiltDown),
            self.short_binding(Action::TiltRight),
            self.short_binding(Action::ToggleNav),
            self.short_binding(Action::Quit),
        )
    }

    // ── loading ─────────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "config loaded");
                Self::parse(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    /// Parse config text.  Unknown keys and malformed values are skipped.
    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line, "config line without '='");
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "reduced_motion" => {
                    config.reduced_motion = value == "true";
                    continue;
                }
                "hover" => {
                    config.hover = value != "false";
                    continue;
                }
                "fps" => {
                    match value.parse::<u32>() {
                        Ok(v) => config.fps = v.clamp(15, 144),
                        Err(_) => tracing::warn!(value, "ignoring fps"),
                    }
                    continue;
                }
                "breakpoint_cols" => {
                    match value.parse::<u16>() {
                        Ok(v) => config.breakpoint_cols = v.clamp(40, 200),
                        Err(_) => tracing::warn!(value, "ignoring breakpoint_cols"),
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::warn!(key, "unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/page-motion/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("page-motion").join("config.toml")
}
