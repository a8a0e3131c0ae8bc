//! Settings file location, loading and chord parsing.
//!
//! The file lives next to the logs in the app data dir unless `MDVIEW_SETTINGS`
//! names another path.

use super::paths::get_app_data_dir;
use crate::core::event::Key;
use crate::kernel::services::ports::settings::{Settings, SettingsError};
use crossterm::event::{KeyCode, KeyModifiers};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";
const SETTINGS_ENV: &str = "MDVIEW_SETTINGS";

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("tab", KeyCode::Tab),
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    ("backspace", KeyCode::Backspace),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("space", KeyCode::Char(' ')),
];

pub fn get_settings_path() -> Option<PathBuf> {
    resolve_settings_path(std::env::var_os(SETTINGS_ENV), get_app_data_dir())
}

/// An explicit non-empty override wins over `<data dir>/settings.json`.
fn resolve_settings_path(
    override_path: Option<OsString>,
    data_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    match override_path {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => data_dir.map(|dir| dir.join(SETTINGS_FILE)),
    }
}

/// Writes default settings when no file exists yet. Returns the path.
pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings location",
        )
    })?;
    write_default_settings(&path)?;
    Ok(path)
}

pub fn write_default_settings(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&Settings::default()).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}

/// Settings from the default location. `None` when the file is missing or
/// unreadable; callers fall back to `Settings::default()`.
pub fn load_settings() -> Option<Settings> {
    let path = get_settings_path()?;
    match load_settings_from(&path) {
        Ok(settings) => Some(settings),
        Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring settings file");
            None
        }
    }
}

pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Parses `"ctrl+shift+f"`-style chords. `meta`/`cmd` map to Super, and an
/// uppercase letter implies shift.
pub fn parse_keybinding(value: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code = None;
    for part in value.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match modifier(part) {
            Some(m) => modifiers |= m,
            // Only one non-modifier part is allowed.
            None if code.is_some() => return None,
            None => code = Some(key_code(part)?),
        }
    }

    match code? {
        KeyCode::Char(ch) if ch.is_ascii_uppercase() => Some(Key::new(
            KeyCode::Char(ch.to_ascii_lowercase()),
            modifiers | KeyModifiers::SHIFT,
        )),
        code => Some(Key::new(code, modifiers)),
    }
}

fn modifier(part: &str) -> Option<KeyModifiers> {
    let m = match part.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => KeyModifiers::CONTROL,
        "shift" => KeyModifiers::SHIFT,
        "alt" | "option" => KeyModifiers::ALT,
        "super" | "meta" | "cmd" | "command" => KeyModifiers::SUPER,
        _ => return None,
    };
    Some(m)
}

fn key_code(part: &str) -> Option<KeyCode> {
    let lower = part.to_ascii_lowercase();
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(name, _)| *name == lower) {
        return Some(*code);
    }
    if let Some(n) = lower.strip_prefix('f').filter(|n| !n.is_empty()) {
        return n.parse::<u8>().ok().filter(|n| (1..=24).contains(n)).map(KeyCode::F);
    }

    let mut chars = part.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(KeyCode::Char(ch))
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
