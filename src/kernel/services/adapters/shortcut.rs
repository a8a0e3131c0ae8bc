//! Keyboard shortcuts: an ordered table of declarative chords.
//!
//! Dispatch scans the table front to back and the first matching binding
//! wins, so user overrides are prepended rather than merged.

use super::settings::parse_keybinding;
use crate::core::event::Key;
use crate::core::{Command, Service};
use crate::kernel::services::ports::settings::KeybindingRule;
use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutScope {
    /// Always active.
    Global,
    /// Active only while the in-page search bar is open.
    PageSearch,
}

impl ShortcutScope {
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim().to_ascii_lowercase();
        match v.as_str() {
            "global" => Some(Self::Global),
            "pagesearch" | "page_search" | "searchbar" => Some(Self::PageSearch),
            _ => None,
        }
    }
}

/// A chord description.
///
/// `meta` accepts either Ctrl or Super. When `meta` is false the modifier is
/// not checked at all. Shift is strict both ways: required means pressed,
/// not required means not pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub code: KeyCode,
    pub meta: bool,
    pub shift: bool,
    pub description: String,
}

impl Shortcut {
    pub fn new(code: KeyCode, meta: bool, shift: bool, description: impl Into<String>) -> Self {
        Self {
            code,
            meta,
            shift,
            description: description.into(),
        }
    }

    pub fn matches(&self, key: &Key) -> bool {
        let meta_match = !self.meta || key.has_meta();
        let shift_match = self.shift == key.has_shift();
        meta_match && shift_match && same_key(self.code, key.code)
    }
}

fn same_key(a: KeyCode, b: KeyCode) -> bool {
    match (a, b) {
        (KeyCode::Char(x), KeyCode::Char(y)) => x.to_lowercase().eq(y.to_lowercase()),
        _ => a == b,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutBinding {
    pub shortcut: Shortcut,
    pub command: Command,
    pub scope: ShortcutScope,
}

#[derive(Debug, Clone)]
pub struct ShortcutRegistry {
    bindings: Vec<ShortcutBinding>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::with_defaults()
    }

    pub fn with_defaults() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }

    pub fn bindings(&self) -> &[ShortcutBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// First binding that matches `key` and is active in `active`.
    pub fn dispatch(&self, key: &Key, active: ShortcutScope) -> Option<&Command> {
        self.bindings
            .iter()
            .filter(|b| b.scope == ShortcutScope::Global || b.scope == active)
            .find(|b| b.shortcut.matches(key))
            .map(|b| &b.command)
    }

    /// Binding for a named command, for help text.
    pub fn find_command(&self, command: &Command) -> Option<&ShortcutBinding> {
        self.bindings.iter().find(|b| &b.command == command)
    }

    /// Prepends user rules, keeping their relative order. Rules with an
    /// unparseable key or context, or a modifier other than meta and shift,
    /// are skipped.
    pub fn apply_rules(&mut self, rules: &[KeybindingRule]) -> usize {
        let mut overrides = Vec::with_capacity(rules.len());
        for rule in rules {
            let Some(key) = parse_keybinding(&rule.key) else {
                tracing::warn!(key = %rule.key, command = %rule.command, "invalid keybinding");
                continue;
            };
            if key.modifiers.contains(KeyModifiers::ALT) {
                tracing::warn!(
                    key = %rule.key,
                    command = %rule.command,
                    "unsupported modifier in keybinding"
                );
                continue;
            }
            let scope = match rule.context.as_deref() {
                None => ShortcutScope::Global,
                Some(ctx) => match ShortcutScope::parse(ctx) {
                    Some(scope) => scope,
                    None => {
                        tracing::warn!(context = %ctx, "unknown keybinding context");
                        continue;
                    }
                },
            };
            overrides.push(ShortcutBinding {
                shortcut: Shortcut::new(key.code, key.has_meta(), key.has_shift(), &rule.command),
                command: Command::from_name(&rule.command),
                scope,
            });
        }

        let applied = overrides.len();
        self.bindings.splice(0..0, overrides);
        applied
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for ShortcutRegistry {
    fn name(&self) -> &'static str {
        "ShortcutRegistry"
    }
}

fn default_bindings() -> Vec<ShortcutBinding> {
    let bind = |code, meta, shift, description: &str, command, scope| ShortcutBinding {
        shortcut: Shortcut::new(code, meta, shift, description),
        command,
        scope,
    };

    vec![
        bind(
            KeyCode::Char('b'),
            true,
            false,
            "Toggle sidebar",
            Command::ToggleSidebar,
            ShortcutScope::Global,
        ),
        bind(
            KeyCode::Char('f'),
            true,
            true,
            "Focus search",
            Command::FocusSearch,
            ShortcutScope::Global,
        ),
        bind(
            KeyCode::Char('f'),
            true,
            false,
            "Search in page",
            Command::PageSearch,
            ShortcutScope::Global,
        ),
        bind(
            KeyCode::Esc,
            false,
            false,
            "Close page search",
            Command::ClosePageSearch,
            ShortcutScope::PageSearch,
        ),
        bind(
            KeyCode::Enter,
            false,
            false,
            "Next search result",
            Command::NextSearchResult,
            ShortcutScope::PageSearch,
        ),
        bind(
            KeyCode::Enter,
            false,
            true,
            "Previous search result",
            Command::PrevSearchResult,
            ShortcutScope::PageSearch,
        ),
    ]
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/shortcut.rs"]
mod tests;
