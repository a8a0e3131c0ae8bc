//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod paths;
pub mod search;
pub mod settings;
pub mod shortcut;

pub use paths::{ensure_log_dir, get_app_data_dir, get_log_dir};
pub use search::{GrepService, SearchSessionDriver};
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from, parse_keybinding,
};
pub use shortcut::{Shortcut, ShortcutBinding, ShortcutRegistry, ShortcutScope};
