//! Service ports: traits + data contracts.

pub mod search;
pub mod settings;

pub use search::{ContentSearch, GrepResult, SearchError, SearchRequest, SearchResponse};
pub use settings::{KeybindingRule, SearchSettings, Settings, SettingsError};
