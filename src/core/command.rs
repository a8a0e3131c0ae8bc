//! Viewer commands, independent of the keys that trigger them.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleSidebar,
    FocusSearch,
    PageSearch,
    ClosePageSearch,
    NextSearchResult,
    PrevSearchResult,

    Custom(String),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::ToggleSidebar => "toggleSidebar",
            Command::FocusSearch => "focusSearch",
            Command::PageSearch => "pageSearch",
            Command::ClosePageSearch => "closePageSearch",
            Command::NextSearchResult => "nextSearchResult",
            Command::PrevSearchResult => "prevSearchResult",
            Command::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "toggleSidebar" => Command::ToggleSidebar,
            "focusSearch" => Command::FocusSearch,
            "pageSearch" => Command::PageSearch,
            "closePageSearch" => Command::ClosePageSearch,
            "nextSearchResult" => Command::NextSearchResult,
            "prevSearchResult" => Command::PrevSearchResult,
            other => Command::Custom(other.to_string()),
        }
    }

    /// Commands that only make sense while the in-page search bar is open.
    pub fn is_page_search_command(&self) -> bool {
        matches!(
            self,
            Command::ClosePageSearch | Command::NextSearchResult | Command::PrevSearchResult
        )
    }
}
