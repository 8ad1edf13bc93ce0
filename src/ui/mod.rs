//! Terminal user interface for toolhub.

pub mod markdown;
pub mod tui;

/// What should happen when the UI exits its run loop.
#[derive(Debug, Clone)]
pub enum UiExitAction {
    Quit,
}
