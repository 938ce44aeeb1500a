//! Event types for the TUI
//!
//! This module implements a dual-channel event architecture:
//! - InputEvent: Priority channel for user input (never dropped)
//! - DataEvent: Gateway completions reported back to the controller

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

use crate::gateway::GatewayError;
use crate::models::{JobId, JobPosting, RecommendedJobPosting};

/// Input events from the terminal (priority channel - never dropped)
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Keyboard input
    Key(KeyEvent),
    /// Mouse input
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Slices of screen data that are fetched independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    ExternalJobs,
    Recommendations,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::ExternalJobs => write!(f, "external jobs"),
            DataSource::Recommendations => write!(f, "recommendations"),
        }
    }
}

/// Results of gateway calls spawned by the controller.
///
/// List results carry the generation they were issued under so the
/// controller can drop responses that a newer fetch has superseded.
#[derive(Debug)]
pub enum DataEvent {
    ExternalJobsLoaded {
        generation: u64,
        result: Result<Vec<JobPosting>, GatewayError>,
    },

    RecommendationsLoaded {
        generation: u64,
        result: Result<Vec<RecommendedJobPosting>, GatewayError>,
    },

    /// Scrape acknowledged or failed
    ScrapeFinished(Result<Option<String>, GatewayError>),

    /// Single enable/disable completed
    ToggleFinished {
        id: JobId,
        enabled: bool,
        result: Result<Option<String>, GatewayError>,
    },

    /// Bulk enable completed for the ids that were selected when it was issued
    BulkEnableFinished {
        ids: Vec<JobId>,
        result: Result<Option<String>, GatewayError>,
    },

    /// Periodic tick used to expire notifications
    Tick,
}

/// Result of processing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue running, UI needs redraw
    Continue,
    /// Continue running, no UI change needed
    Unchanged,
    /// Quit the application
    Quit,
}

/// Key action mappings for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    PageUp,
    PageDown,

    // Tabs
    SwitchToExternal,
    SwitchToRecommended,
    NextTab,

    // Actions
    Select,
    Preview,
    ToggleSelection,
    Enable,
    Disable,
    BulkEnable,
    Scrape,
    Refresh,
    OpenSourceFilter,
    QuickSearch,
    CopyApplyUrl,
    Apply,

    // UI
    ShowHelp,
    Escape,
    Quit,

    // Search input mode
    SearchClear,
    SearchBackspace,
    SearchChar(char),

    // Mouse actions
    MouseClick { row: u16, column: u16 },
    MouseScrollUp,
    MouseScrollDown,

    // Unknown/unhandled
    Unknown,
}

impl KeyAction {
    /// Map a mouse event to an action
    pub fn from_mouse_event(event: MouseEvent) -> Self {
        use crossterm::event::{MouseButton, MouseEventKind};

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => KeyAction::MouseClick {
                row: event.row,
                column: event.column,
            },
            MouseEventKind::ScrollUp => KeyAction::MouseScrollUp,
            MouseEventKind::ScrollDown => KeyAction::MouseScrollDown,
            _ => KeyAction::Unknown,
        }
    }

    /// Map a key event to an action based on current mode
    pub fn from_key_event(event: KeyEvent, in_search_mode: bool) -> Self {
        let KeyEvent {
            code, modifiers, ..
        } = event;

        // Search input has its own mappings so every printable key is text
        if in_search_mode {
            return match code {
                KeyCode::Esc => KeyAction::Escape,
                KeyCode::Enter => KeyAction::Select,
                KeyCode::Backspace => KeyAction::SearchBackspace,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
                KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                    KeyAction::SearchClear
                }
                KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Unknown,
                KeyCode::Char(c) => KeyAction::SearchChar(c),
                _ => KeyAction::Unknown,
            };
        }

        match code {
            KeyCode::Char('q') => KeyAction::Quit,

            // Ctrl+ combinations must come before bare character matches
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::PageDown,
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::PageUp,

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => KeyAction::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => KeyAction::MoveUp,
            KeyCode::Char('g') | KeyCode::Home => KeyAction::MoveToTop,
            KeyCode::Char('G') | KeyCode::End => KeyAction::MoveToBottom,
            KeyCode::PageDown => KeyAction::PageDown,
            KeyCode::PageUp => KeyAction::PageUp,

            // Tabs
            KeyCode::Char('1') => KeyAction::SwitchToExternal,
            KeyCode::Char('2') => KeyAction::SwitchToRecommended,
            KeyCode::Tab => KeyAction::NextTab,

            // Actions
            KeyCode::Enter => KeyAction::Select,
            KeyCode::Char('p') => KeyAction::Preview,
            KeyCode::Char(' ') => KeyAction::ToggleSelection,
            KeyCode::Char('e') => KeyAction::Enable,
            KeyCode::Char('d') => KeyAction::Disable,
            KeyCode::Char('b') => KeyAction::BulkEnable,
            KeyCode::Char('S') => KeyAction::Scrape,
            KeyCode::Char('r') | KeyCode::F(5) => KeyAction::Refresh,
            KeyCode::Char('f') => KeyAction::OpenSourceFilter,
            KeyCode::Char('/') => KeyAction::QuickSearch,
            KeyCode::Char('y') => KeyAction::CopyApplyUrl,
            KeyCode::Char('a') => KeyAction::Apply,

            // Help
            KeyCode::Char('?') | KeyCode::F(1) => KeyAction::ShowHelp,
            KeyCode::Esc => KeyAction::Escape,

            _ => KeyAction::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_key_action_quit() {
        assert_eq!(KeyAction::from_key_event(key('q'), false), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(ctrl_c, false), KeyAction::Quit);
    }

    #[test]
    fn test_key_action_navigation() {
        assert_eq!(KeyAction::from_key_event(key('j'), false), KeyAction::MoveDown);
        assert_eq!(KeyAction::from_key_event(key('k'), false), KeyAction::MoveUp);
        assert_eq!(KeyAction::from_key_event(key('G'), false), KeyAction::MoveToBottom);
    }

    #[test]
    fn test_key_action_job_actions() {
        assert_eq!(KeyAction::from_key_event(key(' '), false), KeyAction::ToggleSelection);
        assert_eq!(KeyAction::from_key_event(key('e'), false), KeyAction::Enable);
        assert_eq!(KeyAction::from_key_event(key('d'), false), KeyAction::Disable);
        assert_eq!(KeyAction::from_key_event(key('b'), false), KeyAction::BulkEnable);
        assert_eq!(KeyAction::from_key_event(key('S'), false), KeyAction::Scrape);
        assert_eq!(KeyAction::from_key_event(key('s'), false), KeyAction::Unknown);
    }

    #[test]
    fn test_search_mode_captures_text() {
        // Keys that are actions in normal mode are plain text while searching
        assert_eq!(KeyAction::from_key_event(key('q'), true), KeyAction::SearchChar('q'));
        assert_eq!(KeyAction::from_key_event(key('e'), true), KeyAction::SearchChar('e'));

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(ctrl_u, true), KeyAction::SearchClear);
        assert_eq!(KeyAction::from_key_event(ctrl_u, false), KeyAction::PageUp);
    }

    #[test]
    fn test_search_mode_control_keys_are_not_text() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(ctrl_c, true), KeyAction::Quit);

        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(ctrl_d, true), KeyAction::Unknown);

        // Shifted capitals still type
        let shift_a = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(KeyAction::from_key_event(shift_a, true), KeyAction::SearchChar('A'));
    }
}
