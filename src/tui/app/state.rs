//! Application state types for the TUI
//!
//! This module contains all the state management types:
//! - Tab and screen phase
//! - Modal states (Help, Search, SourcePicker, Preview)
//! - Selection and navigation state (ListState, Selection)
//! - Screen data with generation tracking (ScreenState)
//! - Feedback state for notifications

use std::collections::BTreeSet;

use crate::models::{JobId, JobPosting, JobSource, RecommendedJobPosting};

use super::types::{DataSlice, Notification};

// ============================================================================
// Tabs and Phase
// ============================================================================

/// Active table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    External,
    Recommended,
}

impl Tab {
    #[must_use]
    pub fn next(&self) -> Self {
        match self {
            Tab::External => Tab::Recommended,
            Tab::Recommended => Tab::External,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Tab::External => "External Jobs",
            Tab::Recommended => "Recommended",
        }
    }
}

/// Lifecycle of the screen, derived from what is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    /// Nothing requested yet
    Initial,
    /// At least one list fetch outstanding
    Loading,
    /// Scrape request outstanding
    Scraping,
    Ready,
}

// ============================================================================
// List Navigation State
// ============================================================================

/// List state with selection and scroll tracking
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
    pub scroll_offset: usize,
    pub visible_count: usize,
}

impl ListState {
    pub fn clamp(&mut self, list_len: usize) {
        if list_len == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
        } else {
            self.selected = self.selected.min(list_len - 1);
            if self.selected < self.scroll_offset {
                self.scroll_offset = self.selected;
            } else if self.visible_count > 0
                && self.selected >= self.scroll_offset + self.visible_count
            {
                self.scroll_offset = self.selected.saturating_sub(self.visible_count - 1);
            }
        }
    }

    pub fn move_up(&mut self, list_len: usize) {
        if self.selected > 0 {
            self.selected -= 1;
            self.clamp(list_len);
        }
    }

    pub fn move_down(&mut self, list_len: usize) {
        if list_len > 0 && self.selected < list_len - 1 {
            self.selected += 1;
            self.clamp(list_len);
        }
    }

    pub fn move_to_top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn move_to_bottom(&mut self, list_len: usize) {
        if list_len > 0 {
            self.selected = list_len - 1;
            if self.visible_count > 0 {
                self.scroll_offset = list_len.saturating_sub(self.visible_count);
            }
        }
    }

    pub fn page_up(&mut self, list_len: usize) {
        let jump = self.visible_count.max(1) / 2;
        self.selected = self.selected.saturating_sub(jump);
        self.clamp(list_len);
    }

    pub fn page_down(&mut self, list_len: usize) {
        let jump = self.visible_count.max(1) / 2;
        self.selected = self.selected.saturating_add(jump);
        self.clamp(list_len);
    }
}

// ============================================================================
// Bulk Selection
// ============================================================================

/// Job ids picked for bulk-enable. Survives filter, search and tab changes.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: BTreeSet<JobId>,
}

impl Selection {
    /// Toggle `job`. Enabled jobs are refused; returns whether the job is now selected.
    pub fn toggle(&mut self, job: &JobPosting) -> bool {
        if self.ids.remove(&job.id) {
            return false;
        }
        if !job.is_selectable() {
            return false;
        }
        self.ids.insert(job.id.clone())
    }

    #[must_use]
    pub fn contains(&self, id: &JobId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in stable order
    #[must_use]
    pub fn ids(&self) -> Vec<JobId> {
        self.ids.iter().cloned().collect()
    }

    /// Drop the given ids, keeping anything selected after they were sent
    pub fn remove_all(&mut self, ids: &[JobId]) {
        for id in ids {
            self.ids.remove(id);
        }
    }
}

// ============================================================================
// Modal State
// ============================================================================

/// The job a preview was opened on
#[derive(Debug, Clone)]
pub enum PreviewTarget {
    External(JobPosting),
    Recommended(RecommendedJobPosting),
}

impl PreviewTarget {
    #[must_use]
    pub fn job(&self) -> &JobPosting {
        match self {
            PreviewTarget::External(job) => job,
            PreviewTarget::Recommended(rec) => &rec.job,
        }
    }

    #[must_use]
    pub fn match_score(&self) -> Option<u8> {
        match self {
            PreviewTarget::External(_) => None,
            PreviewTarget::Recommended(rec) => Some(rec.match_score),
        }
    }
}

/// Options in the source picker: index 0 is "all", then the filterable sources
pub const SOURCE_PICKER_LEN: usize = JobSource::FILTERABLE.len() + 1;

/// Source picker choice at `index`
#[must_use]
pub fn source_picker_choice(index: usize) -> Option<JobSource> {
    index
        .checked_sub(1)
        .and_then(|i| JobSource::FILTERABLE.get(i).cloned())
}

/// Picker row that corresponds to the active filter
#[must_use]
pub fn source_picker_index(source: Option<&JobSource>) -> usize {
    source
        .and_then(|s| JobSource::FILTERABLE.iter().position(|f| f == s))
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Modal overlay state - only one modal can be active at a time.
///
/// The search overlay edits the live search string; `previous` is restored
/// when the edit is abandoned with Esc.
#[derive(Debug, Default)]
pub enum ModalState {
    #[default]
    None,
    Help,
    Search {
        previous: String,
    },
    SourcePicker {
        selected: usize,
    },
    Preview {
        target: PreviewTarget,
    },
}

impl ModalState {
    /// Check if any modal is currently active
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, ModalState::None)
    }

    /// Check if currently typing into the search box
    #[must_use]
    pub fn is_editing_search(&self) -> bool {
        matches!(self, ModalState::Search { .. })
    }

    /// Get the preview target if a preview is open
    #[must_use]
    pub fn preview(&self) -> Option<&PreviewTarget> {
        match self {
            ModalState::Preview { target } => Some(target),
            _ => None,
        }
    }
}

// ============================================================================
// Screen State
// ============================================================================

/// Everything the controller has loaded or the user has chosen
#[derive(Debug, Default)]
pub struct ScreenState {
    pub external: DataSlice<JobPosting>,
    pub recommended: DataSlice<RecommendedJobPosting>,
    pub source_filter: Option<JobSource>,
    pub search: String,
    pub selection: Selection,
    /// Scrape request outstanding
    pub scraping: bool,
}

impl ScreenState {
    #[must_use]
    pub fn phase(&self) -> ScreenPhase {
        if self.scraping {
            ScreenPhase::Scraping
        } else if self.external.is_loading() || self.recommended.is_loading() {
            ScreenPhase::Loading
        } else if self.external.generation() == 0 && self.recommended.generation() == 0 {
            ScreenPhase::Initial
        } else {
            ScreenPhase::Ready
        }
    }
}

// ============================================================================
// Feedback State
// ============================================================================

/// Transient notifications plus configuration warnings from startup
#[derive(Debug, Default)]
pub struct FeedbackState {
    notification: Option<Notification>,
    pub config_warnings: Vec<String>,
}

impl FeedbackState {
    pub fn new(config_warnings: Vec<String>) -> Self {
        Self {
            notification: None,
            config_warnings,
        }
    }

    /// Replace the current notification
    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Current notification if it is still within its display window
    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_visible())
    }

    /// Last notification regardless of age
    #[must_use]
    pub fn last(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Drop a notification whose display window has passed. Returns true if one was dropped.
    pub fn expire(&mut self) -> bool {
        if self.notification.as_ref().is_some_and(|n| !n.is_visible()) {
            self.notification = None;
            true
        } else {
            false
        }
    }
}
