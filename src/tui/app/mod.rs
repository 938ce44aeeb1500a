//! Application state and core logic for the TUI
//!
//! This module contains the main App struct: the jobs screen controller.
//! The architecture follows a TEA-inspired pattern with mutable state and
//! method-based updates. Gateway calls run as spawned tasks and report back
//! through the data channel, so the event loop never blocks on the network.

// Submodules
pub mod filter;
mod state;
mod types;

// Re-export public types
pub use filter::{JobStats, ScoreBand};
pub use state::{
    FeedbackState, ListState, ModalState, PreviewTarget, ScreenPhase, ScreenState, Selection,
    SOURCE_PICKER_LEN, Tab, source_picker_choice, source_picker_index,
};
pub use types::{DataSlice, Notification, Severity, SliceStatus};

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::gateway::{GatewayError, JobGateway};
use crate::models::{AppConfig, JobId, JobPosting, JobSource, RecommendedJobPosting};
use crate::tui::event::{DataEvent, DataSource, EventResult, InputEvent, KeyAction};

const DEFAULT_SCRAPE_MESSAGE: &str = "Successfully scraped external jobs";
const DEFAULT_BULK_MESSAGE: &str = "Jobs enabled successfully";

/// First terminal row of table data (stats bar, controls, table border and header)
const CONTENT_START: u16 = 9;

/// Rows taken by the status bar at the bottom
pub const STATUS_HEIGHT: u16 = 2;

/// Main application state
///
/// - `modal`: the single active overlay, including the preview target
/// - `screen`: loaded lists, filters and the bulk selection
/// - `feedback`: transient notifications and config warnings
pub struct App {
    // Lifecycle
    pub running: bool,

    // Tab State
    pub current_tab: Tab,

    // Modal State
    pub modal: ModalState,

    // Data and user choices
    pub screen: ScreenState,

    // Per-tab list navigation
    pub external_view: ListState,
    pub recommended_view: ListState,

    pub feedback: FeedbackState,

    // Configuration
    pub config: AppConfig,

    // Communication
    gateway: Arc<dyn JobGateway>,
    pub data_tx: mpsc::Sender<DataEvent>,
}

impl App {
    /// Create a new App bound to a gateway and the data channel its tasks report on.
    pub fn new(
        config: AppConfig,
        config_warnings: Vec<String>,
        gateway: Arc<dyn JobGateway>,
        data_tx: mpsc::Sender<DataEvent>,
    ) -> Self {
        Self {
            running: true,
            current_tab: Tab::External,
            modal: ModalState::None,
            screen: ScreenState::default(),
            external_view: ListState::default(),
            recommended_view: ListState::default(),
            feedback: FeedbackState::new(config_warnings),
            config,
            gateway,
            data_tx,
        }
    }

    // ========================================================================
    // Gateway intents
    // ========================================================================

    /// Fetch both lists concurrently. Used on mount, reload and source-filter change.
    pub fn load_all(&mut self) {
        self.fetch_external();
        self.fetch_recommendations();
    }

    /// Refetch external jobs under a new generation
    pub fn fetch_external(&mut self) {
        let generation = self.screen.external.begin_fetch();
        let gateway = Arc::clone(&self.gateway);
        let data_tx = self.data_tx.clone();
        let limit = self.config.limits.external_jobs;
        let source = self.screen.source_filter.clone();

        tracing::debug!(generation, limit, source = ?source, "fetching external jobs");

        tokio::spawn(async move {
            let result = gateway.list_external_jobs(limit, source).await;
            let _ = data_tx
                .send(DataEvent::ExternalJobsLoaded { generation, result })
                .await;
        });
    }

    /// Refetch recommendations under a new generation
    pub fn fetch_recommendations(&mut self) {
        let generation = self.screen.recommended.begin_fetch();
        let gateway = Arc::clone(&self.gateway);
        let data_tx = self.data_tx.clone();
        let limit = self.config.limits.recommended_jobs;

        tracing::debug!(generation, limit, "fetching recommendations");

        tokio::spawn(async move {
            let result = gateway.list_all_recommended_jobs(limit).await;
            let _ = data_tx
                .send(DataEvent::RecommendationsLoaded { generation, result })
                .await;
        });
    }

    /// Change the source filter and reload when it actually changed
    pub fn set_source_filter(&mut self, source: Option<JobSource>) {
        if self.screen.source_filter == source {
            return;
        }
        self.screen.source_filter = source;
        self.external_view.move_to_top();
        self.recommended_view.move_to_top();
        self.load_all();
    }

    /// Ask the server to scrape. Ignored while a scrape is already in flight.
    pub fn request_scrape(&mut self) {
        if self.screen.scraping {
            tracing::debug!("scrape already in flight, ignoring request");
            return;
        }
        self.screen.scraping = true;
        self.feedback.notify(Notification::info("Scraping jobs..."));

        let gateway = Arc::clone(&self.gateway);
        let data_tx = self.data_tx.clone();

        tokio::spawn(async move {
            let result = gateway.trigger_scrape().await;
            let _ = data_tx.send(DataEvent::ScrapeFinished(result)).await;
        });
    }

    /// Enable or disable one job
    pub fn set_enabled(&mut self, id: JobId, enabled: bool) {
        let gateway = Arc::clone(&self.gateway);
        let data_tx = self.data_tx.clone();

        tracing::debug!(%id, enabled, "toggling job");

        tokio::spawn(async move {
            let result = gateway.set_job_enabled(&id, enabled).await;
            let _ = data_tx
                .send(DataEvent::ToggleFinished { id, enabled, result })
                .await;
        });
    }

    /// Enable every selected job. An empty selection never reaches the network.
    pub fn request_bulk_enable(&mut self) {
        if self.screen.selection.is_empty() {
            self.feedback
                .notify(Notification::warning("Please select jobs to enable"));
            return;
        }

        let ids = self.screen.selection.ids();
        let gateway = Arc::clone(&self.gateway);
        let data_tx = self.data_tx.clone();

        tracing::debug!(count = ids.len(), "bulk enabling jobs");

        tokio::spawn(async move {
            let result = gateway.bulk_enable(&ids).await;
            let _ = data_tx
                .send(DataEvent::BulkEnableFinished { ids, result })
                .await;
        });
    }

    // ========================================================================
    // Input handling
    // ========================================================================

    /// Handle an input event
    pub fn handle_input(&mut self, event: InputEvent) -> EventResult {
        match event {
            InputEvent::Key(key_event) => {
                let in_search = self.modal.is_editing_search();
                let action = KeyAction::from_key_event(key_event, in_search);
                self.handle_action(action)
            }
            InputEvent::Resize(_, height) => {
                self.set_viewport_height(height);
                EventResult::Continue
            }
            InputEvent::Mouse(mouse_event) => {
                let action = KeyAction::from_mouse_event(mouse_event);
                self.handle_action(action)
            }
        }
    }

    /// Track how many table rows fit in a terminal of this height
    pub fn set_viewport_height(&mut self, height: u16) {
        // Status bar and the table's bottom border sit below the rows
        let rows = height.saturating_sub(CONTENT_START + STATUS_HEIGHT + 1) as usize;
        self.external_view.visible_count = rows;
        self.recommended_view.visible_count = rows;
        self.clamp_lists();
    }

    /// Handle a key action
    pub fn handle_action(&mut self, action: KeyAction) -> EventResult {
        // Modal modes take priority over normal navigation
        match &self.modal {
            ModalState::Help => return self.handle_help_action(action),
            ModalState::Search { .. } => return self.handle_search_action(action),
            ModalState::SourcePicker { .. } => return self.handle_source_picker_action(action),
            ModalState::Preview { .. } => return self.handle_preview_action(action),
            ModalState::None => {}
        }

        if let Some(result) = self.handle_navigation(&action) {
            return result;
        }

        match action {
            KeyAction::Quit => {
                self.running = false;
                EventResult::Quit
            }

            KeyAction::SwitchToExternal => {
                self.current_tab = Tab::External;
                EventResult::Continue
            }
            KeyAction::SwitchToRecommended => {
                self.current_tab = Tab::Recommended;
                EventResult::Continue
            }
            KeyAction::NextTab => {
                self.current_tab = self.current_tab.next();
                EventResult::Continue
            }

            KeyAction::Select | KeyAction::Preview => {
                self.open_preview();
                EventResult::Continue
            }
            KeyAction::ToggleSelection => {
                self.toggle_focused_selection();
                EventResult::Continue
            }
            KeyAction::Enable => {
                self.toggle_focused_job(true);
                EventResult::Continue
            }
            KeyAction::Disable => {
                self.toggle_focused_job(false);
                EventResult::Continue
            }
            KeyAction::BulkEnable => {
                self.request_bulk_enable();
                EventResult::Continue
            }
            KeyAction::Scrape => {
                self.request_scrape();
                EventResult::Continue
            }
            KeyAction::Refresh => {
                self.load_all();
                EventResult::Continue
            }
            KeyAction::OpenSourceFilter => {
                self.modal = ModalState::SourcePicker {
                    selected: source_picker_index(self.screen.source_filter.as_ref()),
                };
                EventResult::Continue
            }
            KeyAction::QuickSearch => {
                self.modal = ModalState::Search {
                    previous: self.screen.search.clone(),
                };
                EventResult::Continue
            }
            KeyAction::CopyApplyUrl => {
                if let Some(target) = self.focused_target() {
                    self.copy_apply_url(&target);
                }
                EventResult::Continue
            }
            KeyAction::Apply => {
                if let Some(target) = self.focused_target() {
                    self.apply(&target);
                }
                EventResult::Continue
            }
            KeyAction::ShowHelp => {
                self.modal = ModalState::Help;
                EventResult::Continue
            }
            KeyAction::Escape => {
                if self.screen.search.is_empty() {
                    EventResult::Unchanged
                } else {
                    self.screen.search.clear();
                    self.clamp_lists();
                    EventResult::Continue
                }
            }

            KeyAction::MouseClick { row, column: _ } => {
                self.handle_mouse_click(row);
                EventResult::Continue
            }

            _ => EventResult::Unchanged,
        }
    }

    /// Handle navigation actions (returns Some if action was handled)
    fn handle_navigation(&mut self, action: &KeyAction) -> Option<EventResult> {
        match action {
            KeyAction::MoveUp | KeyAction::MouseScrollUp => {
                self.with_current_list(|state, len| state.move_up(len));
            }
            KeyAction::MoveDown | KeyAction::MouseScrollDown => {
                self.with_current_list(|state, len| state.move_down(len));
            }
            KeyAction::MoveToTop => {
                self.with_current_list(|state, _len| state.move_to_top());
            }
            KeyAction::MoveToBottom => {
                self.with_current_list(|state, len| state.move_to_bottom(len));
            }
            KeyAction::PageUp => {
                self.with_current_list(|state, len| state.page_up(len));
            }
            KeyAction::PageDown => {
                self.with_current_list(|state, len| state.page_down(len));
            }
            _ => return None,
        }
        Some(EventResult::Continue)
    }

    /// Handle mouse click to focus a table row
    fn handle_mouse_click(&mut self, row: u16) {
        if row < CONTENT_START {
            return;
        }

        let clicked_index = (row - CONTENT_START) as usize;
        let len = self.current_list_len();
        let list_state = self.current_list_state_mut();
        let target = list_state.scroll_offset + clicked_index;
        if target < len {
            list_state.selected = target;
        }
    }

    fn handle_help_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::Escape | KeyAction::ShowHelp | KeyAction::Quit => {
                self.modal = ModalState::None;
                EventResult::Continue
            }
            _ => EventResult::Unchanged,
        }
    }

    /// The search box edits the live search string; Esc restores what was there before
    fn handle_search_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::Escape => {
                if let ModalState::Search { previous } = std::mem::take(&mut self.modal) {
                    self.screen.search = previous;
                }
            }
            KeyAction::Select => {
                self.modal = ModalState::None;
            }
            KeyAction::SearchClear => self.screen.search.clear(),
            KeyAction::SearchBackspace => {
                self.screen.search.pop();
            }
            KeyAction::SearchChar(c) => self.screen.search.push(c),
            KeyAction::Quit => {
                self.running = false;
                return EventResult::Quit;
            }
            _ => return EventResult::Unchanged,
        }
        self.clamp_lists();
        EventResult::Continue
    }

    fn handle_source_picker_action(&mut self, action: KeyAction) -> EventResult {
        let ModalState::SourcePicker { selected } = &mut self.modal else {
            return EventResult::Unchanged;
        };

        match action {
            KeyAction::MoveUp => {
                *selected = selected.saturating_sub(1);
                EventResult::Continue
            }
            KeyAction::MoveDown => {
                *selected = (*selected + 1).min(SOURCE_PICKER_LEN - 1);
                EventResult::Continue
            }
            KeyAction::Select => {
                let choice = source_picker_choice(*selected);
                self.modal = ModalState::None;
                self.set_source_filter(choice);
                EventResult::Continue
            }
            KeyAction::Escape | KeyAction::Quit | KeyAction::OpenSourceFilter => {
                self.modal = ModalState::None;
                EventResult::Continue
            }
            _ => EventResult::Unchanged,
        }
    }

    fn handle_preview_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::Escape | KeyAction::Select | KeyAction::Preview | KeyAction::Quit => {
                self.close_preview();
                EventResult::Continue
            }
            KeyAction::CopyApplyUrl => {
                if let Some(target) = self.modal.preview().cloned() {
                    self.copy_apply_url(&target);
                }
                EventResult::Continue
            }
            KeyAction::Apply => {
                if let Some(target) = self.modal.preview().cloned() {
                    self.apply(&target);
                }
                EventResult::Continue
            }
            _ => EventResult::Unchanged,
        }
    }

    // ========================================================================
    // Row actions
    // ========================================================================

    /// Open the preview on the focused row. Replaces any open preview.
    pub fn open_preview(&mut self) {
        if let Some(target) = self.focused_target() {
            self.modal = ModalState::Preview { target };
        }
    }

    pub fn close_preview(&mut self) {
        if self.modal.preview().is_some() {
            self.modal = ModalState::None;
        }
    }

    fn toggle_focused_selection(&mut self) {
        if self.current_tab != Tab::External {
            return;
        }
        let Some(job) = self.focused_external().cloned() else {
            return;
        };

        let was_selected = self.screen.selection.contains(&job.id);
        let now_selected = self.screen.selection.toggle(&job);
        if !was_selected && !now_selected {
            self.feedback
                .notify(Notification::info("Enabled jobs cannot be selected"));
        }
    }

    fn toggle_focused_job(&mut self, enabled: bool) {
        if self.current_tab != Tab::External {
            return;
        }
        let Some((id, is_enabled)) = self
            .focused_external()
            .map(|job| (job.id.clone(), job.is_enabled))
        else {
            return;
        };

        if is_enabled == enabled {
            let state = if enabled { "enabled" } else { "disabled" };
            self.feedback
                .notify(Notification::info(format!("Job is already {}", state)));
            return;
        }
        self.set_enabled(id, enabled);
    }

    /// Apply/View: external postings hand out their link, internal ones have none
    fn apply(&mut self, target: &PreviewTarget) {
        if let PreviewTarget::Recommended(rec) = target
            && !rec.is_external
        {
            self.feedback
                .notify(Notification::info("This is an internal job posting"));
            return;
        }
        self.copy_apply_url(target);
    }

    fn copy_apply_url(&mut self, target: &PreviewTarget) {
        let Some(url) = target.job().apply_url() else {
            self.feedback
                .notify(Notification::info("No apply link for this job"));
            return;
        };

        if !self.config.behavior.copy_to_clipboard {
            self.feedback.notify(Notification::info(url.to_string()));
            return;
        }

        let notification = match copy_to_clipboard(url) {
            Ok(()) => Notification::success(format!("Copied: {}", url)),
            Err(e) => {
                tracing::warn!("clipboard unavailable: {}", e);
                Notification::warning(format!("Clipboard unavailable, link: {}", url))
            }
        };
        self.feedback.notify(notification);
    }

    // ========================================================================
    // Data handling
    // ========================================================================

    /// Handle a data event
    pub fn handle_data(&mut self, event: DataEvent) -> EventResult {
        match event {
            DataEvent::ExternalJobsLoaded { generation, result } => match result {
                Ok(jobs) => {
                    if !self.screen.external.commit(generation, jobs) {
                        return self.drop_stale(DataSource::ExternalJobs, generation);
                    }
                    let len = self.visible_external().len();
                    self.external_view.clamp(len);
                    EventResult::Continue
                }
                Err(e) => {
                    if !self.screen.external.fail(generation) {
                        return self.drop_stale(DataSource::ExternalJobs, generation);
                    }
                    tracing::error!("failed to load external jobs: {}", e);
                    self.feedback
                        .notify(Notification::error("Failed to load external jobs"));
                    EventResult::Continue
                }
            },
            DataEvent::RecommendationsLoaded { generation, result } => match result {
                Ok(recs) => {
                    if !self.screen.recommended.commit(generation, recs) {
                        return self.drop_stale(DataSource::Recommendations, generation);
                    }
                    let len = self.visible_recommended().len();
                    self.recommended_view.clamp(len);
                    EventResult::Continue
                }
                Err(e) => {
                    if !self.screen.recommended.fail(generation) {
                        return self.drop_stale(DataSource::Recommendations, generation);
                    }
                    // Recommendations are optional; the screen keeps working without them
                    tracing::warn!("failed to load recommendations: {}", e);
                    EventResult::Continue
                }
            },
            DataEvent::ScrapeFinished(result) => {
                self.screen.scraping = false;
                match result {
                    Ok(message) => {
                        self.feedback.notify(Notification::success(
                            message.unwrap_or_else(|| DEFAULT_SCRAPE_MESSAGE.to_string()),
                        ));
                        self.fetch_external();
                    }
                    Err(e) => {
                        tracing::error!("scrape failed: {}", e);
                        self.feedback
                            .notify(Notification::error("Failed to scrape jobs"));
                        if self.config.behavior.refresh_after_failed_scrape {
                            self.fetch_external();
                        }
                    }
                }
                EventResult::Continue
            }
            DataEvent::ToggleFinished { id, enabled, result } => {
                match result {
                    Ok(_) => {
                        let message = if enabled {
                            "Job enabled successfully"
                        } else {
                            "Job disabled successfully"
                        };
                        self.feedback.notify(Notification::success(message));
                        self.fetch_external();
                    }
                    Err(e) => {
                        tracing::error!(%id, enabled, "toggle failed: {}", e);
                        let fallback = if enabled {
                            "Failed to enable job"
                        } else {
                            "Failed to disable job"
                        };
                        self.feedback
                            .notify(Notification::error(failure_message(&e, fallback)));
                    }
                }
                EventResult::Continue
            }
            DataEvent::BulkEnableFinished { ids, result } => {
                match result {
                    Ok(message) => {
                        self.screen.selection.remove_all(&ids);
                        self.feedback.notify(Notification::success(
                            message.unwrap_or_else(|| DEFAULT_BULK_MESSAGE.to_string()),
                        ));
                        self.fetch_external();
                    }
                    Err(e) => {
                        tracing::error!(count = ids.len(), "bulk enable failed: {}", e);
                        self.feedback.notify(Notification::error(failure_message(
                            &e,
                            "Failed to enable jobs",
                        )));
                    }
                }
                EventResult::Continue
            }
            DataEvent::Tick => {
                // Redraw only when a toast has just run out
                if self.feedback.expire() {
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
        }
    }

    fn drop_stale(&self, source: DataSource, generation: u64) -> EventResult {
        let latest = match source {
            DataSource::ExternalJobs => self.screen.external.generation(),
            DataSource::Recommendations => self.screen.recommended.generation(),
        };
        tracing::warn!(%source, generation, latest, "dropping superseded response");
        EventResult::Unchanged
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    #[must_use]
    pub fn phase(&self) -> ScreenPhase {
        self.screen.phase()
    }

    /// External jobs after search, in server order
    #[must_use]
    pub fn visible_external(&self) -> Vec<&JobPosting> {
        filter::filter_external(self.screen.external.as_slice(), &self.screen.search)
    }

    /// Recommendations after search, in server order
    #[must_use]
    pub fn visible_recommended(&self) -> Vec<&RecommendedJobPosting> {
        filter::filter_recommended(self.screen.recommended.as_slice(), &self.screen.search)
    }

    /// Tab label counts: rows each tab shows under the current search
    #[must_use]
    pub fn tab_counts(&self) -> [usize; 2] {
        [self.visible_external().len(), self.visible_recommended().len()]
    }

    #[must_use]
    pub fn stats(&self) -> JobStats {
        filter::job_stats(
            self.screen.external.as_slice(),
            self.screen.recommended.as_slice(),
        )
    }

    /// Job under the cursor on the external tab
    #[must_use]
    pub fn focused_external(&self) -> Option<&JobPosting> {
        self.visible_external()
            .get(self.external_view.selected)
            .copied()
    }

    /// Recommendation under the cursor on the recommended tab
    #[must_use]
    pub fn focused_recommended(&self) -> Option<&RecommendedJobPosting> {
        self.visible_recommended()
            .get(self.recommended_view.selected)
            .copied()
    }

    /// Focused row of the active tab, cloned for a modal or a row action
    #[must_use]
    pub fn focused_target(&self) -> Option<PreviewTarget> {
        match self.current_tab {
            Tab::External => self
                .focused_external()
                .cloned()
                .map(PreviewTarget::External),
            Tab::Recommended => self
                .focused_recommended()
                .cloned()
                .map(PreviewTarget::Recommended),
        }
    }

    /// Current notification if still visible
    #[must_use]
    pub fn current_notification(&self) -> Option<&Notification> {
        self.feedback.current()
    }

    fn current_list_len(&self) -> usize {
        match self.current_tab {
            Tab::External => self.visible_external().len(),
            Tab::Recommended => self.visible_recommended().len(),
        }
    }

    fn current_list_state_mut(&mut self) -> &mut ListState {
        match self.current_tab {
            Tab::External => &mut self.external_view,
            Tab::Recommended => &mut self.recommended_view,
        }
    }

    /// Apply a navigation operation to the active tab's list
    fn with_current_list<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ListState, usize),
    {
        let len = self.current_list_len();
        f(self.current_list_state_mut(), len);
    }

    /// Keep both cursors inside their filtered lists
    fn clamp_lists(&mut self) {
        let external_len = self.visible_external().len();
        let recommended_len = self.visible_recommended().len();
        self.external_view.clamp(external_len);
        self.recommended_view.clamp(recommended_len);
    }
}

/// Server error text when present, else the fixed fallback
fn failure_message(err: &GatewayError, fallback: &str) -> String {
    err.server_message()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::gateway::GatewayResult;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        ListExternal(Option<JobSource>),
        ListRecommended,
        Scrape,
        SetEnabled(JobId, bool),
        BulkEnable(Vec<JobId>),
    }

    /// In-memory gateway that records every call
    #[derive(Default)]
    struct FakeGateway {
        calls: Mutex<Vec<Call>>,
        external: Mutex<Vec<JobPosting>>,
        recommended: Vec<RecommendedJobPosting>,
        fail_external: bool,
        fail_recommended: bool,
        fail_scrape: bool,
        reject_toggle: Option<String>,
        reject_bulk: Option<String>,
        bulk_message: Option<String>,
    }

    impl FakeGateway {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl JobGateway for FakeGateway {
        async fn list_external_jobs(
            &self,
            _limit: u32,
            source: Option<JobSource>,
        ) -> GatewayResult<Vec<JobPosting>> {
            self.record(Call::ListExternal(source));
            if self.fail_external {
                return Err(GatewayError::Status {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                });
            }
            Ok(self.external.lock().unwrap().clone())
        }

        async fn list_recommended_external_jobs(
            &self,
            _limit: u32,
        ) -> GatewayResult<Vec<RecommendedJobPosting>> {
            unreachable!("the screen lists all recommendations")
        }

        async fn list_all_recommended_jobs(
            &self,
            _limit: u32,
        ) -> GatewayResult<Vec<RecommendedJobPosting>> {
            self.record(Call::ListRecommended);
            if self.fail_recommended {
                return Err(GatewayError::rejected("matcher offline"));
            }
            Ok(self.recommended.clone())
        }

        async fn trigger_scrape(&self) -> GatewayResult<Option<String>> {
            self.record(Call::Scrape);
            if self.fail_scrape {
                return Err(GatewayError::rejected("scraper busy"));
            }
            Ok(None)
        }

        async fn set_job_enabled(&self, id: &JobId, enabled: bool) -> GatewayResult<Option<String>> {
            self.record(Call::SetEnabled(id.clone(), enabled));
            if let Some(message) = &self.reject_toggle {
                return Err(GatewayError::rejected(message.clone()));
            }
            for job in self.external.lock().unwrap().iter_mut() {
                if &job.id == id {
                    job.is_enabled = enabled;
                }
            }
            Ok(None)
        }

        async fn bulk_enable(&self, ids: &[JobId]) -> GatewayResult<Option<String>> {
            self.record(Call::BulkEnable(ids.to_vec()));
            if let Some(message) = &self.reject_bulk {
                return Err(GatewayError::rejected(message.clone()));
            }
            Ok(self.bulk_message.clone())
        }
    }

    fn job(id: i64, title: &str, location: &str, enabled: bool) -> JobPosting {
        JobPosting {
            id: JobId::from(id),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: location.to_string(),
            source: JobSource::Greenhouse,
            skills: Vec::new(),
            salary_min: None,
            salary_max: None,
            posted_date: None,
            is_enabled: enabled,
            apply_url: Some(format!("https://jobs.example.com/{}", id)),
        }
    }

    fn rec(id: i64, title: &str, is_external: bool) -> RecommendedJobPosting {
        let mut posting = job(id, title, "", false);
        if !is_external {
            posting.apply_url = None;
        }
        RecommendedJobPosting {
            job: posting,
            match_score: 75,
            is_external,
        }
    }

    fn setup(gateway: FakeGateway) -> (App, Arc<FakeGateway>, mpsc::Receiver<DataEvent>) {
        let gateway = Arc::new(gateway);
        let (data_tx, data_rx) = mpsc::channel(32);
        let mut config = AppConfig::default();
        config.behavior.copy_to_clipboard = false;
        let app = App::new(config, Vec::new(), gateway.clone(), data_tx);
        (app, gateway, data_rx)
    }

    /// Deliver the next `count` completions to the app
    async fn pump(app: &mut App, rx: &mut mpsc::Receiver<DataEvent>, count: usize) {
        for _ in 0..count {
            let event = rx.recv().await.expect("data channel closed");
            app.handle_data(event);
        }
    }

    /// Load both lists and settle
    async fn mounted(gateway: FakeGateway) -> (App, Arc<FakeGateway>, mpsc::Receiver<DataEvent>) {
        let (mut app, gateway, mut rx) = setup(gateway);
        app.load_all();
        pump(&mut app, &mut rx, 2).await;
        (app, gateway, rx)
    }

    fn severity(app: &App) -> Option<Severity> {
        app.feedback.last().map(|n| n.severity)
    }

    fn message(app: &App) -> Option<&str> {
        app.feedback.last().map(|n| n.message.as_str())
    }

    #[tokio::test]
    async fn test_mount_loads_both_lists() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![job(1, "Engineer", "Remote", false)]),
            recommended: vec![rec(9, "Designer", true)],
            ..Default::default()
        };
        let (mut app, gateway, mut rx) = setup(gateway);
        assert_eq!(app.phase(), ScreenPhase::Initial);

        app.load_all();
        assert_eq!(app.phase(), ScreenPhase::Loading);

        pump(&mut app, &mut rx, 2).await;
        assert_eq!(app.phase(), ScreenPhase::Ready);
        assert_eq!(app.screen.external.len(), 1);
        assert_eq!(app.screen.recommended.len(), 1);

        let calls = gateway.calls();
        assert!(calls.contains(&Call::ListExternal(None)));
        assert!(calls.contains(&Call::ListRecommended));
    }

    #[tokio::test]
    async fn test_recommendation_failure_is_silent() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![job(1, "Engineer", "Remote", false)]),
            fail_recommended: true,
            ..Default::default()
        };
        let (app, _gateway, _rx) = mounted(gateway).await;

        assert_eq!(app.phase(), ScreenPhase::Ready);
        assert_eq!(app.screen.external.len(), 1);
        assert!(app.feedback.last().is_none());
    }

    #[tokio::test]
    async fn test_external_failure_notifies() {
        let gateway = FakeGateway {
            fail_external: true,
            recommended: vec![rec(9, "Designer", true)],
            ..Default::default()
        };
        let (app, _gateway, _rx) = mounted(gateway).await;

        assert_eq!(severity(&app), Some(Severity::Error));
        assert_eq!(message(&app), Some("Failed to load external jobs"));
        // The other slice is unaffected
        assert_eq!(app.screen.recommended.len(), 1);
        assert_eq!(app.phase(), ScreenPhase::Ready);
    }

    #[tokio::test]
    async fn test_source_filter_change_refetches_both() {
        let (mut app, gateway, mut rx) = mounted(FakeGateway::default()).await;

        app.set_source_filter(Some(JobSource::RemoteOk));
        pump(&mut app, &mut rx, 2).await;

        let calls = gateway.calls();
        assert!(calls.contains(&Call::ListExternal(Some(JobSource::RemoteOk))));
        assert_eq!(
            calls.iter().filter(|c| **c == Call::ListRecommended).count(),
            2
        );

        // Same filter again is a no-op
        app.set_source_filter(Some(JobSource::RemoteOk));
        assert_eq!(gateway.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_source_picker_selects_filter() {
        let (mut app, gateway, mut rx) = mounted(FakeGateway::default()).await;

        app.handle_action(KeyAction::OpenSourceFilter);
        app.handle_action(KeyAction::MoveDown);
        app.handle_action(KeyAction::MoveDown);
        app.handle_action(KeyAction::Select);
        pump(&mut app, &mut rx, 2).await;

        assert!(!app.modal.is_active());
        assert_eq!(app.screen.source_filter, Some(JobSource::WeWorkRemotely));
        assert!(
            gateway
                .calls()
                .contains(&Call::ListExternal(Some(JobSource::WeWorkRemotely)))
        );
    }

    #[tokio::test]
    async fn test_stale_response_never_overwrites() {
        let (mut app, _gateway, _rx) = setup(FakeGateway::default());

        let first = app.screen.external.begin_fetch();
        let second = app.screen.external.begin_fetch();

        let result = app.handle_data(DataEvent::ExternalJobsLoaded {
            generation: second,
            result: Ok(vec![job(2, "Newer", "", false)]),
        });
        assert_eq!(result, EventResult::Continue);

        let result = app.handle_data(DataEvent::ExternalJobsLoaded {
            generation: first,
            result: Ok(vec![job(1, "Older", "", false)]),
        });
        assert_eq!(result, EventResult::Unchanged);
        assert_eq!(app.screen.external.as_slice()[0].title, "Newer");

        // A late failure from the old generation is dropped as well
        let result = app.handle_data(DataEvent::ExternalJobsLoaded {
            generation: first,
            result: Err(GatewayError::rejected("old")),
        });
        assert_eq!(result, EventResult::Unchanged);
        assert!(app.feedback.last().is_none());
    }

    #[tokio::test]
    async fn test_bulk_enable_empty_selection_makes_no_call() {
        let (mut app, gateway, _rx) = mounted(FakeGateway::default()).await;
        let before = gateway.calls().len();

        app.handle_action(KeyAction::BulkEnable);

        assert_eq!(gateway.calls().len(), before);
        assert_eq!(severity(&app), Some(Severity::Warning));
        assert_eq!(message(&app), Some("Please select jobs to enable"));
    }

    #[tokio::test]
    async fn test_bulk_enable_success_clears_selection_and_refetches() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![
                job(1, "A", "", false),
                job(2, "B", "", false),
                job(3, "C", "", true),
            ]),
            bulk_message: Some("2 jobs enabled".to_string()),
            ..Default::default()
        };
        let (mut app, gateway, mut rx) = mounted(gateway).await;

        app.handle_action(KeyAction::ToggleSelection);
        app.handle_action(KeyAction::MoveDown);
        app.handle_action(KeyAction::ToggleSelection);
        assert_eq!(app.screen.selection.len(), 2);

        app.handle_action(KeyAction::BulkEnable);
        pump(&mut app, &mut rx, 1).await;

        assert_eq!(severity(&app), Some(Severity::Success));
        assert_eq!(message(&app), Some("2 jobs enabled"));
        assert!(app.screen.selection.is_empty());

        pump(&mut app, &mut rx, 1).await;
        let calls = gateway.calls();
        assert!(calls.contains(&Call::BulkEnable(vec![JobId::from(1), JobId::from(2)])));
        assert_eq!(calls.last(), Some(&Call::ListExternal(None)));
    }

    #[tokio::test]
    async fn test_bulk_enable_failure_keeps_selection() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![job(1, "A", "", false)]),
            reject_bulk: Some("quota exceeded".to_string()),
            ..Default::default()
        };
        let (mut app, gateway, mut rx) = mounted(gateway).await;

        app.handle_action(KeyAction::ToggleSelection);
        app.handle_action(KeyAction::BulkEnable);
        pump(&mut app, &mut rx, 1).await;

        assert_eq!(severity(&app), Some(Severity::Error));
        assert_eq!(message(&app), Some("quota exceeded"));
        assert_eq!(app.screen.selection.len(), 1);
        assert_eq!(gateway.calls().last(), Some(&Call::BulkEnable(vec![JobId::from(1)])));
    }

    #[tokio::test]
    async fn test_enabled_rows_cannot_be_selected() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![job(1, "A", "", true)]),
            ..Default::default()
        };
        let (mut app, _gateway, _rx) = mounted(gateway).await;

        app.handle_action(KeyAction::ToggleSelection);
        assert!(app.screen.selection.is_empty());
        assert_eq!(severity(&app), Some(Severity::Info));
    }

    #[tokio::test]
    async fn test_enable_refetches_and_reflects_new_flag() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![job(1, "A", "", false)]),
            ..Default::default()
        };
        let (mut app, gateway, mut rx) = mounted(gateway).await;

        app.handle_action(KeyAction::Enable);
        pump(&mut app, &mut rx, 2).await;

        assert_eq!(message(&app), Some("Job enabled successfully"));
        assert!(gateway.calls().contains(&Call::SetEnabled(JobId::from(1), true)));
        assert!(app.screen.external.as_slice()[0].is_enabled);

        app.handle_action(KeyAction::Disable);
        pump(&mut app, &mut rx, 2).await;
        assert_eq!(message(&app), Some("Job disabled successfully"));
        assert!(!app.screen.external.as_slice()[0].is_enabled);
    }

    #[tokio::test]
    async fn test_enable_rejection_shows_server_error_without_refetch() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![job(1, "A", "", false)]),
            reject_toggle: Some("Job not found".to_string()),
            ..Default::default()
        };
        let (mut app, gateway, mut rx) = mounted(gateway).await;

        app.handle_action(KeyAction::Enable);
        pump(&mut app, &mut rx, 1).await;

        assert_eq!(severity(&app), Some(Severity::Error));
        assert_eq!(message(&app), Some("Job not found"));
        assert_eq!(
            gateway.calls().last(),
            Some(&Call::SetEnabled(JobId::from(1), true))
        );
    }

    #[test]
    fn test_failure_message_fallback() {
        let transport = GatewayError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(failure_message(&transport, "Failed to enable job"), "Failed to enable job");
        assert_eq!(
            failure_message(&GatewayError::rejected("  "), "Failed to enable job"),
            "Failed to enable job"
        );
    }

    #[tokio::test]
    async fn test_scrape_success_refetches_external() {
        let (mut app, gateway, mut rx) = mounted(FakeGateway::default()).await;

        app.handle_action(KeyAction::Scrape);
        assert_eq!(app.phase(), ScreenPhase::Scraping);

        // A second trigger while in flight is ignored
        app.handle_action(KeyAction::Scrape);

        pump(&mut app, &mut rx, 1).await;
        assert_eq!(message(&app), Some(DEFAULT_SCRAPE_MESSAGE));
        pump(&mut app, &mut rx, 1).await;

        let calls = gateway.calls();
        assert_eq!(calls.iter().filter(|c| **c == Call::Scrape).count(), 1);
        assert_eq!(calls.last(), Some(&Call::ListExternal(None)));
        assert_eq!(app.phase(), ScreenPhase::Ready);
    }

    #[tokio::test]
    async fn test_scrape_failure_does_not_refetch_by_default() {
        let gateway = FakeGateway {
            fail_scrape: true,
            ..Default::default()
        };
        let (mut app, gateway, mut rx) = mounted(gateway).await;

        app.handle_action(KeyAction::Scrape);
        pump(&mut app, &mut rx, 1).await;

        assert_eq!(message(&app), Some("Failed to scrape jobs"));
        assert_eq!(gateway.calls().last(), Some(&Call::Scrape));
        assert_eq!(app.phase(), ScreenPhase::Ready);
    }

    #[tokio::test]
    async fn test_scrape_failure_refetches_when_configured() {
        let gateway = FakeGateway {
            fail_scrape: true,
            ..Default::default()
        };
        let (mut app, gateway, mut rx) = mounted(gateway).await;
        app.config.behavior.refresh_after_failed_scrape = true;

        app.handle_action(KeyAction::Scrape);
        pump(&mut app, &mut rx, 2).await;

        assert_eq!(gateway.calls().last(), Some(&Call::ListExternal(None)));
    }

    #[tokio::test]
    async fn test_search_and_selection_persist_across_tabs() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![
                job(1, "Senior Engineer", "Remote", false),
                job(2, "Designer", "Oslo", false),
            ]),
            recommended: vec![rec(9, "Engineer II", true), rec(10, "Chef", false)],
            ..Default::default()
        };
        let (mut app, _gateway, _rx) = mounted(gateway).await;

        app.handle_action(KeyAction::ToggleSelection);

        app.handle_action(KeyAction::QuickSearch);
        for c in "engineer".chars() {
            app.handle_action(KeyAction::SearchChar(c));
        }
        app.handle_action(KeyAction::Select);
        assert!(!app.modal.is_active());

        assert_eq!(app.visible_external().len(), 1);
        assert_eq!(app.visible_recommended().len(), 1);
        // Tab labels count the searched rows, stats the loaded list
        assert_eq!(app.tab_counts(), [1, 1]);
        assert_eq!(app.stats().total_external, 2);
        assert_eq!(app.stats().remote, 1);

        app.handle_action(KeyAction::NextTab);
        assert_eq!(app.current_tab, Tab::Recommended);
        assert_eq!(app.screen.selection.len(), 1);

        app.handle_action(KeyAction::Escape);
        assert!(app.screen.search.is_empty());
        assert_eq!(app.visible_recommended().len(), 2);
    }

    #[tokio::test]
    async fn test_search_escape_restores_previous_text() {
        let (mut app, _gateway, _rx) = setup(FakeGateway::default());
        app.screen.search = "rust".to_string();

        app.handle_action(KeyAction::QuickSearch);
        app.handle_action(KeyAction::SearchChar('y'));
        assert_eq!(app.screen.search, "rusty");

        app.handle_action(KeyAction::Escape);
        assert_eq!(app.screen.search, "rust");
        assert!(!app.modal.is_active());
    }

    #[tokio::test]
    async fn test_preview_single_target() {
        let gateway = FakeGateway {
            external: Mutex::new(vec![job(1, "A", "", false), job(2, "B", "", false)]),
            ..Default::default()
        };
        let (mut app, _gateway, _rx) = mounted(gateway).await;

        app.handle_action(KeyAction::Select);
        assert_eq!(
            app.modal.preview().map(|t| t.job().id.clone()),
            Some(JobId::from(1))
        );

        // Navigation is captured by the open preview
        assert_eq!(app.handle_action(KeyAction::MoveDown), EventResult::Unchanged);

        app.handle_action(KeyAction::Escape);
        assert!(app.modal.preview().is_none());

        app.handle_action(KeyAction::MoveDown);
        app.handle_action(KeyAction::Preview);
        assert_eq!(
            app.modal.preview().map(|t| t.job().id.clone()),
            Some(JobId::from(2))
        );

        // q closes the preview rather than quitting
        app.handle_action(KeyAction::Quit);
        assert!(app.running);
        assert!(!app.modal.is_active());
    }

    #[tokio::test]
    async fn test_apply_internal_recommendation() {
        let gateway = FakeGateway {
            recommended: vec![rec(10, "Internal Role", false), rec(11, "External Role", true)],
            ..Default::default()
        };
        let (mut app, _gateway, _rx) = mounted(gateway).await;

        app.handle_action(KeyAction::SwitchToRecommended);
        app.handle_action(KeyAction::Apply);
        assert_eq!(message(&app), Some("This is an internal job posting"));

        app.handle_action(KeyAction::MoveDown);
        app.handle_action(KeyAction::Apply);
        // Clipboard is disabled in tests, so the link is shown instead
        assert_eq!(message(&app), Some("https://jobs.example.com/11"));
    }

    #[tokio::test]
    async fn test_resize_tracks_visible_rows() {
        let jobs = (1..=40).map(|i| job(i, "Role", "", false)).collect();
        let gateway = FakeGateway {
            external: Mutex::new(jobs),
            ..Default::default()
        };
        let (mut app, _gateway, _rx) = mounted(gateway).await;

        app.handle_input(InputEvent::Resize(120, 30));
        assert_eq!(app.external_view.visible_count, 18);

        app.handle_action(KeyAction::MoveToBottom);
        assert_eq!(app.external_view.selected, 39);
        assert_eq!(app.external_view.scroll_offset, 22);
    }

    #[tokio::test]
    async fn test_tick_redraws_only_when_toast_expires() {
        let (mut app, _gateway, _rx) = setup(FakeGateway::default());
        assert_eq!(app.handle_data(DataEvent::Tick), EventResult::Unchanged);

        let mut stale = Notification::info("Scraping jobs...");
        stale.timestamp -= std::time::Duration::from_secs(10);
        app.feedback.notify(stale);
        assert!(app.current_notification().is_none());

        assert_eq!(app.handle_data(DataEvent::Tick), EventResult::Continue);
        assert!(app.feedback.last().is_none());
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut app, _gateway, _rx) = setup(FakeGateway::default());
        assert_eq!(app.handle_action(KeyAction::Quit), EventResult::Quit);
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_while_searching() {
        let (mut app, _gateway, _rx) = setup(FakeGateway::default());
        app.handle_action(KeyAction::QuickSearch);
        app.handle_action(KeyAction::SearchChar('r'));
        assert!(app.modal.is_editing_search());

        let ctrl_c = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('c'),
            crossterm::event::KeyModifiers::CONTROL,
        );
        assert_eq!(app.handle_input(InputEvent::Key(ctrl_c)), EventResult::Quit);
        assert!(!app.running);
        assert_eq!(app.screen.search, "r");
    }
}
