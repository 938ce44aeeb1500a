//! Core data types for the TUI
//!
//! - `DataSlice`: Fetched list with issue-order tracking
//! - `Notification`: Transient banner shown in the status bar

use std::time::{Duration, Instant};

/// Data slice with generation tracking
///
/// Each fetch is issued under a new generation. Only the response for the
/// latest generation may commit, so an older fetch that settles late never
/// overwrites newer data. The `data` field is private so every update goes
/// through `commit()`.
#[derive(Debug)]
pub struct DataSlice<T> {
    data: Vec<T>,
    pub last_updated: Option<Instant>,
    generation: u64,
    in_flight: bool,
    failed: bool,
}

/// What the status bar says about a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceStatus {
    NotLoaded,
    Loading,
    Updated(Duration),
    Failed,
}

impl<T> Default for DataSlice<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            last_updated: None,
            generation: 0,
            in_flight: false,
            failed: false,
        }
    }
}

impl<T> DataSlice<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch and return the generation its response must carry
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = true;
        self.generation
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Whether the latest issued fetch is still outstanding
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Replace the data if `generation` is the latest. Returns false for stale responses.
    pub fn commit(&mut self, generation: u64, data: Vec<T>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.data = data;
        self.last_updated = Some(Instant::now());
        self.in_flight = false;
        self.failed = false;
        true
    }

    /// Settle a failed fetch without touching the data. Returns false for stale responses.
    pub fn fail(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.in_flight = false;
        self.failed = true;
        true
    }

    /// Loading wins, then the latest settled outcome
    #[must_use]
    pub fn status(&self) -> SliceStatus {
        if self.in_flight {
            SliceStatus::Loading
        } else if self.failed {
            SliceStatus::Failed
        } else {
            match self.age() {
                Some(age) => SliceStatus::Updated(age),
                None => SliceStatus::NotLoaded,
            }
        }
    }

    #[must_use]
    pub fn age(&self) -> Option<Duration> {
        self.last_updated.map(|t| t.elapsed())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the data as a slice for efficient read-only access
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// Notification severity, also selects the banner color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Errors and warnings stay up longer than confirmations
    #[must_use]
    pub fn display_duration(&self) -> Duration {
        match self {
            Severity::Success | Severity::Info => Duration::from_secs(3),
            Severity::Warning | Severity::Error => Duration::from_secs(5),
        }
    }
}

/// A transient message for the status bar
#[derive(Debug, Clone)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub timestamp: Instant,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.timestamp.elapsed() < self.severity.display_duration()
    }
}
