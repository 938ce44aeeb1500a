//! Terminal User Interface for jobdeck
//!
//! This module provides the interactive jobs screen.
//! It features:
//! - External jobs and recommendations in one tabbed table
//! - Dual-channel event architecture (priority input, gateway completions)
//! - Keyboard-driven navigation with mouse support
//! - Source filter, live search and bulk selection
//! - Graceful degradation when one of the lists fails to load

pub mod app;
pub mod event;
pub mod runtime;
pub mod theme;
pub mod ui;

use std::io::{self, IsTerminal, stdout};
use std::sync::Arc;

use anyhow::{Result, bail};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::gateway::JobGateway;
use crate::models::AppConfig;
use crate::tui::app::App;
use crate::tui::runtime::{
    TuiRuntime, create_channels, run_event_loop, spawn_input_task, spawn_notification_tick,
};

/// Terminal capability requirements for TUI mode
#[derive(Debug)]
pub struct TerminalCapabilities {
    pub is_tty: bool,
    pub term_type: String,
    pub supports_alternate_screen: bool,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities
    pub fn detect() -> Self {
        let is_tty = stdout().is_terminal();
        let term_type = std::env::var("TERM").unwrap_or_default();
        Self::from_parts(is_tty, term_type)
    }

    fn from_parts(is_tty: bool, term_type: String) -> Self {
        // Check for known problematic terminals
        let supports_alternate_screen = !matches!(term_type.as_str(), "dumb" | "" | "unknown");

        Self {
            is_tty,
            term_type,
            supports_alternate_screen,
        }
    }

    /// Check if terminal is suitable for TUI mode
    pub fn is_suitable(&self) -> bool {
        self.is_tty && self.supports_alternate_screen
    }

    /// Get error message for unsuitable terminal
    pub fn error_message(&self) -> String {
        if !self.is_tty {
            "TUI mode requires an interactive terminal (stdout is not a TTY).\n\
             Hint: Use non-TUI commands like 'jobdeck jobs' or 'jobdeck stats' instead."
                .to_string()
        } else if !self.supports_alternate_screen {
            format!(
                "Terminal type '{}' may not support TUI mode.\n\
                 Hint: Set TERM to a supported value (e.g., xterm-256color) or use CLI mode.",
                if self.term_type.is_empty() {
                    "(unset)"
                } else {
                    &self.term_type
                }
            )
        } else {
            "Unknown terminal capability issue.".to_string()
        }
    }
}

/// Run the jobs screen until the user quits
pub async fn run(
    config: AppConfig,
    config_warnings: Vec<String>,
    gateway: Arc<dyn JobGateway>,
) -> Result<()> {
    // Check terminal capabilities before attempting TUI mode
    let capabilities = TerminalCapabilities::detect();
    if !capabilities.is_suitable() {
        bail!("{}", capabilities.error_message());
    }

    let mut terminal = setup_terminal()?;

    let (input_tx, input_rx, data_tx, data_rx) = create_channels();

    let mut runtime = TuiRuntime::new();
    runtime.track(spawn_input_task(input_tx, runtime.cancel_token()));
    runtime.track(spawn_notification_tick(
        data_tx.clone(),
        runtime.cancel_token(),
    ));

    let mut app = App::new(config, config_warnings, gateway, data_tx);
    let height = terminal.size().map(|size| size.height).unwrap_or_default();
    app.set_viewport_height(height);

    // Mount: fetch both lists
    app.load_all();

    let result = run_event_loop(app, input_rx, data_rx, |app| {
        terminal.draw(|frame| ui::render(app, frame))?;
        Ok(())
    })
    .await;

    runtime.shutdown().await;

    restore_terminal(&mut terminal)?;

    result
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
