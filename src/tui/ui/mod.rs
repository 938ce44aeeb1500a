//! UI rendering for the TUI
//!
//! This module handles all rendering using ratatui. The rendering is event-driven -
//! we only render when an event triggers a state change, not at a fixed frame rate.

mod jobs;
mod overlays;
mod widgets;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use crate::tui::app::{App, ModalState, STATUS_HEIGHT, ScreenPhase, SliceStatus, Tab};
use crate::tui::theme::Theme;

use jobs::render_jobs_view;
use overlays::{
    render_help_overlay, render_notification_toast, render_preview, render_search_overlay,
    render_source_picker,
};

/// Render the entire TUI
pub fn render(app: &App, frame: &mut Frame) {
    // Use theme from configuration
    let theme = Theme::from_name(&app.config.display.theme);
    let area = frame.area();

    // Main layout: stats, controls, table, footer
    let layout = Layout::vertical([
        Constraint::Length(3),             // Stats bar
        Constraint::Length(3),             // Tabs and filters
        Constraint::Min(0),                // Jobs table
        Constraint::Length(STATUS_HEIGHT), // Status bar
    ])
    .split(area);

    render_stats_bar(app, frame, layout[0], &theme);
    render_controls(app, frame, layout[1], &theme);
    render_jobs_view(app, frame, layout[2], &theme);
    render_status_bar(app, frame, layout[3], &theme);

    // Overlays (render in order of z-index)
    match &app.modal {
        ModalState::Help => render_help_overlay(frame, area, &theme),
        ModalState::Search { .. } => render_search_overlay(app, frame, area, &theme),
        ModalState::SourcePicker { selected } => {
            render_source_picker(*selected, frame, area, &theme)
        }
        ModalState::Preview { target } => render_preview(target, frame, area, &theme),
        ModalState::None => {}
    }

    // Notification toast (always on top)
    if let Some(notification) = app.current_notification() {
        render_notification_toast(notification, frame, area, &theme);
    }
}

fn stat<'a>(label: &'a str, value: usize, color: Color) -> Vec<Span<'a>> {
    vec![
        Span::raw(format!(" {}: ", label)),
        Span::styled(value.to_string(), Style::default().fg(color).bold()),
        Span::raw("  "),
    ]
}

fn render_stats_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let stats = app.stats();

    let mut spans = Vec::new();
    spans.extend(stat("External", stats.total_external, theme.blue));
    spans.extend(stat("Recommended", stats.total_recommended, theme.purple));
    spans.extend(stat("Sources", stats.sources, theme.gold));
    spans.extend(stat("Remote", stats.remote, theme.green));

    let (phase_text, phase_color) = match app.phase() {
        ScreenPhase::Initial => ("Starting", theme.muted),
        ScreenPhase::Loading => ("Loading...", theme.info),
        ScreenPhase::Scraping => ("Scraping...", theme.warn),
        ScreenPhase::Ready => ("Ready", theme.good),
    };
    spans.push(Span::styled(
        format!("[{}]", phase_text),
        Style::default().fg(phase_color),
    ));

    let para = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(theme.fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(" jobdeck "),
        );
    frame.render_widget(para, area);
}

fn render_controls(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns =
        Layout::horizontal([Constraint::Length(44), Constraint::Min(0)]).split(inner);

    let titles: Vec<Line> = [Tab::External, Tab::Recommended]
        .iter()
        .zip(app.tab_counts())
        .enumerate()
        .map(|(i, (tab, count))| {
            let num = format!("[{}]", i + 1);
            let label = format!("{} ({})", tab.label(), count);
            if *tab == app.current_tab {
                Line::from(vec![
                    Span::styled(num, Style::default().fg(theme.border_focused)),
                    Span::styled(label, Style::default().fg(theme.fg).bold()),
                ])
            } else {
                Line::from(vec![
                    Span::styled(num, Style::default().fg(theme.border)),
                    Span::raw(label),
                ])
            }
        })
        .collect();

    let selected_tab = match app.current_tab {
        Tab::External => 0,
        Tab::Recommended => 1,
    };
    let tabs = Tabs::new(titles)
        .select(selected_tab)
        .divider(" | ")
        .style(Style::default().fg(theme.muted))
        .highlight_style(Style::default().fg(theme.fg).bold());
    frame.render_widget(tabs, columns[0]);

    let source = app
        .screen
        .source_filter
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "All".to_string());
    let mut filters = vec![
        Span::styled("Source: ", Style::default().fg(theme.muted)),
        Span::raw(source),
    ];
    if !app.screen.search.is_empty() {
        filters.push(Span::styled("  Search: ", Style::default().fg(theme.muted)));
        filters.push(Span::raw(format!("'{}'", app.screen.search)));
    }
    if !app.screen.selection.is_empty() {
        filters.push(Span::styled(
            format!("  {} selected", app.screen.selection.len()),
            Style::default().fg(theme.marked).bold(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(filters)), columns[1]);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let layout = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

    // Keybindings line - context-sensitive
    let keybinds = match (&app.modal, app.current_tab) {
        (ModalState::Search { .. }, _) => " Enter:apply  Esc:cancel  Ctrl+u:clear ",
        (ModalState::SourcePicker { .. }, _) => " j/k:move  Enter:choose  Esc:close ",
        (ModalState::Preview { .. }, _) => " y:copy link  a:apply  Esc:close ",
        (_, Tab::External) => {
            " j/k:move  Enter:preview  Space:select  e/d:enable/disable  b:bulk  S:scrape  f:source  /:search  ?:help  q:quit "
        }
        (_, Tab::Recommended) => {
            " j/k:move  Enter:preview  a:apply  y:copy link  f:source  /:search  ?:help  q:quit "
        }
    };
    let keybinds_para = Paragraph::new(keybinds).style(Style::default().fg(theme.border));
    frame.render_widget(keybinds_para, layout[0]);

    // Status line with more info
    let mut status_parts = Vec::new();

    let slice_status = match app.current_tab {
        Tab::External => app.screen.external.status(),
        Tab::Recommended => app.screen.recommended.status(),
    };
    let freshness = match slice_status {
        SliceStatus::Updated(age) => {
            let age_secs = age.as_secs();
            let age_str = if age_secs < 60 {
                format!("{}s", age_secs)
            } else {
                format!("{}m", age_secs / 60)
            };
            Span::styled(
                format!(" Updated: {} ago", age_str),
                Style::default().fg(theme.border),
            )
        }
        SliceStatus::Loading => Span::styled(" Loading...", Style::default().fg(theme.info)),
        SliceStatus::Failed => Span::styled(
            " Load failed (r to retry)",
            Style::default().fg(theme.bad),
        ),
        SliceStatus::NotLoaded => Span::styled(" Not loaded", Style::default().fg(theme.border)),
    };
    status_parts.push(freshness);

    let visible = match app.current_tab {
        Tab::External => app.visible_external().len(),
        Tab::Recommended => app.visible_recommended().len(),
    };
    status_parts.push(Span::styled(
        format!(" | {} shown", visible),
        Style::default().fg(theme.border),
    ));

    // Config warnings display (persistent until fixed)
    if !app.feedback.config_warnings.is_empty() {
        // Show first warning with count if multiple
        let warning_text = if app.feedback.config_warnings.len() == 1 {
            format!(" | WARN: {}", app.feedback.config_warnings[0])
        } else {
            format!(
                " | WARN: {} (+{} more)",
                app.feedback.config_warnings[0],
                app.feedback.config_warnings.len() - 1
            )
        };
        status_parts.push(Span::styled(warning_text, Style::default().fg(theme.warn)));
    }

    let status_para = Paragraph::new(Line::from(status_parts));
    frame.render_widget(status_para, layout[1]);
}
