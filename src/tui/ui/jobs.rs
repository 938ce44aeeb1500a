//! Jobs table rendering
//!
//! External jobs and recommendations share the frame; the active tab picks
//! the column set.

use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::formatting::{format_posted, format_salary, format_skills, truncate_string};
use crate::models::JobPosting;
use crate::tui::app::{App, ListState, ScreenPhase, Tab};
use crate::tui::theme::Theme;

use super::widgets::{calculate_scroll_offset, create_table_header, score_span, source_span};

pub fn render_jobs_view(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let title = match app.current_tab {
        Tab::External => match &app.screen.source_filter {
            Some(source) => format!(" External Jobs - {} ", source),
            None => " External Jobs ".to_string(),
        },
        Tab::Recommended => " Recommended Jobs ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let now = Utc::now();
    match app.current_tab {
        Tab::External => render_external_table(app, frame, inner, theme, now),
        Tab::Recommended => render_recommended_table(app, frame, inner, theme, now),
    }
}

fn render_empty(app: &App, frame: &mut Frame, area: Rect, theme: &Theme, what: &str) {
    let msg = match app.phase() {
        ScreenPhase::Initial | ScreenPhase::Loading => format!("Loading {}...", what),
        _ if !app.screen.search.is_empty() => format!("No {} match '{}'", what, app.screen.search),
        _ => format!("No {} found", what),
    };
    let para = Paragraph::new(msg)
        .style(Style::default().fg(theme.muted))
        .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

/// First visible row: the tracked offset once the viewport is known
fn scroll_offset(list: &ListState, visible_height: usize, total: usize) -> usize {
    if list.visible_count == 0 {
        calculate_scroll_offset(list.selected, visible_height, total)
    } else {
        list.scroll_offset.min(total.saturating_sub(1))
    }
}

fn title_cell<'a>(job: &JobPosting, max_len: usize, theme: &Theme) -> Cell<'a> {
    Cell::from(Line::from(vec![
        Span::styled(truncate_string(&job.title, max_len), Style::default().bold()),
        Span::styled(
            format!("  {}", truncate_string(&job.company, 24)),
            Style::default().fg(theme.muted),
        ),
    ]))
}

fn render_external_table(
    app: &App,
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    now: DateTime<Utc>,
) {
    let jobs = app.visible_external();
    if jobs.is_empty() {
        render_empty(app, frame, area, theme, "external jobs");
        return;
    }

    let header = create_table_header(
        &[
            "Sel", "Title / Company", "Location", "Source", "Skills", "Salary", "Posted",
            "Status", "Action",
        ],
        theme,
    )
    .bottom_margin(1);

    // -2 for header and its margin
    let available_height = area.height.saturating_sub(2) as usize;
    let selected = app.external_view.selected;
    let offset = scroll_offset(&app.external_view, available_height, jobs.len());
    let title_len = app.config.display.title_max_length;

    let rows: Vec<Row> = jobs
        .iter()
        .enumerate()
        .skip(offset)
        .take(available_height)
        .map(|(idx, job)| {
            let marker = if !job.is_selectable() {
                Span::styled(" - ", Style::default().fg(theme.muted))
            } else if app.screen.selection.contains(&job.id) {
                Span::styled("[x]", Style::default().fg(theme.marked).bold())
            } else {
                Span::raw("[ ]")
            };
            let status = if job.is_enabled { "Enabled" } else { "Disabled" };

            let row = Row::new(vec![
                Cell::from(marker),
                title_cell(job, title_len, theme),
                Cell::from(truncate_string(&job.location, 18)),
                Cell::from(source_span(&job.source, theme)),
                Cell::from(format_skills(&job.skills)),
                Cell::from(format_salary(job.salary_min, job.salary_max)),
                Cell::from(format_posted(job, now)),
                Cell::from(status).style(Style::default().fg(theme.enabled_color(job.is_enabled))),
                Cell::from(job.row_action().label()),
            ]);

            if idx == selected {
                row.style(
                    Style::default()
                        .bg(theme.selected_bg)
                        .fg(theme.selected_fg),
                )
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(3),  // Sel
        Constraint::Min(30),    // Title / Company
        Constraint::Length(18), // Location
        Constraint::Length(16), // Source
        Constraint::Length(24), // Skills
        Constraint::Length(20), // Salary
        Constraint::Length(9),  // Posted
        Constraint::Length(8),  // Status
        Constraint::Length(7),  // Action
    ];

    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(table, area);
}

fn render_recommended_table(
    app: &App,
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    now: DateTime<Utc>,
) {
    let recs = app.visible_recommended();
    if recs.is_empty() {
        render_empty(app, frame, area, theme, "recommendations");
        return;
    }

    let header = create_table_header(
        &[
            "Match", "Title / Company", "Location", "Source", "Skills", "Salary", "Posted",
            "Status", "Apply",
        ],
        theme,
    )
    .bottom_margin(1);

    let available_height = area.height.saturating_sub(2) as usize;
    let selected = app.recommended_view.selected;
    let offset = scroll_offset(&app.recommended_view, available_height, recs.len());
    let title_len = app.config.display.title_max_length;

    let rows: Vec<Row> = recs
        .iter()
        .enumerate()
        .skip(offset)
        .take(available_height)
        .map(|(idx, rec)| {
            let job = &rec.job;
            let status = if job.is_enabled { "Enabled" } else { "Disabled" };

            let row = Row::new(vec![
                Cell::from(score_span(rec.match_score, theme)),
                title_cell(job, title_len, theme),
                Cell::from(truncate_string(&job.location, 18)),
                Cell::from(source_span(&job.source, theme)),
                Cell::from(format_skills(&job.skills)),
                Cell::from(format_salary(job.salary_min, job.salary_max)),
                Cell::from(format_posted(job, now)),
                Cell::from(status).style(Style::default().fg(theme.enabled_color(job.is_enabled))),
                Cell::from(rec.apply_label()),
            ]);

            if idx == selected {
                row.style(
                    Style::default()
                        .bg(theme.selected_bg)
                        .fg(theme.selected_fg),
                )
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(5),  // Match
        Constraint::Min(30),    // Title / Company
        Constraint::Length(18), // Location
        Constraint::Length(16), // Source
        Constraint::Length(24), // Skills
        Constraint::Length(20), // Salary
        Constraint::Length(9),  // Posted
        Constraint::Length(8),  // Status
        Constraint::Length(5),  // Apply
    ];

    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(table, area);
}
