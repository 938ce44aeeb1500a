//! Overlay and popup rendering
//!
//! Handles rendering of help, search input, source picker, job preview and
//! notification toasts.

use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::formatting::{format_posted, format_salary};
use crate::tui::app::{
    App, Notification, PreviewTarget, SOURCE_PICKER_LEN, source_picker_choice,
};
use crate::tui::theme::Theme;

use super::widgets::{centered_rect, detail_row, score_span, section_header, source_span};

pub fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(60, 80, area);

    // Clear the area first
    frame.render_widget(Clear, popup_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().fg(theme.border_focused).bold(),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "jobdeck - Keyboard Shortcuts",
            Style::default().bold(),
        )),
        Line::from(""),
        heading("Navigation"),
        Line::from("  j / Down       Move selection down"),
        Line::from("  k / Up         Move selection up"),
        Line::from("  g / Home       Jump to top"),
        Line::from("  G / End        Jump to bottom"),
        Line::from("  Ctrl+d / PgDn  Page down"),
        Line::from("  Ctrl+u / PgUp  Page up"),
        Line::from("  1 / 2 / Tab    External / Recommended tab"),
        Line::from(""),
        heading("Filtering"),
        Line::from("  /              Search title or company"),
        Line::from("  f              Filter by source"),
        Line::from("  Esc            Clear search"),
        Line::from(""),
        heading("Job Actions"),
        Line::from("  Enter / p      Preview job"),
        Line::from("  Space          Select for bulk enable"),
        Line::from("  e / d          Enable / disable job"),
        Line::from("  b              Bulk enable selected jobs"),
        Line::from("  y              Copy apply link"),
        Line::from("  a              Apply / view"),
        Line::from(""),
        heading("General"),
        Line::from("  S              Scrape new jobs"),
        Line::from("  r              Reload lists"),
        Line::from("  ? / F1         Show this help"),
        Line::from("  q              Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close this help",
            Style::default().fg(theme.muted),
        )),
    ];

    let help_para = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .title(" Help "),
        )
        .style(Style::default().fg(theme.fg));

    frame.render_widget(help_para, popup_area);
}

pub fn render_search_overlay(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4).min(60),
        height: 3,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(" Search title or company ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let input_text = format!("/{}", app.screen.search);
    let para = Paragraph::new(input_text).style(Style::default().fg(theme.fg));
    frame.render_widget(para, inner);

    let cursor = 1 + app.screen.search.chars().count() as u16;
    frame.set_cursor_position((inner.x + cursor.min(inner.width.saturating_sub(1)), inner.y));
}

pub fn render_source_picker(selected: usize, frame: &mut Frame, area: Rect, theme: &Theme) {
    let height = SOURCE_PICKER_LEN as u16 + 2;
    let popup_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4).min(32),
        height: height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = (0..SOURCE_PICKER_LEN)
        .map(|idx| {
            let marker = if idx == selected { "> " } else { "  " };
            let label = match source_picker_choice(idx) {
                Some(source) => source_span(&source, theme),
                None => Span::raw("All sources"),
            };
            let line = Line::from(vec![Span::raw(marker), label]);
            if idx == selected {
                line.style(Style::default().bg(theme.selected_bg).bold())
            } else {
                line
            }
        })
        .collect();

    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused))
            .title(" Source "),
    );

    frame.render_widget(para, popup_area);
}

/// Render the preview of a single job
pub fn render_preview(target: &PreviewTarget, frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);

    let job = target.job();
    let title = format!(" {} ", job.title);

    let mut lines = vec![
        detail_row("Company:   ", &job.company),
        detail_row("Location:  ", &job.location),
        Line::from(vec![
            Span::styled("Source:    ", Style::default().bold()),
            source_span(&job.source, theme),
        ]),
    ];

    if let Some(score) = target.match_score() {
        lines.push(Line::from(vec![
            Span::styled("Match:     ", Style::default().bold()),
            score_span(score, theme),
        ]));
    }

    lines.push(detail_row(
        "Salary:    ",
        &format_salary(job.salary_min, job.salary_max),
    ));
    lines.push(detail_row("Posted:    ", &format_posted(job, Utc::now())));
    lines.push(Line::from(vec![
        Span::styled("Status:    ", Style::default().bold()),
        Span::styled(
            if job.is_enabled { "Enabled" } else { "Disabled" },
            Style::default().fg(theme.enabled_color(job.is_enabled)),
        ),
    ]));

    lines.push(Line::from(""));
    lines.push(section_header("Skills", theme));
    if job.skills.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none listed",
            Style::default().fg(theme.muted),
        )));
    } else {
        lines.push(Line::from(format!("  {}", job.skills.join(", "))));
    }

    lines.push(Line::from(""));
    lines.push(section_header("Apply", theme));
    let internal = matches!(target, PreviewTarget::Recommended(rec) if !rec.is_external);
    match job.apply_url() {
        Some(url) if !internal => lines.push(Line::from(format!("  {}", url))),
        _ => lines.push(Line::from(Span::styled(
            "  Internal job posting, no external link",
            Style::default().fg(theme.muted),
        ))),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y: copy link  a: apply  Esc: close",
        Style::default().fg(theme.muted),
    )));

    let para = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.source_color(&job.source)))
                .title(title),
        )
        .style(Style::default().fg(theme.fg))
        .wrap(Wrap { trim: false });

    frame.render_widget(para, popup_area);
}

pub fn render_notification_toast(
    notification: &Notification,
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
) {
    // Position toast at bottom-right, above the status bar
    let toast_width = (notification.message.chars().count() + 4).min(60) as u16;
    let toast_width = toast_width.min(area.width);
    let toast_area = Rect {
        x: area.width.saturating_sub(toast_width + 2),
        y: area.height.saturating_sub(5),
        width: toast_width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, toast_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.severity_color(notification.severity)));

    let para = Paragraph::new(format!(" {} ", notification.message))
        .block(block)
        .style(Style::default().fg(theme.fg))
        .alignment(Alignment::Center);

    frame.render_widget(para, toast_area);
}
