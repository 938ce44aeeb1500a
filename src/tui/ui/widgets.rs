//! Reusable UI widgets and helper functions
//!
//! This module contains shared rendering utilities used across the table and overlays.

use ratatui::prelude::*;
use ratatui::widgets::{Cell, Row};

use crate::models::JobSource;
use crate::tui::theme::Theme;

/// Create a styled table header row from column names
pub fn create_table_header<'a>(columns: &[&'a str], theme: &Theme) -> Row<'a> {
    let header_cells = columns
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(theme.header_fg).bold()));
    Row::new(header_cells)
        .style(Style::default().bg(theme.header_bg))
        .height(1)
}

/// Calculate scroll offset to keep selection visible
pub fn calculate_scroll_offset(selected: usize, visible_height: usize, total: usize) -> usize {
    if visible_height == 0 || total == 0 {
        return 0;
    }

    if selected < visible_height / 2 {
        0
    } else if selected > total.saturating_sub(visible_height / 2) {
        total.saturating_sub(visible_height)
    } else {
        selected.saturating_sub(visible_height / 2)
    }
}

/// Create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Bold section title inside a popup
pub fn section_header(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.border_focused).bold(),
    ))
}

/// `label value` line inside a popup
pub fn detail_row(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(label.to_string(), Style::default().bold()),
        Span::raw(value.to_string()),
    ])
}

/// Source name in its badge color
pub fn source_span(source: &JobSource, theme: &Theme) -> Span<'static> {
    Span::styled(
        source.to_string(),
        Style::default().fg(theme.source_color(source)),
    )
}

/// Match score as a percentage in its band color
pub fn score_span(score: u8, theme: &Theme) -> Span<'static> {
    Span::styled(
        format!("{}%", score),
        Style::default().fg(theme.score_color(score)).bold(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(calculate_scroll_offset(0, 10, 100), 0);
        assert_eq!(calculate_scroll_offset(50, 10, 100), 45);
        assert_eq!(calculate_scroll_offset(99, 10, 100), 90);
        assert_eq!(calculate_scroll_offset(3, 0, 100), 0);
    }

    #[test]
    fn test_centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert!(popup.x >= area.x && popup.right() <= area.right());
    }
}
