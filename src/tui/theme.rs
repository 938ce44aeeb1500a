//! Theme definitions for the TUI
//!
//! Dark and light palettes. The default is "dark"; "light" can be chosen via
//! the config file or `JOBDECK_THEME`.

use ratatui::style::Color;

use crate::models::JobSource;
use crate::tui::app::{ScoreBand, Severity};

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => ThemeName::Light,
            _ => ThemeName::Dark,
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,

    // Base colors
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,

    // Source badges
    pub blue: Color,
    pub green: Color,
    pub orange: Color,
    pub purple: Color,
    pub gold: Color,

    // Match score and status
    pub good: Color,
    pub warn: Color,
    pub bad: Color,
    pub info: Color,

    // UI elements
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub marked: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,

            fg: Color::White,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            blue: Color::Rgb(80, 160, 255),
            green: Color::Rgb(0, 200, 0),
            orange: Color::Rgb(255, 160, 0),
            purple: Color::Rgb(180, 120, 255),
            gold: Color::Rgb(230, 190, 40),

            good: Color::Rgb(0, 200, 0),
            warn: Color::Rgb(255, 160, 0),
            bad: Color::Rgb(255, 80, 80),
            info: Color::Rgb(80, 160, 255),

            selected_bg: Color::Rgb(60, 60, 80),
            selected_fg: Color::White,
            header_bg: Color::Rgb(40, 80, 120),
            header_fg: Color::White,
            marked: Color::Cyan,
        }
    }

    /// Create a light theme
    /// Uses darker, more saturated colors for visibility on light backgrounds
    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,

            fg: Color::Black,
            muted: Color::Rgb(120, 120, 120),
            border: Color::Rgb(120, 120, 120),
            border_focused: Color::Rgb(0, 100, 180),

            blue: Color::Rgb(0, 80, 180),
            green: Color::Rgb(0, 140, 0),
            orange: Color::Rgb(200, 110, 0),
            purple: Color::Rgb(120, 40, 170),
            gold: Color::Rgb(160, 120, 0),

            good: Color::Rgb(0, 140, 0),
            warn: Color::Rgb(200, 110, 0),
            bad: Color::Rgb(200, 0, 0),
            info: Color::Rgb(0, 80, 180),

            selected_bg: Color::Rgb(200, 220, 255),
            selected_fg: Color::Black,
            header_bg: Color::Rgb(180, 200, 230),
            header_fg: Color::Black,
            marked: Color::Rgb(0, 100, 180),
        }
    }

    /// Create theme from name string
    pub fn from_name(name: &str) -> Self {
        match ThemeName::parse(name) {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Badge color for a source. Unknown sources use the plain foreground.
    pub fn source_color(&self, source: &JobSource) -> Color {
        match source {
            JobSource::StackOverflow => self.blue,
            JobSource::WeWorkRemotely => self.green,
            JobSource::RemoteOk => self.orange,
            JobSource::Greenhouse => self.purple,
            JobSource::Internal => self.gold,
            JobSource::Other(_) => self.fg,
        }
    }

    /// Match score: >= 80 green, >= 60 orange, else red
    pub fn score_color(&self, score: u8) -> Color {
        match ScoreBand::from_score(score) {
            ScoreBand::High => self.good,
            ScoreBand::Medium => self.warn,
            ScoreBand::Low => self.bad,
        }
    }

    pub fn enabled_color(&self, enabled: bool) -> Color {
        if enabled { self.good } else { self.muted }
    }

    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.good,
            Severity::Info => self.info,
            Severity::Warning => self.warn,
            Severity::Error => self.bad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name() {
        assert_eq!(Theme::from_name("dark").name, ThemeName::Dark);
        assert_eq!(Theme::from_name("Light").name, ThemeName::Light);

        // Unknown defaults to dark
        assert_eq!(Theme::from_name("solarized").name, ThemeName::Dark);
    }

    #[test]
    fn test_source_colors_are_total() {
        let theme = Theme::dark();
        assert_eq!(theme.source_color(&JobSource::StackOverflow), theme.blue);
        assert_eq!(theme.source_color(&JobSource::WeWorkRemotely), theme.green);
        assert_eq!(theme.source_color(&JobSource::RemoteOk), theme.orange);
        assert_eq!(theme.source_color(&JobSource::Greenhouse), theme.purple);
        assert_eq!(theme.source_color(&JobSource::Internal), theme.gold);
        assert_eq!(
            theme.source_color(&JobSource::Other("Indeed".to_string())),
            theme.fg
        );
    }

    #[test]
    fn test_score_color() {
        let theme = Theme::dark();
        assert_eq!(theme.score_color(92), theme.good);
        assert_eq!(theme.score_color(60), theme.warn);
        assert_eq!(theme.score_color(12), theme.bad);
    }
}
