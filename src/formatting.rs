//! Shared formatting utilities used by both CLI and TUI
//!
//! Salary ranges, posting age and skill summaries render the same way in the
//! printed tables and in the interactive screen.

use chrono::{DateTime, Utc};

use crate::models::JobPosting;

/// Number of skill tags shown before collapsing into `+N`
pub const SKILLS_SHOWN: usize = 3;

const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// Truncate a string to a maximum length (in characters), adding "..." at the end if truncated.
///
/// Unicode-safe: counts characters, not bytes.
///
/// # Examples
/// ```
/// use jobdeck::formatting::truncate_string;
/// assert_eq!(truncate_string("hello", 10), "hello");
/// assert_eq!(truncate_string("hello world", 8), "hello...");
/// ```
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a whole amount with comma thousands separators.
///
/// # Examples
/// ```
/// use jobdeck::formatting::format_thousands;
/// assert_eq!(format_thousands(950.0), "950");
/// assert_eq!(format_thousands(120000.0), "120,000");
/// ```
#[must_use]
pub fn format_thousands(amount: f64) -> String {
    let rounded = amount.round().abs() as u64;
    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if amount < 0.0 && rounded > 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Salary column: `$min - $max`, `$min+`, or `Not specified`.
///
/// A zero bound counts as absent, and a max without a min is not shown.
#[must_use]
pub fn format_salary(min: Option<f64>, max: Option<f64>) -> String {
    let present = |v: Option<f64>| v.filter(|n| *n != 0.0 && !n.is_nan());

    match (present(min), present(max)) {
        (Some(lo), Some(hi)) => format!("${} - ${}", format_thousands(lo), format_thousands(hi)),
        (Some(lo), None) => format!("${}+", format_thousands(lo)),
        _ => "Not specified".to_string(),
    }
}

/// Whole days between `posted` and `now`, rounded up, as `Nd ago`.
#[must_use]
pub fn format_age_days(posted: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - posted).num_seconds().abs();
    let days = (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    format!("{}d ago", days)
}

/// Posted column for a job, `Unknown` when the date is absent or unreadable
#[must_use]
pub fn format_posted(job: &JobPosting, now: DateTime<Utc>) -> String {
    job.posted_at()
        .map(|posted| format_age_days(posted, now))
        .unwrap_or_else(|| "Unknown".to_string())
}

/// First [`SKILLS_SHOWN`] skills plus the overflow count
#[must_use]
pub fn skills_summary(skills: &[String]) -> (&[String], usize) {
    let shown = &skills[..skills.len().min(SKILLS_SHOWN)];
    (shown, skills.len() - shown.len())
}

/// Skills as one line, e.g. `rust, go, sql +2`
#[must_use]
pub fn format_skills(skills: &[String]) -> String {
    let (shown, overflow) = skills_summary(skills);
    let mut line = shown.join(", ");
    if overflow > 0 {
        line.push_str(&format!(" +{}", overflow));
    }
    if line.is_empty() {
        "-".to_string()
    } else {
        line
    }
}
