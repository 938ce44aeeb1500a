//! Display and formatting functions for CLI output

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, Width, object::Rows},
};

use crate::formatting::{format_posted, format_salary, format_skills, truncate_string};
use crate::models::{JobPosting, JobSource, RecommendedJobPosting};
use crate::tui::app::{JobStats, ScoreBand};

/// Visible width of the statistics box
const BOX_WIDTH: usize = 48;

#[derive(Tabled)]
struct ExternalJobRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Skills")]
    skills: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "Posted")]
    posted: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Match")]
    score: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "Apply")]
    apply: String,
}

/// Source name in its badge color
fn format_source(source: &JobSource) -> String {
    let name = source.as_str();
    match source {
        JobSource::StackOverflow => name.bright_blue().to_string(),
        JobSource::WeWorkRemotely => name.green().to_string(),
        JobSource::RemoteOk => name.yellow().to_string(),
        JobSource::Greenhouse => name.magenta().to_string(),
        JobSource::Internal => name.bright_yellow().to_string(),
        JobSource::Other(_) => name.white().to_string(),
    }
}

fn format_status(enabled: bool) -> String {
    if enabled {
        "Enabled".green().to_string()
    } else {
        "Disabled".bright_black().to_string()
    }
}

fn format_score(score: u8) -> String {
    let text = format!("{}%", score);
    match ScoreBand::from_score(score) {
        ScoreBand::High => text.green().to_string(),
        ScoreBand::Medium => text.yellow().to_string(),
        ScoreBand::Low => text.red().to_string(),
    }
}

fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Width::wrap(200).keep_words(true))
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Table of external jobs in server order
pub fn format_external_jobs(jobs: &[&JobPosting], title_max: usize, now: DateTime<Utc>) -> String {
    if jobs.is_empty() {
        return "No external jobs found".yellow().to_string();
    }

    let rows: Vec<ExternalJobRow> = jobs
        .iter()
        .map(|job| ExternalJobRow {
            id: job.id.to_string(),
            title: truncate_string(&job.title, title_max),
            company: job.company.clone(),
            location: job.location.clone(),
            source: format_source(&job.source),
            skills: format_skills(&job.skills),
            salary: format_salary(job.salary_min, job.salary_max),
            posted: format_posted(job, now),
            status: format_status(job.is_enabled),
        })
        .collect();

    render_table(rows)
}

/// Table of recommendations with their match score
pub fn format_recommendations(recs: &[&RecommendedJobPosting], title_max: usize) -> String {
    if recs.is_empty() {
        return "No recommendations found".yellow().to_string();
    }

    let rows: Vec<RecommendationRow> = recs
        .iter()
        .map(|rec| {
            let job = &rec.job;
            let apply = match job.apply_url() {
                Some(url) if rec.is_external => url.to_string(),
                _ => "Internal".bright_black().to_string(),
            };
            RecommendationRow {
                score: format_score(rec.match_score),
                id: job.id.to_string(),
                title: truncate_string(&job.title, title_max),
                company: job.company.clone(),
                location: job.location.clone(),
                source: format_source(&job.source),
                salary: format_salary(job.salary_min, job.salary_max),
                apply,
            }
        })
        .collect();

    render_table(rows)
}

/// Strip ANSI color codes to calculate visible width
fn strip_ansi(s: &str) -> String {
    let mut result = String::new();
    let mut in_escape = false;

    for ch in s.chars() {
        if ch == '\x1b' {
            in_escape = true;
        } else if in_escape && ch == 'm' {
            in_escape = false;
        } else if !in_escape {
            result.push(ch);
        }
    }

    result
}

/// Pad a line to fit within the box
fn pad_line(content: &str) -> String {
    let visible_len = strip_ansi(content).chars().count();
    let padding = " ".repeat(BOX_WIDTH.saturating_sub(visible_len));

    format!("{}{}{}{}", "│".blue(), content, padding, "│".blue())
}

/// Boxed statistics summary
pub fn format_stats(stats: &JobStats, source_filter: Option<&JobSource>) -> String {
    let mut output = String::new();
    let rule = "─".repeat(BOX_WIDTH);

    output.push_str(&format!("{}\n", format!("╭{}╮", rule).blue()));

    let title = match source_filter {
        Some(source) => format!(" Job Statistics ({})", source),
        None => " Job Statistics".to_string(),
    };
    output.push_str(&pad_line(&title.bold().to_string()));
    output.push('\n');
    output.push_str(&format!("{}\n", format!("├{}┤", rule).blue()));

    let line = |label: &str, value: String| pad_line(&format!(" {:<22}{}", label, value));
    output.push_str(&line(
        "Total jobs",
        stats.total_external.to_string().bright_blue().bold().to_string(),
    ));
    output.push('\n');
    output.push_str(&line(
        "Recommended",
        stats.total_recommended.to_string().magenta().bold().to_string(),
    ));
    output.push('\n');
    output.push_str(&line(
        "Job sources",
        stats.sources.to_string().yellow().bold().to_string(),
    ));
    output.push('\n');
    output.push_str(&line(
        "Remote jobs",
        stats.remote.to_string().green().bold().to_string(),
    ));
    output.push('\n');

    output.push_str(&format!("{}", format!("╰{}╯", rule).blue()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobId;

    fn job(id: i64, title: &str, enabled: bool) -> JobPosting {
        JobPosting {
            id: JobId::from(id),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            source: JobSource::RemoteOk,
            skills: vec!["rust".to_string()],
            salary_min: Some(90000.0),
            salary_max: None,
            posted_date: None,
            is_enabled: enabled,
            apply_url: None,
        }
    }

    #[test]
    fn test_strip_ansi() {
        let colored = "Enabled".green().to_string();
        assert_eq!(strip_ansi(&colored), "Enabled");
    }

    #[test]
    fn test_external_table_contents() {
        let jobs = [job(7, "Backend Engineer", true)];
        let refs: Vec<&JobPosting> = jobs.iter().collect();
        let output = strip_ansi(&format_external_jobs(&refs, 40, Utc::now()));

        assert!(output.contains("Backend Engineer"));
        assert!(output.contains("$90,000+"));
        assert!(output.contains("Unknown"));
        assert!(output.contains("Enabled"));
    }

    #[test]
    fn test_empty_tables() {
        assert!(strip_ansi(&format_external_jobs(&[], 40, Utc::now())).contains("No external jobs"));
        assert!(strip_ansi(&format_recommendations(&[], 40)).contains("No recommendations"));
    }

    #[test]
    fn test_internal_recommendation_has_no_link() {
        let rec = RecommendedJobPosting {
            job: job(3, "Staff Engineer", false),
            match_score: 91,
            is_external: false,
        };
        let output = strip_ansi(&format_recommendations(&[&rec], 40));
        assert!(output.contains("91%"));
        assert!(output.contains("Internal"));
    }

    #[test]
    fn test_stats_box_lines_align() {
        let stats = JobStats {
            total_external: 25,
            total_recommended: 4,
            sources: 3,
            remote: 3,
        };
        let output = format_stats(&stats, None);
        let widths: Vec<usize> = output
            .lines()
            .map(|l| strip_ansi(l).chars().count())
            .collect();
        assert!(widths.iter().all(|w| *w == BOX_WIDTH + 2));
        assert!(strip_ansi(&output).contains("Remote jobs"));
    }
}
