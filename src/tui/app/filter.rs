//! Derived views over the loaded job lists
//!
//! Everything here is a pure function of screen state and is recomputed on
//! every render. Nothing is cached.

use crate::models::{JobPosting, JobSource, RecommendedJobPosting};

/// External jobs whose title or company contains `search`, case-insensitively.
/// Server order is preserved.
#[must_use]
pub fn filter_external<'a>(jobs: &'a [JobPosting], search: &str) -> Vec<&'a JobPosting> {
    let needle = search.to_lowercase();
    jobs.iter().filter(|job| job.matches_search(&needle)).collect()
}

/// Recommendations filtered by the same rule as [`filter_external`]
#[must_use]
pub fn filter_recommended<'a>(
    jobs: &'a [RecommendedJobPosting],
    search: &str,
) -> Vec<&'a RecommendedJobPosting> {
    let needle = search.to_lowercase();
    jobs.iter()
        .filter(|rec| rec.job.matches_search(&needle))
        .collect()
}

/// Jobs whose location mentions "remote"
#[must_use]
pub fn remote_count(jobs: &[JobPosting]) -> usize {
    jobs.iter().filter(|job| job.is_remote()).count()
}

/// Match score tiers used for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreBand::High,
            60..=79 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }
}

/// Headline numbers for the statistics bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobStats {
    pub total_external: usize,
    pub total_recommended: usize,
    pub sources: usize,
    pub remote: usize,
}

/// Statistics over the full loaded lists, independent of the search string
#[must_use]
pub fn job_stats(external: &[JobPosting], recommended: &[RecommendedJobPosting]) -> JobStats {
    JobStats {
        total_external: external.len(),
        total_recommended: recommended.len(),
        sources: JobSource::FILTERABLE.len(),
        remote: remote_count(external),
    }
}
