//! Job posting types returned by the jobs API.
//!
//! The server is loosely typed: ids arrive as numbers or strings, lists may be
//! `null`, and scores may be fractional. Deserialization here absorbs those
//! differences so the rest of the crate works with one shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a job posting.
///
/// Kept in the shape the server sent it so that ids round-trip unchanged
/// in bulk-enable request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Numeric(n) => write!(f, "{}", n),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        JobId::Numeric(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        JobId::Text(id.to_string())
    }
}

impl FromStr for JobId {
    type Err = std::convert::Infallible;

    /// Parses command-line ids, preferring the numeric form when it fits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(n) => JobId::Numeric(n),
            Err(_) => JobId::Text(trimmed.to_string()),
        })
    }
}

/// Origin platform of a posting.
///
/// Serialized as the display name the server uses. Names the client does not
/// know are preserved in `Other` so nothing is lost or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobSource {
    StackOverflow,
    WeWorkRemotely,
    RemoteOk,
    Greenhouse,
    Internal,
    Other(String),
}

impl JobSource {
    /// Sources offered by the source filter, in display order.
    pub const FILTERABLE: [JobSource; 4] = [
        JobSource::StackOverflow,
        JobSource::WeWorkRemotely,
        JobSource::RemoteOk,
        JobSource::Greenhouse,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            JobSource::StackOverflow => "StackOverflow",
            JobSource::WeWorkRemotely => "We Work Remotely",
            JobSource::RemoteOk => "Remote OK",
            JobSource::Greenhouse => "Greenhouse",
            JobSource::Internal => "Internal",
            JobSource::Other(name) if name.is_empty() => "Unknown",
            JobSource::Other(name) => name,
        }
    }
}

impl Default for JobSource {
    fn default() -> Self {
        JobSource::Other(String::new())
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for JobSource {
    fn from(name: String) -> Self {
        match name.as_str() {
            "StackOverflow" => JobSource::StackOverflow,
            "We Work Remotely" => JobSource::WeWorkRemotely,
            "Remote OK" => JobSource::RemoteOk,
            "Greenhouse" => JobSource::Greenhouse,
            "Internal" => JobSource::Internal,
            _ => JobSource::Other(name),
        }
    }
}

impl From<JobSource> for String {
    fn from(source: JobSource) -> Self {
        match source {
            JobSource::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Error for source names typed on the command line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job source '{0}' (expected one of: stackoverflow, weworkremotely, remoteok, greenhouse)")]
pub struct UnknownSource(pub String);

impl FromStr for JobSource {
    type Err = UnknownSource;

    /// Lenient parse for user input: case, spaces and dashes are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "stackoverflow" | "so" => Ok(JobSource::StackOverflow),
            "weworkremotely" | "wwr" => Ok(JobSource::WeWorkRemotely),
            "remoteok" => Ok(JobSource::RemoteOk),
            "greenhouse" | "gh" => Ok(JobSource::Greenhouse),
            _ => Err(UnknownSource(s.to_string())),
        }
    }
}

/// Action a job row offers for its enabled flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Enable,
    Disable,
}

impl RowAction {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Enable => "Enable",
            RowAction::Disable => "Disable",
        }
    }
}

/// An externally scraped job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: JobSource,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_enabled: bool,
    #[serde(default)]
    pub apply_url: Option<String>,
}

impl JobPosting {
    /// Case-insensitive substring match against title or company.
    ///
    /// `needle` must already be lowercased; an empty needle matches everything.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.company.to_lowercase().contains(needle)
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.location.to_lowercase().contains("remote")
    }

    /// Enabled rows offer Disable, everything else offers Enable
    #[must_use]
    pub fn row_action(&self) -> RowAction {
        if self.is_enabled {
            RowAction::Disable
        } else {
            RowAction::Enable
        }
    }

    /// Enabled jobs can never be picked for bulk-enable
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.is_enabled
    }

    #[must_use]
    pub fn apply_url(&self) -> Option<&str> {
        self.apply_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Parse `posted_date`, accepting RFC 3339, naive timestamps and plain dates.
    #[must_use]
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.posted_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// A posting ranked for the current user.
///
/// Internal postings (`is_external == false`) carry no apply URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedJobPosting {
    #[serde(flatten)]
    pub job: JobPosting,
    #[serde(default, deserialize_with = "score_from_number")]
    pub match_score: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_external: bool,
}

impl RecommendedJobPosting {
    /// Label of the apply button: external postings link out, internal ones are viewed
    #[must_use]
    pub fn apply_label(&self) -> &'static str {
        if self.is_external { "Apply" } else { "View" }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scores are 0-100; fractional or out-of-range values are rounded and clamped.
fn score_from_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}
