//! Data models for the jobs API and application configuration.

mod config;
mod envelope;
mod job;

pub use config::{
    AppConfig, BehaviorConfig, ConfigError, DEFAULT_SERVER_URL, DisplayConfig, LimitsConfig,
    ServerConfig,
};
pub use envelope::{BulkEnableRequest, Envelope};
pub use job::{JobId, JobPosting, JobSource, RecommendedJobPosting, RowAction, UnknownSource};
