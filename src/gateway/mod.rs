//! Job data gateway
//!
//! Stateless translation of screen intents into calls against the jobs API.
//! Every call is a single attempt: no retry, no backoff. The `{success, result,
//! error}` envelope is normalized into `Result<T, GatewayError>` so callers only
//! deal with one failure shape.

mod credentials;
mod http;

pub use credentials::{
    CredentialChain, CredentialProvider, EnvToken, NoCredentials, StaticToken, TokenFile,
    TOKEN_ENV_VAR,
};
pub use http::HttpGateway;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{JobId, JobPosting, JobSource, RecommendedJobPosting};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Everything that can go wrong between an intent and its response
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed (connect, timeout, TLS, ...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status with a body that is not an envelope
    #[error("server returned {status}")]
    Status { status: reqwest::StatusCode },

    /// The server answered with `success: false`
    #[error("{}", .message.as_deref().unwrap_or("request rejected by server"))]
    Rejected { message: Option<String> },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not resolve credentials: {0}")]
    Credentials(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            message: Some(message.into()),
        }
    }

    /// Error text supplied by the server, if any
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }
}

/// Operations the jobs screen needs from the remote service
#[async_trait]
pub trait JobGateway: Send + Sync {
    /// `GET /user/external_jobs`, server order preserved
    async fn list_external_jobs(
        &self,
        limit: u32,
        source: Option<JobSource>,
    ) -> GatewayResult<Vec<JobPosting>>;

    /// `GET /user/recommend_external_jobs`
    async fn list_recommended_external_jobs(
        &self,
        limit: u32,
    ) -> GatewayResult<Vec<RecommendedJobPosting>>;

    /// `GET /user/recommend_all_jobs`
    async fn list_all_recommended_jobs(
        &self,
        limit: u32,
    ) -> GatewayResult<Vec<RecommendedJobPosting>>;

    /// `POST /user/scrape_jobs`. Returns once the server acknowledges.
    async fn trigger_scrape(&self) -> GatewayResult<Option<String>>;

    /// `POST /user/external_jobs/{id}/enable` or `.../disable`
    async fn set_job_enabled(&self, id: &JobId, enabled: bool) -> GatewayResult<Option<String>>;

    /// `POST /user/external_jobs/bulk_enable`. Partial failure is reported by the
    /// server as one aggregate outcome.
    async fn bulk_enable(&self, ids: &[JobId]) -> GatewayResult<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = GatewayError::rejected("Job not found");
        assert_eq!(err.to_string(), "Job not found");
        assert_eq!(err.server_message(), Some("Job not found"));

        let blank = GatewayError::Rejected { message: None };
        assert_eq!(blank.to_string(), "request rejected by server");
        assert_eq!(blank.server_message(), None);
    }
}
