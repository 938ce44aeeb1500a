//! HTTP implementation of [`JobGateway`] over `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::{CredentialProvider, GatewayError, GatewayResult, JobGateway};
use crate::models::{BulkEnableRequest, Envelope, JobId, JobPosting, JobSource, RecommendedJobPosting};

/// Gateway bound to one API origin
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Build a gateway for `base_url`. The base may carry a path prefix
    /// (`https://host/api`); endpoint paths are appended below it.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| GatewayError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("jobdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments below the base URL, percent-encoding each one
    pub(crate) fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach credentials, send, and decode the envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<Option<T>> {
        let request = match self.credentials.bearer_token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        tracing::debug!(%url, %status, bytes = body.len(), "jobs API response");

        let envelope: Envelope<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(GatewayError::Status { status }),
            Err(e) => return Err(GatewayError::Decode(e)),
        };

        envelope
            .into_outcome()
            .map_err(|message| GatewayError::Rejected { message })
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> GatewayResult<Vec<T>> {
        let url = self.endpoint(segments)?;
        let items = self.send(self.client.get(url).query(query)).await?;
        Ok(items.unwrap_or_default())
    }

    /// POST and read the result as a human-readable message
    async fn post_for_message(
        &self,
        request: RequestBuilder,
    ) -> GatewayResult<Option<String>> {
        let value: Option<serde_json::Value> = self.send(request).await?;
        Ok(value.and_then(message_from))
    }
}

/// Messages are strings; any other result shape carries no message
fn message_from(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

#[async_trait]
impl JobGateway for HttpGateway {
    async fn list_external_jobs(
        &self,
        limit: u32,
        source: Option<JobSource>,
    ) -> GatewayResult<Vec<JobPosting>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(source) = source {
            query.push(("source", source.to_string()));
        }
        self.get_list(&["user", "external_jobs"], &query).await
    }

    async fn list_recommended_external_jobs(
        &self,
        limit: u32,
    ) -> GatewayResult<Vec<RecommendedJobPosting>> {
        self.get_list(&["user", "recommend_external_jobs"], &[("limit", limit.to_string())])
            .await
    }

    async fn list_all_recommended_jobs(
        &self,
        limit: u32,
    ) -> GatewayResult<Vec<RecommendedJobPosting>> {
        self.get_list(&["user", "recommend_all_jobs"], &[("limit", limit.to_string())])
            .await
    }

    async fn trigger_scrape(&self) -> GatewayResult<Option<String>> {
        let url = self.endpoint(&["user", "scrape_jobs"])?;
        self.post_for_message(self.client.post(url)).await
    }

    async fn set_job_enabled(&self, id: &JobId, enabled: bool) -> GatewayResult<Option<String>> {
        let action = if enabled { "enable" } else { "disable" };
        let id = id.to_string();
        let url = self.endpoint(&["user", "external_jobs", &id, action])?;
        self.post_for_message(self.client.post(url)).await
    }

    async fn bulk_enable(&self, ids: &[JobId]) -> GatewayResult<Option<String>> {
        let url = self.endpoint(&["user", "external_jobs", "bulk_enable"])?;
        let body = BulkEnableRequest { job_ids: ids };
        self.post_for_message(self.client.post(url).json(&body)).await
    }
}
