//! Bearer token providers.
//!
//! The gateway asks its provider for a token on every request, so a token
//! written or removed while the program runs (login/logout in another tool)
//! takes effect on the next call.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{GatewayError, GatewayResult};

/// Environment variable consulted by the default provider chain
pub const TOKEN_ENV_VAR: &str = "JOBDECK_TOKEN";

/// Supplies the bearer token for one outgoing request
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// `Ok(None)` means "send the request unauthenticated".
    async fn bearer_token(&self) -> GatewayResult<Option<String>>;
}

/// No Authorization header at all
#[derive(Debug, Default, Clone)]
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn bearer_token(&self) -> GatewayResult<Option<String>> {
        Ok(None)
    }
}

/// A fixed token, e.g. from `--token`
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> GatewayResult<Option<String>> {
        Ok(non_blank(&self.0))
    }
}

/// Token read from an environment variable at request time
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(TOKEN_ENV_VAR)
    }
}

#[async_trait]
impl CredentialProvider for EnvToken {
    async fn bearer_token(&self) -> GatewayResult<Option<String>> {
        Ok(std::env::var(&self.var).ok().and_then(|v| non_blank(&v)))
    }
}

/// Token read from a file at request time. A missing file means no token.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialProvider for TokenFile {
    async fn bearer_token(&self) -> GatewayResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(non_blank(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GatewayError::Credentials(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Tries each provider in order and uses the first token found
#[derive(Default)]
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// `JOBDECK_TOKEN`, then the token file if one is configured
    pub fn standard(token_file: Option<PathBuf>) -> Self {
        let chain = Self::new().with(EnvToken::default());
        match token_file {
            Some(path) => chain.with(TokenFile::new(path)),
            None => chain,
        }
    }
}

#[async_trait]
impl CredentialProvider for CredentialChain {
    async fn bearer_token(&self) -> GatewayResult<Option<String>> {
        for provider in &self.providers {
            if let Some(token) = provider.bearer_token().await? {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
