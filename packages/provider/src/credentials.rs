//! Provider credential resolution.
//!
//! Callers never touch ambient global state: they request current
//! credentials through an injected resolver, which owns its own cache
//! and refresh policy. After an authentication failure the client
//! invalidates the resolver so the next call re-resolves.

use async_trait::async_trait;
use lector_domain::NarrationError;
use tokio::sync::RwLock;

/// Endpoint and key for the speech provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    /// Base URL of the provider's synthesis API.
    pub endpoint: String,
    pub api_key: String,
}

/// Source of current provider credentials.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Return the credentials to use for the next provider call.
    async fn resolve(&self) -> Result<ProviderCredentials, NarrationError>;

    /// Drop any cached credentials so the next [`resolve`](Self::resolve)
    /// re-reads from the underlying source.
    async fn invalidate(&self);
}

/// Resolver backed by environment variables, cached after first read.
///
/// The endpoint comes from `LECTOR_PROVIDER_URL`; the key from
/// `LECTOR_API_KEY` or `SPEECH_API_KEY`, whichever is set first.
#[derive(Default)]
pub struct EnvCredentialResolver {
    cached: RwLock<Option<ProviderCredentials>>,
}

impl EnvCredentialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_env() -> Result<ProviderCredentials, NarrationError> {
        let endpoint = std::env::var("LECTOR_PROVIDER_URL").map_err(|_| {
            NarrationError::Configuration(
                "no provider endpoint found; set LECTOR_PROVIDER_URL".into(),
            )
        })?;
        let api_key = std::env::var("LECTOR_API_KEY")
            .or_else(|_| std::env::var("SPEECH_API_KEY"))
            .map_err(|_| {
                NarrationError::Configuration(
                    "no provider API key found; set LECTOR_API_KEY or SPEECH_API_KEY".into(),
                )
            })?;
        Ok(ProviderCredentials { endpoint, api_key })
    }
}

#[async_trait]
impl CredentialResolver for EnvCredentialResolver {
    async fn resolve(&self) -> Result<ProviderCredentials, NarrationError> {
        if let Some(creds) = self.cached.read().await.as_ref() {
            return Ok(creds.clone());
        }
        let creds = Self::read_env()?;
        *self.cached.write().await = Some(creds.clone());
        Ok(creds)
    }

    async fn invalidate(&self) {
        self.cached.write().await.take();
    }
}

/// Resolver with fixed credentials, for embedding and tests.
pub struct StaticCredentialResolver {
    credentials: ProviderCredentials,
}

impl StaticCredentialResolver {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            credentials: ProviderCredentials {
                endpoint: endpoint.into(),
                api_key: api_key.into(),
            },
        }
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentialResolver {
    async fn resolve(&self) -> Result<ProviderCredentials, NarrationError> {
        Ok(self.credentials.clone())
    }

    async fn invalidate(&self) {}
}
