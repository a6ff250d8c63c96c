//! Origin-domain metadata resolver over HTTP.
//!
//! Fetches `https://<domain>/.well-known/stellar.toml` and deserializes the
//! fields the protocol cares about.
//!
//! # Feature Flags
//!
//! This module requires the `http-resolver` feature flag to be enabled for
//! actual HTTP requests. Without it, all lookups return an `Unimplemented`
//! error.
//!
//! ```toml
//! [dependencies]
//! sep7-lib = { version = "0.1", features = ["http-resolver"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sep7_lib::{ResolverConfig, TomlResolver, DomainResolver};
//!
//! let resolver = TomlResolver::new(ResolverConfig::default())?;
//! let metadata = resolver.resolve("example.com").await?;
//! println!("signing key: {:?}", metadata.uri_request_signing_key);
//! ```
//!
//! The resolver imposes no retry policy; callers own retries, and signature
//! verification treats every resolution fault as a failed verification.

use async_trait::async_trait;
#[cfg(feature = "http-resolver")]
use std::time::Duration;

use crate::traits::{DomainMetadata, DomainResolver};
use crate::{Result, Sep7Error};

/// Configuration for [`TomlResolver`].
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Fetch over https. Turning this off is only sensible against local
    /// test servers.
    pub use_https: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            use_https: true,
        }
    }
}

impl ResolverConfig {
    /// Plain-http configuration for local test servers.
    pub fn insecure_http() -> Self {
        Self {
            use_https: false,
            ..Self::default()
        }
    }
}

/// Domain resolver fetching `stellar.toml` documents over HTTP.
pub struct TomlResolver {
    config: ResolverConfig,
    #[cfg(feature = "http-resolver")]
    client: reqwest::Client,
}

impl TomlResolver {
    /// Create a resolver with the given configuration.
    #[cfg(feature = "http-resolver")]
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Sep7Error::Resolver(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Create a resolver with the given configuration (stub when feature disabled).
    #[cfg(not(feature = "http-resolver"))]
    pub fn new(config: ResolverConfig) -> Result<Self> {
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The metadata document URL for a domain.
    pub fn metadata_url(&self, domain: &str) -> String {
        let scheme = if self.config.use_https { "https" } else { "http" };
        format!("{scheme}://{domain}/.well-known/stellar.toml")
    }
}

#[async_trait]
impl DomainResolver for TomlResolver {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    async fn resolve(&self, domain: &str) -> Result<DomainMetadata> {
        #[cfg(feature = "http-resolver")]
        {
            let url = self.metadata_url(domain);
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| Sep7Error::Resolver(format!("{url}: {e}")))?;
            if !response.status().is_success() {
                return Err(Sep7Error::Resolver(format!(
                    "{url}: HTTP {}",
                    response.status()
                )));
            }
            let body = response
                .text()
                .await
                .map_err(|e| Sep7Error::Resolver(format!("{url}: {e}")))?;
            toml::from_str(&body)
                .map_err(|e| Sep7Error::Resolver(format!("{url}: invalid stellar.toml: {e}")))
        }

        #[cfg(not(feature = "http-resolver"))]
        {
            let _ = domain;
            Err(Sep7Error::Unimplemented("http-resolver"))
        }
    }
}
