//! Configuration types for the EC2 client.
//!
//! `Ec2Config` carries everything the request pipeline needs besides the
//! transport: API version, endpoint table, credentials, clock and retry
//! settings.

mod endpoint;

pub use endpoint::{parse_endpoint, EndpointResolver, RegionEndpoints, DEFAULT_ENDPOINT};

use crate::credentials::{CredentialsProvider, EnvCredentialsProvider};
use crate::error::{ConfigurationError, Ec2Error};
use crate::resilience::RetryConfig;
use crate::signing::{Clock, SystemClock};
use crate::types::Region;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default EC2 API version.
pub const DEFAULT_API_VERSION: &str = "2009-11-30";

/// Configuration for the EC2 client.
#[derive(Clone)]
pub struct Ec2Config {
    /// Region used by calls that do not name one. `None` targets the
    /// default endpoint.
    pub default_region: Option<Region>,

    /// Value of the `Version` parameter sent with every action.
    pub api_version: String,

    /// Region to endpoint mapping.
    pub endpoints: Arc<dyn EndpointResolver>,

    /// Credentials provider.
    pub credentials_provider: Arc<dyn CredentialsProvider>,

    /// Source of request timestamps.
    pub clock: Arc<dyn Clock>,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Read timeout for individual requests.
    pub read_timeout: Duration,

    /// Retry settings for transient failures.
    pub retry: RetryConfig,
}

impl std::fmt::Debug for Ec2Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ec2Config")
            .field("default_region", &self.default_region)
            .field("api_version", &self.api_version)
            .field("endpoints", &self.endpoints)
            .field("credentials_provider", &self.credentials_provider.name())
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Ec2Config {
    /// Create a new configuration builder.
    pub fn builder() -> Ec2ConfigBuilder {
        Ec2ConfigBuilder::default()
    }
}

/// Builder for EC2 configuration.
#[derive(Default)]
pub struct Ec2ConfigBuilder {
    default_region: Option<Region>,
    api_version: Option<String>,
    endpoint: Option<Url>,
    region_endpoints: Vec<(Region, Url)>,
    endpoints: Option<Arc<dyn EndpointResolver>>,
    credentials_provider: Option<Arc<dyn CredentialsProvider>>,
    clock: Option<Arc<dyn Clock>>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    retry: Option<RetryConfig>,
}

impl Ec2ConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default region.
    pub fn region(mut self, region: Region) -> Self {
        self.default_region = Some(region);
        self
    }

    /// Set the API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Send every request, whatever its region, to this endpoint.
    pub fn endpoint(mut self, endpoint: impl AsRef<str>) -> Result<Self, Ec2Error> {
        self.endpoint = Some(parse_endpoint(endpoint.as_ref())?);
        Ok(self)
    }

    /// Override the endpoint of a single region.
    pub fn region_endpoint(mut self, region: Region, endpoint: impl AsRef<str>) -> Result<Self, Ec2Error> {
        self.region_endpoints
            .push((region, parse_endpoint(endpoint.as_ref())?));
        Ok(self)
    }

    /// Replace the endpoint resolver entirely.
    pub fn endpoint_resolver(mut self, resolver: Arc<dyn EndpointResolver>) -> Self {
        self.endpoints = Some(resolver);
        self
    }

    /// Set the credentials provider.
    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials_provider = Some(provider);
        self
    }

    /// Set the clock used for request timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Set the maximum number of retries, keeping other retry settings.
    pub fn max_retries(mut self, retries: u32) -> Self {
        let retry = self.retry.take().unwrap_or_default();
        self.retry = Some(RetryConfig {
            max_retries: retries,
            ..retry
        });
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        if let Some(region) = env_var("AWS_REGION")
            .or_else(|| env_var("AWS_DEFAULT_REGION"))
            .and_then(|r| r.parse().ok())
        {
            self.default_region = Some(region);
        }

        if let Some(url) = env_var("AWS_ENDPOINT_URL_EC2")
            .or_else(|| env_var("AWS_ENDPOINT_URL"))
            .and_then(|e| parse_endpoint(&e).ok())
        {
            self.endpoint = Some(url);
        }

        if let Some(version) = env_var("EC2_INTEGRATION_API_VERSION") {
            self.api_version = Some(version);
        }
        if let Some(retries) = env_var("EC2_INTEGRATION_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self = self.max_retries(retries);
        }
        if let Some(ms) = env_var("EC2_INTEGRATION_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.read_timeout = Some(Duration::from_millis(ms));
        }

        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<Ec2Config, Ec2Error> {
        let api_version = self
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        if api_version.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "api_version must not be empty".to_string(),
            }
            .into());
        }

        let endpoints: Arc<dyn EndpointResolver> = match (self.endpoints, self.endpoint) {
            (Some(resolver), _) => resolver,
            (None, endpoint) => {
                let mut table = match endpoint {
                    Some(url) => RegionEndpoints::fixed(url),
                    None => RegionEndpoints::aws()?,
                };
                for (region, url) in self.region_endpoints {
                    table = table.with_region(region, url);
                }
                Arc::new(table)
            }
        };

        Ok(Ec2Config {
            default_region: self.default_region,
            api_version,
            endpoints,
            credentials_provider: self
                .credentials_provider
                .unwrap_or_else(|| Arc::new(EnvCredentialsProvider::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(5)),
            read_timeout: self.read_timeout.unwrap_or(Duration::from_secs(30)),
            retry: self.retry.unwrap_or_default(),
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
