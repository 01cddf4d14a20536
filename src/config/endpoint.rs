//! Region to endpoint mapping.

use crate::error::ConfigurationError;
use crate::types::Region;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Default EC2 endpoint used when no region is requested.
pub const DEFAULT_ENDPOINT: &str = "https://ec2.amazonaws.com/";

/// Maps an optional region to an endpoint URI.
pub trait EndpointResolver: Send + Sync + fmt::Debug {
    /// Endpoint for `region`, or the default endpoint for `None`.
    fn resolve(&self, region: Option<Region>) -> Result<Url, ConfigurationError>;
}

/// Table-driven endpoint resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionEndpoints {
    default: Url,
    regions: BTreeMap<Region, Url>,
}

impl RegionEndpoints {
    /// Resolver with only a default endpoint. Every explicit region fails
    /// until added with [`with_region`](Self::with_region).
    pub fn new(default: Url) -> Self {
        Self {
            default,
            regions: BTreeMap::new(),
        }
    }

    /// The public AWS endpoints, `https://ec2.{region}.amazonaws.com/`.
    pub fn aws() -> Result<Self, ConfigurationError> {
        let mut endpoints = Self::new(parse_endpoint(DEFAULT_ENDPOINT)?);
        for region in Region::ALL {
            let url = parse_endpoint(&format!("https://ec2.{}.amazonaws.com/", region))?;
            endpoints.regions.insert(*region, url);
        }
        Ok(endpoints)
    }

    /// Every region, and the default, resolve to `url`.
    pub fn fixed(url: Url) -> Self {
        let regions = Region::ALL.iter().map(|r| (*r, url.clone())).collect();
        Self {
            default: url,
            regions,
        }
    }

    /// Add or replace the endpoint for one region.
    pub fn with_region(mut self, region: Region, url: Url) -> Self {
        self.regions.insert(region, url);
        self
    }

    /// The endpoint used when no region is requested.
    pub fn default_endpoint(&self) -> &Url {
        &self.default
    }
}

impl EndpointResolver for RegionEndpoints {
    fn resolve(&self, region: Option<Region>) -> Result<Url, ConfigurationError> {
        match region {
            None => Ok(self.default.clone()),
            Some(region) => self.regions.get(&region).cloned().ok_or_else(|| {
                ConfigurationError::UnknownEndpoint {
                    region: region.to_string(),
                }
            }),
        }
    }
}

/// Parse an endpoint URL, requiring an http(s) scheme and a host.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidEndpoint {
        url: raw.to_string(),
    };
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url)
}
