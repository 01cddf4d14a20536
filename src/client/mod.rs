//! EC2 client implementation.
//!
//! This module provides the main EC2 client interface and builder.

mod executor;

pub use executor::RequestExecutor;

use crate::config::Ec2Config;
use crate::error::Ec2Error;
use crate::services::{
    AmiService, ElasticBlockStoreService, ElasticIpService, InstanceService, KeyPairService,
    SecurityGroupService,
};
use crate::transport::{HttpTransport, ReqwestTransport};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// EC2 client trait.
pub trait Ec2Client: Send + Sync {
    /// AMI actions.
    fn amis(&self) -> &AmiService;

    /// Instance actions.
    fn instances(&self) -> &InstanceService;

    /// Volume and snapshot actions.
    fn elastic_block_store(&self) -> &ElasticBlockStoreService;

    /// Security group actions.
    fn security_groups(&self) -> &SecurityGroupService;

    /// Key pair actions.
    fn key_pairs(&self) -> &KeyPairService;

    /// Elastic IP actions.
    fn elastic_ips(&self) -> &ElasticIpService;

    /// Get the client configuration.
    fn config(&self) -> &Ec2Config;
}

/// EC2 client implementation.
pub struct Ec2ClientImpl {
    config: Arc<Ec2Config>,
    executor: Arc<RequestExecutor>,

    // Lazy-initialized services
    amis: OnceCell<AmiService>,
    instances: OnceCell<InstanceService>,
    elastic_block_store: OnceCell<ElasticBlockStoreService>,
    security_groups: OnceCell<SecurityGroupService>,
    key_pairs: OnceCell<KeyPairService>,
    elastic_ips: OnceCell<ElasticIpService>,
}

impl Ec2ClientImpl {
    /// Create a new EC2 client with the given configuration.
    pub fn new(config: Ec2Config, transport: Arc<dyn HttpTransport>) -> Self {
        let executor = Arc::new(RequestExecutor::new(&config, transport));
        Self {
            config: Arc::new(config),
            executor,
            amis: OnceCell::new(),
            instances: OnceCell::new(),
            elastic_block_store: OnceCell::new(),
            security_groups: OnceCell::new(),
            key_pairs: OnceCell::new(),
            elastic_ips: OnceCell::new(),
        }
    }
}

impl Ec2Client for Ec2ClientImpl {
    fn amis(&self) -> &AmiService {
        self.amis.get_or_init(|| AmiService::new(self.executor.clone()))
    }

    fn instances(&self) -> &InstanceService {
        self.instances
            .get_or_init(|| InstanceService::new(self.executor.clone()))
    }

    fn elastic_block_store(&self) -> &ElasticBlockStoreService {
        self.elastic_block_store
            .get_or_init(|| ElasticBlockStoreService::new(self.executor.clone()))
    }

    fn security_groups(&self) -> &SecurityGroupService {
        self.security_groups
            .get_or_init(|| SecurityGroupService::new(self.executor.clone()))
    }

    fn key_pairs(&self) -> &KeyPairService {
        self.key_pairs
            .get_or_init(|| KeyPairService::new(self.executor.clone()))
    }

    fn elastic_ips(&self) -> &ElasticIpService {
        self.elastic_ips
            .get_or_init(|| ElasticIpService::new(self.executor.clone()))
    }

    fn config(&self) -> &Ec2Config {
        &self.config
    }
}

impl std::fmt::Debug for Ec2ClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ec2ClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for EC2 client.
pub struct Ec2ClientBuilder {
    config: Option<Ec2Config>,
    from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl Ec2ClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            from_env: false,
            transport: None,
        }
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: Ec2Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the EC2 client.
    pub fn build(self) -> Result<Ec2ClientImpl, Ec2Error> {
        let config = match self.config {
            Some(config) => config,
            None if self.from_env => Ec2Config::builder().from_env().build()?,
            None => Ec2Config::builder().build()?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::builder()
                    .connect_timeout(config.connect_timeout)
                    .read_timeout(config.read_timeout)
                    .build()?,
            ),
        };

        Ok(Ec2ClientImpl::new(config, transport))
    }
}

impl Default for Ec2ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockTransport;
    use crate::types::Region;

    #[test]
    fn test_builder_default() {
        let result = Ec2ClientBuilder::new().transport(Arc::new(MockTransport::new())).build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_with_config() {
        let config = Ec2Config::builder().region(Region::EuWest1).build().unwrap();
        let client = Ec2ClientBuilder::new()
            .config(config)
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();
        assert_eq!(client.config().default_region, Some(Region::EuWest1));
    }
}
