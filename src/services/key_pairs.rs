//! Key pair service.

use super::RequestExecutor;
use crate::error::Ec2Error;
use crate::request::{Call, Ec2Operation};
use crate::types::{KeyPair, Region};
use crate::xml::handlers;
use std::sync::Arc;

/// Service for key pair actions.
#[derive(Debug, Clone)]
pub struct KeyPairService {
    executor: Arc<RequestExecutor>,
}

impl KeyPairService {
    /// Create a new key pair service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Create a key pair. The result carries the private key, which the
    /// service never returns again.
    pub async fn create_key_pair(&self, region: Option<Region>, name: &str) -> Result<KeyPair, Ec2Error> {
        let call = Call::new(Ec2Operation::CreateKeyPair)
            .in_region(self.executor.region(region))
            .param("KeyName", name);
        self.executor.parsed(call, handlers::parse_key_pair).await
    }

    /// Describe key pairs; no names means all key pairs.
    pub async fn describe_key_pairs<I>(&self, region: Option<Region>, names: I) -> Result<Vec<KeyPair>, Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::DescribeKeyPairs)
            .in_region(self.executor.region(region))
            .optional_list("KeyName", names);
        self.executor.parsed(call, handlers::parse_key_pairs).await
    }

    /// Delete a key pair.
    pub async fn delete_key_pair(&self, region: Option<Region>, name: &str) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::DeleteKeyPair)
            .in_region(self.executor.region(region))
            .param("KeyName", name);
        self.executor.void(call).await
    }
}
