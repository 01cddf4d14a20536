//! Elastic IP service.

use super::RequestExecutor;
use crate::error::Ec2Error;
use crate::request::{Call, Ec2Operation};
use crate::types::{PublicIpInstanceIdPair, Region};
use crate::xml::handlers;
use std::sync::Arc;

/// Service for elastic IP actions.
#[derive(Debug, Clone)]
pub struct ElasticIpService {
    executor: Arc<RequestExecutor>,
}

impl ElasticIpService {
    /// Create a new elastic IP service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Allocate an address; returns the public IP.
    pub async fn allocate_address(&self, region: Option<Region>) -> Result<String, Ec2Error> {
        let call = Call::new(Ec2Operation::AllocateAddress).in_region(self.executor.region(region));
        self.executor.parsed(call, handlers::parse_public_ip).await
    }

    /// Associate an address with an instance.
    pub async fn associate_address(
        &self,
        region: Option<Region>,
        public_ip: &str,
        instance_id: &str,
    ) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::AssociateAddress)
            .in_region(self.executor.region(region))
            .param("PublicIp", public_ip)
            .param("InstanceId", instance_id);
        self.executor.void(call).await
    }

    /// Disassociate an address from its instance.
    pub async fn disassociate_address(&self, region: Option<Region>, public_ip: &str) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::DisassociateAddress)
            .in_region(self.executor.region(region))
            .param("PublicIp", public_ip);
        self.executor.void(call).await
    }

    /// Release an address.
    pub async fn release_address(&self, region: Option<Region>, public_ip: &str) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::ReleaseAddress)
            .in_region(self.executor.region(region))
            .param("PublicIp", public_ip);
        self.executor.void(call).await
    }

    /// Describe addresses; no IPs means all addresses.
    pub async fn describe_addresses<I>(
        &self,
        region: Option<Region>,
        public_ips: I,
    ) -> Result<Vec<PublicIpInstanceIdPair>, Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::DescribeAddresses)
            .in_region(self.executor.region(region))
            .optional_list("PublicIp", public_ips);
        self.executor.parsed(call, handlers::parse_addresses).await
    }
}
