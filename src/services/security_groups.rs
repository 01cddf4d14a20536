//! Security group service.

use super::RequestExecutor;
use crate::error::Ec2Error;
use crate::request::{Call, Ec2Operation};
use crate::types::{IpProtocol, Region, SecurityGroup, UserIdGroupPair};
use crate::xml::handlers;
use std::sync::Arc;

/// Service for security group actions.
#[derive(Debug, Clone)]
pub struct SecurityGroupService {
    executor: Arc<RequestExecutor>,
}

impl SecurityGroupService {
    /// Create a new security group service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Create a security group.
    pub async fn create_security_group(
        &self,
        region: Option<Region>,
        name: &str,
        description: &str,
    ) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::CreateSecurityGroup)
            .in_region(self.executor.region(region))
            .param("GroupName", name)
            .param("GroupDescription", description);
        self.executor.void(call).await
    }

    /// Delete a security group. Deleting a group that does not exist
    /// succeeds.
    pub async fn delete_security_group(&self, region: Option<Region>, name: &str) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::DeleteSecurityGroup)
            .in_region(self.executor.region(region))
            .param("GroupName", name);
        self.executor.void(call).await
    }

    /// Describe security groups; no names means all groups.
    pub async fn describe_security_groups<I>(
        &self,
        region: Option<Region>,
        names: I,
    ) -> Result<Vec<SecurityGroup>, Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::DescribeSecurityGroups)
            .in_region(self.executor.region(region))
            .optional_list("GroupName", names);
        self.executor.parsed(call, handlers::parse_security_groups).await
    }

    /// Allow ingress from another group. Granting a permission that already
    /// exists succeeds.
    pub async fn authorize_ingress_from_group(
        &self,
        region: Option<Region>,
        group_name: &str,
        source: &UserIdGroupPair,
    ) -> Result<(), Ec2Error> {
        let call = group_call(Ec2Operation::AuthorizeIngressFromGroup, group_name, source)
            .in_region(self.executor.region(region));
        self.executor.void(call).await
    }

    /// Allow ingress from a CIDR block on a port range. Granting a permission
    /// that already exists succeeds.
    pub async fn authorize_ingress_from_cidr(
        &self,
        region: Option<Region>,
        group_name: &str,
        protocol: IpProtocol,
        from_port: i32,
        to_port: i32,
        cidr_ip: &str,
    ) -> Result<(), Ec2Error> {
        let call = cidr_call(
            Ec2Operation::AuthorizeIngressFromCidr,
            group_name,
            protocol,
            from_port,
            to_port,
            cidr_ip,
        )
        .in_region(self.executor.region(region));
        self.executor.void(call).await
    }

    /// Revoke ingress from another group.
    pub async fn revoke_ingress_from_group(
        &self,
        region: Option<Region>,
        group_name: &str,
        source: &UserIdGroupPair,
    ) -> Result<(), Ec2Error> {
        let call = group_call(Ec2Operation::RevokeIngressFromGroup, group_name, source)
            .in_region(self.executor.region(region));
        self.executor.void(call).await
    }

    /// Revoke ingress from a CIDR block on a port range.
    pub async fn revoke_ingress_from_cidr(
        &self,
        region: Option<Region>,
        group_name: &str,
        protocol: IpProtocol,
        from_port: i32,
        to_port: i32,
        cidr_ip: &str,
    ) -> Result<(), Ec2Error> {
        let call = cidr_call(
            Ec2Operation::RevokeIngressFromCidr,
            group_name,
            protocol,
            from_port,
            to_port,
            cidr_ip,
        )
        .in_region(self.executor.region(region));
        self.executor.void(call).await
    }
}

fn group_call(operation: Ec2Operation, group_name: &str, source: &UserIdGroupPair) -> Call<'static> {
    Call::new(operation)
        .param("GroupName", group_name)
        .param("SourceSecurityGroupName", source.group_name.as_str())
        .param("SourceSecurityGroupOwnerId", source.user_id.as_str())
}

fn cidr_call(
    operation: Ec2Operation,
    group_name: &str,
    protocol: IpProtocol,
    from_port: i32,
    to_port: i32,
    cidr_ip: &str,
) -> Call<'static> {
    Call::new(operation)
        .param("GroupName", group_name)
        .param("IpProtocol", protocol.as_str())
        .param("FromPort", from_port.to_string())
        .param("ToPort", to_port.to_string())
        .param("CidrIp", cidr_ip)
}
