//! Instance service.

use super::RequestExecutor;
use crate::error::{Ec2Error, RequestError};
use crate::options::RunInstancesOptions;
use crate::request::{Call, Ec2Operation, FormParams};
use crate::types::{
    AvailabilityZone, BlockDevice, ConsoleOutput, InstanceInitiatedShutdownBehavior, InstanceStateChange, InstanceType,
    Region, Reservation,
};
use crate::xml::handlers;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Service for instance lifecycle actions.
#[derive(Debug, Clone)]
pub struct InstanceService {
    executor: Arc<RequestExecutor>,
}

impl InstanceService {
    /// Create a new instance service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Describe instances; no ids means all instances.
    pub async fn describe_instances<I>(&self, region: Option<Region>, instance_ids: I) -> Result<Vec<Reservation>, Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::DescribeInstances)
            .in_region(self.executor.region(region))
            .optional_list("InstanceId", instance_ids);
        self.executor.parsed(call, handlers::parse_reservations).await
    }

    /// Launch between `min_count` and `max_count` instances of an image.
    ///
    /// When `zone` is given the instances are placed there, and the zone's
    /// region is used if `region` is `None`. A zone outside an explicit
    /// `region` is rejected.
    pub async fn run_instances(
        &self,
        region: Option<Region>,
        zone: Option<AvailabilityZone>,
        image_id: &str,
        min_count: u32,
        max_count: u32,
        options: RunInstancesOptions,
    ) -> Result<Reservation, Ec2Error> {
        if min_count == 0 || min_count > max_count {
            return Err(RequestError::Validation {
                message: format!(
                    "instance counts must satisfy 1 <= min ({}) <= max ({})",
                    min_count, max_count
                ),
            }
            .into());
        }

        if let (Some(region), Some(zone)) = (region, zone.as_ref()) {
            if zone.region() != region {
                return Err(RequestError::Validation {
                    message: format!("zone {} is not in region {}", zone.as_str(), region.as_str()),
                }
                .into());
            }
        }

        let region = region.or_else(|| zone.as_ref().map(AvailabilityZone::region));
        let call = Call::new(Ec2Operation::RunInstances)
            .in_region(self.executor.region(region))
            .param("ImageId", image_id)
            .param("MinCount", min_count.to_string())
            .param("MaxCount", max_count.to_string())
            .optional_param("Placement.AvailabilityZone", zone.as_ref().map(AvailabilityZone::as_str))
            .options(&options);
        self.executor.parsed(call, handlers::parse_reservation).await
    }

    /// Terminate instances. Unknown instances yield an empty list.
    pub async fn terminate_instances<I>(
        &self,
        region: Option<Region>,
        instance_ids: I,
    ) -> Result<Vec<InstanceStateChange>, Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::TerminateInstances)
            .in_region(self.executor.region(region))
            .list("InstanceId", instance_ids);
        self.executor.parsed(call, handlers::parse_instance_state_changes).await
    }

    /// Stop EBS-backed instances. `force` skips the graceful shutdown.
    pub async fn stop_instances<I>(
        &self,
        region: Option<Region>,
        force: bool,
        instance_ids: I,
    ) -> Result<Vec<InstanceStateChange>, Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::StopInstances)
            .in_region(self.executor.region(region))
            .optional_param("Force", force.then_some("true"))
            .list("InstanceId", instance_ids);
        self.executor.parsed(call, handlers::parse_instance_state_changes).await
    }

    /// Start stopped instances.
    pub async fn start_instances<I>(
        &self,
        region: Option<Region>,
        instance_ids: I,
    ) -> Result<Vec<InstanceStateChange>, Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::StartInstances)
            .in_region(self.executor.region(region))
            .list("InstanceId", instance_ids);
        self.executor.parsed(call, handlers::parse_instance_state_changes).await
    }

    /// Reboot instances.
    pub async fn reboot_instances<I>(&self, region: Option<Region>, instance_ids: I) -> Result<(), Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::RebootInstances)
            .in_region(self.executor.region(region))
            .list("InstanceId", instance_ids);
        self.executor.void(call).await
    }

    /// User data of an instance, decoded. Empty when none is set.
    pub async fn get_user_data(&self, region: Option<Region>, instance_id: &str) -> Result<Vec<u8>, Ec2Error> {
        let call = Call::new(Ec2Operation::DescribeInstanceUserData)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id);
        self.executor.parsed(call, handlers::parse_user_data).await
    }

    /// Replace the user data of a stopped instance.
    pub async fn set_user_data(
        &self,
        region: Option<Region>,
        instance_id: &str,
        user_data: &[u8],
    ) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::SetInstanceUserData)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id)
            .blob("Value", user_data);
        self.executor.void(call).await
    }

    /// Root device name, e.g. `/dev/sda1`.
    pub async fn get_root_device_name(
        &self,
        region: Option<Region>,
        instance_id: &str,
    ) -> Result<Option<String>, Ec2Error> {
        self.describe_attribute(
            Ec2Operation::DescribeInstanceRootDeviceName,
            region,
            instance_id,
            handlers::parse_root_device_name,
        )
        .await
    }

    /// Ramdisk the instance boots with.
    pub async fn get_ramdisk(&self, region: Option<Region>, instance_id: &str) -> Result<Option<String>, Ec2Error> {
        self.describe_attribute(Ec2Operation::DescribeInstanceRamdisk, region, instance_id, handlers::parse_ramdisk)
            .await
    }

    /// Kernel the instance boots with.
    pub async fn get_kernel(&self, region: Option<Region>, instance_id: &str) -> Result<Option<String>, Ec2Error> {
        self.describe_attribute(Ec2Operation::DescribeInstanceKernel, region, instance_id, handlers::parse_kernel)
            .await
    }

    /// Whether the instance is protected from API termination.
    pub async fn is_api_termination_disabled(
        &self,
        region: Option<Region>,
        instance_id: &str,
    ) -> Result<bool, Ec2Error> {
        self.describe_attribute(
            Ec2Operation::DescribeInstanceApiTermination,
            region,
            instance_id,
            handlers::parse_api_termination_disabled,
        )
        .await
    }

    /// Instance type as reported by EC2, e.g. `m1.small`.
    pub async fn get_instance_type(
        &self,
        region: Option<Region>,
        instance_id: &str,
    ) -> Result<Option<String>, Ec2Error> {
        self.describe_attribute(Ec2Operation::DescribeInstanceType, region, instance_id, handlers::parse_instance_type)
            .await
    }

    /// What the instance does when shut down from inside.
    pub async fn get_shutdown_behavior(
        &self,
        region: Option<Region>,
        instance_id: &str,
    ) -> Result<Option<InstanceInitiatedShutdownBehavior>, Ec2Error> {
        self.describe_attribute(
            Ec2Operation::DescribeInstanceShutdownBehavior,
            region,
            instance_id,
            handlers::parse_shutdown_behavior,
        )
        .await
    }

    /// EBS volumes attached to the instance, keyed by device name.
    pub async fn get_block_device_mapping(
        &self,
        region: Option<Region>,
        instance_id: &str,
    ) -> Result<BTreeMap<String, BlockDevice>, Ec2Error> {
        self.describe_attribute(
            Ec2Operation::DescribeInstanceBlockDeviceMapping,
            region,
            instance_id,
            handlers::parse_block_device_mapping,
        )
        .await
    }

    /// Reset the ramdisk to the image default.
    pub async fn reset_ramdisk(&self, region: Option<Region>, instance_id: &str) -> Result<(), Ec2Error> {
        self.instance_call(Ec2Operation::ResetInstanceRamdisk, region, instance_id).await
    }

    /// Reset the kernel to the image default.
    pub async fn reset_kernel(&self, region: Option<Region>, instance_id: &str) -> Result<(), Ec2Error> {
        self.instance_call(Ec2Operation::ResetInstanceKernel, region, instance_id).await
    }

    /// Set the ramdisk of a stopped instance.
    pub async fn set_ramdisk(&self, region: Option<Region>, instance_id: &str, ramdisk: &str) -> Result<(), Ec2Error> {
        self.modify_attribute(Ec2Operation::SetInstanceRamdisk, region, instance_id, ramdisk).await
    }

    /// Set the kernel of a stopped instance.
    pub async fn set_kernel(&self, region: Option<Region>, instance_id: &str, kernel: &str) -> Result<(), Ec2Error> {
        self.modify_attribute(Ec2Operation::SetInstanceKernel, region, instance_id, kernel).await
    }

    /// Enable or disable API termination protection.
    pub async fn set_api_termination_disabled(
        &self,
        region: Option<Region>,
        instance_id: &str,
        disabled: bool,
    ) -> Result<(), Ec2Error> {
        let value = if disabled { "true" } else { "false" };
        self.modify_attribute(Ec2Operation::SetInstanceApiTermination, region, instance_id, value)
            .await
    }

    /// Change the type of a stopped instance.
    pub async fn set_instance_type(
        &self,
        region: Option<Region>,
        instance_id: &str,
        instance_type: InstanceType,
    ) -> Result<(), Ec2Error> {
        self.modify_attribute(Ec2Operation::SetInstanceType, region, instance_id, instance_type.as_str())
            .await
    }

    /// Choose what the instance does when shut down from inside.
    pub async fn set_shutdown_behavior(
        &self,
        region: Option<Region>,
        instance_id: &str,
        behavior: InstanceInitiatedShutdownBehavior,
    ) -> Result<(), Ec2Error> {
        self.modify_attribute(Ec2Operation::SetInstanceShutdownBehavior, region, instance_id, behavior.as_str())
            .await
    }

    /// Change the `DeleteOnTermination` flag of attached EBS volumes,
    /// keyed by device name.
    pub async fn set_block_device_mapping(
        &self,
        region: Option<Region>,
        instance_id: &str,
        devices: &BTreeMap<String, BlockDevice>,
    ) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::SetInstanceBlockDeviceMapping)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id)
            .rendered("BlockDeviceMapping", attached_volume_params(devices));
        self.executor.void(call).await
    }

    /// Console output of an instance, decoded.
    pub async fn get_console_output(
        &self,
        region: Option<Region>,
        instance_id: &str,
    ) -> Result<ConsoleOutput, Ec2Error> {
        let call = Call::new(Ec2Operation::GetConsoleOutput)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id);
        self.executor.parsed(call, handlers::parse_console_output).await
    }

    async fn describe_attribute<T, F>(
        &self,
        operation: Ec2Operation,
        region: Option<Region>,
        instance_id: &str,
        handler: F,
    ) -> Result<T, Ec2Error>
    where
        T: Default,
        F: Fn(&str) -> Result<T, Ec2Error>,
    {
        let call = Call::new(operation)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id);
        self.executor.parsed(call, handler).await
    }

    async fn instance_call(
        &self,
        operation: Ec2Operation,
        region: Option<Region>,
        instance_id: &str,
    ) -> Result<(), Ec2Error> {
        let call = Call::new(operation)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id);
        self.executor.void(call).await
    }

    async fn modify_attribute(
        &self,
        operation: Ec2Operation,
        region: Option<Region>,
        instance_id: &str,
        value: &str,
    ) -> Result<(), Ec2Error> {
        let call = Call::new(operation)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id)
            .param("Value", value);
        self.executor.void(call).await
    }
}

fn attached_volume_params(devices: &BTreeMap<String, BlockDevice>) -> FormParams {
    let mut params = FormParams::new();
    for (index, (device_name, device)) in devices.iter().enumerate() {
        let prefix = format!("BlockDeviceMapping.{}", index + 1);
        params.push(format!("{}.DeviceName", prefix), device_name.as_str());
        params.push(format!("{}.Ebs.VolumeId", prefix), device.volume_id.as_str());
        params.push(
            format!("{}.Ebs.DeleteOnTermination", prefix),
            device.delete_on_termination.to_string(),
        );
    }
    params
}
