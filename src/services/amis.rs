//! AMI service: image creation, registration, lookup and launch permissions.

use super::RequestExecutor;
use crate::error::Ec2Error;
use crate::options::{
    CreateImageOptions, DescribeImagesOptions, RegisterImageBackedByEbsOptions, RegisterImageOptions,
};
use crate::request::{Call, Ec2Operation};
use crate::types::{Image, Permission, Region};
use crate::xml::handlers;
use std::sync::Arc;

/// Service for AMI actions.
#[derive(Debug, Clone)]
pub struct AmiService {
    executor: Arc<RequestExecutor>,
}

impl AmiService {
    /// Create a new AMI service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Create an EBS-backed image from a running or stopped instance.
    /// Returns the new image id.
    pub async fn create_image(
        &self,
        region: Option<Region>,
        name: &str,
        instance_id: &str,
        options: CreateImageOptions,
    ) -> Result<String, Ec2Error> {
        let call = Call::new(Ec2Operation::CreateImage)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id)
            .param("Name", name)
            .options(&options);
        self.executor.parsed(call, handlers::parse_image_id).await
    }

    /// Describe images. An unknown image yields an empty list.
    pub async fn describe_images(
        &self,
        region: Option<Region>,
        options: DescribeImagesOptions,
    ) -> Result<Vec<Image>, Ec2Error> {
        let call = Call::new(Ec2Operation::DescribeImages)
            .in_region(self.executor.region(region))
            .options(&options);
        self.executor.parsed(call, handlers::parse_images).await
    }

    /// Deregister an image.
    pub async fn deregister_image(&self, region: Option<Region>, image_id: &str) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::DeregisterImage)
            .in_region(self.executor.region(region))
            .param("ImageId", image_id);
        self.executor.void(call).await
    }

    /// Register an instance-store image from a bundle manifest in S3.
    pub async fn register_image_from_manifest(
        &self,
        region: Option<Region>,
        name: &str,
        manifest_location: &str,
        options: RegisterImageOptions,
    ) -> Result<String, Ec2Error> {
        let call = Call::new(Ec2Operation::RegisterImageFromManifest)
            .in_region(self.executor.region(region))
            .param("Name", name)
            .param("ImageLocation", manifest_location)
            .options(&options);
        self.executor.parsed(call, handlers::parse_image_id).await
    }

    /// Register an EBS-backed image whose root device is restored from a
    /// snapshot. The root device is mapping 0; extra mappings from `options`
    /// start at 1.
    pub async fn register_image_backed_by_ebs(
        &self,
        region: Option<Region>,
        name: &str,
        root_device_name: &str,
        snapshot_id: &str,
        options: RegisterImageBackedByEbsOptions,
    ) -> Result<String, Ec2Error> {
        let call = Call::new(Ec2Operation::RegisterImageBackedByEbs)
            .in_region(self.executor.region(region))
            .param("RootDeviceName", root_device_name)
            .param("BlockDeviceMapping.0.DeviceName", root_device_name)
            .param("BlockDeviceMapping.0.Ebs.SnapshotId", snapshot_id)
            .param("Name", name)
            .options(&options);
        self.executor.parsed(call, handlers::parse_image_id).await
    }

    /// Users and groups allowed to launch an image.
    pub async fn describe_launch_permission(
        &self,
        region: Option<Region>,
        image_id: &str,
    ) -> Result<Permission, Ec2Error> {
        let call = Call::new(Ec2Operation::DescribeImageLaunchPermission)
            .in_region(self.executor.region(region))
            .param("ImageId", image_id);
        self.executor.parsed(call, handlers::parse_permission).await
    }

    /// Grant launch permission to accounts and groups (e.g. `all`).
    pub async fn add_launch_permission<U, G>(
        &self,
        region: Option<Region>,
        user_ids: U,
        groups: G,
        image_id: &str,
    ) -> Result<(), Ec2Error>
    where
        U: IntoIterator,
        U::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::AddImageLaunchPermission)
            .in_region(self.executor.region(region))
            .param("ImageId", image_id)
            .optional_list("UserId", user_ids)
            .optional_list("UserGroup", groups);
        self.executor.void(call).await
    }

    /// Revoke launch permission from accounts and groups.
    pub async fn remove_launch_permission<U, G>(
        &self,
        region: Option<Region>,
        user_ids: U,
        groups: G,
        image_id: &str,
    ) -> Result<(), Ec2Error>
    where
        U: IntoIterator,
        U::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::RemoveImageLaunchPermission)
            .in_region(self.executor.region(region))
            .param("ImageId", image_id)
            .optional_list("UserId", user_ids)
            .optional_list("UserGroup", groups);
        self.executor.void(call).await
    }

    /// Reset launch permission to owner-only.
    pub async fn reset_launch_permission(&self, region: Option<Region>, image_id: &str) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::ResetImageLaunchPermission)
            .in_region(self.executor.region(region))
            .param("ImageId", image_id);
        self.executor.void(call).await
    }
}
