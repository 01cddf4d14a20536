//! Elastic Block Store service: volumes, attachments and snapshots.

use super::RequestExecutor;
use crate::error::{Ec2Error, RequestError};
use crate::options::{CreateSnapshotOptions, DescribeSnapshotsOptions, DetachVolumeOptions};
use crate::request::{Call, Ec2Operation};
use crate::types::{Attachment, AvailabilityZone, Permission, Region, Snapshot, Volume};
use crate::xml::handlers;
use std::sync::Arc;

/// Largest volume size, in GiB.
pub const MAX_VOLUME_SIZE_GIB: u32 = 1024;

/// Service for EBS actions.
#[derive(Debug, Clone)]
pub struct ElasticBlockStoreService {
    executor: Arc<RequestExecutor>,
}

fn check_size(size: u32) -> Result<(), Ec2Error> {
    if !(1..=MAX_VOLUME_SIZE_GIB).contains(&size) {
        return Err(RequestError::Validation {
            message: format!("volume size must be between 1 and {} GiB, got {}", MAX_VOLUME_SIZE_GIB, size),
        }
        .into());
    }
    Ok(())
}

impl ElasticBlockStoreService {
    /// Create a new EBS service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Create an empty volume of `size` GiB in a zone.
    pub async fn create_volume_in_zone(&self, zone: AvailabilityZone, size: u32) -> Result<Volume, Ec2Error> {
        check_size(size)?;
        let call = Call::new(Ec2Operation::CreateVolume)
            .param("AvailabilityZone", zone.as_str())
            .param("Size", size.to_string())
            .in_zone(zone);
        self.executor.parsed(call, handlers::parse_volume).await
    }

    /// Create a volume in a zone from a snapshot, optionally larger than
    /// the snapshot.
    pub async fn create_volume_from_snapshot_in_zone(
        &self,
        zone: AvailabilityZone,
        size: Option<u32>,
        snapshot_id: &str,
    ) -> Result<Volume, Ec2Error> {
        if let Some(size) = size {
            check_size(size)?;
        }
        let call = Call::new(Ec2Operation::CreateVolumeFromSnapshot)
            .param("AvailabilityZone", zone.as_str())
            .optional_param("Size", size.map(|s| s.to_string()))
            .param("SnapshotId", snapshot_id)
            .in_zone(zone);
        self.executor.parsed(call, handlers::parse_volume).await
    }

    /// Describe volumes; no ids means all volumes.
    pub async fn describe_volumes<I>(&self, region: Option<Region>, volume_ids: I) -> Result<Vec<Volume>, Ec2Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::DescribeVolumes)
            .in_region(self.executor.region(region))
            .optional_list("VolumeId", volume_ids);
        self.executor.parsed(call, handlers::parse_volumes).await
    }

    /// Delete a volume.
    pub async fn delete_volume(&self, region: Option<Region>, volume_id: &str) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::DeleteVolume)
            .in_region(self.executor.region(region))
            .param("VolumeId", volume_id);
        self.executor.void(call).await
    }

    /// Attach a volume to an instance as `device` (e.g. `/dev/sdh`).
    pub async fn attach_volume(
        &self,
        region: Option<Region>,
        volume_id: &str,
        instance_id: &str,
        device: &str,
    ) -> Result<Attachment, Ec2Error> {
        let call = Call::new(Ec2Operation::AttachVolume)
            .in_region(self.executor.region(region))
            .param("InstanceId", instance_id)
            .param("VolumeId", volume_id)
            .param("Device", device);
        self.executor.parsed(call, handlers::parse_attachment).await
    }

    /// Detach a volume. Detaching a volume that is already available
    /// succeeds.
    pub async fn detach_volume(
        &self,
        region: Option<Region>,
        volume_id: &str,
        force: bool,
        options: DetachVolumeOptions,
    ) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::DetachVolume)
            .in_region(self.executor.region(region))
            .param("VolumeId", volume_id)
            .param("Force", force.to_string())
            .options(&options);
        self.executor.void(call).await
    }

    /// Snapshot a volume.
    pub async fn create_snapshot(
        &self,
        region: Option<Region>,
        volume_id: &str,
        options: CreateSnapshotOptions,
    ) -> Result<Snapshot, Ec2Error> {
        let call = Call::new(Ec2Operation::CreateSnapshot)
            .in_region(self.executor.region(region))
            .param("VolumeId", volume_id)
            .options(&options);
        self.executor.parsed(call, handlers::parse_snapshot).await
    }

    /// Describe snapshots. An unknown snapshot surfaces its service fault;
    /// only a 404 yields an empty list.
    pub async fn describe_snapshots(
        &self,
        region: Option<Region>,
        options: DescribeSnapshotsOptions,
    ) -> Result<Vec<Snapshot>, Ec2Error> {
        let call = Call::new(Ec2Operation::DescribeSnapshots)
            .in_region(self.executor.region(region))
            .options(&options);
        self.executor.parsed(call, handlers::parse_snapshots).await
    }

    /// Delete a snapshot.
    pub async fn delete_snapshot(&self, region: Option<Region>, snapshot_id: &str) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::DeleteSnapshot)
            .in_region(self.executor.region(region))
            .param("SnapshotId", snapshot_id);
        self.executor.void(call).await
    }

    /// Users and groups allowed to create volumes from a snapshot.
    pub async fn describe_create_volume_permission(
        &self,
        region: Option<Region>,
        snapshot_id: &str,
    ) -> Result<Permission, Ec2Error> {
        let call = Call::new(Ec2Operation::DescribeSnapshotCreateVolumePermission)
            .in_region(self.executor.region(region))
            .param("SnapshotId", snapshot_id);
        self.executor.parsed(call, handlers::parse_permission).await
    }

    /// Grant create-volume permission on a snapshot.
    pub async fn add_create_volume_permission<U, G>(
        &self,
        region: Option<Region>,
        user_ids: U,
        groups: G,
        snapshot_id: &str,
    ) -> Result<(), Ec2Error>
    where
        U: IntoIterator,
        U::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::AddSnapshotCreateVolumePermission)
            .in_region(self.executor.region(region))
            .param("SnapshotId", snapshot_id)
            .optional_list("UserId", user_ids)
            .optional_list("UserGroup", groups);
        self.executor.void(call).await
    }

    /// Revoke create-volume permission on a snapshot.
    pub async fn remove_create_volume_permission<U, G>(
        &self,
        region: Option<Region>,
        user_ids: U,
        groups: G,
        snapshot_id: &str,
    ) -> Result<(), Ec2Error>
    where
        U: IntoIterator,
        U::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        let call = Call::new(Ec2Operation::RemoveSnapshotCreateVolumePermission)
            .in_region(self.executor.region(region))
            .param("SnapshotId", snapshot_id)
            .optional_list("UserId", user_ids)
            .optional_list("UserGroup", groups);
        self.executor.void(call).await
    }

    /// Reset create-volume permission to owner-only.
    pub async fn reset_create_volume_permission(
        &self,
        region: Option<Region>,
        snapshot_id: &str,
    ) -> Result<(), Ec2Error> {
        let call = Call::new(Ec2Operation::ResetSnapshotCreateVolumePermission)
            .in_region(self.executor.region(region))
            .param("SnapshotId", snapshot_id);
        self.executor.void(call).await
    }
}
