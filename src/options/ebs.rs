//! Options for Elastic Block Store actions.

use super::FormOptions;
use crate::request::{FormParams, IndexBase};

/// Options for `DetachVolume`.
#[derive(Debug, Clone, Default)]
pub struct DetachVolumeOptions {
    params: FormParams,
}

impl DetachVolumeOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance the volume is attached to.
    pub fn from_instance(mut self, instance_id: impl Into<String>) -> Self {
        self.params.set("InstanceId", instance_id);
        self
    }

    /// Device the volume is exposed as.
    pub fn from_device(mut self, device: impl Into<String>) -> Self {
        self.params.set("Device", device);
        self
    }
}

impl FormOptions for DetachVolumeOptions {
    fn form_params(&self) -> &FormParams {
        &self.params
    }
}

/// Options for `CreateSnapshot`.
#[derive(Debug, Clone, Default)]
pub struct CreateSnapshotOptions {
    params: FormParams,
}

impl CreateSnapshotOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.params.set("Description", description);
        self
    }
}

impl FormOptions for CreateSnapshotOptions {
    fn form_params(&self) -> &FormParams {
        &self.params
    }
}

/// Options for `DescribeSnapshots`.
#[derive(Debug, Clone, Default)]
pub struct DescribeSnapshotsOptions {
    params: FormParams,
}

impl DescribeSnapshotsOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only snapshots owned by these accounts.
    pub fn owned_by<I, V>(mut self, owners: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params.replace_indexed("Owner", IndexBase::One, owners);
        self
    }

    /// Only snapshots these accounts may create volumes from.
    pub fn restorable_by<I, V>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params.replace_indexed("RestorableBy", IndexBase::One, accounts);
        self
    }

    /// Only these snapshot IDs.
    pub fn snapshot_ids<I, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params.replace_indexed("SnapshotId", IndexBase::One, ids);
        self
    }
}

impl FormOptions for DescribeSnapshotsOptions {
    fn form_params(&self) -> &FormParams {
        &self.params
    }
}
