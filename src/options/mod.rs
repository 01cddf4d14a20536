//! Optional parameters for EC2 actions.
//!
//! Each options type is a builder that accumulates its form parameters in
//! call order. Options are appended after an action's required parameters.
//! Setting a list twice replaces the earlier list.

mod ebs;
mod images;
mod instances;

pub use ebs::{CreateSnapshotOptions, DescribeSnapshotsOptions, DetachVolumeOptions};
pub use images::{CreateImageOptions, DescribeImagesOptions, RegisterImageBackedByEbsOptions, RegisterImageOptions};
pub use instances::RunInstancesOptions;

use crate::error::RequestError;
use crate::request::{FormParams, IndexBase};
use crate::types::BlockDeviceMapping;
use std::fmt;

/// A set of optional form parameters for one action.
pub trait FormOptions: fmt::Debug + Send + Sync {
    /// The accumulated parameters, in builder-call order.
    fn form_params(&self) -> &FormParams;

    /// Check option values that cannot be rejected inside a builder chain.
    fn validate(&self) -> Result<(), RequestError> {
        Ok(())
    }
}

/// Render block device mappings as `BlockDeviceMapping.N.*` pairs.
pub(crate) fn block_device_params(mappings: &[BlockDeviceMapping], base: IndexBase) -> FormParams {
    let mut params = FormParams::new();
    for (offset, mapping) in mappings.iter().enumerate() {
        let prefix = format!("BlockDeviceMapping.{}", base.start() + offset);
        params.push(format!("{}.DeviceName", prefix), mapping.device_name.as_str());
        if let Some(virtual_name) = &mapping.virtual_name {
            params.push(format!("{}.VirtualName", prefix), virtual_name.as_str());
        }
        if let Some(snapshot_id) = &mapping.snapshot_id {
            params.push(format!("{}.Ebs.SnapshotId", prefix), snapshot_id.as_str());
        }
        if let Some(size) = mapping.volume_size {
            params.push(format!("{}.Ebs.VolumeSize", prefix), size.to_string());
        }
        if let Some(delete) = mapping.delete_on_termination {
            params.push(format!("{}.Ebs.DeleteOnTermination", prefix), delete.to_string());
        }
        if mapping.no_device {
            params.push(format!("{}.NoDevice", prefix), "");
        }
    }
    params
}

/// Validate EBS volume sizes on block device mappings.
pub(crate) fn validate_block_devices(mappings: &[BlockDeviceMapping]) -> Result<(), RequestError> {
    for mapping in mappings {
        if mapping.device_name.is_empty() {
            return Err(RequestError::MissingParameter {
                name: "BlockDeviceMapping.DeviceName".to_string(),
            });
        }
        if let Some(size) = mapping.volume_size {
            if !(1..=1024).contains(&size) {
                return Err(RequestError::Validation {
                    message: format!(
                        "volume size for {} must be between 1 and 1024 GiB, got {}",
                        mapping.device_name, size
                    ),
                });
            }
        }
    }
    Ok(())
}
