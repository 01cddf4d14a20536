//! Options for image (AMI) actions.

use super::{block_device_params, validate_block_devices, FormOptions};
use crate::error::RequestError;
use crate::request::{FormParams, IndexBase};
use crate::types::{Architecture, BlockDeviceMapping};

/// Options for `DescribeImages`.
#[derive(Debug, Clone, Default)]
pub struct DescribeImagesOptions {
    params: FormParams,
}

impl DescribeImagesOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only images the given account (or `self`, `all`) can launch.
    pub fn executable_by(mut self, identity: impl Into<String>) -> Self {
        self.params.set("ExecutableBy", identity);
        self
    }

    /// Only images owned by these accounts (`self`, `amazon` or an account ID).
    pub fn owned_by<I, V>(mut self, owners: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params.replace_indexed("Owner", IndexBase::One, owners);
        self
    }

    /// Only these image IDs.
    pub fn image_ids<I, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params.replace_indexed("ImageId", IndexBase::One, ids);
        self
    }
}

impl FormOptions for DescribeImagesOptions {
    fn form_params(&self) -> &FormParams {
        &self.params
    }
}

/// Options for `CreateImage`.
#[derive(Debug, Clone, Default)]
pub struct CreateImageOptions {
    params: FormParams,
}

impl CreateImageOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Image description, up to 255 characters.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.params.set("Description", description);
        self
    }

    /// Do not shut down the instance before imaging it.
    pub fn no_reboot(mut self) -> Self {
        self.params.set("NoReboot", "true");
        self
    }
}

impl FormOptions for CreateImageOptions {
    fn form_params(&self) -> &FormParams {
        &self.params
    }

    fn validate(&self) -> Result<(), RequestError> {
        validate_description(&self.params)
    }
}

/// Options for `RegisterImage` from an S3 manifest.
#[derive(Debug, Clone, Default)]
pub struct RegisterImageOptions {
    params: FormParams,
}

impl RegisterImageOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Image description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.params.set("Description", description);
        self
    }

    /// Image architecture.
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.params.set("Architecture", architecture.as_str());
        self
    }

    /// Kernel to boot with.
    pub fn with_kernel_id(mut self, kernel_id: impl Into<String>) -> Self {
        self.params.set("KernelId", kernel_id);
        self
    }

    /// Ramdisk to boot with.
    pub fn with_ramdisk_id(mut self, ramdisk_id: impl Into<String>) -> Self {
        self.params.set("RamdiskId", ramdisk_id);
        self
    }
}

impl FormOptions for RegisterImageOptions {
    fn form_params(&self) -> &FormParams {
        &self.params
    }

    fn validate(&self) -> Result<(), RequestError> {
        validate_description(&self.params)
    }
}

/// Options for registering an EBS-backed image.
///
/// The root device occupies `BlockDeviceMapping.0`; mappings added here are
/// numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct RegisterImageBackedByEbsOptions {
    params: FormParams,
    block_devices: Vec<BlockDeviceMapping>,
}

impl RegisterImageBackedByEbsOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Image description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.params.set("Description", description);
        self
    }

    /// Image architecture.
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.params.set("Architecture", architecture.as_str());
        self
    }

    /// Kernel to boot with.
    pub fn with_kernel_id(mut self, kernel_id: impl Into<String>) -> Self {
        self.params.set("KernelId", kernel_id);
        self
    }

    /// Ramdisk to boot with.
    pub fn with_ramdisk_id(mut self, ramdisk_id: impl Into<String>) -> Self {
        self.params.set("RamdiskId", ramdisk_id);
        self
    }

    /// Add a device created from a snapshot.
    pub fn add_block_device_from_snapshot(
        self,
        device_name: impl Into<String>,
        virtual_name: Option<String>,
        snapshot_id: impl Into<String>,
    ) -> Self {
        let mut mapping = BlockDeviceMapping::from_snapshot(device_name, snapshot_id)
            .with_delete_on_termination(false);
        mapping.virtual_name = virtual_name;
        self.add_block_device(mapping)
    }

    /// Add a new empty EBS device.
    pub fn add_new_block_device(
        self,
        device_name: impl Into<String>,
        virtual_name: impl Into<String>,
        size_gib: u32,
    ) -> Self {
        let mapping = BlockDeviceMapping::new_volume(device_name, size_gib)
            .with_virtual_name(virtual_name)
            .with_delete_on_termination(false);
        self.add_block_device(mapping)
    }

    /// Add an arbitrary block device mapping.
    pub fn add_block_device(mut self, mapping: BlockDeviceMapping) -> Self {
        self.block_devices.push(mapping);
        let fresh = block_device_params(&self.block_devices, IndexBase::One);
        self.params.splice_indexed("BlockDeviceMapping", fresh);
        self
    }
}

impl FormOptions for RegisterImageBackedByEbsOptions {
    fn form_params(&self) -> &FormParams {
        &self.params
    }

    fn validate(&self) -> Result<(), RequestError> {
        validate_description(&self.params)?;
        validate_block_devices(&self.block_devices)
    }
}

fn validate_description(params: &FormParams) -> Result<(), RequestError> {
    match params.get("Description") {
        Some(d) if d.chars().count() > 255 => Err(RequestError::Validation {
            message: "description must be at most 255 characters".to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::EncodingProfile;

    #[test]
    fn test_describe_images_options_order() {
        let options = DescribeImagesOptions::new()
            .executable_by("me")
            .owned_by(["fred", "nancy"])
            .image_ids(["1", "2"]);
        assert_eq!(
            options.form_params().encode(EncodingProfile::Form),
            "ExecutableBy=me&Owner.1=fred&Owner.2=nancy&ImageId.1=1&ImageId.2=2"
        );
    }

    #[test]
    fn test_owned_by_twice_replaces() {
        let options = DescribeImagesOptions::new()
            .owned_by(["fred", "nancy"])
            .image_ids(["1"])
            .owned_by(["amazon"]);
        assert_eq!(
            options.form_params().encode(EncodingProfile::Form),
            "Owner.1=amazon&ImageId.1=1"
        );
    }

    #[test]
    fn test_create_image_options() {
        let options = CreateImageOptions::new().with_description("description").no_reboot();
        assert_eq!(
            options.form_params().encode(EncodingProfile::Form),
            "Description=description&NoReboot=true"
        );
        assert!(options.validate().is_ok());

        let long = CreateImageOptions::new().with_description("x".repeat(256));
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_ebs_options_number_from_one() {
        let options = RegisterImageBackedByEbsOptions::new()
            .with_description("description")
            .add_block_device_from_snapshot("/dev/device", None, "snapshot")
            .add_new_block_device("/dev/newdevice", "newblock", 100);
        let params = options.form_params();
        assert_eq!(params.get("Description"), Some("description"));
        assert_eq!(params.get("BlockDeviceMapping.1.DeviceName"), Some("/dev/device"));
        assert_eq!(params.get("BlockDeviceMapping.2.Ebs.VolumeSize"), Some("100"));
        assert!(!params.contains("BlockDeviceMapping.0.DeviceName"));
        assert!(options.validate().is_ok());
    }
}
