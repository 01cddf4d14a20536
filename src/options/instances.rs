//! Options for `RunInstances`.

use super::{block_device_params, validate_block_devices, FormOptions};
use crate::error::RequestError;
use crate::request::{FormParams, IndexBase};
use crate::types::{BlockDeviceMapping, InstanceType};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Maximum size of raw user data accepted by EC2.
pub const MAX_USER_DATA_BYTES: usize = 16 * 1024;

/// Options for `RunInstances`.
#[derive(Debug, Clone, Default)]
pub struct RunInstancesOptions {
    params: FormParams,
    user_data_len: Option<usize>,
    block_devices: Vec<BlockDeviceMapping>,
}

impl RunInstancesOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pair to install on the instances.
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.params.set("KeyName", key_name);
        self
    }

    /// Security groups to launch into. Replaces any earlier list.
    pub fn with_security_groups<I, V>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params.replace_indexed("SecurityGroup", IndexBase::One, groups);
        self
    }

    /// Raw user data; sent base64-encoded.
    pub fn with_user_data(mut self, data: &[u8]) -> Self {
        self.user_data_len = Some(data.len());
        self.params.set("UserData", STANDARD.encode(data));
        self
    }

    /// Instance type.
    pub fn as_type(mut self, instance_type: InstanceType) -> Self {
        self.params.set("InstanceType", instance_type.as_str());
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

    /// Enable detailed CloudWatch monitoring.
    pub fn enable_monitoring(mut self) -> Self {
        self.params.set("Monitoring.Enabled", "true");
        self
    }

    /// Block device mappings, numbered from 1. Replaces any earlier list.
    pub fn with_block_device_mappings<I>(mut self, mappings: I) -> Self
    where
        I: IntoIterator<Item = BlockDeviceMapping>,
    {
        self.block_devices = mappings.into_iter().collect();
        let fresh = block_device_params(&self.block_devices, IndexBase::One);
        self.params.splice_indexed("BlockDeviceMapping", fresh);
        self
    }
}

impl FormOptions for RunInstancesOptions {
    fn form_params(&self) -> &FormParams {
        &self.params
    }

    fn validate(&self) -> Result<(), RequestError> {
        if let Some(len) = self.user_data_len {
            if len > MAX_USER_DATA_BYTES {
                return Err(RequestError::Validation {
                    message: format!(
                        "user data must be at most {} bytes, got {}",
                        MAX_USER_DATA_BYTES, len
                    ),
                });
            }
        }
        validate_block_devices(&self.block_devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::EncodingProfile;

    #[test]
    fn test_run_options_in_call_order() {
        let options = RunInstancesOptions::new()
            .with_key_name("default")
            .with_security_groups(["web", "db"])
            .as_type(InstanceType::M1Small)
            .enable_monitoring();
        assert_eq!(
            options.form_params().encode(EncodingProfile::Form),
            "KeyName=default&SecurityGroup.1=web&SecurityGroup.2=db\
             &InstanceType=m1.small&Monitoring.Enabled=true"
        );
    }

    #[test]
    fn test_user_data_is_base64() {
        let options = RunInstancesOptions::new().with_user_data(b"test");
        assert_eq!(options.form_params().get("UserData"), Some("dGVzdA=="));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_user_data_too_large() {
        let options = RunInstancesOptions::new().with_user_data(&vec![0u8; MAX_USER_DATA_BYTES + 1]);
        assert!(matches!(options.validate(), Err(RequestError::Validation { .. })));
    }

    #[test]
    fn test_block_devices_replace() {
        let options = RunInstancesOptions::new()
            .with_block_device_mappings(vec![
                BlockDeviceMapping::ephemeral("/dev/sdb", "ephemeral0"),
                BlockDeviceMapping::ephemeral("/dev/sdc", "ephemeral1"),
            ])
            .with_block_device_mappings(vec![BlockDeviceMapping::new_volume("/dev/sdh", 10)]);
        let params = options.form_params();
        assert_eq!(params.get("BlockDeviceMapping.1.DeviceName"), Some("/dev/sdh"));
        assert!(!params.contains("BlockDeviceMapping.2.DeviceName"));
    }
}
