//! Common enums and value types for EC2.

use crate::error::RequestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a wire enum with `as_str`, `Display` and a `FromStr` that
/// rejects unknown values with the given error constructor.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            /// Returns the EC2 wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RequestError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(RequestError::Validation {
                        message: format!(concat!("Unknown ", stringify!($name), ": {}"), s),
                    }),
                }
            }
        }
    };
}

/// An EC2 region.
///
/// Calls that take `Option<Region>` use the provider default endpoint when
/// `None` is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    /// US East (N. Virginia).
    UsEast1,
    /// US West (N. California).
    UsWest1,
    /// US West (Oregon).
    UsWest2,
    /// EU (Ireland).
    EuWest1,
    /// EU (Frankfurt).
    EuCentral1,
    /// Asia Pacific (Singapore).
    ApSoutheast1,
    /// Asia Pacific (Sydney).
    ApSoutheast2,
    /// Asia Pacific (Tokyo).
    ApNortheast1,
    /// South America (Sao Paulo).
    SaEast1,
}

impl Region {
    /// Every known region.
    pub const ALL: &'static [Region] = &[
        Region::UsEast1,
        Region::UsWest1,
        Region::UsWest2,
        Region::EuWest1,
        Region::EuCentral1,
        Region::ApSoutheast1,
        Region::ApSoutheast2,
        Region::ApNortheast1,
        Region::SaEast1,
    ];

    /// Returns the lowercase wire name (e.g. `us-east-1`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsWest1 => "us-west-1",
            Region::UsWest2 => "us-west-2",
            Region::EuWest1 => "eu-west-1",
            Region::EuCentral1 => "eu-central-1",
            Region::ApSoutheast1 => "ap-southeast-1",
            Region::ApSoutheast2 => "ap-southeast-2",
            Region::ApNortheast1 => "ap-northeast-1",
            Region::SaEast1 => "sa-east-1",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace('_', "-");
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| RequestError::InvalidRegion {
                value: s.to_string(),
            })
    }
}

/// An availability zone such as `us-east-1a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AvailabilityZone {
    name: String,
    region: Region,
}

impl AvailabilityZone {
    /// Parse and validate a zone name. The zone must be a known region
    /// followed by a single lowercase letter.
    pub fn new(name: impl AsRef<str>) -> Result<Self, RequestError> {
        let raw = name.as_ref();
        let lower = raw.trim().to_ascii_lowercase();
        let invalid = || RequestError::InvalidZone {
            value: raw.to_string(),
        };

        let suffix = lower.chars().last().ok_or_else(invalid)?;
        if !suffix.is_ascii_lowercase() {
            return Err(invalid());
        }
        let region: Region = lower[..lower.len() - 1].parse().map_err(|_| invalid())?;

        Ok(Self {
            name: lower,
            region,
        })
    }

    /// Lowercase wire name.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The region that hosts this zone.
    pub fn region(&self) -> Region {
        self.region
    }
}

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for AvailabilityZone {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AvailabilityZone::new(s)
    }
}

impl TryFrom<String> for AvailabilityZone {
    type Error = RequestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AvailabilityZone::new(value)
    }
}

impl From<AvailabilityZone> for String {
    fn from(zone: AvailabilityZone) -> Self {
        zone.name
    }
}

wire_enum! {
    /// Instance type.
    InstanceType {
        /// Micro.
        T1Micro => "t1.micro",
        /// Small.
        M1Small => "m1.small",
        /// Medium.
        M1Medium => "m1.medium",
        /// Large.
        M1Large => "m1.large",
        /// Extra large.
        M1Xlarge => "m1.xlarge",
        /// High-memory extra large.
        M2Xlarge => "m2.xlarge",
        /// High-memory double extra large.
        M22xlarge => "m2.2xlarge",
        /// High-memory quadruple extra large.
        M24xlarge => "m2.4xlarge",
        /// High-CPU medium.
        C1Medium => "c1.medium",
        /// High-CPU extra large.
        C1Xlarge => "c1.xlarge",
        /// Cluster compute quadruple extra large.
        Cc14xlarge => "cc1.4xlarge",
    }
}

wire_enum! {
    /// Image architecture.
    Architecture {
        /// 32-bit.
        I386 => "i386",
        /// 64-bit.
        X86_64 => "x86_64",
    }
}

wire_enum! {
    /// Image type.
    ImageType {
        /// Machine image.
        Machine => "machine",
        /// Kernel image.
        Kernel => "kernel",
        /// Ramdisk image.
        Ramdisk => "ramdisk",
    }
}

wire_enum! {
    /// Root device type of an image or instance.
    RootDeviceType {
        /// Instance store.
        InstanceStore => "instance-store",
        /// Elastic block store.
        Ebs => "ebs",
    }
}

wire_enum! {
    /// Lifecycle state of an instance.
    InstanceState {
        /// Pending.
        Pending => "pending",
        /// Running.
        Running => "running",
        /// Shutting down.
        ShuttingDown => "shutting-down",
        /// Terminated.
        Terminated => "terminated",
        /// Stopping.
        Stopping => "stopping",
        /// Stopped.
        Stopped => "stopped",
    }
}

wire_enum! {
    /// Status of a volume.
    VolumeStatus {
        /// Being created.
        Creating => "creating",
        /// Available for attachment.
        Available => "available",
        /// Attached to an instance.
        InUse => "in-use",
        /// Being deleted.
        Deleting => "deleting",
        /// Deleted.
        Deleted => "deleted",
        /// Failed.
        Error => "error",
    }
}

wire_enum! {
    /// Status of a volume attachment.
    AttachmentStatus {
        /// Attaching.
        Attaching => "attaching",
        /// Attached.
        Attached => "attached",
        /// Detaching.
        Detaching => "detaching",
        /// Detached.
        Detached => "detached",
        /// Busy.
        Busy => "busy",
    }
}

wire_enum! {
    /// Status of a snapshot.
    SnapshotStatus {
        /// In progress.
        Pending => "pending",
        /// Done.
        Completed => "completed",
        /// Failed.
        Error => "error",
    }
}

wire_enum! {
    /// What an instance does when it shuts itself down.
    InstanceInitiatedShutdownBehavior {
        /// Stop the instance.
        Stop => "stop",
        /// Terminate the instance.
        Terminate => "terminate",
    }
}

wire_enum! {
    /// IP protocol used in security group rules.
    IpProtocol {
        /// TCP.
        Tcp => "tcp",
        /// UDP.
        Udp => "udp",
        /// ICMP.
        Icmp => "icmp",
    }
}

/// A block device mapping supplied when registering an image or launching
/// instances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockDeviceMapping {
    /// Device name, e.g. `/dev/sdb`.
    pub device_name: String,
    /// Virtual name for ephemeral stores, e.g. `ephemeral0`.
    pub virtual_name: Option<String>,
    /// Snapshot the EBS volume is created from.
    pub snapshot_id: Option<String>,
    /// EBS volume size in GiB.
    pub volume_size: Option<u32>,
    /// Whether the EBS volume is deleted when the instance terminates.
    pub delete_on_termination: Option<bool>,
    /// Suppress the device.
    pub no_device: bool,
}

impl BlockDeviceMapping {
    /// A mapping backed by an existing snapshot.
    pub fn from_snapshot(device_name: impl Into<String>, snapshot_id: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            snapshot_id: Some(snapshot_id.into()),
            ..Default::default()
        }
    }

    /// A mapping for a new, empty EBS volume.
    pub fn new_volume(device_name: impl Into<String>, size_gib: u32) -> Self {
        Self {
            device_name: device_name.into(),
            volume_size: Some(size_gib),
            ..Default::default()
        }
    }

    /// A mapping for an ephemeral store.
    pub fn ephemeral(device_name: impl Into<String>, virtual_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            virtual_name: Some(virtual_name.into()),
            ..Default::default()
        }
    }

    /// Set the virtual name.
    pub fn with_virtual_name(mut self, virtual_name: impl Into<String>) -> Self {
        self.virtual_name = Some(virtual_name.into());
        self
    }

    /// Set delete-on-termination.
    pub fn with_delete_on_termination(mut self, delete: bool) -> Self {
        self.delete_on_termination = Some(delete);
        self
    }

    /// Whether the mapping describes an EBS volume.
    pub fn is_ebs(&self) -> bool {
        self.snapshot_id.is_some() || self.volume_size.is_some()
    }
}
