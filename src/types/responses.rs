//! Result types returned by EC2 actions.

use super::common::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A machine, kernel or ramdisk image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Image {
    /// Image ID.
    pub image_id: String,
    /// Manifest location.
    pub image_location: Option<String>,
    /// Image state (`available`, `pending`, `failed`).
    pub image_state: Option<String>,
    /// Owner account ID.
    pub owner_id: Option<String>,
    /// Owner alias, e.g. `amazon`.
    pub owner_alias: Option<String>,
    /// Whether the image has public launch permissions.
    pub is_public: bool,
    /// Architecture.
    pub architecture: Option<Architecture>,
    /// Image type.
    pub image_type: Option<ImageType>,
    /// Kernel ID.
    pub kernel_id: Option<String>,
    /// Ramdisk ID.
    pub ramdisk_id: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Root device type.
    pub root_device_type: Option<RootDeviceType>,
    /// Root device name.
    pub root_device_name: Option<String>,
    /// Product codes.
    pub product_codes: Vec<String>,
}

/// Launch or create-volume permissions on an image or snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permission {
    /// Account IDs granted the permission.
    pub user_ids: BTreeSet<String>,
    /// Groups granted the permission (only `all` exists).
    pub groups: BTreeSet<String>,
}

impl Permission {
    /// Permission for the given accounts and groups.
    pub fn new<U, G>(user_ids: U, groups: G) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            user_ids: user_ids.into_iter().map(Into::into).collect(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// True if nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty() && self.groups.is_empty()
    }
}

/// A reservation: a group of instances launched together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation ID.
    pub reservation_id: String,
    /// Owner account ID.
    pub owner_id: Option<String>,
    /// Requester ID when launched on behalf of the owner.
    pub requester_id: Option<String>,
    /// Security group names.
    pub groups: Vec<String>,
    /// Instances in the reservation.
    pub instances: Vec<RunningInstance>,
}

/// An instance as returned by `DescribeInstances` and `RunInstances`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunningInstance {
    /// Instance ID.
    pub instance_id: String,
    /// Image the instance was launched from.
    pub image_id: Option<String>,
    /// Current state.
    pub state: Option<InstanceState>,
    /// Private DNS name.
    pub private_dns_name: Option<String>,
    /// Public DNS name.
    pub dns_name: Option<String>,
    /// Key pair name.
    pub key_name: Option<String>,
    /// Launch index within the reservation.
    pub ami_launch_index: Option<u32>,
    /// Instance type as reported by the service.
    pub instance_type: Option<String>,
    /// Launch time.
    pub launch_time: Option<DateTime<Utc>>,
    /// Availability zone.
    pub availability_zone: Option<String>,
    /// Kernel ID.
    pub kernel_id: Option<String>,
    /// Ramdisk ID.
    pub ramdisk_id: Option<String>,
    /// Whether detailed monitoring is enabled.
    pub monitoring: bool,
    /// Private IP address.
    pub private_ip_address: Option<String>,
    /// Public IP address.
    pub ip_address: Option<String>,
    /// Root device type.
    pub root_device_type: Option<RootDeviceType>,
    /// Root device name.
    pub root_device_name: Option<String>,
}

/// The state transition reported by start, stop and terminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceStateChange {
    /// Instance ID.
    pub instance_id: String,
    /// State after the call.
    pub current_state: Option<InstanceState>,
    /// State before the call.
    pub previous_state: Option<InstanceState>,
}

/// An EBS volume.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Volume {
    /// Volume ID.
    pub volume_id: String,
    /// Size in GiB.
    pub size: Option<u32>,
    /// Source snapshot.
    pub snapshot_id: Option<String>,
    /// Availability zone.
    pub availability_zone: Option<String>,
    /// Status.
    pub status: Option<VolumeStatus>,
    /// Creation time.
    pub create_time: Option<DateTime<Utc>>,
    /// Attachments.
    pub attachments: Vec<Attachment>,
}

/// A volume attachment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attachment {
    /// Volume ID.
    pub volume_id: String,
    /// Instance ID.
    pub instance_id: Option<String>,
    /// Device name.
    pub device: Option<String>,
    /// Status.
    pub status: Option<AttachmentStatus>,
    /// Attach time.
    pub attach_time: Option<DateTime<Utc>>,
}

/// An EBS volume mapped to a device of a running instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockDevice {
    /// Volume ID.
    pub volume_id: String,
    /// Attachment status; absent on mappings sent by the caller.
    pub status: Option<AttachmentStatus>,
    /// Attach time; absent on mappings sent by the caller.
    pub attach_time: Option<DateTime<Utc>>,
    /// Whether the volume is deleted when the instance terminates.
    pub delete_on_termination: bool,
}

impl BlockDevice {
    /// A mapping to send with `ModifyInstanceAttribute`.
    pub fn new(volume_id: impl Into<String>, delete_on_termination: bool) -> Self {
        Self {
            volume_id: volume_id.into(),
            delete_on_termination,
            ..Default::default()
        }
    }
}

/// Console output of an instance, base64-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsoleOutput {
    /// Instance ID.
    pub instance_id: String,
    /// When the output was last updated.
    pub timestamp: Option<DateTime<Utc>>,
    /// Decoded output; invalid UTF-8 is replaced.
    pub output: String,
}

/// An EBS snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot ID.
    pub snapshot_id: String,
    /// Source volume.
    pub volume_id: Option<String>,
    /// Source volume size in GiB.
    pub volume_size: Option<u32>,
    /// Status.
    pub status: Option<SnapshotStatus>,
    /// Start time.
    pub start_time: Option<DateTime<Utc>>,
    /// Progress, e.g. `100%`.
    pub progress: Option<String>,
    /// Owner account ID.
    pub owner_id: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// A key pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyPair {
    /// Key name.
    pub key_name: String,
    /// SHA-1 fingerprint.
    pub key_fingerprint: Option<String>,
    /// Unencrypted PEM private key, only returned by `CreateKeyPair`.
    pub key_material: Option<String>,
}

/// A security group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecurityGroup {
    /// Owner account ID.
    pub owner_id: Option<String>,
    /// Group name.
    pub group_name: String,
    /// Group ID.
    pub group_id: Option<String>,
    /// Description.
    pub group_description: Option<String>,
    /// Ingress rules.
    pub ip_permissions: Vec<IpPermission>,
}

/// A single ingress rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpPermission {
    /// Protocol.
    pub ip_protocol: Option<IpProtocol>,
    /// Start of the port range (or ICMP type).
    pub from_port: i32,
    /// End of the port range (or ICMP code).
    pub to_port: i32,
    /// Source groups.
    pub groups: Vec<UserIdGroupPair>,
    /// Source CIDR ranges.
    pub ip_ranges: Vec<String>,
}

/// A security group owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdGroupPair {
    /// Owner account ID.
    pub user_id: String,
    /// Group name.
    pub group_name: String,
}

impl UserIdGroupPair {
    /// Pair for the given account and group.
    pub fn new(user_id: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            group_name: group_name.into(),
        }
    }
}

/// An elastic IP address and the instance it is associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIpInstanceIdPair {
    /// The elastic IP.
    pub public_ip: String,
    /// The associated instance, if any.
    pub instance_id: Option<String>,
}
