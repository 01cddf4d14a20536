//! Static registry of EC2 actions.
//!
//! Every typed method maps to one [`Ec2Operation`]; its
//! [`OperationDescriptor`] holds the wire action name, fixed form
//! parameters, endpoint kind, response kind and fault fallback.

use super::params::IndexBase;
use crate::dispatch::Fallback;

/// How the endpoint of an action is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// From an optional region; `None` means the provider default.
    Region,
    /// From the region of an availability zone argument.
    Zone,
}

/// What a successful response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// An XML document mapped to a typed result.
    Parsed,
    /// Nothing of interest; the body is discarded.
    Void,
}

/// Immutable metadata for one API action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Operation identifier.
    pub operation: Ec2Operation,
    /// Wire `Action` value.
    pub action: &'static str,
    /// HTTP verb.
    pub method: &'static str,
    /// Form parameters every call of this action carries.
    pub fixed_params: &'static [(&'static str, &'static str)],
    /// Endpoint selection.
    pub endpoint: EndpointKind,
    /// Response handling.
    pub response: ResponseKind,
    /// Fault the action absorbs, if any.
    pub fallback: Option<Fallback>,
    /// Base index of the action's required list argument.
    pub list_base: IndexBase,
}

/// Every supported EC2 action.
///
/// Some wire actions appear more than once because the typed surface splits
/// them by attribute or operation type (e.g. `ModifyImageAttribute` add vs
/// remove).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ec2Operation {
    /// `CreateImage`.
    CreateImage,
    /// `DescribeImages`.
    DescribeImages,
    /// `DeregisterImage`.
    DeregisterImage,
    /// `RegisterImage` from an S3 manifest.
    RegisterImageFromManifest,
    /// `RegisterImage` backed by an EBS snapshot.
    RegisterImageBackedByEbs,
    /// `DescribeImageAttribute` for `launchPermission`.
    DescribeImageLaunchPermission,
    /// `ModifyImageAttribute` adding launch permission.
    AddImageLaunchPermission,
    /// `ModifyImageAttribute` removing launch permission.
    RemoveImageLaunchPermission,
    /// `ResetImageAttribute` for `launchPermission`.
    ResetImageLaunchPermission,
    /// `DescribeInstances`.
    DescribeInstances,
    /// `RunInstances`.
    RunInstances,
    /// `TerminateInstances`.
    TerminateInstances,
    /// `StopInstances`.
    StopInstances,
    /// `StartInstances`.
    StartInstances,
    /// `RebootInstances`.
    RebootInstances,
    /// `DescribeInstanceAttribute` for `userData`.
    DescribeInstanceUserData,
    /// `ModifyInstanceAttribute` for `userData`.
    SetInstanceUserData,
    /// `DescribeInstanceAttribute` for `rootDeviceName`.
    DescribeInstanceRootDeviceName,
    /// `DescribeInstanceAttribute` for `ramdisk`.
    DescribeInstanceRamdisk,
    /// `DescribeInstanceAttribute` for `kernel`.
    DescribeInstanceKernel,
    /// `DescribeInstanceAttribute` for `disableApiTermination`.
    DescribeInstanceApiTermination,
    /// `DescribeInstanceAttribute` for `instanceType`.
    DescribeInstanceType,
    /// `DescribeInstanceAttribute` for `instanceInitiatedShutdownBehavior`.
    DescribeInstanceShutdownBehavior,
    /// `DescribeInstanceAttribute` for `blockDeviceMapping`.
    DescribeInstanceBlockDeviceMapping,
    /// `ResetInstanceAttribute` for `ramdisk`.
    ResetInstanceRamdisk,
    /// `ResetInstanceAttribute` for `kernel`.
    ResetInstanceKernel,
    /// `ModifyInstanceAttribute` for `ramdisk`.
    SetInstanceRamdisk,
    /// `ModifyInstanceAttribute` for `kernel`.
    SetInstanceKernel,
    /// `ModifyInstanceAttribute` for `disableApiTermination`.
    SetInstanceApiTermination,
    /// `ModifyInstanceAttribute` for `instanceType`.
    SetInstanceType,
    /// `ModifyInstanceAttribute` for `instanceInitiatedShutdownBehavior`.
    SetInstanceShutdownBehavior,
    /// `ModifyInstanceAttribute` with `BlockDeviceMapping.N.*` and no `Attribute`.
    SetInstanceBlockDeviceMapping,
    /// `GetConsoleOutput`.
    GetConsoleOutput,
    /// `CreateVolume` with a size.
    CreateVolume,
    /// `CreateVolume` from a snapshot.
    CreateVolumeFromSnapshot,
    /// `DescribeVolumes`.
    DescribeVolumes,
    /// `DeleteVolume`.
    DeleteVolume,
    /// `AttachVolume`.
    AttachVolume,
    /// `DetachVolume`.
    DetachVolume,
    /// `CreateSnapshot`.
    CreateSnapshot,
    /// `DescribeSnapshots`.
    DescribeSnapshots,
    /// `DeleteSnapshot`.
    DeleteSnapshot,
    /// `DescribeSnapshotAttribute` for `createVolumePermission`.
    DescribeSnapshotCreateVolumePermission,
    /// `ModifySnapshotAttribute` adding create-volume permission.
    AddSnapshotCreateVolumePermission,
    /// `ModifySnapshotAttribute` removing create-volume permission.
    RemoveSnapshotCreateVolumePermission,
    /// `ResetSnapshotAttribute` for `createVolumePermission`.
    ResetSnapshotCreateVolumePermission,
    /// `CreateSecurityGroup`.
    CreateSecurityGroup,
    /// `DeleteSecurityGroup`.
    DeleteSecurityGroup,
    /// `DescribeSecurityGroups`.
    DescribeSecurityGroups,
    /// `AuthorizeSecurityGroupIngress` for a source group.
    AuthorizeIngressFromGroup,
    /// `AuthorizeSecurityGroupIngress` for a CIDR range.
    AuthorizeIngressFromCidr,
    /// `RevokeSecurityGroupIngress` for a source group.
    RevokeIngressFromGroup,
    /// `RevokeSecurityGroupIngress` for a CIDR range.
    RevokeIngressFromCidr,
    /// `CreateKeyPair`.
    CreateKeyPair,
    /// `DescribeKeyPairs`.
    DescribeKeyPairs,
    /// `DeleteKeyPair`.
    DeleteKeyPair,
    /// `AllocateAddress`.
    AllocateAddress,
    /// `AssociateAddress`.
    AssociateAddress,
    /// `DisassociateAddress`.
    DisassociateAddress,
    /// `ReleaseAddress`.
    ReleaseAddress,
    /// `DescribeAddresses`.
    DescribeAddresses,
}

impl Ec2Operation {
    /// Every operation, in registry order.
    pub const ALL: &'static [Ec2Operation] = &[
        Ec2Operation::CreateImage,
        Ec2Operation::DescribeImages,
        Ec2Operation::DeregisterImage,
        Ec2Operation::RegisterImageFromManifest,
        Ec2Operation::RegisterImageBackedByEbs,
        Ec2Operation::DescribeImageLaunchPermission,
        Ec2Operation::AddImageLaunchPermission,
        Ec2Operation::RemoveImageLaunchPermission,
        Ec2Operation::ResetImageLaunchPermission,
        Ec2Operation::DescribeInstances,
        Ec2Operation::RunInstances,
        Ec2Operation::TerminateInstances,
        Ec2Operation::StopInstances,
        Ec2Operation::StartInstances,
        Ec2Operation::RebootInstances,
        Ec2Operation::DescribeInstanceUserData,
        Ec2Operation::SetInstanceUserData,
        Ec2Operation::DescribeInstanceRootDeviceName,
        Ec2Operation::DescribeInstanceRamdisk,
        Ec2Operation::DescribeInstanceKernel,
        Ec2Operation::DescribeInstanceApiTermination,
        Ec2Operation::DescribeInstanceType,
        Ec2Operation::DescribeInstanceShutdownBehavior,
        Ec2Operation::DescribeInstanceBlockDeviceMapping,
        Ec2Operation::ResetInstanceRamdisk,
        Ec2Operation::ResetInstanceKernel,
        Ec2Operation::SetInstanceRamdisk,
        Ec2Operation::SetInstanceKernel,
        Ec2Operation::SetInstanceApiTermination,
        Ec2Operation::SetInstanceType,
        Ec2Operation::SetInstanceShutdownBehavior,
        Ec2Operation::SetInstanceBlockDeviceMapping,
        Ec2Operation::GetConsoleOutput,
        Ec2Operation::CreateVolume,
        Ec2Operation::CreateVolumeFromSnapshot,
        Ec2Operation::DescribeVolumes,
        Ec2Operation::DeleteVolume,
        Ec2Operation::AttachVolume,
        Ec2Operation::DetachVolume,
        Ec2Operation::CreateSnapshot,
        Ec2Operation::DescribeSnapshots,
        Ec2Operation::DeleteSnapshot,
        Ec2Operation::DescribeSnapshotCreateVolumePermission,
        Ec2Operation::AddSnapshotCreateVolumePermission,
        Ec2Operation::RemoveSnapshotCreateVolumePermission,
        Ec2Operation::ResetSnapshotCreateVolumePermission,
        Ec2Operation::CreateSecurityGroup,
        Ec2Operation::DeleteSecurityGroup,
        Ec2Operation::DescribeSecurityGroups,
        Ec2Operation::AuthorizeIngressFromGroup,
        Ec2Operation::AuthorizeIngressFromCidr,
        Ec2Operation::RevokeIngressFromGroup,
        Ec2Operation::RevokeIngressFromCidr,
        Ec2Operation::CreateKeyPair,
        Ec2Operation::DescribeKeyPairs,
        Ec2Operation::DeleteKeyPair,
        Ec2Operation::AllocateAddress,
        Ec2Operation::AssociateAddress,
        Ec2Operation::DisassociateAddress,
        Ec2Operation::ReleaseAddress,
        Ec2Operation::DescribeAddresses,
    ];

    /// The static descriptor for this operation.
    pub fn descriptor(self) -> &'static OperationDescriptor {
        &REGISTRY[self as usize]
    }

    /// The wire `Action` value.
    pub fn action(self) -> &'static str {
        self.descriptor().action
    }
}

const LAUNCH_PERMISSION: (&str, &str) = ("Attribute", "launchPermission");
const CREATE_VOLUME_PERMISSION: (&str, &str) = ("Attribute", "createVolumePermission");
const USER_DATA: (&str, &str) = ("Attribute", "userData");
const ROOT_DEVICE_NAME: (&str, &str) = ("Attribute", "rootDeviceName");
const RAMDISK: (&str, &str) = ("Attribute", "ramdisk");
const KERNEL: (&str, &str) = ("Attribute", "kernel");
const DISABLE_API_TERMINATION: (&str, &str) = ("Attribute", "disableApiTermination");
const INSTANCE_TYPE: (&str, &str) = ("Attribute", "instanceType");
const SHUTDOWN_BEHAVIOR: (&str, &str) = ("Attribute", "instanceInitiatedShutdownBehavior");
const BLOCK_DEVICE_MAPPING: (&str, &str) = ("Attribute", "blockDeviceMapping");
const ADD: (&str, &str) = ("OperationType", "add");
const REMOVE: (&str, &str) = ("OperationType", "remove");

const fn op(operation: Ec2Operation, action: &'static str, response: ResponseKind) -> OperationDescriptor {
    OperationDescriptor {
        operation,
        action,
        method: "POST",
        fixed_params: &[],
        endpoint: EndpointKind::Region,
        response,
        fallback: None,
        list_base: IndexBase::One,
    }
}

const fn fixed(
    mut descriptor: OperationDescriptor,
    params: &'static [(&'static str, &'static str)],
) -> OperationDescriptor {
    descriptor.fixed_params = params;
    descriptor
}

const fn fallback(mut descriptor: OperationDescriptor, fallback: Fallback) -> OperationDescriptor {
    descriptor.fallback = Some(fallback);
    descriptor
}

const fn zoned(mut descriptor: OperationDescriptor) -> OperationDescriptor {
    descriptor.endpoint = EndpointKind::Zone;
    descriptor
}

const fn zero_based(mut descriptor: OperationDescriptor) -> OperationDescriptor {
    descriptor.list_base = IndexBase::Zero;
    descriptor
}

use Ec2Operation as O;
use ResponseKind::{Parsed, Void};

/// Indexed by `Ec2Operation as usize`; order must match the enum.
static REGISTRY: [OperationDescriptor; 61] = [
    op(O::CreateImage, "CreateImage", Parsed),
    fallback(
        op(O::DescribeImages, "DescribeImages", Parsed),
        Fallback::EmptySetOnNotFoundOr404,
    ),
    op(O::DeregisterImage, "DeregisterImage", Void),
    op(O::RegisterImageFromManifest, "RegisterImage", Parsed),
    op(O::RegisterImageBackedByEbs, "RegisterImage", Parsed),
    fixed(
        op(O::DescribeImageLaunchPermission, "DescribeImageAttribute", Parsed),
        &[LAUNCH_PERMISSION],
    ),
    fixed(
        op(O::AddImageLaunchPermission, "ModifyImageAttribute", Void),
        &[LAUNCH_PERMISSION, ADD],
    ),
    fixed(
        op(O::RemoveImageLaunchPermission, "ModifyImageAttribute", Void),
        &[LAUNCH_PERMISSION, REMOVE],
    ),
    fixed(
        op(O::ResetImageLaunchPermission, "ResetImageAttribute", Void),
        &[LAUNCH_PERMISSION],
    ),
    fallback(
        op(O::DescribeInstances, "DescribeInstances", Parsed),
        Fallback::EmptySetOnNotFoundOr404,
    ),
    op(O::RunInstances, "RunInstances", Parsed),
    zero_based(fallback(
        op(O::TerminateInstances, "TerminateInstances", Parsed),
        Fallback::EmptySetOnNotFoundOr404,
    )),
    op(O::StopInstances, "StopInstances", Parsed),
    op(O::StartInstances, "StartInstances", Parsed),
    op(O::RebootInstances, "RebootInstances", Void),
    fixed(
        op(O::DescribeInstanceUserData, "DescribeInstanceAttribute", Parsed),
        &[USER_DATA],
    ),
    fixed(
        op(O::SetInstanceUserData, "ModifyInstanceAttribute", Void),
        &[USER_DATA],
    ),
    fixed(
        op(O::DescribeInstanceRootDeviceName, "DescribeInstanceAttribute", Parsed),
        &[ROOT_DEVICE_NAME],
    ),
    fixed(
        op(O::DescribeInstanceRamdisk, "DescribeInstanceAttribute", Parsed),
        &[RAMDISK],
    ),
    fixed(
        op(O::DescribeInstanceKernel, "DescribeInstanceAttribute", Parsed),
        &[KERNEL],
    ),
    fixed(
        op(O::DescribeInstanceApiTermination, "DescribeInstanceAttribute", Parsed),
        &[DISABLE_API_TERMINATION],
    ),
    fixed(
        op(O::DescribeInstanceType, "DescribeInstanceAttribute", Parsed),
        &[INSTANCE_TYPE],
    ),
    fixed(
        op(O::DescribeInstanceShutdownBehavior, "DescribeInstanceAttribute", Parsed),
        &[SHUTDOWN_BEHAVIOR],
    ),
    fixed(
        op(O::DescribeInstanceBlockDeviceMapping, "DescribeInstanceAttribute", Parsed),
        &[BLOCK_DEVICE_MAPPING],
    ),
    fixed(
        op(O::ResetInstanceRamdisk, "ResetInstanceAttribute", Void),
        &[RAMDISK],
    ),
    fixed(
        op(O::ResetInstanceKernel, "ResetInstanceAttribute", Void),
        &[KERNEL],
    ),
    fixed(
        op(O::SetInstanceRamdisk, "ModifyInstanceAttribute", Void),
        &[RAMDISK],
    ),
    fixed(
        op(O::SetInstanceKernel, "ModifyInstanceAttribute", Void),
        &[KERNEL],
    ),
    fixed(
        op(O::SetInstanceApiTermination, "ModifyInstanceAttribute", Void),
        &[DISABLE_API_TERMINATION],
    ),
    fixed(
        op(O::SetInstanceType, "ModifyInstanceAttribute", Void),
        &[INSTANCE_TYPE],
    ),
    fixed(
        op(O::SetInstanceShutdownBehavior, "ModifyInstanceAttribute", Void),
        &[SHUTDOWN_BEHAVIOR],
    ),
    op(O::SetInstanceBlockDeviceMapping, "ModifyInstanceAttribute", Void),
    op(O::GetConsoleOutput, "GetConsoleOutput", Parsed),
    zoned(op(O::CreateVolume, "CreateVolume", Parsed)),
    zoned(op(O::CreateVolumeFromSnapshot, "CreateVolume", Parsed)),
    op(O::DescribeVolumes, "DescribeVolumes", Parsed),
    op(O::DeleteVolume, "DeleteVolume", Void),
    op(O::AttachVolume, "AttachVolume", Parsed),
    fallback(
        op(O::DetachVolume, "DetachVolume", Void),
        Fallback::VoidOnVolumeAvailable,
    ),
    op(O::CreateSnapshot, "CreateSnapshot", Parsed),
    fallback(
        op(O::DescribeSnapshots, "DescribeSnapshots", Parsed),
        Fallback::EmptySetOnNotFoundOr404,
    ),
    op(O::DeleteSnapshot, "DeleteSnapshot", Void),
    fixed(
        op(O::DescribeSnapshotCreateVolumePermission, "DescribeSnapshotAttribute", Parsed),
        &[CREATE_VOLUME_PERMISSION],
    ),
    fixed(
        op(O::AddSnapshotCreateVolumePermission, "ModifySnapshotAttribute", Void),
        &[CREATE_VOLUME_PERMISSION, ADD],
    ),
    fixed(
        op(O::RemoveSnapshotCreateVolumePermission, "ModifySnapshotAttribute", Void),
        &[CREATE_VOLUME_PERMISSION, REMOVE],
    ),
    fixed(
        op(O::ResetSnapshotCreateVolumePermission, "ResetSnapshotAttribute", Void),
        &[CREATE_VOLUME_PERMISSION],
    ),
    op(O::CreateSecurityGroup, "CreateSecurityGroup", Void),
    fallback(
        op(O::DeleteSecurityGroup, "DeleteSecurityGroup", Void),
        Fallback::VoidOnNotFoundOr404,
    ),
    fallback(
        op(O::DescribeSecurityGroups, "DescribeSecurityGroups", Parsed),
        Fallback::EmptySetOnNotFoundOr404,
    ),
    op(O::AuthorizeIngressFromGroup, "AuthorizeSecurityGroupIngress", Void),
    op(O::AuthorizeIngressFromCidr, "AuthorizeSecurityGroupIngress", Void),
    op(O::RevokeIngressFromGroup, "RevokeSecurityGroupIngress", Void),
    op(O::RevokeIngressFromCidr, "RevokeSecurityGroupIngress", Void),
    op(O::CreateKeyPair, "CreateKeyPair", Parsed),
    fallback(
        op(O::DescribeKeyPairs, "DescribeKeyPairs", Parsed),
        Fallback::EmptySetOnNotFoundOr404,
    ),
    op(O::DeleteKeyPair, "DeleteKeyPair", Void),
    op(O::AllocateAddress, "AllocateAddress", Parsed),
    op(O::AssociateAddress, "AssociateAddress", Void),
    op(O::DisassociateAddress, "DisassociateAddress", Void),
    op(O::ReleaseAddress, "ReleaseAddress", Void),
    fallback(
        op(O::DescribeAddresses, "DescribeAddresses", Parsed),
        Fallback::EmptySetOnNotFoundOr404,
    ),
];
