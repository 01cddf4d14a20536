//! Mappers from EC2 response documents to result types.

use super::XmlNode;
use crate::error::{Ec2Error, ResponseError};
use crate::types::*;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

fn required(node: &XmlNode, name: &str) -> Result<String, Ec2Error> {
    node.text_of(name).ok_or_else(|| {
        Ec2Error::Response(ResponseError::MissingField {
            field: name.to_string(),
        })
    })
}

fn time_of(node: &XmlNode, name: &str) -> Option<DateTime<Utc>> {
    node.text_of(name)
        .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// `<imageId>` of `CreateImage` and `RegisterImage`.
pub fn parse_image_id(xml: &str) -> Result<String, Ec2Error> {
    required(&XmlNode::parse(xml)?, "imageId")
}

/// `DescribeImages`.
pub fn parse_images(xml: &str) -> Result<Vec<Image>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    root.items("imagesSet").map(image).collect()
}

fn image(item: &XmlNode) -> Result<Image, Ec2Error> {
    Ok(Image {
        image_id: required(item, "imageId")?,
        image_location: item.text_of("imageLocation"),
        image_state: item.text_of("imageState"),
        owner_id: item.text_of("imageOwnerId"),
        owner_alias: item.text_of("imageOwnerAlias"),
        is_public: item.text_of("isPublic").as_deref() == Some("true"),
        architecture: item.parse_of("architecture"),
        image_type: item.parse_of("imageType"),
        kernel_id: item.text_of("kernelId"),
        ramdisk_id: item.text_of("ramdiskId"),
        name: item.text_of("name"),
        description: item.text_of("description"),
        root_device_type: item.parse_of("rootDeviceType"),
        root_device_name: item.text_of("rootDeviceName"),
        product_codes: item
            .items("productCodes")
            .filter_map(|p| p.text_of("productCode"))
            .collect(),
    })
}

/// `DescribeImageAttribute` (launchPermission) and
/// `DescribeSnapshotAttribute` (createVolumePermission).
pub fn parse_permission(xml: &str) -> Result<Permission, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    let mut permission = Permission::default();
    for set in ["launchPermission", "createVolumePermission"] {
        for item in root.items(set) {
            if let Some(user) = item.text_of("userId") {
                permission.user_ids.insert(user);
            }
            if let Some(group) = item.text_of("group") {
                permission.groups.insert(group);
            }
        }
    }
    Ok(permission)
}

/// `DescribeInstances`.
pub fn parse_reservations(xml: &str) -> Result<Vec<Reservation>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    root.items("reservationSet").map(reservation).collect()
}

/// `RunInstances`, whose response is a single reservation at the root.
pub fn parse_reservation(xml: &str) -> Result<Reservation, Ec2Error> {
    reservation(&XmlNode::parse(xml)?)
}

fn reservation(node: &XmlNode) -> Result<Reservation, Ec2Error> {
    Ok(Reservation {
        reservation_id: required(node, "reservationId")?,
        owner_id: node.text_of("ownerId"),
        requester_id: node.text_of("requesterId"),
        groups: node
            .items("groupSet")
            .filter_map(|g| g.text_of("groupId"))
            .collect(),
        instances: node
            .items("instancesSet")
            .map(running_instance)
            .collect::<Result<_, _>>()?,
    })
}

fn running_instance(item: &XmlNode) -> Result<RunningInstance, Ec2Error> {
    Ok(RunningInstance {
        instance_id: required(item, "instanceId")?,
        image_id: item.text_of("imageId"),
        state: item.child("instanceState").and_then(|s| s.parse_of("name")),
        private_dns_name: item.text_of("privateDnsName"),
        dns_name: item.text_of("dnsName"),
        key_name: item.text_of("keyName"),
        ami_launch_index: item.parse_of("amiLaunchIndex"),
        instance_type: item.text_of("instanceType"),
        launch_time: time_of(item, "launchTime"),
        availability_zone: item
            .child("placement")
            .and_then(|p| p.text_of("availabilityZone")),
        kernel_id: item.text_of("kernelId"),
        ramdisk_id: item.text_of("ramdiskId"),
        monitoring: item
            .child("monitoring")
            .and_then(|m| m.text_of("state"))
            .map(|s| s == "enabled")
            .unwrap_or(false),
        private_ip_address: item.text_of("privateIpAddress"),
        ip_address: item.text_of("ipAddress"),
        root_device_type: item.parse_of("rootDeviceType"),
        root_device_name: item.text_of("rootDeviceName"),
    })
}

/// `StartInstances`, `StopInstances` and `TerminateInstances`.
pub fn parse_instance_state_changes(xml: &str) -> Result<Vec<InstanceStateChange>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    root.items("instancesSet")
        .map(|item| {
            Ok(InstanceStateChange {
                instance_id: required(item, "instanceId")?,
                current_state: item.child("currentState").and_then(|s| s.parse_of("name")),
                previous_state: item.child("previousState").and_then(|s| s.parse_of("name")),
            })
        })
        .collect()
}

fn decode_base64(field: &str, encoded: &str) -> Result<Vec<u8>, Ec2Error> {
    STANDARD.decode(encoded.as_bytes()).map_err(|e| {
        Ec2Error::Response(ResponseError::InvalidResponse {
            message: format!("{} is not valid base64: {}", field, e),
        })
    })
}

/// `<attribute><value>` of a `DescribeInstanceAttribute` response.
fn attribute_value(xml: &str, attribute: &str) -> Result<Option<String>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    Ok(root.child(attribute).and_then(|a| a.text_of("value")))
}

/// `DescribeInstanceAttribute` for `userData`, base64-decoded. Empty when
/// the instance has no user data.
pub fn parse_user_data(xml: &str) -> Result<Vec<u8>, Ec2Error> {
    match attribute_value(xml, "userData")? {
        Some(encoded) => decode_base64("userData", &encoded),
        None => Ok(Vec::new()),
    }
}

/// `DescribeInstanceAttribute` for `rootDeviceName`.
pub fn parse_root_device_name(xml: &str) -> Result<Option<String>, Ec2Error> {
    attribute_value(xml, "rootDeviceName")
}

/// `DescribeInstanceAttribute` for `ramdisk`.
pub fn parse_ramdisk(xml: &str) -> Result<Option<String>, Ec2Error> {
    attribute_value(xml, "ramdisk")
}

/// `DescribeInstanceAttribute` for `kernel`.
pub fn parse_kernel(xml: &str) -> Result<Option<String>, Ec2Error> {
    attribute_value(xml, "kernel")
}

/// `DescribeInstanceAttribute` for `disableApiTermination`.
pub fn parse_api_termination_disabled(xml: &str) -> Result<bool, Ec2Error> {
    Ok(attribute_value(xml, "disableApiTermination")?.as_deref() == Some("true"))
}

/// `DescribeInstanceAttribute` for `instanceType`. Kept as text so types
/// newer than [`InstanceType`] still come through.
pub fn parse_instance_type(xml: &str) -> Result<Option<String>, Ec2Error> {
    attribute_value(xml, "instanceType")
}

/// `DescribeInstanceAttribute` for `instanceInitiatedShutdownBehavior`.
pub fn parse_shutdown_behavior(xml: &str) -> Result<Option<InstanceInitiatedShutdownBehavior>, Ec2Error> {
    attribute_value(xml, "instanceInitiatedShutdownBehavior")?
        .map(|value| {
            value.parse().map_err(|_| {
                Ec2Error::Response(ResponseError::InvalidResponse {
                    message: format!("unknown shutdown behavior: {}", value),
                })
            })
        })
        .transpose()
}

/// `DescribeInstanceAttribute` for `blockDeviceMapping`, keyed by device
/// name. Mappings without an EBS volume are skipped.
pub fn parse_block_device_mapping(xml: &str) -> Result<BTreeMap<String, BlockDevice>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    let mut devices = BTreeMap::new();
    for item in root.items("blockDeviceMapping") {
        let Some(ebs) = item.child("ebs") else {
            continue;
        };
        devices.insert(
            required(item, "deviceName")?,
            BlockDevice {
                volume_id: required(ebs, "volumeId")?,
                status: ebs.parse_of("status"),
                attach_time: time_of(ebs, "attachTime"),
                delete_on_termination: ebs.text_of("deleteOnTermination").as_deref() == Some("true"),
            },
        );
    }
    Ok(devices)
}

/// `GetConsoleOutput`.
pub fn parse_console_output(xml: &str) -> Result<ConsoleOutput, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    let output = match root.text_of("output") {
        Some(encoded) => decode_base64("output", &encoded)?,
        None => Vec::new(),
    };
    Ok(ConsoleOutput {
        instance_id: required(&root, "instanceId")?,
        timestamp: time_of(&root, "timestamp"),
        output: String::from_utf8_lossy(&output).into_owned(),
    })
}

/// `CreateVolume`, whose response carries the volume at the root.
pub fn parse_volume(xml: &str) -> Result<Volume, Ec2Error> {
    volume(&XmlNode::parse(xml)?)
}

/// `DescribeVolumes`.
pub fn parse_volumes(xml: &str) -> Result<Vec<Volume>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    root.items("volumeSet").map(volume).collect()
}

fn volume(node: &XmlNode) -> Result<Volume, Ec2Error> {
    Ok(Volume {
        volume_id: required(node, "volumeId")?,
        size: node.parse_of("size"),
        snapshot_id: node.text_of("snapshotId"),
        availability_zone: node.text_of("availabilityZone"),
        status: node.parse_of("status"),
        create_time: time_of(node, "createTime"),
        attachments: node
            .items("attachmentSet")
            .map(attachment)
            .collect::<Result<_, _>>()?,
    })
}

/// `AttachVolume`, whose response carries the attachment at the root.
pub fn parse_attachment(xml: &str) -> Result<Attachment, Ec2Error> {
    attachment(&XmlNode::parse(xml)?)
}

fn attachment(node: &XmlNode) -> Result<Attachment, Ec2Error> {
    Ok(Attachment {
        volume_id: required(node, "volumeId")?,
        instance_id: node.text_of("instanceId"),
        device: node.text_of("device"),
        status: node.parse_of("status"),
        attach_time: time_of(node, "attachTime"),
    })
}

/// `CreateSnapshot`, whose response carries the snapshot at the root.
pub fn parse_snapshot(xml: &str) -> Result<Snapshot, Ec2Error> {
    snapshot(&XmlNode::parse(xml)?)
}

/// `DescribeSnapshots`.
pub fn parse_snapshots(xml: &str) -> Result<Vec<Snapshot>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    root.items("snapshotSet").map(snapshot).collect()
}

fn snapshot(node: &XmlNode) -> Result<Snapshot, Ec2Error> {
    Ok(Snapshot {
        snapshot_id: required(node, "snapshotId")?,
        volume_id: node.text_of("volumeId"),
        volume_size: node.parse_of("volumeSize"),
        status: node.parse_of("status"),
        start_time: time_of(node, "startTime"),
        progress: node.text_of("progress"),
        owner_id: node.text_of("ownerId"),
        description: node.text_of("description"),
    })
}

/// `CreateKeyPair`, including the private key material.
pub fn parse_key_pair(xml: &str) -> Result<KeyPair, Ec2Error> {
    key_pair(&XmlNode::parse(xml)?)
}

/// `DescribeKeyPairs`.
pub fn parse_key_pairs(xml: &str) -> Result<Vec<KeyPair>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    root.items("keySet").map(key_pair).collect()
}

fn key_pair(node: &XmlNode) -> Result<KeyPair, Ec2Error> {
    Ok(KeyPair {
        key_name: required(node, "keyName")?,
        key_fingerprint: node.text_of("keyFingerprint"),
        key_material: node.child("keyMaterial").map(|k| k.text.clone()),
    })
}

/// `DescribeSecurityGroups`.
pub fn parse_security_groups(xml: &str) -> Result<Vec<SecurityGroup>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    root.items("securityGroupInfo")
        .map(|item| {
            Ok(SecurityGroup {
                owner_id: item.text_of("ownerId"),
                group_name: required(item, "groupName")?,
                group_id: item.text_of("groupId"),
                group_description: item.text_of("groupDescription"),
                ip_permissions: item.items("ipPermissions").map(ip_permission).collect(),
            })
        })
        .collect()
}

fn ip_permission(item: &XmlNode) -> IpPermission {
    IpPermission {
        ip_protocol: item.parse_of("ipProtocol"),
        from_port: item.parse_of("fromPort").unwrap_or(0),
        to_port: item.parse_of("toPort").unwrap_or(0),
        groups: item
            .items("groups")
            .filter_map(|g| Some(UserIdGroupPair::new(g.text_of("userId")?, g.text_of("groupName")?)))
            .collect(),
        ip_ranges: item
            .items("ipRanges")
            .filter_map(|r| r.text_of("cidrIp"))
            .collect(),
    }
}

/// `AllocateAddress`.
pub fn parse_public_ip(xml: &str) -> Result<String, Ec2Error> {
    required(&XmlNode::parse(xml)?, "publicIp")
}

/// `DescribeAddresses`.
pub fn parse_addresses(xml: &str) -> Result<Vec<PublicIpInstanceIdPair>, Ec2Error> {
    let root = XmlNode::parse(xml)?;
    root.items("addressesSet")
        .map(|item| {
            Ok(PublicIpInstanceIdPair {
                public_ip: required(item, "publicIp")?,
                instance_id: item.text_of("instanceId"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::TestFixtures;

    #[test]
    fn test_parse_images() {
        let xml = r#"<DescribeImagesResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
            <imagesSet><item>
                <imageId>ami-be3adfd7</imageId>
                <imageLocation>ec2-public-images/fedora-8-i386-base-v1.04.manifest.xml</imageLocation>
                <imageState>available</imageState>
                <imageOwnerId>206029621532</imageOwnerId>
                <isPublic>false</isPublic>
                <architecture>i386</architecture>
                <imageType>machine</imageType>
                <kernelId>aki-4438dd2d</kernelId>
                <ramdiskId>ari-4538dd2c</ramdiskId>
                <rootDeviceType>instance-store</rootDeviceType>
                <productCodes><item><productCode>774F4FF8</productCode></item></productCodes>
            </item></imagesSet>
        </DescribeImagesResponse>"#;
        let images = parse_images(xml).unwrap();
        assert_eq!(images.len(), 1);
        let image = &images[0];
        assert_eq!(image.image_id, "ami-be3adfd7");
        assert_eq!(image.architecture, Some(Architecture::I386));
        assert_eq!(image.image_type, Some(ImageType::Machine));
        assert_eq!(image.root_device_type, Some(RootDeviceType::InstanceStore));
        assert!(!image.is_public);
        assert_eq!(image.product_codes, vec!["774F4FF8"]);
    }

    #[test]
    fn test_parse_permission() {
        let xml = r#"<DescribeImageAttributeResponse>
            <imageId>ami-61a54008</imageId>
            <launchPermission>
                <item><group>all</group></item>
                <item><userId>495219933132</userId></item>
            </launchPermission>
        </DescribeImageAttributeResponse>"#;
        let permission = parse_permission(xml).unwrap();
        assert!(permission.groups.contains("all"));
        assert!(permission.user_ids.contains("495219933132"));
    }

    #[test]
    fn test_parse_run_instances() {
        let xml = r#"<RunInstancesResponse>
            <reservationId>r-47a5402e</reservationId>
            <ownerId>AIDADH4IGTRXXKCD</ownerId>
            <groupSet><item><groupId>default</groupId></item></groupSet>
            <instancesSet>
                <item>
                    <instanceId>i-2ba64342</instanceId>
                    <imageId>ami-60a54009</imageId>
                    <instanceState><code>0</code><name>pending</name></instanceState>
                    <amiLaunchIndex>0</amiLaunchIndex>
                    <instanceType>m1.small</instanceType>
                    <launchTime>2007-08-07T11:51:50.000Z</launchTime>
                    <placement><availabilityZone>us-east-1b</availabilityZone></placement>
                    <monitoring><state>enabled</state></monitoring>
                </item>
            </instancesSet>
        </RunInstancesResponse>"#;
        let reservation = parse_reservation(xml).unwrap();
        assert_eq!(reservation.reservation_id, "r-47a5402e");
        assert_eq!(reservation.groups, vec!["default"]);
        let instance = &reservation.instances[0];
        assert_eq!(instance.state, Some(InstanceState::Pending));
        assert_eq!(instance.availability_zone.as_deref(), Some("us-east-1b"));
        assert!(instance.monitoring);
        assert!(instance.launch_time.is_some());
    }

    #[test]
    fn test_parse_state_changes() {
        let xml = r#"<TerminateInstancesResponse><instancesSet><item>
            <instanceId>i-3ea74257</instanceId>
            <currentState><code>32</code><name>shutting-down</name></currentState>
            <previousState><code>16</code><name>running</name></previousState>
        </item></instancesSet></TerminateInstancesResponse>"#;
        let changes = parse_instance_state_changes(xml).unwrap();
        assert_eq!(changes[0].current_state, Some(InstanceState::ShuttingDown));
        assert_eq!(changes[0].previous_state, Some(InstanceState::Running));
    }

    #[test]
    fn test_parse_user_data() {
        let xml = "<DescribeInstanceAttributeResponse><instanceId>i-1</instanceId>\
                   <userData><value>dGVzdA==</value></userData></DescribeInstanceAttributeResponse>";
        assert_eq!(parse_user_data(xml).unwrap(), b"test");

        let empty = "<DescribeInstanceAttributeResponse><userData/></DescribeInstanceAttributeResponse>";
        assert!(parse_user_data(empty).unwrap().is_empty());
    }

    #[test]
    fn test_parse_attribute_values() {
        let xml = TestFixtures::instance_attribute_xml("ramdisk", "ari-1");
        assert_eq!(parse_ramdisk(&xml).unwrap().as_deref(), Some("ari-1"));
        assert_eq!(parse_kernel(&xml).unwrap(), None);

        let xml = TestFixtures::instance_attribute_xml("disableApiTermination", "true");
        assert!(parse_api_termination_disabled(&xml).unwrap());

        let xml = TestFixtures::instance_attribute_xml("instanceInitiatedShutdownBehavior", "terminate");
        assert_eq!(
            parse_shutdown_behavior(&xml).unwrap(),
            Some(InstanceInitiatedShutdownBehavior::Terminate)
        );

        let xml = TestFixtures::instance_attribute_xml("instanceInitiatedShutdownBehavior", "hibernate");
        assert!(matches!(
            parse_shutdown_behavior(&xml),
            Err(Ec2Error::Response(ResponseError::InvalidResponse { .. }))
        ));
    }

    #[test]
    fn test_parse_block_device_mapping_skips_ephemeral() {
        let devices = parse_block_device_mapping(TestFixtures::block_device_mapping_xml()).unwrap();
        assert_eq!(devices.len(), 1);
        let root = &devices["/dev/sda1"];
        assert_eq!(root.volume_id, "vol-test1");
        assert_eq!(root.status, Some(AttachmentStatus::Attached));
        assert!(root.attach_time.is_some());
        assert!(root.delete_on_termination);
    }

    #[test]
    fn test_parse_console_output() {
        let console = parse_console_output(TestFixtures::console_output_xml()).unwrap();
        assert_eq!(console.instance_id, "i-28a64341");
        assert!(console.timestamp.is_some());
        assert_eq!(console.output, "Linux version 2.6.16-xenU\r\nBooting...");
    }

    #[test]
    fn test_parse_volume_with_attachment() {
        let xml = r#"<DescribeVolumesResponse><volumeSet><item>
            <volumeId>vol-2a21e543</volumeId>
            <size>1</size>
            <snapshotId/>
            <availabilityZone>us-east-1a</availabilityZone>
            <status>in-use</status>
            <createTime>2009-12-28T05:42:53.000Z</createTime>
            <attachmentSet><item>
                <volumeId>vol-2a21e543</volumeId>
                <instanceId>i-6058a509</instanceId>
                <device>/dev/sdh</device>
                <status>attached</status>
            </item></attachmentSet>
        </item></volumeSet></DescribeVolumesResponse>"#;
        let volumes = parse_volumes(xml).unwrap();
        let volume = &volumes[0];
        assert_eq!(volume.size, Some(1));
        assert_eq!(volume.snapshot_id, None);
        assert_eq!(volume.status, Some(VolumeStatus::InUse));
        assert_eq!(volume.attachments[0].status, Some(AttachmentStatus::Attached));
    }

    #[test]
    fn test_parse_security_groups() {
        let xml = r#"<DescribeSecurityGroupsResponse><securityGroupInfo><item>
            <ownerId>UYY3TLBUXIEON5NQVUUX6OMPWBZIQNFM</ownerId>
            <groupName>WebServers</groupName>
            <groupDescription>Web</groupDescription>
            <ipPermissions>
                <item>
                    <ipProtocol>tcp</ipProtocol><fromPort>80</fromPort><toPort>80</toPort>
                    <groups/>
                    <ipRanges><item><cidrIp>0.0.0.0/0</cidrIp></item></ipRanges>
                </item>
                <item>
                    <ipProtocol>tcp</ipProtocol><fromPort>22</fromPort><toPort>22</toPort>
                    <groups><item><userId>123</userId><groupName>admins</groupName></item></groups>
                    <ipRanges/>
                </item>
            </ipPermissions>
        </item></securityGroupInfo></DescribeSecurityGroupsResponse>"#;
        let groups = parse_security_groups(xml).unwrap();
        let permissions = &groups[0].ip_permissions;
        assert_eq!(permissions[0].ip_protocol, Some(IpProtocol::Tcp));
        assert_eq!(permissions[0].ip_ranges, vec!["0.0.0.0/0"]);
        assert_eq!(permissions[1].groups, vec![UserIdGroupPair::new("123", "admins")]);
    }

    #[test]
    fn test_missing_required_field() {
        let xml = "<CreateImageResponse><requestId>x</requestId></CreateImageResponse>";
        assert!(matches!(
            parse_image_id(xml),
            Err(Ec2Error::Response(ResponseError::MissingField { .. }))
        ));
    }
}
