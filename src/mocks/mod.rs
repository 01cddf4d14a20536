//! Mock implementations and fixtures for testing.

mod credentials;
mod transport;

pub use credentials::MockCredentialsProvider;
pub use transport::{MockResponse, MockTransport};

use crate::config::Ec2Config;
use crate::credentials::AwsCredentials;
use crate::error::Ec2Error;
use crate::resilience::RetryConfig;
use crate::signing::FixedClock;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Fixtures for EC2 tests.
pub struct TestFixtures;

impl TestFixtures {
    /// Timestamp every fixture config signs with: 2009-11-08T15:54:08.897Z.
    pub fn fixed_clock() -> FixedClock {
        FixedClock::new(
            Utc.with_ymd_and_hms(2009, 11, 8, 15, 54, 8).single().unwrap_or_default()
                + chrono::Duration::milliseconds(897),
        )
    }

    /// Config with a fixed clock, static credentials and fast retries.
    pub fn config(identity: &str, secret: &str, api_version: &str) -> Result<Ec2Config, Ec2Error> {
        Ec2Config::builder()
            .api_version(api_version)
            .credentials_provider(Arc::new(MockCredentialsProvider::with_credentials(
                AwsCredentials::new(identity, secret),
            )))
            .clock(Arc::new(Self::fixed_clock()))
            .retry(
                RetryConfig::new(2)
                    .with_base_delay(Duration::from_millis(1))
                    .with_throttle_delay(Duration::from_millis(1))
                    .with_jitter(false),
            )
            .build()
    }

    /// EC2 fault document.
    pub fn error_xml(code: &str, message: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Errors>
        <Error>
            <Code>{}</Code>
            <Message>{}</Message>
        </Error>
    </Errors>
    <RequestID>test-request-id</RequestID>
</Response>"#,
            code, message
        )
    }

    /// `DescribeImages` response with one EBS-backed and one instance-store image.
    pub fn describe_images_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<DescribeImagesResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <imagesSet>
        <item>
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
        </item>
        <item>
            <imageId>ami-78da3a11</imageId>
            <imageState>available</imageState>
            <imageOwnerId>206029621532</imageOwnerId>
            <isPublic>true</isPublic>
            <architecture>x86_64</architecture>
            <imageType>machine</imageType>
            <name>ebs-image</name>
            <rootDeviceType>ebs</rootDeviceType>
            <rootDeviceName>/dev/sda1</rootDeviceName>
        </item>
    </imagesSet>
</DescribeImagesResponse>"#
    }

    /// `CreateImage` / `RegisterImage` response.
    pub fn image_id_xml(image_id: &str) -> String {
        format!(
            r#"<CreateImageResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    <imageId>{}</imageId>
</CreateImageResponse>"#,
            image_id
        )
    }

    /// `RunInstances` response with two pending instances.
    pub fn run_instances_xml() -> &'static str {
        r#"<RunInstancesResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <reservationId>r-47a5402e</reservationId>
    <ownerId>AIDADH4IGTRXXKCD</ownerId>
    <groupSet><item><groupId>default</groupId></item></groupSet>
    <instancesSet>
        <item>
            <instanceId>i-2ba64342</instanceId>
            <imageId>ami-60a54009</imageId>
            <instanceState><code>0</code><name>pending</name></instanceState>
            <keyName>example-key-name</keyName>
            <amiLaunchIndex>0</amiLaunchIndex>
            <instanceType>m1.small</instanceType>
            <launchTime>2007-08-07T11:51:50.000Z</launchTime>
            <placement><availabilityZone>us-east-1b</availabilityZone></placement>
            <monitoring><state>enabled</state></monitoring>
        </item>
        <item>
            <instanceId>i-2bc64242</instanceId>
            <imageId>ami-60a54009</imageId>
            <instanceState><code>0</code><name>pending</name></instanceState>
            <amiLaunchIndex>1</amiLaunchIndex>
            <instanceType>m1.small</instanceType>
            <placement><availabilityZone>us-east-1b</availabilityZone></placement>
        </item>
    </instancesSet>
</RunInstancesResponse>"#
    }

    /// `TerminateInstances` response.
    pub fn terminate_instances_xml() -> &'static str {
        r#"<TerminateInstancesResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <instancesSet>
        <item>
            <instanceId>i-3ea74257</instanceId>
            <currentState><code>32</code><name>shutting-down</name></currentState>
            <previousState><code>16</code><name>running</name></previousState>
        </item>
    </instancesSet>
</TerminateInstancesResponse>"#
    }

    /// `CreateVolume` response.
    pub fn create_volume_xml() -> &'static str {
        r#"<CreateVolumeResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <volumeId>vol-4d826724</volumeId>
    <size>800</size>
    <snapshotId></snapshotId>
    <availabilityZone>us-east-1a</availabilityZone>
    <status>creating</status>
    <createTime>2008-05-07T11:51:50.000Z</createTime>
</CreateVolumeResponse>"#
    }

    /// `DescribeSnapshots` response.
    pub fn describe_snapshots_xml() -> &'static str {
        r#"<DescribeSnapshotsResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <snapshotSet>
        <item>
            <snapshotId>snap-78a54011</snapshotId>
            <volumeId>vol-4d826724</volumeId>
            <status>pending</status>
            <startTime>2008-05-07T12:51:50.000Z</startTime>
            <progress>80%</progress>
            <ownerId>218213537122</ownerId>
            <volumeSize>10</volumeSize>
            <description>Daily Backup</description>
        </item>
    </snapshotSet>
</DescribeSnapshotsResponse>"#
    }

    /// `DescribeSecurityGroups` response.
    pub fn describe_security_groups_xml() -> &'static str {
        r#"<DescribeSecurityGroupsResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <securityGroupInfo>
        <item>
            <ownerId>UYY3TLBUXIEON5NQVUUX6OMPWBZIQNFM</ownerId>
            <groupName>WebServers</groupName>
            <groupDescription>Web Servers</groupDescription>
            <ipPermissions>
                <item>
                    <ipProtocol>tcp</ipProtocol>
                    <fromPort>80</fromPort>
                    <toPort>80</toPort>
                    <groups/>
                    <ipRanges><item><cidrIp>0.0.0.0/0</cidrIp></item></ipRanges>
                </item>
            </ipPermissions>
        </item>
    </securityGroupInfo>
</DescribeSecurityGroupsResponse>"#
    }

    /// `DescribeInstanceAttribute` response carrying one `<value>`.
    pub fn instance_attribute_xml(attribute: &str, value: &str) -> String {
        format!(
            r#"<DescribeInstanceAttributeResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <instanceId>i-10a64379</instanceId>
    <{0}><value>{1}</value></{0}>
</DescribeInstanceAttributeResponse>"#,
            attribute, value
        )
    }

    /// `DescribeInstanceAttribute` response for `blockDeviceMapping`.
    pub fn block_device_mapping_xml() -> &'static str {
        r#"<DescribeInstanceAttributeResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <instanceId>i-10a64379</instanceId>
    <blockDeviceMapping>
        <item>
            <deviceName>/dev/sda1</deviceName>
            <ebs>
                <volumeId>vol-test1</volumeId>
                <status>attached</status>
                <attachTime>2010-01-01T00:00:00.000Z</attachTime>
                <deleteOnTermination>true</deleteOnTermination>
            </ebs>
        </item>
        <item>
            <deviceName>/dev/sdb</deviceName>
            <virtualName>ephemeral0</virtualName>
        </item>
    </blockDeviceMapping>
</DescribeInstanceAttributeResponse>"#
    }

    /// `GetConsoleOutput` response.
    pub fn console_output_xml() -> &'static str {
        r#"<GetConsoleOutputResponse xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <instanceId>i-28a64341</instanceId>
    <timestamp>2010-10-14T01:12:41.000Z</timestamp>
    <output>TGludXggdmVyc2lvbiAyLjYuMTYteGVuVQ0KQm9vdGluZy4uLg==</output>
</GetConsoleOutputResponse>"#
    }

    /// Successful void action response.
    pub fn return_true_xml(action: &str) -> String {
        format!(
            r#"<{0}Response xmlns="http://ec2.amazonaws.com/doc/2009-11-30/">
    <requestId>7a62c49f-347e-4fc4-9331-6e8eEXAMPLE</requestId>
    <return>true</return>
</{0}Response>"#,
            action
        )
    }
}
