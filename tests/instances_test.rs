//! Integration tests for InstanceService.

use aws_ec2::mocks::{MockResponse, MockTransport, TestFixtures};
use aws_ec2::{
    AvailabilityZone, BlockDevice, Ec2Client, Ec2ClientBuilder, Ec2ClientImpl, Ec2Error, FormParams,
    InstanceInitiatedShutdownBehavior, InstanceState, InstanceType, Region, RequestError, RunInstancesOptions,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn client(transport: Arc<MockTransport>) -> Ec2ClientImpl {
    Ec2ClientBuilder::new()
        .config(TestFixtures::config("user", "key", "2009-11-30").unwrap())
        .transport(transport)
        .build()
        .unwrap()
}

fn signing_client(transport: Arc<MockTransport>) -> Ec2ClientImpl {
    Ec2ClientBuilder::new()
        .config(TestFixtures::config("identity", "credential", "2010-06-15").unwrap())
        .transport(transport)
        .build()
        .unwrap()
}

fn last_params(transport: &MockTransport) -> FormParams {
    FormParams::from_encoded(transport.last_request().unwrap().body_str())
}

#[tokio::test]
async fn test_run_instances() {
    let transport = Arc::new(MockTransport::with_responses([MockResponse::ok(
        TestFixtures::run_instances_xml(),
    )]));
    let zone = AvailabilityZone::new("us-east-1b").unwrap();
    let reservation = client(transport.clone())
        .instances()
        .run_instances(
            None,
            Some(zone),
            "ami-60a54009",
            1,
            2,
            RunInstancesOptions::new()
                .with_key_name("example-key-name")
                .with_security_groups(["default", "web"])
                .as_type(InstanceType::M1Small)
                .enable_monitoring(),
        )
        .await
        .unwrap();

    assert_eq!(reservation.reservation_id, "r-47a5402e");
    assert_eq!(reservation.instances.len(), 2);
    assert_eq!(reservation.instances[0].state, Some(InstanceState::Pending));
    assert!(reservation.instances[0].monitoring);

    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "https://ec2.us-east-1.amazonaws.com/");
    let params = last_params(&transport);
    assert_eq!(params.get("MinCount"), Some("1"));
    assert_eq!(params.get("MaxCount"), Some("2"));
    assert_eq!(params.get("Placement.AvailabilityZone"), Some("us-east-1b"));
    assert_eq!(params.get("SecurityGroup.2"), Some("web"));
    assert_eq!(params.get("InstanceType"), Some("m1.small"));
    assert_eq!(params.get("Monitoring.Enabled"), Some("true"));
}

#[tokio::test]
async fn test_run_instances_rejects_bad_counts() {
    let transport = Arc::new(MockTransport::new());
    let err = client(transport.clone())
        .instances()
        .run_instances(None, None, "ami-1", 3, 2, RunInstancesOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Ec2Error::Request(_)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_terminate_instances_is_zero_based() {
    let transport = Arc::new(MockTransport::with_responses([MockResponse::ok(
        TestFixtures::terminate_instances_xml(),
    )]));
    let changes = client(transport.clone())
        .instances()
        .terminate_instances(Some(Region::UsWest1), ["i-3ea74257", "i-3ea74258"])
        .await
        .unwrap();

    assert_eq!(changes[0].current_state, Some(InstanceState::ShuttingDown));
    assert_eq!(changes[0].previous_state, Some(InstanceState::Running));
    let params = last_params(&transport);
    assert_eq!(params.get("InstanceId.0"), Some("i-3ea74257"));
    assert_eq!(params.get("InstanceId.1"), Some("i-3ea74258"));
    assert!(!params.contains("InstanceId.2"));
}

#[tokio::test]
async fn test_stop_instances_is_one_based() {
    let transport = Arc::new(MockTransport::with_responses([MockResponse::ok(
        TestFixtures::terminate_instances_xml(),
    )]));
    client(transport.clone())
        .instances()
        .stop_instances(None, true, ["i-1"])
        .await
        .unwrap();

    let params = last_params(&transport);
    assert_eq!(params.get("InstanceId.1"), Some("i-1"));
    assert_eq!(params.get("Force"), Some("true"));
}

#[tokio::test]
async fn test_user_data_round_trip_encoding() {
    let transport = Arc::new(MockTransport::with_responses([
        MockResponse::ok(TestFixtures::return_true_xml("ModifyInstanceAttribute")),
        MockResponse::ok(
            "<DescribeInstanceAttributeResponse><instanceId>i-1</instanceId>\
             <userData><value>aGVsbG8=</value></userData></DescribeInstanceAttributeResponse>",
        ),
    ]));
    let client = client(transport.clone());
    client.instances().set_user_data(None, "i-1", b"hello").await.unwrap();

    let params = last_params(&transport);
    assert_eq!(params.get("Attribute"), Some("userData"));
    assert_eq!(params.get("Value"), Some("aGVsbG8="));

    let data = client.instances().get_user_data(None, "i-1").await.unwrap();
    assert_eq!(data, b"hello");
}

#[tokio::test]
async fn test_describe_instances_404_yields_empty() {
    let transport = Arc::new(MockTransport::with_responses([MockResponse::error(404, "Not Found")]));
    let reservations = client(transport)
        .instances()
        .describe_instances(None, Vec::<String>::new())
        .await
        .unwrap();
    assert!(reservations.is_empty());
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let transport = Arc::new(MockTransport::with_responses([
        MockResponse::error(500, TestFixtures::error_xml("InternalError", "oops")),
        MockResponse::ConnectionReset,
        MockResponse::ok(TestFixtures::return_true_xml("RebootInstances")),
    ]));
    client(transport.clone())
        .instances()
        .reboot_instances(None, ["i-1"])
        .await
        .unwrap();
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_run_instances_rejects_zone_outside_region() {
    let transport = Arc::new(MockTransport::new());
    let zone = AvailabilityZone::new("eu-west-1a").unwrap();
    let result = client(transport.clone())
        .instances()
        .run_instances(Some(Region::UsEast1), Some(zone), "ami-1", 1, 1, RunInstancesOptions::new())
        .await;
    assert!(matches!(result, Err(Ec2Error::Request(RequestError::Validation { .. }))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_modify_instance_attributes_known_signatures() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::ok(
        TestFixtures::return_true_xml("ModifyInstanceAttribute"),
    )));
    let ec2 = signing_client(transport.clone());
    let instances = ec2.instances();
    let region = Some(Region::UsEast1);

    instances.set_user_data(region, "1", b"test").await.unwrap();
    assert_eq!(
        last_params(&transport).get("Signature"),
        Some("LfUmzLM5DsACR5nQcEfGF5FPdznOwwhJ7tjhBWfHtGs=")
    );

    instances.set_ramdisk(region, "1", "test").await.unwrap();
    let params = last_params(&transport);
    assert_eq!(params.get("Attribute"), Some("ramdisk"));
    assert_eq!(params.get("Value"), Some("test"));
    assert_eq!(params.get("Signature"), Some("qx6NeVbihiYrKvi5Oe5LzMsGHTjS7+qoNhh2abt275g="));

    instances.set_kernel(region, "1", "test").await.unwrap();
    assert_eq!(
        last_params(&transport).get("Signature"),
        Some("juSiuoiXJzTxj3q0LUW2528HzDyP4JAcKin+I4AuIT0=")
    );

    instances.set_api_termination_disabled(region, "1", true).await.unwrap();
    assert_eq!(
        last_params(&transport).get("Signature"),
        Some("tiBMWWTi22BWeAjsRfuzVom0tQgsOBeYTkatMuWRrbg=")
    );

    instances.set_instance_type(region, "1", InstanceType::C1Medium).await.unwrap();
    assert_eq!(
        last_params(&transport).get("Signature"),
        Some("XK+zQmQ0S57gXIgVRMqUkKunURN9TaCJD1YWiYMAOHo=")
    );

    instances
        .set_shutdown_behavior(region, "1", InstanceInitiatedShutdownBehavior::Terminate)
        .await
        .unwrap();
    assert_eq!(
        last_params(&transport).get("Signature"),
        Some("s5xBMLd+XNVp44x7C6qVE58qBov//f6yvxoM757KcZU=")
    );
}

#[tokio::test]
async fn test_describe_instance_attributes() {
    let transport = Arc::new(MockTransport::with_responses([
        MockResponse::ok(TestFixtures::instance_attribute_xml("rootDeviceName", "/dev/sda1")),
        MockResponse::ok(TestFixtures::instance_attribute_xml("kernel", "aki-1")),
        MockResponse::ok(TestFixtures::instance_attribute_xml("instanceType", "m1.large")),
        MockResponse::ok(TestFixtures::instance_attribute_xml("disableApiTermination", "false")),
        MockResponse::ok(TestFixtures::instance_attribute_xml("instanceInitiatedShutdownBehavior", "stop")),
    ]));
    let ec2 = client(transport.clone());
    let instances = ec2.instances();

    assert_eq!(
        instances.get_root_device_name(None, "1").await.unwrap().as_deref(),
        Some("/dev/sda1")
    );
    assert_eq!(last_params(&transport).get("Attribute"), Some("rootDeviceName"));
    assert_eq!(instances.get_kernel(None, "1").await.unwrap().as_deref(), Some("aki-1"));
    assert_eq!(instances.get_instance_type(None, "1").await.unwrap().as_deref(), Some("m1.large"));
    assert!(!instances.is_api_termination_disabled(None, "1").await.unwrap());
    assert_eq!(
        instances.get_shutdown_behavior(None, "1").await.unwrap(),
        Some(InstanceInitiatedShutdownBehavior::Stop)
    );

    let params = last_params(&transport);
    assert_eq!(params.get("Action"), Some("DescribeInstanceAttribute"));
    assert_eq!(params.get("Attribute"), Some("instanceInitiatedShutdownBehavior"));
    assert_eq!(params.get("InstanceId"), Some("1"));
}

#[tokio::test]
async fn test_reset_ramdisk_and_kernel() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::ok(
        TestFixtures::return_true_xml("ResetInstanceAttribute"),
    )));
    let ec2 = client(transport.clone());
    let instances = ec2.instances();

    instances.reset_ramdisk(None, "1").await.unwrap();
    let params = last_params(&transport);
    assert_eq!(params.get("Action"), Some("ResetInstanceAttribute"));
    assert_eq!(params.get("Attribute"), Some("ramdisk"));

    instances.reset_kernel(None, "1").await.unwrap();
    assert_eq!(last_params(&transport).get("Attribute"), Some("kernel"));
}

#[tokio::test]
async fn test_block_device_mapping_round_trip() {
    let transport = Arc::new(MockTransport::with_responses([
        MockResponse::ok(TestFixtures::return_true_xml("ModifyInstanceAttribute")),
        MockResponse::ok(TestFixtures::block_device_mapping_xml()),
    ]));
    let ec2 = signing_client(transport.clone());
    let instances = ec2.instances();

    let mut devices = BTreeMap::new();
    devices.insert("/dev/sda1".to_string(), BlockDevice::new("vol-test1", true));
    instances
        .set_block_device_mapping(Some(Region::UsEast1), "1", &devices)
        .await
        .unwrap();

    let params = last_params(&transport);
    assert_eq!(params.get("Action"), Some("ModifyInstanceAttribute"));
    assert!(!params.contains("Attribute"));
    assert_eq!(params.get("BlockDeviceMapping.1.DeviceName"), Some("/dev/sda1"));
    assert_eq!(params.get("BlockDeviceMapping.1.Ebs.VolumeId"), Some("vol-test1"));
    assert_eq!(params.get("BlockDeviceMapping.1.Ebs.DeleteOnTermination"), Some("true"));
    assert_eq!(params.get("Signature"), Some("RwY8lVPHSQxQkd5efUKccHdSTkN4OxMIMFiYAe3rrUE="));

    let described = instances
        .get_block_device_mapping(Some(Region::UsEast1), "1")
        .await
        .unwrap();
    assert_eq!(described["/dev/sda1"].volume_id, "vol-test1");
    assert!(described["/dev/sda1"].delete_on_termination);
}

#[tokio::test]
async fn test_empty_block_device_mapping_is_rejected() {
    let transport = Arc::new(MockTransport::new());
    let result = client(transport.clone())
        .instances()
        .set_block_device_mapping(None, "1", &BTreeMap::new())
        .await;
    assert!(matches!(
        result,
        Err(Ec2Error::Request(RequestError::MissingParameter { .. }))
    ));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_get_console_output() {
    let transport = Arc::new(MockTransport::with_responses([MockResponse::ok(
        TestFixtures::console_output_xml(),
    )]));
    let console = signing_client(transport.clone())
        .instances()
        .get_console_output(Some(Region::UsEast1), "1")
        .await
        .unwrap();

    assert_eq!(console.instance_id, "i-28a64341");
    assert!(console.output.starts_with("Linux version"));
    let params = last_params(&transport);
    assert_eq!(params.get("Action"), Some("GetConsoleOutput"));
    assert_eq!(params.get("Signature"), Some("XGzVI0TZ8BWRO+bt6VwMwzh6IHbSA2dwL/77CmwZIrU="));
}
