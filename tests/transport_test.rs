//! End-to-end tests against a local HTTP server.

use aws_ec2::mocks::{MockCredentialsProvider, TestFixtures};
use aws_ec2::resilience::RetryConfig;
use aws_ec2::{
    AwsCredentials, DescribeImagesOptions, Ec2Client, Ec2ClientBuilder, Ec2ClientImpl, Ec2Config, FormParams,
    Region,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Ec2ClientImpl {
    let config = Ec2Config::builder()
        .endpoint(server.uri())
        .unwrap()
        .credentials_provider(Arc::new(MockCredentialsProvider::with_credentials(AwsCredentials::new(
            "user", "key",
        ))))
        .clock(Arc::new(TestFixtures::fixed_clock()))
        .retry(
            RetryConfig::new(2)
                .with_base_delay(Duration::from_millis(1))
                .with_throttle_delay(Duration::from_millis(1))
                .with_jitter(false),
        )
        .build()
        .unwrap();
    Ec2ClientBuilder::new().config(config).build().unwrap()
}

#[tokio::test]
async fn test_signed_form_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("Action=DescribeImages"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TestFixtures::describe_images_xml()))
        .expect(1)
        .mount(&server)
        .await;

    let images = client(&server)
        .amis()
        .describe_images(Some(Region::UsWest1), DescribeImagesOptions::new().owned_by(["self"]))
        .await
        .unwrap();
    assert_eq!(images.len(), 2);

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    let params = FormParams::from_encoded(&body);
    assert_eq!(params.get("Owner.1"), Some("self"));
    assert_eq!(params.get("SignatureVersion"), Some("2"));
    assert_eq!(params.get("SignatureMethod"), Some("HmacSHA256"));
    assert_eq!(params.get("Timestamp"), Some("2009-11-08T15:54:08.897Z"));
    assert!(params.contains("Signature"));
}

#[tokio::test]
async fn test_server_error_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string(TestFixtures::error_xml("Unavailable", "try again")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TestFixtures::return_true_xml("DeleteVolume")))
        .mount(&server)
        .await;

    client(&server)
        .elastic_block_store()
        .delete_volume(None, "vol-1")
        .await
        .unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_fault_body_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(TestFixtures::error_xml("AuthFailure", "bad key")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .key_pairs()
        .delete_key_pair(None, "gsg")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), Some("AuthFailure"));
    assert_eq!(err.request_id(), Some("test-request-id"));
}
