//! AWS EC2 Integration Module
//!
//! Typed client for the Amazon EC2 query API: builds form-encoded requests,
//! signs them with AWS signature version 2 (HmacSHA256) and maps XML
//! responses and faults to Rust types.
//!
//! # Features
//!
//! - **Operation registry**: every action is a static descriptor (wire name,
//!   fixed parameters, endpoint kind, list base index, fallback)
//! - **Signature V2**: deterministic signing with an injectable clock
//! - **Fallbacks**: per-action absorption of expected faults
//! - **Resilience**: re-signed retries with exponential backoff
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aws_ec2::{DescribeImagesOptions, Ec2Client, Region};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aws_ec2::Ec2Error> {
//!     // Create client from environment
//!     let client = aws_ec2::create_client_from_env()?;
//!
//!     let images = client
//!         .amis()
//!         .describe_images(
//!             Some(Region::UsEast1),
//!             DescribeImagesOptions::new().owned_by(["amazon"]),
//!         )
//!         .await?;
//!
//!     for image in images {
//!         println!("{} {:?}", image.image_id, image.name);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod mocks;
pub mod options;
pub mod request;
pub mod resilience;
pub mod services;
pub mod signing;
pub mod transport;
pub mod types;
pub mod xml;

// Re-export main types at crate root
pub use client::{Ec2Client, Ec2ClientBuilder, Ec2ClientImpl, RequestExecutor};
pub use config::{Ec2Config, Ec2ConfigBuilder, EndpointResolver, RegionEndpoints};
pub use credentials::{
    AwsCredentials, CredentialsProvider, EnvCredentialsProvider, StaticCredentialsProvider,
};
pub use dispatch::{Fallback, ResponseDispatcher};
pub use error::{
    ConfigurationError, CredentialsError, Ec2Error, NetworkError, RequestError, ResponseError,
    ServiceError, ServiceFault, SigningError,
};
pub use options::{
    CreateImageOptions, CreateSnapshotOptions, DescribeImagesOptions, DescribeSnapshotsOptions,
    DetachVolumeOptions, FormOptions, RegisterImageBackedByEbsOptions, RegisterImageOptions,
    RunInstancesOptions,
};
pub use request::{Call, Ec2Operation, FormParams, RequestResolver, UnsignedRequest};
pub use services::{
    AmiService, ElasticBlockStoreService, ElasticIpService, InstanceService, KeyPairService,
    SecurityGroupService,
};
pub use signing::{Clock, FixedClock, FormSigner, SignedRequest, SystemClock};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
pub use types::{
    // Value types
    Architecture,
    AvailabilityZone,
    BlockDeviceMapping,
    ImageType,
    InstanceInitiatedShutdownBehavior,
    InstanceState,
    InstanceType,
    IpProtocol,
    Region,
    RootDeviceType,
    // Result types
    Attachment,
    BlockDevice,
    ConsoleOutput,
    Image,
    InstanceStateChange,
    IpPermission,
    KeyPair,
    Permission,
    PublicIpInstanceIdPair,
    Reservation,
    RunningInstance,
    SecurityGroup,
    Snapshot,
    UserIdGroupPair,
    Volume,
};

/// Create a new EC2 client from environment variables.
///
/// This will attempt to read configuration from:
/// - `AWS_REGION` / `AWS_DEFAULT_REGION` for the default region
/// - `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` for credentials
/// - `AWS_SESSION_TOKEN` for temporary credentials
/// - `AWS_ENDPOINT_URL_EC2` / `AWS_ENDPOINT_URL` for a custom endpoint
///
/// # Example
///
/// ```rust,no_run
/// let client = aws_ec2::create_client_from_env()?;
/// # Ok::<(), aws_ec2::Ec2Error>(())
/// ```
pub fn create_client_from_env() -> Result<impl Ec2Client> {
    Ec2ClientBuilder::new().from_env().build()
}

/// Create a new EC2 client with explicit configuration.
///
/// # Example
///
/// ```rust,no_run
/// use aws_ec2::{AwsCredentials, Ec2Config, Region, StaticCredentialsProvider};
/// use std::sync::Arc;
///
/// let config = Ec2Config::builder()
///     .region(Region::UsWest2)
///     .credentials_provider(Arc::new(StaticCredentialsProvider::new(
///         AwsCredentials::new("AKID", "SECRET"),
///     )))
///     .build()?;
///
/// let client = aws_ec2::create_client(config)?;
/// # Ok::<(), aws_ec2::Ec2Error>(())
/// ```
pub fn create_client(config: Ec2Config) -> Result<impl Ec2Client> {
    Ec2ClientBuilder::new().config(config).build()
}

/// Result type alias for EC2 operations.
pub type Result<T> = std::result::Result<T, Ec2Error>;
