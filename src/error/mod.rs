//! Error types for the EC2 integration.
//!
//! Errors are grouped by the pipeline stage that produced them: configuration,
//! credentials, argument validation, signing, transport, service faults and
//! response parsing. Service faults always keep the EC2 error code and message
//! exactly as the service sent them.

mod mapping;

pub use mapping::{map_ec2_error, ServiceFault};

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the EC2 integration.
#[derive(Debug, Error)]
pub enum Ec2Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Credential-related errors.
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Request signing errors.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Invalid call arguments, raised before any I/O.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Network and transport errors.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Faults returned by the EC2 service.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Response parsing errors.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl Ec2Error {
    /// Returns true if the error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Ec2Error::Network(e) => e.is_retryable(),
            Ec2Error::Service(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if EC2 throttled the request.
    pub fn is_throttling(&self) -> bool {
        matches!(self, Ec2Error::Service(ServiceError::Throttling(_)))
    }

    /// Returns the HTTP status code if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Ec2Error::Service(e) => Some(e.fault().status),
            Ec2Error::Request(_) => Some(400),
            _ => None,
        }
    }

    /// Returns the EC2 error code (e.g. `InvalidSnapshot.NotFound`) if the
    /// error came from the service.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Ec2Error::Service(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Ec2Error::Service(e) => e.fault().request_id.as_deref(),
            _ => None,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing access key identity or secret.
    #[error("Missing credentials: both an access key id and a secret key are required")]
    MissingCredentials,

    /// Invalid endpoint URL.
    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint {
        /// The invalid URL.
        url: String,
    },

    /// No endpoint is known for the requested region.
    #[error("No endpoint configured for region '{region}'")]
    UnknownEndpoint {
        /// The region without an endpoint.
        region: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },
}

/// Credential-related errors.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// Credentials not found in the configured source.
    #[error("Credentials not found: {message}")]
    NotFound {
        /// Where the lookup happened.
        message: String,
    },

    /// Credentials are present but unusable.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
    },

    /// Credentials have expired.
    #[error("Credentials expired")]
    Expired,
}

/// Signing errors.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The HMAC key could not be used.
    #[error("Invalid signing key: {message}")]
    InvalidKey {
        /// Description of the problem.
        message: String,
    },
}

/// Argument errors detected while resolving a call.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required argument was empty.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Wire name of the parameter.
        name: String,
    },

    /// The region string is not a known region.
    #[error("Invalid region: {value}")]
    InvalidRegion {
        /// The rejected value.
        value: String,
    },

    /// The availability zone string is malformed.
    #[error("Invalid availability zone: {value}")]
    InvalidZone {
        /// The rejected value.
        value: String,
    },

    /// Any other argument validation failure.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the problem.
        message: String,
    },

    /// A void action was run for a parsed result, or the reverse.
    #[error("{action} does not return a {requested} result")]
    ResponseKindMismatch {
        /// Wire action.
        action: String,
        /// The kind the caller asked for.
        requested: &'static str,
    },
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection failed.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// Request timed out.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// Elapsed time.
        duration: Duration,
    },

    /// Connection was reset mid-request.
    #[error("Connection reset")]
    ConnectionReset,

    /// Any other transport failure.
    #[error("Transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },
}

impl NetworkError {
    /// Returns true if the error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::ConnectionReset => true,
            NetworkError::Transport { .. } => false,
        }
    }
}

/// Faults returned by the EC2 service, categorised by error code.
///
/// Every variant carries the full [`ServiceFault`], so the original code and
/// message are never lost by the categorisation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced resource does not exist (`*.NotFound`).
    #[error("{0}")]
    NotFound(ServiceFault),

    /// The resource already exists (`*.Duplicate`, `*.InUse`).
    #[error("{0}")]
    AlreadyExists(ServiceFault),

    /// The resource is not in a state that allows the action.
    #[error("{0}")]
    InvalidState(ServiceFault),

    /// Authentication or authorization failed.
    #[error("{0}")]
    AuthFailure(ServiceFault),

    /// Request was throttled.
    #[error("{0}")]
    Throttling(ServiceFault),

    /// Server-side failure.
    #[error("{0}")]
    Server(ServiceFault),

    /// Any other client-side fault.
    #[error("{0}")]
    Client(ServiceFault),
}

impl ServiceError {
    /// The underlying fault.
    pub fn fault(&self) -> &ServiceFault {
        match self {
            ServiceError::NotFound(f)
            | ServiceError::AlreadyExists(f)
            | ServiceError::InvalidState(f)
            | ServiceError::AuthFailure(f)
            | ServiceError::Throttling(f)
            | ServiceError::Server(f)
            | ServiceError::Client(f) => f,
        }
    }

    /// The EC2 error code, verbatim.
    pub fn code(&self) -> &str {
        &self.fault().code
    }

    /// The EC2 error message, verbatim.
    pub fn message(&self) -> &str {
        &self.fault().message
    }

    /// Returns true if the fault is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Throttling(_) | ServiceError::Server(_) => true,
            ServiceError::Client(f) => f.code == "RequestExpired",
            _ => false,
        }
    }
}

/// Response parsing errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// XML parsing failed.
    #[error("XML parse error: {message}")]
    XmlParseError {
        /// Error message.
        message: String,
    },

    /// Response body was not valid UTF-8 or otherwise unusable.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },

    /// Missing required element.
    #[error("Missing element in response: {field}")]
    MissingField {
        /// Element name.
        field: String,
    },
}
