//! Mapping from EC2 fault responses to typed errors.

use super::*;
use std::fmt;

/// A fault returned by the EC2 service.
///
/// EC2 reports faults as
/// `<Response><Errors><Error><Code/><Message/></Error></Errors><RequestID/></Response>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFault {
    /// HTTP status of the response.
    pub status: u16,
    /// EC2 error code (e.g. `InvalidGroup.NotFound`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// AWS request ID.
    pub request_id: Option<String>,
}

impl ServiceFault {
    /// A fault for a response whose body carried no parseable error document.
    pub fn from_status(status: u16) -> Self {
        Self {
            status,
            code: format!("Http{}", status),
            message: String::new(),
            request_id: None,
        }
    }
}

impl fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {}): {}", self.code, self.status, self.message)?;
        if let Some(id) = &self.request_id {
            write!(f, " [request id {}]", id)?;
        }
        Ok(())
    }
}

/// Map an EC2 fault to a typed error.
///
/// The category is chosen from the error code first and the HTTP status
/// second; the fault itself is carried unchanged.
pub fn map_ec2_error(fault: ServiceFault) -> Ec2Error {
    let code = fault.code.clone();

    let error = match code.as_str() {
        "AuthFailure" | "UnauthorizedOperation" | "InvalidClientTokenId"
        | "SignatureDoesNotMatch" | "OptInRequired" | "Blocked" => ServiceError::AuthFailure(fault),

        "RequestLimitExceeded" | "Throttling" => ServiceError::Throttling(fault),

        "InternalError" | "Unavailable" | "ServiceUnavailable" | "InsufficientInstanceCapacity" => {
            ServiceError::Server(fault)
        }

        "IncorrectState" | "IncorrectInstanceState" | "InvalidState" => {
            ServiceError::InvalidState(fault)
        }

        c if c.ends_with(".NotFound") => ServiceError::NotFound(fault),

        c if c.ends_with(".Duplicate") || c.ends_with(".InUse") => {
            ServiceError::AlreadyExists(fault)
        }

        _ => match fault.status {
            404 => ServiceError::NotFound(fault),
            401 | 403 => ServiceError::AuthFailure(fault),
            409 => ServiceError::AlreadyExists(fault),
            s if s >= 500 => ServiceError::Server(fault),
            _ => ServiceError::Client(fault),
        },
    };

    Ec2Error::Service(error)
}
