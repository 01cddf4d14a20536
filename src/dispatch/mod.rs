//! Response dispatch.
//!
//! A 2xx response is handed to the action's parser (or discarded for void
//! actions). Anything else is read as an EC2 fault; the action's fallback
//! may absorb it and yield the result type's default, otherwise it becomes
//! a typed [`Ec2Error`]. The dispatcher never retries.

mod fallback;

pub use fallback::Fallback;

use crate::error::{map_ec2_error, Ec2Error, RequestError, ResponseError, ServiceFault};
use crate::request::{OperationDescriptor, ResponseKind};
use crate::transport::HttpResponse;
use crate::xml::parse_error_response;
use tracing::debug;

/// Stateless response dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseDispatcher;

impl ResponseDispatcher {
    /// Dispatch a response for an action with a parsed result.
    pub fn parsed<T, F>(
        descriptor: &OperationDescriptor,
        response: &HttpResponse,
        parse: F,
    ) -> Result<T, Ec2Error>
    where
        T: Default,
        F: FnOnce(&str) -> Result<T, Ec2Error>,
    {
        Self::expect_kind(descriptor, ResponseKind::Parsed)?;
        if response.is_success() {
            return parse(body_text(response)?);
        }
        Self::fault(descriptor, response)
    }

    /// Dispatch a response for a void action.
    pub fn void(descriptor: &OperationDescriptor, response: &HttpResponse) -> Result<(), Ec2Error> {
        Self::expect_kind(descriptor, ResponseKind::Void)?;
        if response.is_success() {
            return Ok(());
        }
        Self::fault(descriptor, response)
    }

    /// Reject dispatching an action as the wrong kind of result.
    pub fn expect_kind(descriptor: &OperationDescriptor, requested: ResponseKind) -> Result<(), Ec2Error> {
        if descriptor.response == requested {
            return Ok(());
        }
        Err(RequestError::ResponseKindMismatch {
            action: descriptor.action.to_string(),
            requested: match requested {
                ResponseKind::Parsed => "parsed",
                ResponseKind::Void => "void",
            },
        }
        .into())
    }

    fn fault<T: Default>(
        descriptor: &OperationDescriptor,
        response: &HttpResponse,
    ) -> Result<T, Ec2Error> {
        let fault = fault_from_response(response);
        if let Some(fallback) = descriptor.fallback {
            if fallback.absorbs(&fault) {
                debug!(
                    action = descriptor.action,
                    code = %fault.code,
                    fallback = fallback.name(),
                    "Fault absorbed by fallback"
                );
                return Ok(T::default());
            }
        }
        Err(map_ec2_error(fault))
    }
}

/// Read the fault carried by a non-2xx response. Bodies that are not an
/// EC2 error document still yield a fault with the HTTP status.
pub fn fault_from_response(response: &HttpResponse) -> ServiceFault {
    let body = String::from_utf8_lossy(&response.body);
    parse_error_response(response.status, &body)
        .unwrap_or_else(|| ServiceFault::from_status(response.status))
}

fn body_text(response: &HttpResponse) -> Result<&str, Ec2Error> {
    std::str::from_utf8(&response.body).map_err(|e| {
        Ec2Error::Response(ResponseError::InvalidResponse {
            message: format!("response body is not UTF-8: {}", e),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::mocks::TestFixtures;
    use crate::request::Ec2Operation;
    use bytes::Bytes;
    use std::collections::HashMap;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_success_is_parsed() {
        let result = ResponseDispatcher::parsed(
            Ec2Operation::DescribeImages.descriptor(),
            &response(200, "<r/>"),
            |body| Ok(vec![body.to_string()]),
        )
        .unwrap();
        assert_eq!(result, vec!["<r/>"]);
    }

    #[test]
    fn test_void_discards_body() {
        let descriptor = Ec2Operation::DeleteVolume.descriptor();
        assert!(ResponseDispatcher::void(descriptor, &response(200, "not xml")).is_ok());
    }

    #[test]
    fn test_volume_available_is_absorbed() {
        let body = TestFixtures::error_xml("IncorrectState", "Volume 'vol-1' is in the 'available' state.");
        let result = ResponseDispatcher::void(
            Ec2Operation::DetachVolume.descriptor(),
            &response(400, &body),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_unabsorbed_fault_keeps_code() {
        let body = TestFixtures::error_xml("InvalidSnapshot.NotFound", "The snapshot 'snap-1' does not exist.");
        let result: Result<Vec<String>, _> = ResponseDispatcher::parsed(
            Ec2Operation::DescribeSnapshots.descriptor(),
            &response(400, &body),
            |_| Ok(Vec::new()),
        );
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), Some("InvalidSnapshot.NotFound"));
        match err {
            Ec2Error::Service(ServiceError::NotFound(fault)) => {
                assert_eq!(fault.message, "The snapshot 'snap-1' does not exist.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_404_yields_empty_set() {
        let result: Vec<String> = ResponseDispatcher::parsed(
            Ec2Operation::DescribeInstances.descriptor(),
            &response(404, ""),
            |_| Ok(vec!["unexpected".to_string()]),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_unparseable_fault_surfaces_status() {
        let err = ResponseDispatcher::void(
            Ec2Operation::DeleteVolume.descriptor(),
            &response(503, "Service Unavailable"),
        )
        .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_operation_without_fallback_surfaces_fault() {
        let body = TestFixtures::error_xml("InvalidGroup.NotFound", "gone");
        let err = ResponseDispatcher::void(
            Ec2Operation::CreateSecurityGroup.descriptor(),
            &response(400, &body),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), Some("InvalidGroup.NotFound"));
    }

    #[test]
    fn test_wrong_response_kind_is_an_error() {
        let err = ResponseDispatcher::void(
            Ec2Operation::DescribeImages.descriptor(),
            &response(200, "<r/>"),
        )
        .unwrap_err();
        match err {
            Ec2Error::Request(RequestError::ResponseKindMismatch { action, requested }) => {
                assert_eq!(action, "DescribeImages");
                assert_eq!(requested, "void");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let result: Result<Vec<String>, _> = ResponseDispatcher::parsed(
            Ec2Operation::DeleteVolume.descriptor(),
            &response(200, "<r/>"),
            |body| Ok(vec![body.to_string()]),
        );
        assert!(matches!(
            result,
            Err(Ec2Error::Request(RequestError::ResponseKindMismatch { .. }))
        ));
    }
}
