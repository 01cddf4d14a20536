//! Mock HTTP transport for testing.

use crate::error::{Ec2Error, NetworkError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Canned outcome for one mock exchange.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// An HTTP response with any status.
    Http {
        /// HTTP status code.
        status: u16,
        /// Response headers.
        headers: HashMap<String, String>,
        /// Response body.
        body: Bytes,
    },
    /// A transport failure; nothing reaches the server.
    ConnectionReset,
}

impl MockResponse {
    /// A 200 response with this body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::Http {
            status: 200,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// A non-2xx response with this body.
    pub fn error(status: u16, body: impl Into<Bytes>) -> Self {
        Self::Http {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header. Has no effect on `ConnectionReset`.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Http { headers, .. } = &mut self {
            headers.insert(key.into(), value.into());
        }
        self
    }
}

/// Transport that records requests and replays queued responses in order.
///
/// When the queue is empty the default response is used, or a connection
/// failure is returned if there is none.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

impl MockTransport {
    /// Create a mock transport with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Create a mock transport that always answers with `response`.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::default()
        }
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        self.responses.lock().push_back(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Ec2Error> {
        self.requests.lock().push(request);

        let next = self
            .responses
            .lock()
            .pop_front()
            .or_else(|| self.default_response.clone());

        match next {
            Some(MockResponse::Http {
                status,
                headers,
                body,
            }) => Ok(HttpResponse {
                status,
                headers,
                body,
            }),
            Some(MockResponse::ConnectionReset) => {
                Err(Ec2Error::Network(NetworkError::ConnectionReset))
            }
            None => Err(Ec2Error::Network(NetworkError::ConnectionFailed {
                message: "No mock response available".to_string(),
            })),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued_responses", &self.responses.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_default() {
        let transport = MockTransport {
            default_response: Some(MockResponse::ok("default")),
            ..MockTransport::with_responses([
                MockResponse::ok("first"),
                MockResponse::error(404, "").with_header("x-amzn-requestid", "r-1"),
            ])
        };

        let first = transport.send(HttpRequest::new("POST", "https://ec2.amazonaws.com/")).await.unwrap();
        assert_eq!(first.body, Bytes::from("first"));
        let second = transport.send(HttpRequest::new("POST", "https://ec2.amazonaws.com/")).await.unwrap();
        assert_eq!(second.status, 404);
        assert_eq!(second.get_header("X-Amzn-RequestId"), Some("r-1"));
        let third = transport.send(HttpRequest::new("POST", "https://ec2.amazonaws.com/")).await.unwrap();
        assert_eq!(third.body, Bytes::from("default"));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_records_request_and_fails_when_exhausted() {
        let transport = MockTransport::new();
        let request = HttpRequest::new("POST", "https://ec2.amazonaws.com/").with_body("Action=DescribeImages");
        assert!(transport.send(request).await.is_err());
        assert_eq!(transport.last_request().unwrap().body_str(), "Action=DescribeImages");
    }

    #[tokio::test]
    async fn test_connection_reset_is_retryable() {
        let transport = MockTransport::with_responses([MockResponse::ConnectionReset]);
        let err = transport
            .send(HttpRequest::new("POST", "https://ec2.amazonaws.com/"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
