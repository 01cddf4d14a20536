//! Builds the unsigned HTTP request for a resolved call.

use super::params::{EncodingProfile, FormParams};
use super::resolve::ResolvedRequest;
use super::operation::OperationDescriptor;
use crate::error::{ConfigurationError, Ec2Error};
use url::Url;

/// Content type of every EC2 query request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request ready for signing.
///
/// The body is always the form encoding of the parameters, and
/// `Content-Length` is always the body's byte length; neither can be set
/// independently.
#[derive(Debug, Clone)]
pub struct UnsignedRequest {
    descriptor: &'static OperationDescriptor,
    endpoint: Url,
    host: String,
    params: FormParams,
    body: String,
}

impl UnsignedRequest {
    /// Assemble a resolved call.
    pub fn assemble(resolved: ResolvedRequest) -> Result<Self, Ec2Error> {
        let host = host_header(&resolved.endpoint)?;
        let body = resolved.params.encode(EncodingProfile::Form);
        Ok(Self {
            descriptor: resolved.descriptor,
            endpoint: resolved.endpoint,
            host,
            params: resolved.params,
            body,
        })
    }

    /// Static descriptor of the action.
    pub fn descriptor(&self) -> &'static OperationDescriptor {
        self.descriptor
    }

    /// HTTP verb.
    pub fn method(&self) -> &'static str {
        self.descriptor.method
    }

    /// Endpoint URI.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Value of the `Host` header.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Request path, `/` when the endpoint has none.
    pub fn path(&self) -> &str {
        match self.endpoint.path() {
            "" => "/",
            path => path,
        }
    }

    /// Parameters in pre-sign order.
    pub fn params(&self) -> &FormParams {
        &self.params
    }

    /// Form-encoded body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Body length in bytes.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// `Content-Type`, `Host` and `Content-Length`.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", FORM_CONTENT_TYPE.to_string()),
            ("Host", self.host.clone()),
            ("Content-Length", self.content_length().to_string()),
        ]
    }
}

/// `host[:port]` of an endpoint, lowercased. Default ports are omitted.
fn host_header(endpoint: &Url) -> Result<String, Ec2Error> {
    let host = endpoint
        .host_str()
        .ok_or_else(|| ConfigurationError::InvalidEndpoint {
            url: endpoint.to_string(),
        })?
        .to_ascii_lowercase();
    Ok(match endpoint.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
