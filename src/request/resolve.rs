//! Turns a typed call into an ordered parameter multimap and an endpoint.

use super::operation::{Ec2Operation, EndpointKind, OperationDescriptor};
use super::params::FormParams;
use crate::config::EndpointResolver;
use crate::error::{Ec2Error, RequestError};
use crate::options::FormOptions;
use crate::types::{AvailabilityZone, Region};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use url::Url;

/// Where a call is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointTarget {
    /// A region, or the provider default when `None`.
    Region(Option<Region>),
    /// The region hosting an availability zone.
    Zone(AvailabilityZone),
}

/// A required argument of a call, in declaration order.
#[derive(Debug, Clone)]
enum Binding {
    Value { name: &'static str, value: String },
    Optional { name: &'static str, value: Option<String> },
    List { prefix: &'static str, values: Vec<String>, required: bool },
    Blob { name: &'static str, data: Vec<u8> },
    Rendered { name: &'static str, params: FormParams },
}

/// A typed call to one EC2 action.
#[derive(Debug)]
pub struct Call<'a> {
    operation: Ec2Operation,
    target: EndpointTarget,
    bindings: Vec<Binding>,
    options: Vec<&'a dyn FormOptions>,
}

impl<'a> Call<'a> {
    /// Start a call to the provider default endpoint.
    pub fn new(operation: Ec2Operation) -> Self {
        Self {
            operation,
            target: EndpointTarget::Region(None),
            bindings: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Target a region; `None` selects the provider default.
    pub fn in_region(mut self, region: Option<Region>) -> Self {
        self.target = EndpointTarget::Region(region);
        self
    }

    /// Target the region hosting a zone.
    pub fn in_zone(mut self, zone: AvailabilityZone) -> Self {
        self.target = EndpointTarget::Zone(zone);
        self
    }

    /// A required, non-empty value.
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.bindings.push(Binding::Value {
            name,
            value: value.into(),
        });
        self
    }

    /// A value that contributes nothing when absent.
    pub fn optional_param(mut self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        self.bindings.push(Binding::Optional {
            name,
            value: value.map(Into::into),
        });
        self
    }

    /// A list that must contain at least one value, expanded as `Prefix.N`.
    pub fn list<I, V>(mut self, prefix: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.bindings.push(Binding::List {
            prefix,
            values: values.into_iter().map(Into::into).collect(),
            required: true,
        });
        self
    }

    /// A list that may be empty (e.g. "describe everything").
    pub fn optional_list<I, V>(mut self, prefix: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.bindings.push(Binding::List {
            prefix,
            values: values.into_iter().map(Into::into).collect(),
            required: false,
        });
        self
    }

    /// Binary data, sent base64-encoded.
    pub fn blob(mut self, name: &'static str, data: &[u8]) -> Self {
        self.bindings.push(Binding::Blob {
            name,
            data: data.to_vec(),
        });
        self
    }

    /// Structured entries already rendered as `Name.N.*` pairs. At least
    /// one pair is required; `name` is reported when there are none.
    pub fn rendered(mut self, name: &'static str, params: FormParams) -> Self {
        self.bindings.push(Binding::Rendered { name, params });
        self
    }

    /// Append an options object. Options apply after all required
    /// arguments, left to right.
    pub fn options(mut self, options: &'a dyn FormOptions) -> Self {
        self.options.push(options);
        self
    }

    /// The operation being called.
    pub fn operation(&self) -> Ec2Operation {
        self.operation
    }

    /// The endpoint target.
    pub fn target(&self) -> &EndpointTarget {
        &self.target
    }
}

/// A call resolved to its endpoint and pre-sign parameters.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    /// Static descriptor of the action.
    pub descriptor: &'static OperationDescriptor,
    /// Endpoint URI.
    pub endpoint: Url,
    /// Parameters in pre-sign order.
    pub params: FormParams,
}

/// Resolves calls against the configured API version and endpoints.
#[derive(Debug, Clone)]
pub struct RequestResolver {
    api_version: String,
    endpoints: Arc<dyn EndpointResolver>,
}

impl RequestResolver {
    /// Create a resolver.
    pub fn new(api_version: impl Into<String>, endpoints: Arc<dyn EndpointResolver>) -> Self {
        Self {
            api_version: api_version.into(),
            endpoints,
        }
    }

    /// The API version sent as `Version`.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Resolve a call.
    ///
    /// Parameters are ordered `Version`, `Action`, fixed descriptor
    /// parameters, required bindings, then options. Argument errors are
    /// raised here, before any I/O.
    pub fn resolve(&self, call: &Call<'_>) -> Result<ResolvedRequest, Ec2Error> {
        let descriptor = call.operation.descriptor();

        let region = match (&call.target, descriptor.endpoint) {
            (EndpointTarget::Region(region), EndpointKind::Region) => *region,
            (EndpointTarget::Zone(zone), _) => Some(zone.region()),
            (EndpointTarget::Region(_), EndpointKind::Zone) => {
                return Err(RequestError::Validation {
                    message: format!("{} requires an availability zone", descriptor.action),
                }
                .into());
            }
        };
        let endpoint = self.endpoints.resolve(region)?;

        let mut params = FormParams::new();
        params.push("Version", self.api_version.as_str());
        params.push("Action", descriptor.action);
        for (name, value) in descriptor.fixed_params {
            params.push(*name, *value);
        }

        for binding in &call.bindings {
            match binding {
                Binding::Value { name, value } => {
                    if value.is_empty() {
                        return Err(missing(name));
                    }
                    params.push(*name, value.as_str());
                }
                Binding::Optional { name, value } => {
                    if let Some(value) = value {
                        params.push(*name, value.as_str());
                    }
                }
                Binding::List {
                    prefix,
                    values,
                    required,
                } => {
                    if *required && values.is_empty() {
                        return Err(missing(prefix));
                    }
                    if values.iter().any(String::is_empty) {
                        return Err(missing(prefix));
                    }
                    params.push_indexed(prefix, descriptor.list_base, values.iter().cloned());
                }
                Binding::Blob { name, data } => {
                    params.push(*name, STANDARD.encode(data));
                }
                Binding::Rendered { name, params: rendered } => {
                    if rendered.is_empty() {
                        return Err(missing(name));
                    }
                    params.extend_from(rendered);
                }
            }
        }

        for options in &call.options {
            options.validate()?;
            params.extend_from(options.form_params());
        }

        Ok(ResolvedRequest {
            descriptor,
            endpoint,
            params,
        })
    }
}

fn missing(name: &str) -> Ec2Error {
    RequestError::MissingParameter {
        name: name.to_string(),
    }
    .into()
}
