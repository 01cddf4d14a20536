//! Drives one call through resolve, assemble, sign, send and dispatch.

use crate::config::Ec2Config;
use crate::credentials::CredentialsProvider;
use crate::dispatch::{fault_from_response, ResponseDispatcher};
use crate::error::{map_ec2_error, Ec2Error};
use crate::request::{Call, RequestResolver, ResponseKind, UnsignedRequest};
use crate::resilience::RetryPolicy;
use crate::signing::{Clock, FormSigner};
use crate::transport::{HttpResponse, HttpTransport};
use crate::types::Region;
use std::sync::Arc;
use tracing::debug;

/// Shared request pipeline used by every service.
pub struct RequestExecutor {
    resolver: RequestResolver,
    default_region: Option<Region>,
    credentials: Arc<dyn CredentialsProvider>,
    clock: Arc<dyn Clock>,
    transport: Arc<dyn HttpTransport>,
    retry: RetryPolicy,
}

impl RequestExecutor {
    /// Create an executor from configuration and a transport.
    pub fn new(config: &Ec2Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            resolver: RequestResolver::new(config.api_version.clone(), config.endpoints.clone()),
            default_region: config.default_region,
            credentials: config.credentials_provider.clone(),
            clock: config.clock.clone(),
            transport,
            retry: RetryPolicy::new(config.retry.clone()),
        }
    }

    /// The requested region, or the configured default.
    pub fn region(&self, requested: Option<Region>) -> Option<Region> {
        requested.or(self.default_region)
    }

    /// Run a call whose action returns a parsed result.
    pub async fn parsed<T, F>(&self, call: Call<'_>, parse: F) -> Result<T, Ec2Error>
    where
        T: Default,
        F: FnOnce(&str) -> Result<T, Ec2Error>,
    {
        ResponseDispatcher::expect_kind(call.operation().descriptor(), ResponseKind::Parsed)?;
        let (request, response) = self.execute(&call).await?;
        ResponseDispatcher::parsed(request.descriptor(), &response, parse)
    }

    /// Run a call to a void action.
    pub async fn void(&self, call: Call<'_>) -> Result<(), Ec2Error> {
        ResponseDispatcher::expect_kind(call.operation().descriptor(), ResponseKind::Void)?;
        let (request, response) = self.execute(&call).await?;
        ResponseDispatcher::void(request.descriptor(), &response)
    }

    /// Resolve and assemble once, then sign and send with retry.
    ///
    /// Returns the raw response for any status that is not retryable, so the
    /// dispatcher sees faults that a fallback may absorb.
    pub async fn execute(&self, call: &Call<'_>) -> Result<(UnsignedRequest, HttpResponse), Ec2Error> {
        let request = UnsignedRequest::assemble(self.resolver.resolve(call)?)?;
        let response = self.retry.execute(|| self.attempt(&request)).await?;
        Ok((request, response))
    }

    async fn attempt(&self, request: &UnsignedRequest) -> Result<HttpResponse, Ec2Error> {
        let credentials = self.credentials.get_credentials().await?;
        let signed = FormSigner::new(credentials, self.clock.clone())?.sign(request)?;

        let response = self.transport.send(signed.to_http_request()).await?;
        debug!(
            action = request.descriptor().action,
            endpoint = %request.endpoint(),
            status = response.status,
            "EC2 request completed"
        );

        if !response.is_success() {
            let error = map_ec2_error(fault_from_response(&response));
            if error.is_retryable() {
                return Err(error);
            }
        }
        Ok(response)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("resolver", &self.resolver)
            .field("default_region", &self.default_region)
            .field("credentials", &self.credentials.name())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
