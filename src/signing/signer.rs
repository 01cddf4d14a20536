//! Signature version 2 signer for form-encoded requests.

use super::*;
use crate::credentials::AwsCredentials;
use crate::error::{ConfigurationError, Ec2Error};
use crate::request::{EncodingProfile, FormParams, UnsignedRequest, FORM_CONTENT_TYPE};
use crate::transport::HttpRequest;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::trace;
use url::Url;

/// A signed request ready to be sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    method: &'static str,
    endpoint: Url,
    host: String,
    params: FormParams,
    body: String,
}

impl SignedRequest {
    /// HTTP verb.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Endpoint URI.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Value of the `Host` header.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Parameters in wire order: `Action` first, `AWSAccessKeyId` last,
    /// everything else sorted by name.
    pub fn params(&self) -> &FormParams {
        &self.params
    }

    /// RFC 3986 encoded body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The `Signature` value.
    pub fn signature(&self) -> Option<&str> {
        self.params.get(param::SIGNATURE)
    }

    /// Body length in bytes.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Convert into a transport request.
    pub fn to_http_request(&self) -> HttpRequest {
        HttpRequest::new(self.method, self.endpoint.as_str())
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_header("Host", self.host.as_str())
            .with_header("Content-Length", self.content_length().to_string())
            .with_body(self.body.clone().into_bytes())
    }
}

/// Signs requests with one set of credentials.
///
/// Holds only immutable state; each call to [`FormSigner::sign`] is a pure
/// function of the request, the credentials and the clock reading.
#[derive(Debug, Clone)]
pub struct FormSigner {
    credentials: AwsCredentials,
    clock: Arc<dyn Clock>,
}

impl FormSigner {
    /// Create a signer. Fails if the access key id or secret is empty.
    pub fn new(credentials: AwsCredentials, clock: Arc<dyn Clock>) -> Result<Self, Ec2Error> {
        if credentials.access_key_id().is_empty() || credentials.secret_access_key().is_empty() {
            return Err(ConfigurationError::MissingCredentials.into());
        }
        Ok(Self { credentials, clock })
    }

    /// The access key id requests are signed for.
    pub fn access_key_id(&self) -> &str {
        self.credentials.access_key_id()
    }

    /// Sign a request using the API version already carried in its
    /// parameters.
    pub fn sign(&self, request: &UnsignedRequest) -> Result<SignedRequest, Ec2Error> {
        let version = request.params().get(param::VERSION).map(str::to_string);
        self.sign_with_version(request, version.as_deref())
    }

    /// Sign a request, setting `Version` when given. Existing parameters
    /// with the same names are replaced.
    pub fn sign_with_version(
        &self,
        request: &UnsignedRequest,
        version: Option<&str>,
    ) -> Result<SignedRequest, Ec2Error> {
        let mut params = request.params().clone();
        params.remove(param::SIGNATURE);
        params.set(param::ACCESS_KEY_ID, self.credentials.access_key_id());
        params.set(param::SIGNATURE_VERSION, SIGNATURE_VERSION);
        params.set(param::SIGNATURE_METHOD, SIGNATURE_METHOD);
        params.set(param::TIMESTAMP, format_timestamp(&self.clock.now()));
        if let Some(version) = version {
            params.set(param::VERSION, version);
        }
        match self.credentials.session_token() {
            Some(token) => params.set(param::SECURITY_TOKEN, token),
            None => params.remove(param::SECURITY_TOKEN),
        }

        params.sort_by_name();
        let to_sign = string_to_sign(request.method(), request.host(), request.path(), &params);
        let mac = hmac_sha256(
            self.credentials.secret_access_key().as_bytes(),
            to_sign.as_bytes(),
        )?;
        params.push(param::SIGNATURE, STANDARD.encode(mac));

        params.sort_by_name();
        params.move_to_front(param::ACTION);
        params.move_to_back(param::ACCESS_KEY_ID);
        let body = params.encode(EncodingProfile::Rfc3986);

        trace!(
            action = request.descriptor().action,
            host = request.host(),
            param_count = params.len(),
            "Signed request"
        );

        Ok(SignedRequest {
            method: request.method(),
            endpoint: request.endpoint().clone(),
            host: request.host().to_string(),
            params,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegionEndpoints;
    use crate::request::{Call, Ec2Operation, RequestResolver};
    use crate::types::Region;

    fn signer(identity: &str, secret: &str) -> FormSigner {
        let clock = FixedClock::from_rfc3339("2009-11-08T15:54:08.897Z").unwrap();
        FormSigner::new(AwsCredentials::new(identity, secret), Arc::new(clock)).unwrap()
    }

    fn describe_images(version: &str, region: Option<Region>) -> UnsignedRequest {
        let resolver = RequestResolver::new(version, Arc::new(RegionEndpoints::aws().unwrap()));
        let call = Call::new(Ec2Operation::DescribeImages).in_region(region);
        UnsignedRequest::assemble(resolver.resolve(&call).unwrap()).unwrap()
    }

    #[test]
    fn test_known_signature() {
        let signed = signer("user", "key").sign(&describe_images("2009-11-30", None)).unwrap();
        assert_eq!(
            signed.signature(),
            Some("z1UAagWh+ypA+R66ZAOvJJm5uQcBzGDVcbVeMilfioU=")
        );
        assert_eq!(
            signed.body(),
            "Action=DescribeImages\
             &Signature=z1UAagWh%2BypA%2BR66ZAOvJJm5uQcBzGDVcbVeMilfioU%3D\
             &SignatureMethod=HmacSHA256&SignatureVersion=2\
             &Timestamp=2009-11-08T15%3A54%3A08.897Z&Version=2009-11-30\
             &AWSAccessKeyId=user"
        );
        assert_eq!(signed.content_length(), signed.body().len());
    }

    #[test]
    fn test_version_is_replaced_not_duplicated() {
        let request = describe_images("2009-08-15", None);
        let signed = signer("user", "key")
            .sign_with_version(&request, Some("2009-11-30"))
            .unwrap();
        assert_eq!(signed.params().get_all("Version"), vec!["2009-11-30"]);
        assert_eq!(
            signed.signature(),
            Some("z1UAagWh+ypA+R66ZAOvJJm5uQcBzGDVcbVeMilfioU=")
        );
    }

    #[test]
    fn test_signature_depends_on_host() {
        let signed = signer("user", "key")
            .sign(&describe_images("2009-11-30", Some(Region::UsEast1)))
            .unwrap();
        assert_eq!(
            signed.signature(),
            Some("suf/FsMzCLAVewBbJ7ZBvBISXQMLVYhgusJpRppWSTY=")
        );
        assert!(signed.body().contains("Signature=suf%2FFsMz"));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let request = describe_images("2009-11-30", None);
        let signer = signer("user", "key");
        let first = signer.sign(&request).unwrap();
        let second = signer.sign(&request).unwrap();
        assert_eq!(first.body(), second.body());
    }

    #[test]
    fn test_session_token_is_signed() {
        let clock = FixedClock::from_rfc3339("2009-11-08T15:54:08.897Z").unwrap();
        let credentials = AwsCredentials::new("user", "key").with_session_token("token");
        let signer = FormSigner::new(credentials, Arc::new(clock)).unwrap();
        let signed = signer.sign(&describe_images("2009-11-30", None)).unwrap();
        assert_eq!(signed.params().get("SecurityToken"), Some("token"));
        assert_ne!(
            signed.signature(),
            Some("z1UAagWh+ypA+R66ZAOvJJm5uQcBzGDVcbVeMilfioU=")
        );
    }

    #[test]
    fn test_missing_credentials_rejected_at_construction() {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        assert!(matches!(
            FormSigner::new(AwsCredentials::new("", "key"), clock.clone()),
            Err(Ec2Error::Configuration(ConfigurationError::MissingCredentials))
        ));
        assert!(matches!(
            FormSigner::new(AwsCredentials::new("user", ""), clock),
            Err(Ec2Error::Configuration(ConfigurationError::MissingCredentials))
        ));
    }

    #[test]
    fn test_http_request_headers() {
        let signed = signer("user", "key").sign(&describe_images("2009-11-30", None)).unwrap();
        let http = signed.to_http_request();
        assert_eq!(http.method, "POST");
        assert_eq!(http.url, "https://ec2.amazonaws.com/");
        assert_eq!(http.get_header("host"), Some("ec2.amazonaws.com"));
        assert_eq!(
            http.get_header("Content-Length"),
            Some(signed.content_length().to_string().as_str())
        );
    }
}
