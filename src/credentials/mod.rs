//! AWS credentials used to sign EC2 requests.
//!
//! A [`CredentialsProvider`] is asked for credentials once per request
//! attempt, so providers backed by rotating sources pick up new keys without
//! rebuilding the client.

mod env;

pub use env::EnvCredentialsProvider;

use crate::error::{CredentialsError, Ec2Error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// An access key identity and its secret, optionally temporary.
#[derive(Clone)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: SecretString,
    session_token: Option<SecretString>,
    expiration: Option<DateTime<Utc>>,
}

impl AwsCredentials {
    /// Long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
            session_token: None,
            expiration: None,
        }
    }

    /// Attach a session token; requests then carry `SecurityToken`.
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(SecretString::new(session_token.into()));
        self
    }

    /// Attach an expiry time.
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// The access key identity.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret key. Never log this.
    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    /// The session token, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_ref().map(|s| s.expose_secret().as_str())
    }

    /// The expiry time, if any.
    pub fn expiration(&self) -> Option<&DateTime<Utc>> {
        self.expiration.as_ref()
    }

    /// Whether the expiry time has passed.
    pub fn is_expired(&self) -> bool {
        self.expiration.map_or(false, |exp| Utc::now() >= exp)
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Source of credentials.
#[async_trait]
pub trait CredentialsProvider: Send + Sync + fmt::Debug {
    /// Current credentials.
    async fn get_credentials(&self) -> Result<AwsCredentials, Ec2Error>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Fixed credentials supplied at construction.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: AwsCredentials,
}

impl StaticCredentialsProvider {
    /// Wrap fixed credentials.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, Ec2Error> {
        if self.credentials.is_expired() {
            return Err(Ec2Error::Credentials(CredentialsError::Expired));
        }
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = AwsCredentials::new("AKID", "SECRET").with_session_token("TOKEN");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("SECRET"));
        assert!(!debug.contains("TOKEN"));
    }

    #[test]
    fn test_accessors() {
        let creds = AwsCredentials::new("AKID", "SECRET").with_session_token("TOKEN");
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.secret_access_key(), "SECRET");
        assert_eq!(creds.session_token(), Some("TOKEN"));
        assert!(!creds.is_expired());
    }

    #[tokio::test]
    async fn test_static_provider_rejects_expired() {
        let expired = AwsCredentials::new("AKID", "SECRET")
            .with_expiration(Utc::now() - Duration::minutes(5));
        let provider = StaticCredentialsProvider::new(expired);
        assert!(matches!(
            provider.get_credentials().await,
            Err(Ec2Error::Credentials(CredentialsError::Expired))
        ));

        let provider = StaticCredentialsProvider::new(AwsCredentials::new("AKID", "SECRET"));
        assert_eq!(provider.get_credentials().await.unwrap().access_key_id(), "AKID");
        assert_eq!(provider.name(), "static");
    }
}
