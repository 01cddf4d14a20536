//! Credentials read from environment variables.

use super::{AwsCredentials, CredentialsProvider};
use crate::error::{CredentialsError, Ec2Error};
use async_trait::async_trait;
use std::env;

const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
/// `AWS_SESSION_TOKEN` on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentialsProvider {
    access_key_var: String,
    secret_key_var: String,
    session_token_var: String,
}

impl EnvCredentialsProvider {
    /// Provider using the standard variable names.
    pub fn new() -> Self {
        Self::with_var_names(AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN)
    }

    /// Provider using custom variable names.
    pub fn with_var_names(
        access_key_var: impl Into<String>,
        secret_key_var: impl Into<String>,
        session_token_var: impl Into<String>,
    ) -> Self {
        Self {
            access_key_var: access_key_var.into(),
            secret_key_var: secret_key_var.into(),
            session_token_var: session_token_var.into(),
        }
    }

    fn read(&self) -> Result<AwsCredentials, CredentialsError> {
        let access_key_id = required(&self.access_key_var)?;
        let secret_access_key = required(&self.secret_key_var)?;

        let credentials = AwsCredentials::new(access_key_id, secret_access_key);
        Ok(match env::var(&self.session_token_var) {
            Ok(token) if !token.is_empty() => credentials.with_session_token(token),
            _ => credentials,
        })
    }
}

fn required(name: &str) -> Result<String, CredentialsError> {
    match env::var(name) {
        Ok(value) if value.is_empty() => Err(CredentialsError::Invalid {
            message: format!("{} is empty", name),
        }),
        Ok(value) => Ok(value),
        Err(_) => Err(CredentialsError::NotFound {
            message: format!("{} not set", name),
        }),
    }
}

impl Default for EnvCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, Ec2Error> {
        Ok(self.read()?)
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}
