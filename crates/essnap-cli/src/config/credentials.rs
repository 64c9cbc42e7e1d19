//! AWS credentials configuration.

use clap::Args;
use essnap_snapshot::{
    AwsCredentials, CredentialProvider, EnvironmentCredentials, Result, StaticCredentials,
};

/// Explicit AWS credentials.
///
/// When both keys are given they are used for every request. Otherwise
/// credentials are read from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`
/// and `AWS_SESSION_TOKEN` each time a request is signed.
#[derive(Clone, Default, Args)]
pub struct CredentialsConfig {
    /// AWS access key id (defaults to `AWS_ACCESS_KEY_ID` at request time)
    #[arg(long = "aws-access-key-id", requires = "aws_secret_access_key")]
    pub aws_access_key_id: Option<String>,

    /// AWS secret access key (defaults to `AWS_SECRET_ACCESS_KEY` at request time)
    #[arg(long = "aws-secret-access-key", requires = "aws_access_key_id")]
    pub aws_secret_access_key: Option<String>,

    /// AWS session token for temporary credentials
    #[arg(long = "aws-session-token", requires = "aws_access_key_id")]
    pub aws_session_token: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("explicit", &self.is_explicit())
            .finish_non_exhaustive()
    }
}

impl CredentialsConfig {
    /// Returns whether explicit keys were given.
    pub fn is_explicit(&self) -> bool {
        self.aws_access_key_id.is_some() && self.aws_secret_access_key.is_some()
    }

    /// Returns the credential provider for this configuration.
    pub fn provider(&self) -> CliCredentials {
        match (&self.aws_access_key_id, &self.aws_secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => {
                let credentials = AwsCredentials::new(access_key_id, secret_access_key);
                let credentials = match &self.aws_session_token {
                    Some(token) => credentials.with_session_token(token),
                    None => credentials,
                };
                CliCredentials::Static(StaticCredentials::new(credentials))
            }
            _ => CliCredentials::Environment(EnvironmentCredentials),
        }
    }
}

/// Credential provider selected on the command line.
#[derive(Debug, Clone)]
pub enum CliCredentials {
    /// Keys passed as flags.
    Static(StaticCredentials),
    /// Keys read from the environment on every request.
    Environment(EnvironmentCredentials),
}

impl CredentialProvider for CliCredentials {
    fn credentials(&self) -> Result<AwsCredentials> {
        match self {
            Self::Static(provider) => provider.credentials(),
            Self::Environment(provider) => provider.credentials(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_credentials() {
        let config = CredentialsConfig {
            aws_access_key_id: Some("AKIATEST".to_owned()),
            aws_secret_access_key: Some("secret".to_owned()),
            aws_session_token: Some("token".to_owned()),
        };

        let provider = config.provider();
        assert!(matches!(provider, CliCredentials::Static(_)));

        let credentials = provider.credentials().unwrap();
        assert_eq!(credentials.access_key_id, "AKIATEST");
        assert_eq!(credentials.secret_access_key, "secret");
        assert_eq!(credentials.session_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_environment_credentials_by_default() {
        let config = CredentialsConfig::default();

        assert!(!config.is_explicit());
        assert!(matches!(config.provider(), CliCredentials::Environment(_)));
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = CredentialsConfig {
            aws_access_key_id: Some("AKIATEST".to_owned()),
            aws_secret_access_key: Some("very-secret".to_owned()),
            aws_session_token: None,
        };

        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("AKIATEST"));
    }
}
