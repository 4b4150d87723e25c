use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::constant::{DEFAULT_ROLE_SESSION_NAME, IDENTITY_POOL_ID, REGION, ROLE_ARN, USER_POOL_ID};
use crate::CredentialsError;

/// The deployment an [EnvironmentConfig] is read for.
///
/// Each environment reads its own set of variables, prefixed with the upper-case
/// environment name (`DEV_`, `TEST_` or `PROD_`).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Environment {
    Dev,
    Test,
    Prod,
}

impl Environment {
    /// The prefix shared by every variable of the environment.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Test => "TEST",
            Environment::Prod => "PROD",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix().to_lowercase())
    }
}

impl FromStr for Environment {
    type Err = CredentialsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "test" => Ok(Environment::Test),
            "prod" => Ok(Environment::Prod),
            other => Err(CredentialsError::InvalidArgument(format!(
                "Unknown environment '{other}', expected one of dev, test or prod"
            ))),
        }
    }
}

/// The AWS resources of one deployment: the user pool users sign in to, the
/// identity pool and role their temporary credentials come from, and the bucket
/// those credentials are used against.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EnvironmentConfig {
    /// The region of the user pool, identity pool and bucket. For example: `us-east-1`.
    pub aws_region: String,

    /// The ID of the AWS Cognito User Pool, in the form `<region>_<pool id>`.
    pub user_pool_id: String,

    /// The app client users authenticate through.
    pub client_id: String,

    /// The app client secret, if the app client was created with one.
    pub client_secret: Option<String>,

    /// The identity pool, in the form `<region>:<uuid>`.
    pub identity_pool_id: String,

    /// The IAM role assumed with the identity pool's OpenID token.
    pub role_arn: String,

    pub role_session_name: String,

    pub bucket_name: Option<String>,

    /// Where new users sign in for the first time to replace their temporary
    /// password.
    pub password_setup_url: Option<String>,
}

impl EnvironmentConfig {
    /// Read the configuration of `environment` from the process environment, after
    /// loading a `.env` file from the working directory (or its parents) if one
    /// exists.
    ///
    /// ## Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_env(environment: Environment) -> Result<Self, CredentialsError> {
        match dotenvy::dotenv() {
            Ok(path) => {
                let path = path.display().to_string();
                debug!(path = path.as_str(); "Loaded .env file");
            }
            Err(err) if err.not_found() => {}
            Err(err) => {
                return Err(CredentialsError::InvalidArgument(format!(
                    "Could not load .env file: {err}"
                )))
            }
        }

        Self::from_lookup(environment, |key| std::env::var(key).ok())
    }

    /// Build the configuration of `environment` from `lookup`, which maps a variable
    /// name to its value.
    ///
    /// ## Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = environment.prefix();

        let optional = |name: &str| {
            lookup(&format!("{prefix}_{name}"))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &str| {
            optional(name).ok_or_else(|| {
                CredentialsError::MissingConfiguration(format!("{prefix}_{name} is not set"))
            })
        };

        let config = Self {
            aws_region: required("AWS_REGION")?,
            user_pool_id: required("USER_POOL_ID")?,
            client_id: required("CLIENT_ID")?,
            client_secret: optional("CLIENT_SECRET"),
            identity_pool_id: required("IDENTITY_POOL_ID")?,
            role_arn: required("ROLE_ARN")?,
            role_session_name: optional("ROLE_SESSION_NAME")
                .unwrap_or_else(|| DEFAULT_ROLE_SESSION_NAME.to_string()),
            bucket_name: optional("BUCKET_NAME"),
            password_setup_url: optional("PASSWORD_SETUP_URL"),
        };

        config.validate()?;

        Ok(config)
    }

    /// Check the format of the region, pool IDs and role ARN.
    ///
    /// ## Errors
    ///
    /// Returns an [CredentialsError::InvalidArgument] naming the first malformed value.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        let checks = [
            (&*REGION, &self.aws_region, "region", "`us-east-1`"),
            (
                &*USER_POOL_ID,
                &self.user_pool_id,
                "user pool ID",
                "`<region>_<pool id>`",
            ),
            (
                &*IDENTITY_POOL_ID,
                &self.identity_pool_id,
                "identity pool ID",
                "`<region>:<uuid>`",
            ),
            (
                &*ROLE_ARN,
                &self.role_arn,
                "role ARN",
                "`arn:aws:iam::<account>:role/<name>`",
            ),
        ];

        for (pattern, value, name, expected) in checks {
            if !pattern.is_match(value) {
                return Err(CredentialsError::InvalidArgument(format!(
                    "Invalid {name} '{value}', must be in the form {expected}"
                )));
            }
        }

        if self.client_id.is_empty() {
            return Err(CredentialsError::InvalidArgument(
                "The app client ID must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// The provider name the identity pool expects in `Logins` for tokens issued by the
    /// user pool.
    ///
    /// Format is: `cognito-idp.<region>.amazonaws.com/<user pool id>`
    #[must_use]
    pub fn login_provider(&self) -> String {
        format!(
            "cognito-idp.{}.amazonaws.com/{}",
            self.aws_region, self.user_pool_id
        )
    }
}
