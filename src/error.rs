use thiserror::Error;

/// Boxed source of a failed remote call.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error occurred while exchanging user pool credentials for temporary AWS
/// credentials.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The user pool refused the username and password, or the account still has to
    /// complete its first sign-in.
    #[error(
        "Could not get an identity token from the Cognito user pool ({}). Make sure the user account exists and the password is valid; new accounts must sign in once at {} and replace their temporary password",
        .reason,
        .setup_url.as_deref().unwrap_or("the hosted sign-in page")
    )]
    Authentication {
        reason: String,
        setup_url: Option<String>,
    },

    /// An argument which was provided to the exchanger was invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required configuration value was not set.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// A remote service answered without a value the flow depends on.
    #[error("{operation} response is missing `{field}`")]
    InvalidResponse {
        operation: &'static str,
        field: &'static str,
    },

    /// The user pool issued a challenge this flow cannot answer.
    #[error("Unsupported authentication challenge: {0}")]
    UnsupportedChallenge(String),

    /// The SRP parameters could not be generated from the challenge.
    #[error("SRP error: {0}")]
    Srp(#[from] aws_cognito_srp::SrpError),

    /// The request could not be signed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// A remote call failed.
    #[error("{operation} failed")]
    Remote {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl CredentialsError {
    /// The user pool rejected the sign-in for `reason`.
    pub fn authentication(reason: impl Into<String>) -> Self {
        CredentialsError::Authentication {
            reason: reason.into(),
            setup_url: None,
        }
    }

    /// Wrap the failure of a remote `operation` without altering it.
    pub fn remote(operation: &'static str, source: impl Into<BoxError>) -> Self {
        CredentialsError::Remote {
            operation,
            source: source.into(),
        }
    }

    /// A reply to `operation` that lacks `field`.
    pub fn missing(operation: &'static str, field: &'static str) -> Self {
        CredentialsError::InvalidResponse { operation, field }
    }

    /// Attach the page where users complete their first sign-in to an
    /// authentication error. Other errors are returned unchanged.
    #[must_use]
    pub fn with_setup_url(self, url: Option<&str>) -> Self {
        match self {
            CredentialsError::Authentication { reason, setup_url } => {
                CredentialsError::Authentication {
                    reason,
                    setup_url: url.map(str::to_string).or(setup_url),
                }
            }
            other => other,
        }
    }

    /// Whether the user pool rejected the credentials.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, CredentialsError::Authentication { .. })
    }
}
