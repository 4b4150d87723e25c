#![crate_name = "cognito_credentials"]

//! # Cognito credentials
//!
//! Exchange the username and password of an AWS Cognito user pool user for temporary
//! AWS credentials, and sign requests to AWS services with them.
//!
//! The exchange is three sequential calls:
//! 1. An SRP sign-in against the user pool ([InitiateAuth](https://docs.aws.amazon.com/cognito-user-identity-pools/latest/APIReference/API_InitiateAuth.html)
//!    with `USER_SRP_AUTH`, then [RespondToAuthChallenge](https://docs.aws.amazon.com/cognito-user-identity-pools/latest/APIReference/API_RespondToAuthChallenge.html)
//!    for the `PASSWORD_VERIFIER` challenge), which issues an ID token. The SRP parameters
//!    are generated by the [`aws-cognito-srp`](https://crates.io/crates/aws-cognito-srp) crate,
//!    so the password itself is never sent.
//! 2. The identity pool exchanges the ID token for an OpenID token (`GetId` and
//!    `GetOpenIdToken`).
//! 3. STS issues credentials for an IAM role against the OpenID token
//!    (`AssumeRoleWithWebIdentity`).
//!
//! Every call performs the whole exchange once. Nothing is retried, cached or refreshed.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! cognito-credentials = "0.1.0"
//! ```
//!
//! ### Temporary credentials
//!
//! ```no_run
//! use cognito_credentials::{CredentialExchanger, CredentialsError, Environment, EnvironmentConfig};
//!
//! # async fn run() -> Result<(), CredentialsError> {
//! // Reads `TEST_AWS_REGION`, `TEST_USER_POOL_ID`, `TEST_CLIENT_ID`, ... from the
//! // environment (or a `.env` file).
//! let config = EnvironmentConfig::from_env(Environment::Test)?;
//!
//! let exchanger = CredentialExchanger::connect(config).await;
//!
//! let credentials = exchanger
//!     .get_temporary_credentials("<username>", "<password>", 3600)
//!     .await?;
//!
//! println!("Expires at {}", credentials.expiration);
//! # Ok(())
//! # }
//! ```
//!
//! A rejected sign-in (unknown user, wrong password, or an account which still has its
//! temporary password) is always reported as [CredentialsError::Authentication], whose
//! message tells the user how to fix their account.
//!
//! ### Signing requests
//!
//! ```no_run
//! # use cognito_credentials::{CredentialBundle, CredentialExchanger, CredentialsError};
//! # fn run(exchanger: &CredentialExchanger, credentials: &CredentialBundle) -> Result<(), CredentialsError> {
//! let signer = exchanger.build_signer(
//!     credentials,
//!     "abc123.execute-api.us-east-1.amazonaws.com",
//!     "execute-api",
//! );
//!
//! // Add these headers to the request with any HTTP client.
//! let headers = signer.sign("GET", "/prod/metrics", &[], b"")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Each deployment (`dev`, `test` or `prod`) is configured with variables prefixed with
//! its upper-case name. See `.env.example` for the full list.
//!
//! ## Testing
//!
//! The remote services are reached through the [UserPool], [IdentityPool] and
//! [RoleProvider] traits, so the whole exchange can be exercised against in-memory
//! implementations:
//! ```sh
//! cargo test
//! ```

#[macro_use]
extern crate lazy_static;

pub use crate::client::{CredentialBundle, CredentialExchanger, RequestSigner, TokenPair};
pub use crate::config::{Environment, EnvironmentConfig};
pub use crate::constant::{
    DEFAULT_DURATION_SECONDS, DEFAULT_ROLE_SESSION_NAME, MAX_DURATION_SECONDS,
    MIN_DURATION_SECONDS,
};
pub use crate::error::{BoxError, CredentialsError};
pub use crate::service::{IdentityPool, RoleProvider, UserPool};

mod client;
mod config;
mod constant;
mod error;
pub mod service;
