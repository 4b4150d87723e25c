//! The remote services the credential exchange talks to.
//!
//! Each service is a trait so the exchange can run against the AWS SDK ([sdk]) or any
//! other transport. Implementations must report a rejected sign-in as
//! [CredentialsError::Authentication] from the call that was rejected, and any
//! other failure as [CredentialsError::Remote].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{CredentialBundle, CredentialsError, TokenPair};

pub mod sdk;

/// The `InitiateAuth` request which starts a `USER_SRP_AUTH` flow.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SrpInitiation {
    pub client_id: String,
    pub username: String,

    /// The client's public SRP value, `SRP_A`.
    pub srp_a: String,

    pub secret_hash: Option<String>,
}

/// The `RespondToAuthChallenge` request answering a `PASSWORD_VERIFIER` challenge.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PasswordVerifierResponse {
    pub client_id: String,

    /// The `USER_ID_FOR_SRP` returned with the challenge, sent back as `USERNAME`.
    pub user_id: String,

    pub session: Option<String>,
    pub password_claim_secret_block: String,
    pub password_claim_signature: String,
    pub timestamp: String,
    pub secret_hash: Option<String>,
}

/// The challenges a user pool may answer an authentication request with.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ChallengeName {
    PasswordVerifier,

    /// The account still has the temporary password it was created with.
    NewPasswordRequired,

    Other(String),
}

impl ChallengeName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ChallengeName::PasswordVerifier => "PASSWORD_VERIFIER",
            ChallengeName::NewPasswordRequired => "NEW_PASSWORD_REQUIRED",
            ChallengeName::Other(name) => name,
        }
    }
}

impl From<&str> for ChallengeName {
    fn from(name: &str) -> Self {
        match name {
            "PASSWORD_VERIFIER" => ChallengeName::PasswordVerifier,
            "NEW_PASSWORD_REQUIRED" => ChallengeName::NewPasswordRequired,
            other => ChallengeName::Other(other.to_string()),
        }
    }
}

/// A challenge issued by the user pool.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AuthChallenge {
    pub name: ChallengeName,
    pub session: Option<String>,
    pub parameters: HashMap<String, String>,
}

/// The outcome of a single authentication request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AuthStep {
    Challenge(AuthChallenge),
    Authenticated(TokenPair),
}

/// The `AssumeRoleWithWebIdentity` request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WebIdentityRoleRequest {
    pub role_arn: String,
    pub role_session_name: String,
    pub web_identity_token: String,
    pub duration_seconds: i32,
}

/// A Cognito user pool, which authenticates users.
#[async_trait]
pub trait UserPool: Send + Sync {
    /// Start a `USER_SRP_AUTH` flow (`InitiateAuth`).
    async fn initiate_srp_auth(&self, request: SrpInitiation) -> Result<AuthStep, CredentialsError>;

    /// Answer the `PASSWORD_VERIFIER` challenge (`RespondToAuthChallenge`).
    async fn respond_to_password_verifier(
        &self,
        request: PasswordVerifierResponse,
    ) -> Result<AuthStep, CredentialsError>;
}

/// A Cognito identity pool, which maps user pool identities to OpenID tokens.
#[async_trait]
pub trait IdentityPool: Send + Sync {
    /// Get an identity ID from the pool (`GetId`).
    async fn get_id(&self, identity_pool_id: &str) -> Result<String, CredentialsError>;

    /// Exchange the provider tokens in `logins` for an OpenID token for the identity
    /// (`GetOpenIdToken`).
    async fn get_open_id_token(
        &self,
        identity_id: &str,
        logins: HashMap<String, String>,
    ) -> Result<String, CredentialsError>;
}

/// The security token service, which issues the temporary credentials of a role.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// Assume a role with the OpenID token of an identity (`AssumeRoleWithWebIdentity`).
    async fn assume_role_with_web_identity(
        &self,
        request: WebIdentityRoleRequest,
    ) -> Result<CredentialBundle, CredentialsError>;
}

#[async_trait]
impl<T: UserPool + ?Sized> UserPool for Arc<T> {
    async fn initiate_srp_auth(&self, request: SrpInitiation) -> Result<AuthStep, CredentialsError> {
        (**self).initiate_srp_auth(request).await
    }

    async fn respond_to_password_verifier(
        &self,
        request: PasswordVerifierResponse,
    ) -> Result<AuthStep, CredentialsError> {
        (**self).respond_to_password_verifier(request).await
    }
}

#[async_trait]
impl<T: IdentityPool + ?Sized> IdentityPool for Arc<T> {
    async fn get_id(&self, identity_pool_id: &str) -> Result<String, CredentialsError> {
        (**self).get_id(identity_pool_id).await
    }

    async fn get_open_id_token(
        &self,
        identity_id: &str,
        logins: HashMap<String, String>,
    ) -> Result<String, CredentialsError> {
        (**self).get_open_id_token(identity_id, logins).await
    }
}

#[async_trait]
impl<T: RoleProvider + ?Sized> RoleProvider for Arc<T> {
    async fn assume_role_with_web_identity(
        &self,
        request: WebIdentityRoleRequest,
    ) -> Result<CredentialBundle, CredentialsError> {
        (**self).assume_role_with_web_identity(request).await
    }
}
