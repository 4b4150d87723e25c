use std::fmt;

use aws_config::SdkConfig;
use chrono::{DateTime, Duration, Utc};
use log::info;

pub use signer::RequestSigner;

use crate::constant::DEFAULT_DURATION_SECONDS;
use crate::service::sdk::{self, SdkIdentityPool, SdkRoleProvider, SdkUserPool};
use crate::service::{IdentityPool, RoleProvider, UserPool};
use crate::{CredentialsError, EnvironmentConfig};

mod identity;
mod signer;
mod user;

/// The tokens issued by the user pool after a successful sign-in.
///
/// Only the ID token is needed to continue the exchange; the refresh token is
/// returned for callers which want to keep the session alive themselves.
#[derive(Clone, Eq, PartialEq)]
pub struct TokenPair {
    pub id_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("id_token", &"** redacted **")
            .field("refresh_token", &"** redacted **")
            .finish()
    }
}

/// Temporary AWS credentials for the assumed role.
///
/// The credentials are valid until `expiration` and are never renewed.
#[derive(Clone, Eq, PartialEq)]
pub struct CredentialBundle {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
}

impl CredentialBundle {
    /// Whether the credentials have expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration <= now
    }

    /// How long the credentials remain valid after `now` (zero once expired).
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expiration - now).max(Duration::zero())
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl From<&CredentialBundle> for aws_credential_types::Credentials {
    fn from(bundle: &CredentialBundle) -> Self {
        aws_credential_types::Credentials::new(
            &bundle.access_key_id,
            &bundle.secret_access_key,
            Some(bundle.session_token.clone()),
            Some(bundle.expiration.into()),
            "CognitoIdentityPool",
        )
    }
}

/// Exchanges the username and password of a user pool user for temporary AWS
/// credentials.
///
/// The exchange is three sequential steps, none of them retried:
/// 1. [CredentialExchanger::authenticate] - SRP sign-in against the user pool, giving
///    an ID token.
/// 2. The identity pool exchanges the ID token for an OpenID token.
/// 3. STS issues credentials for the configured role against the OpenID token.
///
/// Nothing is cached between calls; every call performs the full exchange.
pub struct CredentialExchanger {
    config: EnvironmentConfig,
    user_pool: Box<dyn UserPool>,
    identity_pool: Box<dyn IdentityPool>,
    role_provider: Box<dyn RoleProvider>,
}

impl CredentialExchanger {
    /// Create an exchanger which talks to the given services.
    #[must_use]
    pub fn new(
        config: EnvironmentConfig,
        user_pool: impl UserPool + 'static,
        identity_pool: impl IdentityPool + 'static,
        role_provider: impl RoleProvider + 'static,
    ) -> Self {
        Self {
            config,
            user_pool: Box::new(user_pool),
            identity_pool: Box::new(identity_pool),
            role_provider: Box::new(role_provider),
        }
    }

    /// Create an exchanger backed by the AWS SDK, using a shared SDK configuration.
    #[must_use]
    pub fn from_sdk_config(config: EnvironmentConfig, sdk_config: &SdkConfig) -> Self {
        Self::new(
            config,
            SdkUserPool::new(sdk_config),
            SdkIdentityPool::new(sdk_config),
            SdkRoleProvider::new(sdk_config),
        )
    }

    /// Create an exchanger backed by the AWS SDK in the configured region.
    pub async fn connect(config: EnvironmentConfig) -> Self {
        let sdk_config = sdk::load_config(&config.aws_region).await;

        Self::from_sdk_config(config, &sdk_config)
    }

    #[must_use]
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Sign in to the user pool with SRP.
    ///
    /// ## Errors
    ///
    /// Returns [CredentialsError::Authentication] if the user does not exist, the
    /// password is wrong, or the account has not yet replaced its temporary password.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, CredentialsError> {
        user::authenticate(&self.config, self.user_pool.as_ref(), username, password)
            .await
            .map_err(|err| err.with_setup_url(self.config.password_setup_url.as_deref()))
    }

    /// Exchange a user pool ID token for temporary credentials of the configured role,
    /// valid for `duration_seconds`.
    ///
    /// ## Errors
    ///
    /// Returns [CredentialsError::InvalidArgument] if the duration is outside what STS
    /// accepts, otherwise the failure of the first remote call which failed.
    pub async fn exchange_for_temporary_credentials(
        &self,
        id_token: &str,
        duration_seconds: i32,
    ) -> Result<CredentialBundle, CredentialsError> {
        identity::exchange(
            &self.config,
            self.identity_pool.as_ref(),
            self.role_provider.as_ref(),
            id_token,
            duration_seconds,
        )
        .await
    }

    /// Sign in and exchange the resulting ID token for temporary credentials.
    ///
    /// ## Errors
    ///
    /// See [CredentialExchanger::authenticate] and
    /// [CredentialExchanger::exchange_for_temporary_credentials].
    pub async fn get_temporary_credentials(
        &self,
        username: &str,
        password: &str,
        duration_seconds: i32,
    ) -> Result<CredentialBundle, CredentialsError> {
        identity::check_duration(duration_seconds)?;

        let tokens = self.authenticate(username, password).await?;

        let credentials = self
            .exchange_for_temporary_credentials(&tokens.id_token, duration_seconds)
            .await?;

        info!(username = username, expiration = credentials.expiration.to_rfc3339().as_str(); "Obtained temporary credentials");

        Ok(credentials)
    }

    /// [CredentialExchanger::get_temporary_credentials] for one hour.
    ///
    /// ## Errors
    ///
    /// See [CredentialExchanger::get_temporary_credentials].
    pub async fn get_default_temporary_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialBundle, CredentialsError> {
        self.get_temporary_credentials(username, password, DEFAULT_DURATION_SECONDS)
            .await
    }

    /// Build a signer for requests to `service_name` on `hostname`, in the exchanger's
    /// region. No request is made.
    #[must_use]
    pub fn build_signer(
        &self,
        credentials: &CredentialBundle,
        hostname: &str,
        service_name: &str,
    ) -> RequestSigner {
        RequestSigner::new(
            credentials.clone(),
            &self.config.aws_region,
            hostname,
            service_name,
        )
    }
}

impl fmt::Debug for CredentialExchanger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialExchanger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
