//! The remote services, backed by the AWS SDK.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cognitoidentityprovider::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_cognitoidentityprovider::operation::initiate_auth::InitiateAuthError;
use aws_sdk_cognitoidentityprovider::operation::respond_to_auth_challenge::RespondToAuthChallengeError;
use aws_sdk_cognitoidentityprovider::types::{
    AuthFlowType, AuthenticationResultType, ChallengeNameType,
};
use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::service::{
    AuthChallenge, AuthStep, ChallengeName, IdentityPool, PasswordVerifierResponse,
    RoleProvider, SrpInitiation, UserPool, WebIdentityRoleRequest,
};
use crate::{CredentialBundle, CredentialsError, TokenPair};

/// Load the shared SDK configuration for `region`.
///
/// None of the calls in the exchange are signed, so no credentials are resolved from the
/// environment.
pub async fn load_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .no_credentials()
        .load()
        .await
}

/// A user pool reached through `aws-sdk-cognitoidentityprovider`.
#[derive(Debug, Clone)]
pub struct SdkUserPool {
    client: aws_sdk_cognitoidentityprovider::Client,
}

impl SdkUserPool {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self::from_client(aws_sdk_cognitoidentityprovider::Client::new(config))
    }

    #[must_use]
    pub fn from_client(client: aws_sdk_cognitoidentityprovider::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserPool for SdkUserPool {
    async fn initiate_srp_auth(&self, request: SrpInitiation) -> Result<AuthStep, CredentialsError> {
        let mut builder = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserSrpAuth)
            .client_id(request.client_id)
            .auth_parameters("USERNAME", request.username)
            .auth_parameters("SRP_A", request.srp_a);

        if let Some(secret_hash) = request.secret_hash {
            builder = builder.auth_parameters("SECRET_HASH", secret_hash);
        }

        let response = builder.send().await.map_err(initiate_auth_error)?;

        auth_step(
            "InitiateAuth",
            response.challenge_name(),
            response.session(),
            response.challenge_parameters(),
            response.authentication_result(),
        )
    }

    async fn respond_to_password_verifier(
        &self,
        request: PasswordVerifierResponse,
    ) -> Result<AuthStep, CredentialsError> {
        let mut builder = self
            .client
            .respond_to_auth_challenge()
            .challenge_name(ChallengeNameType::PasswordVerifier)
            .set_session(request.session)
            .client_id(request.client_id)
            .challenge_responses("USERNAME", request.user_id)
            .challenge_responses(
                "PASSWORD_CLAIM_SECRET_BLOCK",
                request.password_claim_secret_block,
            )
            .challenge_responses("PASSWORD_CLAIM_SIGNATURE", request.password_claim_signature)
            .challenge_responses("TIMESTAMP", request.timestamp);

        if let Some(secret_hash) = request.secret_hash {
            builder = builder.challenge_responses("SECRET_HASH", secret_hash);
        }

        let response = builder.send().await.map_err(respond_to_auth_challenge_error)?;

        auth_step(
            "RespondToAuthChallenge",
            response.challenge_name(),
            response.session(),
            response.challenge_parameters(),
            response.authentication_result(),
        )
    }
}

fn initiate_auth_error(err: SdkError<InitiateAuthError>) -> CredentialsError {
    let rejection = err
        .as_service_error()
        .filter(|e| e.is_not_authorized_exception() || e.is_user_not_found_exception())
        .map(|e| e.message().unwrap_or("sign-in rejected").to_string());

    match rejection {
        Some(reason) => CredentialsError::authentication(reason),
        None => CredentialsError::remote("InitiateAuth", err),
    }
}

fn respond_to_auth_challenge_error(err: SdkError<RespondToAuthChallengeError>) -> CredentialsError {
    let rejection = err
        .as_service_error()
        .filter(|e| e.is_not_authorized_exception() || e.is_user_not_found_exception())
        .map(|e| e.message().unwrap_or("sign-in rejected").to_string());

    match rejection {
        Some(reason) => CredentialsError::authentication(reason),
        None => CredentialsError::remote("RespondToAuthChallenge", err),
    }
}

fn auth_step(
    operation: &'static str,
    challenge_name: Option<&ChallengeNameType>,
    session: Option<&str>,
    parameters: Option<&HashMap<String, String>>,
    result: Option<&AuthenticationResultType>,
) -> Result<AuthStep, CredentialsError> {
    if let Some(result) = result {
        let id_token = result
            .id_token()
            .ok_or_else(|| CredentialsError::missing(operation, "IdToken"))?;
        let refresh_token = result
            .refresh_token()
            .ok_or_else(|| CredentialsError::missing(operation, "RefreshToken"))?;

        return Ok(AuthStep::Authenticated(TokenPair {
            id_token: id_token.to_string(),
            refresh_token: refresh_token.to_string(),
        }));
    }

    let name = challenge_name.ok_or_else(|| CredentialsError::missing(operation, "ChallengeName"))?;

    debug!(operation = operation, challenge = name.as_str(); "User pool issued a challenge");

    Ok(AuthStep::Challenge(AuthChallenge {
        name: ChallengeName::from(name.as_str()),
        session: session.map(str::to_string),
        parameters: parameters.cloned().unwrap_or_default(),
    }))
}

/// An identity pool reached through `aws-sdk-cognitoidentity`.
#[derive(Debug, Clone)]
pub struct SdkIdentityPool {
    client: aws_sdk_cognitoidentity::Client,
}

impl SdkIdentityPool {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self::from_client(aws_sdk_cognitoidentity::Client::new(config))
    }

    #[must_use]
    pub fn from_client(client: aws_sdk_cognitoidentity::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityPool for SdkIdentityPool {
    async fn get_id(&self, identity_pool_id: &str) -> Result<String, CredentialsError> {
        let response = self
            .client
            .get_id()
            .identity_pool_id(identity_pool_id)
            .send()
            .await
            .map_err(|err| CredentialsError::remote("GetId", err))?;

        response
            .identity_id()
            .map(str::to_string)
            .ok_or_else(|| CredentialsError::missing("GetId", "IdentityId"))
    }

    async fn get_open_id_token(
        &self,
        identity_id: &str,
        logins: HashMap<String, String>,
    ) -> Result<String, CredentialsError> {
        let response = self
            .client
            .get_open_id_token()
            .identity_id(identity_id)
            .set_logins(Some(logins))
            .send()
            .await
            .map_err(|err| CredentialsError::remote("GetOpenIdToken", err))?;

        response
            .token()
            .map(str::to_string)
            .ok_or_else(|| CredentialsError::missing("GetOpenIdToken", "Token"))
    }
}

/// STS reached through `aws-sdk-sts`.
#[derive(Debug, Clone)]
pub struct SdkRoleProvider {
    client: aws_sdk_sts::Client,
}

impl SdkRoleProvider {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self::from_client(aws_sdk_sts::Client::new(config))
    }

    #[must_use]
    pub fn from_client(client: aws_sdk_sts::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleProvider for SdkRoleProvider {
    async fn assume_role_with_web_identity(
        &self,
        request: WebIdentityRoleRequest,
    ) -> Result<CredentialBundle, CredentialsError> {
        info!(role_arn = request.role_arn.as_str(), duration = request.duration_seconds; "Calling AssumeRoleWithWebIdentity");

        let response = self
            .client
            .assume_role_with_web_identity()
            .role_arn(request.role_arn)
            .role_session_name(request.role_session_name)
            .web_identity_token(request.web_identity_token)
            .duration_seconds(request.duration_seconds)
            .send()
            .await
            .map_err(|err| CredentialsError::remote("AssumeRoleWithWebIdentity", err))?;

        let credentials = response
            .credentials()
            .ok_or_else(|| CredentialsError::missing("AssumeRoleWithWebIdentity", "Credentials"))?;

        Ok(CredentialBundle {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration: to_chrono(credentials.expiration())
                .ok_or_else(|| CredentialsError::missing("AssumeRoleWithWebIdentity", "Expiration"))?,
        })
    }
}

fn to_chrono(time: &aws_smithy_types::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}
