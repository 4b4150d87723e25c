use aws_cognito_srp::{AuthParameters, SrpClient, User, VerificationParameters};
use log::{info, warn};

use crate::client::TokenPair;
use crate::constant::{SALT, SECRET_BLOCK, SRP_B, USER_ID_FOR_SRP};
use crate::service::{
    AuthChallenge, AuthStep, ChallengeName, PasswordVerifierResponse, SrpInitiation, UserPool,
};
use crate::{CredentialsError, EnvironmentConfig};

/// Sign `username` in to the user pool with the `USER_SRP_AUTH` flow.
///
/// The password never leaves the process: the SRP client proves knowledge of it by
/// answering the `PASSWORD_VERIFIER` challenge issued in response to `InitiateAuth`.
pub(crate) async fn authenticate(
    config: &EnvironmentConfig,
    user_pool: &dyn UserPool,
    username: &str,
    password: &str,
) -> Result<TokenPair, CredentialsError> {
    if username.is_empty() || password.is_empty() {
        return Err(CredentialsError::InvalidArgument(
            "A username and password are required".into(),
        ));
    }

    let srp = SrpClient::<User>::new(
        User::new(&config.user_pool_id, username, password),
        &config.client_id,
        config.client_secret.as_deref(),
    );

    info!(username = username, user_pool_id = config.user_pool_id.as_str(); "Starting SRP authentication");

    let AuthParameters {
        a, secret_hash, ..
    } = srp.get_auth_parameters();

    let step = user_pool
        .initiate_srp_auth(SrpInitiation {
            client_id: config.client_id.clone(),
            username: username.to_string(),
            srp_a: a,
            secret_hash,
        })
        .await?;

    let challenge = match step {
        AuthStep::Challenge(challenge) if challenge.name == ChallengeName::PasswordVerifier => {
            challenge
        }
        other => return finish("InitiateAuth", other),
    };

    let user_id = parameter(&challenge, USER_ID_FOR_SRP)?;

    let VerificationParameters {
        password_claim_secret_block,
        password_claim_signature,
        secret_hash,
        timestamp,
    } = srp.verify(
        parameter(&challenge, SECRET_BLOCK)?,
        user_id,
        parameter(&challenge, SALT)?,
        parameter(&challenge, SRP_B)?,
    )?;

    let step = user_pool
        .respond_to_password_verifier(PasswordVerifierResponse {
            client_id: config.client_id.clone(),
            user_id: user_id.to_string(),
            session: challenge.session.clone(),
            password_claim_secret_block,
            password_claim_signature,
            timestamp,
            secret_hash,
        })
        .await?;

    let tokens = finish("RespondToAuthChallenge", step)?;

    info!(username = username; "Authenticated with the user pool");

    Ok(tokens)
}

/// Turn the final step of the flow into the user's tokens.
fn finish(operation: &'static str, step: AuthStep) -> Result<TokenPair, CredentialsError> {
    match step {
        AuthStep::Authenticated(tokens) => {
            if tokens.id_token.is_empty() || tokens.refresh_token.is_empty() {
                return Err(CredentialsError::missing(operation, "AuthenticationResult"));
            }

            Ok(tokens)
        }
        AuthStep::Challenge(AuthChallenge {
            name: ChallengeName::NewPasswordRequired,
            ..
        }) => {
            warn!("User pool requires a new password before the first sign-in");

            Err(CredentialsError::authentication(
                "the account still has its temporary password",
            ))
        }
        AuthStep::Challenge(AuthChallenge { name, .. }) => {
            Err(CredentialsError::UnsupportedChallenge(name.as_str().to_string()))
        }
    }
}

fn parameter<'a>(challenge: &'a AuthChallenge, name: &'static str) -> Result<&'a str, CredentialsError> {
    challenge
        .parameters
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| CredentialsError::missing("InitiateAuth", name))
}
