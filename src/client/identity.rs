use std::collections::HashMap;

use log::{debug, info};

use crate::client::CredentialBundle;
use crate::constant::{MAX_DURATION_SECONDS, MIN_DURATION_SECONDS};
use crate::service::{IdentityPool, RoleProvider, WebIdentityRoleRequest};
use crate::{CredentialsError, EnvironmentConfig};

/// Exchange a user pool ID token for the temporary credentials of the configured role.
///
/// 1. `GetId` - an identity ID from the identity pool.
/// 2. `GetOpenIdToken` - an OpenID token for that identity, with the ID token as the
///    user pool login.
/// 3. `AssumeRoleWithWebIdentity` - credentials for the role, against the OpenID token.
pub(crate) async fn exchange(
    config: &EnvironmentConfig,
    identity_pool: &dyn IdentityPool,
    role_provider: &dyn RoleProvider,
    id_token: &str,
    duration_seconds: i32,
) -> Result<CredentialBundle, CredentialsError> {
    check_duration(duration_seconds)?;

    if id_token.is_empty() {
        return Err(CredentialsError::InvalidArgument(
            "An ID token is required".into(),
        ));
    }

    let identity_id = identity_pool.get_id(&config.identity_pool_id).await?;

    debug!(identity_id = identity_id.as_str(); "Received identity from the identity pool");

    let logins = HashMap::from([(config.login_provider(), id_token.to_string())]);

    let open_id_token = identity_pool
        .get_open_id_token(&identity_id, logins)
        .await?;

    let credentials = role_provider
        .assume_role_with_web_identity(WebIdentityRoleRequest {
            role_arn: config.role_arn.clone(),
            role_session_name: config.role_session_name.clone(),
            web_identity_token: open_id_token,
            duration_seconds,
        })
        .await?;

    info!(
        access_key_id = credentials.access_key_id.as_str(),
        expiration = credentials.expiration.to_rfc3339().as_str();
        "Assumed role with the identity pool token"
    );

    Ok(credentials)
}

/// Check `duration_seconds` lies within the session lengths STS issues.
pub(crate) fn check_duration(duration_seconds: i32) -> Result<(), CredentialsError> {
    if (MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&duration_seconds) {
        Ok(())
    } else {
        Err(CredentialsError::InvalidArgument(format!(
            "Invalid duration {duration_seconds}s, must be between {MIN_DURATION_SECONDS}s and {MAX_DURATION_SECONDS}s"
        )))
    }
}
