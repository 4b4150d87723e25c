//! In-memory stand-ins for the user pool, identity pool and STS, which record every
//! request they receive.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use cognito_credentials::service::{
    AuthChallenge, AuthStep, ChallengeName, IdentityPool, PasswordVerifierResponse,
    RoleProvider, SrpInitiation, UserPool, WebIdentityRoleRequest,
};
use cognito_credentials::{CredentialBundle, CredentialsError, TokenPair};

pub const MOCK_B: &str = "36ef01c6dde9fe503da333b1acc758ba";

pub const MOCK_SALT: &str = "36ef01c6dde9fe503da333b1acc758ba";

pub const MOCK_SECRET_BLOCK: &str = "9ae77ec7154c14dcc487b47707fee4b4920cb96d8a8c045e4c8df879a7b375524aa736acdec6c9ad4ea606774d00621b";

pub const MOCK_SESSION: &str = "AYABeExampleSession";

/// What the fake user pool does with a sign-in.
///
/// The fake cannot check an SRP password claim, so each test decides how the claim
/// is answered.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SignIn {
    Accept,
    WrongPassword,
    NewPasswordRequired,
}

#[derive(Debug)]
pub struct FakeUserPool {
    users: HashMap<String, SignIn>,
    omit_parameter: Option<&'static str>,
    pub initiations: Mutex<Vec<SrpInitiation>>,
    pub responses: Mutex<Vec<PasswordVerifierResponse>>,
}

impl FakeUserPool {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            omit_parameter: None,
            initiations: Mutex::new(vec![]),
            responses: Mutex::new(vec![]),
        }
    }

    pub fn with_user(mut self, username: &str, sign_in: SignIn) -> Self {
        self.users.insert(username.to_string(), sign_in);
        self
    }

    /// Leave `parameter` out of the `PASSWORD_VERIFIER` challenge.
    pub fn omitting(mut self, parameter: &'static str) -> Self {
        self.omit_parameter = Some(parameter);
        self
    }

    pub fn calls(&self) -> usize {
        self.initiations.lock().unwrap().len() + self.responses.lock().unwrap().len()
    }

    fn user_id(username: &str) -> String {
        format!("{username}-7d4c1e2a")
    }
}

#[async_trait]
impl UserPool for FakeUserPool {
    async fn initiate_srp_auth(&self, request: SrpInitiation) -> Result<AuthStep, CredentialsError> {
        let username = request.username.clone();
        self.initiations.lock().unwrap().push(request);

        if !self.users.contains_key(&username) {
            return Err(CredentialsError::authentication("User does not exist."));
        }

        let mut parameters: HashMap<String, String> = [
            ("USER_ID_FOR_SRP", Self::user_id(&username)),
            ("SECRET_BLOCK", MOCK_SECRET_BLOCK.to_string()),
            ("SALT", MOCK_SALT.to_string()),
            ("SRP_B", MOCK_B.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        if let Some(parameter) = self.omit_parameter {
            parameters.remove(parameter);
        }

        Ok(AuthStep::Challenge(AuthChallenge {
            name: ChallengeName::PasswordVerifier,
            session: Some(MOCK_SESSION.to_string()),
            parameters,
        }))
    }

    async fn respond_to_password_verifier(
        &self,
        request: PasswordVerifierResponse,
    ) -> Result<AuthStep, CredentialsError> {
        let sign_in = self
            .users
            .iter()
            .find(|(username, _)| Self::user_id(username) == request.user_id)
            .map(|(_, sign_in)| *sign_in);

        let count = self.responses.lock().unwrap().len() + 1;
        self.responses.lock().unwrap().push(request);

        match sign_in {
            Some(SignIn::Accept) => Ok(AuthStep::Authenticated(TokenPair {
                id_token: format!("eyJraWQiOiJ.id-token-{count}"),
                refresh_token: format!("eyJjdHkiOiJ.refresh-token-{count}"),
            })),
            Some(SignIn::WrongPassword) => Err(CredentialsError::authentication(
                "Incorrect username or password.",
            )),
            Some(SignIn::NewPasswordRequired) => Ok(AuthStep::Challenge(AuthChallenge {
                name: ChallengeName::NewPasswordRequired,
                session: Some(MOCK_SESSION.to_string()),
                parameters: HashMap::new(),
            })),
            None => Err(CredentialsError::authentication("User does not exist.")),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeIdentityPool {
    fail_open_id_token: bool,
    pub get_id_requests: Mutex<Vec<String>>,
    pub open_id_requests: Mutex<Vec<(String, HashMap<String, String>)>>,
}

impl FakeIdentityPool {
    /// An identity pool whose `GetOpenIdToken` always fails.
    pub fn failing_open_id_token() -> Self {
        Self {
            fail_open_id_token: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.get_id_requests.lock().unwrap().len() + self.open_id_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityPool for FakeIdentityPool {
    async fn get_id(&self, identity_pool_id: &str) -> Result<String, CredentialsError> {
        let mut requests = self.get_id_requests.lock().unwrap();
        requests.push(identity_pool_id.to_string());

        Ok(format!("us-east-1:identity-{}", requests.len()))
    }

    async fn get_open_id_token(
        &self,
        identity_id: &str,
        logins: HashMap<String, String>,
    ) -> Result<String, CredentialsError> {
        self.open_id_requests
            .lock()
            .unwrap()
            .push((identity_id.to_string(), logins));

        if self.fail_open_id_token {
            return Err(CredentialsError::remote(
                "GetOpenIdToken",
                "NotAuthorizedException: Invalid login token.",
            ));
        }

        Ok(format!("open-id-token-for-{identity_id}"))
    }
}

#[derive(Debug, Default)]
pub struct FakeRoleProvider {
    pub requests: Mutex<Vec<WebIdentityRoleRequest>>,
}

impl FakeRoleProvider {
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RoleProvider for FakeRoleProvider {
    async fn assume_role_with_web_identity(
        &self,
        request: WebIdentityRoleRequest,
    ) -> Result<CredentialBundle, CredentialsError> {
        let duration = Duration::seconds(i64::from(request.duration_seconds));

        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let count = requests.len();

        Ok(CredentialBundle {
            access_key_id: format!("AKIAFAKE{count:012}"),
            secret_access_key: format!("secret-key-{count}"),
            session_token: format!("session-token-{count}"),
            expiration: Utc::now() + duration,
        })
    }
}
