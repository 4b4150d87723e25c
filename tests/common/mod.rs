use std::sync::Arc;

use cognito_credentials::{CredentialExchanger, Environment, EnvironmentConfig};

pub mod services;

use services::{FakeIdentityPool, FakeRoleProvider, FakeUserPool};

pub const USER_POOL_ID: &str = "us-east-1_SqmNeowUdp";
pub const PASSWORD_SETUP_URL: &str = "https://monitoring.example.com/";

pub fn config() -> EnvironmentConfig {
    EnvironmentConfig::from_lookup(Environment::Test, |key| {
        let value = match key {
            "TEST_AWS_REGION" => "us-east-1",
            "TEST_USER_POOL_ID" => USER_POOL_ID,
            "TEST_CLIENT_ID" => "4ucrv2tqqhbb0f2k1lqmp7v3tf",
            "TEST_IDENTITY_POOL_ID" => "us-east-1:0d4f1c3a-5b2e-4c8d-9f7a-1e2b3c4d5e6f",
            "TEST_ROLE_ARN" => "arn:aws:iam::123456789012:role/MonitoringReadOnly",
            "TEST_BUCKET_NAME" => "monitoring-exports",
            "TEST_PASSWORD_SETUP_URL" => PASSWORD_SETUP_URL,
            _ => return None,
        };

        Some(value.to_string())
    })
    .expect("Test configuration should be valid")
}

/// The fakes behind an exchanger, kept so tests can inspect the calls made.
pub struct Harness {
    pub exchanger: CredentialExchanger,
    pub user_pool: Arc<FakeUserPool>,
    pub identity_pool: Arc<FakeIdentityPool>,
    pub role_provider: Arc<FakeRoleProvider>,
}

impl Harness {
    pub fn new(user_pool: FakeUserPool) -> Self {
        Self::with(config(), user_pool, FakeIdentityPool::default())
    }

    pub fn with(
        config: EnvironmentConfig,
        user_pool: FakeUserPool,
        identity_pool: FakeIdentityPool,
    ) -> Self {
        let user_pool = Arc::new(user_pool);
        let identity_pool = Arc::new(identity_pool);
        let role_provider = Arc::new(FakeRoleProvider::default());

        let exchanger = CredentialExchanger::new(
            config,
            Arc::clone(&user_pool),
            Arc::clone(&identity_pool),
            Arc::clone(&role_provider),
        );

        Self {
            exchanger,
            user_pool,
            identity_pool,
            role_provider,
        }
    }

    /// The number of remote calls made through every fake.
    pub fn total_calls(&self) -> usize {
        self.user_pool.calls() + self.identity_pool.calls() + self.role_provider.calls()
    }
}
