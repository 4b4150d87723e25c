use regex::Regex;

/// Lifetime of the temporary credentials when none is requested (one hour).
pub const DEFAULT_DURATION_SECONDS: i32 = 3600;

/// The shortest session STS will issue for `AssumeRoleWithWebIdentity`.
pub const MIN_DURATION_SECONDS: i32 = 900;

/// The longest session STS will issue for `AssumeRoleWithWebIdentity`.
pub const MAX_DURATION_SECONDS: i32 = 43_200;

/// Session name recorded by STS for the assumed role.
pub const DEFAULT_ROLE_SESSION_NAME: &str = "cognito-credentials";

// Challenge parameters returned by Cognito with the `PASSWORD_VERIFIER` challenge.
pub const USER_ID_FOR_SRP: &str = "USER_ID_FOR_SRP";
pub const SECRET_BLOCK: &str = "SECRET_BLOCK";
pub const SALT: &str = "SALT";
pub const SRP_B: &str = "SRP_B";

lazy_static! {
    pub static ref REGION: Regex = Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").unwrap();
    pub static ref USER_POOL_ID: Regex =
        Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+_[0-9A-Za-z]+$").unwrap();
    pub static ref IDENTITY_POOL_ID: Regex =
        Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+:[0-9a-f]{8}(-[0-9a-f]{4}){3}-[0-9a-f]{12}$").unwrap();
    pub static ref ROLE_ARN: Regex =
        Regex::new(r"^arn:aws[a-z-]*:iam::\d{12}:role/[\w+=,.@/-]+$").unwrap();
}
