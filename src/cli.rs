use clap::{ArgAction, Parser, ValueEnum};
use cognito_credentials::{Environment, DEFAULT_DURATION_SECONDS};

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum EnvironmentArg {
    Dev,
    Test,
    Prod,
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Dev => Environment::Dev,
            EnvironmentArg::Test => Environment::Test,
            EnvironmentArg::Prod => Environment::Prod,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "cognito-credentials",
    version,
    about = "Get temporary AWS credentials for a Cognito user pool user"
)]
pub struct Cli {
    #[arg(help = "Username as it appears in the user pool")]
    pub username: String,

    #[arg(help = "Password set by the user after their first sign-in")]
    pub password: String,

    #[arg(
        short = 'e',
        long,
        value_enum,
        default_value = "test",
        help = "Deployment whose user pool, identity pool and role are used"
    )]
    pub environment: EnvironmentArg,

    #[arg(
        short = 'd',
        long,
        default_value_t = DEFAULT_DURATION_SECONDS,
        help = "Lifetime of the temporary credentials in seconds (900-43200)"
    )]
    pub duration: i32,

    #[arg(long, help = "Do not list the objects of the environment's bucket")]
    pub no_list: bool,

    #[arg(short = 'v', long, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,
}
