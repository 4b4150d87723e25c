use std::error::Error as _;
use std::process::ExitCode;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use clap::Parser;
use cognito_credentials::{
    CredentialBundle, CredentialExchanger, CredentialsError, Environment, EnvironmentConfig,
};
use env_logger::Env;
use log::{info, LevelFilter};

use crate::cli::Cli;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");

            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }

            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // RUST_LOG takes precedence over the verbosity flag
    env_logger::Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .format_target(verbose >= 2)
        .init();
}

async fn run(cli: Cli) -> Result<(), CredentialsError> {
    let environment = Environment::from(cli.environment);
    let config = EnvironmentConfig::from_env(environment)?;

    info!(environment = environment.prefix(); "Loaded environment configuration");

    let exchanger = CredentialExchanger::connect(config).await;

    println!("Going to get temporary credentials on behalf of the user.\n");

    let credentials = exchanger
        .get_temporary_credentials(&cli.username, &cli.password, cli.duration)
        .await?;

    print_credentials(&credentials);

    match (&exchanger.config().bucket_name, cli.no_list) {
        (Some(bucket), false) => list_bucket(exchanger.config(), bucket, &credentials).await,
        _ => Ok(()),
    }
}

fn print_credentials(credentials: &CredentialBundle) {
    println!("Temporary credentials:");
    println!("  access key id:  {}", credentials.access_key_id);
    println!("  secret key:     {}", credentials.secret_access_key);
    println!("  session token:  {}", credentials.session_token);
    println!("  expires at:     {}", credentials.expiration.to_rfc3339());
}

/// List every object in `bucket`, using the temporary credentials.
async fn list_bucket(
    config: &EnvironmentConfig,
    bucket: &str,
    credentials: &CredentialBundle,
) -> Result<(), CredentialsError> {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(Credentials::from(credentials))
        .load()
        .await;

    let s3 = aws_sdk_s3::Client::new(&sdk_config);

    println!("\nObjects in s3://{bucket}:");

    let mut pages = s3.list_objects_v2().bucket(bucket).into_paginator().send();

    while let Some(page) = pages.next().await {
        let page = page.map_err(|err| CredentialsError::remote("ListObjectsV2", err))?;

        for object in page.contents() {
            println!(
                "  {:>12}  {}",
                object.size().unwrap_or_default(),
                object.key().unwrap_or_default()
            );
        }
    }

    Ok(())
}
