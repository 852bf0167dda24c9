use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use iamc_access_control::{
    AccessControlService, IamcConfig, Service, StaticCredentials, UserDeletion,
    DEFAULT_SIGN_IN_DOMAIN,
};
use log::debug;

mod output;

/// Exit code for usage problems the shell detects itself (invalid service,
/// missing confirmation), matching clap's own usage-error code.
const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "iamc",
    version,
    about = "IAM command line utility",
    long_about = "Manage IAM users and coarse per-service access (Elastic Beanstalk, EC2) granted through group membership."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Verbose mode (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// AWS shared-config profile to use
    #[arg(long, global = true)]
    profile: Option<String>,

    /// AWS region used to resolve the IAM endpoint
    #[arg(long, global = true)]
    region: Option<String>,

    /// Access key id of the administrative identity
    #[arg(
        long,
        global = true,
        env = "IAMC_ACCESS_KEY_ID",
        requires = "secret_access_key"
    )]
    access_key_id: Option<String>,

    /// Secret access key of the administrative identity
    #[arg(
        long,
        global = true,
        env = "IAMC_SECRET_ACCESS_KEY",
        hide_env_values = true,
        requires = "access_key_id"
    )]
    secret_access_key: Option<String>,

    /// Domain used in console sign-in links
    #[arg(long, global = true, default_value = DEFAULT_SIGN_IN_DOMAIN)]
    sign_in_domain: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all users
    List {
        /// Print users as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new user
    Add {
        /// User name
        #[arg(short, long)]
        username: String,
        /// User password
        #[arg(short, long)]
        password: String,
    },
    /// Delete a user
    Delete {
        /// User name
        #[arg(short, long)]
        username: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Grant user access to a service: EB or EC2
    Grant(AccessArgs),
    /// Revoke user access to a service: EB or EC2
    Revoke(AccessArgs),
}

#[derive(Args, Debug)]
struct AccessArgs {
    /// User name
    #[arg(short, long)]
    username: String,
    /// eb | ec2
    #[arg(short, long)]
    service: String,
}

impl GlobalArgs {
    fn to_config(&self) -> IamcConfig {
        let credentials = match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
            }),
            _ => None,
        };
        IamcConfig {
            credentials,
            profile: self.profile.clone(),
            region: self.region.clone(),
            sign_in_domain: self.sign_in_domain.clone(),
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = format!("warn,iamc={level},iamc_access_control={level}");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}

async fn connect(global: &GlobalArgs) -> Result<AccessControlService> {
    AccessControlService::from_config(&global.to_config())
        .await
        .context("Failed to initialize IAM client")
}

/// Resolve the service name before any AWS setup happens
fn resolve_service(name: &str) -> Option<Service> {
    let service = Service::from_name(name);
    if service.is_none() {
        eprintln!("Service ({name}) is invalid. Expected one of: eb, ec2");
    }
    service
}

fn confirm_delete(username: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        eprintln!(
            "Refusing to delete user ({username}) without confirmation: pass --yes or run interactively in a TTY."
        );
        return Ok(false);
    }
    eprint!("Delete user ({username}) and all of its group memberships, inline policies and password? [y/N] ");
    io::stderr().flush().context("Failed to flush prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let global = &cli.global;
    match cli.command {
        Commands::List { json } => {
            let service = connect(global).await?;
            let users = service.list_users().await.context("Failed to list users")?;
            debug!("Listed {} users", users.len());
            if json {
                println!("{}", output::users_json(&users)?);
            } else {
                print!("{}", output::users_table(&users, &global.sign_in_domain));
            }
        }
        Commands::Add { username, password } => {
            let service = connect(global).await?;
            let user = service
                .add_user(&username, &password)
                .await
                .with_context(|| format!("Failed to create user ({username})"))?;
            println!("User ({username}) created successfully");
            if let Some(link) = output::sign_in_line(&user, &global.sign_in_domain) {
                println!("{link}");
            }
        }
        Commands::Delete { username, yes } => {
            if !yes && !confirm_delete(&username)? {
                return Ok(ExitCode::from(EXIT_USAGE));
            }
            let service = connect(global).await?;
            let report = service
                .delete_user(&username)
                .await
                .with_context(|| format!("Failed to delete user ({username})"))?;
            debug!("Delete report for {username}: {report:?}");
            match report.outcome {
                UserDeletion::Deleted => println!("User ({username}) deleted successfully."),
                UserDeletion::NotFound => {
                    eprintln!("User ({username}) not found.");
                    return Ok(ExitCode::FAILURE);
                }
                UserDeletion::Conflict(reason) => {
                    eprintln!("User ({username}) could not be deleted: {reason}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Grant(args) => {
            let Some(svc) = resolve_service(&args.service) else {
                return Ok(ExitCode::from(EXIT_USAGE));
            };
            let service = connect(global).await?;
            service
                .grant(&args.username, svc)
                .await
                .with_context(|| format!("Failed to grant access to {svc}"))?;
            println!(
                "User ({}) has been successfully granted access to service ({}).",
                args.username, args.service
            );
        }
        Commands::Revoke(args) => {
            let Some(svc) = resolve_service(&args.service) else {
                return Ok(ExitCode::from(EXIT_USAGE));
            };
            let service = connect(global).await?;
            let outcome = service.revoke(&args.username, svc).await;
            debug!("Revoke outcome for {}: {outcome:?}", args.username);
            println!(
                "User ({}) has been successfully revoked access to service ({}).",
                args.username, args.service
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
