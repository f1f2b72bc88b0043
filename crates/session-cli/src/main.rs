//! Session CLI - log in against a credential endpoint and inspect sessions.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use session_config_and_utils::{init_logging, Config, Paths};

/// Session store command-line interface.
#[derive(Parser)]
#[command(name = "session-cli")]
#[command(about = "Verify credentials and inspect the resulting session state")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error). Defaults to the config value
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for the config file. Defaults to ~/.session-store
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Credential API base URL, overriding the config file
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify credentials, install the returned token and print each state
    Login {
        /// Login identifier
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long, env = "SESSION_PASSWORD", hide_env_values = true)]
        password: String,

        /// Use the admin login route
        #[arg(long)]
        admin: bool,
    },
    /// Decode a token's claims without verifying it
    Decode {
        /// Token to decode
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = Config::load(&paths)?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
        config.validate()?;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(&config.log_level);
    tracing::debug!(api_base_url = %config.api_base_url, "Configuration loaded");

    match cli.command {
        Commands::Login {
            username,
            password,
            admin,
        } => {
            commands::login(&config, &username, &password, admin).await?;
        }
        Commands::Decode { token } => {
            commands::decode(&token)?;
        }
    }

    Ok(())
}
