//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use perspectiq_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "perspectiq")]
#[command(version)]
#[command(about = "Negotiation practice simulator: terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides config and PERSPECTIQ_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Screen to open in the interactive client, e.g. /dashboard or /chat/42
    #[arg(long, value_name = "PATH")]
    route: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in (creates the account on first use) and store credentials
    Login {
        #[arg(long)]
        username: String,
        /// Your role, e.g. "Product Manager"
        #[arg(long)]
        role: String,
        #[arg(long)]
        age: Option<u32>,
    },
    /// Remove stored credentials
    Logout,
    /// Show the current user
    Whoami,
    /// List available personas
    Personas,
    /// Manage past simulations
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Check backend status
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Lists past simulations, newest first
    List,
    /// Shows a simulation's summary and transcript
    Show {
        #[arg(value_name = "SESSION_ID")]
        id: i64,
    },
    /// Permanently deletes a simulation
    Delete {
        #[arg(value_name = "SESSION_ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        api_url,
        route,
    } = cli;

    // Config commands must work even when the existing file is broken.
    if let Some(Commands::Config { command }) = &command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let config = config::Config::load().context("load config")?;
    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e:#}");
            None
        }
    };
    let api_url = api_url.as_deref();

    let Some(command) = command else {
        return commands::chat::run(&config, api_url, route.as_deref()).await;
    };

    match command {
        Commands::Login {
            username,
            role,
            age,
        } => commands::auth::login(&config, api_url, username, role, age).await,
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(&config, api_url).await,
        Commands::Personas => commands::personas::list(&config, api_url).await,
        Commands::Sessions { command } => match command {
            SessionCommands::List => commands::sessions::list(&config, api_url).await,
            SessionCommands::Show { id } => commands::sessions::show(&config, api_url, id).await,
            SessionCommands::Delete { id } => {
                commands::sessions::delete(&config, api_url, id).await
            }
        },
        Commands::Health => commands::health::check(&config, api_url).await,
        Commands::Config { .. } => Ok(()),
    }
}
