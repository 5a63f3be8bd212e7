use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use facewatch::api::types::Registration;
use facewatch::{cli, config, utils};

#[derive(Debug, Parser)]
#[command(name = "facewatch")]
#[command(about = "Client and monitoring dashboard for a face-comparison backend")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// Why the account needs face comparison
        #[arg(long)]
        purpose: String,
    },
    /// Show the profile and usage statistics of the stored session
    Profile {
        /// Keep refreshing the statistics
        #[arg(long)]
        watch: bool,
    },
    /// Print the stored session token
    Token {
        /// Also copy it to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Forget the stored session token
    Logout,
    /// Serve the monitoring dashboard
    Dashboard {
        /// Listen address (default: web.addr from config)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
        /// Load every region once and write a static HTML snapshot
        #[arg(long)]
        once: bool,
        /// Snapshot file (default: stdout)
        #[arg(long, requires = "once")]
        output: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file to ~/.facewatch/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `backend.base_url`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let config = config::load();
    utils::log::init(&config.logging);

    match app.command {
        Commands::Login { username, password } => cli::run_login(&config, &username, &password),
        Commands::Register {
            username,
            password,
            email,
            phone,
            purpose,
        } => {
            let registration = Registration {
                username,
                password,
                email,
                phone,
                purpose,
            };
            cli::run_register(&config, &registration)
        }
        Commands::Profile { watch } => cli::run_profile(&config, watch),
        Commands::Token { copy } => cli::run_token(&config, copy),
        Commands::Logout => cli::run_logout(&config),
        Commands::Dashboard {
            addr,
            no_browser,
            once,
            output,
        } => cli::run_dashboard(
            &config,
            addr.as_deref(),
            no_browser,
            once,
            output.as_deref(),
        ),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
