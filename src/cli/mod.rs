//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `facewatch login` / `register` / `logout`: Auth Panel actions
//! - `facewatch profile [--watch]`: profile and usage statistics
//! - `facewatch token [--copy]`: show or copy the session token
//! - `facewatch dashboard`: monitoring dashboard server or static snapshot
//! - `facewatch config show|init|set|reset`: configuration management

use std::path::Path;
use std::thread;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::BackendClient;
use crate::api::types::{Credentials, Registration};
use crate::auth::profile::render_profile;
use crate::auth::{AuthPanel, AuthView, Clipboard, Notifier};
use crate::config;
use crate::config::schema::FacewatchConfig;
use crate::dashboard::Dashboard;
use crate::session::FileTokenStore;
use crate::utils::process;
use crate::web;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Prints alerts to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        println!("{} {}", "▸".cyan().bold(), message.bold());
    }
}

/// The platform clipboard, via the usual command-line helpers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        process::copy_to_clipboard(text)
    }
}

type Panel = AuthPanel<FileTokenStore, ConsoleNotifier>;

fn open_panel(config: &FacewatchConfig) -> Result<Panel> {
    let store = FileTokenStore::from_config(&config.session)?;
    let client = BackendClient::from_config(&config.backend);
    Ok(AuthPanel::new(client, store, ConsoleNotifier))
}

fn print_profile(panel: &Panel) {
    if let Some(profile) = panel.profile() {
        println!();
        println!("{}", "Profile".bold().cyan());
        println!("{}", "=".repeat(40));
        println!("{}", render_profile(profile));
    }
}

// ---------------------------------------------------------------------------
// facewatch login | register | logout
// ---------------------------------------------------------------------------

pub fn run_login(config: &FacewatchConfig, username: &str, password: &str) -> Result<()> {
    let mut panel = open_panel(config)?;
    let credentials = Credentials {
        username: username.to_string(),
        password: password.to_string(),
    };
    panel.handle_login(&credentials).context("login failed")?;
    print_profile(&panel);
    Ok(())
}

pub fn run_register(config: &FacewatchConfig, registration: &Registration) -> Result<()> {
    let mut panel = open_panel(config)?;
    // Start from the registration form; success flips back to login.
    panel.toggle_forms();
    panel
        .handle_register(registration)
        .context("registration failed")?;
    if panel.view() == AuthView::Login {
        println!(
            "  {}",
            format!("Next: facewatch login --username {}", registration.username).dimmed()
        );
    }
    Ok(())
}

pub fn run_logout(config: &FacewatchConfig) -> Result<()> {
    let mut panel = open_panel(config)?;
    panel.logout()?;
    println!("{} Logged out", "✓".green().bold());
    Ok(())
}

// ---------------------------------------------------------------------------
// facewatch profile | token
// ---------------------------------------------------------------------------

/// Show the profile for the stored session. With `watch`, reload it every
/// `polling.profile_interval_secs` until the session goes away.
pub fn run_profile(config: &FacewatchConfig, watch: bool) -> Result<()> {
    let mut panel = open_panel(config)?;

    let Some(first) = panel.refresh_tick() else {
        print_logged_out();
        return Ok(());
    };
    print_profile(&panel);
    if !watch {
        first.context("failed to load statistics")?;
        return Ok(());
    }

    let interval = config.polling.profile_interval();
    println!(
        "{}",
        format!("Refreshing every {}s. Press Ctrl+C to stop.", interval.as_secs()).dimmed()
    );
    loop {
        thread::sleep(interval);
        match panel.refresh_tick() {
            Some(_) => print_profile(&panel),
            None => {
                print_logged_out();
                return Ok(());
            }
        }
    }
}

/// Print the session token, optionally copying it to the clipboard. Works
/// offline; stats are not loaded.
pub fn run_token(config: &FacewatchConfig, copy: bool) -> Result<()> {
    let mut panel = open_panel(config)?;
    if panel.restore_session() != AuthView::Profile {
        print_logged_out();
        return Ok(());
    }

    if let Some(profile) = panel.profile() {
        println!("{}", profile.token);
    }
    if copy {
        panel.copy_token(&SystemClipboard)?;
    }
    Ok(())
}

fn print_logged_out() {
    println!(
        "{}",
        "Not logged in. Run `facewatch login` first.".yellow()
    );
}

// ---------------------------------------------------------------------------
// facewatch dashboard
// ---------------------------------------------------------------------------

/// Serve the live dashboard, or with `once` write a static snapshot.
pub fn run_dashboard(
    config: &FacewatchConfig,
    addr: Option<&str>,
    no_browser: bool,
    once: bool,
    output: Option<&Path>,
) -> Result<()> {
    let dashboard = Dashboard::new(BackendClient::from_config(&config.backend));

    if once {
        dashboard.load_all();
        let html = web::frontend::render_snapshot_page(&dashboard.snapshot());
        match output {
            Some(path) => {
                std::fs::write(path, html)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!(
                    "{} Snapshot written to {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
            None => println!("{html}"),
        }
        return Ok(());
    }

    let addr = addr.unwrap_or(config.web.addr.as_str());
    let open = config.web.open_browser && !no_browser;
    web::serve(&dashboard, addr, open, config.polling.dashboard_interval())
}

// ---------------------------------------------------------------------------
// facewatch config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective facewatch Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let source = |exists: bool, label: &str| {
        if exists {
            println!("  {} {}", "✓".green(), label.dimmed());
        } else {
            println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
        }
    };
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    source(
        config::global_config_file().is_some_and(|p| p.exists()),
        "~/.facewatch/config.toml",
    );
    source(
        config::project_config_file().is_some_and(|p| p.exists()),
        ".facewatch.toml",
    );
    println!(
        "  {} {}",
        "·".dimmed(),
        "FACEWATCH_* environment variables".dimmed()
    );

    Ok(())
}

/// Write a default config file at `~/.facewatch/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}
