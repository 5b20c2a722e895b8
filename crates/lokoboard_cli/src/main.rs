//! `lokoboard` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration (defaults, TOML file, flags) and start logging.
//! - Own the board store lifecycle for one invocation.
//! - Print failures as a single line and exit non-zero.

mod cli;
mod commands;
mod config;
mod interactive;
mod prompt;

use clap::Parser;
use cli::{Cli, Command};
use config::{AppConfig, ConfigFile, Overrides};
use log::{error, info};
use lokoboard_core::{default_log_level, init_logging, BoardStore};
use prompt::Console;
use std::error::Error;
use std::io;

fn main() {
    if let Err(err) = run() {
        error!("event=cli_exit module=cli status=error error={err}");
        eprintln!("lokoboard: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let base_dir = std::env::current_dir()?;

    let file = ConfigFile::discover(cli.config.as_deref(), &base_dir)?;
    let overrides = Overrides {
        db_path: cli.db,
        log_level: cli.log_level,
    };
    let config = AppConfig::resolve(file, overrides, &base_dir, default_log_level());
    init_logging(&config.log_level, &config.log_dir)?;
    info!(
        "event=cli_start module=cli status=ok version={} db_path={}",
        lokoboard_core::core_version(),
        config.db_path.display()
    );

    let store = BoardStore::open(&config.db_path)?;
    let command = cli.command.unwrap_or(Command::Interactive);
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    let result = commands::execute(&store, command, &mut console);

    // Close even when the command failed; the command error wins.
    let closed = store.close();
    result?;
    closed?;
    Ok(())
}
