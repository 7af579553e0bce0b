//! imgreg - keep a site's image registry in step with the files on disk.

#![allow(dead_code)]

mod asset;
mod cli;
mod config;
mod error;
mod lock;
mod logger;
mod pipeline;
mod registry;
mod repair;
mod utils;
mod verify;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ImgregConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{:#}", err);
            ExitCode::from(error::exit_code_of(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = ImgregConfig::load(cli)?;
    debug!("config"; "project root {}", config.root.display());

    match &cli.command {
        Commands::Build { strict } => cli::build::run_build(&config, *strict),
        Commands::Lock => cli::build::run_lock(&config),
        Commands::Verify => cli::verify::run_verify(&config),
        Commands::Repair { apply } => cli::repair::run_repair_command(&config, *apply),
        Commands::Clean { apply } => cli::repair::run_clean(&config, *apply),
        Commands::Import { source, force } => cli::build::run_import(&config, source, *force),
        Commands::Check { args } => cli::check::run_check(&config, args),
    }
}
