// src/bin/cmkit.rs

use anyhow::Result;
use clap::Parser;
use cmkit::{
    cli::{Cli, Commands, handlers},
    constants::INTERRUPTED_EXIT_CODE,
    system::executor,
};
use colored::*;

/// The main entry point of the `cmkit` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // An interrupted build exits like a shell would, without extra noise.
        if let Some(executor::ExecutionError::Interrupted { .. }) =
            e.downcast_ref::<executor::ExecutionError>()
        {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }

        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    match cli.command {
        Commands::Tokenize { command } => handlers::tokenize::handle(&command),
        Commands::Define { name, value } => handlers::define::handle(&name, &value),
        Commands::Truthy { value, json } => handlers::truthy::handle(&value, json),
        Commands::Substitute {
            template,
            root,
            toolset,
            build_type,
        } => handlers::substitute::handle(&template, root, toolset, build_type),
        Commands::Normalize { path, no_fold_case } => handlers::normalize::handle(&path, no_fold_case),
        Commands::Kill { pid, termination } => handlers::kill::handle(pid, &termination),
        Commands::Run {
            command,
            cwd,
            termination,
        } => handlers::run::handle(&command, cwd, &termination),
    }
}
