use crate::{
    cli::TerminationArgs,
    core::arg_parser,
    system::{executor, terminator::platform_terminator},
};
use anyhow::{Context, Result};
use colored::Colorize;
use std::{env, path::PathBuf, sync::Arc};

/// Tokenizes `command` and runs it; Ctrl+C stops the whole process tree.
pub fn handle(command: &str, cwd: Option<PathBuf>, termination: &TerminationArgs) -> Result<()> {
    let argv = arg_parser::tokenize(command)?;
    let cwd = match cwd {
        Some(cwd) => cwd,
        None => env::current_dir().context("Could not determine the current directory")?,
    };
    let terminator = Arc::from(platform_terminator(termination.options()));

    println!("{} {}", ">".cyan().bold(), argv.join(" ").dimmed());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    runtime.block_on(executor::run_cancellable(
        &argv,
        &cwd,
        terminator,
        termination.grace(),
        ctrl_c(),
    ))?;
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed the build simply
/// runs uncancellable.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Could not listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
