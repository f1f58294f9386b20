use crate::{
    cli::TerminationArgs,
    models::ProcessHandle,
    system::terminator::platform_terminator,
};
use anyhow::Result;
use colored::Colorize;

pub fn handle(pid: u32, termination: &TerminationArgs) -> Result<()> {
    let terminator = platform_terminator(termination.options());
    let report = terminator.terminate(&ProcessHandle::from_pid(pid))?;

    for signalled in &report.signalled {
        println!("{} {}", "signalled".green(), signalled);
    }
    for gone in &report.already_exited {
        println!("{} {}", "already exited".dimmed(), gone);
    }
    Ok(())
}
