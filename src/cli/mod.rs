use crate::{
    constants::{DEFAULT_GRACE_MS, GRACE_ENV, SIGNAL_ENV},
    models::{SignalKind, TerminateOptions},
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub mod handlers;

/// cmkit: process-tree control and build-language value interop.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a raw command line into an argument vector.
    Tokenize {
        /// The command line, as one string.
        command: String,
    },
    /// Render a `-DNAME:TYPE=VALUE` definition from a JSON value.
    Define {
        /// The cache variable name.
        name: String,
        /// A JSON boolean, number, string, array of strings or {"type","value"} object.
        value: String,
    },
    /// Evaluate a value with the build language's truthiness rules.
    Truthy {
        /// The value to evaluate.
        value: String,
        /// Parse VALUE as JSON instead of taking it as a string.
        #[arg(long)]
        json: bool,
    },
    /// Expand `${...}` placeholders in a template.
    Substitute {
        /// Text containing placeholders such as `${workspaceRoot}`.
        template: String,
        /// Workspace root; defaults to the current directory.
        #[arg(long)]
        root: Option<PathBuf>,
        /// Value for `${toolset}`; left as written when absent.
        #[arg(long)]
        toolset: Option<String>,
        /// Value for `${buildType}`; defaults to `Debug`.
        #[arg(long)]
        build_type: Option<String>,
    },
    /// Normalize a path to forward slashes.
    Normalize {
        /// The path to normalize.
        path: String,
        /// Keep the original case even on case-insensitive hosts.
        #[arg(long)]
        no_fold_case: bool,
    },
    /// Terminate a running process and all of its descendants.
    Kill {
        /// Pid of the root process.
        pid: u32,
        #[command(flatten)]
        termination: TerminationArgs,
    },
    /// Run a build command, terminating its whole tree on Ctrl+C.
    Run {
        /// The command line, as one string.
        command: String,
        /// Working directory; defaults to the current directory.
        #[arg(long)]
        cwd: Option<PathBuf>,
        #[command(flatten)]
        termination: TerminationArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TerminationArgs {
    /// Signal delivered to each process on POSIX hosts.
    #[arg(long, value_enum, env = SIGNAL_ENV, default_value_t = SignalKind::Interrupt)]
    pub signal: SignalKind,

    /// How long a signalled build may take to exit before it is force-killed.
    #[arg(long, env = GRACE_ENV, default_value_t = DEFAULT_GRACE_MS)]
    pub grace_ms: u64,
}

impl TerminationArgs {
    pub fn options(&self) -> TerminateOptions {
        TerminateOptions {
            signal: self.signal,
        }
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}
