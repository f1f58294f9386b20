// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- BUILD-LANGUAGE VALUE MODELS ---
// The tagged form that configuration values take before they are handed to
// the build system as `-D` definitions.

/// The type tag of a cache definition.
///
/// The marshaller only ever produces `Unknown`, `Bool` and `String`; the path
/// kinds exist so that values the host already typed pass through intact.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueKind {
    Unknown,
    Bool,
    String,
    FilePath,
    Path,
}

impl ValueKind {
    /// The spelling used on the build tool's command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Bool => "BOOL",
            Self::String => "STRING",
            Self::FilePath => "FILEPATH",
            Self::Path => "PATH",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNKNOWN" | "" => Ok(Self::Unknown),
            "BOOL" => Ok(Self::Bool),
            "STRING" => Ok(Self::String),
            "FILEPATH" => Ok(Self::FilePath),
            "PATH" => Ok(Self::Path),
            other => Err(format!("Unknown value kind '{}'", other)),
        }
    }
}

/// A configuration value in the build language's textual form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(rename = "value")]
    pub text: String,
}

impl TypedValue {
    pub fn new(kind: ValueKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Renders the value as a single `-DNAME:TYPE=VALUE` argument.
    ///
    /// The result is one argv element; it must not be re-split by a shell.
    pub fn to_definition(&self, name: &str) -> String {
        format!("-D{}:{}={}", name, self.kind, self.text)
    }
}

/// A native configuration value as supplied by the host.
///
/// Built directly, or from JSON through `TryFrom<&serde_json::Value>` (see
/// `core::marshaller`), which is where unsupported shapes are rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<String>),
    Typed(TypedValue),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<TypedValue> for ConfigValue {
    fn from(value: TypedValue) -> Self {
        Self::Typed(value)
    }
}

// --- PROCESS MODELS ---

/// A borrowed view of a running process: just its platform identifier.
///
/// The handle never owns the process. Whoever spawned it keeps the `Child`
/// and is responsible for reaping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessHandle {
    pid: u32,
}

impl ProcessHandle {
    pub fn from_pid(pid: u32) -> Self {
        Self { pid }
    }

    pub fn from_child(child: &std::process::Child) -> Self {
        Self { pid: child.id() }
    }

    /// Returns `None` once tokio has already reaped the child.
    pub fn from_tokio_child(child: &tokio::process::Child) -> Option<Self> {
        child.id().map(Self::from_pid)
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

/// The signal delivered to every node of a tree on POSIX targets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// `SIGINT`, what a terminal sends on Ctrl+C.
    #[default]
    Interrupt,
    /// `SIGTERM`.
    Terminate,
    /// `SIGKILL`.
    Kill,
}

/// Options for tree termination. Deserializable so a host can embed it in
/// its own settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct TerminateOptions {
    pub signal: SignalKind,
}
