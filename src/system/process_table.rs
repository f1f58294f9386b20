// src/system/process_table.rs

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Could not read the process table at '{path}': {source}")]
    Procfs {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Could not run '{tool}' to list processes: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: io::Error,
    },
    #[error("'{tool}' failed while listing processes: {detail}")]
    ToolFailed { tool: String, detail: String },
    #[error("Unexpected line in '{tool}' output: '{line}'")]
    Malformed { tool: String, line: String },
}

/// One row of the OS process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub ppid: u32,
}

/// A source of process-table snapshots. Every call queries the OS afresh.
pub trait ProcessTable {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, QueryError>;
}

/// Reads `/proc/<pid>/stat` (Linux).
#[derive(Debug, Clone)]
pub struct ProcfsTable {
    root: PathBuf,
}

impl Default for ProcfsTable {
    fn default() -> Self {
        Self::at("/proc")
    }
}

impl ProcfsTable {
    /// A table rooted somewhere other than `/proc`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ProcessTable for ProcfsTable {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, QueryError> {
        let dir = fs::read_dir(&self.root).map_err(|source| QueryError::Procfs {
            path: self.root.display().to_string(),
            source,
        })?;

        let mut entries = Vec::new();
        for dir_entry in dir.flatten() {
            let Some(pid) = dir_entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<u32>().ok())
            else {
                continue;
            };

            let stat_path = dir_entry.path().join("stat");
            match fs::read_to_string(&stat_path) {
                Ok(content) => match parse_stat_ppid(&content) {
                    Some(ppid) => entries.push(ProcessEntry { pid, ppid }),
                    None => log::debug!("Ignoring unparsable {}", stat_path.display()),
                },
                // The process exited between listing and reading.
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => log::debug!("Skipping {}: {}", stat_path.display(), e),
            }
        }
        Ok(entries)
    }
}

/// Extracts the parent pid from a `stat` line.
///
/// The command name sits in parentheses and may itself contain spaces and
/// parentheses, so fields are counted from the *last* `)`.
fn parse_stat_ppid(stat: &str) -> Option<u32> {
    let (_, after_comm) = stat.rsplit_once(')')?;
    let mut fields = after_comm.split_whitespace();
    let _state = fields.next()?;
    fields.next()?.parse().ok()
}

/// Runs `ps` (macOS, BSDs and any POSIX system without procfs).
#[derive(Debug, Clone, Copy, Default)]
pub struct PsTable;

const PS_TOOL: &str = "ps";

impl ProcessTable for PsTable {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, QueryError> {
        let output = Command::new(PS_TOOL)
            .args(["-A", "-o", "pid=", "-o", "ppid="])
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| QueryError::ToolUnavailable {
                tool: PS_TOOL.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(QueryError::ToolFailed {
                tool: PS_TOOL.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_ps_output(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_ps_output(stdout: &str) -> Result<Vec<ProcessEntry>, QueryError> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.split_whitespace().map(str::parse::<u32>);
            match (fields.next(), fields.next()) {
                (Some(Ok(pid)), Some(Ok(ppid))) => Ok(ProcessEntry { pid, ppid }),
                _ => Err(QueryError::Malformed {
                    tool: PS_TOOL.to_string(),
                    line: line.to_string(),
                }),
            }
        })
        .collect()
}

/// The table used on this platform.
#[cfg(target_os = "linux")]
pub type PlatformTable = ProcfsTable;
/// The table used on this platform.
#[cfg(not(target_os = "linux"))]
pub type PlatformTable = PsTable;

/// Parent-to-children links built from one snapshot.
///
/// Only lives for a single termination: the OS table keeps changing and a
/// stale tree would signal the wrong processes.
#[derive(Debug, Default)]
pub struct ProcessTree {
    children: HashMap<u32, Vec<u32>>,
}

impl ProcessTree {
    pub fn from_entries(entries: &[ProcessEntry]) -> Self {
        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        for entry in entries.iter().filter(|e| e.pid != e.ppid) {
            children.entry(entry.ppid).or_default().push(entry.pid);
        }
        Self { children }
    }

    pub fn children_of(&self, pid: u32) -> &[u32] {
        self.children.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every process under `root` in depth-first post-order: each subtree is
    /// finished before its parent, and `root` comes last.
    ///
    /// A visited set keeps a reused pid from looping the walk.
    pub fn post_order(&self, root: u32) -> Vec<u32> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(root, false)];

        while let Some((pid, expanded)) = stack.pop() {
            if expanded {
                order.push(pid);
                continue;
            }
            if !visited.insert(pid) {
                continue;
            }
            stack.push((pid, true));
            for &child in self.children_of(pid).iter().rev() {
                if !visited.contains(&child) {
                    stack.push((child, false));
                }
            }
        }
        order
    }
}
