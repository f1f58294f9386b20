// src/system/terminator.rs

use crate::{
    models::{ProcessHandle, SignalKind, TerminateOptions},
    system::process_table::{ProcessTable, ProcessTree, QueryError},
};
use std::fmt;
use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;

/// A failure for one node of the tree. Other nodes are still attempted.
#[derive(Error, Debug)]
pub enum TerminationError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Failed to signal process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: io::Error,
    },
    #[error("Tree kill of process {pid} failed: {detail}")]
    TreeKill { pid: u32, detail: String },
}

/// What a termination attempt did, node by node.
#[derive(Debug, Default)]
pub struct TerminationReport {
    pub root: u32,
    /// Processes that accepted the request, in the order they were signalled.
    pub signalled: Vec<u32>,
    /// Processes that were already gone. Not an error.
    pub already_exited: Vec<u32>,
    pub failures: Vec<TerminationError>,
}

impl TerminationReport {
    fn new(root: u32) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    fn into_result(self) -> Result<Self, TerminateError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(TerminateError { report: self })
        }
    }
}

/// Returned when at least one node could not be signalled. The report still
/// lists everything that was.
#[derive(Error, Debug)]
#[error(
    "{} failure(s) while terminating the process tree rooted at {}",
    .report.failures.len(),
    .report.root
)]
pub struct TerminateError {
    pub report: TerminationReport,
}

/// Terminates a process together with every descendant.
///
/// `Ok` means every live process in the tree was *asked* to stop. Nothing
/// waits for exit here; callers wait on the child themselves, with their own
/// timeout. The calls block on OS queries, so async code should run them on
/// a blocking thread.
pub trait ProcessTerminator: fmt::Debug + Send + Sync {
    fn terminate(&self, handle: &ProcessHandle) -> Result<TerminationReport, TerminateError>;

    /// Like `terminate`, but with a signal the processes cannot ignore.
    fn kill(&self, handle: &ProcessHandle) -> Result<TerminationReport, TerminateError>;
}

/// The outcome of delivering one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    NoSuchProcess,
}

/// Delivers a signal to a single pid.
pub trait Signaller {
    fn send(&self, pid: u32, signal: SignalKind) -> io::Result<Delivery>;
}

/// Signals through `kill(2)`.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaller;

#[cfg(unix)]
impl Signaller for NixSignaller {
    fn send(&self, pid: u32, signal: SignalKind) -> io::Result<Delivery> {
        use nix::errno::Errno;
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        // pid 0 (and anything that wraps negative) addresses a whole
        // process group rather than one process.
        let raw = i32::try_from(pid)
            .ok()
            .filter(|raw| *raw > 0)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("refusing to signal pid {}", pid))
            })?;

        let signal = match signal {
            SignalKind::Interrupt => Signal::SIGINT,
            SignalKind::Terminate => Signal::SIGTERM,
            SignalKind::Kill => Signal::SIGKILL,
        };

        match kill(Pid::from_raw(raw), signal) {
            Ok(()) => Ok(Delivery::Delivered),
            Err(Errno::ESRCH) => Ok(Delivery::NoSuchProcess),
            Err(errno) => Err(io::Error::from(errno)),
        }
    }
}

/// POSIX strategy: the build tool does not forward signals to the workers it
/// spawns, so the tree is discovered and every node signalled, leaves first.
pub struct PosixTerminator<T, S> {
    table: T,
    signaller: S,
    signal: SignalKind,
}

impl<T, S> PosixTerminator<T, S> {
    pub fn new(table: T, signaller: S, signal: SignalKind) -> Self {
        Self {
            table,
            signaller,
            signal,
        }
    }
}

impl<T, S> fmt::Debug for PosixTerminator<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosixTerminator")
            .field("signal", &self.signal)
            .finish_non_exhaustive()
    }
}

impl<T, S> PosixTerminator<T, S>
where
    T: ProcessTable,
    S: Signaller,
{
    fn signal_tree(&self, handle: &ProcessHandle, signal: SignalKind) -> Result<TerminationReport, TerminateError> {
        let root = handle.pid();
        let mut report = TerminationReport::new(root);

        let order = match self.table.snapshot() {
            Ok(entries) => ProcessTree::from_entries(&entries).post_order(root),
            Err(e) => {
                log::warn!("Could not list descendants of {}: {}. Signalling it alone.", root, e);
                report.failures.push(e.into());
                vec![root]
            }
        };
        log::debug!("Sending {:?} to process tree of {} in order {:?}", signal, root, order);

        for pid in order {
            match self.signaller.send(pid, signal) {
                Ok(Delivery::Delivered) => report.signalled.push(pid),
                Ok(Delivery::NoSuchProcess) => {
                    log::debug!("Process {} had already exited", pid);
                    report.already_exited.push(pid);
                }
                Err(source) => {
                    log::warn!("Failed to signal process {}: {}", pid, source);
                    report.failures.push(TerminationError::Signal { pid, source });
                }
            }
        }

        report.into_result()
    }
}

impl<T, S> ProcessTerminator for PosixTerminator<T, S>
where
    T: ProcessTable + Send + Sync,
    S: Signaller + Send + Sync,
{
    fn terminate(&self, handle: &ProcessHandle) -> Result<TerminationReport, TerminateError> {
        self.signal_tree(handle, self.signal)
    }

    fn kill(&self, handle: &ProcessHandle) -> Result<TerminationReport, TerminateError> {
        self.signal_tree(handle, SignalKind::Kill)
    }
}

const TASKKILL_TOOL: &str = "taskkill";
/// `taskkill` exit code for "process not found".
const TASKKILL_NOT_FOUND: i32 = 128;

/// Windows strategy: one `taskkill /T /F`, which walks and force-kills the
/// tree itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsTerminator;

impl ProcessTerminator for WindowsTerminator {
    fn terminate(&self, handle: &ProcessHandle) -> Result<TerminationReport, TerminateError> {
        let pid = handle.pid();
        let mut report = TerminationReport::new(pid);

        let output = Command::new(TASKKILL_TOOL)
            .args(["/pid", &pid.to_string(), "/T", "/F"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();

        match output {
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                match interpret_taskkill(pid, output.status.code(), &stderr) {
                    Ok(Delivery::Delivered) => report.signalled.push(pid),
                    Ok(Delivery::NoSuchProcess) => report.already_exited.push(pid),
                    Err(e) => report.failures.push(e),
                }
            }
            Err(source) => report.failures.push(
                QueryError::ToolUnavailable {
                    tool: TASKKILL_TOOL.to_string(),
                    source,
                }
                .into(),
            ),
        }

        report.into_result()
    }

    // taskkill /F is already forced.
    fn kill(&self, handle: &ProcessHandle) -> Result<TerminationReport, TerminateError> {
        self.terminate(handle)
    }
}

fn interpret_taskkill(pid: u32, code: Option<i32>, stderr: &str) -> Result<Delivery, TerminationError> {
    match code {
        Some(0) => Ok(Delivery::Delivered),
        Some(TASKKILL_NOT_FOUND) => Ok(Delivery::NoSuchProcess),
        Some(code) => Err(TerminationError::TreeKill {
            pid,
            detail: format!("exit code {}: {}", code, stderr.trim()),
        }),
        None => Err(TerminationError::TreeKill {
            pid,
            detail: "taskkill was terminated by a signal".to_string(),
        }),
    }
}

/// Picks the termination strategy for the host. Call once at startup.
#[cfg(unix)]
pub fn platform_terminator(options: TerminateOptions) -> Box<dyn ProcessTerminator> {
    use crate::system::process_table::PlatformTable;

    Box::new(PosixTerminator::new(
        PlatformTable::default(),
        NixSignaller,
        options.signal,
    ))
}

/// Picks the termination strategy for the host. Call once at startup.
#[cfg(not(unix))]
pub fn platform_terminator(options: TerminateOptions) -> Box<dyn ProcessTerminator> {
    if options.signal != SignalKind::default() {
        log::debug!("Signal {:?} ignored; tree kills on this platform are always forced", options.signal);
    }
    Box::new(WindowsTerminator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::process_table::ProcessEntry;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FakeTable(Result<Vec<ProcessEntry>, ()>);

    impl ProcessTable for FakeTable {
        fn snapshot(&self) -> Result<Vec<ProcessEntry>, QueryError> {
            self.0.clone().map_err(|()| QueryError::ToolFailed {
                tool: "fake".to_string(),
                detail: "boom".to_string(),
            })
        }
    }

    #[derive(Debug, Default)]
    struct RecordingSignaller {
        sent: Mutex<Vec<u32>>,
        kinds: Mutex<Vec<SignalKind>>,
        gone: HashSet<u32>,
        broken: HashSet<u32>,
    }

    impl Signaller for RecordingSignaller {
        fn send(&self, pid: u32, signal: SignalKind) -> io::Result<Delivery> {
            self.sent.lock().unwrap().push(pid);
            self.kinds.lock().unwrap().push(signal);
            if self.broken.contains(&pid) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            if self.gone.contains(&pid) {
                return Ok(Delivery::NoSuchProcess);
            }
            Ok(Delivery::Delivered)
        }
    }

    fn tree(entries: &[(u32, u32)]) -> FakeTable {
        FakeTable(Ok(entries
            .iter()
            .map(|&(pid, ppid)| ProcessEntry { pid, ppid })
            .collect()))
    }

    #[test]
    fn test_children_are_signalled_before_parent() {
        let terminator = PosixTerminator::new(
            tree(&[(1, 0), (100, 1), (101, 100), (102, 100), (300, 1)]),
            RecordingSignaller::default(),
            SignalKind::Interrupt,
        );

        let report = terminator.terminate(&ProcessHandle::from_pid(100)).unwrap();
        assert_eq!(report.signalled, vec![101, 102, 100]);
        assert_eq!(*terminator.signaller.sent.lock().unwrap(), vec![101, 102, 100]);
    }

    #[test]
    fn test_kill_escalates_to_sigkill_over_the_same_tree() {
        let terminator = PosixTerminator::new(
            tree(&[(101, 100), (102, 101)]),
            RecordingSignaller::default(),
            SignalKind::Interrupt,
        );
        let handle = ProcessHandle::from_pid(100);

        terminator.terminate(&handle).unwrap();
        let report = terminator.kill(&handle).unwrap();

        assert_eq!(report.signalled, vec![102, 101, 100]);
        assert_eq!(
            *terminator.signaller.kinds.lock().unwrap(),
            [[SignalKind::Interrupt; 3], [SignalKind::Kill; 3]].concat()
        );
    }

    #[test]
    fn test_exited_process_is_success() {
        let signaller = RecordingSignaller {
            gone: HashSet::from([4242]),
            ..Default::default()
        };
        let terminator = PosixTerminator::new(tree(&[(1, 0)]), signaller, SignalKind::Interrupt);

        let report = terminator.terminate(&ProcessHandle::from_pid(4242)).unwrap();
        assert!(report.signalled.is_empty());
        assert_eq!(report.already_exited, vec![4242]);
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let signaller = RecordingSignaller {
            broken: HashSet::from([101]),
            ..Default::default()
        };
        let terminator = PosixTerminator::new(
            tree(&[(101, 100), (102, 100), (103, 102)]),
            signaller,
            SignalKind::Terminate,
        );

        let err = terminator.terminate(&ProcessHandle::from_pid(100)).unwrap_err();
        assert_eq!(err.report.signalled, vec![103, 102, 100]);
        assert_eq!(err.report.failures.len(), 1);
        assert!(matches!(
            err.report.failures.first(),
            Some(TerminationError::Signal { pid: 101, .. })
        ));
    }

    #[test]
    fn test_query_failure_still_signals_root() {
        let terminator = PosixTerminator::new(
            FakeTable(Err(())),
            RecordingSignaller::default(),
            SignalKind::Interrupt,
        );

        let err = terminator.terminate(&ProcessHandle::from_pid(77)).unwrap_err();
        assert_eq!(err.report.signalled, vec![77]);
        assert!(matches!(
            err.report.failures.first(),
            Some(TerminationError::Query(_))
        ));
    }

    #[test]
    fn test_interpret_taskkill() {
        assert_eq!(interpret_taskkill(1, Some(0), "").unwrap(), Delivery::Delivered);
        assert_eq!(interpret_taskkill(1, Some(128), "not found").unwrap(), Delivery::NoSuchProcess);
        assert!(matches!(
            interpret_taskkill(9, Some(1), "Access is denied.\r\n"),
            Err(TerminationError::TreeKill { pid: 9, ref detail }) if detail == "exit code 1: Access is denied."
        ));
        assert!(interpret_taskkill(9, None, "").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_nix_signaller_reports_missing_process() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();

        assert_eq!(NixSignaller.send(pid, SignalKind::Interrupt).unwrap(), Delivery::NoSuchProcess);
    }

    #[cfg(unix)]
    #[test]
    fn test_nix_signaller_refuses_pid_zero() {
        let err = NixSignaller.send(0, SignalKind::Terminate).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[test]
    fn test_platform_terminator_stops_a_real_tree() {
        use std::time::{Duration, Instant};

        let child = Command::new("sh")
            .args(["-c", "sleep 30 & sleep 30 & wait"])
            .spawn()
            .unwrap();
        let mut child = scopeguard::guard(child, |mut c| {
            let _ = c.kill();
            let _ = c.wait();
        });
        // Give the shell time to fork its workers.
        std::thread::sleep(Duration::from_millis(300));

        let terminator = platform_terminator(TerminateOptions {
            signal: SignalKind::Terminate,
        });
        let report = terminator.terminate(&ProcessHandle::from_child(&child)).unwrap();
        assert_eq!(report.signalled.last(), Some(&child.id()));

        let deadline = Instant::now() + Duration::from_secs(5);
        while child.try_wait().unwrap().is_none() {
            assert!(Instant::now() < deadline, "process tree did not exit");
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}
