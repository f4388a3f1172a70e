//! Isolated execution of the update step.

use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::WatchError;

/// How one update attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exit status 0; `stderr` carries any warnings the update logged
    Succeeded { stdout: String, stderr: String },
    /// Non-zero exit (or killed by a signal when `code` is `None`)
    Failed { code: Option<i32>, stderr: String },
    /// Still running when the timeout expired; the child was killed
    TimedOut,
    /// The process could not be started or waited on
    LaunchFailed(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded { .. })
    }
}

/// Runs one update.
pub trait UpdateRunner {
    fn run_update(&mut self) -> RunOutcome;
}

/// Runs the update as a child process with a hard timeout.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl SubprocessRunner {
    pub fn new(program: PathBuf, args: Vec<OsString>, timeout: Duration) -> Self {
        Self {
            program,
            args,
            timeout,
        }
    }

    /// Re-invoke the running executable with `args`.
    pub fn current_exe(args: Vec<OsString>, timeout: Duration) -> Result<Self, WatchError> {
        let program = std::env::current_exe()
            .map_err(|_| WatchError::UpdaterMissing(PathBuf::from("cavasync")))?;
        if !program.is_file() {
            return Err(WatchError::UpdaterMissing(program));
        }
        Ok(Self::new(program, args, timeout))
    }
}

impl UpdateRunner for SubprocessRunner {
    fn run_update(&mut self) -> RunOutcome {
        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return RunOutcome::LaunchFailed(e.to_string()),
        };

        // Drain pipes concurrently so a chatty child cannot block on a full pipe
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                // Readers are left detached: a grandchild may still hold the pipes
                return RunOutcome::TimedOut;
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return RunOutcome::LaunchFailed(e.to_string());
            }
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);
        if status.success() {
            RunOutcome::Succeeded { stdout, stderr }
        } else {
            RunOutcome::Failed {
                code: status.code(),
                stderr,
            }
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        let _ = pipe.read_to_string(&mut buf);
        buf
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader.and_then(|h| h.join().ok()).unwrap_or_default()
}
