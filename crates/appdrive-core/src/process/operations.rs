use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use sysinfo::{Pid as SysinfoPid, ProcessesToUpdate, System};
use tracing::{debug, info, warn};

use crate::process::errors::ProcessError;
use crate::process::types::{LaunchSpec, TerminationOutcome};

/// How often `terminate` checks for exit during the grace period
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Check if a process with the given PID is currently running
pub fn is_process_running(pid: u32) -> bool {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);
    system.process(pid_obj).is_some()
}

/// A child process owned by this crate.
///
/// On Unix the child leads its own process group, so signals reach
/// everything a launcher script starts underneath it.
#[derive(Debug)]
pub struct ManagedProcess {
    child: Child,
    command_line: String,
    exited: bool,
}

impl ManagedProcess {
    /// Spawn `spec` with stdin piped. Stdout and stderr are discarded unless
    /// `inherit_output` is set.
    pub fn spawn(spec: &LaunchSpec, inherit_output: bool) -> Result<Self, ProcessError> {
        let command_line = spec.command_line();
        info!(
            event = "core.process.spawn_started",
            command = %command_line,
            cwd = ?spec.cwd
        );

        let program = resolve_program(spec)?;

        let mut command = Command::new(&program);
        command.args(&spec.args).stdin(Stdio::piped());
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }
        if inherit_output {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|source| {
            warn!(
                event = "core.process.spawn_failed",
                command = %command_line,
                error = %source
            );
            ProcessError::SpawnFailed {
                program: spec.program.clone(),
                source,
            }
        })?;

        info!(
            event = "core.process.spawn_completed",
            command = %command_line,
            pid = child.id()
        );

        Ok(Self {
            child,
            command_line,
            exited: false,
        })
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Write `text` to the child's stdin and flush. No newline is appended.
    pub fn send_input(&mut self, text: &str) -> Result<(), ProcessError> {
        let pid = self.pid();
        let stdin = self
            .child
            .stdin
            .as_mut()
            .ok_or(ProcessError::StdinUnavailable { pid })?;

        stdin
            .write_all(text.as_bytes())
            .and_then(|()| stdin.flush())
            .map_err(|source| ProcessError::StdinWriteFailed { pid, source })?;

        debug!(event = "core.process.stdin_written", pid = pid, bytes = text.len());
        Ok(())
    }

    /// Non-blocking exit check; reaps the child if it has exited
    pub fn has_exited(&mut self) -> Result<bool, ProcessError> {
        if self.exited {
            return Ok(true);
        }
        let pid = self.pid();
        let status = self
            .child
            .try_wait()
            .map_err(|source| ProcessError::WaitFailed { pid, source })?;
        if let Some(status) = status {
            debug!(event = "core.process.exited", pid = pid, status = %status);
            self.exited = true;
        }
        Ok(self.exited)
    }

    /// Ask the process to exit, wait up to `grace`, then kill it.
    ///
    /// Safe to call more than once; later calls report `AlreadyExited`.
    pub fn terminate(&mut self, grace: Duration) -> Result<TerminationOutcome, ProcessError> {
        let pid = self.pid();
        info!(
            event = "core.process.terminate_started",
            pid = pid,
            grace_ms = grace.as_millis() as u64
        );

        if self.has_exited()? {
            // The launcher may be gone while the app it started lives on
            sweep_group(pid);
            info!(
                event = "core.process.terminate_completed",
                pid = pid,
                outcome = TerminationOutcome::AlreadyExited.as_str()
            );
            return Ok(TerminationOutcome::AlreadyExited);
        }

        self.request_exit()?;

        let deadline = Instant::now() + grace;
        loop {
            if self.has_exited()? {
                sweep_group(pid);
                info!(
                    event = "core.process.terminate_completed",
                    pid = pid,
                    outcome = TerminationOutcome::Terminated.as_str()
                );
                return Ok(TerminationOutcome::Terminated);
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(EXIT_POLL_INTERVAL.min(deadline - now));
        }

        warn!(
            event = "core.process.kill_escalated",
            pid = pid,
            grace_ms = grace.as_millis() as u64
        );
        self.force_kill()?;
        self.child
            .wait()
            .map_err(|source| ProcessError::WaitFailed { pid, source })?;
        self.exited = true;

        info!(
            event = "core.process.terminate_completed",
            pid = pid,
            outcome = TerminationOutcome::Killed.as_str()
        );
        Ok(TerminationOutcome::Killed)
    }

    #[cfg(unix)]
    fn request_exit(&mut self) -> Result<(), ProcessError> {
        signal_group(self.pid(), nix::sys::signal::Signal::SIGTERM)
    }

    /// No polite signal exists here; the grace period is skipped.
    #[cfg(not(unix))]
    fn request_exit(&mut self) -> Result<(), ProcessError> {
        self.force_kill()
    }

    #[cfg(unix)]
    fn force_kill(&mut self) -> Result<(), ProcessError> {
        signal_group(self.pid(), nix::sys::signal::Signal::SIGKILL)
    }

    #[cfg(not(unix))]
    fn force_kill(&mut self) -> Result<(), ProcessError> {
        let pid = self.pid();
        match self.child.kill() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(ProcessError::SignalFailed {
                pid,
                message: e.to_string(),
            }),
        }
    }
}

fn resolve_program(spec: &LaunchSpec) -> Result<std::path::PathBuf, ProcessError> {
    let resolved = match &spec.cwd {
        Some(cwd) => which::which_in(&spec.program, std::env::var_os("PATH"), cwd),
        None => which::which(&spec.program),
    };
    resolved.map_err(|e| {
        debug!(
            event = "core.process.resolve_failed",
            program = %spec.program,
            error = %e
        );
        ProcessError::ProgramNotFound {
            program: spec.program.clone(),
        }
    })
}

/// Signal the process group led by `pid`. A group that no longer exists is
/// not an error.
#[cfg(unix)]
fn signal_group(pid: u32, signal: nix::sys::signal::Signal) -> Result<(), ProcessError> {
    use nix::errno::Errno;
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(pid as i32), signal) {
        Ok(()) => {
            debug!(event = "core.process.signal_sent", pid = pid, signal = %signal);
            Ok(())
        }
        Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(ProcessError::SignalFailed {
            pid,
            message: e.to_string(),
        }),
    }
}

/// Kill whatever is left in the group after the leader exited.
///
/// The leader is already reaped here, so its pid only still names this group
/// while another member is alive; an empty group is left alone.
#[cfg(unix)]
fn sweep_group(pid: u32) {
    let members = group_members(pid);
    if members.is_empty() {
        debug!(event = "core.process.sweep_skipped", pid = pid);
        return;
    }

    debug!(
        event = "core.process.sweep_started",
        pid = pid,
        members = members.len()
    );
    if let Err(e) = signal_group(pid, nix::sys::signal::Signal::SIGKILL) {
        debug!(event = "core.process.sweep_failed", pid = pid, error = %e);
    }
}

#[cfg(not(unix))]
fn sweep_group(_pid: u32) {}

/// Live (non-zombie) processes in process group `pgid`, other than one
/// reusing the leader's pid
#[cfg(unix)]
fn group_members(pgid: u32) -> Vec<u32> {
    use nix::unistd::{Pid, getpgid};
    use sysinfo::ProcessStatus;

    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let group = Pid::from_raw(pgid as i32);
    system
        .processes()
        .iter()
        .filter(|(_, process)| !matches!(process.status(), ProcessStatus::Zombie))
        .map(|(p, _)| p.as_u32())
        .filter(|&p| p != pgid)
        .filter(|&p| getpgid(Some(Pid::from_raw(p as i32))) == Ok(group))
        .collect()
}
