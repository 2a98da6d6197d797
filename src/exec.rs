// This file is part of minish, a miniature POSIX-style shell.
// Copyright (c) 2024 minish contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
// OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Executor (component E): the central subsystem. Runs a pipeline of
//! [`Stage`]s by forking one child per stage, wiring pipes and
//! redirections between them, and reaping the results.
//!
//! Talks to `nix` directly rather than through a swappable system trait,
//! since there is only ever one real executor here and no virtual-filesystem
//! test double to stand in for it. `EINTR` is retried on `close`/`dup2`;
//! errno is mapped to an exit code by direct enum matching.

use crate::builtin;
use crate::env_store::EnvStore;
use crate::error::ShellError;
use crate::pipeline::{RedirKind, Stage};
use crate::signals::{self, SignalController};

use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, AccessFlags, ForkResult, Pid};
use std::ffi::CString;
use std::io::{self, Write};
use std::os::unix::io::RawFd;

/// Outcome of running one input line's pipeline: its exit status, and
/// whether an `exit` builtin ran (only possible via the parent-only fast
/// path) and the REPL should stop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExecOutcome {
    pub status: i32,
    pub terminate: bool,
}

/// Runs `stages` to completion and returns the pipeline's exit status.
///
/// A single stage with no redirections naming a parent-only builtin
/// (`cd`, `export`, `unset`, `exit`) is dispatched directly in this
/// process, so its effect on `env` persists. Everything else forks.
pub fn execute(
    stages: &[Stage],
    env: &mut EnvStore,
    signals: &mut SignalController,
) -> Result<ExecOutcome, ShellError> {
    if let [stage] = stages {
        if stage.redirs.is_empty() {
            if let Some(cmd) = stage.cmd.as_deref() {
                if matches!(builtin::classify(cmd), Some(builtin::BuiltinClass::ParentOnly)) {
                    let mut stdout = io::stdout();
                    let outcome = builtin::dispatch(&stage.argv, env, &mut stdout);
                    tracing::debug!(cmd, code = outcome.code, "ran parent-only builtin without forking");
                    return Ok(ExecOutcome { status: outcome.code, terminate: outcome.terminate_shell });
                }
            }
        }
    }

    signals.enter_execution()?;
    let status = run_pipeline(stages, env)?;
    signals.enter_prompt()?;
    Ok(ExecOutcome { status, terminate: false })
}

fn run_pipeline(stages: &[Stage], env: &mut EnvStore) -> Result<i32, ShellError> {
    let n = stages.len();
    let mut prev_read: Option<RawFd> = None;
    let mut children: Vec<Pid> = Vec::with_capacity(n);

    for (k, stage) in stages.iter().enumerate() {
        let curr = if k + 1 < n {
            let (read_end, write_end) = unistd::pipe()?;
            tracing::debug!(stage = k, read_end, write_end, "created pipe");
            Some((read_end, write_end))
        } else {
            None
        };

        match unsafe { unistd::fork() }? {
            ForkResult::Child => {
                let _ = signals::reset_to_default_in_child();
                run_child(stage, env, prev_read, curr, k);
            }
            ForkResult::Parent { child } => {
                tracing::debug!(stage = k, pid = child.as_raw(), "forked stage");
                children.push(child);
                if let Some(fd) = prev_read.take() {
                    let _ = close_retrying(fd);
                }
                prev_read = curr.map(|(read_end, write_end)| {
                    let _ = close_retrying(write_end);
                    read_end
                });
            }
        }
    }

    let mut last_status = 0;
    let last_index = n.saturating_sub(1);
    for (k, pid) in children.into_iter().enumerate() {
        tracing::debug!(stage = k, pid = pid.as_raw(), "waiting for stage");
        match waitpid(pid, None)? {
            WaitStatus::Exited(_, code) if k == last_index => last_status = code,
            WaitStatus::Signaled(_, signal, _) if k == last_index => last_status = 128 + signal as i32,
            _ => {}
        }
    }
    Ok(last_status)
}

/// Runs in the forked child for stage `k` of `n`. Never returns: every
/// path ends in `std::process::exit`.
fn run_child(
    stage: &Stage,
    env: &mut EnvStore,
    prev_read: Option<RawFd>,
    curr: Option<(RawFd, RawFd)>,
    k: usize,
) -> ! {
    let (last_in, last_out) = match apply_redirs(stage) {
        Ok(fds) => fds,
        Err((target, err)) => {
            eprintln!("minish: {target}: {err}");
            std::process::exit(1);
        }
    };

    match last_in {
        Some(fd) => {
            let _ = unistd::dup2(fd, 0);
            let _ = close_retrying(fd);
        }
        None => {
            if let Some(fd) = prev_read {
                let _ = unistd::dup2(fd, 0);
            }
        }
    }
    if let Some(fd) = prev_read {
        let _ = close_retrying(fd);
    }

    match curr {
        Some((read_end, write_end)) => {
            match last_out {
                Some(fd) => {
                    let _ = unistd::dup2(fd, 1);
                    let _ = close_retrying(fd);
                }
                None => {
                    let _ = unistd::dup2(write_end, 1);
                }
            }
            let _ = close_retrying(read_end);
            let _ = close_retrying(write_end);
        }
        None => {
            if let Some(fd) = last_out {
                let _ = unistd::dup2(fd, 1);
                let _ = close_retrying(fd);
            }
        }
    }

    tracing::debug!(stage = k, "exec'ing stage after wiring fds");
    run_command(stage, env)
}

/// Opens each of `stage.redirs` in source order, touching every target.
/// Returns the fds of the *last* input and *last* output redirection (the
/// only ones actually `dup2`'d), closing every superseded fd as it goes.
fn apply_redirs(stage: &Stage) -> Result<(Option<RawFd>, Option<RawFd>), (String, nix::Error)> {
    let mut last_in: Option<RawFd> = None;
    let mut last_out: Option<RawFd> = None;

    for redir in &stage.redirs {
        let (oflag, mode) = match redir.kind {
            RedirKind::In => (OFlag::O_RDONLY, Mode::empty()),
            RedirKind::OutTrunc => (
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                Mode::from_bits_truncate(0o644),
            ),
            RedirKind::OutAppend => (
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
                Mode::from_bits_truncate(0o644),
            ),
            RedirKind::HereDoc => unreachable!("heredoc redirections are rejected by the pipeline builder"),
        };

        let fd = open(redir.target.as_str(), oflag, mode).map_err(|e| (redir.target.clone(), e))?;

        match redir.kind {
            RedirKind::In => {
                if let Some(prev) = last_in.replace(fd) {
                    let _ = close_retrying(prev);
                }
            }
            RedirKind::OutTrunc | RedirKind::OutAppend => {
                if let Some(prev) = last_out.replace(fd) {
                    let _ = close_retrying(prev);
                }
            }
            RedirKind::HereDoc => unreachable!(),
        }
    }

    Ok((last_in, last_out))
}

/// Runs the stage's command: a builtin (forced into the child to preserve
/// its stdout semantics without mutating the parent's environment) or an
/// external program via `execve`. Never returns.
fn run_command(stage: &Stage, env: &mut EnvStore) -> ! {
    let Some(cmd) = stage.cmd.as_deref() else {
        std::process::exit(0);
    };

    if builtin::is_builtin(cmd) {
        let mut stdout = io::stdout();
        let outcome = builtin::dispatch(&stage.argv, env, &mut stdout);
        let _ = stdout.flush();
        std::process::exit(outcome.code);
    }

    let path = match resolve_path(cmd, env) {
        Ok(path) => path,
        Err(code) => {
            eprintln!("minish: {cmd}: command not found");
            std::process::exit(code);
        }
    };

    let argv: Vec<CString> = match stage.argv.iter().map(|a| CString::new(a.as_str())).collect() {
        Ok(argv) => argv,
        Err(_) => {
            eprintln!("minish: {cmd}: argument contains a NUL byte");
            std::process::exit(1);
        }
    };
    let envp = env.as_envp();

    let err = unistd::execve(&path, &argv, &envp).unwrap_err();
    let code = match err {
        nix::Error::ENOENT => 127,
        nix::Error::EACCES | nix::Error::EISDIR => 126,
        other => other as i32,
    };
    eprintln!("minish: {cmd}: {err}");
    std::process::exit(code);
}

/// Resolves `cmd` to an executable path: verbatim (after an executability
/// check) if it contains a `/`, else the first `PATH` entry (from the Env
/// Store, not the OS environment) where `access(X_OK)` succeeds. An
/// empty/missing `PATH` falls back to trying `cmd` relative to the
/// current directory.
fn resolve_path(cmd: &str, env: &EnvStore) -> Result<CString, i32> {
    if cmd.contains('/') {
        return match unistd::access(cmd, AccessFlags::X_OK) {
            Ok(()) => CString::new(cmd).map_err(|_| 126),
            Err(nix::Error::ENOENT) => Err(127),
            Err(_) => Err(126),
        };
    }

    let path_var = env.get("PATH").unwrap_or("");
    for prefix in path_var.split(':') {
        let candidate = if prefix.is_empty() { cmd.to_string() } else { format!("{prefix}/{cmd}") };
        if is_executable(&candidate) {
            return CString::new(candidate).map_err(|_| 126);
        }
    }
    Err(127)
}

fn is_executable(path: &str) -> bool {
    unistd::access(path, AccessFlags::X_OK).is_ok()
}

fn close_retrying(fd: RawFd) -> nix::Result<()> {
    loop {
        match unistd::close(fd) {
            Err(nix::Error::EINTR) => continue,
            other => return other,
        }
    }
}
