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

//! Signal controller (component G).
//!
//! Handlers are kept async-signal-safe: they only write into a static
//! atomic flag, never allocating or calling `println!`. The
//! non-async-signal-safe work — reprinting the prompt, recording
//! `last_status` — happens afterward in ordinary (non-handler) code that
//! polls the flag.

use nix::sys::signal::{self, SigHandler, Signal};
use std::sync::atomic::{AtomicBool, Ordering};

/// Set by [`handle_sigint`] when SIGINT arrives. Cleared by
/// [`take_sigint`].
static SIGINT_CAUGHT: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigint(_signal: libc_int) {
    SIGINT_CAUGHT.store(true, Ordering::Relaxed);
}

/// Alias for `extern "C" fn(c_int)`'s parameter type, as required by
/// [`SigHandler::Handler`].
#[allow(non_camel_case_types)]
type libc_int = std::os::raw::c_int;

/// Which phase of the REPL turn the shell is currently in, per
/// the REPL's three signal profiles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Prompt,
    Execution,
}

/// Owns the installed SIGINT/SIGQUIT dispositions and the current phase.
pub struct SignalController {
    phase: Phase,
}

impl SignalController {
    /// Installs the Prompt-phase handlers: SIGINT is caught (flag-and-return),
    /// SIGQUIT is ignored.
    pub fn install() -> nix::Result<Self> {
        let mut controller = SignalController { phase: Phase::Prompt };
        controller.enter_prompt()?;
        Ok(controller)
    }

    /// Switches to the Prompt profile: SIGINT sets the flag polled by the
    /// REPL loop; SIGQUIT is ignored.
    pub fn enter_prompt(&mut self) -> nix::Result<()> {
        unsafe {
            signal::sigaction(
                Signal::SIGINT,
                &signal::SigAction::new(
                    SigHandler::Handler(handle_sigint),
                    signal::SaFlags::empty(),
                    signal::SigSet::empty(),
                ),
            )?;
            signal::sigaction(
                Signal::SIGQUIT,
                &signal::SigAction::new(
                    SigHandler::SigIgn,
                    signal::SaFlags::empty(),
                    signal::SigSet::empty(),
                ),
            )?;
        }
        self.phase = Phase::Prompt;
        Ok(())
    }

    /// Switches to the Execution profile: SIGINT and SIGQUIT are both left
    /// to their default disposition so the foreground pipeline's terminal
    /// process group receives them directly; the parent ignores both while
    /// waiting on its children.
    pub fn enter_execution(&mut self) -> nix::Result<()> {
        unsafe {
            signal::sigaction(
                Signal::SIGINT,
                &signal::SigAction::new(SigHandler::SigIgn, signal::SaFlags::empty(), signal::SigSet::empty()),
            )?;
            signal::sigaction(
                Signal::SIGQUIT,
                &signal::SigAction::new(SigHandler::SigIgn, signal::SaFlags::empty(), signal::SigSet::empty()),
            )?;
        }
        self.phase = Phase::Execution;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` and clears the flag if SIGINT has been caught since
    /// the last call. Only meaningful in the Prompt phase.
    pub fn take_sigint() -> bool {
        SIGINT_CAUGHT.swap(false, Ordering::Relaxed)
    }
}

/// Resets a forked child's disposition for SIGINT/SIGQUIT back to default
/// before `execve` ("children reset to default
/// disposition between fork and execve").
pub fn reset_to_default_in_child() -> nix::Result<()> {
    unsafe {
        signal::sigaction(
            Signal::SIGINT,
            &signal::SigAction::new(SigHandler::SigDfl, signal::SaFlags::empty(), signal::SigSet::empty()),
        )?;
        signal::sigaction(
            Signal::SIGQUIT,
            &signal::SigAction::new(SigHandler::SigDfl, signal::SaFlags::empty(), signal::SigSet::empty()),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_sigint_clears_flag() {
        SIGINT_CAUGHT.store(true, Ordering::Relaxed);
        assert!(SignalController::take_sigint());
        assert!(!SignalController::take_sigint());
    }
}
