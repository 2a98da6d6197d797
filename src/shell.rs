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

//! Shell context (component H): the single value threaded through a REPL
//! turn, owning the Env Store and the Signal Controller.

use crate::env_store::EnvStore;
use crate::error::ShellError;
use crate::exec::ExecOutcome;
use crate::signals::SignalController;
use crate::{expand, lexer, pipeline};

/// Owns the session's persistent state: environment variables,
/// `last_exit_status`, and the installed signal dispositions.
pub struct Shell {
    pub env: EnvStore,
    pub signals: SignalController,
}

impl Shell {
    /// Builds a shell seeded from the process environment, with the
    /// Prompt signal profile installed.
    pub fn new() -> Result<Self, ShellError> {
        Ok(Shell {
            env: EnvStore::from_environ(),
            signals: SignalController::install()?,
        })
    }

    /// Runs one input line through tokenize → expand → build → execute,
    /// returning the outcome and recording `last_exit_status` along the
    /// way. A line that is empty or whitespace-only is a no-op: `env`'s
    /// `last_exit_status` is left unchanged.
    pub fn run_line(&mut self, line: &str) -> Result<ExecOutcome, ShellError> {
        if line.trim().is_empty() {
            return Ok(ExecOutcome { status: self.env.last_status(), terminate: false });
        }

        tracing::debug!(line, "tokenizing input");
        let mut tokens = lexer::tokenize(line)?;
        tracing::debug!(count = tokens.len(), "expanding tokens");
        expand::expand(&mut tokens, &self.env, false);
        tracing::debug!("building pipeline");
        let stages = pipeline::build(&tokens)?;
        tracing::debug!(stages = stages.len(), "executing pipeline");
        let outcome = crate::exec::execute(&stages, &mut self.env, &mut self.signals)?;
        self.env.set_last_status(outcome.status);
        Ok(outcome)
    }
}
