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

//! Crate-wide error taxonomy.
//!
//! Every phase of the pipeline (tokenizer, expander, pipeline builder) that
//! can fail without already being inside a forked child returns
//! `Result<T, ShellError>`. A redirection or `execve` failure *inside* a
//! forked child is reported straight to stderr and ends that process with
//! `std::process::exit`, never by constructing a `ShellError` — there is
//! nowhere for it to unwind to.

use thiserror::Error;

/// Unified error type for the shell's non-child-process code paths.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Tokenizer found an unterminated quote or ran out of memory.
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// Pipeline builder found a dangling pipe or a redirection without a target.
    #[error("syntax error near `{token}`")]
    Syntax { token: String },

    /// Heredoc input was requested but body capture is not implemented.
    #[error("heredoc redirection is not supported")]
    HeredocUnsupported,

    /// `fork`, `pipe`, or `waitpid` failed in the parent, or a signal
    /// disposition could not be installed.
    #[error("resource error: {0}")]
    Resource(#[from] nix::Error),
}

impl ShellError {
    /// Exit status this error maps to when it aborts an entire pipeline
    /// before any child is forked.
    pub fn exit_status(&self) -> i32 {
        match self {
            ShellError::UnterminatedQuote | ShellError::Syntax { .. } | ShellError::HeredocUnsupported => 2,
            ShellError::Resource(_) => 1,
        }
    }
}
