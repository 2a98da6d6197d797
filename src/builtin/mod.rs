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

//! Builtin dispatcher (component F).
//!
//! Recognizes the handful of builtins this shell supports, classifies
//! each as parent-only (must mutate the live [`EnvStore`], never a forked
//! copy) or forkable (pure stdout, safe to run post-`fork`), and dispatches
//! by name, one module per builtin. A builtin here either prints to a
//! `Write` and returns an exit code, or it doesn't — no async, no
//! divert-style control flow.

mod cd;
mod echo;
mod env_cmd;
mod exit;
mod export;
mod pwd;
mod unset;

use crate::env_store::EnvStore;
use std::io::Write;

/// Whether a builtin must run in the shell's own process to have any
/// observable effect.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuiltinClass {
    ParentOnly,
    Forkable,
}

/// Result of running a builtin: its exit code, and whether running it
/// should end the interactive session (only ever set by `exit`, and only
/// meaningful when the builtin ran directly in the shell process).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BuiltinOutcome {
    pub code: i32,
    pub terminate_shell: bool,
}

impl BuiltinOutcome {
    fn code(code: i32) -> Self {
        BuiltinOutcome { code, terminate_shell: false }
    }
}

/// Returns the builtin's dispatch class if `name` names one, `None` for an
/// external command.
pub fn classify(name: &str) -> Option<BuiltinClass> {
    match name {
        "cd" | "export" | "unset" | "exit" => Some(BuiltinClass::ParentOnly),
        "echo" | "pwd" | "env" => Some(BuiltinClass::Forkable),
        _ => None,
    }
}

pub fn is_builtin(name: &str) -> bool {
    classify(name).is_some()
}

/// Runs the named builtin, writing its stdout to `out`. `argv[0]` is the
/// builtin's own name.
pub fn dispatch(argv: &[String], env: &mut EnvStore, out: &mut dyn Write) -> BuiltinOutcome {
    let name = argv[0].as_str();
    match name {
        "echo" => BuiltinOutcome::code(echo::run(argv, out)),
        "pwd" => BuiltinOutcome::code(pwd::run(argv, env, out)),
        "env" => BuiltinOutcome::code(env_cmd::run(argv, env, out)),
        "cd" => BuiltinOutcome::code(cd::run(argv, env, out)),
        "export" => BuiltinOutcome::code(export::run(argv, env, out)),
        "unset" => BuiltinOutcome::code(unset::run(argv, env)),
        "exit" => exit::run(argv, env, out),
        _ => unreachable!("dispatch called with a non-builtin name: {name}"),
    }
}
