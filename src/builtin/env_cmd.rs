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

//! `env` built-in: with no arguments, lists the Env Store in insertion
//! order. Invoking an external command with an overridden environment
//! (`env NAME=VALUE cmd...`) is a documented stub — see DESIGN.md's
//! open-question table.

use crate::env_store::EnvStore;
use std::io::Write;

pub fn run(argv: &[String], env: &EnvStore, out: &mut dyn Write) -> i32 {
    if argv.len() > 1 {
        let _ = writeln!(out, "env: running a command with an overridden environment is not supported");
        return 2;
    }
    for entry in env.iter_insertion() {
        let value = entry.value.as_deref().unwrap_or("");
        let _ = writeln!(out, "{}={}", entry.name, value);
    }
    0
}
