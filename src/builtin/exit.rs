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

//! `exit` built-in: ends the interactive session. With no operand, exits
//! with the last recorded exit status; with one numeric operand, exits
//! with that value modulo 256; with more than one operand, reports a
//! usage error and does not terminate the shell.

use super::BuiltinOutcome;
use crate::env_store::EnvStore;
use std::io::Write;

pub fn run(argv: &[String], env: &EnvStore, out: &mut dyn Write) -> BuiltinOutcome {
    match argv.len() {
        1 => BuiltinOutcome { code: env.last_status(), terminate_shell: true },
        2 => match argv[1].parse::<i64>() {
            Ok(n) => BuiltinOutcome {
                code: n.rem_euclid(256) as i32,
                terminate_shell: true,
            },
            Err(_) => {
                let _ = writeln!(out, "exit: {}: numeric argument required", argv[1]);
                BuiltinOutcome { code: 2, terminate_shell: true }
            }
        },
        _ => {
            let _ = writeln!(out, "exit: too many arguments");
            BuiltinOutcome { code: 1, terminate_shell: false }
        }
    }
}
