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

//! `export` built-in: with no operands, lists exported variables in sorted
//! order; with `NAME` or `NAME=VALUE` operands, creates or updates entries.

use crate::env_store::EnvStore;
use std::io::Write;

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('=')
}

pub fn run(argv: &[String], env: &mut EnvStore, out: &mut dyn Write) -> i32 {
    if argv.len() == 1 {
        for entry in env.iter_sorted() {
            match &entry.value {
                Some(value) => {
                    let _ = writeln!(out, "declare -x {}=\"{}\"", entry.name, value);
                }
                None => {
                    let _ = writeln!(out, "declare -x {}", entry.name);
                }
            }
        }
        return 0;
    }

    let mut status = 0;
    for arg in &argv[1..] {
        match arg.split_once('=') {
            Some((name, value)) => {
                if !is_valid_name(name) {
                    let _ = writeln!(out, "export: `{arg}`: not a valid identifier");
                    status = 1;
                    continue;
                }
                env.set(name, value);
            }
            None => {
                if !is_valid_name(arg) {
                    let _ = writeln!(out, "export: `{arg}`: not a valid identifier");
                    status = 1;
                    continue;
                }
                env.declare(arg);
            }
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_name_equals_value() {
        let mut env = EnvStore::new();
        let mut buf = Vec::new();
        let code = run(&["export".into(), "FOO=bar".into()], &mut env, &mut buf);
        assert_eq!(code, 0);
        assert_eq!(env.get("FOO"), Some("bar"));
    }

    #[test]
    fn declares_bare_name() {
        let mut env = EnvStore::new();
        let mut buf = Vec::new();
        run(&["export".into(), "FOO".into()], &mut env, &mut buf);
        assert!(env.contains("FOO"));
        assert_eq!(env.get("FOO"), None);
    }

    #[test]
    fn no_args_lists_sorted() {
        let mut env = EnvStore::new();
        env.set("b", "2");
        env.set("a", "1");
        let mut buf = Vec::new();
        run(&["export".into()], &mut env, &mut buf);
        let output = String::from_utf8(buf).unwrap();
        assert!(output.find("a=").unwrap() < output.find("b=").unwrap());
    }

    #[test]
    fn invalid_identifier_reports_error() {
        let mut env = EnvStore::new();
        let mut buf = Vec::new();
        let code = run(&["export".into(), "=oops".into()], &mut env, &mut buf);
        assert_eq!(code, 1);
    }
}
