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

//! `cd` built-in: changes the working directory and maintains `$PWD`/`$OLDPWD`.
//!
//! Operand resolution order: an explicit operand, else `$HOME` (an error if
//! unset), or `-` meaning `$OLDPWD` (an error if unset; in that case the
//! resolved directory is also echoed to stdout).

use crate::env_store::EnvStore;
use std::io::Write;

pub fn run(argv: &[String], env: &mut EnvStore, out: &mut dyn Write) -> i32 {
    let operand = argv.get(1).map(String::as_str);

    let (target, print_target) = match operand {
        Some("-") => match env.get("OLDPWD") {
            Some(old) => (old.to_string(), true),
            None => {
                let _ = writeln!(out, "cd: OLDPWD not set");
                return 1;
            }
        },
        Some(path) => (path.to_string(), false),
        None => match env.get("HOME") {
            Some(home) => (home.to_string(), false),
            None => {
                let _ = writeln!(out, "cd: HOME not set");
                return 1;
            }
        },
    };

    if let Err(e) = nix::unistd::chdir(target.as_str()) {
        let _ = writeln!(out, "cd: {target}: {e}");
        return 1;
    }

    if print_target {
        let _ = writeln!(out, "{target}");
    }

    let previous_pwd = env.get("PWD").map(str::to_string);
    env.set("PWD", target);
    if let Some(previous) = previous_pwd {
        env.set("OLDPWD", previous);
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cd_to_explicit_operand_updates_pwd_and_oldpwd() {
        let dir = tempdir().unwrap();
        let mut env = EnvStore::new();
        env.set("PWD", "/somewhere/else");
        let mut buf = Vec::new();
        let code = run(&["cd".into(), dir.path().display().to_string()], &mut env, &mut buf);
        assert_eq!(code, 0);
        assert_eq!(env.get("PWD"), Some(dir.path().display().to_string().as_str()));
        assert_eq!(env.get("OLDPWD"), Some("/somewhere/else"));
    }

    #[test]
    fn cd_without_operand_uses_home() {
        let dir = tempdir().unwrap();
        let mut env = EnvStore::new();
        env.set("HOME", dir.path().display().to_string());
        let mut buf = Vec::new();
        let code = run(&["cd".into()], &mut env, &mut buf);
        assert_eq!(code, 0);
    }

    #[test]
    fn cd_without_home_is_an_error() {
        let mut env = EnvStore::new();
        let mut buf = Vec::new();
        let code = run(&["cd".into()], &mut env, &mut buf);
        assert_eq!(code, 1);
    }

    #[test]
    fn cd_dash_prints_and_uses_oldpwd() {
        let dir = tempdir().unwrap();
        let mut env = EnvStore::new();
        env.set("OLDPWD", dir.path().display().to_string());
        let mut buf = Vec::new();
        let code = run(&["cd".into(), "-".into()], &mut env, &mut buf);
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(buf).unwrap().trim(), dir.path().display().to_string());
    }

    #[test]
    fn cd_to_nonexistent_directory_fails() {
        let mut env = EnvStore::new();
        let mut buf = Vec::new();
        let code = run(&["cd".into(), "/no/such/dir/xyz".into()], &mut env, &mut buf);
        assert_eq!(code, 1);
    }
}
