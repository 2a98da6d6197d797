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

//! End-to-end tests that run real child processes through the full
//! tokenize → expand → build → execute pipeline, driving real external
//! commands rather than mocks.

use minish::env_store::EnvStore;
use minish::error::ShellError;
use minish::exec::{self, ExecOutcome};
use minish::signals::SignalController;
use minish::{lexer, pipeline};

use std::io::Write;
use tempfile::tempdir;

fn run(line: &str, env: &mut EnvStore) -> Result<ExecOutcome, ShellError> {
    let tokens = lexer::tokenize(line)?;
    let stages = pipeline::build(&tokens)?;
    let mut signals = SignalController::install().expect("signal install should succeed in a test process");
    exec::execute(&stages, env, &mut signals)
}

fn base_env() -> EnvStore {
    EnvStore::from_environ()
}

#[test]
fn runs_true_and_false() {
    let mut env = base_env();
    assert_eq!(run("true", &mut env).unwrap().status, 0);
    assert_eq!(run("false", &mut env).unwrap().status, 1);
}

#[test]
fn pipeline_status_is_the_last_stage() {
    let mut env = base_env();
    let outcome = run("false | true", &mut env).unwrap();
    assert_eq!(outcome.status, 0);
    let outcome = run("true | false", &mut env).unwrap();
    assert_eq!(outcome.status, 1);
}

#[test]
fn echo_piped_into_wc_counts_lines() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("count.txt");
    let mut env = base_env();
    let line = format!("echo hi | wc -l >{}", out_path.display());
    let outcome = run(&line, &mut env).unwrap();
    assert_eq!(outcome.status, 0);
    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(contents.trim(), "1");
}

#[test]
fn redirection_into_then_cat_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roundtrip.txt");
    let mut env = base_env();

    let write_line = format!("echo roundtrip >{}", path.display());
    assert_eq!(run(&write_line, &mut env).unwrap().status, 0);

    let out_path = dir.path().join("copy.txt");
    let read_line = format!("cat <{} >{}", path.display(), out_path.display());
    assert_eq!(run(&read_line, &mut env).unwrap().status, 0);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(contents, "roundtrip\n");
}

#[test]
fn command_not_found_exits_127() {
    let mut env = base_env();
    let outcome = run("definitely-not-a-real-command-xyz", &mut env).unwrap();
    assert_eq!(outcome.status, 127);
}

#[test]
fn non_executable_file_exits_126() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("not_executable");
    std::fs::write(&path, b"not a script").unwrap();
    let mut env = base_env();
    let outcome = run(&path.display().to_string(), &mut env).unwrap();
    assert_eq!(outcome.status, 126);
}

#[test]
fn expansion_feeds_into_the_real_executed_argv() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("expanded.txt");
    let mut env = base_env();
    env.set("GREETING", "hello-from-env");

    let tokens = lexer::tokenize(&format!("echo $GREETING >{}", out_path.display())).unwrap();
    let mut tokens = tokens;
    minish::expand::expand(&mut tokens, &env, false);
    let stages = pipeline::build(&tokens).unwrap();
    let mut signals = SignalController::install().unwrap();
    let outcome = exec::execute(&stages, &mut env, &mut signals).unwrap();
    assert_eq!(outcome.status, 0);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(contents.trim(), "hello-from-env");
}

#[test]
fn cd_builtin_persists_across_subsequent_commands() {
    let original_cwd = std::env::current_dir().unwrap();
    let dir = tempdir().unwrap();
    let mut env = base_env();
    let cd_line = format!("cd {}", dir.path().display());
    assert_eq!(run(&cd_line, &mut env).unwrap().status, 0);
    assert_eq!(env.get("PWD"), Some(dir.path().display().to_string().as_str()));

    let marker = dir.path().join("marker.txt");
    std::fs::File::create(&marker).unwrap().write_all(b"x").unwrap();

    let out_path = dir.path().join("ls_out.txt");
    let list_line = format!("ls >{}", out_path.display());
    let outcome = run(&list_line, &mut env);
    std::env::set_current_dir(&original_cwd).unwrap();

    assert_eq!(outcome.unwrap().status, 0);
    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert!(contents.contains("marker.txt"));
}
