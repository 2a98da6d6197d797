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

//! CLI/REPL front end (component J): reads lines from stdin, drives
//! tokenize → expand → build → execute on each, and exits on EOF with the
//! last pipeline's exit status.

use minish::shell::Shell;
use minish::signals::SignalController;

use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

const DEFAULT_PROMPT: &str = "$ ";

fn init_logging() {
    let filter = EnvFilter::try_from_env("MINISH_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn prompt() -> String {
    std::env::var("MINISH_PROMPT").unwrap_or_else(|_| DEFAULT_PROMPT.to_string())
}

/// `-c <command>` one-shot mode: run a single line and exit with its
/// status, without entering the prompt loop.
fn run_one_shot(command: &str) -> i32 {
    let mut shell = match Shell::new() {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("minish: {e}");
            return 1;
        }
    };
    match shell.run_line(command) {
        Ok(outcome) => outcome.status,
        Err(e) => {
            eprintln!("minish: {e}");
            e.exit_status()
        }
    }
}

enum ReadOutcome {
    Eof,
    Line,
    Interrupted,
}

/// Reads one line directly from fd 0 a byte at a time via `nix::unistd::read`,
/// bypassing `std::io`'s internal `EINTR` retry so a SIGINT that arrives
/// while the prompt is waiting for input is observable as an interrupted
/// read rather than silently resumed.
fn read_line_raw(buf: &mut Vec<u8>) -> io::Result<ReadOutcome> {
    buf.clear();
    let mut byte = [0u8; 1];
    loop {
        match nix::unistd::read(0, &mut byte) {
            Ok(0) => return Ok(if buf.is_empty() { ReadOutcome::Eof } else { ReadOutcome::Line }),
            Ok(_) => {
                if byte[0] == b'\n' {
                    return Ok(ReadOutcome::Line);
                }
                buf.push(byte[0]);
            }
            Err(nix::Error::EINTR) => return Ok(ReadOutcome::Interrupted),
            Err(e) => return Err(io::Error::from_raw_os_error(e as i32)),
        }
    }
}

fn run_repl() -> i32 {
    let mut shell = match Shell::new() {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("minish: {e}");
            return 1;
        }
    };

    // `MINISH_HISTORY_FILE` is read for forward compatibility; history
    // persistence itself is a documented stub (out of scope).
    let _history_file = std::env::var("MINISH_HISTORY_FILE").ok();

    let mut buf = Vec::new();
    loop {
        print!("{}", prompt());
        let _ = io::stdout().flush();

        match read_line_raw(&mut buf) {
            Ok(ReadOutcome::Eof) => break,
            Ok(ReadOutcome::Interrupted) => {
                SignalController::take_sigint();
                println!();
                shell.env.set_last_status(130);
            }
            Ok(ReadOutcome::Line) => {
                let line = String::from_utf8_lossy(&buf).into_owned();
                match shell.run_line(&line) {
                    Ok(outcome) => {
                        shell.env.set_last_status(outcome.status);
                        if outcome.terminate {
                            return outcome.status;
                        }
                    }
                    Err(e) => {
                        eprintln!("minish: {e}");
                        shell.env.set_last_status(e.exit_status());
                    }
                }
            }
            Err(e) => {
                eprintln!("minish: {e}");
                break;
            }
        }
    }
    shell.env.last_status()
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let status = if args.len() >= 3 && args[1] == "-c" {
        run_one_shot(&args[2..].join(" "))
    } else {
        run_repl()
    };

    std::process::exit(status);
}
