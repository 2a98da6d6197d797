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

//! Ordered environment variable store (component A).
//!
//! Entries preserve insertion order for `env`/`as_envp`, while a separate
//! sorted view serves `export`'s listing form. Names are kept unique by
//! construction: [`EnvStore::set`] updates an existing entry in place
//! instead of appending a duplicate.

use std::ffi::CString;

/// A single `NAME=VALUE` entry, or a name declared without a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnvEntry {
    pub name: String,
    pub value: Option<String>,
}

/// Ordered, insertion-preserving mapping of environment variable names to
/// values, plus the shell's `last_exit_status`.
#[derive(Clone, Debug, Default)]
pub struct EnvStore {
    entries: Vec<EnvEntry>,
    last_status: i32,
}

impl EnvStore {
    /// Creates an empty store with `last_exit_status` set to 0.
    pub fn new() -> Self {
        EnvStore::default()
    }

    /// Seeds a store from the process's inherited environment, preserving
    /// the order `std::env::vars` reports it in.
    pub fn from_environ() -> Self {
        let mut store = EnvStore::new();
        for (name, value) in std::env::vars() {
            store.set(&name, value);
        }
        store
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Looks up a variable's value. Returns `None` both when the name is
    /// unset and when it is declared without a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.value.as_deref())
    }

    /// Returns `true` if `name` has an entry (with or without a value).
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Inserts a new entry or updates an existing one in place, preserving
    /// its original position.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(i) = self.position(name) {
            self.entries[i].value = Some(value);
        } else {
            self.entries.push(EnvEntry {
                name: name.to_string(),
                value: Some(value),
            });
        }
    }

    /// Declares `name` without a value, if it doesn't already exist.
    pub fn declare(&mut self, name: &str) {
        if self.position(name).is_none() {
            self.entries.push(EnvEntry {
                name: name.to_string(),
                value: None,
            });
        }
    }

    /// Removes `name`'s entry, if any. Unknown names are a no-op.
    pub fn unset(&mut self, name: &str) {
        if let Some(i) = self.position(name) {
            self.entries.remove(i);
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter_insertion(&self) -> impl Iterator<Item = &EnvEntry> {
        self.entries.iter()
    }

    /// Iterates entries sorted by byte-wise name comparison.
    pub fn iter_sorted(&self) -> Vec<&EnvEntry> {
        let mut v: Vec<&EnvEntry> = self.entries.iter().collect();
        v.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        v
    }

    /// Renders `NAME=VALUE\0` strings in insertion order, for `execve`.
    /// Entries declared without a value are rendered as `NAME=`.
    pub fn as_envp(&self) -> Vec<CString> {
        self.entries
            .iter()
            .map(|e| {
                let value = e.value.as_deref().unwrap_or("");
                CString::new(format!("{}={}", e.name, value)).expect("env value contains NUL")
            })
            .collect()
    }

    /// The exit status of the last pipeline, in `0..=255`.
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// Records the exit status of a completed pipeline, clamped to a byte.
    pub fn set_last_status(&mut self, status: i32) {
        self.last_status = status & 0xff;
    }
}
