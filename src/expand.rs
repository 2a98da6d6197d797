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

//! Variable expander (component C).
//!
//! Expands `$?` and `$NAME` inside [`TokenKind::Word`](crate::token::TokenKind::Word)
//! lexemes, tracking quote state independently of the tokenizer's pass.
//! Quote characters are left in place here — [`crate::pipeline`] strips them
//! once expansion is done, so a quoted `$` that *shouldn't* expand still
//! reads correctly in an error message if something goes wrong downstream.

use crate::env_store::EnvStore;
use crate::token::{Token, TokenKind};

/// Expands all `Word` tokens in `tokens` in place.
///
/// `allow_in_single` controls whether `$` is expanded inside single quotes;
/// POSIX shells always pass `false` here, but the parameter is kept so the
/// suppression behavior itself is independently testable.
pub fn expand(tokens: &mut [Token], env: &EnvStore, allow_in_single: bool) {
    for token in tokens.iter_mut() {
        if token.kind == TokenKind::Word {
            token.lexeme = expand_word(&token.lexeme, env, allow_in_single);
        }
    }
}

/// Caps the number of substitutions performed on a single word, guarding
/// against a self-referential variable (`A=$A`) looping forever.
const MAX_SUBSTITUTIONS: usize = 10_000;

fn expand_word(word: &str, env: &EnvStore, allow_in_single: bool) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    let mut in_single = false;
    let mut in_double = false;
    let mut i = 0;
    let mut substitutions = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' if !in_double => {
                in_single = !in_single;
                i += 1;
            }
            '"' if !in_single => {
                in_double = !in_double;
                i += 1;
            }
            '$' if (!in_single || allow_in_single) && substitutions < MAX_SUBSTITUTIONS => {
                if let Some((value, consumed)) = read_substitution(&chars[i + 1..], env) {
                    let replacement: Vec<char> = value.chars().collect();
                    chars.splice(i..i + 1 + consumed, replacement);
                    substitutions += 1;
                    // Left unadvanced: the scan re-enters at the start of the
                    // substituted region, so a nested `$` inside `value`
                    // re-expands.
                } else {
                    i += 1;
                }
            }
            _ => {
                i += 1;
            }
        }
    }
    chars.into_iter().collect()
}

/// Reads a `?` or a run of name characters after a `$` and returns the
/// substituted text plus how many source characters (after the `$`) it
/// consumed. Returns `None` if `$` is not followed by a valid parameter.
fn read_substitution(rest: &[char], env: &EnvStore) -> Option<(String, usize)> {
    match rest.first()? {
        '?' => Some((env.last_status().to_string(), 1)),
        c if c.is_ascii_alphanumeric() => {
            let len = rest.iter().take_while(|c| c.is_ascii_alphanumeric()).count();
            let name: String = rest[..len].iter().collect();
            let value = env.get(&name).unwrap_or("").to_string();
            Some((value, len))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn word_token(s: &str) -> Token {
        Token::new(TokenKind::Word, s)
    }

    #[test]
    fn expands_simple_variable() {
        let mut env = EnvStore::new();
        env.set("FOO", "bar");
        let mut tokens = vec![word_token("$FOO")];
        expand(&mut tokens, &env, false);
        assert_eq!(tokens[0].lexeme, "bar");
    }

    #[test]
    fn unset_variable_expands_to_empty() {
        let env = EnvStore::new();
        let mut tokens = vec![word_token("$NOPE")];
        expand(&mut tokens, &env, false);
        assert_eq!(tokens[0].lexeme, "");
    }

    #[test]
    fn expands_exit_status() {
        let mut env = EnvStore::new();
        env.set_last_status(7);
        let mut tokens = vec![word_token("$?")];
        expand(&mut tokens, &env, false);
        assert_eq!(tokens[0].lexeme, "7");
    }

    #[test]
    fn single_quotes_suppress_expansion_by_default() {
        let mut env = EnvStore::new();
        env.set("HOME", "/home/u");
        let mut tokens = vec![word_token("'$HOME'")];
        expand(&mut tokens, &env, false);
        assert_eq!(tokens[0].lexeme, "'$HOME'");
    }

    #[test]
    fn double_quotes_still_expand() {
        let mut env = EnvStore::new();
        env.set("HOME", "/home/u");
        let mut tokens = vec![word_token("\"$HOME\"")];
        expand(&mut tokens, &env, false);
        assert_eq!(tokens[0].lexeme, "\"/home/u\"");
    }

    #[test]
    fn allow_in_single_forces_expansion() {
        let mut env = EnvStore::new();
        env.set("HOME", "/home/u");
        let mut tokens = vec![word_token("'$HOME'")];
        expand(&mut tokens, &env, true);
        assert_eq!(tokens[0].lexeme, "'/home/u'");
    }

    #[test]
    fn nested_dollar_in_substituted_value_reexpands() {
        let mut env = EnvStore::new();
        env.set("A", "$B");
        env.set("B", "final");
        let mut tokens = vec![word_token("$A")];
        expand(&mut tokens, &env, false);
        assert_eq!(tokens[0].lexeme, "final");
    }

    #[test]
    fn idempotent_on_already_expanded_word() {
        let env = EnvStore::new();
        let mut tokens = vec![word_token("plain text, no vars")];
        expand(&mut tokens, &env, false);
        let once = tokens[0].lexeme.clone();
        expand(&mut tokens, &env, false);
        assert_eq!(tokens[0].lexeme, once);
    }

    #[test]
    fn non_word_tokens_are_untouched() {
        let env = EnvStore::new();
        let mut tokens = vec![Token::new(TokenKind::Pipe, "|")];
        expand(&mut tokens, &env, false);
        assert_eq!(tokens[0].lexeme, "|");
    }
}
